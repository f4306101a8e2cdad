pub mod harness;

// Re-export commonly used test utilities
pub use harness::{ArtifactHarness, TestModel, LABELS, MAXLEN};

use review_emotion::init::AppContext;

/// Load a full context from a fresh harness; the harness must outlive it.
pub fn load_context(model: TestModel) -> (ArtifactHarness, AppContext) {
    let harness = ArtifactHarness::new(model);
    let ctx = AppContext::new(Some(harness.path_buf())).expect("Failed to load test artifacts");
    (harness, ctx)
}
