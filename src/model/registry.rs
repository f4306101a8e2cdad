//! Name-keyed registry of layer builders consulted when a manifest is loaded.
//!
//! A manifest layer is resolved by its `class_name`. Custom layers must be
//! registered before loading; an unknown name is a load-time
//! [`EmotionError::UnresolvableComponent`], never a silent default.

use std::collections::HashMap;

use crate::model::core_layers::{Dense, DropoutLayer, GlobalAveragePooling1D};
use crate::model::embedding::TokenAndPositionEmbedding;
use crate::model::layer::{BuildContext, Layer, LayerSpec};
use crate::model::transformer::TransformerBlock;
use crate::EmotionError;

/// Rebuilds a layer from its spec and (prefix-scoped) weights.
pub type LayerBuilder =
    fn(&LayerSpec, BuildContext<'_>) -> Result<Box<dyn Layer>, EmotionError>;

#[derive(Clone, Default)]
pub struct LayerRegistry {
    builders: HashMap<String, LayerBuilder>,
}

impl LayerRegistry {
    /// Registry with no classes at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the built-in classes only.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Dense::CLASS_NAME, Dense::build);
        registry.register(DropoutLayer::CLASS_NAME, DropoutLayer::build);
        registry.register(GlobalAveragePooling1D::CLASS_NAME, GlobalAveragePooling1D::build);
        registry
    }

    /// Built-in classes plus the emotion model's custom layers.
    pub fn with_custom_layers() -> Self {
        let mut registry = Self::builtin();
        register_custom_layers(&mut registry);
        registry
    }

    /// Register a builder, returning the one it replaced.
    pub fn register(
        &mut self,
        class_name: impl Into<String>,
        builder: LayerBuilder,
    ) -> Option<LayerBuilder> {
        self.builders.insert(class_name.into(), builder)
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.builders.contains_key(class_name)
    }

    /// Registered class names, sorted.
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.builders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve `spec.class_name` and build the layer.
    pub fn build(
        &self,
        spec: &LayerSpec,
        ctx: BuildContext<'_>,
    ) -> Result<Box<dyn Layer>, EmotionError> {
        let builder = self.builders.get(&spec.class_name).ok_or_else(|| {
            EmotionError::UnresolvableComponent {
                class_name: spec.class_name.clone(),
            }
        })?;
        builder(spec, ctx)
    }
}

/// Register `TokenAndPositionEmbedding` and `TransformerBlock` under their
/// exact class names.
pub fn register_custom_layers(registry: &mut LayerRegistry) {
    registry.register(
        TokenAndPositionEmbedding::CLASS_NAME,
        TokenAndPositionEmbedding::build,
    );
    registry.register(TransformerBlock::CLASS_NAME, TransformerBlock::build);
}
