//! End-to-end inference over real artifacts.

mod common;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use common::{TestModel, LABELS};
use review_emotion::EmotionError;

#[test]
fn test_single_review_scenario() {
    let (_harness, ctx) = common::load_context(TestModel::Keyword);
    let label = ctx
        .pipeline
        .predict_one("Saya sangat senang dengan layanannya")
        .expect("predict");
    assert_eq!(label, "happy");

    let (_harness, ctx) = common::load_context(TestModel::Transformer);
    let review = "Saya sangat senang dengan layanannya";
    let first = ctx.pipeline.predict_one(review).expect("predict");
    let second = ctx.pipeline.predict_one(review).expect("predict");
    assert_eq!(first, second);
    assert!(LABELS.contains(&first.as_str()));
}

#[test]
fn test_keyword_labels() {
    let (_harness, ctx) = common::load_context(TestModel::Keyword);
    let p = &ctx.pipeline;
    assert_eq!(p.predict_one("Produk ini sangat mengecewakan").expect("predict"), "sad");
    assert_eq!(p.predict_one("Pengiriman cepat, terima kasih!").expect("predict"), "happy");
    assert_eq!(p.predict_one("tidak ada komentar").expect("predict"), "neutral");
}

#[test]
fn test_scores_are_a_distribution() {
    let (_harness, ctx) = common::load_context(TestModel::Transformer);
    let prediction = ctx
        .pipeline
        .predict_one_scored("Saya sangat senang dengan layanannya")
        .expect("predict");
    assert_eq!(prediction.scores.len(), LABELS.len());
    let total: f32 = prediction.scores.iter().sum();
    assert!((total - 1.0).abs() < 1e-4, "scores sum to {}", total);
    assert!(LABELS.contains(&prediction.label.as_str()));
}

#[test]
fn test_empty_text_is_rejected() {
    let (_harness, ctx) = common::load_context(TestModel::Transformer);
    assert!(matches!(ctx.pipeline.predict_one(""), Err(EmotionError::EmptyInput)));
    assert!(matches!(ctx.pipeline.predict_one("   "), Err(EmotionError::EmptyInput)));
}

#[test]
fn test_long_reviews_keep_their_tail() {
    let (_harness, ctx) = common::load_context(TestModel::Keyword);
    // Pre-truncation drops the leading words, so only the tail decides.
    let text = "mengecewakan a b c d e f g h i senang";
    assert_eq!(ctx.pipeline.predict_one(text).expect("predict"), "happy");
}

#[test]
fn test_batch_matches_single_predictions() {
    let (_harness, ctx) = common::load_context(TestModel::Transformer);
    let texts = [
        "Saya sangat senang dengan layanannya",
        "Produk ini sangat mengecewakan",
        "Pengiriman cepat, terima kasih!",
        "",
    ];
    let batch = ctx.pipeline.predict_batch(&texts).expect("batch");
    assert_eq!(batch.len(), texts.len());
    for (text, label) in texts.iter().zip(&batch).take(3) {
        assert_eq!(&ctx.pipeline.predict_one(text).expect("predict"), label);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_labels_are_members_and_deterministic(
        texts in prop::collection::vec("[a-z ,!]{0,60}", 0..6)
    ) {
        let (_harness, ctx) = common::load_context(TestModel::Transformer);
        let first = ctx.pipeline.predict_batch(&texts).expect("batch");
        let second = ctx.pipeline.predict_batch(&texts).expect("batch");
        prop_assert_eq!(first.len(), texts.len());
        prop_assert_eq!(&first, &second);
        for label in &first {
            prop_assert!(LABELS.contains(&label.as_str()));
        }
    }

    #[test]
    fn prop_batch_order_follows_input(
        texts in prop::collection::vec("(senang|mengecewakan|cepat|saya|hmm)( (senang|saya|sangat))?", 1..6)
    ) {
        let (_harness, ctx) = common::load_context(TestModel::Keyword);
        let forward = ctx.pipeline.predict_batch(&texts).expect("batch");
        let mut reversed_texts = texts.clone();
        reversed_texts.reverse();
        let mut backward = ctx.pipeline.predict_batch(&reversed_texts).expect("batch");
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }
}
