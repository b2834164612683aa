//! Pipeline fallback tests
//!
//! Collaborator failures must always degrade to the offline heuristics.

mod common;

use approx::assert_abs_diff_eq;
use common::{FakeClassifier, FakeReviewer};
use sb_master::{AudioSource, Genre, MixReview, ReferenceProfile, UserAdjustment, review_mix};
use sb_session::{CollaboratorError, MasteringPipeline, SessionConfig};
use std::sync::Arc;
use std::time::Duration;

fn pipeline() -> MasteringPipeline {
    let config = SessionConfig::default().with_timeouts_ms(50, 50, 50, 50);
    MasteringPipeline::new(config).unwrap()
}

fn source(hint: &str) -> AudioSource {
    AudioSource::new("trk", "/uploads/trk.wav", 200.0).with_hint(hint)
}

// ═══════════════════════════════════════════════════════════════════════════════
// GENRE DETECTION
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_keywords_skip_classifier() {
    let classifier = Arc::new(FakeClassifier::returning("jazz"));
    let pipeline = pipeline().with_classifier(classifier.clone());

    assert_eq!(pipeline.detect_genre(&source("techno_set.wav")).await, Genre::Electronic);
    assert_eq!(classifier.calls(), 0);
}

#[tokio::test]
async fn test_classifier_label_is_validated() {
    let ok = pipeline().with_classifier(Arc::new(FakeClassifier::returning(" Jazz ")));
    assert_eq!(ok.detect_genre(&source("take_five.wav")).await, Genre::Jazz);

    let bogus = pipeline().with_classifier(Arc::new(FakeClassifier::returning("polka")));
    assert_eq!(bogus.detect_genre(&source("take_five.wav")).await, Genre::Unknown);
}

#[tokio::test]
async fn test_classifier_failure_and_timeout_fall_back() {
    let failing = pipeline().with_classifier(Arc::new(FakeClassifier::failing(
        CollaboratorError::Unavailable("no key".into()),
    )));
    assert_eq!(failing.detect_genre(&source("take_five.wav")).await, Genre::Unknown);

    let slow = FakeClassifier {
        delay: Duration::from_secs(2),
        ..FakeClassifier::returning("jazz")
    };
    let slow = pipeline().with_classifier(Arc::new(slow));
    let descriptor = slow.analyze(&source("take_five.wav")).await;
    assert_eq!(descriptor.genre, Genre::Unknown);
    assert!(descriptor.tempo_bpm >= 90 && descriptor.tempo_bpm <= 130);
}

#[tokio::test]
async fn test_no_classifier_is_unknown() {
    assert_eq!(pipeline().detect_genre(&source("take_five.wav")).await, Genre::Unknown);
}

// ═══════════════════════════════════════════════════════════════════════════════
// MASTERING
// ═══════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_master_then_adjust() {
    let pipeline = pipeline();
    let descriptor = pipeline.analyze(&source("trap_anthem.mp3")).await;
    assert_eq!(descriptor.genre, Genre::HipHop);

    let outcome = pipeline.master(&descriptor);
    assert!(outcome.description.starts_with("Hiphop optimization"));
    assert_eq!(outcome.chain.stages().len(), outcome.chain.len());

    let adjusted = pipeline.adjust(
        &outcome,
        &UserAdjustment {
            low: -6.0,
            ..Default::default()
        },
    );
    assert_abs_diff_eq!(
        adjusted.params.bass_boost,
        outcome.params.bass_boost - 0.5,
        epsilon = 1e-6
    );
    assert_eq!(adjusted.params.volume_boost, outcome.params.volume_boost);
    assert_ne!(adjusted.chain, outcome.chain);

    let request = pipeline.render_request(&source("trap_anthem.mp3"), &adjusted);
    assert_eq!(request.chain, adjusted.chain);
}

#[tokio::test]
async fn test_reference_mastering_with_and_without_profile() {
    let config = SessionConfig::default()
        .with_engine(sb_master::EngineConfig::default().with_reference_seed(11));
    let pipeline = MasteringPipeline::new(config).unwrap();
    let descriptor = pipeline.analyze(&source("pop_single.wav")).await;

    let reference = pipeline.analyze_reference(&source("reference_master.wav"));
    let matched = pipeline.master_with_reference(&descriptor, Some(&reference));
    assert!(matched.params.is_normalized());

    let fallback = pipeline.master_with_reference(&descriptor, None);
    let explicit = pipeline.master_with_reference(&descriptor, Some(&ReferenceProfile::neutral()));
    assert_eq!(fallback, explicit);
}

// ═══════════════════════════════════════════════════════════════════════════════
// REVIEW
// ═══════════════════════════════════════════════════════════════════════════════

fn external(strengths: Vec<String>) -> MixReview {
    MixReview {
        score: 88,
        strengths,
        opportunities: vec!["Tighten the low end".into()],
        recommendations: vec!["Sidechain the bass".into()],
        encouragement: "Nice!".into(),
        ready_for_mastering: true,
    }
}

#[tokio::test]
async fn test_valid_external_review_wins() {
    let reviewer = FakeReviewer {
        reply: Ok(external(vec!["Punchy drums".into()])),
        delay: Duration::ZERO,
    };
    let pipeline = pipeline().with_reviewer(Arc::new(reviewer));
    let descriptor = pipeline.analyze(&source("rock_demo.wav")).await;

    let review = pipeline.review(&descriptor).await;
    assert_eq!(review.score, 88);
    assert_eq!(review.strengths, vec!["Punchy drums".to_string()]);
}

#[tokio::test]
async fn test_invalid_or_slow_review_falls_back() {
    let empty = FakeReviewer {
        reply: Ok(external(vec![])),
        delay: Duration::ZERO,
    };
    let pipeline_empty = pipeline().with_reviewer(Arc::new(empty));
    let descriptor = pipeline_empty.analyze(&source("rock_demo.wav")).await;
    assert_eq!(pipeline_empty.review(&descriptor).await, review_mix(&descriptor));

    let slow = FakeReviewer {
        reply: Ok(external(vec!["Punchy drums".into()])),
        delay: Duration::from_secs(2),
    };
    let pipeline_slow = pipeline().with_reviewer(Arc::new(slow));
    assert_eq!(pipeline_slow.review(&descriptor).await, review_mix(&descriptor));
}
