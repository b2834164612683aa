//! Mastering pipeline
//!
//! Wires the engine to its collaborators: estimate, calculate, optional
//! reference blend or manual adjustment, compile. Collaborator failures never
//! surface here; each one degrades to the offline heuristic.

use crate::collab::{GenreClassifier, MixReviewer, with_deadline};
use crate::config::SessionConfig;
use crate::error::SessionResult;
use sb_master::{
    AudioDescriptor, AudioSource, FilterChainSpec, Genre, HeuristicAnalyzer, MasteringParameters,
    MixReview, ReferenceProfile, RenderRequest, SignalAnalyzer, UserAdjustment, apply_adjustment,
    calculate_parameters, match_reference, review_mix,
};
use serde::Serialize;
use std::sync::Arc;

/// Parameters plus the chain compiled from them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasteringOutcome {
    /// Genre the chain targets
    pub genre: Genre,
    /// Parameter vector
    pub params: MasteringParameters,
    /// Compiled chain
    pub chain: FilterChainSpec,
    /// Human-readable summary of the processing
    pub description: String,
}

impl MasteringOutcome {
    fn new(genre: Genre, params: MasteringParameters) -> Self {
        Self {
            genre,
            chain: FilterChainSpec::compile(&params, genre),
            description: params.description(genre),
            params,
        }
    }
}

/// Mastering pipeline
pub struct MasteringPipeline {
    config: SessionConfig,
    analyzer: Arc<dyn SignalAnalyzer>,
    classifier: Option<Arc<dyn GenreClassifier>>,
    reviewer: Option<Arc<dyn MixReviewer>>,
}

impl MasteringPipeline {
    /// Create pipeline with the heuristic analyzer and no collaborators
    pub fn new(config: SessionConfig) -> SessionResult<Self> {
        config.validate()?;
        let analyzer = Arc::new(HeuristicAnalyzer::new(&config.engine));

        Ok(Self {
            config,
            analyzer,
            classifier: None,
            reviewer: None,
        })
    }

    /// Replace the descriptor analyzer
    pub fn with_analyzer(mut self, analyzer: Arc<dyn SignalAnalyzer>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Use an external genre classifier after keyword matching fails
    pub fn with_classifier(mut self, classifier: Arc<dyn GenreClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Prefer an external reviewer over the heuristic scorer
    pub fn with_reviewer(mut self, reviewer: Arc<dyn MixReviewer>) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    /// Configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Keyword match first, then the classifier, then `unknown`
    pub async fn detect_genre(&self, source: &AudioSource) -> Genre {
        if let Some(genre) = self.analyzer.genre_from_hint(source) {
            log::debug!("Genre '{}' from keywords for '{}'", genre, source.id);
            return genre;
        }

        let Some(classifier) = &self.classifier else {
            return Genre::Unknown;
        };

        let text = source.hint_text();
        if text.trim().is_empty() {
            return Genre::Unknown;
        }

        match with_deadline(self.config.classifier_timeout(), classifier.classify(text)).await {
            Ok(label) => Genre::from_label(&label).unwrap_or_else(|| {
                log::warn!("Classifier returned unsupported label '{}'", label);
                Genre::Unknown
            }),
            Err(e) => {
                log::warn!("Genre classifier failed for '{}': {}", source.id, e);
                Genre::Unknown
            }
        }
    }

    /// Full descriptor for an uploaded track
    pub async fn analyze(&self, source: &AudioSource) -> AudioDescriptor {
        let genre = self.detect_genre(source).await;
        self.analyzer.describe(source, genre)
    }

    /// Reference profile, clamped to documented ranges
    pub fn analyze_reference(&self, source: &AudioSource) -> ReferenceProfile {
        self.analyzer.reference_profile(source).clamped()
    }

    /// Adaptive parameters and chain
    pub fn master(&self, descriptor: &AudioDescriptor) -> MasteringOutcome {
        MasteringOutcome::new(descriptor.genre, calculate_parameters(descriptor))
    }

    /// Reference-matched parameters; neutral reference when none is available
    pub fn master_with_reference(
        &self,
        descriptor: &AudioDescriptor,
        reference: Option<&ReferenceProfile>,
    ) -> MasteringOutcome {
        let neutral = ReferenceProfile::neutral();
        let reference = reference.unwrap_or_else(|| {
            log::debug!("No reference profile, using neutral fallback");
            &neutral
        });
        MasteringOutcome::new(descriptor.genre, match_reference(descriptor, reference))
    }

    /// Layer manual controls over an outcome
    pub fn adjust(&self, outcome: &MasteringOutcome, adjustment: &UserAdjustment) -> MasteringOutcome {
        MasteringOutcome::new(outcome.genre, apply_adjustment(&outcome.params, adjustment))
    }

    /// External review when valid and in time, else the heuristic scorer
    pub async fn review(&self, descriptor: &AudioDescriptor) -> MixReview {
        if let Some(reviewer) = &self.reviewer {
            match with_deadline(self.config.reviewer_timeout(), reviewer.review(descriptor)).await {
                Ok(review) => match review.validated() {
                    Some(review) => return review,
                    None => log::warn!("External review had empty sections, using heuristic"),
                },
                Err(e) => log::warn!("External reviewer failed: {}", e),
            }
        }
        review_mix(descriptor)
    }

    /// Render request for the configured output format
    pub fn render_request(&self, source: &AudioSource, outcome: &MasteringOutcome) -> RenderRequest {
        RenderRequest::new(
            source.clone(),
            outcome.chain.clone(),
            self.config.output_format,
        )
    }
}
