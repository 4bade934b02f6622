//! Application state passed to all request handlers.
//!
//! Repositories and collaborators are trait objects so tests can swap
//! in doubles; the context is constructed explicitly at startup and
//! owns every shared resource (no globals).

use std::sync::Arc;

use gurukul_core::services::{Completions, DocumentRenderer, OcrEngine};
use gurukul_core::storage::{
    AnswerSheetRepository, NotesRepository, PaperRepository, PerformanceRepository, UserRepository,
};

use crate::config::Config;
use crate::rate_limit::RateLimiter;
#[cfg(not(feature = "mock"))]
use crate::services::{HttpCompletions, HttpOcr, HttpRenderer};
use crate::storage::InMemoryRepository;

/// Shared application state, cloned per request handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub papers: Arc<dyn PaperRepository>,
    pub notes: Arc<dyn NotesRepository>,
    pub sheets: Arc<dyn AnswerSheetRepository>,
    pub performance: Arc<dyn PerformanceRepository>,

    /// Text-generation collaborator (papers, notes, grading).
    pub completions: Arc<dyn Completions>,
    /// OCR collaborator for answer-sheet images.
    pub ocr: Arc<dyn OcrEngine>,
    /// Document-render collaborator for PDF/PPTX exports.
    pub renderer: Arc<dyn DocumentRenderer>,

    pub rate_limiter: RateLimiter,
    pub config: Arc<Config>,
}

impl AppState {
    fn build(
        repo: Arc<InMemoryRepository>,
        completions: Arc<dyn Completions>,
        ocr: Arc<dyn OcrEngine>,
        renderer: Arc<dyn DocumentRenderer>,
        config: Config,
    ) -> Self {
        let rate_limiter = RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window(),
        );

        Self {
            users: repo.clone(),
            papers: repo.clone(),
            notes: repo.clone(),
            sheets: repo.clone(),
            performance: repo,
            completions,
            ocr,
            renderer,
            rate_limiter,
            config: Arc::new(config),
        }
    }

    /// Creates the production state: in-memory storage and HTTP
    /// collaborator clients taken from the configuration.
    #[cfg(not(feature = "mock"))]
    pub fn new(config: Config) -> Self {
        let repo = Arc::new(InMemoryRepository::new());

        let completions = Arc::new(HttpCompletions::new(
            config.completions_url.clone(),
            config.completions_api_key.clone(),
            config.completions_model.clone(),
        ));
        let ocr = Arc::new(HttpOcr::new(config.ocr_url.clone()));
        let renderer = Arc::new(HttpRenderer::new(config.renderer_url.clone()));

        Self::build(repo, completions, ocr, renderer, config)
    }

    /// Creates state with deterministic collaborator doubles. Used by
    /// tests and by the `mock` feature for sidecar-free development.
    #[cfg(any(test, feature = "mock"))]
    pub fn with_mock_services(config: Config) -> Self {
        use crate::services::{MockCompletions, MockOcr, MockRenderer};

        let repo = Arc::new(InMemoryRepository::new());

        Self::build(
            repo,
            Arc::new(MockCompletions::default()),
            Arc::new(MockOcr::default()),
            Arc::new(MockRenderer::default()),
            config,
        )
    }
}

#[cfg(test)]
impl Default for AppState {
    /// State with in-memory storage and mock collaborators for tests.
    fn default() -> Self {
        let mut config = Config::from_env();
        config.jwt_secret = "test-secret".to_string();
        config.upload_dir = std::env::temp_dir().join("gurukul-test-uploads");
        Self::with_mock_services(config)
    }
}
