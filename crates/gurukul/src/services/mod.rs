//! HTTP implementations of the collaborator contracts.
//!
//! Each external service (text completions, OCR, document rendering)
//! is reached over plain request/response HTTP. Mock doubles live
//! behind the `mock` feature and in tests.

mod completions;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod ocr;
mod render;

pub use completions::HttpCompletions;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCompletions, MockOcr, MockRenderer};
pub use ocr::HttpOcr;
pub use render::HttpRenderer;
