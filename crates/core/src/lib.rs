//! Core domain types, slide-count normalization, filename derivation and the
//! batch driver for turning generated outlines into slide decks.

pub mod batch;
pub mod error;
pub mod filename;
pub mod image;
pub mod normalize;
pub mod types;

pub use batch::{run_batch, BatchConfig, BatchFailure, BatchOutcome, DocumentRenderer, OutlineSource};
pub use error::{Error, Result};
pub use filename::{derive_filename, sanitize_title, PPTX_EXTENSION};
pub use image::{ImageData, ImageFormat};
pub use normalize::{normalize, OutlineNormalizer};
pub use types::{BackgroundImages, Outline, RenderRequest, RenderedDocument, Slide};
