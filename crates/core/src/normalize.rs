//! Slide-count enforcement for generated outlines.
//!
//! The generation collaborator is asked for an exact number of slides but may
//! return more. Extra slides are dropped from the tail; a shorter outline is
//! accepted as-is and never padded.

use crate::types::Outline;

/// Trims outlines to a requested slide count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineNormalizer {
    /// Maximum number of content slides to keep.
    slide_count: usize,
}

impl OutlineNormalizer {
    /// Create a normalizer for the given requested slide count.
    pub fn new(slide_count: usize) -> Self {
        Self { slide_count }
    }

    /// Normalize an outline, keeping at most `slide_count` slides.
    ///
    /// The kept slides are a prefix of the original sequence, in original
    /// order. The title is never touched.
    pub fn normalize(&self, mut outline: Outline) -> Outline {
        if outline.slides.len() > self.slide_count {
            log::debug!(
                "Truncating outline '{}' from {} to {} slides",
                outline.title,
                outline.slides.len(),
                self.slide_count
            );
            outline.slides.truncate(self.slide_count);
        } else if outline.slides.len() < self.slide_count {
            log::debug!(
                "Outline '{}' has {} slides, fewer than the {} requested",
                outline.title,
                outline.slides.len(),
                self.slide_count
            );
        }

        outline
    }
}

/// Normalize an outline to at most `requested_count` slides.
pub fn normalize(outline: Outline, requested_count: usize) -> Outline {
    OutlineNormalizer::new(requested_count).normalize(outline)
}
