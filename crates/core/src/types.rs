//! Domain types for outlines and rendered decks.

use crate::error::{Error, Result};
use crate::image::ImageData;
use serde::{Deserialize, Serialize};

/// A presentation outline as returned by the generation collaborator.
///
/// The JSON shape is `{"presentationTitle": "...", "slides": [{"title": "...", "points": ["..."]}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Main presentation title, shown on the title slide.
    #[serde(rename = "presentationTitle")]
    pub title: String,

    /// Content slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Outline {
    /// Create an outline with the given title and no slides.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            slides: Vec::new(),
        }
    }

    /// Append a slide, builder style.
    pub fn with_slide(mut self, slide: Slide) -> Self {
        self.slides.push(slide);
        self
    }

    /// Parse an outline from collaborator JSON.
    ///
    /// Any shape violation (missing title, `slides` not an array, a point
    /// that is not a string, ...) is reported as [`Error::InvalidOutline`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidOutline(e.to_string()))
    }

    /// Parse an outline from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::InvalidOutline(e.to_string()))
    }

    /// Number of slides in the rendered deck: the title slide plus one per outline slide.
    pub fn deck_slide_count(&self) -> usize {
        1 + self.slides.len()
    }
}

/// A single content slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Slide heading.
    pub title: String,

    /// Bullet points, in reading order. May be empty.
    pub points: Vec<String>,
}

impl Slide {
    /// Create a slide from a title and its bullet points.
    pub fn new<I, S>(title: impl Into<String>, points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            points: points.into_iter().map(Into::into).collect(),
        }
    }
}

/// Optional background images shared by every deck of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundImages {
    /// Background for the title slide.
    pub cover: Option<ImageData>,

    /// Background for every content slide.
    pub content: Option<ImageData>,
}

impl BackgroundImages {
    /// No images; every slide gets its solid fill.
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the title slide background.
    pub fn with_cover(mut self, image: ImageData) -> Self {
        self.cover = Some(image);
        self
    }

    /// Set the content slide background.
    pub fn with_content(mut self, image: ImageData) -> Self {
        self.content = Some(image);
        self
    }
}

/// Everything the renderer needs for one deck.
#[derive(Debug, Clone, Copy)]
pub struct RenderRequest<'a> {
    pub outline: &'a Outline,
    pub images: &'a BackgroundImages,
}

impl<'a> RenderRequest<'a> {
    pub fn new(outline: &'a Outline, images: &'a BackgroundImages) -> Self {
        Self { outline, images }
    }
}

/// A packaged deck ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Filesystem-safe output name, including the extension.
    pub filename: String,

    /// The packaged presentation bytes.
    pub bytes: Vec<u8>,
}
