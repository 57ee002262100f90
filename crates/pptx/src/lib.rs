//! PPTX (Office Open XML) backend: renders outlines into 16:9 slide decks
//! and reads decks back for verification.
//!
//! A deck is a ZIP archive of XML parts. Each render writes one title slide
//! followed by one slide per outline entry.

pub mod layout;
mod parts;
pub mod reader;
mod slide;
pub mod writer;

pub use layout::{Align, Anchor, Frame, RenderOptions, TextStyle, SLIDE_HEIGHT, SLIDE_WIDTH};
pub use reader::{BackgroundSummary, DeckReader, DeckSummary, SlideSummary, TextBoxSummary};
pub use writer::{render, PptxRenderer};
