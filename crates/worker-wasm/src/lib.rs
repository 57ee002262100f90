//! WASM-compatible wrapper for deck rendering.
//!
//! This crate exposes outline rendering to JavaScript for use in browsers
//! and Cloudflare Workers. Outline generation stays on the JavaScript side;
//! this module only turns an outline into PPTX bytes.

use deck_core::{BackgroundImages, DocumentRenderer, ImageData, Outline, RenderRequest};
use deck_pptx::PptxRenderer;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of rendering a presentation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResult {
    /// Suggested download filename, e.g. `sejarah ai.pptx`.
    pub filename: String,
    /// Slides in the deck, title slide included.
    pub slide_count: usize,
    /// The PPTX package.
    #[serde(skip)]
    pub data: Vec<u8>,
}

/// Render an outline into a PPTX deck.
///
/// # Arguments
/// * `outline_json` - Outline as `{"presentationTitle": ..., "slides": [{"title": ..., "points": [...]}]}`
/// * `slide_count` - Requested number of content slides; longer outlines are truncated
/// * `cover_image` - Optional title slide background as a base64 data URI
/// * `content_image` - Optional content slide background as a base64 data URI
///
/// # Returns
/// A JavaScript object `{ filename, slideCount, data }` where `data` is a
/// `Uint8Array`, or throws on error.
#[wasm_bindgen]
pub fn render_presentation(
    outline_json: &str,
    slide_count: usize,
    cover_image: Option<String>,
    content_image: Option<String>,
) -> Result<JsValue, JsValue> {
    let result = render_presentation_impl(
        outline_json,
        slide_count,
        cover_image.as_deref(),
        content_image.as_deref(),
    )
    .map_err(|e| JsValue::from_str(&e))?;

    let value = serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))?;
    let data = js_sys::Uint8Array::from(result.data.as_slice());
    js_sys::Reflect::set(&value, &JsValue::from_str("data"), &data)?;
    Ok(value)
}

/// Derive the download filename for a presentation title.
#[wasm_bindgen]
pub fn derive_filename(title: &str) -> String {
    deck_core::derive_filename(title)
}

fn render_presentation_impl(
    outline_json: &str,
    slide_count: usize,
    cover_image: Option<&str>,
    content_image: Option<&str>,
) -> Result<RenderResult, String> {
    let outline = Outline::from_json(outline_json).map_err(|e| e.to_string())?;
    let outline = deck_core::normalize(outline, slide_count);

    let mut images = BackgroundImages::none();
    if let Some(uri) = cover_image.filter(|u| !u.is_empty()) {
        images = images.with_cover(ImageData::from_data_uri(uri).map_err(|e| e.to_string())?);
    }
    if let Some(uri) = content_image.filter(|u| !u.is_empty()) {
        images = images.with_content(ImageData::from_data_uri(uri).map_err(|e| e.to_string())?);
    }

    let document = PptxRenderer::new()
        .render(RenderRequest::new(&outline, &images))
        .map_err(|e| format!("Rendering error: {}", e))?;

    Ok(RenderResult {
        filename: document.filename,
        slide_count: outline.deck_slide_count(),
        data: document.bytes,
    })
}
