//! Output filename derivation.
//!
//! Every character outside `[A-Za-z0-9 -]` becomes an underscore, the result
//! is lowercased and the presentation extension is appended. Titles made only
//! of replaced characters are accepted and yield an all-underscore name.

use regex::Regex;
use std::sync::LazyLock;

/// Extension of rendered decks, without the leading dot.
pub const PPTX_EXTENSION: &str = "pptx";

/// Any character that is not safe to keep in a filename.
static UNSAFE_CHAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9 -]").unwrap());

/// Sanitize a title into a filename stem.
///
/// Replacement is per Unicode scalar value, so `"Café"` becomes `"caf_"`.
pub fn sanitize_title(title: &str) -> String {
    UNSAFE_CHAR_REGEX
        .replace_all(title, "_")
        .to_lowercase()
}

/// Derive the output filename for a presentation title.
pub fn derive_filename(title: &str) -> String {
    format!("{}.{}", sanitize_title(title), PPTX_EXTENSION)
}
