//! Canvas geometry and rendering theme.
//!
//! All positions are in EMUs (English Metric Units, 914400 per inch) on a
//! fixed 16:9 canvas of 10in x 5.625in.

/// EMUs per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Canvas width: 10in.
pub const SLIDE_WIDTH: i64 = 9_144_000;

/// Canvas height: 5.625in.
pub const SLIDE_HEIGHT: i64 = 5_143_500;

/// Convert inches to EMUs.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Percentage of a canvas dimension, in EMUs.
pub fn percent_of(dimension: i64, percent: i64) -> i64 {
    dimension * percent / 100
}

/// Position and size of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    pub const fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }

    /// Title text on the title slide: lower-middle band, 90% wide.
    pub fn cover_title() -> Self {
        Self::new(
            inches(0.5),
            inches(2.5),
            percent_of(SLIDE_WIDTH, 90),
            inches(2.0),
        )
    }

    /// Heading band at the top of a content slide.
    pub fn heading() -> Self {
        Self::new(
            inches(0.5),
            inches(0.5),
            percent_of(SLIDE_WIDTH, 90),
            inches(0.75),
        )
    }

    /// Bulleted body below the heading.
    pub fn body() -> Self {
        Self::new(
            inches(0.5),
            inches(1.5),
            percent_of(SLIDE_WIDTH, 90),
            percent_of(SLIDE_HEIGHT, 75),
        )
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

impl Align {
    pub(crate) fn as_xml(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
        }
    }
}

/// Vertical anchoring of text within its frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
}

impl Anchor {
    pub(crate) fn as_xml(&self) -> &'static str {
        match self {
            Self::Top => "t",
            Self::Middle => "ctr",
        }
    }
}

/// Font and color of a text box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    /// Font size in points.
    pub size: u32,
    pub bold: bool,
    /// RGB color as `RRGGBB`.
    pub color: String,
    pub align: Align,
    pub anchor: Anchor,
}

impl TextStyle {
    /// Size in hundredths of a point, as DrawingML expects.
    pub(crate) fn size_hundredths(&self) -> u32 {
        self.size * 100
    }
}

/// Colors and type sizes used by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Solid fill of the title slide when no cover image is given.
    pub cover_background: String,
    /// Solid fill of content slides when no content image is given.
    pub content_background: String,
    pub cover_title: TextStyle,
    pub heading: TextStyle,
    pub body: TextStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cover_background: "003366".to_string(),
            content_background: "F4F4F4".to_string(),
            cover_title: TextStyle {
                size: 48,
                bold: true,
                color: "FFFFFF".to_string(),
                align: Align::Center,
                anchor: Anchor::Middle,
            },
            heading: TextStyle {
                size: 36,
                bold: true,
                color: "003366".to_string(),
                align: Align::Left,
                anchor: Anchor::Middle,
            },
            body: TextStyle {
                size: 24,
                bold: false,
                color: "333333".to_string(),
                align: Align::Left,
                anchor: Anchor::Top,
            },
        }
    }
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the title slide fill. Accepts `RRGGBB` with or without `#`.
    pub fn with_cover_background(mut self, color: &str) -> Self {
        if let Some(color) = hex_color(color) {
            self.cover_background = color;
        } else {
            log::warn!("Ignoring invalid cover background color '{}'", color);
        }
        self
    }

    /// Override the content slide fill. Accepts `RRGGBB` with or without `#`.
    pub fn with_content_background(mut self, color: &str) -> Self {
        if let Some(color) = hex_color(color) {
            self.content_background = color;
        } else {
            log::warn!("Ignoring invalid content background color '{}'", color);
        }
        self
    }

    /// Override the body font size in points (at least 1).
    pub fn with_body_size(mut self, size: u32) -> Self {
        self.body.size = size.max(1);
        self
    }
}

/// Normalize a `RRGGBB` / `#RRGGBB` color to uppercase, or `None` if malformed.
pub fn hex_color(value: &str) -> Option<String> {
    let digits = value.trim().trim_start_matches('#');
    if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(digits.to_ascii_uppercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_is_16_by_9() {
        assert_eq!(SLIDE_WIDTH * 9, SLIDE_HEIGHT * 16);
        assert_eq!(inches(10.0), SLIDE_WIDTH);
        assert_eq!(inches(5.625), SLIDE_HEIGHT);
    }

    #[test]
    fn test_frames() {
        let title = Frame::cover_title();
        assert_eq!(title.x, 457_200);
        assert_eq!(title.cx, 8_229_600);
        // Centered horizontally: equal margins left and right
        assert_eq!(title.x * 2 + title.cx, SLIDE_WIDTH);

        let heading = Frame::heading();
        let body = Frame::body();
        assert!(heading.y + heading.cy <= body.y);
        assert_eq!(body.cy, 3_857_625);
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#003366"), Some("003366".to_string()));
        assert_eq!(hex_color("f4f4f4"), Some("F4F4F4".to_string()));
        assert_eq!(hex_color("red"), None);
        assert_eq!(hex_color("12345"), None);
    }

    #[test]
    fn test_options_builder() {
        let options = RenderOptions::new()
            .with_cover_background("#112233")
            .with_content_background("nope")
            .with_body_size(0);
        assert_eq!(options.cover_background, "112233");
        assert_eq!(options.content_background, "F4F4F4");
        assert_eq!(options.body.size, 1);
        assert_eq!(options.heading.size_hundredths(), 3600);
    }
}
