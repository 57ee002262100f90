//! PPTX renderer: outline + backgrounds to a packaged deck.

use crate::layout::{Frame, RenderOptions};
use crate::parts;
use crate::slide::{Background, SlideBuilder};
use deck_core::{
    derive_filename, BackgroundImages, DocumentRenderer, Error, ImageData, ImageFormat, Outline,
    RenderRequest, RenderedDocument, Result,
};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

/// A background image stored once under `ppt/media/` and shared by every slide using it.
#[derive(Debug)]
struct MediaPart<'a> {
    /// Part name inside the package, e.g. `ppt/media/image1.png`.
    name: String,
    format: ImageFormat,
    data: &'a ImageData,
}

impl MediaPart<'_> {
    /// Target as seen from a slide part.
    fn slide_target(&self) -> String {
        format!("../{}", self.name.trim_start_matches("ppt/"))
    }
}

/// Renders outlines into PPTX decks on a 16:9 canvas.
#[derive(Debug, Clone, Default)]
pub struct PptxRenderer {
    options: RenderOptions,
}

impl PptxRenderer {
    /// Create a renderer with the default theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with custom colors and type sizes.
    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render an outline into PPTX bytes.
    ///
    /// Output is deterministic: the same outline and images always produce
    /// the same bytes.
    pub fn render_outline(&self, outline: &Outline, images: &BackgroundImages) -> Result<Vec<u8>> {
        let cover = match &images.cover {
            Some(image) => Some(media_part(image, 1)?),
            None => None,
        };

        // The content background is only embedded when some slide uses it
        let content = match &images.content {
            Some(image) if !outline.slides.is_empty() => match &cover {
                Some(cover) if cover.data == image => None,
                _ => Some(media_part(image, if cover.is_some() { 2 } else { 1 })?),
            },
            _ => None,
        };
        let content_target = match (&images.content, &content, &cover) {
            (Some(_), Some(content), _) => Some(content.slide_target()),
            // identical to the cover image, share its part
            (Some(_), None, Some(cover)) => Some(cover.slide_target()),
            _ => None,
        };

        let mut slides = Vec::with_capacity(outline.deck_slide_count());
        slides.push(self.cover_slide(outline, cover.as_ref().map(|c| c.slide_target())));
        for slide in &outline.slides {
            let background = match &content_target {
                Some(target) => Background::Image {
                    target: target.as_str(),
                },
                None => Background::Solid(&self.options.content_background),
            };
            let mut builder = SlideBuilder::new(background);
            builder.add_text("Title", Frame::heading(), &self.options.heading, &slide.title);
            builder.add_bullets("Content", Frame::body(), &self.options.body, &slide.points);
            slides.push(builder.finish());
        }

        let media: Vec<&MediaPart<'_>> = cover.iter().chain(content.iter()).collect();
        log::debug!(
            "Packaging '{}': {} slides, {} media part(s)",
            outline.title,
            slides.len(),
            media.len()
        );

        package(outline, &slides, &media)
    }

    fn cover_slide(&self, outline: &Outline, target: Option<String>) -> (String, String) {
        let background = match &target {
            Some(target) => Background::Image {
                target: target.as_str(),
            },
            None => Background::Solid(&self.options.cover_background),
        };
        let mut builder = SlideBuilder::new(background);
        builder.add_text(
            "Title",
            Frame::cover_title(),
            &self.options.cover_title,
            &outline.title,
        );
        builder.finish()
    }
}

impl DocumentRenderer for PptxRenderer {
    fn render(&self, request: RenderRequest<'_>) -> Result<RenderedDocument> {
        let bytes = self.render_outline(request.outline, request.images)?;
        Ok(RenderedDocument {
            filename: derive_filename(&request.outline.title),
            bytes,
        })
    }
}

/// Render a request with the default theme.
pub fn render(request: RenderRequest<'_>) -> Result<RenderedDocument> {
    PptxRenderer::new().render(request)
}

fn media_part(image: &ImageData, number: usize) -> Result<MediaPart<'_>> {
    let format = image.format()?;
    Ok(MediaPart {
        name: format!("ppt/media/image{}.{}", number, format.extension()),
        format,
        data: image,
    })
}

/// Write every part into the OPC container.
fn package(
    outline: &Outline,
    slides: &[(String, String)],
    media: &[&MediaPart<'_>],
) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    // Fixed timestamp keeps the archive reproducible
    let xml_options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(0o644);
    // Images are already compressed
    let media_options = xml_options.compression_method(CompressionMethod::Stored);

    let formats: Vec<ImageFormat> = media.iter().map(|m| m.format).collect();
    let slide_count = slides.len();

    let leading = [
        ("[Content_Types].xml", parts::content_types_xml(slide_count, &formats)),
        ("_rels/.rels", parts::root_rels_xml()),
        (parts::CORE_PROPS_PART, parts::core_props_xml(&outline.title)),
        (parts::APP_PROPS_PART, parts::app_props_xml(slide_count)),
        (parts::PRESENTATION_PART, parts::presentation_xml(slide_count)),
        (parts::PRESENTATION_RELS_PART, parts::presentation_rels_xml(slide_count)),
    ];
    for (name, xml) in &leading {
        write_part(&mut zip, name, xml.as_bytes(), xml_options)?;
    }

    for (index, (slide_xml, rels_xml)) in slides.iter().enumerate() {
        let number = index + 1;
        write_part(&mut zip, &parts::slide_part(number), slide_xml.as_bytes(), xml_options)?;
        write_part(&mut zip, &parts::slide_rels_part(number), rels_xml.as_bytes(), xml_options)?;
    }

    let shared = [
        (parts::SLIDE_MASTER_PART, parts::slide_master_xml()),
        (parts::SLIDE_MASTER_RELS_PART, parts::slide_master_rels_xml()),
        (parts::SLIDE_LAYOUT_PART, parts::slide_layout_xml()),
        (parts::SLIDE_LAYOUT_RELS_PART, parts::slide_layout_rels_xml()),
        (parts::THEME_PART, parts::theme_xml()),
        (parts::PRES_PROPS_PART, parts::pres_props_xml()),
        (parts::VIEW_PROPS_PART, parts::view_props_xml()),
        (parts::TABLE_STYLES_PART, parts::table_styles_xml()),
    ];
    for (name, xml) in &shared {
        write_part(&mut zip, name, xml.as_bytes(), xml_options)?;
    }

    for part in media {
        write_part(&mut zip, &part.name, part.data.as_bytes(), media_options)?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| Error::Zip(format!("Failed to finish archive: {}", e)))?;
    Ok(cursor.into_inner())
}

fn write_part(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    content: &[u8],
    options: FileOptions,
) -> Result<()> {
    zip.start_file(name, options)
        .map_err(|e| Error::Zip(format!("Failed to start '{}': {}", name, e)))?;
    zip.write_all(content)?;
    log::trace!("Wrote part '{}' ({} bytes)", name, content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::Slide;
    use std::io::Read;
    use zip::ZipArchive;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R'];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10, b'J', b'F', b'I', b'F'];

    fn sample_outline() -> Outline {
        Outline::new("Sejarah AI")
            .with_slide(Slide::new("Awal Mula", ["Alan Turing", "Dartmouth 1956"]))
            .with_slide(Slide::new("Era Modern", ["Deep learning"]))
            .with_slide(Slide::new("Masa Depan", Vec::<String>::new()))
    }

    /// Part names in archive order.
    fn part_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    fn read_part(bytes: &[u8], name: &str) -> Vec<u8> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = Vec::new();
        file.read_to_end(&mut content).unwrap();
        content
    }

    #[test]
    fn test_package_contains_all_parts() {
        let bytes = PptxRenderer::new()
            .render_outline(&sample_outline(), &BackgroundImages::none())
            .unwrap();
        let names = part_names(&bytes);

        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide4.xml",
            "ppt/slides/_rels/slide4.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "docProps/core.xml",
            "docProps/app.xml",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }
        assert!(!names.iter().any(|n| n == "ppt/slides/slide5.xml"));
        assert!(!names.iter().any(|n| n.starts_with("ppt/media/")));
        assert_eq!(names[0], "[Content_Types].xml");
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = PptxRenderer::new();
        let images = BackgroundImages::none().with_cover(ImageData::from_bytes(PNG.to_vec()));
        let first = renderer.render_outline(&sample_outline(), &images).unwrap();
        let second = renderer.render_outline(&sample_outline(), &images).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_images_stored_once_and_shared() {
        let images = BackgroundImages::none()
            .with_cover(ImageData::from_bytes(PNG.to_vec()))
            .with_content(ImageData::from_bytes(JPEG.to_vec()));
        let bytes = PptxRenderer::new()
            .render_outline(&sample_outline(), &images)
            .unwrap();
        let names = part_names(&bytes);

        let media: Vec<&String> = names
            .iter()
            .filter(|n| n.starts_with("ppt/media/"))
            .collect();
        assert_eq!(media, vec!["ppt/media/image1.png", "ppt/media/image2.jpeg"]);
        assert_eq!(read_part(&bytes, "ppt/media/image2.jpeg"), JPEG);

        let cover_rels = String::from_utf8(read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels")).unwrap();
        assert!(cover_rels.contains("../media/image1.png"));
        for number in 2..=4 {
            let rels = String::from_utf8(read_part(&bytes, &format!("ppt/slides/_rels/slide{}.xml.rels", number))).unwrap();
            assert!(rels.contains("../media/image2.jpeg"));
        }

        let content_types = String::from_utf8(read_part(&bytes, "[Content_Types].xml")).unwrap();
        assert!(content_types.contains(r#"Extension="png" ContentType="image/png""#));
        assert!(content_types.contains(r#"Extension="jpeg" ContentType="image/jpeg""#));
    }

    #[test]
    fn test_identical_cover_and_content_share_one_part() {
        let image = ImageData::from_bytes(PNG.to_vec());
        let images = BackgroundImages::none()
            .with_cover(image.clone())
            .with_content(image);
        let bytes = PptxRenderer::new()
            .render_outline(&sample_outline(), &images)
            .unwrap();

        let media: Vec<String> = part_names(&bytes)
            .into_iter()
            .filter(|n| n.starts_with("ppt/media/"))
            .collect();
        assert_eq!(media, vec!["ppt/media/image1.png"]);
        let rels = String::from_utf8(read_part(&bytes, "ppt/slides/_rels/slide3.xml.rels")).unwrap();
        assert!(rels.contains("../media/image1.png"));
    }

    #[test]
    fn test_content_image_skipped_without_content_slides() {
        let images = BackgroundImages::none().with_content(ImageData::from_bytes(b"junk".to_vec()));
        let bytes = PptxRenderer::new()
            .render_outline(&Outline::new("Only a title"), &images)
            .unwrap();
        assert!(!part_names(&bytes).iter().any(|n| n.starts_with("ppt/media/")));
    }

    #[test]
    fn test_malformed_image_fails() {
        let images = BackgroundImages::none().with_cover(ImageData::from_bytes(b"not an image".to_vec()));
        let err = PptxRenderer::new()
            .render_outline(&sample_outline(), &images)
            .unwrap_err();
        assert!(matches!(err, Error::ImageDecode(_)));
    }

    #[test]
    fn test_render_derives_filename() {
        let outline = sample_outline();
        let images = BackgroundImages::none();
        let document = render(RenderRequest::new(&outline, &images)).unwrap();
        assert_eq!(document.filename, "sejarah ai.pptx");
        assert!(document.bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn test_custom_background_colors() {
        let renderer = PptxRenderer::with_options(RenderOptions::new().with_cover_background("#101010"));
        let bytes = renderer
            .render_outline(&sample_outline(), &BackgroundImages::none())
            .unwrap();
        let cover = String::from_utf8(read_part(&bytes, "ppt/slides/slide1.xml")).unwrap();
        assert!(cover.contains(r#"<a:srgbClr val="101010"/>"#));
    }

    mod batch {
        use super::*;
        use crate::reader::{BackgroundSummary, DeckReader};
        use deck_core::{run_batch, BatchConfig};

        fn five_slide_outline(_topic: &str, _slide_count: usize) -> Result<Outline> {
            Ok((1..=5).fold(Outline::new("Sejarah AI"), |outline, n| {
                outline.with_slide(Slide::new(format!("Bagian {}", n), [format!("Poin {}", n)]))
            }))
        }

        #[test]
        fn test_batch_renders_requested_slide_count() {
            let config = BatchConfig::new("Sejarah AI", 3);
            let mut source = five_slide_outline;
            let outcome = run_batch(&config, &mut source, &PptxRenderer::new(), |_, _| {}).unwrap();

            assert!(outcome.is_complete());
            assert_eq!(outcome.documents.len(), 1);
            let document = &outcome.documents[0];
            assert_eq!(document.filename, "sejarah ai.pptx");

            let deck = DeckReader::new().read_bytes(&document.bytes).unwrap();
            assert_eq!(deck.slides.len(), 4);
            assert_eq!(deck.slides[0].texts(), vec!["Sejarah AI"]);
            assert_eq!(
                deck.slides[0].background,
                BackgroundSummary::Solid { color: "003366".to_string() }
            );
            for (n, slide) in deck.slides[1..].iter().enumerate() {
                let heading = format!("Bagian {}", n + 1);
                let point = format!("Poin {}", n + 1);
                assert_eq!(slide.texts(), vec![heading.as_str(), point.as_str()]);
                assert_eq!(
                    slide.background,
                    BackgroundSummary::Solid { color: "F4F4F4".to_string() }
                );
            }
        }

        #[test]
        fn test_batch_of_three_renders_three_decks() {
            let config = BatchConfig::new("Sejarah AI", 2).with_file_count(3);
            let mut source = five_slide_outline;
            let outcome = run_batch(&config, &mut source, &PptxRenderer::new(), |_, _| {}).unwrap();

            assert_eq!(outcome.produced(), 3);
            for document in &outcome.documents {
                let deck = DeckReader::new().read_bytes(&document.bytes).unwrap();
                assert_eq!(deck.slides.len(), 3);
            }
        }
    }
}
