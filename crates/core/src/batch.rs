//! Batch driver: repeated outline generation and rendering.
//!
//! Iterations run strictly one after another. The first failure stops the
//! batch; documents produced before it are kept and handed back alongside
//! the failure.

use crate::error::{Error, Result};
use crate::image::ImageData;
use crate::normalize::OutlineNormalizer;
use crate::types::{BackgroundImages, Outline, RenderRequest, RenderedDocument};
use std::fmt;

/// The outline generation collaborator.
pub trait OutlineSource {
    /// Produce an outline for `topic` with (ideally) `slide_count` slides.
    fn generate(&mut self, topic: &str, slide_count: usize) -> Result<Outline>;
}

impl<F> OutlineSource for F
where
    F: FnMut(&str, usize) -> Result<Outline>,
{
    fn generate(&mut self, topic: &str, slide_count: usize) -> Result<Outline> {
        self(topic, slide_count)
    }
}

/// Turns an outline plus backgrounds into a packaged document.
pub trait DocumentRenderer {
    fn render(&self, request: RenderRequest<'_>) -> Result<RenderedDocument>;
}

/// Immutable configuration for one batch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Topic handed to the generation collaborator.
    pub topic: String,

    /// Requested content slides per deck.
    pub slide_count: usize,

    /// Number of decks to produce.
    pub file_count: usize,

    /// Backgrounds reused by every deck.
    pub images: BackgroundImages,
}

impl BatchConfig {
    /// A single-file batch with no background images.
    pub fn new(topic: impl Into<String>, slide_count: usize) -> Self {
        Self {
            topic: topic.into(),
            slide_count,
            file_count: 1,
            images: BackgroundImages::none(),
        }
    }

    pub fn with_file_count(mut self, file_count: usize) -> Self {
        self.file_count = file_count;
        self
    }

    pub fn with_cover_image(mut self, image: ImageData) -> Self {
        self.images.cover = Some(image);
        self
    }

    pub fn with_content_image(mut self, image: ImageData) -> Self {
        self.images.content = Some(image);
        self
    }
}

/// The iteration that stopped a batch.
#[derive(Debug)]
pub struct BatchFailure {
    /// 1-based index of the failed iteration.
    pub index: usize,

    /// Total iterations the batch was asked for.
    pub total: usize,

    pub error: Error,
}

impl fmt::Display for BatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "file {} of {} failed: {}",
            self.index, self.total, self.error
        )
    }
}

impl std::error::Error for BatchFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Documents produced by a batch, plus the failure that stopped it (if any).
#[derive(Debug)]
pub struct BatchOutcome {
    pub documents: Vec<RenderedDocument>,
    pub failure: Option<BatchFailure>,
}

impl BatchOutcome {
    /// Whether every requested document was produced.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Number of documents produced before the batch finished or failed.
    pub fn produced(&self) -> usize {
        self.documents.len()
    }

    /// Collapse into a plain result, discarding partial output on failure.
    pub fn into_result(self) -> std::result::Result<Vec<RenderedDocument>, BatchFailure> {
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.documents),
        }
    }
}

/// Run a batch of `config.file_count` generate-normalize-render iterations.
///
/// `on_progress` is called with `(current, total)` (1-based) before each
/// generation call. An empty or whitespace-only topic fails with
/// [`Error::EmptyTopic`] before anything is generated; otherwise the topic
/// reaches the source exactly as configured.
pub fn run_batch<S, R, P>(
    config: &BatchConfig,
    source: &mut S,
    renderer: &R,
    mut on_progress: P,
) -> Result<BatchOutcome>
where
    S: OutlineSource + ?Sized,
    R: DocumentRenderer + ?Sized,
    P: FnMut(usize, usize),
{
    let topic = config.topic.as_str();
    if topic.trim().is_empty() {
        return Err(Error::EmptyTopic);
    }

    let total = config.file_count;
    let normalizer = OutlineNormalizer::new(config.slide_count);
    let mut documents = Vec::with_capacity(total);

    log::info!(
        "Starting batch: topic '{}', {} slides, {} file(s)",
        topic,
        config.slide_count,
        total
    );

    let failure = (1..=total)
        .try_for_each(|index| -> std::result::Result<(), BatchFailure> {
            on_progress(index, total);

            let document = source
                .generate(topic, config.slide_count)
                .map_err(into_generation_error)
                .map(|outline| normalizer.normalize(outline))
                .and_then(|outline| renderer.render(RenderRequest::new(&outline, &config.images)))
                .map_err(|error| BatchFailure {
                    index,
                    total,
                    error,
                })?;

            log::debug!("File {} of {} rendered as '{}'", index, total, document.filename);
            documents.push(document);
            Ok(())
        })
        .err();

    match &failure {
        Some(failure) => log::warn!(
            "Batch stopped after {} of {} file(s): {}",
            documents.len(),
            total,
            failure
        ),
        None => log::info!("Batch finished: {} file(s)", documents.len()),
    }

    Ok(BatchOutcome { documents, failure })
}

/// Collaborator errors that are not already generation errors are wrapped.
fn into_generation_error(error: Error) -> Error {
    if error.is_generation_error() {
        error
    } else {
        Error::GenerationFailed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filename::derive_filename;
    use crate::types::Slide;
    use std::cell::Cell;

    /// Renders a textual summary instead of a real package.
    struct SummaryRenderer;

    impl DocumentRenderer for SummaryRenderer {
        fn render(&self, request: RenderRequest<'_>) -> Result<RenderedDocument> {
            let outline = request.outline;
            let summary = format!(
                "{}|{}|cover={}|content={}",
                outline.title,
                outline.deck_slide_count(),
                request.images.cover.is_some(),
                request.images.content.is_some()
            );
            Ok(RenderedDocument {
                filename: derive_filename(&outline.title),
                bytes: summary.into_bytes(),
            })
        }
    }

    fn outline_with(count: usize) -> Outline {
        (1..=count).fold(Outline::new("Sejarah AI"), |outline, i| {
            outline.with_slide(Slide::new(format!("Slide {}", i), ["point"]))
        })
    }

    #[test]
    fn test_truncates_each_outline() {
        let config = BatchConfig::new("Sejarah AI", 3);
        let mut source = |_: &str, _: usize| -> Result<Outline> { Ok(outline_with(5)) };

        let outcome = run_batch(&config, &mut source, &SummaryRenderer, |_, _| {}).unwrap();

        assert!(outcome.is_complete());
        assert_eq!(outcome.produced(), 1);
        assert_eq!(outcome.documents[0].filename, "sejarah ai.pptx");
        assert_eq!(
            outcome.documents[0].bytes,
            b"Sejarah AI|4|cover=false|content=false".to_vec()
        );
    }

    #[test]
    fn test_stops_on_first_failure_and_keeps_partial_output() {
        let config = BatchConfig::new("Sejarah AI", 3).with_file_count(3);
        let calls = Cell::new(0);
        let mut source = |_: &str, _: usize| -> Result<Outline> {
            calls.set(calls.get() + 1);
            if calls.get() == 2 {
                Err(Error::GenerationFailed("rate limited".to_string()))
            } else {
                Ok(outline_with(3))
            }
        };

        let outcome = run_batch(&config, &mut source, &SummaryRenderer, |_, _| {}).unwrap();

        assert_eq!(calls.get(), 2);
        assert_eq!(outcome.produced(), 1);
        let failure = outcome.failure.as_ref().unwrap();
        assert_eq!(failure.index, 2);
        assert_eq!(failure.total, 3);
        assert!(matches!(failure.error, Error::GenerationFailed(_)));
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_empty_topic_fails_before_generation() {
        let config = BatchConfig::new("   \t\n", 3).with_file_count(2);
        let calls = Cell::new(0);
        let mut source = |_: &str, _: usize| -> Result<Outline> {
            calls.set(calls.get() + 1);
            Ok(outline_with(3))
        };
        let progress = Cell::new(0);

        let result = run_batch(&config, &mut source, &SummaryRenderer, |_, _| {
            progress.set(progress.get() + 1)
        });

        assert!(matches!(result, Err(Error::EmptyTopic)));
        assert_eq!(calls.get(), 0);
        assert_eq!(progress.get(), 0);
    }

    #[test]
    fn test_topic_passed_to_source_untrimmed() {
        let config = BatchConfig::new("  Sejarah AI\n", 1);
        let seen = std::cell::RefCell::new(Vec::new());
        let mut source = |topic: &str, _: usize| -> Result<Outline> {
            seen.borrow_mut().push(topic.to_string());
            Ok(outline_with(1))
        };

        run_batch(&config, &mut source, &SummaryRenderer, |_, _| {}).unwrap();

        assert_eq!(seen.into_inner(), vec!["  Sejarah AI\n".to_string()]);
    }

    #[test]
    fn test_progress_reported_before_each_generation() {
        let config = BatchConfig::new("Sejarah AI", 2).with_file_count(3);
        let events = std::cell::RefCell::new(Vec::new());
        let mut source = |topic: &str, count: usize| -> Result<Outline> {
            events.borrow_mut().push(format!("generate {} {}", topic, count));
            Ok(outline_with(2))
        };

        let outcome = run_batch(&config, &mut source, &SummaryRenderer, |i, n| {
            events.borrow_mut().push(format!("progress {}/{}", i, n))
        })
        .unwrap();

        assert_eq!(outcome.produced(), 3);
        assert_eq!(
            events.into_inner(),
            vec![
                "progress 1/3",
                "generate Sejarah AI 2",
                "progress 2/3",
                "generate Sejarah AI 2",
                "progress 3/3",
                "generate Sejarah AI 2",
            ]
        );
    }

    #[test]
    fn test_images_reused_across_iterations() {
        let config = BatchConfig::new("Topic", 1)
            .with_file_count(2)
            .with_content_image(ImageData::from_bytes(vec![0xFF, 0xD8, 0xFF]));
        let mut source = |_: &str, _: usize| -> Result<Outline> { Ok(outline_with(1)) };

        let documents = run_batch(&config, &mut source, &SummaryRenderer, |_, _| {})
            .unwrap()
            .into_result()
            .unwrap();

        assert_eq!(documents.len(), 2);
        for document in documents {
            assert!(document.bytes.ends_with(b"cover=false|content=true"));
        }
    }

    #[test]
    fn test_render_failure_is_reported_with_index() {
        struct FailingRenderer;
        impl DocumentRenderer for FailingRenderer {
            fn render(&self, _: RenderRequest<'_>) -> Result<RenderedDocument> {
                Err(Error::ImageDecode("bad cover".to_string()))
            }
        }

        let config = BatchConfig::new("Topic", 1).with_file_count(2);
        let mut source = |_: &str, _: usize| -> Result<Outline> { Ok(outline_with(1)) };

        let outcome = run_batch(&config, &mut source, &FailingRenderer, |_, _| {}).unwrap();
        let failure = outcome.failure.unwrap();
        assert_eq!(failure.index, 1);
        assert!(matches!(failure.error, Error::ImageDecode(_)));
        assert!(outcome.documents.is_empty());
    }

    #[test]
    fn test_collaborator_io_error_becomes_generation_failed() {
        let config = BatchConfig::new("Topic", 1);
        let mut source = |_: &str, _: usize| -> Result<Outline> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "pipe closed").into())
        };

        let outcome = run_batch(&config, &mut source, &SummaryRenderer, |_, _| {}).unwrap();
        let failure = outcome.failure.unwrap();
        assert!(matches!(failure.error, Error::GenerationFailed(ref m) if m.contains("pipe closed")));
        assert_eq!(
            failure.to_string(),
            "file 1 of 1 failed: Outline generation failed: I/O error: pipe closed"
        );
    }

    #[test]
    fn test_invalid_outline_is_passed_through() {
        let config = BatchConfig::new("Topic", 1);
        let mut source = |_: &str, _: usize| Outline::from_json(r#"{"presentationTitle":"T","slides":{}}"#);

        let outcome = run_batch(&config, &mut source, &SummaryRenderer, |_, _| {}).unwrap();
        assert!(matches!(
            outcome.failure.map(|f| f.error),
            Some(Error::InvalidOutline(_))
        ));
    }

    #[test]
    fn test_zero_files_produces_nothing() {
        let config = BatchConfig::new("Topic", 3).with_file_count(0);
        let mut source = |_: &str, _: usize| -> Result<Outline> { unreachable!() };

        let outcome = run_batch(&config, &mut source, &SummaryRenderer, |_, _| {}).unwrap();
        assert!(outcome.is_complete());
        assert_eq!(outcome.produced(), 0);
    }
}
