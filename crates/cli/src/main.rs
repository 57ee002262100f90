//! CLI tool for turning a topic into PowerPoint decks.

mod source;

use anyhow::{bail, Context, Result};
use clap::Parser;
use deck_core::{run_batch, BatchConfig, ImageData, OutlineSource, RenderedDocument};
use deck_pptx::{layout::hex_color, DeckReader, PptxRenderer, RenderOptions};
use source::{CommandSource, JsonFileSource};
use std::fs;
use std::path::{Path, PathBuf};

/// Generate PowerPoint decks from a topic outline.
#[derive(Parser, Debug)]
#[command(name = "deckgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Presentation topic
    topic: String,

    /// Number of content slides per deck (1-10)
    #[arg(short, long, default_value = "3", value_parser = clap::value_parser!(u8).range(1..=10))]
    slides: u8,

    /// Number of decks to generate (1-10)
    #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u8).range(1..=10))]
    files: u8,

    /// Background image for the title slide
    #[arg(long)]
    cover: Option<PathBuf>,

    /// Background image for content slides
    #[arg(long)]
    content: Option<PathBuf>,

    /// Title slide fill when no cover image is given (RRGGBB)
    #[arg(long, value_parser = parse_color)]
    cover_color: Option<String>,

    /// Content slide fill when no content image is given (RRGGBB)
    #[arg(long, value_parser = parse_color)]
    content_color: Option<String>,

    /// Body text size in points
    #[arg(long, value_parser = clap::value_parser!(u32).range(8..=72))]
    body_size: Option<u32>,

    /// Read the outline from a JSON file
    #[arg(long, conflicts_with = "generator", required_unless_present = "generator")]
    outline: Option<PathBuf>,

    /// Outline generator command; topic and slide count are appended
    #[arg(long, num_args = 1.., allow_hyphen_values = true)]
    generator: Option<Vec<String>>,

    /// Output directory (default: current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Re-open each written file and check its slide count
    #[arg(long)]
    verify: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = build_config(&args)?;
    let mut source = build_source(&args)?;
    let output_dir = args.output.clone().unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let renderer = PptxRenderer::with_options(render_options(&args));
    let outcome = run_batch(&config, source.as_mut(), &renderer, |index, total| {
        if total > 1 {
            eprintln!("Generating file {} of {}", index, total);
        }
    })?;

    let mut written = 0;
    for document in &outcome.documents {
        let path = write_document(&output_dir, document)?;
        if args.verify {
            verify_document(&path, config.slide_count)?;
        }
        written += 1;
        println!("{}", path.display());
    }

    if let Some(failure) = outcome.failure {
        bail!("{} ({} of {} files written)", failure, written, failure.total);
    }

    if args.verbose {
        eprintln!("Wrote {} file(s) to {}", written, output_dir.display());
    }

    Ok(())
}

fn build_config(args: &Args) -> Result<BatchConfig> {
    let mut config = BatchConfig::new(args.topic.as_str(), usize::from(args.slides))
        .with_file_count(usize::from(args.files));

    if let Some(path) = &args.cover {
        config = config.with_cover_image(read_image(path)?);
    }
    if let Some(path) = &args.content {
        config = config.with_content_image(read_image(path)?);
    }

    Ok(config)
}

fn render_options(args: &Args) -> RenderOptions {
    let mut options = RenderOptions::new();
    if let Some(color) = &args.cover_color {
        options = options.with_cover_background(color);
    }
    if let Some(color) = &args.content_color {
        options = options.with_content_background(color);
    }
    if let Some(size) = args.body_size {
        options = options.with_body_size(size);
    }
    options
}

fn parse_color(value: &str) -> std::result::Result<String, String> {
    hex_color(value).ok_or_else(|| format!("'{}' is not an RRGGBB color", value))
}

fn build_source(args: &Args) -> Result<Box<dyn OutlineSource>> {
    if let Some(path) = &args.outline {
        return Ok(Box::new(JsonFileSource::new(path)));
    }

    let words = args.generator.as_deref().unwrap_or_default();
    let source = CommandSource::from_words(words)
        .ok_or_else(|| anyhow::anyhow!("--generator needs a command"))?;
    Ok(Box::new(source))
}

fn read_image(path: &Path) -> Result<ImageData> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let image = ImageData::from_bytes(bytes);
    image
        .format()
        .with_context(|| format!("Unsupported image {}", path.display()))?;
    Ok(image)
}

/// Write a deck without overwriting existing files.
fn write_document(dir: &Path, document: &RenderedDocument) -> Result<PathBuf> {
    let path = unique_path(dir, &document.filename);
    fs::write(&path, &document.bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::debug!("Wrote {} ({} bytes)", path.display(), document.bytes.len());
    Ok(path)
}

/// First free path among `name.pptx`, `name-2.pptx`, `name-3.pptx`, ...
fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, extension) = filename.rsplit_once('.').unwrap_or((filename, ""));
    (2..)
        .map(|n| {
            if extension.is_empty() {
                dir.join(format!("{}-{}", stem, n))
            } else {
                dir.join(format!("{}-{}.{}", stem, n, extension))
            }
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

fn verify_document(path: &Path, slide_count: usize) -> Result<()> {
    let file = fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let deck = DeckReader::new()
        .read(std::io::BufReader::new(file))
        .with_context(|| format!("Failed to read back {}", path.display()))?;

    if deck.slides.is_empty() || deck.slides.len() > slide_count + 1 {
        bail!(
            "{} has {} slides, expected a title slide plus at most {} content slides",
            path.display(),
            deck.slides.len(),
            slide_count
        );
    }

    log::info!("Verified {}: {} slides", path.display(), deck.slides.len());
    Ok(())
}
