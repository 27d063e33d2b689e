//! CLI binary for image-relevance.
//!
//! A thin shim over the library crate: each subcommand maps its flags to
//! a config, runs one entry point, and prints exactly one JSON document
//! on stdout. Exit code 0 on success, 1 on any failure.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use image_relevance::{
    analyze_directory, analyze_image, resize_for_ocr, resize_for_vlm, AnalysisConfig, BatchEntry,
    BatchProgressCallback, OcrProfile, ProgressCallback, VlmProfile,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────

/// Terminal progress for `analyze-dir`: a bar on stderr plus one line per
/// image. Entries arrive in sorted order, so the log reads top to bottom.
struct CliProgressCallback {
    bar: ProgressBar,
    failed: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self {
            bar,
            failed: AtomicUsize::new(0),
        })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_images: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>4}/{len} images  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        self.bar.set_length(total_images as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Analysing");
    }

    fn on_image_complete(&self, _index: usize, _total: usize, entry: &BatchEntry) {
        let name = entry
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let line = match (entry.analysis(), entry.error()) {
            (Some(a), _) if a.verdict.should_process() => format!(
                "  {} {:<40} {}",
                green("✓"),
                name,
                dim(&format!("{} {:.3}", a.verdict.category, a.verdict.overall_relevance))
            ),
            (Some(a), _) => format!(
                "  {} {:<40} {}",
                dim("·"),
                name,
                dim(&a.verdict.skip_reason.as_ref().map(|r| r.to_string()).unwrap_or_default())
            ),
            (None, Some(err)) => {
                self.failed.fetch_add(1, Ordering::SeqCst);
                format!("  {} {:<40} {}", red("✗"), name, red(&err.to_string()))
            }
            (None, None) => return,
        };
        self.bar.println(line);
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_images: usize, should_process: usize) {
        self.bar.finish_and_clear();
        let failed = self.failed.load(Ordering::SeqCst);
        eprintln!(
            "{} {}/{} images worth a VLM call{}",
            green("✔"),
            bold(&should_process.to_string()),
            total_images,
            if failed > 0 {
                format!("  ({} unreadable)", red(&failed.to_string()))
            } else {
                String::new()
            }
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Should this image go to the VLM?
  imgrel analyze figure.png

  # Triage every image extracted from a document
  imgrel analyze-dir ./extracted --min-relevance 0.4

  # Prepare a page scan for OCR (width capped at 4800px)
  imgrel resize-for-ocr page.png --output page-ocr.png

  # Prepare an image for a VLM (longest side capped at 2048px)
  imgrel resize-for-vlm figure.jpg --output figure-vlm.jpg --max-dimension 1024

OUTPUT:
  Every command prints one JSON document to stdout with a "success" field.
  Failures print {"success": false, "error": "..."} and exit with code 1.
  Logs and the progress bar go to stderr.
"#;

/// Decide which document images deserve a VLM call, and resize them.
#[derive(Parser, Debug)]
#[command(
    name = "imgrel",
    version,
    about = "Image relevance classification and adaptive resizing",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "IMGREL_VERBOSE")]
    verbose: bool,

    /// Suppress all stderr output except errors.
    #[arg(short, long, global = true, env = "IMGREL_QUIET")]
    quiet: bool,

    /// Disable the progress bar for directory scans.
    #[arg(long, global = true, env = "IMGREL_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Downscale an image so its width fits the OCR service.
    ResizeForOcr {
        /// Input image file.
        image: PathBuf,
        /// Where to write the resized image (format follows the extension).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Maximum output width in pixels.
        #[arg(long, default_value_t = image_relevance::config::OCR_MAX_WIDTH)]
        max_width: u32,
    },
    /// Downscale an image so its longest side fits a VLM.
    ResizeForVlm {
        /// Input image file.
        image: PathBuf,
        /// Where to write the resized image (format follows the extension).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Maximum output width and height in pixels.
        #[arg(long, default_value_t = image_relevance::config::VLM_MAX_DIMENSION)]
        max_dimension: u32,
    },
    /// Score one image and decide whether it is worth a VLM call.
    Analyze {
        /// Input image file.
        image: PathBuf,
    },
    /// Score every image in a directory.
    AnalyzeDir {
        /// Directory to scan (not recursive).
        directory: PathBuf,
        /// Relevance below which an image is skipped.
        #[arg(long, default_value_t = image_relevance::config::MIN_RELEVANCE_SCORE)]
        min_relevance: f64,
        /// Images decoded in parallel (default: available CPUs).
        #[arg(short, long, env = "IMGREL_CONCURRENCY")]
        concurrency: Option<usize>,
    },
}

/// Success envelope: `{"success": true, ...body}`.
#[derive(Serialize)]
struct Success<T: Serialize> {
    success: bool,
    #[serde(flatten)]
    body: T,
}

#[derive(Serialize)]
struct Failure {
    success: bool,
    error: String,
}

#[derive(Serialize)]
struct PathTagged<T: Serialize> {
    path: PathBuf,
    #[serde(flatten)]
    body: T,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar owns stderr during a scan; keep library INFO quiet
    // unless the user asked for detail.
    let show_progress =
        !cli.quiet && !cli.no_progress && matches!(cli.command, Command::AnalyzeDir { .. });
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, show_progress).await {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let failure = Failure {
                success: false,
                error: format!("{e:#}"),
            };
            match serde_json::to_string_pretty(&failure) {
                Ok(json) => println!("{json}"),
                Err(_) => println!("{{\"success\": false}}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Run the selected command and return its JSON document.
async fn run(cli: &Cli, show_progress: bool) -> Result<String> {
    match &cli.command {
        Command::ResizeForOcr {
            image,
            output,
            max_width,
        } => {
            let output = output
                .as_ref()
                .context("--output required for resize operations")?;
            let outcome = resize_for_ocr(image, output, &OcrProfile::new(*max_width))
                .context("Resize for OCR failed")?;
            to_json(&outcome)
        }
        Command::ResizeForVlm {
            image,
            output,
            max_dimension,
        } => {
            let output = output
                .as_ref()
                .context("--output required for resize operations")?;
            let outcome = resize_for_vlm(image, output, &VlmProfile::new(*max_dimension))
                .context("Resize for VLM failed")?;
            to_json(&outcome)
        }
        Command::Analyze { image } => {
            let config = AnalysisConfig::default();
            let analysis = analyze_image(image, &config).context("Analysis failed")?;
            to_json(&PathTagged {
                path: image.clone(),
                body: analysis.report(),
            })
        }
        Command::AnalyzeDir {
            directory,
            min_relevance,
            concurrency,
        } => {
            let mut builder = AnalysisConfig::builder().min_relevance(*min_relevance);
            if let Some(n) = concurrency {
                builder = builder.concurrency(*n);
            }
            if show_progress {
                let cb: ProgressCallback = CliProgressCallback::new();
                builder = builder.progress_callback(cb);
            }
            let config = builder.build().context("Invalid configuration")?;

            let report = analyze_directory(directory, &config)
                .await
                .context("Directory scan failed")?;
            to_json(&report)
        }
    }
}

fn to_json<T: Serialize>(body: &T) -> Result<String> {
    serde_json::to_string_pretty(&Success {
        success: true,
        body,
    })
    .context("Failed to serialise output")
}
