mod logger;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use logger::CliLogger;
use pdf_images::{ConversionController, ConversionOptions, ConversionOutcome, ProgressUpdate};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "img2pdf", about = "Lay out images on PDF pages", version)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert images into a single PDF
    Convert {
        /// Input image file(s)
        #[arg(short, long, required = true, num_args = 1..)]
        input: Vec<PathBuf>,

        /// Output PDF file (defaults to a generated name in the documents folder)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Base options as JSON; other flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the effective options to a JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Page size
        #[arg(long, value_enum)]
        page_size: Option<PageSizeArg>,

        /// Custom page width in mm (with --page-size custom)
        #[arg(long)]
        custom_width_mm: Option<f32>,

        /// Custom page height in mm (with --page-size custom)
        #[arg(long)]
        custom_height_mm: Option<f32>,

        /// Images per page
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,

        /// Scaling mode
        #[arg(long, value_enum)]
        scaling: Option<ScalingArg>,

        /// Page margin in inches
        #[arg(long)]
        margin: Option<f32>,

        /// Resolution assumed for images without one
        #[arg(long)]
        source_dpi: Option<f32>,

        /// Downsample oversized images to this resolution
        #[arg(long)]
        target_dpi: Option<f32>,

        /// JPEG quality (1-100)
        #[arg(long)]
        quality: Option<u8>,

        /// Omit producer and creation date from the document info
        #[arg(long)]
        no_metadata: bool,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },

    /// Show what is known about input images
    Inspect {
        /// Input image file(s)
        #[arg(required = true, num_args = 1..)]
        input: Vec<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PageSizeArg {
    A4,
    A3,
    Letter,
    Legal,
    Custom,
    Original,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    One,
    Two,
    Four,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScalingArg {
    FitPage,
    FitWidth,
    Original,
}

impl From<PageSizeArg> for pdf_images::PageSizePreset {
    fn from(arg: PageSizeArg) -> Self {
        match arg {
            PageSizeArg::A4 => Self::A4,
            PageSizeArg::A3 => Self::A3,
            PageSizeArg::Letter => Self::Letter,
            PageSizeArg::Legal => Self::Legal,
            PageSizeArg::Custom => Self::Custom,
            PageSizeArg::Original => Self::Original,
        }
    }
}

impl From<LayoutArg> for pdf_images::LayoutPreset {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::One => Self::One,
            LayoutArg::Two => Self::Two,
            LayoutArg::Four => Self::Four,
        }
    }
}

impl From<ScalingArg> for pdf_images::ScalingMode {
    fn from(arg: ScalingArg) -> Self {
        match arg {
            ScalingArg::FitPage => Self::FitPage,
            ScalingArg::FitWidth => Self::FitWidth,
            ScalingArg::Original => Self::OriginalSize,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else if cli.quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    let logger = CliLogger::new(level);
    logger
        .clone()
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            save_config,
            page_size,
            custom_width_mm,
            custom_height_mm,
            layout,
            scaling,
            margin,
            source_dpi,
            target_dpi,
            quality,
            no_metadata,
            stats_only,
        } => {
            let mut options = match &config {
                Some(path) => ConversionOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => ConversionOptions::default(),
            };

            // Flags override the config file
            if let Some(page_size) = page_size {
                options.page_size = page_size.into();
            }
            if custom_width_mm.is_some() {
                options.custom_width_mm = custom_width_mm;
            }
            if custom_height_mm.is_some() {
                options.custom_height_mm = custom_height_mm;
            }
            if let Some(layout) = layout {
                options.page_layout = layout.into();
            }
            if let Some(scaling) = scaling {
                options.scaling = scaling.into();
            }
            if let Some(margin) = margin {
                options.margin_in = margin;
            }
            if source_dpi.is_some() {
                options.source_dpi = source_dpi;
            }
            if target_dpi.is_some() {
                options.target_dpi = target_dpi;
            }
            if let Some(quality) = quality {
                options.quality = quality;
            }
            if no_metadata {
                options.preserve_metadata = false;
            }
            if output.is_some() {
                options.output_path = output;
            }

            options.validate()?;

            if let Some(path) = &save_config {
                options
                    .save(path)
                    .await
                    .with_context(|| format!("Failed to save {}", path.display()))?;
                println!("Saved options → {}", path.display());
            }

            if stats_only {
                return print_statistics(&input, &options).await;
            }

            run_conversion(&input, &options, &logger).await?;
        }

        Commands::Inspect { input } => {
            for info in pdf_images::inspect_files(&input).await {
                let dims = match (info.width, info.height) {
                    (Some(w), Some(h)) => format!("{}x{}px", w, h),
                    _ => "?".to_string(),
                };
                let dpi = info
                    .dpi
                    .map(|dpi| format!("{:.0} ppi", dpi))
                    .unwrap_or_else(|| "no resolution".to_string());
                println!(
                    "{} ({}, {} bytes): {}, {}",
                    info.name, info.format, info.size, dims, dpi
                );
                if let Some(warning) = &info.warning {
                    println!("  warning: {}", warning);
                }
                if let Some(error) = &info.error {
                    println!("  error: {}", error);
                }
            }
        }
    }

    Ok(())
}

/// Page counts plus the planned layout, without decoding any pixels
async fn print_statistics(input: &[PathBuf], options: &ConversionOptions) -> Result<()> {
    let infos = pdf_images::inspect_files(input).await;
    let images: Vec<_> = infos
        .iter()
        .filter(|info| info.supported)
        .filter_map(|info| info.source_image())
        .collect();

    let stats = pdf_images::calculate_statistics(images.len(), options)?;
    println!("Conversion Statistics:");
    println!("  Images: {}", stats.images);
    println!("  Images per page: {}", stats.images_per_page);
    println!("  Pages: {}", stats.pages);
    println!("  Images on last page: {}", stats.last_page_images);

    let skipped = input.len() - images.len();
    if skipped > 0 {
        println!("  Skipped files: {}", skipped);
    }

    for (index, page) in pdf_images::plan_pages(&images, options)?.iter().enumerate() {
        println!(
            "  Page {}: {:.1} x {:.1}pt, {} image(s)",
            index + 1,
            page.size.width,
            page.size.height,
            page.images.len()
        );
    }

    Ok(())
}

async fn run_conversion(
    input: &[PathBuf],
    options: &ConversionOptions,
    logger: &CliLogger,
) -> Result<()> {
    let controller = Arc::new(ConversionController::new());
    let (tx, mut rx) = mpsc::unbounded_channel();

    let reporter = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            match update {
                ProgressUpdate::Preparing { total } => {
                    log::info!("Preparing {} file(s)", total);
                }
                ProgressUpdate::Processing {
                    current,
                    total,
                    message: Some(message),
                } => {
                    log::info!("[{}/{}] {}", current, total, message);
                }
                ProgressUpdate::Writing { total } => {
                    log::info!("Writing PDF for {} file(s)", total);
                }
                _ => {}
            }
        }
    });

    let interrupt = {
        let controller = controller.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted");
                controller.cancel();
            }
        })
    };

    let outcome = controller.run(input, options, Some(&tx)).await;
    interrupt.abort();
    drop(tx);
    reporter.await?;

    match outcome? {
        ConversionOutcome::Completed(summary) => {
            for warning in &summary.warnings {
                println!("warning: {}", warning);
            }
            println!(
                "Converted {} image(s) onto {} page(s) in {:.2}s → {}",
                summary.images,
                summary.pages,
                summary.duration.as_secs_f64(),
                summary.output_path.display()
            );
            if logger.warning_count() > 0 {
                println!("{} warning(s) logged above", logger.warning_count());
            }
        }
        ConversionOutcome::Cancelled => {
            println!("Conversion cancelled, nothing written");
        }
    }

    Ok(())
}
