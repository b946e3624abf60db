//! Image to PDF conversion pipeline
//!
//! A conversion runs in four stages:
//! 1. Filter the selection down to supported files
//! 2. Decode, orient, resample and encode each image
//! 3. Lay the images out on pages and build the document
//! 4. Write the PDF to the resolved output path

mod assemble;
mod cancel;
mod inspect;
mod io;
mod metadata;
mod process;
mod progress;

pub use assemble::{DOCUMENT_TITLE, assemble_document};
pub use cancel::{CancellationToken, ConversionController};
pub use inspect::{ImageFileInfo, SUPPORTED_EXTENSIONS, inspect_files, is_supported};
pub use io::{resolve_output_path, save_pdf};
pub use metadata::read_resolution;
pub use process::{ProcessedImage, RasterData, process_image};
pub use progress::{ProgressSender, ProgressUpdate};

use std::path::PathBuf;
use std::time::Instant;

use crate::options::ConversionOptions;
use crate::types::*;
use progress::emit;

/// Convert `files` into a single PDF.
///
/// Files with unsupported extensions and files that fail to decode are
/// skipped and reported in the summary's warnings. The token is checked
/// before each image and once more before the document is written; a
/// cancelled conversion writes nothing.
pub async fn convert(
    files: &[PathBuf],
    options: &ConversionOptions,
    token: &CancellationToken,
    progress: Option<&ProgressSender>,
) -> Result<ConversionOutcome> {
    let result = convert_inner(files, options, token, progress).await;

    match &result {
        Ok(ConversionOutcome::Completed(summary)) => emit(
            progress,
            ProgressUpdate::Completed {
                output_path: summary.output_path.clone(),
            },
        ),
        Ok(ConversionOutcome::Cancelled) => {
            log::info!("Conversion cancelled");
            emit(progress, ProgressUpdate::Cancelled);
        }
        Err(e) => emit(
            progress,
            ProgressUpdate::Error {
                message: e.to_string(),
            },
        ),
    }

    result
}

async fn convert_inner(
    files: &[PathBuf],
    options: &ConversionOptions,
    token: &CancellationToken,
    progress: Option<&ProgressSender>,
) -> Result<ConversionOutcome> {
    let start = Instant::now();
    options.validate()?;

    emit(progress, ProgressUpdate::Preparing { total: files.len() });

    let valid: Vec<PathBuf> = files.iter().filter(|f| is_supported(f)).cloned().collect();
    let skipped = files.len() - valid.len();

    if valid.is_empty() {
        let message = if skipped > 0 {
            "No supported images found in selection."
        } else {
            "No input files provided."
        };
        return Err(ConvertError::EmptyInput(message.to_string()));
    }

    let mut warnings = Vec::new();
    if skipped > 0 {
        log::warn!("Skipping {} file(s) with unsupported extensions", skipped);
        warnings.push(format!(
            "{} file(s) skipped due to unsupported format.",
            skipped
        ));
    }

    let output_path = resolve_output_path(options.output_path.as_deref(), &valid).await?;

    let total = valid.len();
    let mut images = Vec::with_capacity(total);
    emit(
        progress,
        ProgressUpdate::Processing {
            current: 0,
            total,
            message: None,
        },
    );

    for (index, path) in valid.iter().enumerate() {
        if token.is_cancelled() {
            return Ok(ConversionOutcome::Cancelled);
        }

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let message = match process_image(path, options).await {
            Ok(image) => {
                log::debug!(
                    "{}: {}x{}px, {} bytes encoded",
                    name,
                    image.width,
                    image.height,
                    image.data.len()
                );
                images.push(image);
                format!("Processed {}", name)
            }
            Err(ConvertError::UnsupportedInput { reason, .. }) => {
                log::warn!("Skipping {}: {}", path.display(), reason);
                warnings.push(format!("Skipped {}: {}", name, reason));
                format!("Skipped {}", name)
            }
            Err(e) => return Err(e),
        };

        emit(
            progress,
            ProgressUpdate::Processing {
                current: index + 1,
                total,
                message: Some(message),
            },
        );
    }

    if images.is_empty() {
        return Err(ConvertError::EmptyInput(
            "No supported images found in selection.".to_string(),
        ));
    }

    emit(progress, ProgressUpdate::Writing { total });

    // Nothing awaits since the last image, so only a canceller on another
    // thread can be seen here
    if token.is_cancelled() {
        return Ok(ConversionOutcome::Cancelled);
    }

    let image_count = images.len();
    let assemble_options = options.clone();
    let doc =
        tokio::task::spawn_blocking(move || assemble_document(&images, &assemble_options)).await??;
    let pages = doc.get_pages().len();

    save_pdf(doc, &output_path).await?;

    log::info!(
        "Wrote {} page(s) with {} image(s) to {}",
        pages,
        image_count,
        output_path.display()
    );

    Ok(ConversionOutcome::Completed(ConversionSummary {
        output_path,
        warnings,
        duration: start.elapsed(),
        images: image_count,
        pages,
    }))
}
