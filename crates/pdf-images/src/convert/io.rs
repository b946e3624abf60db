//! Output file handling

use lopdf::Document;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

use crate::types::*;

/// Directory created under the documents folder for generated files
const OUTPUT_DIR_NAME: &str = "imgtopdf";
const FALLBACK_STEM: &str = "images";

/// Save the assembled document
pub async fn save_pdf(mut doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, ConvertError>(writer)
    })
    .await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

/// Decide where the PDF for `inputs` is written.
///
/// An explicit path is used as given, with its parent directory created. The
/// default is `<documents>/imgtopdf/<stem>-<digest>.pdf`, where the stem comes
/// from the first input and the digest from all input paths; a numeric suffix
/// is added until the name is unused.
pub async fn resolve_output_path(explicit: Option<&Path>, inputs: &[PathBuf]) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        return Ok(path.to_path_buf());
    }

    let dir = default_output_dir(inputs);
    tokio::fs::create_dir_all(&dir).await?;

    let stem = inputs
        .first()
        .and_then(|path| path.file_stem())
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| FALLBACK_STEM.to_string());
    let base = format!("{}-{}", stem, input_digest(inputs));

    let mut candidate = dir.join(format!("{}.pdf", base));
    let mut counter = 1;
    while tokio::fs::try_exists(&candidate).await? {
        candidate = dir.join(format!("{}-{}.pdf", base, counter));
        counter += 1;
    }

    log::debug!("Resolved output path {}", candidate.display());
    Ok(candidate)
}

fn default_output_dir(inputs: &[PathBuf]) -> PathBuf {
    let documents = directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(Path::to_path_buf));

    match documents {
        Some(dir) => dir.join(OUTPUT_DIR_NAME),
        None => {
            // No documents folder (headless systems): write next to the input
            let parent = inputs
                .first()
                .and_then(|path| path.parent())
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            parent.join(OUTPUT_DIR_NAME)
        }
    }
}

/// First eight hex digits of a SHA-256 over the input paths
fn input_digest(inputs: &[PathBuf]) -> String {
    let mut hasher = Sha256::new();
    for path in inputs {
        hasher.update(path.to_string_lossy().as_bytes());
        hasher.update([0u8]);
    }
    hasher
        .finalize()
        .iter()
        .take(4)
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
