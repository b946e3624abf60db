use std::path::PathBuf;
use tokio::sync::mpsc;

/// Updates sent while a conversion runs
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    Preparing {
        total: usize,
    },
    Processing {
        current: usize,
        total: usize,
        message: Option<String>,
    },
    Writing {
        total: usize,
    },
    Completed {
        output_path: PathBuf,
    },
    Cancelled,
    Error {
        message: String,
    },
}

pub type ProgressSender = mpsc::UnboundedSender<ProgressUpdate>;

pub(crate) fn emit(progress: Option<&ProgressSender>, update: ProgressUpdate) {
    if let Some(tx) = progress {
        // A dropped receiver only means nobody is listening
        let _ = tx.send(update);
    }
}
