use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Crates whose debug output is shown with `--verbose`
const OWN_TARGETS: &[&str] = &["pdf_images", "img2pdf"];

/// Logger writing timestamped lines to stderr
#[derive(Clone)]
pub struct CliLogger {
    level: LevelFilter,
    warnings: Arc<AtomicUsize>,
}

impl CliLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            warnings: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    /// Number of warnings logged so far
    pub fn warning_count(&self) -> usize {
        self.warnings.load(Ordering::Relaxed)
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        // Other crates only get through with warnings and errors
        metadata.level() <= Level::Warn
            || OWN_TARGETS
                .iter()
                .any(|target| metadata.target().starts_with(target))
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if record.level() == Level::Warn {
            self.warnings.fetch_add(1, Ordering::Relaxed);
        }

        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{} {:<5}] {}",
            Local::now().format("%H:%M:%S"),
            record.level(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
