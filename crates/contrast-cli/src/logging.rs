use std::path::Path;

use anyhow::Context;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, LoggerHandle, Naming, opt_format};

/// Starts the global logger.
///
/// The level comes from `RUST_LOG` and defaults to `info`. Records go to
/// stderr, and with `log_dir` also to a rotated log file in that directory.
/// Logging stops when the returned handle is dropped.
pub(crate) fn init(log_dir: Option<&Path>) -> anyhow::Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str("info").context("Invalid log specification")?;
    let logger = match log_dir {
        Some(dir) => logger
            .log_to_file(FileSpec::default().directory(dir))
            .format_for_files(opt_format)
            .rotate(
                Criterion::Size(10 * 1024 * 1024),
                Naming::Numbers,
                Cleanup::KeepLogFiles(7),
            )
            .duplicate_to_stderr(Duplicate::All),
        None => logger.log_to_stderr(),
    };
    logger.start().context("Failed to start logger")
}
