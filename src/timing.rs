//! Wall-clock logging for partitioning runs.
//!
//! `split_into_n` reports its total time at INFO and every planned split
//! reports its own time at DEBUG, so `RUST_LOG=debug` shows where a run
//! spends its time split by split.

use std::time::Instant;

/// Logs the elapsed time of a scope when dropped.
pub(crate) struct Timed {
    name: &'static str,
    start: Instant,
    level: log::Level,
}

impl Timed {
    /// Whole-run timer, logged at INFO.
    pub(crate) fn info(name: &'static str) -> Self {
        log::debug!("{} started", name);
        Self {
            name,
            start: Instant::now(),
            level: log::Level::Info,
        }
    }

    /// Per-split timer, logged at DEBUG.
    pub(crate) fn debug(name: &'static str) -> Self {
        log::trace!("{} started", name);
        Self {
            name,
            start: Instant::now(),
            level: log::Level::Debug,
        }
    }
}

impl Drop for Timed {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        log::log!(self.level, "{} took {:.2}ms", self.name, elapsed_ms);
    }
}
