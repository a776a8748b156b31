// klog/logger.rs
//
// `log::Log` implementation for the kernel.
// - Severity threshold lives in the facade (`log::max_level`).
// - Sink chosen at build time: COM1 serial, or nothing (records still counted).
// - No allocation, no locks beyond the serial port mutex.

use core::sync::atomic::{AtomicUsize, Ordering};

use cfg_if::cfg_if;
use log::{Level, LevelFilter, Log, Metadata, Record};

pub struct KernelLogger {
    emitted: AtomicUsize,
}

static LOGGER: KernelLogger = KernelLogger::new();

impl KernelLogger {
    const fn new() -> Self {
        Self { emitted: AtomicUsize::new(0) }
    }
}

impl Log for KernelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.emitted.fetch_add(1, Ordering::Relaxed);
        emit(record);
    }

    fn flush(&self) {}
}

cfg_if! {
    if #[cfg(feature = "utb-log-serial")] {
        fn emit(record: &Record) {
            crate::serial_println!("[{}] {}: {}", tag(record.level()), record.target(), record.args());
        }
    } else {
        fn emit(_record: &Record) {}
    }
}

/// Installs the kernel logger. Only the first call succeeds.
pub fn init(level: LevelFilter) -> Result<(), &'static str> {
    log::set_logger(&LOGGER).map_err(|_| "logger already installed")?;
    log::set_max_level(level);
    Ok(())
}

pub fn set_level(level: LevelFilter) {
    log::set_max_level(level);
}

pub fn level() -> LevelFilter {
    log::max_level()
}

/// Records that passed the level filter since boot.
pub fn records_emitted() -> usize {
    LOGGER.emitted.load(Ordering::Relaxed)
}

#[cfg_attr(not(feature = "utb-log-serial"), allow(dead_code))]
fn tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DBG",
        Level::Trace => "TRACE",
    }
}
