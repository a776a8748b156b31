//! UnderTheBoard Logging Subsystem
//!
//! Kernel-side backend for the `log` facade. Subsystems use `log::info!`
//! and friends; records go out over COM1 when `utb-log-serial` is on.

pub mod logger;

pub use logger::{
    KernelLogger,
    init,
    level,
    set_level,
    records_emitted,
};
