//! UnderTheBoard OS kernel
//!
//! A freestanding x86_64 kernel skeleton:
//! - VGA text-mode console at `0xb8000` with wrap-around output
//! - "Security system" banner over a stored, unenforced privilege level
//! - Command console driven by a replayed keystroke script
//! - Scripted maze adventure behind the `game` command
//!
//! The library is `no_std`; host unit tests link `std` and drive the same
//! code through an in-memory text buffer.

#![cfg_attr(not(test), no_std)]

pub mod arch;
pub mod boot;
pub mod config;
#[cfg(feature = "utb-game")]
pub mod games;
pub mod klog;
pub mod security;
pub mod ui;

pub use boot::kernel_main;
