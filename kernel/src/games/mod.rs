//! Built-in programs reachable from the console

pub mod adventure;
