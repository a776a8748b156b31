//! Text UI: input sources and the command console

pub mod cli;
pub mod input;
