// Frameworks layer: command line, configuration, tracing and the entry point.

pub mod cli;
pub mod config;
pub mod runner;
