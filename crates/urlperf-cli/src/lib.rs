//! Command implementations behind the `urlperf` binary.

use clap::ValueEnum;

pub mod commands;

/// How reports are written to stdout
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human-readable sections
    Pretty,
    Json,
    /// Comma-separated rows
    Table,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Pretty => "pretty",
            OutputFormat::Json => "json",
            OutputFormat::Table => "table",
        }
    }
}
