use anyhow::Result;
use clap::Command;
use clap_complete::{Shell, generate};
use std::io;

/// Print a completion script for `urlperf` in the given shell's syntax.
///
/// The script covers every subcommand and flag of `cmd`, so it has to be
/// regenerated after upgrading.
pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    let bin_name = cmd.get_name().to_string();
    tracing::debug!("Generating {} completions for {}", shell, bin_name);
    generate(shell, cmd, bin_name, &mut io::stdout());
    Ok(())
}
