use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::time::Duration;
use urlperf_cli::OutputFormat;
use urlperf_cli::commands;
use urlperf_cli::commands::analyze::AnalyzeOptions;
use urlperf_core::fetch::DEFAULT_RELAY_URL;

#[derive(Parser)]
#[command(name = "urlperf")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Measure and compare round-trip HTTP performance of URLs",
    long_about = "urlperf requests each URL a fixed number of times, one request at a time, \
                  and reports average, min, max and 99th percentile latency, response sizes \
                  and status codes. With two or more URLs it also compares the first two."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample one or more URLs and report their statistics
    Analyze {
        /// URLs to analyze; https:// is assumed when no scheme is given
        #[arg(value_name = "URL", required = true, num_args = 1..)]
        urls: Vec<String>,

        /// Number of sequential requests per URL
        #[arg(short = 'n', long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
        iterations: u64,

        /// Per-request timeout in milliseconds
        #[arg(long, default_value_t = 10_000, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_ms: u64,

        /// Retry unreachable requests through the default relay
        #[arg(long)]
        relay: bool,

        /// Retry unreachable requests through this relay base URL
        #[arg(long, value_name = "URL")]
        relay_url: Option<String>,

        /// Record timed out requests as samples instead of aborting the URL
        #[arg(long)]
        record_timeouts: bool,
    },

    /// Show a reference of common HTTP status codes
    StatusCodes,

    /// Generate shell completion scripts
    #[command(after_help = "SUPPORTED SHELLS:\n  bash, zsh, fish, powershell, elvish\n\n\
                            INSTALLATION:\n  bash: urlperf completion --shell bash >> ~/.bashrc\n  \
                            zsh:  urlperf completion --shell zsh > \"${fpath[1]}/_urlperf\"")]
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            urls,
            iterations,
            timeout_ms,
            relay,
            relay_url,
            record_timeouts,
        } => {
            let relay = relay_url.or_else(|| relay.then(|| DEFAULT_RELAY_URL.to_string()));
            let options = AnalyzeOptions {
                iterations: iterations as usize,
                timeout: Duration::from_millis(timeout_ms),
                record_timeouts,
                relay,
            };
            commands::analyze::execute(&urls, &options, cli.format)
        }
        Commands::StatusCodes => commands::status_codes::execute(cli.format),
        Commands::Completion { shell } => commands::completion::execute(shell, &mut Cli::command()),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("urlperf=debug,urlperf_core=debug,urlperf_cli=debug")
    } else {
        EnvFilter::new("urlperf=info,urlperf_core=info,urlperf_cli=info")
    };

    // Logs go to stderr so JSON and table output stay machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
