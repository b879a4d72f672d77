use crate::OutputFormat;
use anyhow::{Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use urlperf_core::analysis::{ComparisonMetrics, StatusAnalyzer};
use urlperf_core::fetch::{FallbackTransport, HttpTransport, Transport};
use urlperf_core::target;
use urlperf_core::{AnalysisRecord, Sampler, SamplerConfig, Session, TimeoutPolicy};

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Options for one `analyze` invocation
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub iterations: usize,
    pub timeout: Duration,
    pub record_timeouts: bool,
    /// Relay base to fall back to when a direct request gets no response
    pub relay: Option<String>,
}

impl AnalyzeOptions {
    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            iterations: self.iterations,
            timeout: self.timeout,
            timeout_policy: if self.record_timeouts {
                TimeoutPolicy::RecordAttempt
            } else {
                TimeoutPolicy::AbortRun
            },
        }
    }
}

/// A URL whose analysis did not complete
#[derive(Debug, Clone, Serialize)]
pub struct UrlFailure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeReport {
    pub iterations: usize,
    pub analyses: Vec<AnalysisRecord>,
    pub failures: Vec<UrlFailure>,
    pub comparison: Option<ComparisonMetrics>,
}

/// Normalize and validate every URL up front so a typo fails fast
pub fn validate_urls(urls: &[String]) -> Result<Vec<String>> {
    urls.iter()
        .map(|raw| match target::validate(raw) {
            Ok(url) => Ok(url.to_string()),
            Err(e) => bail!("{}: {}", raw, e),
        })
        .collect()
}

pub fn build_transport(relay: Option<&str>) -> Result<Arc<dyn Transport>> {
    let direct: Arc<dyn Transport> = Arc::new(HttpTransport::new()?);

    Ok(match relay {
        Some(relay_base) => {
            tracing::debug!("Falling back to relay {}", relay_base);
            Arc::new(FallbackTransport::with_relay(direct, relay_base))
        }
        None => direct,
    })
}

/// Analyze each URL in order within one session.
///
/// A failing URL is reported and skipped; it does not stop the others.
pub async fn analyze_urls(urls: &[String], sampler: &Sampler) -> AnalyzeReport {
    let iterations = sampler.config().iterations;
    let mut session = Session::new();
    let mut failures = Vec::new();

    for url in urls {
        let spinner = progress_spinner(format!(
            "Running {} tests against {}, please wait...",
            iterations,
            target::display_host(url)
        ));

        let outcome = session.analyze(url, sampler).await;
        spinner.finish_and_clear();

        if let Err(e) = outcome {
            tracing::error!("Error analyzing {}: {}", url, e);
            failures.push(UrlFailure {
                url: url.clone(),
                error: e.to_string(),
            });
        }
    }

    AnalyzeReport {
        iterations,
        comparison: session.comparison(),
        analyses: session.records().to_vec(),
        failures,
    }
}

pub fn execute(urls: &[String], options: &AnalyzeOptions, format: OutputFormat) -> Result<()> {
    let targets = validate_urls(urls)?;

    tracing::info!(
        "Analyzing {} URL(s), {} iterations each",
        targets.len(),
        options.iterations
    );

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(async {
        let transport = build_transport(options.relay.as_deref())?;
        let sampler = Sampler::new(transport, options.sampler_config());
        Ok::<_, anyhow::Error>(analyze_urls(&targets, &sampler).await)
    })?;

    let output = match format {
        OutputFormat::Json => format_json(&report)?,
        OutputFormat::Table => format_table(&report),
        OutputFormat::Pretty => format_pretty(&report),
    };
    print!("{}", output);

    if report.analyses.is_empty() {
        bail!("No URL could be analyzed");
    }

    Ok(())
}

fn progress_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn format_ms(ms: f64) -> String {
    format!("{:.2}ms", ms)
}

/// Scale a byte count by 1024 up to GB, two decimals
pub fn format_size(bytes: f64) -> String {
    let mut size = bytes;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, SIZE_UNITS[unit])
}

/// Signed difference, `+` for positive values
pub fn format_diff(value: f64, is_size: bool) -> String {
    let prefix = if value > 0.0 { "+" } else if value < 0.0 { "-" } else { "" };
    let magnitude = if is_size {
        format_size(value.abs())
    } else {
        format_ms(value.abs())
    };
    format!("{}{}", prefix, magnitude)
}

pub fn format_pretty(report: &AnalyzeReport) -> String {
    use console::style;

    let mut output = String::new();

    output.push_str(&format!("\n{}\n", style("URL Performance Report").bold().cyan()));
    output.push_str(&format!("{}\n", style("======================").cyan()));
    output.push_str(&format!(
        "Each URL was requested {} times.\n",
        report.iterations
    ));

    for record in &report.analyses {
        let stats = &record.stats;

        output.push_str(&format!(
            "\n{} {}\n",
            style(format!("Results for {}", target::display_host(&record.url))).bold(),
            style(format!("({})", record.url)).dim()
        ));
        output.push_str(&format!(
            "  Analyzed:         {}\n",
            record.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("  Average:          {}\n", format_ms(stats.average)));
        output.push_str(&format!("  Min:              {}\n", format_ms(stats.min)));
        output.push_str(&format!("  Max:              {}\n", format_ms(stats.max)));
        output.push_str(&format!("  99th Percentile:  {}\n", format_ms(stats.p99)));
        output.push_str(&format!("  Avg Size:         {}\n", format_size(stats.average_size_bytes)));
        output.push_str(&format!(
            "  Total Size:       {}\n",
            format_size(stats.total_size_bytes as f64)
        ));

        output.push_str(&format!("\n  {}\n", style("HTTP Status Results:").bold()));
        for row in StatusAnalyzer::from_histogram(&stats.status_histogram, stats.sample_count) {
            let line = format!(
                "    {:<5} {:<22} {:<14} {:>4} requests  {:>5.1}% of total",
                row.status_code,
                row.name.unwrap_or("-"),
                row.category,
                row.count,
                row.percent
            );
            let line = match row.status_code {
                500.. => style(line).red(),
                400.. => style(line).color256(208),
                300.. => style(line).yellow(),
                200.. => style(line).green(),
                _ => style(line).blue(),
            };
            output.push_str(&format!("{}\n", line));
        }
    }

    if let (Some(metrics), [first, second, ..]) = (&report.comparison, report.analyses.as_slice()) {
        output.push_str(&format_comparison(metrics, first, second));
    }

    if !report.failures.is_empty() {
        output.push_str(&format!("\n{}\n", style("Errors:").bold().red()));
        for failure in &report.failures {
            output.push_str(&format!("  {} {}: {}\n", style("✗").red(), failure.url, failure.error));
        }
    }

    output.push('\n');
    output
}

fn format_comparison(
    metrics: &ComparisonMetrics,
    first: &AnalysisRecord,
    second: &AnalysisRecord,
) -> String {
    use console::style;

    let first_host = target::display_host(&first.url);
    let second_host = target::display_host(&second.url);

    let rows = [
        ("Average", first.stats.average, second.stats.average, metrics.average_diff, false),
        ("Min", first.stats.min, second.stats.min, metrics.min_diff, false),
        ("Max", first.stats.max, second.stats.max, metrics.max_diff, false),
        ("99th %", first.stats.p99, second.stats.p99, metrics.p99_diff, false),
        (
            "Avg Size",
            first.stats.average_size_bytes,
            second.stats.average_size_bytes,
            metrics.size_diff,
            true,
        ),
    ];

    let mut output = format!("\n{}\n", style("Performance Comparison").bold().cyan());
    output.push_str(&format!(
        "  {:<10} {:>20} {:>20} {:>14}\n",
        "Metric", first_host, second_host, "Difference"
    ));

    for (label, a, b, diff, is_size) in rows {
        let render = |v: f64| if is_size { format_size(v) } else { format_ms(v) };
        let diff_text = format!("{:>14}", format_diff(diff, is_size));
        let diff_text = if diff > 0.0 {
            style(diff_text).red()
        } else if diff < 0.0 {
            style(diff_text).green()
        } else {
            style(diff_text).dim()
        };
        output.push_str(&format!(
            "  {:<10} {:>20} {:>20} {}\n",
            label,
            render(a),
            render(b),
            diff_text
        ));
    }

    output
}

pub fn format_json(report: &AnalyzeReport) -> Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(report)?))
}

/// Quote a CSV field, doubling embedded quotes
fn csv_quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

pub fn format_table(report: &AnalyzeReport) -> String {
    let mut output = String::new();
    output.push_str(
        "URL,Average (ms),Min (ms),Max (ms),P99 (ms),Avg Size (bytes),Total Size (bytes),Statuses\n",
    );

    for record in &report.analyses {
        let stats = &record.stats;
        let statuses: Vec<String> = stats
            .status_histogram
            .iter()
            .map(|(code, count)| format!("{}:{}", code, count))
            .collect();
        output.push_str(&format!(
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{},{}\n",
            record.url,
            stats.average,
            stats.min,
            stats.max,
            stats.p99,
            stats.average_size_bytes,
            stats.total_size_bytes,
            statuses.join(";")
        ));
    }

    if let Some(metrics) = &report.comparison {
        output.push_str("\nMetric,Difference\n");
        output.push_str(&format!("Average (ms),{:.2}\n", metrics.average_diff));
        output.push_str(&format!("Min (ms),{:.2}\n", metrics.min_diff));
        output.push_str(&format!("Max (ms),{:.2}\n", metrics.max_diff));
        output.push_str(&format!("P99 (ms),{:.2}\n", metrics.p99_diff));
        output.push_str(&format!("Avg Size (bytes),{:.2}\n", metrics.size_diff));
    }

    for failure in &report.failures {
        output.push_str(&format!("{},error,{}\n", failure.url, csv_quote(&failure.error)));
    }

    output
}
