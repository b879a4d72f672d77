use crate::OutputFormat;
use anyhow::Result;
use urlperf_core::status::{STATUS_REFERENCE, StatusGroup};

pub fn execute(format: OutputFormat) -> Result<()> {
    tracing::debug!("Printing status code reference as {}", format.as_str());

    let output = match format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string_pretty(STATUS_REFERENCE)?),
        OutputFormat::Table => format_table(STATUS_REFERENCE),
        OutputFormat::Pretty => format_pretty(STATUS_REFERENCE),
    };
    print!("{}", output);

    Ok(())
}

pub fn format_pretty(groups: &[StatusGroup]) -> String {
    use console::style;

    let mut output = format!("\n{}\n", style("HTTP Status Codes Reference").bold().cyan());

    for group in groups {
        output.push_str(&format!(
            "\n{} {}\n",
            style(group.range).bold().blue(),
            style(group.category).bold()
        ));
        for info in group.codes {
            output.push_str(&format!("  {} {}\n", style(info.code).bold(), info.name));
            output.push_str(&format!("      {}\n", style(info.description).dim()));
        }
    }

    output.push('\n');
    output
}

pub fn format_table(groups: &[StatusGroup]) -> String {
    let mut output = String::from("Code,Name,Category,Description\n");
    for group in groups {
        for info in group.codes {
            output.push_str(&format!(
                "{},{},{},\"{}\"\n",
                info.code, info.name, group.category, info.description
            ));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_code() {
        let output = format_table(STATUS_REFERENCE);
        let expected: usize = STATUS_REFERENCE.iter().map(|g| g.codes.len()).sum();

        assert_eq!(output.lines().count(), expected + 1);
        assert!(output.contains("429,Too Many Requests,Client Error,"));
    }

    #[test]
    fn test_pretty_groups_by_range() {
        console::set_colors_enabled(false);

        let output = format_pretty(STATUS_REFERENCE);

        assert!(output.contains("5xx Server Error"));
        assert!(output.contains("  504 Gateway Timeout"));
    }
}
