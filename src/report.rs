use std::{fmt::Write as _, path::Path};

use chrono::NaiveDateTime;

use crate::{
    importer::ImportArtifacts, model::ImportError, sql::TIMESTAMP_FORMAT, stats::RunStatistics,
};

const SEPARATOR_WIDTH: usize = 80;

pub fn render_error_report(
    source: &str,
    stats: &RunStatistics,
    errors: &[ImportError],
    generated_at: NaiveDateTime,
) -> String {
    let mut output = String::new();
    let title = "IMPORT ERROR REPORT";
    let _ = writeln!(output, "{title}");
    let _ = writeln!(output, "{}", "=".repeat(title.len()));
    let _ = writeln!(output, "Date: {}", generated_at.format(TIMESTAMP_FORMAT));
    let _ = writeln!(output, "CSV file: {source}");
    output.push('\n');

    output.push_str("STATISTICS:\n");
    for (label, value) in stats.entries() {
        let _ = writeln!(output, "- {label}: {value}");
    }
    output.push('\n');

    output.push_str("ERROR DETAILS:\n");
    if errors.is_empty() {
        output.push_str("No errors were found during the import.\n");
        return output;
    }
    for error in errors {
        let _ = writeln!(output, "\n{error}");
        let _ = writeln!(output, "Data: {}", error.raw_row);
        let _ = writeln!(output, "{}", "-".repeat(SEPARATOR_WIDTH));
    }
    output
}

/// Console summary printed after a successful run.
pub fn render_summary(artifacts: &ImportArtifacts, run_log: &Path) -> String {
    let banner = "=".repeat(60);
    let mut pairs = vec![
        (
            "customers.sql".to_string(),
            artifacts.customers_sql.display().to_string(),
        ),
        (
            "accounts.sql".to_string(),
            artifacts.accounts_sql.display().to_string(),
        ),
        (
            "Error report".to_string(),
            artifacts.error_report.display().to_string(),
        ),
        ("Run log".to_string(), run_log.display().to_string()),
    ];
    pairs.extend(
        artifacts
            .stats
            .entries()
            .iter()
            .map(|(label, value)| (label.to_string(), value.to_string())),
    );
    format!(
        "\n{banner}\nIMPORT COMPLETED\n{banner}\n{}",
        render_pairs(&pairs)
    )
}

/// Renders label/value pairs as two aligned columns.
pub fn render_pairs(pairs: &[(String, String)]) -> String {
    let width = pairs
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);
    let mut output = String::new();
    for (label, value) in pairs {
        let padding = width - label.chars().count();
        let _ = writeln!(output, "{label}{}  {value}", " ".repeat(padding));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ErrorCategory;
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 15)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn report_lists_each_error_with_raw_row() {
        let stats = RunStatistics {
            total_rows: 2,
            processed_rows: 1,
            unique_customers: 1,
            total_accounts: 1,
            errors: 1,
        };
        let errors = vec![ImportError {
            line_number: 3,
            category: ErrorCategory::AccountValidation,
            message: "Negative balance not allowed: -5".to_string(),
            raw_row: "1,Ana,Dir,Tel,ana1,pass123,11,checking,-5".to_string(),
        }];
        let report = render_error_report("data.csv", &stats, &errors, generated_at());

        assert!(report.starts_with("IMPORT ERROR REPORT\n===================\n"));
        assert!(report.contains("Date: 2025-09-15 08:30:00\nCSV file: data.csv\n"));
        assert!(report.contains("- Total rows read: 2\n"));
        assert!(report.contains("- Errors found: 1\n"));
        assert!(report.contains(
            "\nLine 3 - account_validation: Negative balance not allowed: -5\nData: 1,Ana,Dir,Tel,ana1,pass123,11,checking,-5\n"
        ));
        assert!(report.trim_end().ends_with(&"-".repeat(80)));
    }

    #[test]
    fn report_without_errors_says_so() {
        let report = render_error_report("data.csv", &RunStatistics::default(), &[], generated_at());
        assert!(report.ends_with("ERROR DETAILS:\nNo errors were found during the import.\n"));
    }

    #[test]
    fn summary_lists_artifacts_and_statistics() {
        let artifacts = ImportArtifacts {
            customers_sql: "out/customers.sql".into(),
            accounts_sql: "out/accounts.sql".into(),
            error_report: "out/import_errors.txt".into(),
            stats: RunStatistics {
                total_rows: 4,
                processed_rows: 3,
                unique_customers: 2,
                total_accounts: 3,
                errors: 1,
            },
        };
        let summary = render_summary(&artifacts, Path::new("out/import.log"));
        assert!(summary.contains("IMPORT COMPLETED"));
        assert!(summary.contains("customers.sql      out/customers.sql\n"));
        assert!(summary.contains("Run log            out/import.log\n"));
        assert!(summary.contains("Unique customers   2\n"));
    }

    #[test]
    fn pairs_are_aligned_on_the_longest_label() {
        let rendered = render_pairs(&[
            ("a".to_string(), "1".to_string()),
            ("longer".to_string(), "2".to_string()),
        ]);
        assert_eq!(rendered, "a       1\nlonger  2\n");
    }
}
