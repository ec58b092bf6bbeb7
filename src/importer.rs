//! The CSV-to-SQL import pipeline.
//!
//! [`Importer::process_path`] reads the whole input into memory and partitions
//! its rows into accepted customers, accepted accounts and rejected rows.
//! [`write_artifacts`] then renders `customers.sql`, `accounts.sql` and
//! `import_errors.txt` from that outcome without re-validating anything.
//!
//! Row-level problems are recorded as [`ImportError`]s and never stop the run.
//! A missing file, missing headers or an unreadable row abort the run with a
//! [`RunError`] before any artifact is written.

use std::{
    collections::HashSet,
    io::{self, Read},
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::NaiveDateTime;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;
use thiserror::Error;

use crate::{
    io_utils,
    model::{AccountRecord, CustomerRecord, ErrorCategory, ImportError},
    report,
    sink::EventSink,
    sql,
    stats::RunStatistics,
    validate::{HeaderIndex, validate_account, validate_customer},
};

pub const CUSTOMERS_FILE: &str = "customers.sql";
pub const ACCOUNTS_FILE: &str = "accounts.sql";
pub const ERROR_REPORT_FILE: &str = "import_errors.txt";
pub const RUN_LOG_FILE: &str = "import.log";

#[derive(Debug, Error)]
pub enum RunError {
    #[error("CSV file not found: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("Failed to open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Missing headers in CSV: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),
    #[error("Error reading CSV at line {line}: {message}")]
    Read { line: usize, message: String },
}

#[derive(Debug, Clone, Copy)]
pub struct ImportOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_CSV_DELIMITER,
            encoding: UTF_8,
        }
    }
}

/// Everything one run produced, ready for rendering.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub source: String,
    pub customers: Vec<CustomerRecord>,
    pub accounts: Vec<AccountRecord>,
    pub errors: Vec<ImportError>,
    pub stats: RunStatistics,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportArtifacts {
    pub customers_sql: PathBuf,
    pub accounts_sql: PathBuf,
    pub error_report: PathBuf,
    pub stats: RunStatistics,
}

pub struct Importer<'a> {
    options: ImportOptions,
    sink: &'a dyn EventSink,
}

impl<'a> Importer<'a> {
    pub fn new(options: ImportOptions, sink: &'a dyn EventSink) -> Self {
        Self { options, sink }
    }

    pub fn process_path(&self, path: &Path) -> Result<ImportOutcome, RunError> {
        let source = path.display().to_string();
        let file = io_utils::open_input_file(path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                RunError::FileNotFound(path.to_path_buf())
            } else {
                RunError::Open {
                    path: path.to_path_buf(),
                    source: err,
                }
            }
        });
        let outcome = file.and_then(|file| self.process_reader(file, &source));
        if let Err(err) = &outcome {
            self.sink.error(&format!("Import failed: {err}"));
        }
        outcome
    }

    pub fn process_reader<R: Read>(
        &self,
        reader: R,
        source: &str,
    ) -> Result<ImportOutcome, RunError> {
        self.sink.info(&format!("Starting processing of {source}"));
        let ImportOptions {
            delimiter,
            encoding,
        } = self.options;

        let mut reader = io_utils::open_csv_reader(reader, delimiter);
        let headers =
            io_utils::reader_headers(&mut reader, encoding).map_err(|err| RunError::Read {
                line: 1,
                message: err.to_string(),
            })?;
        let index = HeaderIndex::from_headers(&headers).map_err(RunError::MissingHeaders)?;

        let mut state = RunState::new(delimiter, self.sink);
        for (row_idx, record) in reader.byte_records().enumerate() {
            let line_number = row_idx + 2;
            let record = record.map_err(|err| RunError::Read {
                line: line_number,
                message: err.to_string(),
            })?;
            let fields =
                io_utils::decode_record(&record, encoding).map_err(|err| RunError::Read {
                    line: line_number,
                    message: err.to_string(),
                })?;
            state.ingest(line_number, &index, &fields);
        }

        let outcome = state.finish(source);
        self.sink.info(&format!(
            "Processing completed. Statistics: {}",
            serde_json::to_string(&outcome.stats).unwrap_or_default()
        ));
        Ok(outcome)
    }

    /// Processes `input` and writes all three artifacts into `output_dir`.
    pub fn run(
        &self,
        input: &Path,
        output_dir: &Path,
        generated_at: NaiveDateTime,
    ) -> Result<ImportArtifacts> {
        let outcome = self.process_path(input)?;
        let artifacts = write_artifacts(&outcome, output_dir, generated_at, self.sink)
            .inspect_err(|err| self.sink.error(&format!("Import failed: {err:#}")))?;
        self.sink.info("Import completed successfully");
        Ok(artifacts)
    }
}

struct RunState<'a> {
    delimiter: u8,
    sink: &'a dyn EventSink,
    customers: Vec<CustomerRecord>,
    customer_ids: HashSet<i64>,
    usernames_seen: HashSet<String>,
    accounts: Vec<AccountRecord>,
    errors: Vec<ImportError>,
    stats: RunStatistics,
}

impl<'a> RunState<'a> {
    fn new(delimiter: u8, sink: &'a dyn EventSink) -> Self {
        Self {
            delimiter,
            sink,
            customers: Vec::new(),
            customer_ids: HashSet::new(),
            usernames_seen: HashSet::new(),
            accounts: Vec::new(),
            errors: Vec::new(),
            stats: RunStatistics::default(),
        }
    }

    fn ingest(&mut self, line_number: usize, index: &HeaderIndex, fields: &[String]) {
        self.stats.total_rows += 1;
        let row = index.row(fields);

        let customer = match validate_customer(&row) {
            Ok(customer) => customer,
            Err(err) => {
                self.reject(
                    line_number,
                    ErrorCategory::CustomerValidation,
                    err.to_string(),
                    fields,
                );
                return;
            }
        };

        if self.usernames_seen.contains(&customer.username) {
            let message = format!("Duplicate username: {}", customer.username);
            self.reject(
                line_number,
                ErrorCategory::DuplicateUsername,
                message,
                fields,
            );
            return;
        }

        let account = match validate_account(&row) {
            Ok(account) => account,
            Err(err) => {
                self.reject(
                    line_number,
                    ErrorCategory::AccountValidation,
                    err.to_string(),
                    fields,
                );
                return;
            }
        };

        // The customer only registers once the whole row is valid; a later
        // row with a known id keeps the first-seen values.
        if self.customer_ids.insert(customer.customer_id) {
            self.usernames_seen.insert(customer.username.clone());
            self.customers.push(customer);
            self.stats.unique_customers += 1;
        }
        self.accounts.push(account);
        self.stats.total_accounts += 1;
        self.stats.processed_rows += 1;
    }

    fn reject(
        &mut self,
        line_number: usize,
        category: ErrorCategory,
        message: String,
        fields: &[String],
    ) {
        let error = ImportError {
            line_number,
            category,
            message,
            raw_row: io_utils::render_raw_row(fields, self.delimiter),
        };
        self.sink.warn(&error.to_string());
        self.errors.push(error);
        self.stats.errors += 1;
    }

    fn finish(self, source: &str) -> ImportOutcome {
        ImportOutcome {
            source: source.to_string(),
            customers: self.customers,
            accounts: self.accounts,
            errors: self.errors,
            stats: self.stats,
        }
    }
}

pub fn write_artifacts(
    outcome: &ImportOutcome,
    output_dir: &Path,
    generated_at: NaiveDateTime,
    sink: &dyn EventSink,
) -> Result<ImportArtifacts> {
    io_utils::ensure_dir(output_dir)?;

    let customers_sql = output_dir.join(CUSTOMERS_FILE);
    io_utils::write_artifact(
        &customers_sql,
        &sql::render_customers_sql(&outcome.customers, &outcome.stats, generated_at),
    )?;
    sink.info(&format!("Generated {}", customers_sql.display()));

    let accounts_sql = output_dir.join(ACCOUNTS_FILE);
    io_utils::write_artifact(
        &accounts_sql,
        &sql::render_accounts_sql(&outcome.accounts, &outcome.stats, generated_at),
    )?;
    sink.info(&format!("Generated {}", accounts_sql.display()));

    let error_report = output_dir.join(ERROR_REPORT_FILE);
    io_utils::write_artifact(
        &error_report,
        &report::render_error_report(
            &outcome.source,
            &outcome.stats,
            &outcome.errors,
            generated_at,
        ),
    )?;
    sink.info(&format!("Generated error report {}", error_report.display()));

    Ok(ImportArtifacts {
        customers_sql,
        accounts_sql,
        error_report,
        stats: outcome.stats,
    })
}
