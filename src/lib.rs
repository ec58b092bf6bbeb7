pub mod cli;
pub mod config;
pub mod importer;
pub mod io_utils;
pub mod model;
pub mod report;
pub mod sink;
pub mod sql;
pub mod stats;
pub mod validate;

use std::{env, path::PathBuf, sync::OnceLock};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use log::{LevelFilter, debug};
use serde::Serialize;

use crate::{
    cli::ImportArgs,
    config::ImportConfig,
    importer::{ImportArtifacts, ImportOptions, Importer},
    sink::LogSink,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("csv_sql_importer", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    #[serde(flatten)]
    pub artifacts: ImportArtifacts,
    pub run_log: PathBuf,
}

pub fn run() -> Result<()> {
    init_logging();
    let args = ImportArgs::parse();
    let summary = execute(&args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", report::render_summary(&summary.artifacts, &summary.run_log));
    }
    Ok(())
}

/// Resolves settings for `args`, runs the import and writes every artifact.
pub fn execute(args: &ImportArgs) -> Result<RunSummary> {
    let config = match &args.config {
        Some(path) => ImportConfig::load(path)?,
        None => ImportConfig::default(),
    };
    let settings = config::resolve(args, &config)?;
    debug!(
        "Importing '{}' into {:?} (delimiter '{}', encoding {})",
        settings.input.display(),
        settings.output_dir,
        printable_delimiter(settings.delimiter),
        settings.encoding.name()
    );

    let sink = LogSink::with_run_log(&settings.run_log)?;
    let importer = Importer::new(
        ImportOptions {
            delimiter: settings.delimiter,
            encoding: settings.encoding,
        },
        &sink,
    );
    let artifacts = importer
        .run(
            &settings.input,
            &settings.output_dir,
            Local::now().naive_local(),
        )
        .with_context(|| format!("Importing {:?}", settings.input))?;
    Ok(RunSummary {
        artifacts,
        run_log: settings.run_log,
    })
}

pub(crate) fn printable_delimiter(delimiter: u8) -> String {
    match delimiter {
        b',' => ",".to_string(),
        b'\t' => "\\t".to_string(),
        other => (other as char).to_string(),
    }
}
