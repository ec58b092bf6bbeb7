use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};

use crate::{
    cli::{ImportArgs, parse_delimiter},
    importer::RUN_LOG_FILE,
    io_utils,
};

pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Optional YAML run configuration. Every key may be omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    pub output_dir: Option<PathBuf>,
    pub delimiter: Option<String>,
    pub input_encoding: Option<String>,
    pub run_log: Option<String>,
}

impl ImportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading configuration file {path:?}"))?;
        Self::from_yaml(&raw).with_context(|| format!("Parsing configuration file {path:?}"))
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }
}

/// Effective settings for one run after merging CLI flags over the config file.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub delimiter: u8,
    pub encoding: &'static Encoding,
    pub run_log: PathBuf,
}

pub fn resolve(args: &ImportArgs, config: &ImportConfig) -> Result<ResolvedSettings> {
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    let configured_delimiter = match config.delimiter.as_deref() {
        Some(value) => Some(
            parse_delimiter(value)
                .map_err(|err| anyhow!("Invalid delimiter in configuration: {err}"))?,
        ),
        None => None,
    };
    let delimiter =
        io_utils::resolve_input_delimiter(&args.input, args.delimiter.or(configured_delimiter));

    let encoding = io_utils::resolve_encoding(
        args.input_encoding
            .as_deref()
            .or(config.input_encoding.as_deref()),
    )?;

    let run_log_name = config.run_log.as_deref().unwrap_or(RUN_LOG_FILE);
    if run_log_name.trim().is_empty() {
        return Err(anyhow!("run_log must not be empty"));
    }
    let run_log = output_dir.join(run_log_name);

    Ok(ResolvedSettings {
        input: args.input.clone(),
        output_dir,
        delimiter,
        encoding,
        run_log,
    })
}
