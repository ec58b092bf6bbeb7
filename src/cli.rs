use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Validate a customer/account CSV export and generate PostgreSQL import scripts",
    long_about = None
)]
pub struct ImportArgs {
    /// Input CSV file combining customer and account columns
    #[arg(value_name = "CSV_FILE")]
    pub input: PathBuf,
    /// Directory receiving customers.sql, accounts.sql, import_errors.txt and the run log
    #[arg(short = 'o', long = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// YAML configuration file with defaults for the options below
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Print the final summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn parse_delimiter_accepts_names_and_single_ascii_chars() {
        assert_eq!(parse_delimiter("tab"), Ok(b'\t'));
        assert_eq!(parse_delimiter("semicolon"), Ok(b';'));
        assert_eq!(parse_delimiter("#"), Ok(b'#'));
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("§").is_err());
    }

    #[test]
    fn exactly_one_positional_input_is_required() {
        ImportArgs::command().debug_assert();
        assert!(ImportArgs::try_parse_from(["csv-sql-importer"]).is_err());
        assert!(ImportArgs::try_parse_from(["csv-sql-importer", "a.csv", "b.csv"]).is_err());
        let args = ImportArgs::try_parse_from([
            "csv-sql-importer",
            "data.csv",
            "--output-dir",
            "out",
            "--delimiter",
            "pipe",
        ])
        .unwrap();
        assert_eq!(args.input, PathBuf::from("data.csv"));
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.delimiter, Some(b'|'));
        assert!(!args.json);
    }
}
