use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::mapping::ColumnMapping;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Summarize call and WhatsApp outreach into engagement segments",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Suggest which columns hold each outreach signal
    Guess(GuessArgs),
    /// Compute engagement segment counts for a lead file
    Summarize(SummarizeArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Lead file to read (CSV, TSV, or spreadsheet; `-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of delimited input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct GuessArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Write the suggestions to a mapping file for review
    #[arg(long = "write-mapping")]
    pub write_mapping: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Mapping file (YAML) naming the column for each role
    #[arg(short, long)]
    pub mapping: Option<PathBuf>,
    /// Column holding call attempts
    #[arg(long = "call-attempted")]
    pub call_attempted: Option<String>,
    /// Column holding connected calls
    #[arg(long = "call-connected")]
    pub call_connected: Option<String>,
    /// Column holding sent (attempted) WhatsApp messages
    #[arg(long = "wa-sent")]
    pub wa_sent: Option<String>,
    /// Column holding received (connected) WhatsApp messages
    #[arg(long = "wa-received")]
    pub wa_received: Option<String>,
    /// Column identifying a lead for duplicate detection (defaults to "Phone Number")
    #[arg(long = "id-column")]
    pub id_column: Option<String>,
    /// Use guessed columns for any role not set explicitly
    #[arg(long = "accept-guesses")]
    pub accept_guesses: bool,
    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

impl SummarizeArgs {
    /// Mapping built from the per-role flags alone.
    pub fn flag_mapping(&self) -> ColumnMapping {
        ColumnMapping {
            call_attempted: self.call_attempted.clone(),
            call_connected: self.call_connected.clone(),
            wa_sent: self.wa_sent.clone(),
            wa_received: self.wa_received.clone(),
            identifier: self.id_column.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
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
