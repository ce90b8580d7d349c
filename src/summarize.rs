//! The `summarize` command: load, map, extract signals, count segments.

use anyhow::{Context, Result};
use log::{debug, info};

use crate::{
    cli::SummarizeArgs,
    columns,
    dataset::{Dataset, LoadOptions},
    error::SummaryError,
    io_utils,
    mapping::{ColumnMapping, ResolvedMapping, Role},
    report,
    segments::{self, SegmentCounts, Signals},
    signal,
};

pub fn execute(args: &SummarizeArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input.input_encoding.as_deref())?;
    let options = LoadOptions {
        delimiter: args.input.delimiter,
        encoding,
    };
    let dataset = Dataset::load(&args.input.input, &options)
        .with_context(|| format!("Loading leads from {:?}", args.input.input))?;

    let mut mapping = match &args.mapping {
        Some(path) => ColumnMapping::load(path)
            .with_context(|| format!("Loading mapping from {path:?}"))?,
        None => ColumnMapping::default(),
    };
    mapping.merge(args.flag_mapping());
    if args.accept_guesses {
        let guesses = columns::guess_mapping(dataset.headers());
        for role in mapping.missing_roles() {
            if let Some(column) = guesses.get(role) {
                info!("Using guessed column '{column}' for {role}");
            }
        }
        mapping.fill_unset(&guesses);
    }

    let counts = summarize(&dataset, &mapping)?;
    report::write(&counts, args.format, args.output.as_deref())?;
    info!(
        "Summarized {} lead(s) from {:?}",
        dataset.row_count(),
        args.input.input
    );
    Ok(())
}

/// Runs the full computation for a loaded dataset and a user mapping.
///
/// Nothing is returned unless every step succeeds.
pub fn summarize(dataset: &Dataset, mapping: &ColumnMapping) -> Result<SegmentCounts, SummaryError> {
    if dataset.is_empty() {
        return Err(SummaryError::EmptyDataset);
    }
    let resolved = mapping.resolve(dataset)?;
    let signals = extract_signals(dataset, &resolved)?;
    let duplicates = segments::count_duplicates(dataset, &resolved.identifier)?;
    Ok(segments::compute_segments(
        &signals,
        dataset.row_count(),
        duplicates,
    ))
}

pub fn extract_signals(dataset: &Dataset, mapping: &ResolvedMapping) -> Result<Signals, SummaryError> {
    let extract = |role: Role| -> Result<Vec<bool>, SummaryError> {
        let column = mapping.column(role);
        let values = dataset
            .column(column)
            .ok_or_else(|| SummaryError::UnknownColumn {
                role: role.display_name().to_string(),
                column: column.to_string(),
            })?;
        debug!(
            "Column '{column}' for {role} interpreted as {:?}",
            signal::classify_column(values)
        );
        signal::extract_signal(column, values)
    };
    Ok(Signals {
        call_attempted: extract(Role::CallAttempted)?,
        call_connected: extract(Role::CallConnected)?,
        wa_sent: extract(Role::WaSent)?,
        wa_received: extract(Role::WaReceived)?,
    })
}
