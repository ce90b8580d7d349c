//! The `guess` command: propose a column for each role.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::GuessArgs,
    columns,
    dataset::{Dataset, LoadOptions},
    io_utils,
    mapping::Role,
    table,
};

pub const UNSELECTED: &str = "-- select --";

pub fn execute(args: &GuessArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input.input_encoding.as_deref())?;
    let options = LoadOptions {
        delimiter: args.input.delimiter,
        encoding,
    };
    let dataset = Dataset::load(&args.input.input, &options)
        .with_context(|| format!("Loading leads from {:?}", args.input.input))?;

    let mapping = columns::guess_mapping(dataset.headers());
    let rows = Role::ALL
        .iter()
        .map(|role| {
            vec![
                role.display_name().to_string(),
                role.key().to_string(),
                mapping.get(*role).unwrap_or(UNSELECTED).to_string(),
            ]
        })
        .collect::<Vec<_>>();
    let headers = vec!["role".to_string(), "key".to_string(), "column".to_string()];
    table::print_table(&headers, &rows);

    if let Some(path) = &args.write_mapping {
        mapping
            .save(path)
            .with_context(|| format!("Writing mapping to {path:?}"))?;
        info!("Suggested mapping written to {path:?}; review it before summarizing");
    }
    Ok(())
}
