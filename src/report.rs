//! Rendering of segment counts as a hierarchy table, JSON, or CSV.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use anyhow::{Context, Result};

use crate::{
    cli::OutputFormat,
    segments::SegmentCounts,
    table::{self, Align},
};

pub const HIERARCHY_HEADER: &str = "Hierarchy";
pub const COUNT_HEADER: &str = "Segment Count";

const INDENT: &str = "  ";

/// `(indented label, count)` pairs in display order.
pub fn hierarchy_rows(counts: &SegmentCounts) -> Vec<Vec<String>> {
    counts
        .iter()
        .map(|entry| {
            vec![
                format!("{}{}", INDENT.repeat(entry.depth), entry.label),
                entry.count.to_string(),
            ]
        })
        .collect()
}

pub fn render(counts: &SegmentCounts, format: OutputFormat) -> Result<String> {
    let headers = vec![HIERARCHY_HEADER.to_string(), COUNT_HEADER.to_string()];
    match format {
        OutputFormat::Table => Ok(table::render_aligned_table(
            &headers,
            &hierarchy_rows(counts),
            &[Align::Left, Align::Right],
        )),
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(counts).context("Serializing segment counts")?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.write_record(&headers)?;
            for row in hierarchy_rows(counts) {
                writer.write_record(&row)?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|err| anyhow::anyhow!("Flushing CSV output: {}", err.error()))?;
            String::from_utf8(bytes).context("CSV output was not valid UTF-8")
        }
    }
}

/// Writes the rendered report to `output`, or stdout when absent or `-`.
pub fn write(counts: &SegmentCounts, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let rendered = render(counts, format)?;
    let mut sink: Box<dyn Write> = match output {
        Some(path) if path != Path::new("-") => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Creating output file {path:?}"))?,
        )),
        _ => Box::new(std::io::stdout()),
    };
    sink.write_all(rendered.as_bytes())
        .context("Writing segment report")?;
    sink.flush().context("Flushing segment report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::{Signals, compute_segments};

    fn sample_counts() -> SegmentCounts {
        let signals = Signals {
            call_attempted: vec![true, false],
            call_connected: vec![true, false],
            wa_sent: vec![false, true],
            wa_received: vec![false, false],
        };
        compute_segments(&signals, 2, 0)
    }

    #[test]
    fn hierarchy_rows_indent_nested_segments() {
        let rows = hierarchy_rows(&sample_counts());
        assert_eq!(rows.len(), 12);
        assert_eq!(
            rows[0][0],
            "Leads Connected by Either WhatsApp or Call (Connectivity)"
        );
        assert_eq!(rows[1][0], "  Only Connected on Calls");
        assert_eq!(
            rows[2][0],
            "    Only Connected on Calls and WhatsApp Also Got Attempted"
        );
        assert_eq!(rows[10], vec!["Total Leads".to_string(), "2".to_string()]);
    }

    #[test]
    fn csv_output_has_header_and_twelve_rows() {
        let rendered = render(&sample_counts(), OutputFormat::Csv).expect("csv");
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "Hierarchy,Segment Count");
        assert_eq!(lines[11], "Total Leads,2");
    }

    #[test]
    fn json_output_carries_segment_keys() {
        let rendered = render(&sample_counts(), OutputFormat::Json).expect("json");
        let parsed: serde_json::Value = serde_json::from_str(&rendered).expect("parse");
        let entries = parsed.as_array().expect("array");
        assert_eq!(entries.len(), 12);
        assert_eq!(entries[0]["segment"], "connected_by_either");
        assert_eq!(entries[0]["count"], 1);
        assert_eq!(entries[3]["segment"], "only_connected_on_whatsapp");
    }
}
