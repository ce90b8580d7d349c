//! Engagement segment counting.
//!
//! WhatsApp "attempted" is the sent signal and WhatsApp "connected" is the
//! received signal; they are not independent inputs.

use itertools::Itertools;
use serde::Serialize;

use crate::{dataset::Dataset, error::SummaryError};

/// The four per-row boolean vectors, all of the dataset's row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signals {
    pub call_attempted: Vec<bool>,
    pub call_connected: Vec<bool>,
    pub wa_sent: Vec<bool>,
    pub wa_received: Vec<bool>,
}

#[derive(Debug, Clone, Copy)]
struct Row {
    call_attempted: bool,
    call_connected: bool,
    wa_sent: bool,
    wa_received: bool,
}

impl Row {
    fn wa_attempted(&self) -> bool {
        self.wa_sent
    }

    fn wa_connected(&self) -> bool {
        self.wa_received
    }
}

impl Signals {
    pub fn len(&self) -> usize {
        self.call_attempted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        self.call_attempted
            .iter()
            .zip(&self.call_connected)
            .zip(&self.wa_sent)
            .zip(&self.wa_received)
            .map(|(((&ca, &cc), &ws), &wr)| Row {
                call_attempted: ca,
                call_connected: cc,
                wa_sent: ws,
                wa_received: wr,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    ConnectedByEither,
    OnlyConnectedOnCalls,
    CallsConnectedWaAttempted,
    #[serde(rename = "only_connected_on_whatsapp")]
    OnlyConnectedOnWhatsApp,
    ConnectedOnBoth,
    NeitherAttempted,
    NoCallsAttempted,
    NoCallsButWaAttempted,
    #[serde(rename = "no_whatsapp_attempted")]
    NoWhatsAppAttempted,
    NoWaButCallsAttempted,
    TotalLeads,
    DuplicateLeads,
}

impl Segment {
    /// Display order: outer segments precede their nested sub-segments.
    pub const ALL: [Segment; 12] = [
        Segment::ConnectedByEither,
        Segment::OnlyConnectedOnCalls,
        Segment::CallsConnectedWaAttempted,
        Segment::OnlyConnectedOnWhatsApp,
        Segment::ConnectedOnBoth,
        Segment::NeitherAttempted,
        Segment::NoCallsAttempted,
        Segment::NoCallsButWaAttempted,
        Segment::NoWhatsAppAttempted,
        Segment::NoWaButCallsAttempted,
        Segment::TotalLeads,
        Segment::DuplicateLeads,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Segment::ConnectedByEither => {
                "Leads Connected by Either WhatsApp or Call (Connectivity)"
            }
            Segment::OnlyConnectedOnCalls => "Only Connected on Calls",
            Segment::CallsConnectedWaAttempted => {
                "Only Connected on Calls and WhatsApp Also Got Attempted"
            }
            Segment::OnlyConnectedOnWhatsApp => "Only Connected on WhatsApp",
            Segment::ConnectedOnBoth => "Leads Connected on Both WhatsApp and Call",
            Segment::NeitherAttempted => {
                "Leads Where No WhatsApp and Calls Were Attempted (Call & WhatsApp = 0)"
            }
            Segment::NoCallsAttempted => "No Calls Attempted",
            Segment::NoCallsButWaAttempted => "No Calls Attempted but WhatsApp Attempted",
            Segment::NoWhatsAppAttempted => "No WhatsApp Attempted",
            Segment::NoWaButCallsAttempted => "No WhatsApp but Calls Attempted",
            Segment::TotalLeads => "Total Leads",
            Segment::DuplicateLeads => "Duplicate Leads",
        }
    }

    /// Nesting level in the hierarchy table.
    pub fn depth(&self) -> usize {
        match self {
            Segment::ConnectedByEither
            | Segment::NeitherAttempted
            | Segment::TotalLeads
            | Segment::DuplicateLeads => 0,
            Segment::OnlyConnectedOnCalls
            | Segment::OnlyConnectedOnWhatsApp
            | Segment::ConnectedOnBoth
            | Segment::NoCallsAttempted
            | Segment::NoWhatsAppAttempted => 1,
            Segment::CallsConnectedWaAttempted
            | Segment::NoCallsButWaAttempted
            | Segment::NoWaButCallsAttempted => 2,
        }
    }

    /// Row predicate for signal-derived segments; `None` for dataset-level counts.
    fn matches(&self, row: &Row) -> Option<bool> {
        let matched = match self {
            Segment::ConnectedByEither => row.call_connected || row.wa_connected(),
            Segment::OnlyConnectedOnCalls => row.call_connected && !row.wa_connected(),
            Segment::CallsConnectedWaAttempted => {
                row.call_connected && row.wa_sent && !row.wa_received
            }
            Segment::OnlyConnectedOnWhatsApp => row.wa_connected() && !row.call_connected,
            Segment::ConnectedOnBoth => row.call_connected && row.wa_connected(),
            Segment::NeitherAttempted => !row.call_attempted && !row.wa_attempted(),
            Segment::NoCallsAttempted => !row.call_attempted,
            Segment::NoCallsButWaAttempted => !row.call_attempted && row.wa_attempted(),
            Segment::NoWhatsAppAttempted => !row.wa_attempted(),
            Segment::NoWaButCallsAttempted => row.call_attempted && !row.wa_attempted(),
            Segment::TotalLeads | Segment::DuplicateLeads => return None,
        };
        Some(matched)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentCount {
    pub segment: Segment,
    pub label: &'static str,
    pub depth: usize,
    pub count: usize,
}

/// Counts for every [`Segment`], in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SegmentCounts {
    entries: Vec<SegmentCount>,
}

impl SegmentCounts {
    pub fn get(&self, segment: Segment) -> usize {
        self.entries
            .iter()
            .find(|entry| entry.segment == segment)
            .map(|entry| entry.count)
            .unwrap_or_default()
    }

    pub fn entries(&self) -> &[SegmentCount] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentCount> {
        self.entries.iter()
    }
}

pub fn compute_segments(signals: &Signals, total_leads: usize, duplicate_leads: usize) -> SegmentCounts {
    let entries = Segment::ALL
        .iter()
        .map(|segment| {
            let count = match segment {
                Segment::TotalLeads => total_leads,
                Segment::DuplicateLeads => duplicate_leads,
                _ => signals
                    .rows()
                    .filter(|row| segment.matches(row).unwrap_or(false))
                    .count(),
            };
            SegmentCount {
                segment: *segment,
                label: segment.label(),
                depth: segment.depth(),
                count,
            }
        })
        .collect();
    SegmentCounts { entries }
}

/// Number of rows whose `identifier` value is shared with at least one other
/// row. Every member of a repeated group is counted, missing values included.
pub fn count_duplicates(dataset: &Dataset, identifier: &str) -> Result<usize, SummaryError> {
    let values = dataset
        .column(identifier)
        .ok_or_else(|| SummaryError::MissingIdentifierColumn {
            column: identifier.to_string(),
        })?;
    let duplicates = values
        .iter()
        .map(|value| value.group_key())
        .counts()
        .into_values()
        .filter(|size| *size >= 2)
        .sum();
    Ok(duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CellValue;

    fn signals(ca: &[u8], cc: &[u8], ws: &[u8], wr: &[u8]) -> Signals {
        let to_bools = |values: &[u8]| values.iter().map(|v| *v > 0).collect::<Vec<_>>();
        Signals {
            call_attempted: to_bools(ca),
            call_connected: to_bools(cc),
            wa_sent: to_bools(ws),
            wa_received: to_bools(wr),
        }
    }

    #[test]
    fn four_row_scenario_matches_expected_counts() {
        let signals = signals(&[1, 1, 0, 0], &[1, 0, 0, 0], &[1, 1, 1, 0], &[0, 1, 0, 0]);
        let counts = compute_segments(&signals, 4, 0);
        assert_eq!(counts.get(Segment::ConnectedByEither), 2);
        assert_eq!(counts.get(Segment::OnlyConnectedOnCalls), 1);
        assert_eq!(counts.get(Segment::CallsConnectedWaAttempted), 1);
        assert_eq!(counts.get(Segment::OnlyConnectedOnWhatsApp), 1);
        assert_eq!(counts.get(Segment::ConnectedOnBoth), 0);
        assert_eq!(counts.get(Segment::NeitherAttempted), 1);
        assert_eq!(counts.get(Segment::NoCallsAttempted), 2);
        assert_eq!(counts.get(Segment::NoCallsButWaAttempted), 1);
        assert_eq!(counts.get(Segment::NoWhatsAppAttempted), 1);
        assert_eq!(counts.get(Segment::NoWaButCallsAttempted), 0);
        assert_eq!(counts.get(Segment::TotalLeads), 4);
    }

    #[test]
    fn entries_follow_display_order() {
        let counts = compute_segments(&signals(&[], &[], &[], &[]), 0, 0);
        let order = counts.iter().map(|entry| entry.segment).collect::<Vec<_>>();
        assert_eq!(order, Segment::ALL.to_vec());
        assert_eq!(counts.entries()[2].depth, 2);
    }

    #[test]
    fn duplicates_count_every_member_of_repeated_groups() {
        let dataset = Dataset::from_text_records(
            vec!["Phone Number".to_string()],
            vec![
                vec!["555-1".to_string()],
                vec!["555-1".to_string()],
                vec!["555-2".to_string()],
            ],
        );
        assert_eq!(count_duplicates(&dataset, "Phone Number").unwrap(), 2);
    }

    #[test]
    fn missing_identifier_values_group_together() {
        let dataset = Dataset::from_columns(
            vec!["Phone Number".to_string()],
            vec![vec![
                CellValue::Missing,
                CellValue::Number(1.0),
                CellValue::Missing,
            ]],
        );
        assert_eq!(count_duplicates(&dataset, "Phone Number").unwrap(), 2);
    }

    #[test]
    fn placeholder_identifiers_group_with_blanks() {
        let dataset = Dataset::from_text_records(
            vec!["Phone Number".to_string()],
            vec![
                vec!["NA".to_string()],
                vec!["null".to_string()],
                vec!["555".to_string()],
            ],
        );
        assert_eq!(count_duplicates(&dataset, "Phone Number").unwrap(), 2);
    }

    #[test]
    fn missing_identifier_column_is_an_error() {
        let dataset = Dataset::from_columns(vec!["Mobile".to_string()], vec![vec![]]);
        let err = count_duplicates(&dataset, "Phone Number").unwrap_err();
        assert!(matches!(err, SummaryError::MissingIdentifierColumn { .. }));
    }
}
