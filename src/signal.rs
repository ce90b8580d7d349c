//! Conversion of a raw column into a per-row boolean signal.
//!
//! The interpretation is chosen once for the whole column by
//! [`classify_column`] and then applied uniformly to every cell.

use crate::{data::CellValue, error::SummaryError};

const TRUTHY_TOKENS: &[&str] = &[
    "yes",
    "y",
    "true",
    "t",
    "1",
    "connected",
    "done",
    "received",
    "delivered",
    "answer",
    "answered",
    "success",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Every present cell is a boolean.
    Boolean,
    /// At least one cell reads as a number.
    Numeric,
    /// Free text matched against the truthy vocabulary.
    Categorical,
}

pub fn classify_column(values: &[CellValue]) -> ColumnKind {
    let mut present = values.iter().filter(|value| !value.is_missing()).peekable();
    if present.peek().is_none() || present.all(|value| matches!(value, CellValue::Bool(_))) {
        return ColumnKind::Boolean;
    }
    if values.iter().any(|value| value.to_number().is_some()) {
        ColumnKind::Numeric
    } else {
        ColumnKind::Categorical
    }
}

pub fn is_truthy_token(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    TRUTHY_TOKENS.contains(&lowered.as_str())
}

/// Converts `values` into one boolean per row.
///
/// Fails with [`SummaryError::SignalInterpretation`] when the column holds a
/// cell that cannot be read as text at all.
pub fn extract_signal(column: &str, values: &[CellValue]) -> Result<Vec<bool>, SummaryError> {
    if let Some((row, CellValue::Invalid(raw))) = values
        .iter()
        .enumerate()
        .find(|(_, value)| matches!(value, CellValue::Invalid(_)))
    {
        return Err(SummaryError::SignalInterpretation {
            column: column.to_string(),
            reason: format!("row {} holds uninterpretable value {raw}", row + 1),
        });
    }

    let signal = match classify_column(values) {
        ColumnKind::Boolean => values
            .iter()
            .map(|value| matches!(value, CellValue::Bool(true)))
            .collect(),
        ColumnKind::Numeric => values
            .iter()
            .map(|value| value.to_number().unwrap_or(0.0) > 0.0)
            .collect(),
        ColumnKind::Categorical => values
            .iter()
            .map(|value| match value {
                CellValue::Text(text) => is_truthy_token(text),
                _ => false,
            })
            .collect(),
    };
    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> CellValue {
        CellValue::Text(value.to_string())
    }

    #[test]
    fn numeric_column_is_true_when_positive() {
        let values = vec![
            CellValue::Number(0.0),
            CellValue::Number(1.0),
            CellValue::Number(-2.0),
            text("3"),
            CellValue::Missing,
        ];
        assert_eq!(classify_column(&values), ColumnKind::Numeric);
        assert_eq!(
            extract_signal("calls", &values).unwrap(),
            vec![false, true, false, true, false]
        );
    }

    #[test]
    fn numeric_wins_over_text_when_any_cell_parses() {
        let values = vec![text("yes"), text("2"), text("connected")];
        assert_eq!(
            extract_signal("mixed", &values).unwrap(),
            vec![false, true, false]
        );
    }

    #[test]
    fn categorical_column_uses_truthy_vocabulary() {
        let values = vec![text("Yes"), text("no"), text("TRUE"), text("maybe")];
        assert_eq!(classify_column(&values), ColumnKind::Categorical);
        assert_eq!(
            extract_signal("status", &values).unwrap(),
            vec![true, false, true, false]
        );
        assert!(is_truthy_token("  Answered "));
        assert!(!is_truthy_token(""));
    }

    #[test]
    fn boolean_column_passes_through_with_missing_false() {
        let values = vec![CellValue::Bool(true), CellValue::Missing, CellValue::Bool(false)];
        assert_eq!(classify_column(&values), ColumnKind::Boolean);
        assert_eq!(
            extract_signal("flag", &values).unwrap(),
            vec![true, false, false]
        );
    }

    #[test]
    fn all_missing_column_is_all_false() {
        let values = vec![CellValue::Missing, CellValue::Missing];
        assert_eq!(extract_signal("empty", &values).unwrap(), vec![false, false]);
    }

    #[test]
    fn invalid_cell_aborts_with_column_name() {
        let values = vec![CellValue::Number(1.0), CellValue::Invalid("#DIV/0!".to_string())];
        let err = extract_signal("Dialed", &values).unwrap_err();
        match err {
            SummaryError::SignalInterpretation { column, reason } => {
                assert_eq!(column, "Dialed");
                assert!(reason.contains("row 2"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
