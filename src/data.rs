/// A single raw cell as read from a lead file.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Missing,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Spreadsheet error cell such as `#DIV/0!`.
    Invalid(String),
}

impl CellValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// Key used for exact-value grouping. Missing cells share one key.
    pub fn group_key(&self) -> String {
        match self {
            CellValue::Missing => "m:".to_string(),
            CellValue::Bool(b) => format!("b:{b}"),
            CellValue::Number(f) => format!("n:{}", format_number(*f)),
            CellValue::Text(s) => format!("s:{s}"),
            CellValue::Invalid(e) => format!("e:{e}"),
        }
    }

    /// Numeric reading of the cell, `None` for anything that is not a number.
    pub fn to_number(&self) -> Option<f64> {
        let parsed = match self {
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Number(f) => Some(*f),
            CellValue::Text(s) => parse_number(s),
            CellValue::Missing | CellValue::Invalid(_) => None,
        };
        parsed.filter(|value| !value.is_nan())
    }
}

pub fn parse_number(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|parsed| !parsed.is_nan())
}

/// Placeholder tokens a dataframe reader treats as missing by default.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_na_token(value: &str) -> bool {
    NA_TOKENS.contains(&value)
}

pub fn parse_bool_literal(value: &str) -> Option<bool> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}
