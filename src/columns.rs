//! Column label normalization and role guessing.
//!
//! Guesses only seed a [`ColumnMapping`]; nothing computed from a dataset
//! uses a guessed column until the user has confirmed it.

use std::sync::OnceLock;

use regex::Regex;

use crate::mapping::{ColumnMapping, Role};

static NON_ALPHANUMERIC: OnceLock<Regex> = OnceLock::new();

/// Lowercases a label and strips every run of non `[a-z0-9]` characters.
pub fn normalize_label(label: &str) -> String {
    let pattern =
        NON_ALPHANUMERIC.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));
    let lowered = label.trim().to_lowercase();
    pattern.replace_all(&lowered, "").into_owned()
}

pub fn keywords(role: Role) -> &'static [&'static str] {
    match role {
        Role::CallAttempted => &[
            "attemptedcall",
            "callsattempted",
            "callattempt",
            "dialed",
            "callsdialed",
            "attempt",
            "outboundattempt",
        ],
        Role::CallConnected => &[
            "connectedcall",
            "callsconnected",
            "callconnected",
            "callanswer",
            "answered",
            "connected",
            "successfulcall",
        ],
        Role::WaSent => &[
            "sentwhatsapp",
            "sentwa",
            "whatsappsnt",
            "wasent",
            "wamsg",
            "msgsent",
            "whatsappsent",
            "wadelivered",
            "whatsappdelivered",
        ],
        Role::WaReceived => &[
            "receivedwhatsapp",
            "receivedwa",
            "wareceived",
            "msgreceived",
            "whatsappreceived",
            "replied",
            "whatsappreply",
            "warcvd",
        ],
    }
}

/// Broader match used when no primary keyword hits.
fn fallback_matches(role: Role, normalized: &str) -> bool {
    let any = |needles: &[&str]| needles.iter().any(|needle| normalized.contains(needle));
    match role {
        Role::CallAttempted => any(&["call"]) && any(&["attempt", "dial", "made"]),
        Role::CallConnected => any(&["call"]) && any(&["connect", "answer", "success"]),
        Role::WaSent => any(&["wa", "whatsapp"]) && any(&["send", "sent", "deliver", "attempt"]),
        Role::WaReceived => any(&["wa", "whatsapp"]) && any(&["receive", "reply", "rcvd"]),
    }
}

/// Returns the first column, in the given order, whose normalized label
/// contains any of `keywords`.
pub fn guess_column<'a, S>(columns: &'a [S], keywords: &[&str]) -> Option<&'a str>
where
    S: AsRef<str>,
{
    columns.iter().map(|column| column.as_ref()).find(|column| {
        let normalized = normalize_label(column);
        keywords.iter().any(|keyword| normalized.contains(keyword))
    })
}

/// Primary keyword pass for `role`, then the fallback predicate.
pub fn guess_role<'a, S>(columns: &'a [S], role: Role) -> Option<&'a str>
where
    S: AsRef<str>,
{
    guess_column(columns, keywords(role)).or_else(|| {
        columns
            .iter()
            .map(|column| column.as_ref())
            .find(|column| fallback_matches(role, &normalize_label(column)))
    })
}

pub fn guess_mapping<S>(columns: &[S]) -> ColumnMapping
where
    S: AsRef<str>,
{
    let mut mapping = ColumnMapping::default();
    for role in Role::ALL {
        mapping.set(role, guess_role(columns, role).map(str::to_string));
    }
    mapping
}
