//! Role-to-column mapping and its YAML persistence.
//!
//! A [`ColumnMapping`] may be partially filled (from a file, CLI flags, or
//! confirmed guesses). [`ColumnMapping::resolve`] is the gate: it only
//! succeeds once every role names a column present in the dataset.

use std::{
    fmt,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{dataset::Dataset, error::SummaryError};

pub const DEFAULT_IDENTIFIER_COLUMN: &str = "Phone Number";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    CallAttempted,
    CallConnected,
    WaSent,
    WaReceived,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::CallAttempted,
        Role::CallConnected,
        Role::WaSent,
        Role::WaReceived,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::CallAttempted => "Calls Attempted",
            Role::CallConnected => "Calls Connected",
            Role::WaSent => "WhatsApp Sent",
            Role::WaReceived => "WhatsApp Received",
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Role::CallAttempted => "call_attempted",
            Role::CallConnected => "call_connected",
            Role::WaSent => "wa_sent",
            Role::WaReceived => "wa_received",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub call_attempted: Option<String>,
    pub call_connected: Option<String>,
    pub wa_sent: Option<String>,
    pub wa_received: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

/// A mapping with every role bound to a column of the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMapping {
    pub call_attempted: String,
    pub call_connected: String,
    pub wa_sent: String,
    pub wa_received: String,
    pub identifier: String,
}

impl ResolvedMapping {
    pub fn column(&self, role: Role) -> &str {
        match role {
            Role::CallAttempted => &self.call_attempted,
            Role::CallConnected => &self.call_connected,
            Role::WaSent => &self.wa_sent,
            Role::WaReceived => &self.wa_received,
        }
    }
}

impl ColumnMapping {
    pub fn get(&self, role: Role) -> Option<&str> {
        self.slot(role).as_deref()
    }

    pub fn set(&mut self, role: Role, column: Option<String>) {
        *self.slot_mut(role) = column;
    }

    fn slot(&self, role: Role) -> &Option<String> {
        match role {
            Role::CallAttempted => &self.call_attempted,
            Role::CallConnected => &self.call_connected,
            Role::WaSent => &self.wa_sent,
            Role::WaReceived => &self.wa_received,
        }
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<String> {
        match role {
            Role::CallAttempted => &mut self.call_attempted,
            Role::CallConnected => &mut self.call_connected,
            Role::WaSent => &mut self.wa_sent,
            Role::WaReceived => &mut self.wa_received,
        }
    }

    pub fn identifier_column(&self) -> &str {
        self.identifier
            .as_deref()
            .unwrap_or(DEFAULT_IDENTIFIER_COLUMN)
    }

    /// Overlays every value set in `other` onto `self`.
    pub fn merge(&mut self, other: ColumnMapping) {
        for role in Role::ALL {
            if let Some(column) = other.slot(role).clone() {
                self.set(role, Some(column));
            }
        }
        if other.identifier.is_some() {
            self.identifier = other.identifier;
        }
    }

    /// Fills roles that are still unset from `guesses`, leaving user choices alone.
    pub fn fill_unset(&mut self, guesses: &ColumnMapping) {
        for role in Role::ALL {
            if self.get(role).is_none() {
                self.set(role, guesses.slot(role).clone());
            }
        }
    }

    pub fn missing_roles(&self) -> Vec<Role> {
        Role::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none_or(|c| c.trim().is_empty()))
            .collect()
    }

    pub fn resolve(&self, dataset: &Dataset) -> Result<ResolvedMapping, SummaryError> {
        let missing = self.missing_roles();
        if !missing.is_empty() {
            return Err(SummaryError::IncompleteMapping {
                missing: missing
                    .iter()
                    .map(|role| role.display_name().to_string())
                    .collect(),
            });
        }
        let lookup = |role: Role| -> Result<String, SummaryError> {
            let column = self.get(role).unwrap_or_default().to_string();
            if dataset.column_index(&column).is_none() {
                return Err(SummaryError::UnknownColumn {
                    role: role.display_name().to_string(),
                    column,
                });
            }
            Ok(column)
        };
        Ok(ResolvedMapping {
            call_attempted: lookup(Role::CallAttempted)?,
            call_connected: lookup(Role::CallConnected)?,
            wa_sent: lookup(Role::WaSent)?,
            wa_received: lookup(Role::WaReceived)?,
            identifier: self.identifier_column().to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening mapping file {path:?}"))?;
        let reader = BufReader::new(file);
        let mapping: ColumnMapping =
            serde_yaml::from_reader(reader).context("Parsing mapping YAML")?;
        Ok(mapping)
    }

    pub fn to_yaml_string(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Serializing mapping to YAML string")
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let yaml = self.to_yaml_string()?;
        let mut file =
            File::create(path).with_context(|| format!("Creating mapping file {path:?}"))?;
        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Writing mapping file {path:?}"))?;
        Ok(())
    }
}
