//! Batch operation kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::WcMetaError;

/// What a batch input is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputKind {
    /// Digit runs scanned from a file or literal text
    Numbers,
    /// MARCXML records from a document
    Records,
}

/// A batch command, resolved once before the batch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchOperation {
    /// Fetch bib records by OCLC number
    Read,
    /// Create bib records, then set holdings on the new numbers
    Create,
    /// Replace bib records, then set holdings on the returned numbers
    Update,
    /// Validate records without storing them
    Validate,
    /// Add the institution's holding
    #[serde(rename = "set")]
    SetHoldings,
    /// Remove the institution's holding
    #[serde(rename = "unset")]
    UnsetHoldings,
    /// Check whether control numbers are still current
    Check,
}

impl BatchOperation {
    /// Every operation, in CLI order
    pub const ALL: [Self; 7] = [
        Self::Read,
        Self::Create,
        Self::Update,
        Self::Validate,
        Self::SetHoldings,
        Self::UnsetHoldings,
        Self::Check,
    ];

    /// Command name, also used in output file names
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Validate => "validate",
            Self::SetHoldings => "set",
            Self::UnsetHoldings => "unset",
            Self::Check => "check",
        }
    }

    /// Status word logged next to an item that succeeded
    #[must_use]
    pub const fn success_status(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "created",
            Self::Update => "updated",
            Self::Validate => "validated",
            Self::SetHoldings => "holding set",
            Self::UnsetHoldings => "holding unset",
            Self::Check => "matched",
        }
    }

    /// Leading verb of the summary line
    #[must_use]
    pub const fn summary_verb(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Create => "Created",
            Self::Update => "Updated",
            Self::Validate => "Validated",
            Self::SetHoldings => "Set holdings on",
            Self::UnsetHoldings => "Unset holdings on",
            Self::Check => "Checked",
        }
    }

    /// Kind of input the operation consumes
    #[must_use]
    pub const fn input_kind(self) -> InputKind {
        match self {
            Self::Create | Self::Update | Self::Validate => InputKind::Records,
            Self::Read | Self::SetHoldings | Self::UnsetHoldings | Self::Check => {
                InputKind::Numbers
            }
        }
    }

    /// Successful responses carry a record that goes into the merged output
    #[must_use]
    pub const fn returns_records(self) -> bool {
        matches!(self, Self::Read | Self::Create | Self::Update)
    }

    /// Holdings are set on returned numbers after the primary pass
    #[must_use]
    pub const fn sets_holdings_after(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for BatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BatchOperation {
    type Err = WcMetaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| WcMetaError::InvalidInput(format!("unknown operation: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for op in BatchOperation::ALL {
            assert_eq!(op.name().parse::<BatchOperation>().unwrap(), op);
        }
        assert!("delete".parse::<BatchOperation>().is_err());
    }

    #[test]
    fn record_commands_take_marcxml() {
        assert_eq!(BatchOperation::Create.input_kind(), InputKind::Records);
        assert_eq!(BatchOperation::Validate.input_kind(), InputKind::Records);
        assert_eq!(BatchOperation::Check.input_kind(), InputKind::Numbers);
        assert!(BatchOperation::Update.sets_holdings_after());
        assert!(!BatchOperation::Validate.returns_records());
    }
}
