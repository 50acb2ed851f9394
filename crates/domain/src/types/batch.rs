//! Batch items and the aggregated outcome of one batch command.

use serde::{Deserialize, Serialize};

use super::operation::BatchOperation;

/// One unit of work in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchItem {
    /// OCLC number scanned from the input
    Number(String),
    /// MARCXML record with the id it is reported under
    Record {
        /// 035 $a of the record, or its zero-based position in the input
        id: String,
        /// Serialized `record` element, namespace declared
        xml: String,
    },
}

impl BatchItem {
    /// Identifier matching this item to its log line
    #[must_use]
    pub fn correlation_id(&self) -> &str {
        match self {
            Self::Number(number) => number,
            Self::Record { id, .. } => id,
        }
    }
}

/// Final result of one item. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub correlation_id: String,
    pub succeeded: bool,
    /// Raw response body, or the local error message
    pub response: String,
}

/// A line of the status log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub id: String,
    pub status: String,
    /// Diagnostic kept for failures, typically the raw response body
    pub detail: Option<String>,
}

impl StatusEntry {
    /// `<id>: <status>`
    #[must_use]
    pub fn headline(&self) -> String {
        format!("{}: {}", self.id, self.status)
    }
}

/// Holdings pass counters, kept apart from the primary counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingsTally {
    pub set: usize,
    pub failed: usize,
}

/// Everything one batch command produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub operation: BatchOperation,
    pub success_count: usize,
    pub failure_count: usize,
    /// Records returned by successful calls, in input order
    pub merged_records: Vec<String>,
    pub status_log: Vec<StatusEntry>,
    pub results: Vec<OperationResult>,
    pub holdings: HoldingsTally,
    /// Request traces, filled only in debug mode
    pub trace: Vec<String>,
}

impl BatchOutcome {
    /// Empty outcome for `operation`
    #[must_use]
    pub const fn new(operation: BatchOperation) -> Self {
        Self {
            operation,
            success_count: 0,
            failure_count: 0,
            merged_records: Vec::new(),
            status_log: Vec::new(),
            results: Vec::new(),
            holdings: HoldingsTally { set: 0, failed: 0 },
            trace: Vec::new(),
        }
    }

    /// Count a success, logging `status` and merging `record` when present.
    pub fn record_success(
        &mut self,
        id: &str,
        status: impl Into<String>,
        response: String,
        record: Option<String>,
    ) {
        self.success_count += 1;
        if let Some(record) = record {
            self.merged_records.push(record);
        }
        self.status_log.push(StatusEntry { id: id.to_string(), status: status.into(), detail: None });
        self.results.push(OperationResult {
            correlation_id: id.to_string(),
            succeeded: true,
            response,
        });
    }

    /// Count a failure. `response` is kept verbatim for diagnosis.
    pub fn record_failure(&mut self, id: &str, response: String) {
        self.failure_count += 1;
        self.status_log.push(StatusEntry {
            id: id.to_string(),
            status: "failed".to_string(),
            detail: Some(response.clone()),
        });
        self.results.push(OperationResult {
            correlation_id: id.to_string(),
            succeeded: false,
            response,
        });
    }

    /// Log a holdings pass result without touching the primary counts.
    pub fn record_holding(&mut self, number: &str, succeeded: bool, response: String) {
        let entry = if succeeded {
            self.holdings.set += 1;
            StatusEntry { id: number.to_string(), status: "holding set".into(), detail: None }
        } else {
            self.holdings.failed += 1;
            StatusEntry {
                id: number.to_string(),
                status: "set holding failed".into(),
                detail: Some(response),
            }
        };
        self.status_log.push(entry);
    }

    /// Items accounted for so far
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.success_count + self.failure_count
    }

    /// At least one item succeeded
    #[must_use]
    pub const fn any_succeeded(&self) -> bool {
        self.success_count > 0
    }

    /// `"<Verb> <N> record(s) and <M> failed"`
    #[must_use]
    pub fn summary(&self) -> String {
        let noun = if self.success_count == 1 { "record" } else { "records" };
        format!(
            "{} {} {noun} and {} failed",
            self.operation.summary_verb(),
            self.success_count,
            self.failure_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_recorded_items() {
        let mut outcome = BatchOutcome::new(BatchOperation::Read);
        outcome.record_success("12345", "read", "<ok/>".into(), Some("<record/>".into()));
        outcome.record_failure("67890", "not found".into());
        outcome.record_holding("12345", false, "denied".into());

        assert_eq!(outcome.processed(), 2);
        assert_eq!(outcome.merged_records.len(), 1);
        assert_eq!(outcome.holdings, HoldingsTally { set: 0, failed: 1 });
        assert_eq!(outcome.status_log[1].headline(), "67890: failed");
        assert_eq!(outcome.status_log[2].headline(), "12345: set holding failed");
        assert_eq!(outcome.summary(), "Read 1 record and 1 failed");
    }

    #[test]
    fn summary_pluralizes() {
        let mut outcome = BatchOutcome::new(BatchOperation::Create);
        assert_eq!(outcome.summary(), "Created 0 records and 0 failed");
        outcome.record_success("a", "created", String::new(), None);
        outcome.record_success("b", "created", String::new(), None);
        assert_eq!(outcome.summary(), "Created 2 records and 0 failed");
    }

    #[test]
    fn correlation_id_for_each_item_kind() {
        assert_eq!(BatchItem::Number("42".into()).correlation_id(), "42");
        let record = BatchItem::Record { id: "1".into(), xml: "<record/>".into() };
        assert_eq!(record.correlation_id(), "1");
    }
}
