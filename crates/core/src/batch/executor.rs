//! Batch executor - the per-item state machine
//!
//! Items are dispatched strictly one at a time, in input order, so merged
//! output keeps input order. A failing item is counted and logged; it never
//! stops the batch.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use wcmeta_common::marcxml;
use wcmeta_domain::{
    ApiExchange, BatchItem, BatchOperation, BatchOutcome, Result, WcMetaError,
};

use super::check::classify_check;
use super::ports::MetadataApi;

/// Runs one batch command against a [`MetadataApi`].
pub struct BatchExecutor {
    api: Arc<dyn MetadataApi>,
    debug: bool,
}

impl BatchExecutor {
    /// Create an executor
    pub fn new(api: Arc<dyn MetadataApi>) -> Self {
        Self { api, debug: false }
    }

    /// Keep request traces in the outcome
    #[must_use]
    pub const fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Process every item and return the aggregated outcome.
    ///
    /// For `create` and `update`, a holdings pass follows on the OCLC numbers
    /// the successful primary calls returned. Its results are logged and
    /// tallied in [`BatchOutcome::holdings`] without changing the primary
    /// counts.
    ///
    /// # Errors
    /// Returns `WcMetaError::InvalidInput` when `items` is empty. Item
    /// failures are never returned as errors.
    #[instrument(skip(self, items), fields(operation = %operation, items = items.len()))]
    pub async fn run(
        &self,
        operation: BatchOperation,
        items: Vec<BatchItem>,
    ) -> Result<BatchOutcome> {
        if items.is_empty() {
            return Err(WcMetaError::InvalidInput("No record numbers found in input".to_string()));
        }

        let mut outcome = BatchOutcome::new(operation);
        let mut returned_numbers = Vec::with_capacity(items.len());

        for item in &items {
            let number = self.dispatch(operation, item, &mut outcome).await;
            returned_numbers.push(number);
        }

        if operation.sets_holdings_after() {
            self.set_holdings(holdings_targets(returned_numbers), &mut outcome).await;
        }

        info!(
            processed = outcome.processed(),
            succeeded = outcome.success_count,
            failed = outcome.failure_count,
            holdings_set = outcome.holdings.set,
            holdings_failed = outcome.holdings.failed,
            "batch finished"
        );
        Ok(outcome)
    }

    /// Returns the OCLC number a successful create/update reported.
    async fn dispatch(
        &self,
        operation: BatchOperation,
        item: &BatchItem,
        outcome: &mut BatchOutcome,
    ) -> Option<String> {
        let id = item.correlation_id().to_string();

        let call = match (operation, item) {
            (BatchOperation::Read, BatchItem::Number(n)) => self.api.read_bib(n).await,
            (BatchOperation::SetHoldings, BatchItem::Number(n)) => self.api.add_holding(n).await,
            (BatchOperation::UnsetHoldings, BatchItem::Number(n)) => {
                self.api.delete_holding(n).await
            }
            (BatchOperation::Check, BatchItem::Number(n)) => {
                self.api.check_control_number(n).await
            }
            (BatchOperation::Create, BatchItem::Record { xml, .. }) => {
                self.api.create_bib(xml).await
            }
            (BatchOperation::Update, BatchItem::Record { xml, .. }) => {
                self.api.update_bib(xml).await
            }
            (BatchOperation::Validate, BatchItem::Record { xml, .. }) => {
                self.api.validate_bib(xml).await
            }
            (operation, _) => Err(WcMetaError::InvalidInput(format!(
                "{operation} cannot process item {id}"
            ))),
        };

        match call {
            Ok(exchange) => {
                self.keep_trace(outcome, &exchange, item);
                classify(operation, &id, exchange, outcome)
            }
            Err(err) => {
                warn!(id = %id, error = %err, "item failed without a response");
                if self.debug {
                    outcome.trace.push(format!("{id}: {err}"));
                }
                outcome.record_failure(&id, err.to_string());
                None
            }
        }
    }

    async fn set_holdings(&self, numbers: Vec<String>, outcome: &mut BatchOutcome) {
        debug!(count = numbers.len(), "setting holdings on returned numbers");

        for number in numbers {
            match self.api.add_holding(&number).await {
                Ok(exchange) => {
                    if self.debug {
                        outcome.trace.push(exchange.trace.clone());
                    }
                    let succeeded = exchange.response.is_success();
                    if !succeeded {
                        warn!(number = %number, status = exchange.response.status, "set holding failed");
                    }
                    outcome.record_holding(&number, succeeded, exchange.response.body);
                }
                Err(err) => {
                    warn!(number = %number, error = %err, "set holding failed without a response");
                    outcome.record_holding(&number, false, err.to_string());
                }
            }
        }
    }

    fn keep_trace(&self, outcome: &mut BatchOutcome, exchange: &ApiExchange, item: &BatchItem) {
        if !self.debug {
            return;
        }
        match item {
            BatchItem::Record { xml, .. } => {
                outcome.trace.push(format!("{}\n\n{xml}", exchange.trace));
            }
            BatchItem::Number(_) => outcome.trace.push(exchange.trace.clone()),
        }
    }
}

/// Numbers to set holdings on; items whose primary call produced no number
/// are dropped.
#[must_use]
pub fn holdings_targets(numbers: Vec<Option<String>>) -> Vec<String> {
    numbers.into_iter().flatten().collect()
}

fn classify(
    operation: BatchOperation,
    id: &str,
    exchange: ApiExchange,
    outcome: &mut BatchOutcome,
) -> Option<String> {
    let response = exchange.response;

    if operation == BatchOperation::Check {
        let check = classify_check(id, &response);
        if check.succeeded() {
            outcome.record_success(id, check.describe(), response.body, None);
        } else {
            warn!(id = %id, diagnostic = %check.describe(), "control number check failed");
            outcome.record_failure(id, check.describe());
        }
        return None;
    }

    if !response.is_success() {
        warn!(id = %id, status = response.status, "item failed");
        outcome.record_failure(id, response.body);
        return None;
    }

    let number =
        if operation.sets_holdings_after() { marcxml::oclc_number(&response.body) } else { None };
    let record =
        if operation.returns_records() { marcxml::first_record(&response.body) } else { None };

    debug!(id = %id, status = response.status, merged = record.is_some(), "item succeeded");
    outcome.record_success(id, operation.success_status(), response.body, record);
    number
}
