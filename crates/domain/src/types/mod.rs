//! Domain types and models

pub mod batch;
pub mod credentials;
pub mod exchange;
pub mod operation;
pub mod token;

pub use batch::{BatchItem, BatchOutcome, HoldingsTally, OperationResult, StatusEntry};
pub use credentials::{Credentials, CREDENTIAL_KEYS};
pub use exchange::{ApiExchange, ApiResponse};
pub use operation::{BatchOperation, InputKind};
pub use token::{AccessToken, GrantType};
