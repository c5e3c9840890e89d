pub mod config;
pub mod decimal;
pub mod errors;
pub mod notifier;
pub mod serialization;
pub mod service;
pub mod state;
pub mod store;
pub mod transition;
pub mod types;

// re-export key types
pub use config::LifecycleConfig;
pub use decimal::{Money, Rate};
pub use errors::{LifecycleError, NotifyError, Result, StoreError};
pub use notifier::{LogNotifier, NoopNotifier, Notifier};
pub use serialization::LoanView;
pub use service::LifecycleService;
pub use state::{Loan, NewLoan};
pub use store::{InMemoryStore, LoanStore};
pub use transition::{can_transition, validate_transition};
pub use types::{Approval, Disbursement, Investor, LoanId, LoanState};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
