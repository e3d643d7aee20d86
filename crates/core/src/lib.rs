//! Commissioning submission record store.
//!
//! A remote row-oriented table is the system of record. This crate owns the
//! row layout, identity assignment (including `legacy-<row>` identities for
//! rows that predate it), the `new → reviewed → closed` lifecycle, intake
//! validation and intake rate limiting. Transport lives behind
//! [`commission_storage::TabularStore`].

pub mod admin;
pub mod clock;
pub mod codec;
pub mod error;
pub mod intake;
pub mod rate_limit;
pub mod status;
pub mod store;
pub mod submission;

pub use admin::{AdminPolicy, ADMIN_KEY_HEADER};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::CommissionError;
pub use intake::IntakePayload;
pub use rate_limit::{client_key, RateLimiter};
pub use status::Status;
pub use store::{SubmissionStore, SubmissionUpdate};
pub use submission::Submission;
