//! Lookups against name-service databases through the system `getent` utility.
//!
//! getent's exit status carries the answer as much as its output does:
//! 0 is success, 1 an unknown database, 2 a missing key and 3 a database
//! that cannot be enumerated. [`DatabaseQuery::execute`] maps each of these
//! onto [`GetentError`] or a [`QueryOutcome`].

pub mod error;
pub mod logging;
pub mod outcome;
pub mod query;
pub mod records;
pub mod wrapper;

pub use error::GetentError;
pub use logging::GetentCommandLogger;
pub use outcome::{QueryOutcome, failure_payload};
pub use query::{COLON_DATABASES, Query, Separator};
pub use records::ResultSet;
pub use wrapper::DatabaseQuery;
