pub mod blocklist;
pub mod errors;
pub mod matches;
pub mod queries;
pub mod store;

pub use errors::Error;

pub use store::{RETENTION_DAYS, mark_imported, purge_expired, sweep_unseen, upsert_batch};
