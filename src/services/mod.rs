//! Service layer modules.
//!
//! Holds the profile persistence seam and its PostgreSQL implementation.

pub mod profile_store;

pub use profile_store::{PgProfileStore, ProfileStore};
