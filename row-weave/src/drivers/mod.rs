//! Concrete [`crate::RowCursor`] adapters, one per supported driver.
//!
//! Each adapter lives behind its own Cargo feature so a consumer only
//! pulls in the driver crate it actually links against.

pub mod mock;

#[cfg(feature = "rusqlite-driver")]
pub mod rusqlite;

#[cfg(feature = "postgres-driver")]
pub mod postgres;
