//! Imgrelay Storage Library
//!
//! Transient local spool storage for accepted uploads. Files live under the
//! spool directory only between multipart ingestion and the completed cloud
//! upload; there is no durable state here.

pub mod spool;

pub use spool::{SpoolDir, SpooledFile, StorageError, StorageResult};
