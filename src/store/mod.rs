//! Catalog persistence subsystem.
//!
//! # Data Flow
//! ```text
//! course_catalog.json (ordered JSON array)
//!     → catalog.rs read_all (full load into Vec<Course>)
//!     → handlers (list, lookup by code)
//!
//! On add:
//!     handlers → catalog.rs append
//!     → read full document → push record → rewrite document in full
//! ```
//!
//! # Design Decisions
//! - Flat file, no index; the catalog is small and read in full every time
//! - Duplicate course codes are permitted; lookups take the first match
//! - Append is serialized by a mutex so concurrent adds cannot lose records

pub mod catalog;

pub use catalog::{CatalogStore, Course, StoreError};
