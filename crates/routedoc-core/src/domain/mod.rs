//! Domain types.
//!
//! Pure data with no I/O.

mod doc_info;

pub use doc_info::DocInfo;
