//! Core storage traits.
//!
//! [`DocumentStore`] is the single seam between request handling and a
//! concrete database. Backends live in [`crate::backends`].

pub mod storage;

pub use storage::DocumentStore;
