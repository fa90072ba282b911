//! HTTP handlers for the book endpoints.

pub mod book;
pub use book::*;
