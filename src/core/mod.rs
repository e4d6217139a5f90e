//! Core types shared across the resolver: the infrastructural error
//! category.

pub mod error;

pub use error::SourceError;
