#![warn(missing_docs)]

//! A library for reporting training run metrics and visualization images to
//! an experiment tracking backend.

#[macro_use]
extern crate derive_new;

/// The tracker client module.
pub mod client;

/// The application logger module.
pub mod logger;

/// The metric module.
pub mod metric;

/// The visualization module.
pub mod visual;

mod error;
mod hook;

pub use error::*;
pub use hook::*;
