//! Core domain types shared across the analysis/synthesis/repair pipeline.

pub mod error;
pub mod model;

pub use error::{Result, TestforgeError};
pub use model::{ComponentKind, ComponentModel, ImportRecord, PropSpec, TypeDescriptor};
