//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod athlete;
pub mod checkpoint;
pub mod pass_record;
pub mod result;

pub use athlete::*;
pub use checkpoint::*;
pub use pass_record::*;
pub use result::*;
