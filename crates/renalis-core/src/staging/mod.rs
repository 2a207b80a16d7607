//! # Staging Module
//!
//! eGFR-to-stage classification, the static stage guidance table, and the
//! end-to-end assessor that ties estimation, classification and lookup
//! together.

mod assessor;
mod records;
mod stage;

pub use assessor::*;
pub use records::*;
pub use stage::*;
