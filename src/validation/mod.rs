//! Input validation and error reporting

pub mod error;
pub mod input;

pub use error::{PlanningError, PlanningPhase};
pub use input::{InputValidator, ValidationReport};
