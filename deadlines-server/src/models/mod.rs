//! Domain models with validation at construction
//!
//! Request input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod deadline;
pub mod validation;

pub use deadline::{
    Deadline, DeadlineEntry, DeadlineId, DeadlineList, DeadlineUpdate, NewDeadline,
    INPUT_DATE_FORMAT, OUTPUT_DATE_FORMAT,
};
pub use validation::ValidationError;
