//! Input validation
//!
//! Pure checks over the raw inputs of an action. Each [`ActionKind`]
//! declares its required fields and an ordered list of validators; all of
//! them run and every failure is reported.

pub mod action;
pub mod inputs;
pub mod rules;

pub use action::{validate, validate_named, ActionError, ActionKind, ActionRules};
pub use inputs::{Field, ValidationInputs};
pub use rules::Validator;
