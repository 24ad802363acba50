//! Validation pipeline.
//!
//! [`Validator`] drives one run through its stages; [`run_validation`]
//! wraps it with file I/O and artifact placement.

pub mod runner;
pub mod stage;
mod validator;

pub use runner::run_validation;
pub use stage::{ClosureStageObserver, StageObserver, StageUpdate, ValidationStage};
pub use validator::{Validator, ValidatorBuilder};
