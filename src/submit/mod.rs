//! Submission Orchestration
//!
//! The confirm-then-submit state machine and its supporting pieces:
//! confirmation modals as data, payload assembly, the duplicate pre-check,
//! and outcome classification.

pub mod confirm;
pub mod coordinator;
pub mod duplicate;
pub mod outcome;
pub mod payload;

pub use confirm::{ActionEffect, ConfirmationAction, ConfirmationRequest};
pub use coordinator::{
    AppliedEffect, FlowError, SubmissionCoordinator, SubmitForm, SubmitIntent, SubmitPhase,
};
pub use duplicate::DuplicateProbe;
pub use outcome::SubmissionOutcome;
pub use payload::{FilePart, SubmissionPayload};
