//! Submission Coordinator
//!
//! The confirm-then-submit state machine every form screen instantiates:
//! validate → confirmation gate → optional duplicate pre-check → exactly
//! one write → classified outcome. Every path lands back in `Idle` with
//! the form state intact.

use thiserror::Error;
use tracing::{debug, info};

use super::confirm::{ActionEffect, ConfirmationRequest};
use super::duplicate::{is_duplicate, DuplicateProbe};
use super::outcome::{classify_response, SubmissionOutcome};
use super::payload::SubmissionPayload;
use crate::api::{ResidentDirectory, SessionContext, SubmitApi, SubmitMode, SubmitRequest};
use crate::validation::Violation;

/// What a form kind supplies to the coordinator.
pub trait SubmitForm {
    /// Endpoint resource segment ("resident", "complaint", ...).
    fn resource(&self) -> &'static str;
    /// User-facing noun for notices ("profile", "complaint", ...).
    fn resource_label(&self) -> &'static str;
    /// Full rule-set evaluation against the current state.
    fn violations(&self) -> Vec<Violation>;
    /// Flattened multipart payload for the current state.
    fn payload(&self) -> SubmissionPayload;
    /// Identity triple for the duplicate pre-check; registration only.
    fn duplicate_probe(&self) -> Option<DuplicateProbe> {
        None
    }
    /// Restore the pristine just-opened shape.
    fn reset(&mut self);
}

/// Coordinator phases. `Validating` is synchronous and never observed
/// from outside; the async phases are.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPhase {
    Idle,
    AwaitingConfirmation,
    PreChecking,
    Submitting,
}

/// Result of a submit intent.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitIntent {
    /// Violations found; the machine stayed in `Idle` and this is the
    /// single aggregated notice.
    Rejected {
        violations: Vec<Violation>,
        notice: ConfirmationRequest,
    },
    /// Clean form; the confirmation gate is open.
    Confirm(ConfirmationRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("a submission is already in progress")]
    Busy,
    #[error("nothing is awaiting confirmation")]
    NotAwaitingConfirmation,
}

/// What the machine did with a fired modal action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedEffect {
    None,
    /// The form was reset to its pristine shape.
    FormCleared,
    /// Caller should run `confirm`.
    ProceedRequested,
    /// Caller should leave the screen.
    CloseRequested,
}

/// One screen session's submit orchestration.
#[derive(Debug)]
pub struct SubmissionCoordinator {
    phase: SubmitPhase,
    mode: SubmitMode,
    session: SessionContext,
}

impl SubmissionCoordinator {
    pub fn new(mode: SubmitMode, session: SessionContext) -> Self {
        Self {
            phase: SubmitPhase::Idle,
            mode,
            session,
        }
    }

    pub fn phase(&self) -> SubmitPhase {
        self.phase
    }

    pub fn mode(&self) -> &SubmitMode {
        &self.mode
    }

    /// Handle a submit trigger. Refused unless idle; a dirty form reports
    /// its complete violation set in one notice; a clean form opens the
    /// confirmation gate. No network happens here.
    pub fn submit_intent(&mut self, form: &dyn SubmitForm) -> Result<SubmitIntent, FlowError> {
        if self.phase != SubmitPhase::Idle {
            return Err(FlowError::Busy);
        }

        let violations = form.violations();
        if !violations.is_empty() {
            debug!(count = violations.len(), "submit intent rejected by validation");
            let notice = ConfirmationRequest::validation_failed(&violations);
            return Ok(SubmitIntent::Rejected { violations, notice });
        }

        self.phase = SubmitPhase::AwaitingConfirmation;
        Ok(SubmitIntent::Confirm(ConfirmationRequest::submit_gate(
            form.resource_label(),
        )))
    }

    /// Close the gate without submitting. Side-effect-free.
    pub fn cancel(&mut self) {
        if self.phase == SubmitPhase::AwaitingConfirmation {
            self.phase = SubmitPhase::Idle;
        }
    }

    /// Proceed past the gate: optional duplicate pre-check (fail-closed),
    /// then exactly one write call. The machine always returns to `Idle`.
    pub async fn confirm(
        &mut self,
        form: &dyn SubmitForm,
        submit_api: &dyn SubmitApi,
        directory: Option<&dyn ResidentDirectory>,
    ) -> Result<SubmissionOutcome, FlowError> {
        if self.phase != SubmitPhase::AwaitingConfirmation {
            return Err(FlowError::NotAwaitingConfirmation);
        }

        if let Some(probe) = form.duplicate_probe() {
            self.phase = SubmitPhase::PreChecking;
            if self.run_precheck(&probe, directory).await {
                self.phase = SubmitPhase::Idle;
                return Ok(SubmissionOutcome::DuplicateFound);
            }
        }

        self.phase = SubmitPhase::Submitting;
        let mut payload = form.payload();
        if let Some(user_id) = &self.session.user_id {
            payload.push_text("submitted_by", user_id.clone());
        }

        let request = SubmitRequest {
            resource: form.resource(),
            mode: self.mode.clone(),
            payload,
        };
        info!(resource = request.resource, "issuing submission");

        let outcome = match submit_api.submit(request).await {
            Ok(response) => classify_response(response),
            Err(err) => SubmissionOutcome::NetworkError {
                cause: err.to_string(),
            },
        };

        self.phase = SubmitPhase::Idle;
        Ok(outcome)
    }

    /// Apply a fired modal action as data. `ClearAndCreateAnother` resets
    /// the form here; navigation effects are reported back to the caller.
    pub fn apply_effect(
        &mut self,
        effect: ActionEffect,
        form: &mut dyn SubmitForm,
    ) -> AppliedEffect {
        match effect {
            ActionEffect::Dismiss => {
                self.cancel();
                AppliedEffect::None
            }
            ActionEffect::Proceed => AppliedEffect::ProceedRequested,
            ActionEffect::ClearAndCreateAnother => {
                form.reset();
                AppliedEffect::FormCleared
            }
            ActionEffect::Close => AppliedEffect::CloseRequested,
        }
    }

    async fn run_precheck(
        &self,
        probe: &DuplicateProbe,
        directory: Option<&dyn ResidentDirectory>,
    ) -> bool {
        match directory {
            Some(directory) => is_duplicate(probe, directory).await,
            // No directory wired in counts as an inconclusive check.
            None => true,
        }
    }
}
