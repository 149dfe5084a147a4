//! Confirmation Requests
//!
//! The single modal channel every prompt and failure notice flows through.
//! Actions are data; the state machine applies their effects, nothing is
//! invoked as a closure.

use serde::{Deserialize, Serialize};

use crate::attachments::{PickOutcome, SizeExceeded};
use crate::utils::format_bytes;
use crate::validation::{grouped_message, Violation};

/// What an action does when the user picks it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionEffect {
    /// Close the modal, nothing else.
    Dismiss,
    /// Proceed past the confirmation gate into the submission.
    Proceed,
    /// Reset the form to its pristine shape and stay on the screen.
    ClearAndCreateAnother,
    /// Leave the screen (after an edit, toward the record detail).
    Close,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationAction {
    pub label: String,
    pub effect: ActionEffect,
    pub is_destructive: bool,
}

impl ConfirmationAction {
    pub fn new(label: impl Into<String>, effect: ActionEffect) -> Self {
        Self {
            label: label.into(),
            effect,
            is_destructive: false,
        }
    }

    pub fn destructive(label: impl Into<String>, effect: ActionEffect) -> Self {
        Self {
            label: label.into(),
            effect,
            is_destructive: true,
        }
    }
}

/// Ephemeral modal content: built here, consumed by the presentation
/// layer, discarded after one action fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationRequest {
    pub title: String,
    pub message: String,
    pub actions: Vec<ConfirmationAction>,
}

impl ConfirmationRequest {
    /// Simple acknowledgment notice.
    pub fn notice(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            actions: vec![ConfirmationAction::new("OK", ActionEffect::Dismiss)],
        }
    }

    /// The gate between "form is valid" and "write request is sent".
    pub fn submit_gate(resource_label: &str) -> Self {
        Self {
            title: "Confirm Submission".into(),
            message: format!("Submit this {resource_label}? Please review your entries first."),
            actions: vec![
                ConfirmationAction::new("Cancel", ActionEffect::Dismiss),
                ConfirmationAction::new("Submit", ActionEffect::Proceed),
            ],
        }
    }

    /// Aggregated validation failure, one message for the full set.
    pub fn validation_failed(violations: &[Violation]) -> Self {
        Self::notice("Incomplete Form", grouped_message(violations))
    }

    /// Rejected attachment add.
    pub fn size_exceeded(err: &SizeExceeded) -> Self {
        Self::notice(
            "File Too Large",
            format!(
                "This file ({}) would put the field over its {} limit. Remove another file first.",
                format_bytes(err.attempted_bytes),
                format_bytes(err.limit_bytes)
            ),
        )
    }

    /// Picker permission refusal; the upload attempt is aborted.
    pub fn permission_denied() -> Self {
        Self::notice(
            "Permission Needed",
            "Access was denied. Allow the permission in your device settings, then try again.",
        )
    }

    /// Notice for a picker outcome that blocks the upload. Cancellation is
    /// silent; only a permission refusal surfaces.
    pub fn pick_blocked(outcome: &PickOutcome) -> Option<Self> {
        match outcome {
            PickOutcome::PermissionDenied => Some(Self::permission_denied()),
            PickOutcome::Picked(_) | PickOutcome::Cancelled => None,
        }
    }

    /// Duplicate pre-check hit (or an inconclusive check, treated the same).
    pub fn duplicate_found() -> Self {
        Self::notice(
            "Record Already Exists",
            "A matching record was found. Please visit your barangay office for manual verification.",
        )
    }

    /// Creation success: stay and start over, or leave.
    pub fn created(resource_label: &str) -> Self {
        Self {
            title: "Success".into(),
            message: format!("Your {resource_label} has been submitted."),
            actions: vec![
                ConfirmationAction::new("Create new", ActionEffect::ClearAndCreateAnother),
                ConfirmationAction::new("Close", ActionEffect::Close),
            ],
        }
    }

    /// Edit success: close toward the record detail.
    pub fn updated(resource_label: &str) -> Self {
        Self {
            title: "Success".into(),
            message: format!("Your {resource_label} has been updated."),
            actions: vec![ConfirmationAction::new("Close", ActionEffect::Close)],
        }
    }

    pub fn network_error() -> Self {
        Self::notice(
            "Connection Problem",
            "We could not reach the server. Check your connection and submit again.",
        )
    }

    pub fn server_rejected(message: &str) -> Self {
        Self::notice("Submission Failed", message)
    }
}
