//! Submission Outcomes
//!
//! Classification of the write call's result into the taxonomy every
//! screen surfaces the same way.

use serde_json::Value;
use tracing::{info, warn};

use super::confirm::ConfirmationRequest;
use crate::api::{SubmitMode, SubmitResponse};
use crate::validation::Violation;

/// Terminal result of one submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Success { server_record: Value },
    ValidationRejected { violations: Vec<Violation> },
    DuplicateFound,
    NetworkError { cause: String },
    ServerRejected { code: u16, message: String },
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success { .. })
    }

    /// The uniform modal for this outcome.
    pub fn notice(&self, resource_label: &str, mode: &SubmitMode) -> ConfirmationRequest {
        match self {
            SubmissionOutcome::Success { .. } => match mode {
                SubmitMode::Create => ConfirmationRequest::created(resource_label),
                SubmitMode::Edit { .. } => ConfirmationRequest::updated(resource_label),
            },
            SubmissionOutcome::ValidationRejected { violations } => {
                ConfirmationRequest::validation_failed(violations)
            }
            SubmissionOutcome::DuplicateFound => ConfirmationRequest::duplicate_found(),
            SubmissionOutcome::NetworkError { .. } => ConfirmationRequest::network_error(),
            SubmissionOutcome::ServerRejected { message, .. } => {
                ConfirmationRequest::server_rejected(message)
            }
        }
    }
}

/// Classify an HTTP-level response. 2xx is success; a 400-class response
/// surfaces the server-provided message verbatim; anything else gets a
/// generic failure.
pub fn classify_response(response: SubmitResponse) -> SubmissionOutcome {
    match response.status {
        200..=299 => {
            info!(status = response.status, "submission accepted");
            SubmissionOutcome::Success {
                server_record: response.body,
            }
        }
        400..=499 => {
            let message = response
                .body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("The server rejected this submission.")
                .to_string();
            warn!(status = response.status, %message, "submission rejected");
            SubmissionOutcome::ServerRejected {
                code: response.status,
                message,
            }
        }
        status => {
            warn!(status, "submission failed with unexpected status");
            SubmissionOutcome::ServerRejected {
                code: status,
                message: "Something went wrong on the server. Please try again later.".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_2xx_is_success_with_record() {
        let outcome = classify_response(SubmitResponse {
            status: 201,
            body: json!({"id": 42}),
        });
        assert_eq!(
            outcome,
            SubmissionOutcome::Success {
                server_record: json!({"id": 42})
            }
        );
    }

    #[test]
    fn test_400_class_surfaces_server_message_verbatim() {
        let outcome = classify_response(SubmitResponse {
            status: 422,
            body: json!({"message": "Mobile number already registered."}),
        });
        assert_eq!(
            outcome,
            SubmissionOutcome::ServerRejected {
                code: 422,
                message: "Mobile number already registered.".into()
            }
        );
    }

    #[test]
    fn test_other_statuses_get_generic_message() {
        let outcome = classify_response(SubmitResponse {
            status: 503,
            body: json!({"message": "upstream exploded"}),
        });
        match outcome {
            SubmissionOutcome::ServerRejected { code, message } => {
                assert_eq!(code, 503);
                assert!(!message.contains("upstream"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_success_notice_depends_on_mode() {
        let outcome = SubmissionOutcome::Success {
            server_record: json!({}),
        };
        let create = outcome.notice("complaint", &SubmitMode::Create);
        assert_eq!(create.actions.len(), 2);
        let edit = outcome.notice(
            "complaint",
            &SubmitMode::Edit {
                record_id: "7".into(),
            },
        );
        assert_eq!(edit.actions.len(), 1);
    }
}
