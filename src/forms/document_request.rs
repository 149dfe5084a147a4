//! Document Request Form
//!
//! Certificate/clearance requests: document type, purpose, copy count,
//! and one set of supporting identity documents.

use crate::attachments::{AttachmentAggregator, BudgetPolicy};
use crate::submit::{SubmissionPayload, SubmitForm};
use crate::validation::{evaluate, FieldRule, FieldValue, RuleKind, Violation};

#[derive(Debug)]
pub struct DocumentRequestForm {
    pub document_type: String,
    pub purpose: String,
    pub quantity: String,
    pub valid_id: AttachmentAggregator,
}

impl Default for DocumentRequestForm {
    fn default() -> Self {
        Self {
            document_type: String::new(),
            purpose: String::new(),
            quantity: String::new(),
            valid_id: AttachmentAggregator::new(BudgetPolicy::identity_documents()),
        }
    }
}

impl DocumentRequestForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rules() -> Vec<FieldRule<Self>> {
        vec![
            FieldRule {
                key: "document_type",
                label: "Document Type",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.document_type.clone()),
            },
            FieldRule {
                key: "purpose",
                label: "Purpose",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.purpose.clone()),
            },
            FieldRule {
                key: "quantity",
                label: "Number of Copies",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.quantity.clone()),
            },
            FieldRule {
                key: "quantity",
                label: "Number of Copies",
                applies_when: |_| true,
                kind: RuleKind::NumericOnly,
                value_of: |f| FieldValue::Text(f.quantity.clone()),
            },
            FieldRule {
                key: "valid_id",
                label: "Valid ID",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Count(f.valid_id.len()),
            },
        ]
    }
}

impl SubmitForm for DocumentRequestForm {
    fn resource(&self) -> &'static str {
        "document-request"
    }

    fn resource_label(&self) -> &'static str {
        "document request"
    }

    fn violations(&self) -> Vec<Violation> {
        evaluate(self, &Self::rules())
    }

    fn payload(&self) -> SubmissionPayload {
        let mut payload = SubmissionPayload::new();
        payload.push_text("document_type", self.document_type.as_str());
        payload.push_text("purpose", self.purpose.trim());
        payload.push_text("quantity", self.quantity.trim());
        payload.push_files("valid_id[]", &self.valid_id);
        payload
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::{PickedFile, MB};
    use crate::validation::ViolationKind;

    #[test]
    fn test_quantity_must_be_numeric() {
        let mut form = DocumentRequestForm::new();
        form.document_type = "Barangay Clearance".into();
        form.purpose = "Employment".into();
        form.quantity = "two".into();
        form.valid_id
            .add(PickedFile {
                uri: "file:///tmp/id.jpg".into(),
                name: Some("id.jpg".into()),
                mime_type: Some("image/jpeg".into()),
                size_bytes: MB,
            })
            .unwrap();

        let violations = form.violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::FormatInvalid);

        form.quantity = "2".into();
        assert!(form.violations().is_empty());
    }

    #[test]
    fn test_missing_attachment_is_a_required_violation() {
        let mut form = DocumentRequestForm::new();
        form.document_type = "Barangay Clearance".into();
        form.purpose = "Employment".into();
        form.quantity = "1".into();
        let labels: Vec<_> = form.violations().iter().map(|v| v.label.clone()).collect();
        assert_eq!(labels, vec!["Valid ID"]);
    }
}
