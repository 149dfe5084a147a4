//! Announcement Form
//!
//! Shared by the create and edit screens; edit mode pre-populates from the
//! fetched record and tracks server-side attachment removals.

use serde_json::Value;

use crate::attachments::{AttachmentAggregator, BudgetPolicy};
use crate::submit::{SubmissionPayload, SubmitForm};
use crate::validation::{evaluate, FieldRule, FieldValue, RuleKind, Violation};

#[derive(Debug)]
pub struct AnnouncementForm {
    pub title: String,
    pub body: String,
    pub audience: String,
    pub attachments: AttachmentAggregator,
}

impl Default for AnnouncementForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            audience: String::new(),
            attachments: AttachmentAggregator::new(BudgetPolicy::announcement_images()),
        }
    }
}

impl AnnouncementForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate from a fetched record (edit mode).
    pub fn from_record(record: &Value) -> Self {
        let mut form = Self::default();
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        form.title = text("title");
        form.body = text("body");
        form.audience = text("audience");
        if let Some(files) = record.get("attachments").and_then(Value::as_array) {
            for file in files {
                let field = |key: &str| file.get(key).and_then(Value::as_str).unwrap_or_default();
                form.attachments.hydrate_existing(
                    field("id"),
                    field("url"),
                    field("filename"),
                    file.get("mime_type")
                        .and_then(Value::as_str)
                        .unwrap_or("application/octet-stream"),
                    file.get("size_bytes").and_then(Value::as_u64).unwrap_or(0),
                );
            }
        }
        form
    }

    pub fn rules() -> Vec<FieldRule<Self>> {
        vec![
            FieldRule {
                key: "title",
                label: "Title",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.title.clone()),
            },
            FieldRule {
                key: "body",
                label: "Body",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.body.clone()),
            },
        ]
    }
}

impl SubmitForm for AnnouncementForm {
    fn resource(&self) -> &'static str {
        "announcement"
    }

    fn resource_label(&self) -> &'static str {
        "announcement"
    }

    fn violations(&self) -> Vec<Violation> {
        evaluate(self, &Self::rules())
    }

    fn payload(&self) -> SubmissionPayload {
        let mut payload = SubmissionPayload::new();
        payload.push_text("title", self.title.trim());
        payload.push_text("body", self.body.trim());
        payload.push_text_opt("audience", &self.audience);
        payload.push_files("attachments[]", &self.attachments);
        payload.push_removed(&self.attachments);
        payload
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_and_body_are_required() {
        let form = AnnouncementForm::new();
        let labels: Vec<_> = form.violations().iter().map(|v| v.label.clone()).collect();
        assert_eq!(labels, vec!["Title", "Body"]);
    }

    #[test]
    fn test_edit_round_trip_tracks_removals() {
        let record = json!({
            "title": "Water Interruption",
            "body": "Service advisory for Zone 3.",
            "audience": "zone-3",
            "attachments": [
                {"id": "srv-1", "url": "https://cdn/a.jpg", "filename": "advisory.jpg",
                 "mime_type": "image/jpeg", "size_bytes": 2048}
            ]
        });
        let mut form = AnnouncementForm::from_record(&record);
        assert!(form.violations().is_empty());
        assert_eq!(form.attachments.len(), 1);

        form.attachments.remove(0);
        let payload = form.payload();
        assert!(payload.files.is_empty());
        assert_eq!(payload.field("removed_attachments"), Some(r#"["srv-1"]"#));
    }
}
