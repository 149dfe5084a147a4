//! Complaint Form
//!
//! Subject/description, respondent name list, and evidence attachments
//! under the large budget (video allowed).

use serde_json::Value;

use crate::attachments::{AttachmentAggregator, BudgetPolicy};
use crate::submit::{SubmissionPayload, SubmitForm};
use crate::validation::{evaluate, FieldRule, FieldValue, RuleKind, Violation};

#[derive(Debug)]
pub struct ComplaintForm {
    pub subject: String,
    pub description: String,
    pub incident_date: String,
    pub incident_location: String,
    pub respondent_names: Vec<String>,
    pub evidence: AttachmentAggregator,
}

impl Default for ComplaintForm {
    fn default() -> Self {
        Self {
            subject: String::new(),
            description: String::new(),
            incident_date: String::new(),
            incident_location: String::new(),
            respondent_names: Vec::new(),
            evidence: AttachmentAggregator::new(BudgetPolicy::complaint_evidence()),
        }
    }
}

impl ComplaintForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate from a fetched record (edit mode). Server-persisted
    /// evidence is hydrated so removal is tracked against its server id.
    pub fn from_record(record: &Value) -> Self {
        let mut form = Self::default();
        let text = |key: &str| {
            record
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        form.subject = text("subject");
        form.description = text("description");
        form.incident_date = text("incident_date");
        form.incident_location = text("incident_location");
        if let Some(names) = record.get("respondent_names").and_then(Value::as_array) {
            form.respondent_names = names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect();
        }
        if let Some(files) = record.get("evidence").and_then(Value::as_array) {
            for file in files {
                let field = |key: &str| file.get(key).and_then(Value::as_str).unwrap_or_default();
                form.evidence.hydrate_existing(
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
                key: "subject",
                label: "Subject",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.subject.clone()),
            },
            FieldRule {
                key: "description",
                label: "Description",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.description.clone()),
            },
            FieldRule {
                key: "incident_date",
                label: "Date of Incident",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::Text(f.incident_date.clone()),
            },
            FieldRule {
                key: "respondent_names",
                label: "Respondent",
                applies_when: |_| true,
                kind: RuleKind::Required,
                value_of: |f| FieldValue::List(f.respondent_names.clone()),
            },
        ]
    }
}

impl SubmitForm for ComplaintForm {
    fn resource(&self) -> &'static str {
        "complaint"
    }

    fn resource_label(&self) -> &'static str {
        "complaint"
    }

    fn violations(&self) -> Vec<Violation> {
        evaluate(self, &Self::rules())
    }

    fn payload(&self) -> SubmissionPayload {
        let mut payload = SubmissionPayload::new();
        payload.push_text("subject", self.subject.trim());
        payload.push_text("description", self.description.trim());
        payload.push_text("incident_date", self.incident_date.trim());
        payload.push_text_opt("incident_location", &self.incident_location);
        payload.push_json_list("respondent_names", &self.respondent_names);
        payload.push_files("evidence[]", &self.evidence);
        payload.push_removed(&self.evidence);
        payload
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}
