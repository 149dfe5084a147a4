//! Submission Payload Assembly
//!
//! Flattens typed form state into the multipart shape the endpoints
//! expect: bracket-keyed nested addresses, JSON-stringified list fields,
//! file parts carrying uri/name/mime.

use serde::{Deserialize, Serialize};

use crate::address::AddressSelection;
use crate::attachments::AttachmentAggregator;

/// One file part of the multipart body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePart {
    /// Form field the file belongs to, e.g. "valid_ids[]".
    pub field: String,
    pub uri: String,
    pub name: String,
    pub mime_type: String,
}

/// Ordered text fields plus file parts for one write call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub fields: Vec<(String, String)>,
    pub files: Vec<FilePart>,
}

impl SubmissionPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Optional fields are simply omitted when empty.
    pub fn push_text_opt(&mut self, key: impl Into<String>, value: &str) {
        if !value.trim().is_empty() {
            self.push_text(key, value.trim());
        }
    }

    pub fn push_flag(&mut self, key: impl Into<String>, value: bool) {
        self.push_text(key, if value { "true" } else { "false" });
    }

    /// Nested address record flattened field-by-field to bracket keys:
    /// `prefix[region]`, `prefix[region_code]`, and so on.
    pub fn push_address(&mut self, prefix: &str, address: &AddressSelection) {
        let mut pair = |field: &str, item: &Option<crate::address::RefItem>| {
            if let Some(item) = item {
                self.fields
                    .push((format!("{prefix}[{field}]"), item.name.clone()));
                self.fields
                    .push((format!("{prefix}[{field}_code]"), item.code.clone()));
            }
        };
        pair("region", &address.region);
        pair("province", &address.province);
        pair("city", &address.city);
        pair("barangay", &address.barangay);
        if !address.street.trim().is_empty() {
            self.fields
                .push((format!("{prefix}[street]"), address.street.trim().to_string()));
        }
    }

    /// Name-list fields ride as one JSON-encoded array.
    pub fn push_json_list(&mut self, key: impl Into<String>, items: &[String]) {
        let kept: Vec<&str> = items
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();
        self.push_text(
            key,
            serde_json::to_string(&kept).unwrap_or_else(|_| "[]".to_string()),
        );
    }

    /// File parts for an attachment field. Only locally picked files are
    /// uploaded; server-known attachments stay put unless they appear in
    /// `removed_attachments`.
    pub fn push_files(&mut self, field: &str, attachments: &AttachmentAggregator) {
        for attachment in attachments.files().iter().filter(|a| a.server_id.is_none()) {
            self.files.push(FilePart {
                field: field.to_string(),
                uri: attachment.uri.clone(),
                name: attachment.name.clone(),
                mime_type: attachment.mime_type.clone(),
            });
        }
    }

    /// Server-side deletions accompanying an update.
    pub fn push_removed(&mut self, attachments: &AttachmentAggregator) {
        if !attachments.removed_server_ids().is_empty() {
            self.push_json_list("removed_attachments", attachments.removed_server_ids());
        }
    }

    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{RefItem, NCR_CODE};
    use crate::attachments::{AttachmentAggregator, BudgetPolicy, PickedFile, MB};

    #[test]
    fn test_address_flattens_to_bracket_keys() {
        let mut address = AddressSelection::default();
        address.region = Some(RefItem::new(NCR_CODE, "NCR"));
        address.city = Some(RefItem::new("137504000", "Caloocan"));
        address.street = " 12 Sampaguita St ".into();

        let mut payload = SubmissionPayload::new();
        payload.push_address("address", &address);

        assert_eq!(payload.field("address[region]"), Some("NCR"));
        assert_eq!(payload.field("address[region_code]"), Some(NCR_CODE));
        assert_eq!(payload.field("address[city]"), Some("Caloocan"));
        assert_eq!(payload.field("address[street]"), Some("12 Sampaguita St"));
        // Unselected levels are absent, not empty.
        assert_eq!(payload.field("address[province]"), None);
    }

    #[test]
    fn test_list_fields_are_json_encoded() {
        let mut payload = SubmissionPayload::new();
        payload.push_json_list(
            "respondent_names",
            &["Juan Cruz".to_string(), "  ".to_string(), "Ana Reyes".to_string()],
        );
        assert_eq!(
            payload.field("respondent_names"),
            Some(r#"["Juan Cruz","Ana Reyes"]"#)
        );
    }

    #[test]
    fn test_removed_attachments_ride_the_payload() {
        let mut evidence = AttachmentAggregator::new(BudgetPolicy::complaint_evidence());
        evidence.hydrate_existing("srv-9", "https://cdn/a.jpg", "a.jpg", "image/jpeg", MB);
        evidence.remove(0);

        let mut payload = SubmissionPayload::new();
        payload.push_removed(&evidence);
        assert_eq!(payload.field("removed_attachments"), Some(r#"["srv-9"]"#));

        // Nothing removed, nothing sent.
        let untouched = AttachmentAggregator::new(BudgetPolicy::complaint_evidence());
        let mut empty = SubmissionPayload::new();
        empty.push_removed(&untouched);
        assert_eq!(empty.field("removed_attachments"), None);
    }

    #[test]
    fn test_file_parts_carry_uri_name_mime() {
        let mut ids = AttachmentAggregator::new(BudgetPolicy::identity_documents());
        ids.add(PickedFile {
            uri: "file:///tmp/id.jpg".into(),
            name: Some("id.jpg".into()),
            mime_type: Some("image/jpeg".into()),
            size_bytes: MB,
        })
        .unwrap();

        let mut payload = SubmissionPayload::new();
        payload.push_files("valid_ids[]", &ids);
        assert_eq!(payload.files.len(), 1);
        assert_eq!(payload.files[0].field, "valid_ids[]");
        assert_eq!(payload.files[0].mime_type, "image/jpeg");
    }
}
