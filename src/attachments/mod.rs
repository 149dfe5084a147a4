//! Attachment Aggregator
//!
//! Accumulates picked files for one form field under a byte budget, with
//! single-slot replacement, collision-safe naming, and the bookkeeping an
//! edit flow needs to tell the server which persisted files to delete.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

pub const MB: u64 = 1024 * 1024;

/// Normalized result contract of the device pickers (camera, media
/// library, document picker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedFile {
    pub uri: String,
    pub name: Option<String>,
    pub mime_type: Option<String>,
    pub size_bytes: u64,
}

/// Outcome of one picker invocation. Permission refusal is first-class and
/// must short-circuit the upload flow with an explicit notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Picked(PickedFile),
    Cancelled,
    PermissionDenied,
}

/// One file held by an attachment field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub uri: String,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    /// Derived preview, present only for video mime types; best-effort.
    pub thumbnail_uri: Option<String>,
    /// Set when the server already knows this file (edit flows).
    pub server_id: Option<String>,
}

impl Attachment {
    pub fn is_video(&self) -> bool {
        self.mime_type.starts_with("video/")
    }
}

/// Whether a field holds one file or many.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotPolicy {
    Single,
    Multi,
}

/// Per-field byte budget and slot behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetPolicy {
    pub max_total_bytes: u64,
    pub slot: SlotPolicy,
}

impl BudgetPolicy {
    /// 10 MB multi-file budget: valid IDs, supporting documents.
    pub fn identity_documents() -> Self {
        Self {
            max_total_bytes: 10 * MB,
            slot: SlotPolicy::Multi,
        }
    }

    /// 10 MB single slot: profile picture.
    pub fn profile_picture() -> Self {
        Self {
            max_total_bytes: 10 * MB,
            slot: SlotPolicy::Single,
        }
    }

    /// 50 MB multi-file budget: complaint evidence, may include video.
    pub fn complaint_evidence() -> Self {
        Self {
            max_total_bytes: 50 * MB,
            slot: SlotPolicy::Multi,
        }
    }

    /// 10 MB multi-file budget: announcement images.
    pub fn announcement_images() -> Self {
        Self {
            max_total_bytes: 10 * MB,
            slot: SlotPolicy::Multi,
        }
    }
}

/// Rejected add: accepting the file would exceed the field's budget.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(
    "adding this file ({attempted_bytes} bytes) would exceed the {limit_bytes}-byte limit for this field"
)]
pub struct SizeExceeded {
    pub limit_bytes: u64,
    pub attempted_bytes: u64,
}

/// The file set for one attachment field.
#[derive(Debug, Clone)]
pub struct AttachmentAggregator {
    policy: BudgetPolicy,
    files: Vec<Attachment>,
    removed_server_ids: Vec<String>,
}

impl AttachmentAggregator {
    pub fn new(policy: BudgetPolicy) -> Self {
        Self {
            policy,
            files: Vec::new(),
            removed_server_ids: Vec::new(),
        }
    }

    /// Accept a picked file, or reject it without mutation when the budget
    /// would be exceeded. Single-slot fields replace their occupant and
    /// check the new file alone.
    pub fn add(&mut self, picked: PickedFile) -> Result<&Attachment, SizeExceeded> {
        let projected = match self.policy.slot {
            SlotPolicy::Single => picked.size_bytes,
            SlotPolicy::Multi => self.total_bytes() + picked.size_bytes,
        };
        if projected > self.policy.max_total_bytes {
            warn!(
                attempted = picked.size_bytes,
                limit = self.policy.max_total_bytes,
                "attachment rejected: budget exceeded"
            );
            return Err(SizeExceeded {
                limit_bytes: self.policy.max_total_bytes,
                attempted_bytes: picked.size_bytes,
            });
        }

        if self.policy.slot == SlotPolicy::Single {
            if let Some(previous) = self.files.pop() {
                if let Some(server_id) = previous.server_id {
                    self.removed_server_ids.push(server_id);
                }
            }
        }

        let name = self.assign_name(&picked);
        let mime_type = picked
            .mime_type
            .unwrap_or_else(|| "application/octet-stream".to_string());
        self.files.push(Attachment {
            id: Uuid::new_v4(),
            uri: picked.uri,
            name,
            mime_type,
            size_bytes: picked.size_bytes,
            thumbnail_uri: None,
            server_id: None,
        });
        Ok(self.files.last().expect("just pushed"))
    }

    /// Preload a server-persisted attachment (edit flows). The server
    /// already accepted the file, so the budget is not re-checked.
    pub fn hydrate_existing(
        &mut self,
        server_id: impl Into<String>,
        uri: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
    ) {
        self.files.push(Attachment {
            id: Uuid::new_v4(),
            uri: uri.into(),
            name: name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            thumbnail_uri: None,
            server_id: Some(server_id.into()),
        });
    }

    /// Remove by index. Always succeeds for a valid index; removing a
    /// server-known attachment additionally records its server id so the
    /// update payload can tell the server to delete it.
    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        if index >= self.files.len() {
            return None;
        }
        let removed = self.files.remove(index);
        if let Some(server_id) = removed.server_id.clone() {
            debug!(%server_id, "marking persisted attachment for server-side removal");
            self.removed_server_ids.push(server_id);
        }
        Some(removed)
    }

    /// Video attachments that still need their derived preview.
    pub fn pending_thumbnails(&self) -> Vec<Uuid> {
        self.files
            .iter()
            .filter(|a| a.is_video() && a.thumbnail_uri.is_none())
            .map(|a| a.id)
            .collect()
    }

    /// Attach an out-of-band thumbnail. Failure to ever produce one never
    /// rolls back the attachment itself.
    pub fn set_thumbnail(&mut self, id: Uuid, uri: impl Into<String>) -> bool {
        match self.files.iter_mut().find(|a| a.id == id) {
            Some(attachment) => {
                attachment.thumbnail_uri = Some(uri.into());
                true
            }
            None => false,
        }
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }

    pub fn removed_server_ids(&self) -> &[String] {
        &self.removed_server_ids
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|a| a.size_bytes).sum()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Display name for a picked file: its own name, or the last uri
    /// segment, deduplicated with a numeric suffix on collision.
    fn assign_name(&self, picked: &PickedFile) -> String {
        let base = picked
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| {
                picked
                    .uri
                    .rsplit('/')
                    .next()
                    .filter(|s| !s.is_empty())
                    .unwrap_or("attachment")
                    .to_string()
            });

        if !self.files.iter().any(|a| a.name == base) {
            return base;
        }

        let (stem, ext) = match base.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem.to_string(), format!(".{ext}")),
            _ => (base.clone(), String::new()),
        };
        let mut counter = 1;
        loop {
            let candidate = format!("{stem} ({counter}){ext}");
            if !self.files.iter().any(|a| a.name == candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picked(name: &str, size: u64) -> PickedFile {
        PickedFile {
            uri: format!("file:///tmp/{name}"),
            name: Some(name.to_string()),
            mime_type: Some("image/jpeg".to_string()),
            size_bytes: size,
        }
    }

    #[test]
    fn test_budget_rejects_without_mutation() {
        let mut ids = AttachmentAggregator::new(BudgetPolicy::identity_documents());
        ids.add(picked("front.jpg", 7 * MB)).unwrap();
        assert_eq!(ids.total_bytes(), 7 * MB);

        let err = ids.add(picked("back.jpg", 4 * MB)).unwrap_err();
        assert_eq!(err.limit_bytes, 10 * MB);
        assert_eq!(err.attempted_bytes, 4 * MB);
        // The set is exactly the 7 MB file, unchanged.
        assert_eq!(ids.len(), 1);
        assert_eq!(ids.total_bytes(), 7 * MB);
    }

    #[test]
    fn test_single_slot_replaces_and_checks_new_file_alone() {
        let mut photo = AttachmentAggregator::new(BudgetPolicy::profile_picture());
        photo.add(picked("old.jpg", 9 * MB)).unwrap();
        // 9 + 8 would blow a shared budget; a single slot only weighs the new file.
        photo.add(picked("new.jpg", 8 * MB)).unwrap();
        assert_eq!(photo.len(), 1);
        assert_eq!(photo.files()[0].name, "new.jpg");
    }

    #[test]
    fn test_single_slot_replacement_of_persisted_file_records_removal() {
        let mut photo = AttachmentAggregator::new(BudgetPolicy::profile_picture());
        photo.hydrate_existing("srv-77", "https://cdn/p.jpg", "p.jpg", "image/jpeg", MB);
        photo.add(picked("new.jpg", MB)).unwrap();
        assert_eq!(photo.removed_server_ids(), ["srv-77"]);
    }

    #[test]
    fn test_remove_recomputes_total_and_records_server_id() {
        let mut evidence = AttachmentAggregator::new(BudgetPolicy::complaint_evidence());
        evidence.hydrate_existing("srv-12", "https://cdn/clip.mp4", "clip.mp4", "video/mp4", 20 * MB);
        evidence.add(picked("photo.jpg", 5 * MB)).unwrap();
        assert_eq!(evidence.total_bytes(), 25 * MB);

        let removed = evidence.remove(0).unwrap();
        assert_eq!(removed.server_id.as_deref(), Some("srv-12"));
        assert_eq!(evidence.total_bytes(), 5 * MB);
        assert_eq!(evidence.removed_server_ids(), ["srv-12"]);

        // Local-only removal records nothing.
        evidence.remove(0).unwrap();
        assert_eq!(evidence.removed_server_ids(), ["srv-12"]);
    }

    #[test]
    fn test_name_collision_gets_numeric_suffix() {
        let mut ids = AttachmentAggregator::new(BudgetPolicy::identity_documents());
        ids.add(picked("id.jpg", MB)).unwrap();
        ids.add(picked("id.jpg", MB)).unwrap();
        ids.add(picked("id.jpg", MB)).unwrap();
        let names: Vec<_> = ids.files().iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["id.jpg", "id (1).jpg", "id (2).jpg"]);
    }

    #[test]
    fn test_name_derived_from_uri_when_picker_gives_none() {
        let mut ids = AttachmentAggregator::new(BudgetPolicy::identity_documents());
        let file = PickedFile {
            uri: "file:///var/mobile/tmp/IMG_0042.HEIC".into(),
            name: None,
            mime_type: None,
            size_bytes: MB,
        };
        let attachment = ids.add(file).unwrap();
        assert_eq!(attachment.name, "IMG_0042.HEIC");
        assert_eq!(attachment.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_video_thumbnail_is_best_effort() {
        let mut evidence = AttachmentAggregator::new(BudgetPolicy::complaint_evidence());
        let clip = PickedFile {
            uri: "file:///tmp/clip.mp4".into(),
            name: Some("clip.mp4".into()),
            mime_type: Some("video/mp4".into()),
            size_bytes: 10 * MB,
        };
        let id = evidence.add(clip).unwrap().id;
        assert_eq!(evidence.pending_thumbnails(), vec![id]);

        assert!(evidence.set_thumbnail(id, "file:///tmp/clip_thumb.jpg"));
        assert!(evidence.pending_thumbnails().is_empty());
        // Unknown id (e.g. attachment removed before the thumbnail landed)
        // is simply ignored.
        assert!(!evidence.set_thumbnail(Uuid::new_v4(), "x"));
    }
}
