//! Remote API Contracts
//!
//! Trait seams for every network suspension the engine performs. Tests and
//! previews substitute mocks; `http::HttpApi` is the reqwest-backed
//! implementation.

pub mod http;

pub use http::HttpApi;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::address::{AddressLevel, RefItem};
use crate::submit::payload::SubmissionPayload;

/// Ambient session data, passed explicitly instead of read mid-flow.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub user_id: Option<String>,
    pub auth_token: Option<String>,
}

impl SessionContext {
    pub fn authenticated(user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            auth_token: Some(token.into()),
        }
    }
}

/// The 4-level reference-data hierarchy chain.
#[async_trait]
pub trait ReferenceApi: Send + Sync {
    /// Candidate list for `level`, scoped by the parent selection's code
    /// (absent only for the region level).
    async fn fetch_options(
        &self,
        level: AddressLevel,
        parent_code: Option<&str>,
    ) -> Result<Vec<RefItem>>;
}

/// One resident row as the duplicate pre-check consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResidentRecord {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
}

/// Source of the existing-records set; the comparison itself is local.
#[async_trait]
pub trait ResidentDirectory: Send + Sync {
    async fn all_residents(&self) -> Result<Vec<ResidentRecord>>;
}

/// Create vs. update write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Edit { record_id: String },
}

/// One multipart write request.
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    /// Endpoint resource segment, e.g. "resident", "complaint".
    pub resource: &'static str,
    pub mode: SubmitMode,
    pub payload: SubmissionPayload,
}

/// What came back from the write, before classification.
#[derive(Debug, Clone)]
pub struct SubmitResponse {
    pub status: u16,
    pub body: Value,
}

#[async_trait]
pub trait SubmitApi: Send + Sync {
    /// Issue the write. `Err` means the request never completed (transport
    /// failure); HTTP-level rejection comes back as a `SubmitResponse`.
    async fn submit(&self, request: SubmitRequest) -> Result<SubmitResponse>;
}

/// Head-of-household display data, consumed by the name-masking helper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseholdHead {
    pub household_id: String,
    pub head_name: String,
}

#[async_trait]
pub trait HouseholdApi: Send + Sync {
    async fn household_head(&self, household_id: &str) -> Result<HouseholdHead>;
}
