//! HTTP Implementation
//!
//! reqwest-backed implementation of the remote contracts against an
//! environment-provided base URL. No client-side timeout is configured;
//! the backend contract does not define one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::{
    HouseholdApi, HouseholdHead, ReferenceApi, ResidentDirectory, ResidentRecord, SessionContext,
    SubmitApi, SubmitMode, SubmitRequest, SubmitResponse,
};
use crate::address::{AddressLevel, RefItem};
use crate::config::ApiConfig;

/// One client for all four remote contracts.
pub struct HttpApi {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl HttpApi {
    pub fn new(config: &ApiConfig, session: SessionContext) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            session,
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn options_url(&self, level: AddressLevel, parent_code: Option<&str>) -> String {
        let segment = match level {
            AddressLevel::Region => "regions",
            AddressLevel::Province => "provinces",
            AddressLevel::City => "cities",
            AddressLevel::Barangay => "barangays",
        };
        match parent_code {
            Some(parent) => format!(
                "{}/{}/{}",
                self.base_url,
                segment,
                urlencoding::encode(parent)
            ),
            None => format!("{}/{}", self.base_url, segment),
        }
    }
}

#[async_trait]
impl ReferenceApi for HttpApi {
    async fn fetch_options(
        &self,
        level: AddressLevel,
        parent_code: Option<&str>,
    ) -> Result<Vec<RefItem>> {
        let url = self.options_url(level, parent_code);
        debug!(%url, "fetching reference options");
        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .context("failed to fetch reference options")?;
        response
            .error_for_status()
            .context("reference endpoint returned an error")?
            .json::<Vec<RefItem>>()
            .await
            .context("failed to decode reference options")
    }
}

#[async_trait]
impl ResidentDirectory for HttpApi {
    async fn all_residents(&self) -> Result<Vec<ResidentRecord>> {
        let url = format!("{}/residents", self.base_url);
        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .context("failed to fetch resident records")?;
        response
            .error_for_status()
            .context("resident endpoint returned an error")?
            .json::<Vec<ResidentRecord>>()
            .await
            .context("failed to decode resident records")
    }
}

/// Build the multipart body: text fields in payload order, then one part
/// per file, read from its local uri.
async fn multipart_form(payload: &crate::submit::SubmissionPayload) -> Result<Form> {
    let mut form = Form::new();
    for (key, value) in &payload.fields {
        form = form.text(key.clone(), value.clone());
    }
    for file in &payload.files {
        // File uris are local paths by the time they reach the client.
        let path = file.uri.strip_prefix("file://").unwrap_or(&file.uri);
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("failed to read attachment '{}'", file.name))?;
        let part = Part::bytes(bytes)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .with_context(|| format!("invalid mime type '{}'", file.mime_type))?;
        form = form.part(file.field.clone(), part);
    }
    Ok(form)
}

#[async_trait]
impl SubmitApi for HttpApi {
    async fn submit(&self, request: SubmitRequest) -> Result<SubmitResponse> {
        let form = multipart_form(&request.payload).await?;

        let builder = match &request.mode {
            SubmitMode::Create => self
                .client
                .post(format!("{}/new/{}", self.base_url, request.resource)),
            SubmitMode::Edit { record_id } => self.client.put(format!(
                "{}/update/{}/{}",
                self.base_url,
                request.resource,
                urlencoding::encode(record_id)
            )),
        };

        let response = self
            .request(builder)
            .multipart(form)
            .send()
            .await
            .context("submit request failed to complete")?;

        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(SubmitResponse { status, body })
    }
}

#[async_trait]
impl HouseholdApi for HttpApi {
    async fn household_head(&self, household_id: &str) -> Result<HouseholdHead> {
        let url = format!(
            "{}/household/{}",
            self.base_url,
            urlencoding::encode(household_id)
        );
        let response = self
            .request(self.client.get(&url))
            .send()
            .await
            .context("failed to fetch household")?;
        response
            .error_for_status()
            .context("household endpoint returned an error")?
            .json::<HouseholdHead>()
            .await
            .context("failed to decode household record")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpApi {
        HttpApi::new(
            &ApiConfig::new("https://api.example.gov.ph"),
            SessionContext::default(),
        )
    }

    #[test]
    fn test_options_url_shape() {
        let api = api();
        assert_eq!(
            api.options_url(AddressLevel::Region, None),
            "https://api.example.gov.ph/regions"
        );
        assert_eq!(
            api.options_url(AddressLevel::City, Some("130000000")),
            "https://api.example.gov.ph/cities/130000000"
        );
    }

    #[test]
    fn test_parent_codes_are_path_encoded() {
        let api = api();
        let url = api.options_url(AddressLevel::Barangay, Some("cal oocan"));
        assert_eq!(url, "https://api.example.gov.ph/barangays/cal%20oocan");
    }

    #[tokio::test]
    async fn test_multipart_reads_local_files() {
        use crate::submit::SubmissionPayload;
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"jpeg bytes").unwrap();

        let mut payload = SubmissionPayload::new();
        payload.push_text("subject", "noise");
        payload.files.push(crate::submit::FilePart {
            field: "evidence[]".into(),
            uri: format!("file://{}", file.path().display()),
            name: "photo.jpg".into(),
            mime_type: "image/jpeg".into(),
        });

        assert!(multipart_form(&payload).await.is_ok());

        // A dangling uri surfaces as an error instead of a silent skip.
        payload.files[0].uri = "file:///nonexistent/photo.jpg".into();
        assert!(multipart_form(&payload).await.is_err());
    }
}
