//! Upload feature: transfers a built artifact to the hosted code repository.
//!
//! The [`Uploader`] trait is the seam between the publish workflow and the
//! transport. [`HttpUploader`] is the real client; tests use the exported
//! mock behind the `test-export-mocks` feature.

use std::env;
use std::path::Path;

use async_trait::async_trait;
use tracing::{error, info};

/// Everything the upload feature needs for a single artifact transfer.
/// Constructed for one call and discarded.
#[derive(Debug)]
pub struct ArtifactUpload<'a> {
    /// Built artifact on the local filesystem.
    pub local_file: &'a Path,
    /// File name the artifact is published under on the hosting service.
    pub remote_name: &'a str,
    /// Label shown next to the file on the hosting service.
    pub label: &'a str,
    /// Short description of the upload.
    pub summary: &'a str,
    /// Hosting service account name the upload is attributed to.
    pub account: &'a str,
    /// Plaintext account secret, passed through to the service unmodified.
    pub password: &'a str,
}

/// Returned by the hosting service once a transfer has completed.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadReceipt {
    pub remote_name: String,
    pub status: u16,
    pub location: Option<String>,
}

pub type UploadError = Box<dyn std::error::Error + Send + Sync>;

/// Trait for uploading artifacts to a remote hosting service.
/// Implemented by the real HTTP client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), mockall::automock)]
#[async_trait]
pub trait Uploader: Send + Sync {
    /// Transfer one built artifact, blocking until the remote call completes
    /// or fails. No retry and no timeout beyond what the transport applies.
    async fn upload_artifact<'a>(
        &self,
        req: ArtifactUpload<'a>,
    ) -> Result<UploadReceipt, UploadError>;
}

/// HTTP client posting artifacts to the hosting service's files endpoint.
pub struct HttpUploader {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpUploader {
    /// Builds an uploader for the given hosted project. The files endpoint
    /// can be overridden with the UPLOAD_ENDPOINT environment variable, which
    /// tests use to point at a local server.
    pub fn for_project(hosting_project: &str) -> Self {
        let endpoint = env::var("UPLOAD_ENDPOINT")
            .unwrap_or_else(|_| format!("https://{hosting_project}.googlecode.com/files"));
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Uploader for HttpUploader {
    async fn upload_artifact<'a>(
        &self,
        req: ArtifactUpload<'a>,
    ) -> Result<UploadReceipt, UploadError> {
        let contents = std::fs::read(req.local_file)?;
        info!(
            file = %req.local_file.display(),
            remote_name = req.remote_name,
            size = contents.len(),
            endpoint = %self.endpoint,
            "[UPLOAD] Posting artifact to hosting service"
        );

        // The hosting service expects a multipart form: summary and label
        // fields plus the file part carrying the remote file name.
        let form = reqwest::multipart::Form::new()
            .text("summary", req.summary.to_string())
            .text("label", req.label.to_string())
            .part(
                "filename",
                reqwest::multipart::Part::bytes(contents).file_name(req.remote_name.to_string()),
            );

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(req.account, Some(req.password))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        if !status.is_success() && !status.is_redirection() {
            error!(status = %status, remote_name = req.remote_name, "[UPLOAD] Hosting service rejected the artifact");
            return Err(format!(
                "upload of '{}' rejected by hosting service with status {status}",
                req.remote_name
            )
            .into());
        }

        info!(status = %status, remote_name = req.remote_name, "[UPLOAD] Artifact accepted");
        Ok(UploadReceipt {
            remote_name: req.remote_name.to_string(),
            status: status.as_u16(),
            location,
        })
    }
}
