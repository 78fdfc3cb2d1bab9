//! Resume file upload to remote storage.
//!
//! The returned [`FileHandle`] is opaque to the engine; only its URI is ever
//! consumed, as the file reference in an extraction request.

use serde::Deserialize;
use tracing::info;

use crate::error::{Result, VitaeError};

use super::http::shared_client;

const UPLOAD_URL: &str = "https://generativelanguage.googleapis.com/upload/v1beta/files";

/// Reference handle for an uploaded file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FileHandle {
    pub name: String,
    pub uri: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    file: FileHandle,
}

/// Upload a local resume file and return its remote reference.
pub async fn upload_resume(api_key: &str, path: &std::path::Path) -> Result<FileHandle> {
    upload_resume_at(UPLOAD_URL, api_key, path).await
}

/// Upload against an explicit endpoint (test servers).
pub async fn upload_resume_at(
    base_url: &str,
    api_key: &str,
    path: &std::path::Path,
) -> Result<FileHandle> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_string());

    let url = format!("{base_url}?key={api_key}");
    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("application/pdf")
        .map_err(VitaeError::Network)?;
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = shared_client().post(&url).multipart(form).send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(VitaeError::api(status.as_u16(), message));
    }

    let parsed: UploadResponse = response.json().await?;
    info!(name = %parsed.file.name, uri = %parsed.file.uri, "uploaded resume file");
    Ok(parsed.file)
}
