//! Report document operations: upload, list, delete, download.

use std::path::{Path, PathBuf};

use reqwest::multipart;

use super::client::ApiClient;
use super::types::{ReportRecord, UploadResponse};
use crate::error::PortalError;

/// Marker text the server uses to signal an empty collection on the
/// listing endpoint. Translated to an empty list here and nowhere else.
const NO_FILES_MARKER: &str = "No files found";

/// POST /api/documents/upload with one multipart `file` part per path.
pub async fn upload(api: &ApiClient, paths: &[PathBuf]) -> Result<UploadResponse, PortalError> {
    let mut form = multipart::Form::new();
    for path in paths {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        let part = multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        form = form.part("file", part);
    }

    let resp = api
        .authenticated_multipart_post("/api/documents/upload", form)
        .await?;
    let resp = super::check_auth(api, resp).await?;

    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    if !status.is_success() {
        // The backend reports a duplicate file name as a 500 whose body
        // mentions "Duplicate entry".
        if text.contains("Duplicate entry") {
            let name = duplicate_file_name(&text).unwrap_or("This file");
            return Err(PortalError::Api(format!(
                "{} already exists. Rename it or choose a different file.",
                name
            )));
        }
        return Err(PortalError::Api(format!(
            "Upload failed ({}): {}",
            status, text
        )));
    }

    let body = serde_json::from_str(&text).unwrap_or_else(|_| UploadResponse {
        file_name: None,
        message: if text.trim().is_empty() {
            None
        } else {
            Some(text)
        },
    });
    Ok(body)
}

/// GET /api/documents.
///
/// The server signals "no records" as an error-shaped text body rather
/// than an empty array; that text, an empty array, and an empty body
/// (204) all come back as an empty list.
pub async fn list(api: &ApiClient) -> Result<Vec<ReportRecord>, PortalError> {
    let resp = api.authenticated_get("/api/documents").await?;
    let resp = super::check_auth(api, resp).await?;

    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();

    if text.contains(NO_FILES_MARKER) {
        return Ok(Vec::new());
    }
    if !status.is_success() {
        return Err(PortalError::Api(format!(
            "Fetching reports failed ({}): {}",
            status, text
        )));
    }
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    serde_json::from_str(&text)
        .map_err(|e| PortalError::Api(format!("Unexpected listing payload: {}", e)))
}

/// DELETE /api/documents/{id}. Returns the server's result message.
pub async fn delete(api: &ApiClient, id: u64) -> Result<String, PortalError> {
    let resp = api
        .authenticated_delete(&format!("/api/documents/{}", id))
        .await?;
    let resp = super::check_auth(api, resp).await?;

    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    if !status.is_success() {
        return Err(PortalError::Api(format!(
            "Delete failed ({}): {}",
            status, text
        )));
    }
    log::info!("Deleted report {}", id);
    Ok(text)
}

/// GET /api/documents/{id}, returning the raw report bytes.
pub async fn download(api: &ApiClient, id: u64) -> Result<Vec<u8>, PortalError> {
    let resp = api
        .authenticated_get(&format!("/api/documents/{}", id))
        .await?;
    let resp = super::check_auth(api, resp).await?;

    if !resp.status().is_success() {
        let status = resp.status().as_u16();
        let message = resp.text().await.unwrap_or_default();
        return Err(PortalError::Download { status, message });
    }

    let bytes = resp.bytes().await?;
    Ok(bytes.to_vec())
}

/// Download a report and save it under `file_name` in `dir`.
///
/// The payload is staged in exactly one temporary file next to the final
/// destination and renamed into place; the temporary file is removed if
/// any step fails. Returns the final path.
pub async fn download_and_save(
    api: &ApiClient,
    id: u64,
    file_name: &str,
    dir: &Path,
) -> Result<PathBuf, PortalError> {
    let bytes = download(api, id).await?;

    // Keep only the final path component of whatever name the listing
    // handed us; fall back to an id-derived name.
    let file_name = Path::new(file_name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("document_{}", id));

    tokio::fs::create_dir_all(dir).await?;
    let final_path = dir.join(&file_name);
    let tmp_path = dir.join(format!(".{}.part", file_name));

    if let Err(e) = tokio::fs::write(&tmp_path, &bytes).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }
    if let Err(e) = tokio::fs::rename(&tmp_path, &final_path).await {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(e.into());
    }

    log::info!("Saved report {} to {}", id, final_path.display());
    Ok(final_path)
}

/// Pull the offending file name out of the backend's duplicate-entry
/// exception text (`..."fileName":"scan.pdf"...`).
fn duplicate_file_name(body: &str) -> Option<&str> {
    const KEY: &str = "\"fileName\":\"";
    let start = body.find(KEY)? + KEY.len();
    let rest = &body[start..];
    let end = rest.find('"')?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_file_name_extraction() {
        let body = r#"Exception during upload: could not execute statement; Duplicate entry; {"fileName":"scan.pdf","message":null}"#;
        assert_eq!(duplicate_file_name(body), Some("scan.pdf"));
        assert_eq!(duplicate_file_name("Duplicate entry"), None);
    }
}
