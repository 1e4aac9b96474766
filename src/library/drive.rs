//! Remote lister for the Google Drive v3 `files` endpoint.
//!
//! Fetches the complete listing of PDFs in the configured folder, following
//! `nextPageToken` until exhausted. Either the full set is returned or an
//! error is raised; callers must never reconcile against a partial listing.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::library::error::SyncError;

const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3/files";
const PAGE_SIZE: u32 = 1000;
const FILE_FIELDS: &str =
    "nextPageToken,files(id,name,webViewLink,thumbnailLink,owners(displayName),mimeType,modifiedTime,size)";

// Bounded timeout so a hung remote call cannot block every waiting caller.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A file as reported by the Drive listing. Ephemeral; never persisted as-is.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    pub name: String,
    pub web_view_link: String,
    pub thumbnail_link: Option<String>,
    #[serde(default)]
    pub owners: Vec<DriveOwner>,
    pub mime_type: Option<String>,
    pub modified_time: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveOwner {
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilesListResponse {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

/// Seam between the refresh coordinator and the external API, so the
/// coordinator can be exercised in tests without the network.
#[async_trait]
pub trait RemoteLister: Send + Sync {
    /// Returns the complete remote listing, or an error. No partial results.
    async fn list_files(&self) -> Result<Vec<DriveFile>, SyncError>;
}

pub struct DriveClient {
    http: reqwest::Client,
    folder_id: String,
    api_key: String,
}

impl DriveClient {
    pub fn new(folder_id: String, api_key: String) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http, folder_id, api_key })
    }
}

#[async_trait]
impl RemoteLister for DriveClient {
    async fn list_files(&self) -> Result<Vec<DriveFile>, SyncError> {
        let query = format!(
            "'{}' in parents and mimeType='application/pdf' and trashed=false",
            self.folder_id
        );
        let mut files: Vec<DriveFile> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, String)> = vec![
                ("key", self.api_key.clone()),
                ("q", query.clone()),
                ("fields", FILE_FIELDS.to_string()),
                ("orderBy", "name".to_string()),
                ("pageSize", PAGE_SIZE.to_string()),
                ("includeItemsFromAllDrives", "true".to_string()),
                ("supportsAllDrives", "true".to_string()),
            ];
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let response = self
                .http
                .get(DRIVE_API_BASE)
                .query(&params)
                .send()
                .await
                .map_err(|e| SyncError::remote(None, e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(SyncError::remote(Some(status.as_u16()), body));
            }

            let page: FilesListResponse = response
                .json()
                .await
                .map_err(|e| SyncError::remote(None, format!("invalid listing response: {}", e)))?;

            debug!("Drive listing page returned {} files", page.files.len());
            files.extend(page.files);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(files)
    }
}
