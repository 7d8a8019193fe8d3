//! # linklocker-rs
//!
//! A Rust client library for the linklocker bookmark API.
//!
//! The crate contains the JSON bodies exchanged with a linklocker server and a small
//! async client wrapping the five link endpoints.
//!
//! ## Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), linklocker_rs::LinkLockerApiError> {
//! use linklocker_rs::LinkLockerApi;
//!
//! let api = LinkLockerApi::new("http://localhost:8080");
//!
//! let link = api.create_link("https://www.rust-lang.org", None).await?;
//! println!("stored {} as #{} ({:?})", link.url, link.id, link.title);
//!
//! api.mark_as_read(link.id).await?;
//! # Ok(())
//! # }
//! ```
//!

use chrono::{DateTime, Utc};
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Request payload for storing a new link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLinkRequest {
    /// The URL to store.
    pub url: String,
    /// An explicit title. When absent the server tries to read it from the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// A stored link as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Identifier assigned by the server on creation.
    pub id: i32,
    /// The stored URL.
    pub url: String,
    /// Title supplied on creation or extracted from the page, if any.
    pub title: Option<String>,
    /// Whether the link was marked as read.
    pub is_read: bool,
    /// Moment the link was stored.
    pub created_at: DateTime<Utc>,
}

/// Response body of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteLinkResponse {
    pub ok: bool,
    pub detail: String,
}

/// Body of every non-success response produced by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// A client for interacting with a linklocker server.
///
/// # Example
///
/// ```rust,no_run
/// # async fn example() -> Result<(), linklocker_rs::LinkLockerApiError> {
/// use linklocker_rs::LinkLockerApi;
///
/// let api = LinkLockerApi::new("http://localhost:8080");
/// let unread = api.list_links(Some(false)).await?;
/// println!("{} links left to read", unread.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LinkLockerApi {
    url: String,
    client: reqwest::Client,
}

/// Errors that can occur when talking to a linklocker server.
#[derive(Debug, Error)]
pub enum LinkLockerApiError {
    /// The configured server URL could not be used to build a request URL.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// Sending the request or receiving the response failed.
    #[error("Request error: {0}")]
    RequestError(String),
    /// The response body did not have the expected shape.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),
    /// The referenced link does not exist.
    #[error("Link not found")]
    NotFound,
    /// The server answered with a status other than success or not-found.
    #[error("Unexpected status {status}: {detail}")]
    UnexpectedStatus { status: u16, detail: String },
}

impl LinkLockerApi {
    /// Creates a client for the server reachable at `url`, e.g. `http://localhost:8080`.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Uses a preconfigured [`reqwest::Client`], e.g. one with custom timeouts.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn endpoint(&self, path: &str) -> Result<Url, LinkLockerApiError> {
        Url::parse(&format!("{}{}", self.url, path))
            .map_err(|e| LinkLockerApiError::ConfigurationError(e.to_string()))
    }

    /// Stores `url`. Without a `title` the server attempts to fetch one from the page.
    ///
    /// # Errors
    ///
    /// Fails with `RequestError` if the server cannot be reached and with
    /// `UnexpectedStatus` if it rejects the payload.
    pub async fn create_link(
        &self,
        url: &str,
        title: Option<&str>,
    ) -> Result<Link, LinkLockerApiError> {
        let request = self
            .client
            .post(self.endpoint("/links")?)
            .json(&CreateLinkRequest {
                url: url.to_string(),
                title: title.map(str::to_string),
            });

        send(request).await
    }

    /// Lists all stored links, optionally only the ones with the given read state.
    pub async fn list_links(&self, is_read: Option<bool>) -> Result<Vec<Link>, LinkLockerApiError> {
        let mut url = self.endpoint("/links")?;
        if let Some(is_read) = is_read {
            url.query_pairs_mut()
                .append_pair("is_read", &is_read.to_string());
        }

        send(self.client.get(url)).await
    }

    /// Fetches a single link.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no link with this id exists.
    pub async fn get_link(&self, id: i32) -> Result<Link, LinkLockerApiError> {
        send(self.client.get(self.endpoint(&format!("/links/{id}"))?)).await
    }

    /// Marks a link as read. Marking an already read link again is not an error.
    pub async fn mark_as_read(&self, id: i32) -> Result<Link, LinkLockerApiError> {
        send(
            self.client
                .put(self.endpoint(&format!("/links/{id}/mark-as-read"))?),
        )
        .await
    }

    /// Deletes a link.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no link with this id exists.
    pub async fn delete_link(&self, id: i32) -> Result<DeleteLinkResponse, LinkLockerApiError> {
        send(self.client.delete(self.endpoint(&format!("/links/{id}"))?)).await
    }
}

async fn send<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, LinkLockerApiError> {
    let resp = request
        .send()
        .await
        .map_err(|e| LinkLockerApiError::RequestError(e.to_string()))?;

    let status = resp.status();

    if status == StatusCode::NOT_FOUND {
        return Err(LinkLockerApiError::NotFound);
    }

    if !status.is_success() {
        let detail = resp
            .json::<ErrorResponse>()
            .await
            .map(|e| e.detail)
            .unwrap_or_default();

        return Err(LinkLockerApiError::UnexpectedStatus {
            status: status.as_u16(),
            detail,
        });
    }

    resp.json::<T>()
        .await
        .map_err(|e| LinkLockerApiError::DeserializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let api = LinkLockerApi::new("http://localhost:8080/");

        let url = api.endpoint("/links/7").unwrap();

        assert_eq!(url.as_str(), "http://localhost:8080/links/7");
    }

    #[test]
    fn test_endpoint_rejects_garbage_base() {
        let api = LinkLockerApi::new("not a url");

        assert!(matches!(
            api.endpoint("/links"),
            Err(LinkLockerApiError::ConfigurationError(_))
        ));
    }

    #[test]
    fn test_create_request_omits_missing_title() {
        let body = serde_json::to_value(CreateLinkRequest {
            url: "https://example.com".to_string(),
            title: None,
        })
        .unwrap();

        assert_eq!(body, serde_json::json!({ "url": "https://example.com" }));
    }

    #[test]
    fn test_link_accepts_null_title() {
        let link: Link = serde_json::from_str(
            r#"{"id":1,"url":"https://example.com","title":null,"is_read":false,"created_at":"2025-01-01T10:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(link.id, 1);
        assert_eq!(link.title, None);
        assert!(!link.is_read);
    }
}
