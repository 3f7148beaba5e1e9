//! WordPress REST API Client
//!
//! HTTP client for the `/wp-json/wp/v2` endpoints used by the console.
//! Every call is a single round trip with no retries; failures are reported once.

use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use super::error::{WpError, WpResult};
use super::types::{
    content_types_from_json, AuthToken, ContentType, Credentials, Entry, EntryDraft, RawEntry,
    UserInfo,
};

const API_PREFIX: &str = "wp-json/wp/v2";

/// WordPress REST API client
///
/// Holds no site or credentials of its own; those live in each operator's
/// session and are passed per call.
#[derive(Clone)]
pub struct WpClient {
    client: Client,
}

/// Configuration for the WordPress client
#[derive(Debug, Clone)]
pub struct WpClientConfig {
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// User agent sent upstream
    pub user_agent: String,
}

impl Default for WpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            user_agent: format!("cpt-console/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl WpClient {
    /// Create a new client with the given configuration
    pub fn new(config: WpClientConfig) -> WpResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(WpError::Connection)?;

        Ok(Self { client })
    }

    /// Wrap an existing `reqwest::Client`; its own timeout and user agent apply
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Verify credentials against `GET /users/me`
    ///
    /// Only HTTP 200 counts as success; the returned credentials carry the
    /// normalised site URL.
    pub async fn authenticate(
        &self,
        site_url: &str,
        username: &str,
        password: &str,
    ) -> WpResult<(Credentials, UserInfo)> {
        let credentials = Credentials::new(site_url, AuthToken::basic(username, password));
        let url = endpoint(&credentials.site_url, &["users", "me"])?;

        let response = self.send(self.request(Method::GET, url, &credentials.token)).await?;
        if response.status().as_u16() != 200 {
            return Err(WpError::from_response(response).await);
        }

        let user: UserInfo = response.json().await.map_err(WpError::from_transport)?;
        tracing::info!(
            site = %credentials.site_url,
            user = %user.display_name(),
            "Authenticated against WordPress"
        );
        Ok((credentials, user))
    }

    /// `GET /types`, with internal and non-REST types removed
    pub async fn list_content_types(
        &self,
        credentials: &Credentials,
    ) -> WpResult<BTreeMap<String, ContentType>> {
        let url = endpoint(&credentials.site_url, &["types"])?;
        let response = self.get_ok(url, credentials).await?;

        let raw: BTreeMap<String, Value> =
            response.json().await.map_err(WpError::from_transport)?;
        let types = content_types_from_json(raw);

        tracing::debug!(count = types.len(), "Loaded content types");
        Ok(types)
    }

    /// `GET /{collection}`
    pub async fn list_entries(
        &self,
        credentials: &Credentials,
        collection: &str,
    ) -> WpResult<Vec<Entry>> {
        let url = endpoint(&credentials.site_url, &[collection])?;
        let response = self.get_ok(url, credentials).await?;

        let raw: Vec<RawEntry> = response.json().await.map_err(WpError::from_transport)?;
        tracing::debug!(collection, count = raw.len(), "Loaded entries");
        Ok(raw.into_iter().map(Entry::from).collect())
    }

    /// `GET /{collection}/{id}`, including any custom meta boxes
    pub async fn get_entry(
        &self,
        credentials: &Credentials,
        collection: &str,
        id: u64,
    ) -> WpResult<Entry> {
        let url = endpoint(&credentials.site_url, &[collection, &id.to_string()])?;
        let response = self.get_ok(url, credentials).await?;

        let raw: RawEntry = response.json().await.map_err(WpError::from_transport)?;
        Ok(Entry::from(raw))
    }

    /// Create (`POST /{collection}`) or update (`POST /{collection}/{id}`) an entry
    pub async fn save_entry(
        &self,
        credentials: &Credentials,
        collection: &str,
        draft: &EntryDraft,
        id: Option<u64>,
    ) -> WpResult<Entry> {
        let url = match id {
            Some(id) => endpoint(&credentials.site_url, &[collection, &id.to_string()])?,
            None => endpoint(&credentials.site_url, &[collection])?,
        };

        let request = self
            .request(Method::POST, url, &credentials.token)
            .json(draft);
        let response = self.send(request).await?;

        if !matches!(response.status().as_u16(), 200 | 201) {
            return Err(WpError::from_response(response).await);
        }

        let raw: RawEntry = response.json().await.map_err(WpError::from_transport)?;
        let saved = Entry::from(raw);
        tracing::info!(
            collection,
            id = ?saved.id,
            created = id.is_none(),
            meta_fields = draft.meta.len(),
            "Saved entry"
        );
        Ok(saved)
    }

    /// `DELETE /{collection}/{id}?force=true`; true on HTTP 200
    pub async fn delete_entry(
        &self,
        credentials: &Credentials,
        collection: &str,
        id: u64,
    ) -> WpResult<bool> {
        let mut url = endpoint(&credentials.site_url, &[collection, &id.to_string()])?;
        url.query_pairs_mut().append_pair("force", "true");

        let response = self
            .send(self.request(Method::DELETE, url, &credentials.token))
            .await?;

        if response.status().as_u16() != 200 {
            return Err(WpError::from_response(response).await);
        }

        tracing::info!(collection, id, "Deleted entry");
        Ok(true)
    }

    fn request(&self, method: Method, url: Url, token: &AuthToken) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(reqwest::header::AUTHORIZATION, token.header_value())
    }

    async fn send(&self, request: RequestBuilder) -> WpResult<reqwest::Response> {
        request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "WordPress request failed");
            WpError::Connection(e)
        })
    }

    async fn get_ok(&self, url: Url, credentials: &Credentials) -> WpResult<reqwest::Response> {
        let response = self
            .send(self.request(Method::GET, url, &credentials.token))
            .await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(WpError::from_response(response).await)
        }
    }
}

/// Build `{site}/wp-json/wp/v2/{segments...}`, percent-encoding each segment
fn endpoint(site_url: &str, segments: &[&str]) -> WpResult<Url> {
    let invalid = || WpError::InvalidSiteUrl(site_url.to_string());

    let mut url = Url::parse(site_url).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }

    url.path_segments_mut()
        .map_err(|_| invalid())?
        .pop_if_empty()
        .extend(API_PREFIX.split('/'))
        .extend(segments);

    Ok(url)
}
