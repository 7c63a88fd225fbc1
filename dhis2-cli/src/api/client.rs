//! DHIS2 Web API client
//!
//! Thin wrapper over `reqwest` for the two metadata calls the CLI needs:
//! a filtered export and a partial metadata import.

use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::auth::{Credentials, split_server_url};
use super::metadata::{ImportReport, MetadataQuery};

#[derive(Debug, Clone)]
pub struct Dhis2Client {
    http: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl Dhis2Client {
    /// Build a client from a server URL, optionally carrying credentials
    pub fn new(server_url: &str) -> Result<Self> {
        let (base_url, credentials) = split_server_url(server_url)?;
        if credentials.is_none() {
            log::warn!("No credentials in URL or environment, requests will be anonymous");
        }

        let http = Client::builder()
            .user_agent(concat!("dhis2-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url,
            credentials,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credentials {
            Some(credentials) => request.basic_auth(&credentials.username, Some(&credentials.password)),
            None => request,
        }
    }

    /// Export metadata matching the query and decode it into `T`
    pub async fn get_metadata<T: DeserializeOwned>(&self, query: &MetadataQuery) -> Result<T> {
        let url = self.endpoint("metadata");
        let params = query.to_params();
        debug!("GET {} {:?}", url, params);

        let response = self
            .authorize(self.http.get(&url).query(&params))
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("GET {} failed with status {}: {}", url, status, body);
        }

        response
            .json::<T>()
            .await
            .context("Failed to parse metadata response")
    }

    /// Post a partial metadata payload as a single import.
    ///
    /// A conflict response still carries an import report, so it is decoded
    /// rather than treated as a transport failure.
    pub async fn post_metadata<P: Serialize + ?Sized>(&self, payload: &P) -> Result<ImportReport> {
        let url = self.endpoint("metadata");
        debug!("POST {}", url);

        let response = self
            .authorize(self.http.post(&url).json(payload))
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        let status = response.status();
        if !status.is_success() && status != reqwest::StatusCode::CONFLICT {
            let body = response.text().await.unwrap_or_default();
            bail!("POST {} failed with status {}: {}", url, status, body);
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse import response")?;

        ImportReport::from_response(body).context("Unexpected import report format")
    }
}
