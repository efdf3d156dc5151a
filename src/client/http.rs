// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! HTTP implementation of [`ConfigDnsClient`] on top of `reqwest`.
//!
//! Record sets live at
//! `{endpoint}/config-dns/v2/zones/{zone}/names/{name}/types/{type}`:
//!
//! | Operation | Method |
//! |---|---|
//! | read | `GET` |
//! | create | `POST` |
//! | replace | `PUT` |
//! | delete | `DELETE` |
//!
//! Zones are read with `GET {endpoint}/config-dns/v2/zones/{zone}` and created
//! with `POST {endpoint}/config-dns/v2/zones?contractId=..&gid=..`.
//!
//! Non-success responses are turned into structured errors by
//! [`classify_response`]. That function is the only place that looks at
//! response text.

use super::{ConfigDnsClient, RecordBody, ZoneBody};
use crate::constants::{CONFIG_DNS_API_PREFIX, SOA_SERIAL_SENTINEL};
use crate::dns_errors::ConfigDnsError;
use crate::record_type::RecordType;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Normalizes an endpoint into a base URL without a trailing slash.
///
/// Endpoints given without a scheme default to `https://`.
pub(crate) fn build_api_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim().trim_end_matches('/');
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    }
}

/// Maps a non-success response to a structured error kind.
///
/// The SOA serial precondition is recognized by its message regardless of
/// status code, because the remote reports it with varying statuses.
#[must_use]
pub fn classify_response(status: StatusCode, body: &str) -> ConfigDnsError {
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.to_string()
    };

    if body.contains(SOA_SERIAL_SENTINEL) {
        return ConfigDnsError::SoaSerialRequired { message };
    }
    match status {
        StatusCode::NOT_FOUND => ConfigDnsError::NotFound { message },
        StatusCode::CONFLICT => ConfigDnsError::ConcurrencyConflict { message },
        _ => ConfigDnsError::Api {
            status_code: status.as_u16(),
            message,
        },
    }
}

/// [`ConfigDnsClient`] backed by the remote HTTP API.
#[derive(Debug, Clone)]
pub struct HttpConfigDnsClient {
    client: HttpClient,
    base_url: Url,
    token: Option<String>,
}

impl HttpConfigDnsClient {
    /// Creates a client for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid base URL or the HTTP
    /// client cannot be built.
    pub fn new(endpoint: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let base = build_api_url(endpoint);
        let base_url =
            Url::parse(&base).with_context(|| format!("Invalid API endpoint '{endpoint}'"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("API endpoint '{endpoint}' cannot be used as a base URL");
        }
        let client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    /// Builds `{base}/config-dns/v2/{segments...}`, percent-encoding each segment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(CONFIG_DNS_API_PREFIX.split('/').filter(|s| !s.is_empty()))
                .extend(segments);
        }
        url
    }

    fn record_url(&self, zone: &str, name: &str, record_type: RecordType) -> Url {
        self.url(&["zones", zone, "names", name, "types", record_type.as_str()])
    }

    async fn request<T: Serialize + std::fmt::Debug + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&T>,
    ) -> Result<String, ConfigDnsError> {
        debug!(
            method = %method,
            url = %url,
            body = ?body,
            auth_enabled = self.token.is_some(),
            "HTTP API request"
        );

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body_data) = body {
            request = request.json(body_data);
        }
        if let Some(token_value) = &self.token {
            request = request.header("Authorization", format!("Bearer {token_value}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| ConfigDnsError::Transport {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let classified = classify_response(status, &error_text);
            if classified.not_found() {
                debug!(method = %method, url = %url, "Remote resource not found");
            } else if classified.is_retryable() {
                warn!(
                    method = %method,
                    url = %url,
                    status = %status,
                    error = %error_text,
                    "HTTP API request rejected with a transient error"
                );
            } else {
                error!(
                    method = %method,
                    url = %url,
                    status = %status,
                    error = %error_text,
                    "HTTP API request failed"
                );
            }
            return Err(classified);
        }

        let text = response
            .text()
            .await
            .map_err(|e| ConfigDnsError::Transport {
                endpoint: url.to_string(),
                reason: format!("failed to read response body: {e}"),
            })?;

        debug!(
            method = %method,
            url = %url,
            status = %status,
            response_len = text.len(),
            "HTTP API request succeeded"
        );
        Ok(text)
    }

    async fn get_json<R: DeserializeOwned>(&self, url: Url) -> Result<R, ConfigDnsError> {
        let text = self.request::<()>(Method::GET, url, None).await?;
        serde_json::from_str(&text).map_err(|e| ConfigDnsError::Decode {
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ConfigDnsClient for HttpConfigDnsClient {
    async fn get_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<RecordBody, ConfigDnsError> {
        self.get_json(self.record_url(zone, name, record_type)).await
    }

    async fn save_record(&self, zone: &str, record: &RecordBody) -> Result<(), ConfigDnsError> {
        let url = self.record_url(zone, &record.name, record.record_type);
        self.request(Method::POST, url, Some(record)).await?;
        Ok(())
    }

    async fn update_record(&self, zone: &str, record: &RecordBody) -> Result<(), ConfigDnsError> {
        let url = self.record_url(zone, &record.name, record.record_type);
        self.request(Method::PUT, url, Some(record)).await?;
        Ok(())
    }

    async fn delete_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
    ) -> Result<(), ConfigDnsError> {
        let url = self.record_url(zone, name, record_type);
        self.request::<()>(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn get_zone(&self, zone: &str) -> Result<ZoneBody, ConfigDnsError> {
        self.get_json(self.url(&["zones", zone])).await
    }

    async fn create_zone(
        &self,
        zone: &ZoneBody,
        contract_id: &str,
        group_id: &str,
    ) -> Result<(), ConfigDnsError> {
        let mut url = self.url(&["zones"]);
        url.query_pairs_mut()
            .append_pair("contractId", contract_id)
            .append_pair("gid", group_id);
        self.request(Method::POST, url, Some(zone)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod http_tests;
