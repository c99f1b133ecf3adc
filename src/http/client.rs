use std::time::{Duration, Instant};

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Url};
use serde::Serialize;
use tracing::debug;

use crate::checks::CheckError;
use crate::error::ProbeError;

use super::method::HttpMethod;
use super::response::ApiResponse;

/// Connection context shared by every check in one run.
///
/// Carries the JSON default headers and a cookie store, so a session cookie
/// set by a sign-in response rides along on every later request.
#[derive(Debug)]
pub struct Session {
    client: Client,
    base: Url,
    signed_in: bool,
}

impl Session {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ProbeError> {
        let raw = base_url.trim();
        let base = Url::parse(raw).map_err(|source| ProbeError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: source.to_string(),
        })?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(ProbeError::InvalidBaseUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme `{}`", base.scheme()),
            });
        }

        let mut builder = Client::builder()
            .default_headers(default_headers())
            .cookie_store(true);
        if let Some(timeout) = timeout {
            if !timeout.is_zero() {
                builder = builder.timeout(timeout);
            }
        }
        let client = builder.build().map_err(ProbeError::ClientBuild)?;

        Ok(Self {
            client,
            base,
            signed_in: false,
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    pub fn is_signed_in(&self) -> bool {
        self.signed_in
    }

    pub fn mark_signed_in(&mut self) {
        self.signed_in = true;
    }

    /// Absolute URL for an `/api/...` path, keeping any path prefix of the base.
    pub fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        let joined = format!("{}{}", self.base.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url.set_query(None);
        url
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse, CheckError> {
        self.send(HttpMethod::Get, self.endpoint(path), |req| req).await
    }

    pub async fn get_with_query(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, CheckError> {
        let mut url = self.endpoint(path);
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        self.send(HttpMethod::Get, url, |req| req).await
    }

    pub async fn post_json<T>(&self, path: &str, body: &T) -> Result<ApiResponse, CheckError>
    where
        T: Serialize + ?Sized,
    {
        self.send(HttpMethod::Post, self.endpoint(path), |req| req.json(body))
            .await
    }

    pub async fn put_json<T>(&self, path: &str, body: &T) -> Result<ApiResponse, CheckError>
    where
        T: Serialize + ?Sized,
    {
        self.send(HttpMethod::Put, self.endpoint(path), |req| req.json(body))
            .await
    }

    /// Form-encoded POST; the form's content type replaces the JSON default.
    pub async fn post_form(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> Result<ApiResponse, CheckError> {
        self.send(HttpMethod::Post, self.endpoint(path), |req| req.form(form))
            .await
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        build: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<ApiResponse, CheckError> {
        let path = match url.query() {
            Some(query) => format!("{}?{query}", url.path()),
            None => url.path().to_string(),
        };
        let transport = |source| CheckError::Transport {
            method,
            path: path.clone(),
            source,
        };

        let request = build(self.client.request(method.into(), url.clone()));
        let started = Instant::now();
        let response = request.send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport)?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        debug!(
            method = %method,
            url = %url,
            status,
            elapsed_ms,
            size_bytes = body.len(),
            "Request completed"
        );

        Ok(ApiResponse {
            method,
            path,
            status,
            body,
        })
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}
