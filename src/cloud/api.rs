// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! REST seam: one request in, one status and body out.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::codec;
use crate::error::ProtocolError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP method of a vendor call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
}

impl Method {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
        }
    }
}

/// One REST call, independent of how it is carried out.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL without query string.
    pub url: String,
    /// Path relative to the API root, e.g. `/api/oauth/login`.
    pub path: String,
    /// Query pairs, `timestamp` included.
    pub query: Vec<(String, String)>,
    /// JSON body.
    pub body: Option<Value>,
    /// Bearer token.
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// Value of a query parameter.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw answer to an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl ApiResponse {
    /// Creates a `200` response.
    #[must_use]
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }
}

/// Carries out vendor REST calls.
///
/// [`HttpApi`] talks to the network; [`ReplayApi`](super::ReplayApi) answers
/// from canned files. Tests may provide their own implementation.
#[allow(async_fn_in_trait)]
pub trait CloudApi {
    /// Performs one call.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` if no response could be obtained. A response
    /// with any status is not an error at this level.
    async fn call(&self, request: ApiRequest) -> Result<ApiResponse, ProtocolError>;
}

/// [`CloudApi`] over HTTPS with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
}

impl HttpApi {
    /// Creates a client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(timeout: Duration) -> Result<Self, ProtocolError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProtocolError::Http)?;
        Ok(Self { client })
    }
}

impl CloudApi for HttpApi {
    async fn call(&self, request: ApiRequest) -> Result<ApiResponse, ProtocolError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .query(&request.query);
        for (name, value) in codec::build_headers(request.bearer.as_deref()) {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(map_reqwest)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest)?;
        Ok(ApiResponse { status, body })
    }
}

fn map_reqwest(err: reqwest::Error) -> ProtocolError {
    if err.is_timeout() {
        ProtocolError::Timeout
    } else {
        ProtocolError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_lookup() {
        let request = ApiRequest {
            method: Method::Get,
            url: "https://example.test/api".into(),
            path: "/api".into(),
            query: vec![("deviceSn".into(), "SN1".into())],
            body: None,
            bearer: None,
        };
        assert_eq!(request.query_value("deviceSn"), Some("SN1"));
        assert_eq!(request.query_value("timestamp"), None);
    }

    #[test]
    fn method_names() {
        assert_eq!(Method::Put.as_str(), "PUT");
    }
}
