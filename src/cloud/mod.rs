// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vendor REST client.
//!
//! [`CloudClient`] knows the endpoint paths, the `{code, msg, data}` envelope
//! check and how to pull typed payloads out of it. Carrying requests is left
//! to a [`CloudApi`] implementation: [`HttpApi`] in production, [`ReplayApi`]
//! for offline debugging.

mod api;
mod replay;

pub use api::{ApiRequest, ApiResponse, CloudApi, DEFAULT_TIMEOUT, HttpApi, Method};
pub use replay::{REPLAY_TOKEN, ReplayApi};

use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde_json::{Map, Value, json};

use crate::codec::{self, DeviceRecord, Envelope, LoginData, Redactor};
use crate::error::{Error, ProtocolError, Result};

/// Login endpoint.
pub const LOGIN_PATH: &str = "/api/oauth/login";
/// Device list endpoint.
pub const DEVICE_LIST_PATH: &str = "/api/v2/user-device/device/list";
/// Device state endpoint.
pub const DEVICE_STATE_PATH: &str = "/api/user-device/device/state";
/// Per-device settings endpoint.
pub const SETTING_PATH: &str = "/api/user-device/setting";

/// Account region; selects the REST and stream hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    /// North America.
    #[default]
    Us,
    /// Europe.
    Eu,
}

impl Region {
    /// Host tag used in URLs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Eu => "eu",
        }
    }

    /// Maps the login response's region field (`NA`, `EU`).
    #[must_use]
    pub fn from_login(tag: &str) -> Option<Self> {
        match tag.to_ascii_uppercase().as_str() {
            "NA" | "US" => Some(Self::Us),
            "EU" => Some(Self::Eu),
            _ => None,
        }
    }

    /// REST root for this region.
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("https://app-api-{}.dreo-cloud.com", self.as_str())
    }

    /// Stream endpoint for this region, without query string.
    #[must_use]
    pub fn ws_endpoint(&self) -> String {
        format!("wss://wsb-{}.dreo-cloud.com/websocket", self.as_str())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Credentials obtained by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct AccountSession {
    email: String,
    token: String,
    region: Region,
    authenticated_at: DateTime<Utc>,
}

impl AccountSession {
    /// Account e-mail.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Bearer token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Region the account lives in.
    #[must_use]
    pub fn region(&self) -> Region {
        self.region
    }

    /// When the token was obtained.
    #[must_use]
    pub fn authenticated_at(&self) -> DateTime<Utc> {
        self.authenticated_at
    }
}

impl fmt::Debug for AccountSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountSession")
            .field("email", &codec::REDACTED)
            .field("token", &codec::REDACTED)
            .field("region", &self.region)
            .field("authenticated_at", &self.authenticated_at)
            .finish()
    }
}

/// REST client for the vendor cloud.
///
/// # Examples
///
/// ```no_run
/// use dreo_lib::cloud::{CloudClient, HttpApi, DEFAULT_TIMEOUT};
///
/// # async fn example() -> dreo_lib::Result<()> {
/// let client = CloudClient::new(HttpApi::new(DEFAULT_TIMEOUT)?);
/// client.login("me@example.com", "secret").await?;
/// for record in client.fetch_devices().await? {
///     let state = client.fetch_state(&record.sn).await?;
///     println!("{}: {} attributes", record.name(), state.len());
/// }
/// # Ok(())
/// # }
/// ```
pub struct CloudClient<A: CloudApi = HttpApi> {
    api: A,
    region: RwLock<Region>,
    base_override: Option<String>,
    redactor: Redactor,
    account: RwLock<Option<AccountSession>>,
}

impl<A: CloudApi> CloudClient<A> {
    /// Creates a client for the default region.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            region: RwLock::new(Region::default()),
            base_override: None,
            redactor: Redactor::default(),
            account: RwLock::new(None),
        }
    }

    /// Sets the region used before login.
    #[must_use]
    pub fn with_region(self, region: Region) -> Self {
        *self.region.write() = region;
        self
    }

    /// Sends every call to `base` instead of the regional host.
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base_override = Some(base.into().trim_end_matches('/').to_string());
        self
    }

    /// Sets the policy for bodies written to the log.
    #[must_use]
    pub fn with_redactor(mut self, redactor: Redactor) -> Self {
        self.redactor = redactor;
        self
    }

    // ========== Accessors ==========

    /// REST root in use.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.base_override
            .clone()
            .unwrap_or_else(|| self.region().api_base())
    }

    /// Current region; updated from the login response.
    #[must_use]
    pub fn region(&self) -> Region {
        *self.region.read()
    }

    /// Credentials of the last successful login.
    #[must_use]
    pub fn account(&self) -> Option<AccountSession> {
        self.account.read().clone()
    }

    /// Returns `true` once a bearer is held.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.account.read().is_some()
    }

    /// Bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.account.read().as_ref().map(|a| a.token.clone())
    }

    /// The request carrier.
    pub fn api(&self) -> &A {
        &self.api
    }

    // ========== Operations ==========

    /// Logs in and stores the bearer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AuthFailed`] unless the response is a `200` with
    /// `code == 0` and an access token; [`Error::Protocol`] if the request
    /// could not be carried out.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let body = codec::build_login_body(email, password);
        let envelope = self
            .exchange(Method::Post, LOGIN_PATH, Vec::new(), Some(body), None)
            .await
            .map_err(|failure| failure.into_error(Error::AuthFailed))
            .inspect_err(|e| tracing::error!(error = %e, "login failed"))?;

        let data: LoginData = serde_json::from_value(envelope.data)
            .map_err(|e| Error::AuthFailed(format!("malformed login payload: {e}")))?;
        let Some(token) = data.access_token.filter(|t| !t.is_empty()) else {
            tracing::error!("login response carries no access token");
            return Err(Error::AuthFailed("no access token".to_string()));
        };

        if let Some(region) = data.region.as_deref().and_then(Region::from_login) {
            *self.region.write() = region;
        }
        let region = self.region();
        *self.account.write() = Some(AccountSession {
            email: email.to_string(),
            token,
            region,
            authenticated_at: Utc::now(),
        });
        tracing::info!(region = %region, "logged in");
        Ok(())
    }

    /// Lists the account's devices.
    ///
    /// Entries that cannot be read are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login and
    /// [`Error::ListUnavailable`] if the call fails.
    pub async fn fetch_devices(&self) -> Result<Vec<DeviceRecord>> {
        let bearer = self.token().ok_or(Error::NotAuthenticated)?;
        let query = codec::to_query(&codec::build_list_body());
        let envelope = self
            .exchange(Method::Get, DEVICE_LIST_PATH, query, None, Some(bearer))
            .await
            .map_err(|failure| failure.into_error(Error::ListUnavailable))?;

        let Some(list) = envelope.data.get("list").and_then(Value::as_array) else {
            return Err(Error::ListUnavailable("data.list missing".to_string()));
        };
        let records = list
            .iter()
            .filter_map(|entry| {
                serde_json::from_value::<DeviceRecord>(entry.clone())
                    .inspect_err(|e| tracing::warn!(error = %e, "skipping unreadable device entry"))
                    .ok()
            })
            .collect::<Vec<_>>();
        tracing::debug!(count = records.len(), "device list received");
        Ok(records)
    }

    /// Fetches one device's full state as `{attribute: value}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login and
    /// [`Error::StateUnavailable`] if the call fails or `data.mixed` is
    /// missing.
    pub async fn fetch_state(&self, serial: &str) -> Result<Map<String, Value>> {
        let bearer = self.token().ok_or(Error::NotAuthenticated)?;
        let mut query = codec::to_query(&codec::build_list_body());
        query.push(("deviceSn".to_string(), serial.to_string()));

        let unavailable = |reason: String| Error::StateUnavailable {
            serial: serial.to_string(),
            reason,
        };
        let envelope = self
            .exchange(Method::Get, DEVICE_STATE_PATH, query, None, Some(bearer))
            .await
            .map_err(|failure| failure.into_error(unavailable))?;

        let mixed = envelope
            .data
            .get("mixed")
            .ok_or_else(|| unavailable("data.mixed missing".to_string()))?;
        Ok(codec::extract_snapshot(mixed)?)
    }

    /// Reads one per-device setting.
    ///
    /// Returns `data.dataValue`, or the whole payload when that member is
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login and
    /// [`Error::SettingUnavailable`] if the call fails.
    pub async fn get_setting(&self, serial: &str, data_key: &str) -> Result<Value> {
        let bearer = self.token().ok_or(Error::NotAuthenticated)?;
        let query = vec![
            ("deviceSn".to_string(), serial.to_string()),
            ("dataKey".to_string(), data_key.to_string()),
        ];
        let envelope = self
            .exchange(Method::Get, SETTING_PATH, query, None, Some(bearer))
            .await
            .map_err(|failure| failure.into_error(|reason| setting_error(data_key, reason)))?;

        let data = envelope.data;
        Ok(data.get("dataValue").cloned().unwrap_or(data))
    }

    /// Writes one per-device setting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotAuthenticated`] before login and
    /// [`Error::SettingUnavailable`] if the call fails.
    pub async fn set_setting(&self, serial: &str, data_key: &str, value: Value) -> Result<()> {
        let bearer = self.token().ok_or(Error::NotAuthenticated)?;
        let body = json!({
            "deviceSn": serial,
            "dataKey": data_key,
            "dataValue": value,
        });
        self.exchange(Method::Put, SETTING_PATH, Vec::new(), Some(body), Some(bearer))
            .await
            .map_err(|failure| failure.into_error(|reason| setting_error(data_key, reason)))?;
        Ok(())
    }

    // ========== Internal ==========

    async fn exchange(
        &self,
        method: Method,
        path: &str,
        mut query: Vec<(String, String)>,
        body: Option<Value>,
        bearer: Option<String>,
    ) -> std::result::Result<Envelope, Failure> {
        query.push(("timestamp".to_string(), codec::now_ms()));
        let request = ApiRequest {
            method,
            url: format!("{}{path}", self.base_url()),
            path: path.to_string(),
            query,
            body,
            bearer,
        };

        if tracing::enabled!(tracing::Level::DEBUG) {
            let body = request
                .body
                .as_ref()
                .map(Value::to_string)
                .unwrap_or_default();
            tracing::debug!(
                method = method.as_str(),
                path = %path,
                body = %self.redactor.redact(&body),
                "REST request"
            );
        }

        let response = self.api.call(request).await.map_err(|e| {
            tracing::warn!(path = %path, error = %e, "REST call failed");
            Failure::Fault(Error::Protocol(e))
        })?;
        tracing::debug!(
            path = %path,
            status = response.status,
            body = %self.redactor.redact(&response.body),
            "REST response"
        );

        if response.status != 200 {
            tracing::warn!(path = %path, status = response.status, "REST call rejected");
            let status = ProtocolError::HttpStatus(response.status);
            return Err(Failure::Rejected(status.to_string()));
        }
        let envelope = Envelope::parse(&response.body).map_err(|e| {
            tracing::warn!(path = %path, error = %e, "malformed response body");
            Failure::Fault(Error::Parse(e))
        })?;
        if !envelope.is_success() {
            let reason = envelope.describe();
            tracing::warn!(path = %path, reason = %reason, "REST call rejected");
            return Err(Failure::Rejected(reason));
        }
        Ok(envelope)
    }
}

impl<A: CloudApi> fmt::Debug for CloudClient<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudClient")
            .field("base_url", &self.base_url())
            .field("logged_in", &self.is_logged_in())
            .finish_non_exhaustive()
    }
}

fn setting_error(key: &str, reason: String) -> Error {
    Error::SettingUnavailable {
        key: key.to_string(),
        reason,
    }
}

/// Outcome of a call that did not yield a successful envelope.
enum Failure {
    /// Transport or parse fault; keeps its own error.
    Fault(Error),
    /// Non-200 status or non-zero code; mapped to the operation's error.
    Rejected(String),
}

impl Failure {
    fn into_error(self, rejected: impl FnOnce(String) -> Error) -> Error {
        match self {
            Self::Fault(err) => err,
            Self::Rejected(reason) => rejected(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Answers every call with a fixed response and records the requests.
    #[derive(Default)]
    struct CannedApi {
        responses: Mutex<Vec<ApiResponse>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl CannedApi {
        fn with(responses: Vec<ApiResponse>) -> Self {
            Self {
                responses: Mutex::new(responses),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl CloudApi for CannedApi {
        async fn call(
            &self,
            request: ApiRequest,
        ) -> std::result::Result<ApiResponse, ProtocolError> {
            self.requests.lock().push(request);
            let mut responses = self.responses.lock();
            if responses.is_empty() {
                Err(ProtocolError::ConnectionClosed)
            } else {
                Ok(responses.remove(0))
            }
        }
    }

    const LOGIN_OK: &str =
        r#"{"code":0,"msg":"OK","data":{"access_token":"tok-1","region":"EU"}}"#;

    #[test]
    fn region_hosts() {
        assert_eq!(Region::Us.api_base(), "https://app-api-us.dreo-cloud.com");
        assert_eq!(Region::Eu.ws_endpoint(), "wss://wsb-eu.dreo-cloud.com/websocket");
        assert_eq!(Region::from_login("NA"), Some(Region::Us));
        assert_eq!(Region::from_login("eu"), Some(Region::Eu));
        assert_eq!(Region::from_login("AP"), None);
    }

    #[tokio::test]
    async fn login_stores_bearer_and_region() {
        let client = CloudClient::new(CannedApi::with(vec![ApiResponse::ok(LOGIN_OK)]));
        client.login("me@example.com", "pw").await.unwrap();

        assert!(client.is_logged_in());
        assert_eq!(client.token().as_deref(), Some("tok-1"));
        assert_eq!(client.region(), Region::Eu);
        assert_eq!(client.base_url(), "https://app-api-eu.dreo-cloud.com");

        let requests = client.api().requests.lock();
        assert_eq!(requests[0].path, LOGIN_PATH);
        assert_eq!(requests[0].method, Method::Post);
        assert!(requests[0].bearer.is_none());
        assert!(requests[0].query_value("timestamp").is_some());
    }

    #[tokio::test]
    async fn login_without_token_fails() {
        let client = CloudClient::new(CannedApi::with(vec![ApiResponse::ok(
            r#"{"code":0,"data":{}}"#,
        )]));
        let err = client.login("me@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, Error::AuthFailed(_)));
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn login_with_nonzero_code_fails() {
        let client = CloudClient::new(CannedApi::with(vec![ApiResponse::ok(
            r#"{"code":10001,"msg":"bad password","data":{"access_token":"x"}}"#,
        )]));
        let err = client.login("me@example.com", "pw").await.unwrap_err();
        assert!(matches!(err, Error::AuthFailed(reason) if reason.contains("10001")));
    }

    #[tokio::test]
    async fn calls_before_login_are_refused() {
        let client = CloudClient::new(CannedApi::default());
        assert!(matches!(
            client.fetch_devices().await,
            Err(Error::NotAuthenticated)
        ));
        assert!(matches!(
            client.fetch_state("SN1").await,
            Err(Error::NotAuthenticated)
        ));
        assert!(client.api().requests.lock().is_empty());
    }

    #[tokio::test]
    async fn device_list_skips_unreadable_entries() {
        let list = r#"{"code":0,"data":{"list":[
            {"deviceId":1,"sn":"SN1","model":"DR-HTF005S"},
            {"deviceId":2,"model":"DR-HAF004S"}
        ]}}"#;
        let client = CloudClient::new(CannedApi::with(vec![
            ApiResponse::ok(LOGIN_OK),
            ApiResponse::ok(list),
        ]));
        client.login("me@example.com", "pw").await.unwrap();

        let records = client.fetch_devices().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sn, "SN1");

        let requests = client.api().requests.lock();
        assert_eq!(requests[1].bearer.as_deref(), Some("tok-1"));
        assert_eq!(requests[1].query_value("method"), Some("devices"));
        assert_eq!(requests[1].query_value("size"), Some("100"));
    }

    #[tokio::test]
    async fn state_extracts_scalars() {
        let state = r#"{"code":0,"data":{"mixed":{
            "poweron":{"state":true,"timestamp":1},
            "windlevel":{"state":4}
        }}}"#;
        let client = CloudClient::new(CannedApi::with(vec![
            ApiResponse::ok(LOGIN_OK),
            ApiResponse::ok(state),
        ]));
        client.login("me@example.com", "pw").await.unwrap();

        let snapshot = client.fetch_state("SN1").await.unwrap();
        assert_eq!(snapshot["poweron"], true);
        assert_eq!(snapshot["windlevel"], 4);
        assert_eq!(
            client.api().requests.lock()[1].query_value("deviceSn"),
            Some("SN1")
        );
    }

    #[tokio::test]
    async fn http_status_maps_to_operation_error() {
        let client = CloudClient::new(CannedApi::with(vec![
            ApiResponse::ok(LOGIN_OK),
            ApiResponse {
                status: 500,
                body: String::new(),
            },
        ]));
        client.login("me@example.com", "pw").await.unwrap();

        let err = client.fetch_state("SN9").await.unwrap_err();
        assert!(matches!(
            err,
            Error::StateUnavailable { ref serial, ref reason }
                if serial == "SN9" && *reason == ProtocolError::HttpStatus(500).to_string()
        ));
    }

    #[tokio::test]
    async fn transport_fault_is_protocol_error() {
        let client = CloudClient::new(CannedApi::default());
        let err = client.login("me@example.com", "pw").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol(ProtocolError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let client = CloudClient::new(CannedApi::with(vec![
            ApiResponse::ok(LOGIN_OK),
            ApiResponse::ok("<html>"),
        ]));
        client.login("me@example.com", "pw").await.unwrap();
        assert!(matches!(
            client.fetch_devices().await,
            Err(Error::Parse(_))
        ));
    }

    #[tokio::test]
    async fn setting_value_is_unwrapped() {
        let client = CloudClient::new(CannedApi::with(vec![
            ApiResponse::ok(LOGIN_OK),
            ApiResponse::ok(r#"{"code":0,"data":{"dataKey":"k","dataValue":42}}"#),
            ApiResponse::ok(r#"{"code":0,"data":{}}"#),
        ]));
        client.login("me@example.com", "pw").await.unwrap();

        assert_eq!(client.get_setting("SN1", "k").await.unwrap(), json!(42));
        client.set_setting("SN1", "k", json!(7)).await.unwrap();

        let requests = client.api().requests.lock();
        assert_eq!(requests[2].method, Method::Put);
        assert_eq!(
            requests[2].body,
            Some(json!({"deviceSn": "SN1", "dataKey": "k", "dataValue": 7}))
        );
    }

    #[test]
    fn account_debug_hides_credentials() {
        let account = AccountSession {
            email: "me@example.com".to_string(),
            token: "secret-token".to_string(),
            region: Region::Us,
            authenticated_at: Utc::now(),
        };
        let text = format!("{account:?}");
        assert!(!text.contains("secret-token"));
        assert!(!text.contains("me@example.com"));
    }
}
