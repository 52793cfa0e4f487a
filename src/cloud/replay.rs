// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canned-response adapter for offline debugging and tests.
//!
//! The directory holds complete response envelopes:
//!
//! - `get_devices.json` for the device list
//! - `get_device_state_<serial>.json` for each device state
//!
//! Login always succeeds with [`REPLAY_TOKEN`]; settings calls succeed with
//! an empty payload.

use std::path::{Path, PathBuf};

use super::api::{ApiRequest, ApiResponse, CloudApi};
use super::{DEVICE_LIST_PATH, DEVICE_STATE_PATH, LOGIN_PATH, SETTING_PATH};
use crate::error::ProtocolError;

/// Bearer handed out by the replay login.
pub const REPLAY_TOKEN: &str = "replay-token";

/// [`CloudApi`] that reads responses from a directory.
#[derive(Debug, Clone)]
pub struct ReplayApi {
    dir: PathBuf,
}

impl ReplayApi {
    /// Creates an adapter reading from `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the responses come from.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read(&self, name: &str) -> Result<ApiResponse, ProtocolError> {
        let path = self.dir.join(name);
        tracing::debug!(path = %path.display(), "replaying response");
        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ProtocolError::Io(format!("{}: {e}", path.display())))?;
        Ok(ApiResponse::ok(body))
    }
}

impl CloudApi for ReplayApi {
    async fn call(&self, request: ApiRequest) -> Result<ApiResponse, ProtocolError> {
        match request.path.as_str() {
            LOGIN_PATH => Ok(ApiResponse::ok(format!(
                r#"{{"code":0,"msg":"OK","data":{{"access_token":"{REPLAY_TOKEN}","region":"NA"}}}}"#
            ))),
            DEVICE_LIST_PATH => self.read("get_devices.json").await,
            DEVICE_STATE_PATH => {
                let serial = request.query_value("deviceSn").unwrap_or_default();
                self.read(&format!("get_device_state_{serial}.json")).await
            }
            SETTING_PATH => Ok(ApiResponse::ok(r#"{"code":0,"msg":"OK","data":{}}"#)),
            other => Err(ProtocolError::Io(format!("no replay file for {other}"))),
        }
    }
}
