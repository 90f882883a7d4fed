// Copyright 2025 namecheap-pages authors
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::{DnsError, Result};
use crate::records::{DnsRecord, DomainIdentity};
use crate::utils::serde_utils::option_is_empty;

pub const API_USER_ENV: &str = "NAMECHEAP_API_USER";
pub const API_KEY_ENV: &str = "NAMECHEAP_API_KEY";

/// Operations a DNS host-record API must offer.
#[async_trait]
pub trait DnsClient: Send + Sync {
    /// Lists the records currently configured for `domain`.
    async fn get_hosts(&self, domain: &DomainIdentity) -> Result<Vec<HostRecord>>;

    /// Replaces every record of `domain` with `records`, in order.
    async fn set_hosts(&self, domain: &DomainIdentity, records: &[DnsRecord]) -> Result<()>;
}

/// API endpoint selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endpoint {
    #[default]
    Production,
    Sandbox,
}

impl Endpoint {
    pub fn url(&self) -> &'static str {
        match self {
            Self::Production => "https://api.namecheap.com/xml.response",
            Self::Sandbox => "https://api.sandbox.namecheap.com/xml.response",
        }
    }
}

/// A record as reported by the API, kept close to the wire form since it may
/// carry types this crate never writes (MX, TXT, URL redirects).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRecord {
    #[serde(skip_serializing_if = "option_is_empty")]
    pub host_id: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub address: String,
    #[serde(skip_serializing_if = "option_is_empty")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "option_is_empty")]
    pub mx_pref: Option<u32>,
}

/// API user and key. The key never shows up in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_user: String,
    pub api_key: String,
}

impl Credentials {
    /// Rejects empty or whitespace-only values.
    pub fn new(api_user: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let api_user = api_user.into().trim().to_string();
        let api_key = api_key.into().trim().to_string();
        if api_user.is_empty() {
            return Err(DnsError::Input("API user is required".into()));
        }
        if api_key.is_empty() {
            return Err(DnsError::Input("API key is required".into()));
        }
        Ok(Self { api_user, api_key })
    }

    /// Positional values win; otherwise `lookup_env` is consulted for
    /// [`API_USER_ENV`] and [`API_KEY_ENV`]. Empty values count as missing.
    pub fn resolve<F>(api_user: Option<String>, api_key: Option<String>, lookup_env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |arg: Option<String>, var: &str| {
            arg.filter(|v| !v.trim().is_empty())
                .or_else(|| lookup_env(var).filter(|v| !v.trim().is_empty()))
        };
        let api_user = pick(api_user, API_USER_ENV)
            .ok_or_else(|| DnsError::Input(format!("API user missing (argument or {API_USER_ENV})")))?;
        let api_key = pick(api_key, API_KEY_ENV)
            .ok_or_else(|| DnsError::Input(format!("API key missing (argument or {API_KEY_ENV})")))?;
        Self::new(api_user, api_key)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_user", &self.api_user)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
