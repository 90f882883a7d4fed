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

use thiserror::Error;

/// Failure of a single DNS update run.
///
/// Every variant maps onto a `{code, message}` pair through [`DnsError::code`]
/// and [`DnsError::message`]. Nothing is retried: the caller decides whether
/// to run again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    /// Required input (credentials, domain) is missing or malformed.
    /// Raised before any network call.
    #[error("invalid input: {0}")]
    Input(String),

    /// The endpoint was unreachable or the request timed out.
    #[error("network error: {0}")]
    Network(String),

    /// The response body was not a well-formed API document.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The API answered with a failure status.
    #[error("provider error {code}: {message}")]
    Provider { code: String, message: String },
}

impl DnsError {
    /// Stable error code: `"input"`, `"network"`, `"parse"`, or the
    /// provider's own error number.
    pub fn code(&self) -> &str {
        match self {
            Self::Input(_) => "input",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Provider { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Input(message) | Self::Network(message) | Self::Parse(message) => message,
            Self::Provider { message, .. } => message,
        }
    }

    pub fn is_provider_code(&self, expected: &str) -> bool {
        matches!(self, Self::Provider { code, .. } if code == expected)
    }
}

impl From<reqwest::Error> for DnsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Network(format!("request timed out: {e}"))
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<roxmltree::Error> for DnsError {
    fn from(e: roxmltree::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DnsError>;
