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

//! Record set construction for the GitHub Pages target.

use std::fmt;
use std::net::Ipv4Addr;

use serde::Serialize;

use crate::error::{DnsError, Result};

pub const DEFAULT_DOMAIN: &str = "lech.world";
pub const DEFAULT_PAGES_USER: &str = "leolech14";
pub const DEFAULT_TTL: u32 = 1800;

/// Apex addresses published by GitHub Pages.
pub const GITHUB_PAGES_IPS: [Ipv4Addr; 4] = [
    Ipv4Addr::new(185, 199, 108, 153),
    Ipv4Addr::new(185, 199, 109, 153),
    Ipv4Addr::new(185, 199, 110, 153),
    Ipv4Addr::new(185, 199, 111, 153),
];

pub const APEX_HOST: &str = "@";
pub const WWW_HOST: &str = "www";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Cname,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Cname => "CNAME",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DnsRecord {
    pub host: String,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    pub value: String,
    pub ttl: u32,
}

/// A registrable domain split the way the API addresses it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainIdentity {
    /// Second-level label, e.g. `lech`.
    pub sld: String,
    /// Everything after the first dot, e.g. `world` or `co.uk`.
    pub tld: String,
}

impl DomainIdentity {
    /// Splits `lech.world` into `lech` / `world`.
    pub fn parse(domain: &str) -> Result<Self> {
        let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();
        let (sld, tld) = domain
            .split_once('.')
            .ok_or_else(|| DnsError::Input(format!("'{domain}' is not a registrable domain")))?;
        if sld.is_empty() || tld.split('.').any(str::is_empty) {
            return Err(DnsError::Input(format!("'{domain}' is not a registrable domain")));
        }
        Ok(Self {
            sld: sld.to_string(),
            tld: tld.to_string(),
        })
    }

    /// Fully qualified name of `host` inside this domain; `@` is the apex.
    pub fn fqdn(&self, host: &str) -> String {
        if host == APEX_HOST {
            self.to_string()
        } else {
            format!("{host}.{self}")
        }
    }
}

impl fmt::Display for DomainIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.sld, self.tld)
    }
}

/// GitHub Pages hosting parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagesTarget {
    pub ips: Vec<Ipv4Addr>,
    pub username: String,
    pub ttl: u32,
}

impl PagesTarget {
    pub fn new(username: impl Into<String>, ttl: u32) -> Self {
        Self {
            ips: GITHUB_PAGES_IPS.to_vec(),
            username: username.into(),
            ttl,
        }
    }

    /// `<username>.github.io`
    pub fn cname_target(&self) -> String {
        format!("{}.github.io", self.username.to_ascii_lowercase())
    }

    pub fn records(&self) -> Vec<DnsRecord> {
        build_record_set(&self.ips, &self.cname_target(), self.ttl)
    }
}

impl Default for PagesTarget {
    fn default() -> Self {
        Self::new(DEFAULT_PAGES_USER, DEFAULT_TTL)
    }
}

/// One apex A record per address, in order, then the `www` CNAME.
pub fn build_record_set(ips: &[Ipv4Addr], cname_target: &str, ttl: u32) -> Vec<DnsRecord> {
    ips.iter()
        .map(|ip| DnsRecord {
            host: APEX_HOST.to_string(),
            record_type: RecordType::A,
            value: ip.to_string(),
            ttl,
        })
        .chain(std::iter::once(DnsRecord {
            host: WWW_HOST.to_string(),
            record_type: RecordType::Cname,
            value: cname_target.to_string(),
            ttl,
        }))
        .collect()
}
