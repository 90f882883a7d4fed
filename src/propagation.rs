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

//! Propagation check against the local resolver.
//!
//! The verdict is a heuristic: resolvers cache old answers for up to the
//! previous TTL, and different vantage points disagree while records spread.

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioResolver;
use serde::Serialize;

use crate::records::{APEX_HOST, DomainIdentity, PagesTarget, WWW_HOST};
use crate::utils::serde_utils::{as_display, vec_is_empty};

/// Hosting providers recognised in CNAME answers besides GitHub Pages.
const KNOWN_PREVIOUS_HOSTS: [&str; 3] = ["vercel", "netlify", "herokudns"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Answers already point at GitHub Pages.
    GithubPages,
    /// Answers still point at another known host.
    PreviousHost(String),
    /// Nothing resolved.
    Unresolved,
    /// Resolved, but to something not recognised.
    Unclear,
}

impl Verdict {
    pub fn is_propagated(&self) -> bool {
        matches!(self, Self::GithubPages)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GithubPages => f.write_str("github-pages"),
            Self::PreviousHost(host) => write!(f, "previous-host:{host}"),
            Self::Unresolved => f.write_str("unresolved"),
            Self::Unclear => f.write_str("unclear"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PropagationReport {
    pub name: String,
    #[serde(skip_serializing_if = "vec_is_empty")]
    pub cnames: Vec<String>,
    #[serde(skip_serializing_if = "vec_is_empty")]
    pub addresses: Vec<IpAddr>,
    #[serde(serialize_with = "as_display")]
    pub verdict: Verdict,
    pub checked_at: DateTime<Utc>,
}

/// Classifies the answers for one name.
pub fn classify(cnames: &[String], addresses: &[IpAddr], target: &PagesTarget) -> Verdict {
    let expected_cname = target.cname_target();
    let points_at_pages = cnames.iter().any(|c| {
        let c = c.trim_end_matches('.').to_ascii_lowercase();
        c == expected_cname || c.ends_with(".github.io")
    }) || addresses.iter().any(|addr| match addr {
        IpAddr::V4(v4) => target.ips.contains(v4),
        IpAddr::V6(_) => false,
    });
    if points_at_pages {
        return Verdict::GithubPages;
    }

    let previous = cnames.iter().find_map(|c| {
        let c = c.to_ascii_lowercase();
        KNOWN_PREVIOUS_HOSTS
            .iter()
            .find(|host| c.contains(*host))
            .map(|host| host.to_string())
    });
    if let Some(host) = previous {
        return Verdict::PreviousHost(host);
    }

    if cnames.is_empty() && addresses.is_empty() {
        Verdict::Unresolved
    } else {
        Verdict::Unclear
    }
}

/// Resolver from the host configuration, or Hickory's defaults when that
/// cannot be read.
fn system_resolver() -> TokioResolver {
    match TokioResolver::builder_tokio() {
        Ok(builder) => builder.build(),
        Err(e) => {
            tracing::warn!("failed to load system DNS configuration, using defaults: {e}");
            TokioResolver::builder_with_config(
                ResolverConfig::default(),
                TokioConnectionProvider::default(),
            )
            .with_options(ResolverOpts::default())
            .build()
        }
    }
}

async fn resolve(resolver: &TokioResolver, name: &str) -> (Vec<String>, Vec<IpAddr>) {
    let mut cnames = Vec::new();
    if let Ok(response) = resolver.lookup(name, RecordType::CNAME).await {
        for record in response.record_iter() {
            if let Some(cname) = record.data().as_cname() {
                cnames.push(cname.0.to_string().trim_end_matches('.').to_string());
            }
        }
    }

    let addresses = match resolver.lookup_ip(name).await {
        Ok(response) => response.iter().collect(),
        Err(e) => {
            tracing::debug!(name, error = %e, "address lookup failed");
            Vec::new()
        }
    };

    (cnames, addresses)
}

/// Checks `www` and the apex of `domain`, in that order.
pub async fn check(domain: &DomainIdentity, target: &PagesTarget) -> Vec<PropagationReport> {
    let resolver = system_resolver();
    let mut reports = Vec::with_capacity(2);

    for host in [WWW_HOST, APEX_HOST] {
        let name = domain.fqdn(host);
        let (cnames, addresses) = resolve(&resolver, &name).await;
        let verdict = classify(&cnames, &addresses, target);
        tracing::info!(%name, %verdict, "propagation check");
        reports.push(PropagationReport {
            name,
            cnames,
            addresses,
            verdict,
            checked_at: Utc::now(),
        });
    }

    reports
}
