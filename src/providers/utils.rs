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

use roxmltree::{Document, Node};

use crate::client::HostRecord;
use crate::error::{DnsError, Result};

const LOG_BODY_LIMIT: usize = 500;

/// One `<Error Number="...">text</Error>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ApiErrorEntry {
    pub number: String,
    pub text: String,
}

/// The parts of an `<ApiResponse>` this crate acts on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct ApiResponse {
    pub status: Option<String>,
    pub errors: Vec<ApiErrorEntry>,
    pub hosts: Vec<HostRecord>,
}

impl ApiResponse {
    /// Parses the XML body.
    ///
    /// Elements are matched by local name, so the document's default
    /// namespace does not matter.
    pub fn parse(body: &str) -> Result<Self> {
        let doc = Document::parse(body)?;
        let root = doc.root_element();

        let errors = root
            .descendants()
            .filter(|n| n.has_tag_name("Error"))
            .map(|n| ApiErrorEntry {
                number: n.attribute("Number").unwrap_or_default().trim().to_string(),
                text: n.text().unwrap_or_default().trim().to_string(),
            })
            .collect();

        let hosts = root
            .descendants()
            .filter(|n| n.has_tag_name("host"))
            .map(host_record)
            .collect();

        Ok(Self {
            status: root.attribute("Status").map(str::to_string),
            errors,
            hosts,
        })
    }

    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("OK")
    }

    /// `Ok` for `Status="OK"`, otherwise the first reported error.
    ///
    /// A failure status without any `<Error>` element is reported with code
    /// `unknown` and a truncated copy of `body`.
    pub fn check(&self, body: &str) -> Result<()> {
        if self.is_ok() {
            return Ok(());
        }
        match self.errors.first() {
            Some(first) => Err(DnsError::Provider {
                code: first.number.clone(),
                message: first.text.clone(),
            }),
            None => Err(DnsError::Provider {
                code: "unknown".into(),
                message: format!(
                    "status {:?} without error details: {}",
                    self.status.as_deref().unwrap_or("<missing>"),
                    truncate_for_log(body)
                ),
            }),
        }
    }
}

fn host_record(node: Node<'_, '_>) -> HostRecord {
    let attr = |name: &str| node.attribute(name).map(str::to_string);
    HostRecord {
        host_id: attr("HostId"),
        name: attr("Name").unwrap_or_default(),
        record_type: attr("Type").unwrap_or_default(),
        address: attr("Address").unwrap_or_default(),
        ttl: node.attribute("TTL").and_then(|v| v.parse().ok()),
        mx_pref: node.attribute("MXPref").and_then(|v| v.parse().ok()),
    }
}

/// Shortens a response body for log lines and error messages.
pub(crate) fn truncate_for_log(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(LOG_BODY_LIMIT) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GET_HOSTS_OK: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <Errors />
  <RequestedCommand>namecheap.domains.dns.getHosts</RequestedCommand>
  <CommandResponse Type="namecheap.domains.dns.getHosts">
    <DomainDNSGetHostsResult Domain="lech.world" IsUsingOurDNS="true">
      <host HostId="12" Name="@" Type="A" Address="76.76.21.21" MXPref="10" TTL="1800" />
      <host HostId="14" Name="www" Type="CNAME" Address="cname.vercel-dns.com." MXPref="10" TTL="1800" />
    </DomainDNSGetHostsResult>
  </CommandResponse>
</ApiResponse>"#;

    #[test]
    fn parses_hosts_in_document_order() {
        let response = ApiResponse::parse(GET_HOSTS_OK).unwrap();
        assert!(response.is_ok());
        assert!(response.errors.is_empty());
        assert_eq!(response.hosts.len(), 2);

        let apex = &response.hosts[0];
        assert_eq!(apex.host_id.as_deref(), Some("12"));
        assert_eq!(apex.name, "@");
        assert_eq!(apex.record_type, "A");
        assert_eq!(apex.address, "76.76.21.21");
        assert_eq!(apex.ttl, Some(1800));
        assert_eq!(apex.mx_pref, Some(10));

        assert_eq!(response.hosts[1].record_type, "CNAME");
    }

    #[test]
    fn first_error_wins() {
        let body = r#"<ApiResponse Status="ERROR">
  <Errors>
    <Error Number="2050900">Invalid request IP: 8.8.8.8</Error>
    <Error Number="1011102">Parameter APIKey is missing</Error>
  </Errors>
</ApiResponse>"#;
        let response = ApiResponse::parse(body).unwrap();
        assert_eq!(response.errors.len(), 2);

        let err = response.check(body).unwrap_err();
        assert_eq!(err.code(), "2050900");
        assert_eq!(err.message(), "Invalid request IP: 8.8.8.8");
    }

    #[test]
    fn failure_without_errors_is_unknown() {
        let body = r#"<ApiResponse Status="WARNING"><Warnings /></ApiResponse>"#;
        let err = ApiResponse::parse(body).unwrap().check(body).unwrap_err();
        assert_eq!(err.code(), "unknown");
        assert!(err.message().contains("WARNING"));
    }

    #[test]
    fn missing_status_is_not_ok() {
        let body = "<ApiResponse />";
        let response = ApiResponse::parse(body).unwrap();
        assert!(!response.is_ok());
        assert!(response.check(body).is_err());
    }

    #[test]
    fn html_error_page_is_a_parse_error() {
        let err = ApiResponse::parse("<html><body>502 Bad Gateway").unwrap_err();
        assert!(matches!(err, DnsError::Parse(_)));
    }

    #[test]
    fn plain_text_is_a_parse_error() {
        let err = ApiResponse::parse("Service Unavailable").unwrap_err();
        assert_eq!(err.code(), "parse");
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "é".repeat(LOG_BODY_LIMIT + 10);
        let cut = truncate_for_log(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), LOG_BODY_LIMIT + 3);
        assert_eq!(truncate_for_log("  short "), "short");
    }
}
