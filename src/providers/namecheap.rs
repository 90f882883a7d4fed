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

use async_trait::async_trait;

use crate::client::{Credentials, DnsClient, Endpoint, HostRecord};
use crate::error::{DnsError, Result};
use crate::providers::utils::{ApiResponse, truncate_for_log};
use crate::records::{DnsRecord, DomainIdentity};
use crate::utils::request::DnsHttpClient;

pub const COMMAND_GET_HOSTS: &str = "namecheap.domains.dns.getHosts";
pub const COMMAND_SET_HOSTS: &str = "namecheap.domains.dns.setHosts";

pub const API_ACCESS_URL: &str = "https://ap.www.namecheap.com/settings/tools/apiaccess/";

/// API access disabled or caller IP not whitelisted.
pub const ERR_IP_NOT_WHITELISTED: &str = "2050900";
/// API user / key pair rejected.
pub const ERR_INVALID_CREDENTIALS: &str = "2011170";
/// Domain exists but has no host records yet.
pub const ERR_NO_HOST_RECORDS: &str = "2019166";

/// Builder for [`NamecheapDns`].
pub struct NamecheapDnsBuilder<T: DnsHttpClient> {
    http_client: T,
    credentials: Option<Credentials>,
    client_ip: Option<String>,
    endpoint: Endpoint,
}

impl<T: DnsHttpClient> NamecheapDnsBuilder<T> {
    pub fn new(http_client: T) -> Self {
        Self {
            http_client,
            credentials: None,
            client_ip: None,
            endpoint: Endpoint::default(),
        }
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Address the API checks against the account's whitelist.
    pub fn client_ip(mut self, client_ip: impl Into<String>) -> Self {
        self.client_ip = Some(client_ip.into());
        self
    }

    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn build(self) -> Result<NamecheapDns<T>> {
        let credentials = self
            .credentials
            .ok_or_else(|| DnsError::Input("credentials are required".into()))?;
        let client_ip = self
            .client_ip
            .filter(|ip| !ip.trim().is_empty())
            .ok_or_else(|| DnsError::Input("client IP is required".into()))?;
        Ok(NamecheapDns {
            http_client: self.http_client,
            api: self.endpoint.url().to_string(),
            credentials,
            client_ip,
        })
    }
}

pub struct NamecheapDns<T: DnsHttpClient> {
    /// HTTP client for making requests
    http_client: T,
    /// API endpoint
    api: String,
    credentials: Credentials,
    client_ip: String,
}

impl<T: DnsHttpClient> NamecheapDns<T> {
    pub fn client_ip(&self) -> &str {
        &self.client_ip
    }

    /// Command, authentication and domain fields shared by every call.
    fn base_fields(&self, command: &str, domain: &DomainIdentity) -> Vec<(String, String)> {
        vec![
            ("ApiUser".into(), self.credentials.api_user.clone()),
            ("ApiKey".into(), self.credentials.api_key.clone()),
            ("UserName".into(), self.credentials.api_user.clone()),
            ("Command".into(), command.into()),
            ("ClientIp".into(), self.client_ip.clone()),
            ("SLD".into(), domain.sld.clone()),
            ("TLD".into(), domain.tld.clone()),
        ]
    }

    async fn call(&self, command: &str, form: Vec<(String, String)>) -> Result<ApiResponse> {
        tracing::debug!(command, api = %self.api, client_ip = %self.client_ip, "calling API");
        let body = self.http_client.post_form(&self.api, &form).await?;
        tracing::debug!(command, body = %truncate_for_log(&body), "API replied");

        let response = ApiResponse::parse(&body).inspect_err(|e| {
            tracing::error!(command, error = %e, body = %truncate_for_log(&body), "unreadable API response");
        })?;
        response.check(&body)?;
        Ok(response)
    }
}

#[async_trait]
impl<T: DnsHttpClient> DnsClient for NamecheapDns<T> {
    /// A domain without any records reports error 2019166; that is an empty
    /// listing, not a failure.
    async fn get_hosts(&self, domain: &DomainIdentity) -> Result<Vec<HostRecord>> {
        let form = self.base_fields(COMMAND_GET_HOSTS, domain);
        match self.call(COMMAND_GET_HOSTS, form).await {
            Ok(response) => Ok(response.hosts),
            Err(e) if e.is_provider_code(ERR_NO_HOST_RECORDS) => {
                tracing::info!(%domain, "no existing host records");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn set_hosts(&self, domain: &DomainIdentity, records: &[DnsRecord]) -> Result<()> {
        let mut form = self.base_fields(COMMAND_SET_HOSTS, domain);
        form.extend(host_fields(records));
        self.call(COMMAND_SET_HOSTS, form).await?;
        tracing::info!(%domain, records = records.len(), "host records replaced");
        Ok(())
    }
}

/// `HostName{i}`, `RecordType{i}`, `Address{i}`, `TTL{i}` for each record,
/// with `i` starting at 1 and following record order.
pub fn host_fields(records: &[DnsRecord]) -> Vec<(String, String)> {
    records
        .iter()
        .zip(1..)
        .flat_map(|(record, i): (&DnsRecord, usize)| {
            [
                (format!("HostName{i}"), record.host.clone()),
                (format!("RecordType{i}"), record.record_type.to_string()),
                (format!("Address{i}"), record.value.clone()),
                (format!("TTL{i}"), record.ttl.to_string()),
            ]
        })
        .collect()
}

/// Operator-facing steps for the provider codes that have a known fix.
pub fn remediation(err: &DnsError, client_ip: &str) -> Option<String> {
    match err.code() {
        ERR_IP_NOT_WHITELISTED => Some(format!(
            "API access is not enabled or this IP is not whitelisted.\n  \
             1. Go to: {API_ACCESS_URL}\n  \
             2. Enable API Access\n  \
             3. Whitelist your IP: {client_ip}"
        )),
        ERR_INVALID_CREDENTIALS => Some(format!(
            "Invalid API credentials.\n  Check your API user and API key at {API_ACCESS_URL}"
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::PagesTarget;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Replays one canned reply and records the submitted form.
    struct MockTransport {
        reply: Result<String>,
        sent: Mutex<Vec<Vec<(String, String)>>>,
    }

    impl MockTransport {
        fn replying(body: &str) -> Self {
            Self {
                reply: Ok(body.to_string()),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: DnsError) -> Self {
            Self {
                reply: Err(err),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    impl DnsHttpClient for MockTransport {
        async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<String> {
            assert_eq!(url, Endpoint::Production.url());
            self.sent.lock().unwrap().push(form.to_vec());
            self.reply.clone()
        }

        async fn get_text(&self, _url: &str) -> Result<String> {
            unreachable!("the API client only POSTs")
        }
    }

    fn client(transport: MockTransport) -> NamecheapDns<MockTransport> {
        NamecheapDnsBuilder::new(transport)
            .credentials(Credentials::new("lech", "key-123").unwrap())
            .client_ip("203.0.113.7")
            .build()
            .unwrap()
    }

    fn domain() -> DomainIdentity {
        DomainIdentity::parse("lech.world").unwrap()
    }

    fn as_map(form: &[(String, String)]) -> HashMap<&str, &str> {
        form.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    const SET_HOSTS_OK: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <Errors />
  <CommandResponse Type="namecheap.domains.dns.setHosts">
    <DomainDNSSetHostsResult Domain="lech.world" IsSuccess="true" />
  </CommandResponse>
</ApiResponse>"#;

    #[test]
    fn host_fields_are_indexed_from_one_without_gaps() {
        let records = PagesTarget::default().records();
        let fields = host_fields(&records);
        assert_eq!(fields.len(), records.len() * 4);

        let map = as_map(&fields);
        for (i, record) in (1..).zip(records.iter()) {
            assert_eq!(map[format!("HostName{i}").as_str()], record.host);
            assert_eq!(map[format!("RecordType{i}").as_str()], record.record_type.as_str());
            assert_eq!(map[format!("Address{i}").as_str()], record.value);
            assert_eq!(map[format!("TTL{i}").as_str()], "1800");
        }
        assert!(!map.contains_key("HostName0"));
        assert!(!map.contains_key("HostName6"));
        assert_eq!(map["RecordType5"], "CNAME");
        assert_eq!(map["Address5"], "leolech14.github.io");
    }

    #[test]
    fn no_records_means_no_host_fields() {
        assert!(host_fields(&[]).is_empty());
    }

    #[tokio::test]
    async fn set_hosts_ok_status_is_success() {
        let api = client(MockTransport::replying(SET_HOSTS_OK));
        let records = PagesTarget::default().records();

        api.set_hosts(&domain(), &records).await.unwrap();

        let sent = api.http_client.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let map = as_map(&sent[0]);
        assert_eq!(map["ApiUser"], "lech");
        assert_eq!(map["ApiKey"], "key-123");
        assert_eq!(map["UserName"], "lech");
        assert_eq!(map["Command"], COMMAND_SET_HOSTS);
        assert_eq!(map["ClientIp"], "203.0.113.7");
        assert_eq!(map["SLD"], "lech");
        assert_eq!(map["TLD"], "world");
        assert_eq!(sent[0].len(), 7 + 5 * 4);
    }

    #[tokio::test]
    async fn set_hosts_reports_provider_error() {
        let api = client(MockTransport::replying(
            r#"<ApiResponse Status="ERROR"><Errors><Error Number="2011170">Invalid API Key</Error></Errors></ApiResponse>"#,
        ));

        let err = api
            .set_hosts(&domain(), &PagesTarget::default().records())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DnsError::Provider {
                code: "2011170".into(),
                message: "Invalid API Key".into(),
            }
        );
    }

    #[tokio::test]
    async fn transport_failure_is_returned_unchanged() {
        let api = client(MockTransport::failing(DnsError::Network(
            "request timed out: operation timed out".into(),
        )));

        let err = api
            .set_hosts(&domain(), &PagesTarget::default().records())
            .await
            .unwrap_err();

        assert_eq!(err.code(), "network");
    }

    #[tokio::test]
    async fn malformed_body_surfaces_as_parse_error() {
        let api = client(MockTransport::replying("<ApiResponse Status=\"OK\""));
        let err = api
            .set_hosts(&domain(), &PagesTarget::default().records())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "parse");
    }

    #[tokio::test]
    async fn get_hosts_lists_existing_records() {
        let api = client(MockTransport::replying(
            r#"<ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
  <CommandResponse Type="namecheap.domains.dns.getHosts">
    <DomainDNSGetHostsResult Domain="lech.world">
      <host HostId="1" Name="www" Type="CNAME" Address="cname.vercel-dns.com." TTL="1800" />
    </DomainDNSGetHostsResult>
  </CommandResponse>
</ApiResponse>"#,
        ));

        let hosts = api.get_hosts(&domain()).await.unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].name, "www");
        assert_eq!(hosts[0].address, "cname.vercel-dns.com.");

        let sent = api.http_client.sent.lock().unwrap();
        let map = as_map(&sent[0]);
        assert_eq!(map["Command"], COMMAND_GET_HOSTS);
        assert!(!map.contains_key("HostName1"));
    }

    #[tokio::test]
    async fn get_hosts_treats_no_records_as_empty() {
        let api = client(MockTransport::replying(
            r#"<ApiResponse Status="ERROR"><Errors><Error Number="2019166">Domain has no host records</Error></Errors></ApiResponse>"#,
        ));
        assert!(api.get_hosts(&domain()).await.unwrap().is_empty());
    }

    #[test]
    fn builder_requires_credentials_and_client_ip() {
        let err = NamecheapDnsBuilder::new(MockTransport::replying(SET_HOSTS_OK))
            .client_ip("203.0.113.7")
            .build()
            .err()
            .unwrap();
        assert_eq!(err.code(), "input");

        let err = NamecheapDnsBuilder::new(MockTransport::replying(SET_HOSTS_OK))
            .credentials(Credentials::new("u", "k").unwrap())
            .client_ip(" ")
            .build()
            .err()
            .unwrap();
        assert_eq!(err.code(), "input");
    }

    #[test]
    fn known_codes_have_remediation() {
        let whitelist = DnsError::Provider {
            code: ERR_IP_NOT_WHITELISTED.into(),
            message: "Invalid request IP".into(),
        };
        let text = remediation(&whitelist, "203.0.113.7").unwrap();
        assert!(text.contains("203.0.113.7"));
        assert!(text.contains(API_ACCESS_URL));

        let creds = DnsError::Provider {
            code: ERR_INVALID_CREDENTIALS.into(),
            message: "Invalid API Key".into(),
        };
        assert!(remediation(&creds, "203.0.113.7").unwrap().contains("API key"));

        assert!(remediation(&DnsError::Network("down".into()), "203.0.113.7").is_none());
    }
}
