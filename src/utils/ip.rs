use std::net::IpAddr;
use std::time::Duration;

use crate::utils::request::DnsHttpClient;

pub const IP_LOOKUP_URL: &str = "https://api.ipify.org";
pub const IP_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Used when the lookup fails; the API call will then most likely be
/// rejected by the whitelist, which is reported with remediation text.
pub const FALLBACK_CLIENT_IP: &str = "8.8.8.8";

/// Best-effort public IP of this machine. Never fails.
pub async fn lookup_public_ip<T: DnsHttpClient>(http_client: &T) -> String {
    match http_client.get_text(IP_LOOKUP_URL).await {
        Ok(body) => match body.trim().parse::<IpAddr>() {
            Ok(ip) => ip.to_string(),
            Err(_) => {
                tracing::warn!(
                    body = body.trim(),
                    fallback = FALLBACK_CLIENT_IP,
                    "IP lookup returned something that is not an address"
                );
                FALLBACK_CLIENT_IP.to_string()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, fallback = FALLBACK_CLIENT_IP, "could not detect public IP");
            FALLBACK_CLIENT_IP.to_string()
        }
    }
}
