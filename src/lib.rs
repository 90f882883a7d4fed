//! Repoints a Namecheap domain at GitHub Pages
//!
//! Supported features:
//! - Fixed GitHub Pages record set (apex A records plus a `www` CNAME)
//! - `setHosts` / `getHosts` over the Namecheap XML API
//! - Typed error results with remediation for known provider codes
//! - Propagation check through the local resolver
//!
//! # Example
//! ```no_run
//! use namecheap_pages::client::{Credentials, DnsClient};
//! use namecheap_pages::providers::namecheap::NamecheapDnsBuilder;
//! use namecheap_pages::records::{DomainIdentity, PagesTarget};
//! use namecheap_pages::utils::request::{DefaultDnsClient, DEFAULT_TIMEOUT};
//!
//! # async fn run() -> Result<(), namecheap_pages::error::DnsError> {
//! let client = NamecheapDnsBuilder::new(DefaultDnsClient::with_timeout(DEFAULT_TIMEOUT)?)
//!     .credentials(Credentials::new("api_user", "api_key")?)
//!     .client_ip("203.0.113.7")
//!     .build()?;
//!
//! let domain = DomainIdentity::parse("lech.world")?;
//! client.set_hosts(&domain, &PagesTarget::default().records()).await?;
//! # Ok(())
//! # }
//! ```

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

pub mod client;
pub mod error;
pub mod instructions;
pub mod propagation;
pub mod providers;
pub mod records;
pub mod utils;
