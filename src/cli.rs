//! Command-line arguments

use std::net::IpAddr;

use clap::{Args, Parser, Subcommand};
use namecheap_pages::records::{DEFAULT_DOMAIN, DEFAULT_PAGES_USER, DEFAULT_TTL};

/// Point a Namecheap domain at GitHub Pages.
///
/// Running without a subcommand is the same as `update`.
#[derive(Parser, Debug)]
#[command(name = "namecheap-pages", version, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Domain whose records are replaced
    #[arg(long, global = true, default_value = DEFAULT_DOMAIN)]
    pub domain: String,

    /// GitHub user or organisation serving the site (`<user>.github.io`)
    #[arg(long, global = true, default_value = DEFAULT_PAGES_USER)]
    pub pages_user: String,

    /// TTL in seconds for every record
    #[arg(long, global = true, default_value_t = DEFAULT_TTL,
          value_parser = clap::value_parser!(u32).range(60..=60000))]
    pub ttl: u32,

    /// Whitelisted client IP; detected via api.ipify.org when omitted
    #[arg(long, global = true)]
    pub client_ip: Option<IpAddr>,

    /// API request timeout in seconds
    #[arg(long, global = true, default_value_t = 30,
          value_parser = clap::value_parser!(u64).range(1..=300))]
    pub timeout: u64,

    /// Use the Namecheap sandbox API
    #[arg(long, global = true)]
    pub sandbox: bool,

    /// Machine-readable output for plan, list and verify
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace the domain's host records with the GitHub Pages set
    Update {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Skip listing the records that are about to be replaced
        #[arg(long)]
        skip_listing: bool,
    },

    /// List the records currently configured at Namecheap
    List {
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Print the records that would be submitted, without calling the API
    Plan,

    /// Check whether the domain already resolves to GitHub Pages
    Verify,

    /// Print manual dashboard instructions
    Instructions,
}

#[derive(Args, Debug, Clone, Default)]
pub struct CredentialArgs {
    /// Namecheap API user [env: NAMECHEAP_API_USER]
    pub api_user: Option<String>,

    /// Namecheap API key [env: NAMECHEAP_API_KEY]
    pub api_key: Option<String>,
}
