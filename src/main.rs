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

mod cli;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use namecheap_pages::client::{API_KEY_ENV, API_USER_ENV, Credentials, DnsClient, Endpoint, HostRecord};
use namecheap_pages::error::{DnsError, Result};
use namecheap_pages::instructions::{manual_instructions, record_table};
use namecheap_pages::propagation;
use namecheap_pages::providers::namecheap::{
    API_ACCESS_URL, NamecheapDns, NamecheapDnsBuilder, remediation,
};
use namecheap_pages::records::{DomainIdentity, PagesTarget};
use namecheap_pages::utils::ip::{IP_LOOKUP_TIMEOUT, lookup_public_ip};
use namecheap_pages::utils::request::DefaultDnsClient;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, CredentialArgs};

/// Everything a command needs besides credentials.
struct Context {
    domain: DomainIdentity,
    target: PagesTarget,
    endpoint: Endpoint,
    timeout: Duration,
    client_ip: Option<String>,
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let domain = match DomainIdentity::parse(&cli.domain) {
        Ok(domain) => domain,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let ctx = Context {
        domain,
        target: PagesTarget::new(cli.pages_user, cli.ttl),
        endpoint: if cli.sandbox { Endpoint::Sandbox } else { Endpoint::Production },
        timeout: Duration::from_secs(cli.timeout),
        client_ip: cli.client_ip.map(|ip| ip.to_string()),
        json: cli.json,
    };

    let command = cli.command.unwrap_or(Commands::Update {
        credentials: cli.credentials,
        skip_listing: false,
    });

    let outcome = match command {
        Commands::Update { credentials, skip_listing } => update(&ctx, credentials, skip_listing).await,
        Commands::List { credentials } => list(&ctx, credentials).await,
        Commands::Plan => plan(&ctx),
        Commands::Verify => verify(&ctx).await,
        Commands::Instructions => {
            print!("{}", manual_instructions(&ctx.domain, &ctx.target));
            Ok(())
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time()
                .with_target(false),
        )
        .with(filter)
        .init();
}

/// Resolves credentials, printing usage and the manual steps when they are missing.
fn credentials(ctx: &Context, args: CredentialArgs) -> Result<Credentials> {
    Credentials::resolve(args.api_user, args.api_key, |key| std::env::var(key).ok()).inspect_err(|e| {
        eprintln!("{e}");
        eprintln!("Usage: namecheap-pages [update] <API_USER> <API_KEY>");
        eprintln!("Or set environment variables: {API_USER_ENV} and {API_KEY_ENV}");
        eprintln!("\nGet credentials at: {API_ACCESS_URL}\n");
        eprint!("{}", manual_instructions(&ctx.domain, &ctx.target));
    })
}

async fn connect(ctx: &Context, credentials: Credentials) -> Result<NamecheapDns<DefaultDnsClient>> {
    let client_ip = match &ctx.client_ip {
        Some(ip) => ip.clone(),
        None => lookup_public_ip(&DefaultDnsClient::with_timeout(IP_LOOKUP_TIMEOUT)?).await,
    };
    eprintln!("Client IP: {client_ip} (must be whitelisted at Namecheap)");

    NamecheapDnsBuilder::new(DefaultDnsClient::with_timeout(ctx.timeout)?)
        .credentials(credentials)
        .client_ip(client_ip)
        .endpoint(ctx.endpoint)
        .build()
}

/// Prints the error, any known remediation, then the manual steps.
fn report_failure(ctx: &Context, err: &DnsError, client_ip: Option<&str>) {
    eprintln!("\nError {}: {}", err.code(), err.message());
    if let Some(help) = client_ip.and_then(|ip| remediation(err, ip)) {
        eprintln!("\n{help}");
    }
    eprintln!();
    eprint!("{}", manual_instructions(&ctx.domain, &ctx.target));
}

fn print_hosts(hosts: &[HostRecord]) {
    if hosts.is_empty() {
        println!("No existing DNS records found");
        return;
    }
    for host in hosts {
        println!("   - {:<6} {:<10} -> {}", host.record_type, host.name, host.address);
    }
}

async fn update(ctx: &Context, args: CredentialArgs, skip_listing: bool) -> Result<()> {
    let credentials = credentials(ctx, args)?;
    let records = ctx.target.records();

    let client = match connect(ctx, credentials).await {
        Ok(client) => client,
        Err(e) => {
            report_failure(ctx, &e, None);
            return Err(e);
        }
    };

    println!("Updating DNS for {}", ctx.domain);

    if !skip_listing {
        match client.get_hosts(&ctx.domain).await {
            Ok(hosts) => {
                if !hosts.is_empty() {
                    println!("\nExisting records (will be replaced):");
                }
                print_hosts(&hosts);
            }
            Err(e) => {
                eprintln!("\nCould not access the Namecheap API");
                report_failure(ctx, &e, Some(client.client_ip()));
                return Err(e);
            }
        }
    }

    println!("\nSetting DNS records:");
    print!("{}", record_table(&records));

    match client.set_hosts(&ctx.domain, &records).await {
        Ok(()) => {
            println!("\nDNS records updated.");
            println!("Your site will be available at https://www.{} (allow 5-30 minutes, up to 24 hours)", ctx.domain);
            println!("Run `namecheap-pages verify` to check propagation.");
            Ok(())
        }
        Err(e) => {
            report_failure(ctx, &e, Some(client.client_ip()));
            Err(e)
        }
    }
}

async fn list(ctx: &Context, args: CredentialArgs) -> Result<()> {
    let credentials = credentials(ctx, args)?;
    let client = connect(ctx, credentials)
        .await
        .inspect_err(|e| report_failure(ctx, e, None))?;

    match client.get_hosts(&ctx.domain).await {
        Ok(hosts) if ctx.json => {
            print_json(&hosts);
            Ok(())
        }
        Ok(hosts) => {
            println!("Records for {}:", ctx.domain);
            print_hosts(&hosts);
            Ok(())
        }
        Err(e) => {
            report_failure(ctx, &e, Some(client.client_ip()));
            Err(e)
        }
    }
}

fn plan(ctx: &Context) -> Result<()> {
    let records = ctx.target.records();
    if ctx.json {
        print_json(&records);
    } else {
        println!("Records for {}:", ctx.domain);
        print!("{}", record_table(&records));
    }
    Ok(())
}

async fn verify(ctx: &Context) -> Result<()> {
    let reports = propagation::check(&ctx.domain, &ctx.target).await;
    if ctx.json {
        print_json(&reports);
        return Ok(());
    }

    for report in &reports {
        let answers = report
            .cnames
            .iter()
            .cloned()
            .chain(report.addresses.iter().map(ToString::to_string))
            .collect::<Vec<_>>()
            .join(", ");
        println!("{:<24} {:<22} {}", report.name, report.verdict.to_string(), answers);
    }
    if reports.iter().all(|r| r.verdict.is_propagated()) {
        println!("\nDNS points at GitHub Pages.");
    } else {
        println!("\nDNS is still propagating (this can take up to 24 hours).");
    }
    Ok(())
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => tracing::error!("failed to serialize output: {e}"),
    }
}
