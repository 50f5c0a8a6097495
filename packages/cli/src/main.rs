#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the civic updates digest.
//!
//! ```text
//! chi_updates --search-area-latitude 41.8919 --search-area-longitude=-87.6051 \
//!     --from-address digest@example.com --to-addresses a@example.com,b@example.com \
//!     --smtp-user postmaster@example.com --smtp-password ...
//! ```
//!
//! Queries each dataset once, renders the HTML digest, and emails it.
//! With `--dry-run` the HTML is printed to stdout instead.

use chi_updates_datasets::{DigestQueries, gather_report};
use chi_updates_mailer::{
    DEFAULT_SMTP_PORT, DEFAULT_SMTP_SERVER, SmtpSettings, build_message, send, subject_for,
};
use chi_updates_report::render_html;
use chi_updates_socrata::SocrataClient;
use chi_updates_socrata_models::SearchArea;
use clap::Parser;
use secrecy::Secret;

#[derive(Parser)]
#[command(
    name = "chi_updates",
    about = "Email a digest of recent Chicago business licenses, food inspections, and filming permits"
)]
struct Cli {
    /// Latitude of search area center.
    #[arg(long, allow_negative_numbers = true)]
    search_area_latitude: f64,
    /// Longitude of search area center.
    #[arg(long, allow_negative_numbers = true)]
    search_area_longitude: f64,
    /// Radius of search area (in meters).
    #[arg(long, default_value = "2750")]
    search_area_radius: u32,
    /// Address of email sender.
    #[arg(long, required_unless_present = "dry_run")]
    from_address: Option<String>,
    /// Comma-separated addresses of email recipients.
    #[arg(long, required_unless_present = "dry_run")]
    to_addresses: Option<String>,
    /// SMTP server address.
    #[arg(long, default_value = DEFAULT_SMTP_SERVER)]
    smtp_server: String,
    /// SMTP server port.
    #[arg(long, default_value_t = DEFAULT_SMTP_PORT)]
    smtp_port: u16,
    /// SMTP server username.
    #[arg(long, required_unless_present = "dry_run")]
    smtp_user: Option<String>,
    /// SMTP server password.
    #[arg(long, required_unless_present = "dry_run")]
    smtp_password: Option<String>,
    /// Print the HTML digest to stdout instead of sending it
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    const fn search_area(&self) -> SearchArea {
        SearchArea::new(
            self.search_area_latitude,
            self.search_area_longitude,
            self.search_area_radius,
        )
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let area = cli.search_area();
    log::info!(
        "Gathering updates within {}m of ({}, {})",
        area.radius_meters,
        area.latitude,
        area.longitude
    );

    let client = SocrataClient::chicago();
    let report = gather_report(&client, &area, &DigestQueries::default()).await?;
    if report.is_empty() {
        log::info!("No new records in the search area");
    }

    let html = render_html(&report);

    if cli.dry_run {
        println!("{html}");
        return Ok(());
    }

    let (Some(from_address), Some(to_addresses), Some(smtp_user), Some(smtp_password)) = (
        cli.from_address,
        cli.to_addresses,
        cli.smtp_user,
        cli.smtp_password,
    ) else {
        return Err("sender, recipients, and SMTP credentials are required".into());
    };

    let subject = subject_for(chrono::Local::now().date_naive());
    let message = build_message(&from_address, &to_addresses, &subject, html)?;

    let settings = SmtpSettings {
        server: cli.smtp_server,
        port: cli.smtp_port,
        user: smtp_user,
        password: Secret::new(smtp_password),
    };
    send(&settings, message).await?;

    log::info!("Digest sent: {subject}");

    Ok(())
}
