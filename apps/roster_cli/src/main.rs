use std::{fmt::Write as _, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    load_settings, HtmlRosterView, HttpRosterApi, LoadOutcome, RosterController, RosterView,
    SignupOutcome, StatusMessage, UnregisterOutcome,
};
use shared::domain::{Activity, ActivityCatalog};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "roster", about = "Browse activities and manage their rosters")]
struct Args {
    /// Overrides the server url from roster.toml / environment.
    #[arg(long)]
    server_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every activity with its roster.
    List,
    /// Sign a student up for an activity.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        activity: String,
    },
    /// Remove a student from an activity.
    Unregister {
        #[arg(long)]
        email: String,
        #[arg(long)]
        activity: String,
    },
    /// Print the roster page fragment as HTML.
    Render,
}

/// Prints view updates to the terminal.
struct TerminalView;

impl RosterView for TerminalView {
    fn show_catalog(&self, catalog: &ActivityCatalog) {
        print!("{}", format_catalog(catalog));
    }

    fn show_load_failure(&self, message: &str) {
        eprintln!("{message}");
    }

    fn remove_participant(&self, activity: &str, email: &str) {
        println!("Removed {email} from {activity}");
    }

    fn show_no_participants(&self, activity: &str) {
        println!("{activity}: No participants yet");
    }

    fn show_status(&self, status: &StatusMessage) {
        println!("[{}] {}", status.kind.css_class(), status.text);
    }

    fn hide_status(&self) {
        tracing::debug!("status message expired");
    }

    fn reset_form(&self) {}

    fn alert(&self, message: &str) {
        eprintln!("alert: {message}");
    }
}

fn format_activity(name: &str, activity: &Activity) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{name}");
    let _ = writeln!(out, "  {}", activity.description);
    let _ = writeln!(out, "  Schedule: {}", activity.schedule);
    let _ = writeln!(out, "  Availability: {} spots left", activity.spots_left());
    let _ = writeln!(out, "  Participants:");
    if activity.participants.is_empty() {
        let _ = writeln!(out, "    No participants yet");
    }
    for participant in &activity.participants {
        let _ = writeln!(out, "    - {participant}");
    }
    out
}

fn format_catalog(catalog: &ActivityCatalog) -> String {
    catalog
        .iter()
        .map(|(name, activity)| format_activity(name, activity))
        .collect::<Vec<_>>()
        .join("\n")
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(server_url) = &args.server_url {
        settings = settings.with_server_url(server_url);
    }
    let api = Arc::new(
        HttpRosterApi::from_settings(&settings)
            .with_context(|| format!("invalid server url '{}'", settings.server_url))?,
    );

    match args.command {
        Command::List => {
            let controller = RosterController::new(api, Arc::new(TerminalView), &settings);
            if controller.load_activities().await != LoadOutcome::Applied {
                bail!("could not load activities from {}", settings.server_url);
            }
        }
        Command::Signup { email, activity } => {
            let controller = RosterController::new(api, Arc::new(TerminalView), &settings);
            if controller.submit_signup(&email, &activity).await != SignupOutcome::Accepted {
                bail!("signup for {activity} failed");
            }
        }
        Command::Unregister { email, activity } => {
            let controller = RosterController::new(api, Arc::new(TerminalView), &settings);
            if controller.unregister(&email, &activity).await != UnregisterOutcome::Removed {
                bail!("unregister from {activity} failed");
            }
        }
        Command::Render => {
            let view = Arc::new(HtmlRosterView::new());
            let controller = RosterController::new(api, view.clone(), &settings);
            let outcome = controller.load_activities().await;
            println!("{}", view.document().context("failed to render roster page")?);
            if outcome != LoadOutcome::Applied {
                bail!("could not load activities from {}", settings.server_url);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
