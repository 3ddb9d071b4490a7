use colored::Colorize;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use std::error::Error as _;

use crate::domain::{
    GuestOutcome, ProbeError, ProgressEvent, ProgressReporter, Site, WorkflowState,
};

// Human-readable progress on stdout, failures on stderr.
#[derive(Clone, Debug)]
pub struct ConsoleReporter {
    pub controller: String,
    pub username: String,
}

impl ConsoleReporter {
    pub fn banner(&self) {
        println!("{}", "UniFi Controller Authentication Test".bold());
        println!("{}", "=".repeat(35));
    }
}

impl ProgressReporter for ConsoleReporter {
    fn report(&self, event: ProgressEvent<'_>) {
        match event {
            ProgressEvent::Entered(WorkflowState::LoggingIn) => println!(
                "Attempting to authenticate to {} with username: {}",
                self.controller, self.username
            ),
            ProgressEvent::Entered(WorkflowState::VerifyingSites) => {
                println!("\nAttempting to retrieve sites list to verify authentication...")
            }
            ProgressEvent::Entered(_) => {}
            ProgressEvent::SessionEstablished => println!("Session cookie received."),
            ProgressEvent::SitesVerified(sites) => {
                println!("{} Authentication successful!", "✅".green());
                println!("\nAvailable sites:");
                println!("{}", site_table(sites));
            }
            ProgressEvent::Guest(GuestOutcome::Skipped) => {
                println!("\nSkipping guest authorization test (no MAC address provided)")
            }
            ProgressEvent::Guest(GuestOutcome::Authorized { mac }) => {
                println!("\n{} Guest authorization successful for {mac}!", "✅".green())
            }
            ProgressEvent::Completed => {
                println!("\n{}", "All tests completed successfully! ✅".green().bold())
            }
            ProgressEvent::Failed { state, error } => {
                eprintln!("\n{}", "Test failed! ❌".red().bold());
                eprintln!("{}", describe_failure(state, error));
            }
        }
    }
}

pub fn site_table(sites: &[Site]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Name", "Description"]);

    for site in sites {
        table.add_row(vec![
            site.id.clone(),
            site.name.clone(),
            site.description.clone(),
        ]);
    }

    table
}

// Error line plus its source chain, e.g. "while logging in: ...: ...".
pub fn describe_failure(state: WorkflowState, error: &ProbeError) -> String {
    let mut message = format!("while {}: {error}", state.label());
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
