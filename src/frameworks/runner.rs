use clap::Parser;
use std::process::ExitCode;

use crate::domain::{ProgressReporter, SecretSource};
use crate::frameworks::cli::Args;
use crate::frameworks::config::Settings;
use crate::interface_adapters::clients::{ClientOptions, ControllerClient};
use crate::interface_adapters::console::ConsoleReporter;
use crate::interface_adapters::prompt::{ProvidedSecret, TerminalPrompt};
use crate::use_cases::{AuthCheckWorkflow, exit_status};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run() -> ExitCode {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let args = Args::parse();
    let mut settings = match Settings::resolve(&args) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(error = %e, "failed to resolve settings");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(?settings, "settings resolved.");

    let client = match ControllerClient::new(
        &settings.endpoint.base_url(),
        ClientOptions {
            insecure: settings.endpoint.insecure,
            timeout: settings.timeout,
        },
    ) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build controller client");
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let reporter = ConsoleReporter {
        controller: format!("{}:{}", settings.endpoint.host, settings.endpoint.port),
        username: settings.username.clone(),
    };
    reporter.banner();
    if let Some(mac) = &args.mac {
        println!("Will test guest authorization for MAC: {mac}");
    }

    // A password from flags or environment skips the prompt.
    let mac = args.mac.as_deref();
    let status = match settings.password.take() {
        Some(password) => {
            let secrets = ProvidedSecret::new(password);
            check(client, &settings, mac, secrets, reporter).await
        }
        None => check(client, &settings, mac, TerminalPrompt::default(), reporter).await,
    };

    ExitCode::from(status)
}

async fn check<S, R>(
    api: ControllerClient,
    settings: &Settings,
    mac: Option<&str>,
    secrets: S,
    reporter: R,
) -> u8
where
    S: SecretSource,
    R: ProgressReporter,
{
    let workflow = AuthCheckWorkflow {
        api,
        secrets,
        reporter,
        username: settings.username.clone(),
        site: settings.site.clone(),
    };

    exit_status(&workflow.execute(mac).await)
}
