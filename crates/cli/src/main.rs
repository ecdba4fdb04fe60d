use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fogowatch_cli::config::Settings;
use fogowatch_cli::pipeline::{self, CycleError, CycleReport};
use fogowatch_feed::FeedClient;
use fogowatch_notify::{HttpNotifier, Notification, Notifier, StdoutNotifier};
use fogowatch_store::SnapshotStore;

#[derive(Parser)]
#[command(name = "fogowatch")]
#[command(about = "Polls the fogos.pt fire feed and notifies on changes")]
#[command(version)]
struct Cli {
    /// Config file (default: <config_dir>/fogowatch/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single poll cycle and exit
    Run,
    /// Poll on a fixed interval until interrupted
    Watch {
        /// Seconds between cycles (overrides config)
        #[arg(long)]
        interval: Option<u64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = match Settings::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "cannot load configuration");
            return ExitCode::FAILURE;
        }
    };

    let feed = FeedClient::new(&settings.feed_url);
    let store = SnapshotStore::new(&settings.state_file);
    let notifier = build_notifier(&settings);

    match cli.command {
        Commands::Run => {
            match pipeline::run_cycle(&settings, &feed, &store, notifier.as_ref()) {
                Ok(report) => {
                    log_report(&report);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    report_cycle_error(&settings, notifier.as_ref(), &e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Watch { interval } => {
            let interval = Duration::from_secs(interval.unwrap_or(settings.interval_secs));
            info!(interval_secs = interval.as_secs(), "watching feed");
            loop {
                // A failed cycle is logged and reported, never fatal; the
                // loop resumes at the next tick.
                match pipeline::run_cycle(&settings, &feed, &store, notifier.as_ref()) {
                    Ok(report) => log_report(&report),
                    Err(e) => report_cycle_error(&settings, notifier.as_ref(), &e),
                }
                thread::sleep(interval);
            }
        }
    }
}

fn build_notifier(settings: &Settings) -> Box<dyn Notifier> {
    match &settings.notify.endpoint {
        Some(endpoint) => Box::new(HttpNotifier::new(endpoint)),
        None => {
            info!("no notify endpoint configured; printing notifications to stdout");
            Box::new(StdoutNotifier)
        }
    }
}

fn log_report(report: &CycleReport) {
    info!(
        fetched = report.fetched,
        relevant = report.relevant,
        appeared = report.appeared,
        disappeared = report.disappeared,
        changed = report.changed,
        notified = report.notified,
        notify_failures = report.notify_failures,
        "cycle complete"
    );
}

/// Log a failed cycle and push it through the error-notification channel.
fn report_cycle_error(settings: &Settings, notifier: &dyn Notifier, err: &CycleError) {
    error!(error = %err, "poll cycle failed");

    let recipients = settings.notify.effective_error_recipients();
    if recipients.is_empty() {
        return;
    }
    let notification = Notification {
        to: recipients.to_vec(),
        subject: "Error - fogowatch".to_string(),
        message: err.to_string(),
    };
    if let Err(e) = notifier.send(&notification) {
        warn!(error = %e, "error notification failed");
    }
}
