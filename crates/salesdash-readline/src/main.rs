use std::borrow::Cow::{self, Borrowed, Owned};
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Parser;
use colored::{Color, Colorize};
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};
use tokio::sync::mpsc;

use salesdash_application::{Dashboard, SubmitOutcome};
use salesdash_core::conversation::MessageRole;
use salesdash_core::health::{HealthSnapshot, OverallStatus};
use salesdash_diagnostics::DiagnosticLog;
use salesdash_infrastructure::ConfigService;
use salesdash_infrastructure::config_service::validate;

mod command;
mod render;

use command::{COMMANDS, Command};

#[derive(Parser, Debug)]
#[command(name = "salesdash")]
#[command(about = "Terminal client for the sales dashboard assistant", long_about = None)]
struct Args {
    /// Backend base URL (overrides config and SALESDASH_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Seconds between health checks
    #[arg(long)]
    poll_interval_secs: Option<u64>,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also print log events to stderr
    #[arg(long)]
    verbose: bool,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return Ok((0, vec![]));
        }

        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Output produced by background tasks.
enum ReplEvent {
    Answer(SubmitOutcome),
    HealthChanged(HealthSnapshot),
}

fn status_color(status: OverallStatus) -> Color {
    match status {
        OverallStatus::Checking => Color::BrightBlack,
        OverallStatus::Online => Color::Green,
        OverallStatus::Degraded => Color::Yellow,
        OverallStatus::Offline => Color::Red,
    }
}

fn print_status(snapshot: &HealthSnapshot) {
    let line = render::status_line(snapshot).color(status_color(snapshot.overall_status));
    if render::is_alarming(snapshot.overall_status) {
        println!("{}", line.bold());
    } else {
        println!("{}", line);
    }
}

fn print_details(dashboard: &Dashboard) {
    let details = dashboard.health.details_state();
    if !details.is_open() {
        return;
    }
    let snapshot = dashboard.health.snapshot();
    print_status(&snapshot);
    for line in render::health_details(&snapshot, details.is_expanded()) {
        println!("  {}", line.bright_black());
    }
}

fn print_help() {
    let help = [
        ("<text>", "ask the sales assistant"),
        ("/health", "show the status indicator"),
        ("/refresh", "check backend health now"),
        ("/details", "toggle the health details popover"),
        ("/open, /close", "open or close the chat panel"),
        ("/expand", "expand the open panel"),
        ("/reps [region]", "list sales reps"),
        ("/stats", "deal summary"),
        ("/reset", "clear the conversation"),
        ("/logs [n]", "recent log events"),
        ("quit", "exit"),
    ];
    for (name, text) in help {
        println!("  {:<16}{}", name.bright_cyan(), text.bright_black());
    }
}

/// Loads sales data unless a previous load already succeeded.
async fn ensure_sales_loaded(dashboard: &Dashboard) -> bool {
    let state = dashboard.sales.snapshot();
    if state.analytics.is_some() && state.error.is_none() {
        return true;
    }
    let state = dashboard.sales.load().await;
    if let Some(error) = state.error {
        println!("{}", error.red());
    }
    state.analytics.is_some()
}

/// The main entry point for the SalesDash REPL.
///
/// Sets up configuration and logging, starts health polling, then reads lines
/// until `quit`. Questions and health changes are reported from background
/// tasks through an mpsc channel.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ===== Configuration =====
    let config_service = match &args.config {
        Some(path) => ConfigService::with_path(path.clone()),
        None => ConfigService::new(),
    };
    let mut config = config_service.get_config();
    if let Some(url) = args.backend_url {
        config.backend_url = url;
    }
    if let Some(secs) = args.poll_interval_secs {
        config.health.poll_interval_secs = secs;
    }
    validate(&config)?;

    // ===== Logging =====
    let diagnostics = salesdash_diagnostics::init(&config.logging.filter, args.verbose)
        .context("Failed to initialize logging")?;
    let log = DiagnosticLog::default();
    let collector = log.spawn_collector(diagnostics);

    // ===== Backend =====
    let dashboard = Dashboard::from_config(config)?;
    dashboard.start();

    let (event_tx, mut event_rx) = mpsc::channel::<ReplEvent>(32);

    // Forward health status transitions.
    let mut health_rx = dashboard.health.subscribe();
    let health_tx = event_tx.clone();
    let health_watcher = tokio::spawn(async move {
        let mut last = OverallStatus::Checking;
        while health_rx.changed().await.is_ok() {
            let snapshot = health_rx.borrow_and_update().clone();
            if snapshot.overall_status == OverallStatus::Checking
                || snapshot.overall_status == last
            {
                continue;
            }
            last = snapshot.overall_status;
            if health_tx
                .send(ReplEvent::HealthChanged(snapshot))
                .await
                .is_err()
            {
                break;
            }
        }
    });

    let response_handler = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                ReplEvent::Answer(outcome) => {
                    let color = match outcome {
                        SubmitOutcome::Answered(_) => Color::BrightBlue,
                        SubmitOutcome::Failed => Color::Red,
                        _ => Color::Yellow,
                    };
                    for line in render::outcome_lines(&outcome) {
                        println!("{}", line.color(color));
                    }
                }
                ReplEvent::HealthChanged(snapshot) => print_status(&snapshot),
            }
        }
    });

    // ===== REPL Setup =====
    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== SalesDash ===".bright_magenta().bold());
    println!(
        "{}",
        format!(
            "Backend {}. Type a question, '/help' for commands, or 'quit' to exit.",
            dashboard.config().backend_url
        )
        .bright_black()
    );
    println!();

    // ===== Main REPL Loop =====
    loop {
        let line = match rl.readline(">> ") {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let command = Command::parse(&line);
        if !matches!(command, Command::Empty) {
            let _ = rl.add_history_entry(line.trim());
        }
        if !command.targets_details() {
            dashboard.health.on_outside_interaction();
        }

        match command {
            Command::Quit => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Command::Empty => {}
            Command::Ask(question) => {
                dashboard.chat.open();
                println!("{}", format!("> {}", question).green());

                let conversation = dashboard.chat.conversation().clone();
                conversation.update_draft(question);
                let tx = event_tx.clone();
                tokio::spawn(async move {
                    let outcome = conversation.submit().await;
                    let _ = tx.send(ReplEvent::Answer(outcome)).await;
                });
            }
            Command::Health => print_status(&dashboard.health.snapshot()),
            Command::Refresh => {
                let snapshot = dashboard.health.refresh_now().await?;
                print_status(&snapshot);
            }
            Command::Details => {
                dashboard.health.toggle_details();
                print_details(&dashboard);
            }
            Command::Open => {
                dashboard.chat.open();
                let state = dashboard.chat.conversation().snapshot();
                for message in &state.messages {
                    match message.role {
                        MessageRole::User => println!("{}", format!("> {}", message.text).green()),
                        MessageRole::Assistant => println!("{}", message.text.bright_blue()),
                    }
                }
            }
            Command::Close => {
                dashboard.chat.dismiss();
                println!("{}", "Chat closed.".bright_black());
            }
            Command::Expand => {
                if dashboard.health.details_state().is_open() {
                    dashboard.health.toggle_details_expanded();
                    print_details(&dashboard);
                } else if dashboard.chat.is_open() {
                    dashboard.chat.toggle_expand();
                    let message = if dashboard.chat.state().is_expanded() {
                        "Chat expanded."
                    } else {
                        "Chat collapsed."
                    };
                    println!("{}", message.bright_black());
                } else {
                    println!("{}", "Nothing open to expand.".bright_black());
                }
            }
            Command::Reps(region) => {
                if ensure_sales_loaded(&dashboard).await {
                    let reps = dashboard.sales.reps_in_region(region.as_deref());
                    if reps.is_empty() {
                        println!(
                            "{}",
                            format!("No reps. Regions: {}", dashboard.sales.regions().join(", "))
                                .bright_black()
                        );
                    }
                    for rep in &reps {
                        for line in render::rep_lines(rep) {
                            println!("{}", line);
                        }
                    }
                }
            }
            Command::Stats => {
                if ensure_sales_loaded(&dashboard).await {
                    if let Some(stats) = dashboard.sales.deal_stats() {
                        for line in render::stats_lines(&stats) {
                            println!("{}", line);
                        }
                    }
                }
            }
            Command::Reset => {
                dashboard.chat.conversation().reset();
                println!("{}", "Conversation cleared.".bright_black());
            }
            Command::Logs(limit) => {
                for event in log.recent(limit) {
                    println!(
                        "{} {:<5} {} {}",
                        event.timestamp.format("%H:%M:%S").to_string().bright_black(),
                        event.level,
                        event.target.bright_black(),
                        event.message
                    );
                }
            }
            Command::Help => print_help(),
            Command::Unknown(name) => {
                println!("{}", format!("Unknown command {}", name).bright_black());
            }
        }
    }

    // ===== Teardown =====
    dashboard.shutdown();
    health_watcher.abort();
    drop(event_tx);
    let _ = response_handler.await;
    collector.abort();

    Ok(())
}
