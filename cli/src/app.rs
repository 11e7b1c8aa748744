use anyhow::{anyhow, Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Select};
use dorkcraft_core::{ErrorKind, GenerationController, GenerationOutcome, ManualField, Session};
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;
use tracing::{debug, info};

use crate::cli::Args;
use crate::logging::log_error;
use crate::output::{
    print_generation_result, print_history, print_interactive_help, print_issues,
    print_launch_url, print_manual_query, print_session_json,
};

/// Runs `task` behind a spinner. The spinner is the busy indicator: nothing
/// else can be started until the task resolves.
async fn with_spinner<F: Future>(message: &str, task: F) -> F::Output {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));

    let output = task.await;
    spinner.finish_and_clear();
    output
}

fn report_failure(session: &Session, kind: ErrorKind) {
    let message = session.error().unwrap_or("unknown error");
    match kind {
        ErrorKind::Config => log_error(&format!("Configuration: {}", message)),
        ErrorKind::Boundary => log_error(&format!("Gemini request failed: {}", message)),
        ErrorKind::Schema => log_error(&format!("Unexpected reply from Gemini: {}", message)),
    }
}

/// Displays the current query, its result (if AI-derived) and alerts
fn show_session(controller: &GenerationController, session: &Session) {
    match session.result() {
        Some(result) => print_generation_result(result),
        None => print_manual_query(session.manual()),
    }
    print_issues(session.issues());

    match controller.launch_url(session) {
        Ok(Some(url)) => print_launch_url(&url),
        Ok(None) => {}
        Err(e) => log_error(&e.to_string()),
    }
}

async fn generate(
    controller: &GenerationController,
    session: &mut Session,
) -> GenerationOutcome {
    let outcome = with_spinner("Generating dork...", controller.generate(session)).await;
    if let GenerationOutcome::Failed(kind) = outcome {
        report_failure(session, kind);
    }
    outcome
}

async fn enhance(
    controller: &GenerationController,
    session: &mut Session,
) -> GenerationOutcome {
    let outcome = with_spinner("Enhancing objective...", controller.enhance(session)).await;
    match outcome {
        GenerationOutcome::Enhanced => {
            println!("{} {}", "Objective:".blue().bold(), session.objective());
        }
        GenerationOutcome::Failed(kind) => report_failure(session, kind),
        _ => {}
    }
    outcome
}

async fn refine(
    controller: &GenerationController,
    session: &mut Session,
) -> GenerationOutcome {
    let outcome = with_spinner("Refining dork...", controller.refine(session)).await;
    match outcome {
        GenerationOutcome::Skipped => {
            println!(
                "{}",
                "Nothing to refine: no active result with a refined objective.".yellow()
            );
        }
        GenerationOutcome::Failed(kind) => report_failure(session, kind),
        _ => {}
    }
    outcome
}

/// Composes and validates a query from the manual flags; no AI call
pub fn run_manual(
    args: &Args,
    controller: &GenerationController,
    session: &mut Session,
) -> Result<()> {
    for (field, value) in args.manual_fields() {
        session.set_manual_field(field, value);
    }

    if args.json {
        return print_session_json(session);
    }
    show_session(controller, session);
    Ok(())
}

/// Single objective: optional enhancement, one generation, N refinement rounds
pub async fn run_single_query(
    objective: String,
    args: &Args,
    controller: &GenerationController,
    session: &mut Session,
) -> Result<()> {
    info!("Running single query: {}", objective);
    session.set_objective(objective);

    if args.enhance {
        enhance(controller, session).await;
    }

    if let GenerationOutcome::Failed(_) = generate(controller, session).await {
        // Already reported; only the exit status is left to set
        return Err(anyhow!("no dork generated"));
    }

    for round in 1..=args.refine {
        debug!(round, "Refinement round");
        match refine(controller, session).await {
            GenerationOutcome::Generated => {
                println!("{} {}", "Refined objective:".blue().bold(), session.objective());
            }
            // Keep the last good result when a round fails or has nothing to refine
            _ => break,
        }
    }

    if args.json {
        return print_session_json(session);
    }
    show_session(controller, session);
    Ok(())
}

fn pick_history_entry(session: &Session) -> Result<Option<usize>> {
    if session.history().is_empty() {
        println!("{}", "History is empty.".dimmed());
        return Ok(None);
    }

    let items: Vec<String> = session
        .history()
        .entries()
        .map(|entry| format!("{}  {}", entry.result().query, entry.objective()))
        .collect();

    Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Recall generation")
        .items(&items)
        .default(0)
        .interact_opt()
        .context("Failed to read selection")
}

/// Handles one REPL line; returns false when the user asked to leave
async fn handle_line(
    line: &str,
    controller: &GenerationController,
    session: &mut Session,
) -> Result<bool> {
    let Some(command) = line.strip_prefix('/') else {
        session.set_objective(line);
        if generate(controller, session).await == GenerationOutcome::Generated {
            show_session(controller, session);
        }
        return Ok(true);
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "exit" | "q" => return Ok(false),
        "help" | "h" => print_interactive_help(),
        "enhance" => {
            if !argument.is_empty() {
                session.set_objective(argument);
            }
            enhance(controller, session).await;
        }
        "refine" => {
            if refine(controller, session).await == GenerationOutcome::Generated {
                show_session(controller, session);
            }
        }
        "history" => print_history(session.history()),
        "recall" => {
            let index = if argument.is_empty() {
                pick_history_entry(session)?
            } else {
                match argument.parse::<usize>() {
                    Ok(n) if n >= 1 => Some(n - 1),
                    _ => {
                        log_error("Usage: /recall <n>, where n starts at 1");
                        None
                    }
                }
            };
            if let Some(index) = index {
                if session.recall(index) {
                    println!("{} {}", "Objective:".blue().bold(), session.objective());
                    show_session(controller, session);
                } else {
                    log_error(&format!("No history entry {}", index + 1));
                }
            }
        }
        "manual" => {
            print_manual_query(session.manual());
            print_issues(session.issues());
        }
        "clear" => {
            session.clear_manual();
            println!("{}", "Manual fields cleared.".dimmed());
        }
        "url" => match controller.launch_url(session) {
            Ok(Some(url)) => print_launch_url(&url),
            Ok(None) => println!("{}", "No query yet.".dimmed()),
            Err(e) => log_error(&e.to_string()),
        },
        other => match other.parse::<ManualField>() {
            Ok(field) => {
                session.set_manual_field(field, argument);
                print_manual_query(session.manual());
                print_issues(session.issues());
            }
            Err(_) => log_error(&format!("Unknown command: /{} (try /help)", other)),
        },
    }

    Ok(true)
}

/// Runs an interactive session
pub async fn run_interactive(
    controller: &GenerationController,
    session: &mut Session,
) -> Result<()> {
    println!("Starting interactive dorkcraft session.");
    if !controller.has_credential() {
        println!(
            "{}",
            "No API key configured: only manual mode (/site, /inurl, ...) is available.".yellow()
        );
    }
    println!("Type an objective, /help for commands, or /quit to leave.");
    println!();

    loop {
        print!("{}: ", "Objective".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            break; // EOF
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        match handle_line(input, controller, session).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => log_error(&format!("{:#}", e)),
        }

        println!(); // Add spacing between interactions
    }

    println!("Exiting dorkcraft session.");
    Ok(())
}
