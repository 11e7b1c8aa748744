use colored::*;
use dorkcraft_core::{
    compose_manual_query, GenerationResult, HistoryLedger, IssueSeverity, ManualOverride,
    RiskLevel, Session, ValidationIssue,
};

/// Colored badge for a risk level
pub fn risk_badge(risk: RiskLevel) -> ColoredString {
    let label = format!(" {} ", risk);
    match risk {
        RiskLevel::Info => label.black().on_bright_blue(),
        RiskLevel::Low => label.black().on_green(),
        RiskLevel::Medium => label.black().on_yellow(),
        RiskLevel::High => label.white().on_red(),
        RiskLevel::Critical => label.white().on_magenta().bold(),
    }
}

fn print_section(title: &str, body: &str) {
    if body.trim().is_empty() {
        return;
    }
    println!("{}", title.cyan().bold());
    println!("  {}", body.trim());
}

/// Print a generation result
pub fn print_generation_result(result: &GenerationResult) {
    println!();
    println!("{} {}", "Dork:".blue().bold(), result.query.bright_white().bold());
    println!("{} {}", "Risk:".blue().bold(), risk_badge(result.risk_level));
    println!();
    print_section("Explanation", &result.explanation);

    if !result.suggested_vectors.is_empty() {
        println!("{}", "Suggested vectors".cyan().bold());
        for vector in &result.suggested_vectors {
            println!("  {} {}", "•".yellow(), vector);
        }
    }

    print_section("Validation", &result.validation_note);
    print_section("Improvement", &result.improvement_rationale);
    print_section("Refined objective", &result.refined_objective);
}

/// Print validator findings; prints nothing when there are none
pub fn print_issues(issues: &[ValidationIssue]) {
    if issues.is_empty() {
        return;
    }
    println!();
    println!("{}", "Validation alerts".red().bold());
    for issue in issues {
        let severity = issue.severity().to_string();
        let severity = match issue.severity() {
            IssueSeverity::Critical => severity.white().on_red().bold(),
            IssueSeverity::SyntaxError => severity.red().bold(),
            IssueSeverity::SyntaxWarning => severity.yellow(),
        };
        println!("  {} {}", severity, issue.message());
    }
}

pub fn print_manual_query(fields: &ManualOverride) {
    let query = compose_manual_query(fields);
    if query.is_empty() {
        println!("{}", "No manual fields set.".dimmed());
    } else {
        println!("{} {}", "Manual query:".blue().bold(), query.bright_white());
    }
}

pub fn print_history(history: &HistoryLedger) {
    if history.is_empty() {
        println!("{}", "History is empty.".dimmed());
        return;
    }
    for (i, entry) in history.entries().enumerate() {
        println!(
            "{:>2}. {} {} {}",
            i + 1,
            entry.timestamp().format("%H:%M:%S").to_string().dimmed(),
            risk_badge(entry.result().risk_level),
            entry.objective()
        );
        println!("    {}", entry.result().query.bright_white());
    }
}

pub fn print_launch_url(url: &str) {
    println!("{} {}", "Open:".blue().bold(), url.underline());
}

/// Print the whole session as JSON
pub fn print_session_json(session: &Session) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(session)?);
    Ok(())
}

/// Show usage instructions when no objective or action is provided
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "dorkcraft \"your objective\"".green().bold());
    println!("    Generate a dork for a single objective");
    println!();
    println!("  {}", "dorkcraft -i".green().bold());
    println!("    Start an interactive session");
    println!();
    println!("  {}", "dorkcraft --site example.com --filetype pdf".green().bold());
    println!("    Compose and validate a dork by hand, without the AI");
    println!();
    println!("{}", "Options:".cyan());
    println!("  -e, --enhance        Rewrite the objective before generating");
    println!("  -r, --refine <N>     Run N refinement rounds");
    println!("      --json           Print the session as JSON");
    println!("  --help               Show this help message");
    println!();
}

pub fn print_interactive_help() {
    println!("{}", "Commands:".cyan().bold());
    println!("  <text>                  Generate a dork for a new objective");
    println!("  /enhance                Rewrite the current objective");
    println!("  /refine                 Generate again from the refined objective");
    println!("  /history                List recent generations");
    println!("  /recall [n]             Restore generation n (pick from a list without n)");
    println!("  /site|/inurl|/intitle|/filetype|/text <value>");
    println!("                          Set a manual field (drops the AI result)");
    println!("  /manual                 Show the composed manual query");
    println!("  /clear                  Clear manual fields");
    println!("  /url                    Show the search URL for the current query");
    println!("  /help                   Show this help");
    println!("  /quit                   Leave");
}
