use std::{fmt::Write as _, path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    config::{load_settings, validate_api_url, validate_request_timeout},
    plain_text,
    view::{
        excerpt_preview, ResultView, StatusLine, ANSWER_HEADING, DISCLAIMER, SOURCES_HEADING,
    },
    ClientSettings, HttpQueryBackend, QueryBackend, QuerySession, SessionState,
};
use shared::domain::QueryResult;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

const EXCERPT_PREVIEW_CHARS: usize = 280;

#[derive(Parser, Debug)]
#[command(name = "paklex", about = "Ask the PakLex legal RAG service about a legal scenario")]
struct Args {
    /// Backend base URL; overrides config file and environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Settings file (defaults to ./paklex.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    /// Used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one scenario and print the analysis.
    Ask {
        /// Print the answer as HTML instead of plain text.
        #[arg(long)]
        html: bool,
        #[arg(required = true)]
        question: Vec<String>,
    },
    /// Interactive session. Type a scenario; an empty line submits it.
    Repl {
        #[arg(long)]
        html: bool,
    },
    /// Print the backend's collection statistics as JSON.
    Stats,
    /// Check that the backend is up.
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let settings = resolve_settings(&args)?;
    info!(api_url = %settings.api_url, timeout_secs = settings.request_timeout_secs, "using legal RAG backend");
    let backend: Arc<dyn QueryBackend> = Arc::new(HttpQueryBackend::from_settings(&settings)?);

    match args.command {
        Command::Ask { html, question } => ask(backend, &question.join(" "), html).await,
        Command::Repl { html } => repl(backend, html).await,
        Command::Stats => {
            let stats = backend
                .collection_stats()
                .await
                .context("failed to fetch collection stats")?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
            Ok(())
        }
        Command::Health => {
            let health = backend.health().await.context("health check failed")?;
            println!("{}: {}", health.service, health.status);
            if !health.is_healthy() {
                bail!("backend reported status '{}'", health.status);
            }
            Ok(())
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_settings(args: &Args) -> Result<ClientSettings> {
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = &args.api_url {
        settings.api_url = validate_api_url(api_url)?;
    }
    if let Some(timeout_secs) = args.timeout_secs {
        settings.request_timeout_secs = validate_request_timeout(timeout_secs)?;
    }
    Ok(settings)
}

async fn ask(backend: Arc<dyn QueryBackend>, question: &str, html: bool) -> Result<()> {
    let mut session = QuerySession::new(backend);
    session.update_draft(question);
    let Some(pending) = session.submit() else {
        bail!("question must not be empty");
    };
    print_status(session.state());
    session.apply(pending.await);

    match session.state() {
        SessionState::Succeeded { result } => {
            print!("{}", render_result(result, html));
            Ok(())
        }
        SessionState::Failed { message, .. } => bail!("{message}"),
        state => bail!("query did not resolve: {state:?}"),
    }
}

async fn repl(backend: Arc<dyn QueryBackend>, html: bool) -> Result<()> {
    let mut session = QuerySession::new(backend);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buffer = String::new();

    eprintln!("Describe your legal scenario. Submit with an empty line; :reset clears, :quit exits.");
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":quit" | ":q" => break,
            ":reset" => {
                session.reset();
                buffer.clear();
            }
            "" => {
                let Some(pending) = session.submit() else {
                    continue;
                };
                print_status(session.state());
                session.apply(pending.await);
                match session.state() {
                    SessionState::Succeeded { result } => {
                        print!("{}", render_result(result, html));
                        buffer.clear();
                    }
                    SessionState::Failed { .. } => {
                        print_status(session.state());
                        eprintln!("Press Enter to retry, or keep typing to edit the scenario.");
                    }
                    SessionState::Idle { .. } | SessionState::Submitting { .. } => {}
                }
            }
            _ => {
                if !buffer.is_empty() {
                    buffer.push('\n');
                }
                buffer.push_str(&line);
                session.update_draft(buffer.as_str());
            }
        }
    }

    session.reset();
    Ok(())
}

fn print_status(state: &SessionState) {
    if let Some(status) = StatusLine::from_state(state) {
        match &status {
            StatusLine::Submitting => eprintln!("{}", status.text()),
            StatusLine::Error(_) => eprintln!("error: {}", status.text()),
        }
    }
}

fn render_result(result: &QueryResult, html: bool) -> String {
    let view = ResultView::from_result(result);
    let mut out = String::new();

    if let Some(summary) = &view.sources_summary {
        let _ = writeln!(out, "{summary}");
        for tag in &view.citation_tags {
            let _ = writeln!(out, "  [{tag}]");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "{ANSWER_HEADING}");
    let _ = writeln!(out, "{}", "=".repeat(ANSWER_HEADING.chars().count()));
    if html {
        let _ = writeln!(out, "{}", view.answer);
    } else {
        let _ = writeln!(out, "{}", plain_text(&result.answer));
    }

    if !view.citations.is_empty() {
        let _ = writeln!(out, "\n{SOURCES_HEADING}");
        for citation in &view.citations {
            let _ = writeln!(out, "- {} ({})", citation.law_name, citation.detail);
            let excerpt = excerpt_preview(&citation.excerpt, EXCERPT_PREVIEW_CHARS);
            if !excerpt.is_empty() {
                let _ = writeln!(out, "    {excerpt}");
            }
        }
    }

    let _ = writeln!(out, "\n{DISCLAIMER}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::SourceCitation;

    fn eviction_result() -> QueryResult {
        QueryResult {
            answer: "## Remedies\nSee **Section 498**.".to_string(),
            sources: vec![SourceCitation {
                law_name: "Rent Restriction Ordinance".to_string(),
                law_number: "XVII of 2001".to_string(),
                section: "15".to_string(),
                year: "2001".to_string(),
                excerpt: "No landlord shall evict a tenant except by order of the Controller."
                    .to_string(),
            }],
            total_sources: 1,
        }
    }

    #[test]
    fn plain_rendering_lists_tags_answer_sources_and_disclaimer() {
        let out = render_result(&eviction_result(), false);

        assert!(out.starts_with("1 relevant law retrieved\n  [XVII of 2001 § 15 • 2001]\n"));
        assert!(out.contains("Remedies\n--------\nSee Section 498."));
        assert!(out.contains("- Rent Restriction Ordinance (XVII of 2001 | Section 15 | 2001)"));
        assert!(out.contains("    No landlord shall evict"));
        assert!(out.trim_end().ends_with(DISCLAIMER));
    }

    #[test]
    fn html_rendering_uses_formatted_markup() {
        let out = render_result(&eviction_result(), true);
        assert!(out.contains("<p><h2>Remedies</h2><br/>See <strong>Section 498</strong>.</p>"));
    }

    #[test]
    fn rendering_without_sources_skips_source_sections() {
        let result = QueryResult {
            answer: "No matching law found.".to_string(),
            sources: Vec::new(),
            total_sources: 0,
        };
        let out = render_result(&result, false);
        assert!(out.starts_with(ANSWER_HEADING));
        assert!(!out.contains(SOURCES_HEADING));
    }

    #[test]
    fn ask_parses_multi_word_question() {
        let args = Args::parse_from([
            "paklex",
            "--api-url",
            "http://localhost:9000",
            "ask",
            "tenant",
            "eviction",
            "Lahore",
        ]);
        assert_eq!(args.api_url.as_deref(), Some("http://localhost:9000"));
        match args.command {
            Command::Ask { html, question } => {
                assert!(!html);
                assert_eq!(question.join(" "), "tenant eviction Lahore");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_flags_override_loaded_settings() {
        let args = Args::parse_from([
            "paklex",
            "--api-url",
            "https://paklex.example/",
            "--timeout-secs",
            "9",
            "health",
        ]);
        let settings = resolve_settings(&args).expect("settings");
        assert_eq!(settings.api_url, "https://paklex.example");
        assert_eq!(settings.request_timeout_secs, 9);
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        let args = Args::parse_from(["paklex", "--timeout-secs", "0", "health"]);
        assert!(resolve_settings(&args).is_err());
    }
}
