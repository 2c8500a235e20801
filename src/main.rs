//! Precis CLI - webpage summarisation and Q&A
//!
//! The application logic is contained in lib.rs, and this file is responsible
//! for parsing arguments and handling top-level errors.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use dialoguer::{Input, Select};
use precis::config::{ExtractorBackend, LogConfig};
use precis::session::ANSWER_HEADING;
use precis::{
    scraper, ui, Config, GroqClient, ModelId, Orchestrator, Outcome, Session, SummaryRequest,
    SummaryStyle,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "precis")]
#[command(author, version, about = "TUI for webpage summarisation and Q&A", long_about = None)]
struct Cli {
    /// Path to a config file (defaults to precis.toml, then ~/.config/precis/precis.toml)
    #[arg(long, global = true, env = "PRECIS_CONFIG")]
    config: Option<PathBuf>,
    /// Content extractor to use
    #[arg(long, global = true, value_enum)]
    extractor: Option<ExtractorBackend>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarise a webpage by URL
    Summarise {
        /// URL to summarize
        url: String,
        /// Summary style
        #[arg(long, value_enum)]
        style: Option<SummaryStyle>,
        /// Model used for the summary and answers
        #[arg(long, value_enum)]
        model: Option<ModelId>,
        /// Show raw extracted text instead of summary
        #[arg(long)]
        raw: bool,
        /// Question to answer after the summary (repeatable)
        #[arg(long = "ask", value_name = "QUESTION")]
        questions: Vec<String>,
        /// Prompt for missing choices and follow-up questions
        #[arg(short, long)]
        interactive: bool,
    },
    /// List the available summary styles
    Styles,
    /// List the available models
    Models,
    /// Print shell completions
    Completions {
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Summarise {
            url,
            style,
            model,
            raw,
            questions,
            interactive,
        }) => {
            let config = load_config(cli.config.as_deref(), cli.extractor)?;
            init_tracing(&config.log, false)?;

            if raw {
                return print_raw(&config, &url).await;
            }

            let interactive = interactive
                && atty::is(atty::Stream::Stdin)
                && atty::is(atty::Stream::Stdout);
            let defaults = config.default_request();
            let request = SummaryRequest::new(
                match style {
                    Some(style) => style,
                    None if interactive => pick_style(defaults.style)?,
                    None => defaults.style,
                },
                match model {
                    Some(model) => model,
                    None if interactive => pick_model(defaults.model)?,
                    None => defaults.model,
                },
            );

            let orchestrator = build_orchestrator(&config)?;
            let mut session = Session::new();

            println!("Fetching: {}", url);
            let outcome = orchestrator.summarize(&mut session, &url, request).await;
            print_outcome(&outcome);
            if !outcome.is_success() {
                return Ok(ExitCode::FAILURE);
            }

            let mut failed = false;
            for question in &questions {
                println!("\n{} {}", "❓".bold(), question);
                let outcome = orchestrator.answer(&mut session, question, request.model).await;
                print_outcome(&outcome);
                failed |= !outcome.is_success();
            }

            if interactive {
                loop {
                    let question: String = Input::new()
                        .with_prompt("Ask a question (empty to finish)")
                        .allow_empty(true)
                        .interact_text()?;
                    if question.trim().is_empty() {
                        break;
                    }
                    let outcome = orchestrator.answer(&mut session, &question, request.model).await;
                    print_outcome(&outcome);
                }
            }

            Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
        Some(Commands::Styles) => {
            for style in SummaryStyle::ALL {
                println!("{:<15} {}", style.key(), style.label());
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Models) => {
            for model in ModelId::ALL {
                println!("{}", model);
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "precis", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        None => {
            // Default: Launch the TUI
            let config = load_config(cli.config.as_deref(), cli.extractor)?;
            init_tracing(&config.log, true)?;
            let orchestrator = build_orchestrator(&config)?;
            ui::run(&orchestrator, config.default_request()).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&Path>, extractor: Option<ExtractorBackend>) -> anyhow::Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(backend) = extractor {
        config.extractor.backend = backend;
    }
    Ok(config)
}

fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let extractor = scraper::build_extractor(&config.extractor)?;
    let model = GroqClient::from_config(config)?;
    Ok(Orchestrator::new(
        extractor,
        Box::new(model),
        config.extractor.prompt_cap(),
    ))
}

/// Logs go to stderr for the CLI. The TUI owns the terminal, so there they go
/// to the configured file or nowhere.
fn init_tracing(log: &LogConfig, tui: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    if !tui {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        return Ok(());
    }

    if let Some(path) = &log.file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    }
    Ok(())
}

async fn print_raw(config: &Config, url: &str) -> anyhow::Result<ExitCode> {
    println!("Fetching: {}", url);
    let extractor = scraper::build_extractor(&config.extractor)?;
    match extractor.extract(url).await {
        Ok(content) => {
            let title = content.title.as_deref().unwrap_or("No title");
            println!("\n=== {} ===\n", title);
            println!("{}", content.text);
            println!("\n--- Extracted {} characters ---", content.char_count());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            Ok(ExitCode::FAILURE)
        }
    }
}

fn pick_style(default: SummaryStyle) -> anyhow::Result<SummaryStyle> {
    let labels: Vec<&str> = SummaryStyle::ALL.iter().map(|style| style.label()).collect();
    let picked = Select::new()
        .with_prompt("Select Summary Type")
        .items(&labels)
        .default(position_of(&SummaryStyle::ALL, default))
        .interact()?;
    Ok(SummaryStyle::ALL[picked])
}

fn pick_model(default: ModelId) -> anyhow::Result<ModelId> {
    let ids: Vec<&str> = ModelId::ALL.iter().map(|model| model.as_str()).collect();
    let picked = Select::new()
        .with_prompt("Select Model Type")
        .items(&ids)
        .default(position_of(&ModelId::ALL, default))
        .interact()?;
    Ok(ModelId::ALL[picked])
}

/// Menu index of `current`, or the first entry
fn position_of<T: PartialEq>(items: &[T], current: T) -> usize {
    items.iter().position(|item| *item == current).unwrap_or(0)
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Summary { heading, text } => {
            println!("\n{}\n", heading.bold());
            println!("{}", text);
        }
        Outcome::Answer { text } => {
            println!("\n{}\n", ANSWER_HEADING.bold());
            println!("{}", text);
        }
        Outcome::Warning(message) => eprintln!("{}", format!("⚠️ {}", message).yellow()),
        Outcome::Error(message) => eprintln!("{}", message.red()),
    }
}
