use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use vigil_application::{GameSession, TurnOutcome};
use vigil_core::config::ApiConfig;
use vigil_core::session::SessionStatus;
use vigil_core::transport::GenerationTransport;
use vigil_core::VigilError;
use vigil_infrastructure::{ConfigStore, LoreStore};
use vigil_interaction::{GeminiTransport, RelayTransport, DEFAULT_MODEL};

#[derive(Parser)]
#[command(name = "vigil")]
#[command(about = "Vigil - watch over a hero in a world you can barely touch", long_about = None)]
struct Cli {
    /// API key for the generation backend. Falls back to the saved config.
    #[arg(long)]
    key: Option<String>,

    /// Route requests through the forwarding relay instead of calling
    /// the provider directly.
    #[arg(long)]
    proxy: bool,

    /// Relay endpoint override (implies --proxy semantics only when the
    /// config selects the relay).
    #[arg(long)]
    relay_url: Option<String>,

    /// Model identifier.
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/observe".to_string(),
                "/restart".to_string(),
                "/status".to_string(),
                "/energy".to_string(),
                "/lore".to_string(),
                "/help".to_string(),
                "/quit".to_string(),
            ],
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

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
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

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_store = Arc::new(ConfigStore::new()?);
    let config = resolve_config(&cli, &config_store)?;

    let mut session = GameSession::new(config_store).with_model(cli.model.clone());
    if let Some(relay_url) = cli.relay_url.clone() {
        session = session.with_transport_factory(Box::new(move |config: &ApiConfig| {
            if config.use_proxy {
                Arc::new(RelayTransport::new(config.api_key.clone()).with_endpoint(relay_url.clone()))
                    as Arc<dyn GenerationTransport>
            } else {
                Arc::new(GeminiTransport::new(config.api_key.clone()))
            }
        }));
    }

    let lore = LoreStore::new();

    println!("{}", "=== VIGIL ===".bright_magenta().bold());
    println!("{}", "Scanning realities for a biosignal...".bright_black());

    let saved_config = config.clone();
    let hero = match session.start(config).await {
        Ok(hero) => hero,
        Err(err) => {
            return Err(anyhow!(
                "hero generation failed: {err}. Check the API key or relay settings."
            ));
        }
    };

    println!();
    println!("{} {}", "Signal found:".bright_green(), hero.name.bold());
    println!("  {} {}", "Archetype:".bright_black(), hero.archetype);
    println!("  {} {}", "Origin:".bright_black(), hero.origin);
    println!("  {} {}", "Region:".bright_black(), hero.theme);
    println!("  {} {}", "Coordinates:".bright_black(), hero.start_coordinates);
    println!();
    println!("{}", hero.location_description.italic());
    println!();
    println!("{}", "Press Enter to bind to the vessel.".bright_black());

    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    // Any input confirms the preview.
    let _ = rl.readline("");
    render_outcome(session.confirm_location().await?);

    println!(
        "{}",
        "Speak to direct the hero (costs energy). '/observe' to wait, '/help' for commands."
            .bright_black()
    );

    loop {
        let energy = session.energy().await;
        let prompt = format!("[{energy:>3}] > ");

        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(rustyline::error::ReadlineError::Interrupted)
            | Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "The vigil ends.".bright_green());
                break;
            }
            Err(err) => return Err(err.into()),
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(trimmed);

        match trimmed {
            "/quit" | "/exit" => {
                println!("{}", "The vigil ends.".bright_green());
                break;
            }
            "/help" => print_help(),
            "/status" => print_status(&session).await,
            "/energy" => {
                println!(
                    "{} {} / 100",
                    "Energy:".bright_black(),
                    session.energy().await
                );
            }
            "/observe" => match session.observe().await {
                Ok(outcome) => render_outcome(outcome),
                Err(err) => render_rejection(err),
            },
            "/restart" => {
                println!("{}", "Scanning realities for a new biosignal...".bright_black());
                // A failed search drops the session back to the menu; a
                // later /restart re-enters through start with the saved
                // config instead.
                let searching = if session.status().await == SessionStatus::Menu {
                    session.start(saved_config.clone()).await
                } else {
                    session.restart().await
                };
                match searching {
                    Ok(hero) => {
                        println!("{} {}", "Signal found:".bright_green(), hero.name.bold());
                        println!("{}", hero.location_description.italic());
                        render_outcome(session.confirm_location().await?);
                    }
                    Err(err) => render_rejection(err),
                }
            }
            _ if trimmed.starts_with("/lore") => {
                print_lore(&lore, trimmed.strip_prefix("/lore").unwrap_or("").trim());
            }
            _ if trimmed.starts_with('/') => {
                println!("{}", "Unknown command".bright_black());
            }
            directive => match session.direct(directive).await {
                Ok(outcome) => render_outcome(outcome),
                Err(err) => render_rejection(err),
            },
        }

        if session.status().await == SessionStatus::HeroDead {
            println!();
            println!("{}", "THE VESSEL IS LOST.".red().bold());
            println!("{}", "'/restart' to search for another, '/quit' to end the vigil.".bright_black());
        }
    }

    Ok(())
}

/// Picks the config: explicit flags win, otherwise the saved slot.
fn resolve_config(cli: &Cli, store: &ConfigStore) -> Result<ApiConfig> {
    if let Some(key) = &cli.key {
        return Ok(ApiConfig::new(key.clone(), cli.proxy));
    }
    match store.load()? {
        Some(saved) => Ok(saved),
        None => Err(anyhow!(
            "no API key: pass --key once, it will be saved for the next run"
        )),
    }
}

fn render_outcome(outcome: TurnOutcome) {
    match outcome {
        TurnOutcome::Narrated {
            diary_entry,
            status_description,
            ..
        } => {
            println!();
            for line in diary_entry.lines() {
                println!("{}", line.bright_blue());
            }
            if !status_description.is_empty() {
                println!("{}", format!("[{}]", status_description).bright_yellow());
            }
            println!();
        }
        TurnOutcome::Disrupted => {
            println!("{}", "Interference floods the channel...".red());
        }
    }
}

fn render_rejection(err: VigilError) {
    if err.is_rejected() {
        println!("{}", err.to_string().bright_black());
    } else {
        println!("{}", err.to_string().red());
    }
}

async fn print_status(session: &GameSession) {
    match session.hero().await {
        Some(hero) => {
            println!("{} {}", "Vessel:".bright_black(), hero.name.bold());
            println!("{} {}", "Region:".bright_black(), hero.theme);
            let status = session.last_status().await;
            if !status.is_empty() {
                println!("{} {}", "Condition:".bright_black(), status);
            }
            println!("{} {}", "Energy:".bright_black(), session.energy().await);
        }
        None => println!("{}", "No vessel bound.".bright_black()),
    }
}

fn print_lore(lore: &LoreStore, id: &str) {
    if id.is_empty() {
        println!("{}", "The Codex:".bright_magenta());
        for entry in lore.entries() {
            println!(
                "  {} {} {}",
                entry.id.bright_cyan(),
                format!("[{}]", entry.category.as_str()).bright_black(),
                entry.title
            );
        }
        println!("{}", "'/lore <id>' to read an entry.".bright_black());
        return;
    }

    match lore.get(id) {
        Some(entry) => {
            println!("{}", entry.title.bold());
            println!("{}", entry.content.italic());
        }
        None => println!("{}", "No such codex entry.".bright_black()),
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_magenta());
    println!("  {}  wait and watch; restores energy", "/observe".bright_cyan());
    println!("  {}  abandon this vessel, search for another", "/restart".bright_cyan());
    println!("  {}   the vessel's condition and your energy", "/status".bright_cyan());
    println!("  {}   your current energy level", "/energy".bright_cyan());
    println!("  {}     the codex ('/lore <id>' for one entry)", "/lore".bright_cyan());
    println!("  {}     end the vigil", "/quit".bright_cyan());
    println!("  {}", "Anything else is spoken to the hero, at a cost.".bright_black());
}
