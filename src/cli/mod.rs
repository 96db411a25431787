//! Command-line interface parsing and handling
//!
//! Parses arguments, builds the conversation for the chosen personality and
//! hands it to the TUI or to one of the non-interactive commands.

pub mod personality_list;
pub mod say;
pub mod settings;


use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use crate::cli::personality_list::list_personalities;
use crate::cli::say::{exit_with_usage, prompt_text, run_say};
use crate::cli::settings::{apply_set, apply_unset};
use crate::core::completion::{HostedCompletionClient, DEFAULT_MODEL};
use crate::core::config::Config;
use crate::core::conversation::ConversationController;
use crate::core::personality::PersonalityRegistry;
use crate::core::providers::{load_dotenv, resolve_env_session};
use crate::ui::chat_loop::run_chat;
use crate::ui::state::UiState;
use crate::utils::logging::{init_file_logging, init_stderr_logging};

#[derive(Parser)]
#[command(name = "masquerade")]
#[command(version)]
#[command(about = "Chat with an AI that answers in character")]
#[command(
    long_about = "Masquerade is a terminal chat interface where every reply comes from a \
personality: a pirate, a cat, a gym coach, Shakespeare, or one you define in the config file.\n\n\
Environment Variables:\n\
  GROQ_API_KEY      API key for the completion service (required, may live in .env)\n\
  GROQ_BASE_URL     Custom API base URL (optional, defaults to https://api.groq.com/openai/v1)\n\
  MASQUERADE_LOG    Log filter for --debug-log output (e.g. masquerade=trace)\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a newline\n\
  Ctrl+P            Pick a personality\n\
  PgUp/PgDn/Mouse   Scroll the conversation\n\
  Ctrl+C            Quit\n\n\
Commands:\n\
  /personality <key>  Switch personality (/p for short, no key opens the picker)\n\
  /personalities      List personalities\n\
  /help               Show key bindings"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Personality to start with (e.g. pirate, cat, gym, shakespeare)
    #[arg(short = 'P', long, global = true, value_name = "KEY")]
    pub personality: Option<String>,

    /// Model to request completions from
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write diagnostic logs to this file
    #[arg(long, global = true, value_name = "FILE")]
    pub debug_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Message to send
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// List available personalities
    Personalities,
    /// Set configuration values (default-personality, model, markdown)
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let command = args.command.unwrap_or(Commands::Chat);

    match (&command, args.debug_log.as_deref()) {
        (_, Some(path)) => init_file_logging(path)?,
        (Commands::Chat, None) => {}
        (_, None) => init_stderr_logging(),
    }
    load_dotenv();

    let mut config = Config::load()?;
    let registry = PersonalityRegistry::with_overrides(&config.personalities)?;

    match command {
        Commands::Personalities => {
            list_personalities(&registry, &config);
            Ok(())
        }
        Commands::Set { key: None, .. } => {
            config.print_all();
            Ok(())
        }
        Commands::Set {
            key: Some(key),
            value,
        } => match apply_set(&mut config, &registry, &key, &value) {
            Ok(message) => {
                config.save()?;
                println!("{message}");
                Ok(())
            }
            Err(err) => {
                err.print();
                std::process::exit(err.exit_code());
            }
        },
        Commands::Unset { key } => match apply_unset(&mut config, &key) {
            Ok(message) => {
                config.save()?;
                println!("{message}");
                Ok(())
            }
            Err(err) => {
                err.print();
                std::process::exit(err.exit_code());
            }
        },
        Commands::Say { prompt } => {
            let Some(prompt) = prompt_text(&prompt) else {
                exit_with_usage();
            };
            let chat = build_conversation(
                registry,
                &config,
                args.personality.as_deref(),
                args.model.as_deref(),
            );
            run_say(chat, prompt).await
        }
        Commands::Chat => {
            let model = resolve_model(args.model.as_deref(), &config);
            let chat = build_conversation(
                registry,
                &config,
                args.personality.as_deref(),
                Some(&model),
            );
            run_chat(chat, UiState::new(model, config.markdown_enabled())).await
        }
    }
}

/// `-m` wins, then the configured model, then the built-in default.
pub fn resolve_model(requested: Option<&str>, config: &Config) -> String {
    requested
        .filter(|model| !model.trim().is_empty())
        .or(config.model.as_deref())
        .unwrap_or(DEFAULT_MODEL)
        .to_string()
}

/// Resolves personality and credentials, exiting with a message when either
/// is unusable. Runs before any terminal setup or network call.
fn build_conversation(
    registry: PersonalityRegistry,
    config: &Config,
    requested_personality: Option<&str>,
    requested_model: Option<&str>,
) -> ConversationController<HostedCompletionClient> {
    let initial = match registry
        .resolve_initial(requested_personality, config.default_personality.as_deref())
    {
        Ok(personality) => personality.id.clone(),
        Err(err) => {
            error!(requested = %err.requested, "unknown starting personality");
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };

    let session = match resolve_env_session(config) {
        Ok(session) => session,
        Err(err) => err.report_and_exit(),
    };

    let model = resolve_model(requested_model, config);
    info!(personality = %initial, model = %model, base_url = %session.base_url, "starting session");
    let client = HostedCompletionClient::new(session, model);

    match ConversationController::new(registry, &initial, client) {
        Ok(chat) => chat,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    }
}
