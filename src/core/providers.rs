use crate::core::config::Config;
use std::error::Error;
use std::fmt;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const BASE_URL_ENV: &str = "GROQ_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

const QUICK_FIXES: &[&str] = &[
    "export GROQ_API_KEY=gsk_...          # Set the key for this shell",
    "echo 'GROQ_API_KEY=gsk_...' >> .env  # Or keep it in a .env file next to where you run masquerade",
];

/// Endpoint and credential for the completion service, fixed for the process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderSession {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Debug)]
pub struct CredentialError {
    message: String,
    quick_fixes: &'static [&'static str],
    exit_code: i32,
}

impl CredentialError {
    pub fn missing_api_key() -> Self {
        Self::new(
            format!(
                "❌ {API_KEY_ENV} is not set\n\nMasquerade needs an API key for the completion service.\nSet it in your environment or in a .env file:\n   export {API_KEY_ENV}=\"your-api-key-here\"\n   export {BASE_URL_ENV}=\"{DEFAULT_BASE_URL}\"  # Optional"
            ),
            QUICK_FIXES,
            2,
        )
    }

    fn new(
        message: impl Into<String>,
        quick_fixes: &'static [&'static str],
        exit_code: i32,
    ) -> Self {
        Self {
            message: message.into(),
            quick_fixes,
            exit_code,
        }
    }

    pub fn quick_fixes(&self) -> &'static [&'static str] {
        self.quick_fixes
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Prints the message and quick fixes to stderr and exits.
    pub fn report_and_exit(&self) -> ! {
        eprintln!("{}", self);
        let fixes = self.quick_fixes();
        if !fixes.is_empty() {
            eprintln!();
            eprintln!("💡 Quick fixes:");
            for fix in fixes {
                eprintln!("  • {fix}");
            }
        }
        std::process::exit(self.exit_code());
    }
}

impl fmt::Display for CredentialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CredentialError {}

/// Loads `.env` from the working directory, if there is one. Values already in
/// the environment win.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(err) if err.not_found() => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable .env file"),
    }
}

pub fn resolve_env_session(config: &Config) -> Result<ProviderSession, CredentialError> {
    resolve_session_with(config, |name| std::env::var(name).ok())
}

/// Resolves the session from `lookup` (normally the process environment).
/// The base URL comes from the environment, then the config, then the default.
pub fn resolve_session_with<F>(
    config: &Config,
    lookup: F,
) -> Result<ProviderSession, CredentialError>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = lookup(API_KEY_ENV)
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(CredentialError::missing_api_key)?;

    let base_url = lookup(BASE_URL_ENV)
        .filter(|url| !url.trim().is_empty())
        .or_else(|| config.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    Ok(ProviderSession { api_key, base_url })
}
