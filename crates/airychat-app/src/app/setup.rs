use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use airychat_chat::{CompletionGateway, Locale, SessionController};
use airychat_llm_api::{parse_model_spec, BackendType, ClientFactory, ClientOptions};

use crate::cli::Cli;
use crate::view::ViewOptions;

/// Shown once at startup when no API key could be resolved
pub const MISSING_KEY_WARNING: &str =
    "No API key found (set AIRY_AI_TOKEN or pass --api-key); every reply will be the error message.";

/// Application configuration derived from CLI arguments and environment
pub struct AppConfig {
    pub controller: Arc<SessionController>,
    pub locale: Locale,
    pub view_options: ViewOptions,
    pub work_dir: PathBuf,
    pub backend: BackendType,
    pub model: String,
    pub api_url: Option<String>,
    pub has_api_key: bool,
    pub log_conversation: bool,
}

/// Provider settings after merging `--model`, `--backend` and `--api-url`
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub backend: BackendType,
    pub model: String,
    pub api_url: Option<String>,
}

/// Precedence: values embedded in `--model` > `--backend` / `--api-url` > Groq defaults
pub fn resolve_provider(cli: &Cli) -> Result<ProviderSettings> {
    let (model, spec_backend, spec_url) = parse_model_spec(&cli.model);
    if model.trim().is_empty() {
        bail!("model name is empty in '{}'", cli.model);
    }

    let flag_backend = match cli.backend.as_deref() {
        Some(name) => match BackendType::from_str(name) {
            Some(backend) => Some(backend),
            None => bail!("unknown backend '{}' (expected groq or openai)", name),
        },
        None => None,
    };

    Ok(ProviderSettings {
        backend: spec_backend.or(flag_backend).unwrap_or(BackendType::Groq),
        model,
        api_url: spec_url.or_else(|| cli.api_url.clone()),
    })
}

pub fn resolve_locale(cli: &Cli) -> Result<Locale> {
    Locale::from_str(&cli.lang)
        .with_context(|| format!("unsupported language '{}' (expected en or id)", cli.lang))
}

/// Set up application configuration from CLI arguments
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let locale = resolve_locale(cli)?;
    let provider = resolve_provider(cli)?;
    let api_key = ClientFactory::resolve_api_key(provider.backend, cli.api_key.clone());
    let has_api_key = api_key.is_some();

    let options = ClientOptions {
        temperature: cli.temperature,
        max_tokens: cli.max_tokens,
        verbose: cli.verbose,
        log_to_file: cli.log_requests,
    };

    let client = ClientFactory::create(
        provider.backend,
        api_key,
        provider.model.clone(),
        provider.api_url.clone(),
        options,
    );
    let controller = Arc::new(SessionController::new(CompletionGateway::new(client, locale)));

    let view_options = ViewOptions {
        highlight_lang: cli.highlight_lang.clone(),
        theme: cli.theme.clone(),
        color: !cli.no_color,
        width: None,
    };

    let work_dir = env::current_dir().context("Failed to determine working directory")?;

    Ok(AppConfig {
        controller,
        locale,
        view_options,
        work_dir,
        backend: provider.backend,
        model: provider.model,
        api_url: provider.api_url,
        has_api_key,
        log_conversation: cli.log_conversation,
    })
}
