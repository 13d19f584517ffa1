use clap::Parser;

use airychat_llm_api::DEFAULT_MODEL;

/// CLI arguments for airychat
#[derive(Parser, Debug)]
#[command(name = "airychat")]
#[command(about = "Airy AI - chat with a Groq-hosted model from your terminal")]
#[command(version)]
pub struct Cli {
    /// API key for the completion provider
    #[arg(long, value_name = "KEY", env = "AIRY_AI_TOKEN", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model to use, optionally as "model@backend" or "model@backend(api_url)"
    #[arg(long, value_name = "MODEL", default_value = DEFAULT_MODEL, env = "AIRYCHAT_MODEL")]
    pub model: String,

    /// Backend type (groq, openai)
    #[arg(long, value_name = "BACKEND", env = "AIRYCHAT_BACKEND")]
    pub backend: Option<String>,

    /// Custom API URL (e.g., http://localhost:8080)
    #[arg(long, value_name = "URL", env = "AIRYCHAT_API_URL")]
    pub api_url: Option<String>,

    /// Sampling temperature sent with each request
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens per reply
    #[arg(long, value_name = "N")]
    pub max_tokens: Option<u32>,

    /// Interface language (en, id)
    #[arg(long, value_name = "LANG", default_value = "en", env = "AIRYCHAT_LANG")]
    pub lang: String,

    /// Language grammar used to highlight every assistant reply
    #[arg(long, value_name = "LANG", default_value = "rust")]
    pub highlight_lang: String,

    /// Highlighting theme (any syntect default theme)
    #[arg(long, value_name = "THEME", default_value = "base16-ocean.dark")]
    pub theme: String,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Send a single message, print the reply and exit
    #[arg(long, value_name = "TEXT")]
    pub task: Option<String>,

    /// Pretty‑print the JSON output (only useful with --task)
    #[arg(long)]
    pub pretty: bool,

    /// Write every turn to logs/airychat-<time>.jsonl in the working directory
    #[arg(long)]
    pub log_conversation: bool,

    /// Write HTTP request/response dumps to ~/.airychat/logs
    #[arg(long)]
    pub log_requests: bool,

    /// Enable verbose debug output (shows HTTP requests, responses, etc.)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
