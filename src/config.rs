use crate::llm::{LlmSettings, Provider, provider::DEFAULT_AZURE_API_VERSION};
use clap::{Parser, Subcommand};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::answer::AnswerTimeouts;
use crate::i18n::LanguageCode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE", global = true)]
    pub config: Option<String>,

    /// Emit logs as JSON
    #[arg(long, env = "LOG_JSON", global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the widget page, its static assets and `/ask`
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// Directory holding `translations/` and `knowledge/`
        #[arg(long, env = "STATIC_DIR")]
        static_dir: Option<PathBuf>,
    },
    /// Chat with a running server from the terminal
    Chat {
        /// Server base URL
        #[arg(long, default_value = "http://127.0.0.1:5003")]
        server_url: String,

        /// Language to start in (defaults to `assets.default_language`)
        #[arg(long)]
        lang: Option<LanguageCode>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Self::Serve {
            port: None,
            static_dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub assets: AssetsConfig,
    pub answer: AnswerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AssetsConfig {
    pub static_dir: PathBuf,
    pub default_language: LanguageCode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnswerConfig {
    pub answer_timeout_secs: u64,
    pub follow_up_timeout_secs: u64,
}

impl AnswerConfig {
    #[must_use]
    pub fn timeouts(&self) -> AnswerTimeouts {
        AnswerTimeouts {
            answer: Duration::from_secs(self.answer_timeout_secs),
            follow_up: Duration::from_secs(self.follow_up_timeout_secs),
        }
    }
}

/// Default config file picked up from the working directory.
const CWD_CONFIG: &str = "config.yaml";

impl AppConfig {
    pub fn load() -> Result<(Self, Cli), config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    /// Layering, lowest first: defaults, config file, `LARU_*` environment,
    /// CLI flags.
    pub fn load_from_args<I, T>(args: I) -> Result<(Self, Cli), config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 5003)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("assets.static_dir", "static")?
            .set_default("assets.default_language", "ja")?
            .set_default("answer.answer_timeout_secs", 30)?
            .set_default("answer.follow_up_timeout_secs", 20)?;

        // Explicit file must exist; the cwd fallback is optional.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path).required(true));
        } else if Path::new(CWD_CONFIG).exists() {
            builder = builder.add_source(File::with_name(CWD_CONFIG).required(false));
        }

        // E.g. LARU_SERVER__PORT=8000
        builder = builder.add_source(
            Environment::with_prefix("LARU")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        if let Some(Command::Serve { port, static_dir }) = &cli.command {
            if let Some(port) = port {
                builder = builder.set_override("server.port", i64::from(*port))?;
            }
            if let Some(dir) = static_dir {
                builder = builder.set_override("assets.static_dir", dir.display().to_string())?;
            }
        }
        if let Some(Command::Chat {
            lang: Some(lang), ..
        }) = &cli.command
        {
            builder = builder.set_override("assets.default_language", lang.as_str())?;
        }

        let cfg = builder.build()?;
        Ok((cfg.try_deserialize()?, cli))
    }
}

pub fn load_llm_settings() -> Result<LlmSettings, String> {
    let base_url = std::env::var("LLM_BASE_URL")
        .map_err(|_| "Missing required env var: LLM_BASE_URL".to_string())?;
    if base_url.trim().is_empty() {
        return Err("LLM_BASE_URL cannot be empty".to_string());
    }

    let model = std::env::var("LLM_MODEL")
        .map_err(|_| "Missing required env var: LLM_MODEL".to_string())?;
    if model.trim().is_empty() {
        return Err("LLM_MODEL cannot be empty".to_string());
    }

    // GOOGLE_API_KEY is accepted for Gemini deployments.
    let api_key = std::env::var("LLM_API_KEY")
        .or_else(|_| std::env::var("GOOGLE_API_KEY"))
        .ok()
        .filter(|s| !s.trim().is_empty());

    let mut provider = Provider::detect_from_url(&base_url);
    if let Provider::AzureOpenAI { .. } = &provider
        && let Ok(deployment_name) = std::env::var("AZURE_DEPLOYMENT_NAME")
    {
        provider = Provider::AzureOpenAI {
            deployment_name,
            api_version: std::env::var("AZURE_API_VERSION")
                .unwrap_or_else(|_| DEFAULT_AZURE_API_VERSION.to_string()),
        };
    }

    Ok(LlmSettings {
        base_url,
        api_key,
        model,
        provider,
    })
}
