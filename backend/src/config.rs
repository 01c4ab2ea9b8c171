use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

/// How captured webhook payload files are named inside their source directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFileNaming {
    /// `YYYYMMDD_HHMMSS`; events for one source within the same second overwrite each other.
    #[default]
    Second,
    /// Second-resolution stamp plus microseconds and a random suffix.
    Unique,
}

impl FromStr for PayloadFileNaming {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "second" => Ok(PayloadFileNaming::Second),
            "unique" => Ok(PayloadFileNaming::Unique),
            other => Err(anyhow!("Invalid PAYLOAD_FILE_NAMING value: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub database_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub openai_model: String,
    pub openai_max_tokens: u32,
    pub openai_timeout_seconds: u64,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub payload_file_naming: PayloadFileNaming,
    pub stripe_webhook_secret: Option<String>,
    pub stripe_signature_tolerance_seconds: i64,
    pub cors_allow_origins: Vec<String>,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let bind_addr_raw = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_addr: SocketAddr = bind_addr_raw
            .parse()
            .map_err(|_| anyhow!("Invalid BIND_ADDR value: {}", bind_addr_raw))?;

        let database_url = non_empty_var("DATABASE_URL");
        let openai_api_key = non_empty_var("OPENAI_API_KEY");

        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();

        let openai_model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4".to_string());

        let openai_max_tokens = env::var("OPENAI_MAX_TOKENS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .unwrap_or(300);

        let openai_timeout_seconds = env::var("OPENAI_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
        let log_dir = PathBuf::from(env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()));

        let payload_file_naming = match env::var("PAYLOAD_FILE_NAMING") {
            Ok(value) => value.parse()?,
            Err(_) => PayloadFileNaming::default(),
        };

        let stripe_webhook_secret = non_empty_var("STRIPE_WEBHOOK_SECRET");

        let stripe_signature_tolerance_seconds = env::var("STRIPE_SIGNATURE_TOLERANCE_SECONDS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .unwrap_or(300);

        let cors_allow_origins = parse_origins(
            &env::var("CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".to_string()),
        );

        Ok(Config {
            bind_addr,
            database_url,
            openai_api_key,
            openai_base_url,
            openai_model,
            openai_max_tokens,
            openai_timeout_seconds,
            data_dir,
            log_dir,
            payload_file_naming,
            stripe_webhook_secret,
            stripe_signature_tolerance_seconds,
            cors_allow_origins,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
