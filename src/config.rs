use serde::Deserialize;
use anyhow::Result;
use dotenvy::dotenv;

fn default_max_file_size() -> usize {
    // 10 MB in bytes
    10 * 1024 * 1024
}

fn default_port() -> u16 {
    3000
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: usize,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load .env file first
        dotenv().ok();

        let max_file_size = match std::env::var("MAX_FILE_SIZE") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("Failed to parse MAX_FILE_SIZE: {}", e))?,
            Err(_) => default_max_file_size(),
        };

        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| anyhow::anyhow!("Failed to parse PORT: {}", e))?,
            Err(_) => default_port(),
        };

        Ok(Config {
            max_file_size,
            port,
        })
    }
}
