//! Server configuration.
//!
//! The binary fills this from CLI flags with environment fallbacks; see `main.rs`.

use std::path::PathBuf;

use category_core::BuildLimits;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WORKER_COUNT: usize = 4;
pub const DEFAULT_DB_PATH: &str = "categories.db";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
    pub db_path: PathBuf,
    pub limits: BuildLimits,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address_joins_host_and_port() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            workers: DEFAULT_WORKER_COUNT,
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            limits: BuildLimits::default(),
        };
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
