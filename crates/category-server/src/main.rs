use std::path::PathBuf;

use category_core::{config::DEFAULT_MAX_DEPTH, BuildLimits};
use category_server::config::{DEFAULT_DB_PATH, DEFAULT_PORT, DEFAULT_WORKER_COUNT};
use category_server::{logging::init_logging, server, ServerConfig};
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "category-server")]
#[command(about = "Category tree HTTP API")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// HTTP worker count
    #[arg(long, env = "WORKERS", default_value_t = DEFAULT_WORKER_COUNT)]
    workers: usize,

    /// SQLite database file
    #[arg(long, env = "CATEGORIES_DB", default_value = DEFAULT_DB_PATH)]
    db: PathBuf,

    /// Deepest nesting accepted in a create request
    #[arg(long, env = "CATEGORY_MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,
}

impl Cli {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            host: self.host,
            port: self.port,
            workers: self.workers.max(1),
            db_path: self.db,
            limits: BuildLimits {
                max_depth: self.max_depth.max(1),
            },
        }
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.debug);
    let config = cli.into_config();

    tracing::info!("Server configuration:");
    tracing::info!("  Bind: {}", config.bind_address());
    tracing::info!("  Database: {}", config.db_path.display());
    tracing::info!("  Max depth: {}", config.limits.max_depth);

    server::run(config).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_flow_into_server_config() {
        let cli = Cli::parse_from([
            "category-server",
            "--port",
            "9090",
            "--workers",
            "0",
            "--db",
            "/tmp/cats.db",
            "--max-depth",
            "5",
        ]);

        let config = cli.into_config();
        assert_eq!(config.port, 9090);
        assert_eq!(config.workers, 1);
        assert_eq!(config.db_path, PathBuf::from("/tmp/cats.db"));
        assert_eq!(config.limits.max_depth, 5);
    }
}
