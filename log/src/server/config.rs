//! Configuration for the message log HTTP server.

use clap::Parser;
use common::{RedisStorageConfig, StorageConfig};

use crate::Config;
use crate::config::{DEFAULT_CAPACITY, DEFAULT_LOG_KEY};

/// CLI arguments for the message log server.
#[derive(Debug, Parser)]
#[command(name = "message-log")]
#[command(about = "Bounded message log HTTP server")]
pub struct CliArgs {
    /// HTTP server port.
    #[arg(long, env = "PORT", default_value = "8080")]
    pub port: u16,

    /// Use in-memory storage (for testing).
    #[arg(long, default_value = "false")]
    pub in_memory: bool,

    /// Redis server host.
    #[arg(long, env = "REDIS_HOST", default_value = "localhost")]
    pub redis_host: String,

    /// Redis server port.
    #[arg(long, env = "REDIS_PORT", default_value = "6379")]
    pub redis_port: u16,

    /// Redis ACL user name.
    #[arg(long, env = "REDIS_USERNAME")]
    pub redis_username: Option<String>,

    /// Redis password.
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    pub redis_password: Option<String>,

    /// Maximum number of pooled Redis connections.
    #[arg(long, default_value = "16")]
    pub redis_pool_size: usize,

    /// Key of the list holding the log.
    #[arg(long, env = "LOG_KEY", default_value = DEFAULT_LOG_KEY)]
    pub log_key: String,

    /// Maximum number of messages retained.
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    pub capacity: u64,
}

impl CliArgs {
    /// Convert CLI args to log configuration.
    pub fn to_log_config(&self) -> Config {
        let storage = if self.in_memory {
            StorageConfig::InMemory
        } else {
            StorageConfig::Redis(RedisStorageConfig {
                host: self.redis_host.clone(),
                port: self.redis_port,
                username: self.redis_username.clone(),
                password: self.redis_password.clone(),
                pool_size: self.redis_pool_size,
            })
        };

        Config {
            storage,
            log_key: self.log_key.clone(),
            capacity: self.capacity,
        }
    }
}

/// Configuration for the message log HTTP server.
#[derive(Debug, Clone)]
pub struct MessageLogServerConfig {
    /// HTTP server port.
    pub port: u16,
}

impl Default for MessageLogServerConfig {
    fn default() -> Self {
        Self { port: 8080 }
    }
}

impl From<&CliArgs> for MessageLogServerConfig {
    fn from(args: &CliArgs) -> Self {
        Self { port: args.port }
    }
}
