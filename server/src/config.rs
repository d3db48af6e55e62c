//! Command-line and environment configuration.

use std::time::Duration;

use clap::Parser;

const DEFAULT_PORT: &str = "3000";

#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "Session-backed todo list manager")]
pub struct Config {
    /// Address to listen on. Defaults to 127.0.0.1 and `$PORT` (or 3000).
    #[arg(long, env = "TODO_BIND")]
    pub bind: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long, env = "TODO_LOG_JSON", default_value_t = false)]
    pub log_json: bool,

    /// Seconds a session may sit idle before it is discarded.
    #[arg(long, env = "TODO_SESSION_IDLE_SECS", default_value_t = 3600)]
    pub session_idle_secs: u64,
}

impl Config {
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn bind_addr(&self) -> String {
        match &self.bind {
            Some(addr) => addr.clone(),
            None => {
                let port = std::env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
                format!("127.0.0.1:{port}")
            }
        }
    }
}
