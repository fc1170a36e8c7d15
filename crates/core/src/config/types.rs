use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

use crate::workflow::WorkflowConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Remote brief generation service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the generation API (e.g., "https://api.example.com")
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_base_url() -> String {
    "https://107ycsonc5.execute-api.us-west-2.amazonaws.com".to_string()
}

fn default_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("briefing/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(
            config.backend.base_url,
            "https://107ycsonc5.execute-api.us-west-2.amazonaws.com"
        );
        assert_eq!(config.backend.timeout_secs, 30);
        assert!(config.backend.user_agent.starts_with("briefing/"));
        assert!(config.workflow.verify_trigger_status);
        assert!(!config.workflow.fetch_documents_concurrently);
    }

    #[test]
    fn test_deserialize_server_section() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_backend_section() {
        let toml = r#"
[backend]
base_url = "http://localhost:4000"
timeout_secs = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.backend.base_url, "http://localhost:4000");
        assert_eq!(config.backend.timeout_secs, 5);
        assert!(config.backend.user_agent.starts_with("briefing/")); // default
    }

    #[test]
    fn test_deserialize_workflow_section() {
        let toml = r#"
[workflow]
verify_trigger_status = false
fetch_documents_concurrently = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.workflow.verify_trigger_status);
        assert!(config.workflow.fetch_documents_concurrently);
    }

    #[test]
    fn test_invalid_host_fails() {
        let toml = r#"
[server]
host = "not-an-ip"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serializes_for_api() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["server"]["port"], 8080);
        assert_eq!(json["backend"]["timeout_secs"], 30);
        assert_eq!(json["workflow"]["verify_trigger_status"], true);
    }
}
