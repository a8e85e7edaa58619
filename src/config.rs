use serde::Deserialize;

fn default_api_root() -> String {
    "https://api.github.com".to_string()
}

fn default_port() -> u16 {
    5000
}

#[derive(Debug, Deserialize)]
pub struct HublotConfig {
    /// Numeric identifier of the GitHub App the bot authenticates as
    pub github_app_id: u64,
    /// Path to the App's PEM-encoded private key. A leading `~` is expanded.
    pub github_key_file: String,
    /// Root URL of the GitHub REST API. Only needs to be set for GitHub
    /// Enterprise deployments.
    #[serde(default = "default_api_root")]
    pub github_api_root: String,
    /// Port the webhook server listens on
    #[serde(default = "default_port")]
    pub port: u16,
}
