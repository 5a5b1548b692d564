use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Origins allowed to call the HTTP API from a browser.
    pub cors_origins: Vec<String>,
    pub store_base_url: String,
    pub store_country: String,
    pub store_lang: String,
    pub store_timeout_secs: u64,
    /// Reviews requested from the store per report.
    pub review_count: usize,
    pub suggestion_limit: usize,
    pub ollama_url: String,
    pub llm_model: String,
    /// Upper bound on a single review's scoring call.
    pub llm_timeout_secs: u64,
    /// Maximum scoring calls in flight for one report.
    pub max_concurrent_scores: usize,
    pub user_agent: String,
}
