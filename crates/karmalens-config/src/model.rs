//! Settings structs shared across the workspace.

/// Default base URL for the memory store API.
pub const DEFAULT_MEMORY_BASE_URL: &str = "https://api.mem0.ai";
/// Default base URL for the chat completions API.
pub const DEFAULT_RUNNER_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model identifier for analysis runs.
pub const DEFAULT_MODEL: &str = "gpt-5-mini";
/// Default cap on assistant/tool round trips per run.
pub const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

/// Sampling parameters the default model family rejects; they are stripped
/// from every chat request before it is sent.
pub(crate) fn default_drop_params() -> Vec<String> {
    vec!["stop".to_string(), "temperature".to_string()]
}

/// Launch command for the Reddit MCP server.
pub(crate) fn default_server_command() -> Vec<String> {
    vec![
        "uvx".to_string(),
        "--from".to_string(),
        "git+https://github.com/kBrutal/Reddit-MCP.git".to_string(),
        "mcp-reddit".to_string(),
    ]
}

/// Fully resolved configuration for one process.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Memory store connection settings.
    pub memory: MemorySettings,
    /// Chat completions connection settings.
    pub runner: RunnerSettings,
    /// Reddit credentials and MCP server launch settings.
    pub reddit: RedditSettings,
}

/// Connection settings for the memory store API.
#[derive(Debug, Clone, PartialEq)]
pub struct MemorySettings {
    /// API key sent as the `Token` authorization credential.
    pub api_key: String,
    /// Base URL of the memory store service.
    pub base_url: String,
}

/// Connection settings for the chat completions API.
#[derive(Debug, Clone, PartialEq)]
pub struct RunnerSettings {
    /// API key sent as the bearer credential.
    pub api_key: String,
    /// Base URL of the chat completions service.
    pub base_url: String,
    /// Model identifier requested for every run.
    pub model: String,
    /// Request body keys removed before sending.
    pub drop_params: Vec<String>,
    /// Cap on assistant/tool round trips per run.
    pub max_tool_rounds: usize,
}

/// Reddit OAuth credentials plus the MCP server launch command.
///
/// The credentials are injected into the tool server's environment, never
/// passed on its command line.
#[derive(Debug, Clone, PartialEq)]
pub struct RedditSettings {
    /// OAuth application id.
    pub client_id: String,
    /// OAuth application secret.
    pub client_secret: String,
    /// Account under analysis; also seeds the memory scope.
    pub username: String,
    /// OAuth refresh token.
    pub refresh_token: String,
    /// User agent string required by the Reddit API.
    pub user_agent: String,
    /// Command plus arguments that launch the MCP server.
    pub server_command: Vec<String>,
}
