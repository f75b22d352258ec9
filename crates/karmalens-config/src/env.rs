//! Environment-variable loading for [`Settings`].

use std::collections::HashMap;

use log::debug;

use crate::error::ConfigError;
use crate::model::{
    DEFAULT_MAX_TOOL_ROUNDS, DEFAULT_MEMORY_BASE_URL, DEFAULT_MODEL, DEFAULT_RUNNER_BASE_URL,
    MemorySettings, RedditSettings, RunnerSettings, Settings, default_drop_params,
    default_server_command,
};

impl Settings {
    /// Load settings from the process environment.
    ///
    /// Fails before any network client exists when a required variable is
    /// absent, so credential problems surface ahead of external calls.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build settings from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let memory = MemorySettings {
            api_key: required(vars, "MEM0_API_KEY")?,
            base_url: optional(vars, "MEM0_BASE_URL")
                .unwrap_or_else(|| DEFAULT_MEMORY_BASE_URL.to_string()),
        };

        let runner = RunnerSettings {
            api_key: required(vars, "OPENAI_API_KEY")?,
            base_url: optional(vars, "OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_RUNNER_BASE_URL.to_string()),
            model: optional(vars, "OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            drop_params: default_drop_params(),
            max_tool_rounds: max_tool_rounds(vars)?,
        };

        let reddit = RedditSettings {
            client_id: required(vars, "REDDIT_CLIENT_ID")?,
            client_secret: required(vars, "REDDIT_CLIENT_SECRET")?,
            username: required(vars, "REDDIT_USERNAME")?,
            refresh_token: required(vars, "REDDIT_REFRESH_TOKEN")?,
            user_agent: required(vars, "REDDIT_USER_AGENT")?,
            server_command: server_command(vars)?,
        };

        debug!(
            "loaded settings (model={}, username={}, memory_url={})",
            runner.model, reddit.username, memory.base_url
        );

        Ok(Settings {
            memory,
            runner,
            reddit,
        })
    }
}

fn required(vars: &HashMap<String, String>, name: &str) -> Result<String, ConfigError> {
    optional(vars, name).ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

/// Blank values are treated the same as unset ones.
fn optional(vars: &HashMap<String, String>, name: &str) -> Option<String> {
    vars.get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn max_tool_rounds(vars: &HashMap<String, String>) -> Result<usize, ConfigError> {
    let Some(raw) = optional(vars, "KARMALENS_MAX_TOOL_ROUNDS") else {
        return Ok(DEFAULT_MAX_TOOL_ROUNDS);
    };
    raw.parse::<usize>()
        .map_err(|err| ConfigError::InvalidVar {
            name: "KARMALENS_MAX_TOOL_ROUNDS".to_string(),
            message: err.to_string(),
        })
        .and_then(|rounds| {
            if rounds == 0 {
                Err(ConfigError::InvalidVar {
                    name: "KARMALENS_MAX_TOOL_ROUNDS".to_string(),
                    message: "must be at least 1".to_string(),
                })
            } else {
                Ok(rounds)
            }
        })
}

fn server_command(vars: &HashMap<String, String>) -> Result<Vec<String>, ConfigError> {
    let Some(raw) = optional(vars, "REDDIT_MCP_COMMAND") else {
        return Ok(default_server_command());
    };
    let command = shell_words::split(&raw).map_err(|err| ConfigError::InvalidVar {
        name: "REDDIT_MCP_COMMAND".to_string(),
        message: err.to_string(),
    })?;
    if command.is_empty() {
        return Err(ConfigError::InvalidVar {
            name: "REDDIT_MCP_COMMAND".to_string(),
            message: "command is empty".to_string(),
        });
    }
    Ok(command)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;

    use crate::error::ConfigError;
    use crate::model::Settings;

    fn base_vars() -> HashMap<String, String> {
        [
            ("MEM0_API_KEY", "mem0-key"),
            ("OPENAI_API_KEY", "openai-key"),
            ("REDDIT_CLIENT_ID", "client-id"),
            ("REDDIT_CLIENT_SECRET", "client-secret"),
            ("REDDIT_USERNAME", "spez"),
            ("REDDIT_REFRESH_TOKEN", "refresh-token"),
            ("REDDIT_USER_AGENT", "karmalens/0.1 by spez"),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
    }

    #[test]
    fn loads_required_vars_and_defaults() {
        let settings = Settings::from_vars(&base_vars()).expect("settings");

        assert_eq!(settings.memory.api_key, "mem0-key");
        assert_eq!(settings.memory.base_url, "https://api.mem0.ai");
        assert_eq!(settings.runner.model, "gpt-5-mini");
        assert_eq!(settings.runner.base_url, "https://api.openai.com/v1");
        assert_eq!(
            settings.runner.drop_params,
            vec!["stop".to_string(), "temperature".to_string()]
        );
        assert_eq!(settings.runner.max_tool_rounds, 8);
        assert_eq!(settings.reddit.username, "spez");
        assert_eq!(settings.reddit.server_command[0], "uvx");
        assert_eq!(settings.reddit.server_command.last().map(String::as_str), Some("mcp-reddit"));
    }

    #[test]
    fn missing_required_var_is_reported_by_name() {
        let mut vars = base_vars();
        vars.remove("MEM0_API_KEY");

        let err = Settings::from_vars(&vars).expect_err("missing key");
        match err {
            ConfigError::MissingVar(name) => assert_eq!(name, "MEM0_API_KEY"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn blank_required_var_counts_as_missing() {
        let mut vars = base_vars();
        vars.insert("OPENAI_API_KEY".to_string(), "   ".to_string());

        let err = Settings::from_vars(&vars).expect_err("blank key");
        match err {
            ConfigError::MissingVar(name) => assert_eq!(name, "OPENAI_API_KEY"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn optional_overrides_are_applied() {
        let mut vars = base_vars();
        vars.insert("MEM0_BASE_URL".to_string(), "http://localhost:8888".to_string());
        vars.insert("OPENAI_MODEL".to_string(), "gpt-4o-mini".to_string());
        vars.insert("KARMALENS_MAX_TOOL_ROUNDS".to_string(), "3".to_string());

        let settings = Settings::from_vars(&vars).expect("settings");
        assert_eq!(settings.memory.base_url, "http://localhost:8888");
        assert_eq!(settings.runner.model, "gpt-4o-mini");
        assert_eq!(settings.runner.max_tool_rounds, 3);
    }

    #[test]
    fn server_command_override_is_shell_split() {
        let mut vars = base_vars();
        vars.insert(
            "REDDIT_MCP_COMMAND".to_string(),
            "python3 -m reddit_mcp --stdio".to_string(),
        );

        let settings = Settings::from_vars(&vars).expect("settings");
        assert_eq!(
            settings.reddit.server_command,
            vec![
                "python3".to_string(),
                "-m".to_string(),
                "reddit_mcp".to_string(),
                "--stdio".to_string(),
            ]
        );
    }

    #[test]
    fn unbalanced_server_command_is_rejected() {
        let mut vars = base_vars();
        vars.insert("REDDIT_MCP_COMMAND".to_string(), "uvx 'mcp".to_string());

        let err = Settings::from_vars(&vars).expect_err("unbalanced quote");
        match err {
            ConfigError::InvalidVar { name, .. } => assert_eq!(name, "REDDIT_MCP_COMMAND"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_tool_rounds_is_rejected() {
        let mut vars = base_vars();
        vars.insert("KARMALENS_MAX_TOOL_ROUNDS".to_string(), "0".to_string());

        let err = Settings::from_vars(&vars).expect_err("zero rounds");
        match err {
            ConfigError::InvalidVar { name, message } => {
                assert_eq!(name, "KARMALENS_MAX_TOOL_ROUNDS");
                assert_eq!(message, "must be at least 1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
