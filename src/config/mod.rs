use crate::utils::error::{BrightloomError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

pub const PRODUCTION_BASE_URL: &str = "https://api.eatsa.com/v1";
pub const SANDBOX_BASE_URL: &str = "http://api.sandbox.eatsa.com/v1";

/// Which Brightloom deployment to talk to. Each environment maps to a fixed
/// base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[serde(alias = "prod")]
    Production,
    Sandbox,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_BASE_URL,
            Environment::Sandbox => SANDBOX_BASE_URL,
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Production => f.write_str("production"),
            Environment::Sandbox => f.write_str("sandbox"),
        }
    }
}

impl FromStr for Environment {
    type Err = BrightloomError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "production" | "prod" => Ok(Environment::Production),
            "sandbox" => Ok(Environment::Sandbox),
            other => Err(BrightloomError::ConfigError {
                message: format!(
                    "environment needs to be one of the following: production, sandbox (got `{}`)",
                    other
                ),
            }),
        }
    }
}

/// Connection settings for a [`Client`](crate::Client), loadable from a TOML
/// file with `${VAR}` environment-variable substitution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api_key: String,
    pub environment: Environment,
    pub chunk_days: Option<u32>,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>, environment: Environment) -> Self {
        Self {
            api_key: api_key.into(),
            environment,
            chunk_days: None,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BrightloomError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| BrightloomError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("api_key", &self.api_key)?;

        if let Some(chunk_days) = self.chunk_days {
            validation::validate_positive_number("chunk_days", chunk_days, 1)?;
        }

        Ok(())
    }
}

/// Replace `${VAR_NAME}` placeholders with values from the environment.
/// Unset variables are left as-is.
fn substitute_env_vars(content: &str) -> String {
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_environment_base_urls() {
        assert_eq!(Environment::Production.base_url(), PRODUCTION_BASE_URL);
        assert_eq!(Environment::Sandbox.base_url(), SANDBOX_BASE_URL);
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
    }

    #[test]
    fn test_environment_from_str_rejects_unknown_selector() {
        let err = "staging".parse::<Environment>().unwrap_err();
        assert!(matches!(err, BrightloomError::ConfigError { .. }));
    }

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
api_key = "test-key"
environment = "sandbox"
chunk_days = 14
"#;

        let config = ClientConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.environment, Environment::Sandbox);
        assert_eq!(config.chunk_days, Some(14));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_config_rejects_unknown_environment() {
        let toml_content = r#"
api_key = "test-key"
environment = "staging"
"#;

        let err = ClientConfig::from_toml_str(toml_content).unwrap_err();
        assert!(matches!(err, BrightloomError::ConfigError { .. }));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BRIGHTLOOM_TEST_KEY", "key-from-env");

        let toml_content = r#"
api_key = "${BRIGHTLOOM_TEST_KEY}"
environment = "production"
"#;

        let config = ClientConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key, "key-from-env");

        std::env::remove_var("BRIGHTLOOM_TEST_KEY");
    }

    #[test]
    fn test_config_validation_rejects_empty_api_key() {
        let config = ClientConfig::new("", Environment::Production);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_zero_chunk_days() {
        let mut config = ClientConfig::new("key", Environment::Production);
        config.chunk_days = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
api_key = "file-key"
environment = "prod"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = ClientConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.api_key, "file-key");
        assert_eq!(config.environment, Environment::Production);
    }
}
