//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "scopelog.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "scopelog.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".scopelog.yaml";

/// Environment variable that may carry the bucket table as JSON
pub const SCOPES_ENV_VAR: &str = "SCOPELOG_SCOPES";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".scopelog.toml",
    ]
}

/// Default configuration template
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Scopelog Configuration
#
# Buckets are rendered in the order they are declared. The first bucket is the
# default bucket: unscoped commits, ci/infra commits and commits whose scopes
# match no bucket end up there.

buckets:
  App:
    - app
    - console
  Api:
    - api

changelog:
  file: changelog.txt

# Optional rewrite of each bullet list into prose by an OpenAI-compatible API.
# Runs only when the token environment variable is set.
narrative:
  enabled: true
  model: gpt-4o-mini
  base_url: https://api.openai.com
  token_env: OPEN_AI_TOKEN
  timeout_secs: 30
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validate_config, Config};

    #[test]
    fn test_template_parses_and_validates() {
        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(validate_config(&config).is_ok());
        let names: Vec<&str> = config.buckets.names().collect();
        assert_eq!(names, vec!["App", "Api"]);
    }
}
