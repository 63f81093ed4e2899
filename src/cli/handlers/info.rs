//! Information display handlers

use crate::cli::output::print_config;
use crate::AppConfig;
use crate::Result;

pub fn handle_config_command(config: &AppConfig, as_toml: bool) -> Result<()> {
    if as_toml {
        print!("{}", config_toml(config)?);
    } else {
        print_config(config);
    }
    Ok(())
}

/// The effective configuration as TOML, secrets masked
pub fn config_toml(config: &AppConfig) -> Result<String> {
    Ok(toml::to_string_pretty(&config.redacted())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_toml_masks_keys() {
        let mut config = AppConfig::default();
        config.llm.api_key = "sk-secret-value".to_string();

        let rendered = config_toml(&config).unwrap();
        assert!(rendered.contains("[retrieval]"));
        assert!(rendered.contains("sk-s****"));
        assert!(!rendered.contains("secret-value"));

        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.retrieval.top_k, config.retrieval.top_k);
    }
}
