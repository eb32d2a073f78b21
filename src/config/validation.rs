use crate::config::{Config, NavigationMode};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_url_scheme(config)?;
    validate_selector(&config.content_class)?;

    match &config.mode {
        NavigationMode::IndexBased { container_id } => validate_selector(container_id)?,
        NavigationMode::NextLink { next_class } => validate_selector(next_class)?,
    }

    if config.output_path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyFilename);
    }

    Ok(())
}

/// Only http and https start URLs are accepted
fn validate_url_scheme(config: &Config) -> Result<(), ConfigError> {
    match config.start_url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidUrl(format!(
            "unsupported scheme '{}' in {}",
            other, config.start_url
        ))),
    }
}

/// Validates an id or class selector value
///
/// Selector values are interpolated into attribute selectors, so anything
/// that would break out of the quoted attribute value is rejected here.
fn validate_selector(value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidSelector(
            value.to_string(),
            "cannot be empty".to_string(),
        ));
    }

    if value
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'))
    {
        return Err(ConfigError::InvalidSelector(
            value.to_string(),
            "must not contain whitespace, quotes, or backslashes".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_selector() {
        assert!(validate_selector("content").is_ok());
        assert!(validate_selector("main-content").is_ok());
        assert!(validate_selector("toc_list").is_ok());

        assert!(validate_selector("").is_err());
        assert!(validate_selector("two words").is_err());
        assert!(validate_selector("quo\"te").is_err());
        assert!(validate_selector("back\\slash").is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_scheme() {
        let config = Config::new(
            "ftp://example.com/",
            "content".to_string(),
            "out.pdf".into(),
            NavigationMode::NextLink {
                next_class: "next".to_string(),
            },
        );
        assert!(matches!(config, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_rejects_empty_selector() {
        let config = Config::new(
            "https://example.com/",
            String::new(),
            "out.pdf".into(),
            NavigationMode::NextLink {
                next_class: "next".to_string(),
            },
        );
        assert!(matches!(config, Err(ConfigError::InvalidSelector(_, _))));
    }

    #[test]
    fn test_validate_rejects_empty_filename() {
        let config = Config::new(
            "https://example.com/",
            "content".to_string(),
            "".into(),
            NavigationMode::NextLink {
                next_class: "next".to_string(),
            },
        );
        assert!(matches!(config, Err(ConfigError::EmptyFilename)));
    }
}
