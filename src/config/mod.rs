//! Run configuration: start URL, selectors, output path, navigation mode
//!
//! The CLI hands its raw option values to this module; everything here is
//! validated before any network activity happens.

mod validation;

use crate::{ConfigError, ConfigResult};
use std::path::PathBuf;
use url::Url;

pub use validation::validate;

/// Validated configuration for one run
#[derive(Debug, Clone)]
pub struct Config {
    /// The page traversal begins from (table of contents in index mode,
    /// first content page in next-link mode)
    pub start_url: Url,

    /// Class of the content region to extract from every visited page
    pub content_class: String,

    /// Where the finished PDF is written
    pub output_path: PathBuf,

    /// Which traversal strategy drives the run
    pub mode: NavigationMode,
}

/// The two mutually exclusive traversal strategies
///
/// Selected once from the CLI options; requesting both or neither is a
/// [`ConfigError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationMode {
    /// Visit every link found inside the element with this id on the start
    /// page, in document order
    IndexBased { container_id: String },

    /// Follow the element with this class from page to page until it
    /// disappears or points back to a visited page
    NextLink { next_class: String },
}

impl NavigationMode {
    /// Builds the navigation mode from the two optional CLI selectors.
    ///
    /// Exactly one of `index_id` / `next_page_class` must be present.
    pub fn from_options(
        index_id: Option<String>,
        next_page_class: Option<String>,
    ) -> ConfigResult<Self> {
        match (index_id, next_page_class) {
            (Some(_), Some(_)) => Err(ConfigError::BothModes),
            (None, None) => Err(ConfigError::MissingMode),
            (Some(id), None) => Ok(Self::IndexBased { container_id: id }),
            (None, Some(class)) => Ok(Self::NextLink { next_class: class }),
        }
    }
}

impl Config {
    /// Parses and validates a full configuration.
    pub fn new(
        url: &str,
        content_class: String,
        output_path: PathBuf,
        mode: NavigationMode,
    ) -> ConfigResult<Self> {
        let start_url =
            Url::parse(url).map_err(|e| ConfigError::InvalidUrl(format!("{url}: {e}")))?;

        let config = Self {
            start_url,
            content_class,
            output_path,
            mode,
        };
        validation::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_index_only() {
        let mode = NavigationMode::from_options(Some("toc".to_string()), None).unwrap();
        assert_eq!(
            mode,
            NavigationMode::IndexBased {
                container_id: "toc".to_string()
            }
        );
    }

    #[test]
    fn test_mode_next_link_only() {
        let mode = NavigationMode::from_options(None, Some("next".to_string())).unwrap();
        assert_eq!(
            mode,
            NavigationMode::NextLink {
                next_class: "next".to_string()
            }
        );
    }

    #[test]
    fn test_mode_both_is_error() {
        let result =
            NavigationMode::from_options(Some("toc".to_string()), Some("next".to_string()));
        assert!(matches!(result, Err(ConfigError::BothModes)));
    }

    #[test]
    fn test_mode_neither_is_error() {
        let result = NavigationMode::from_options(None, None);
        assert!(matches!(result, Err(ConfigError::MissingMode)));
    }

    #[test]
    fn test_config_valid() {
        let config = Config::new(
            "https://example.com/book/",
            "content".to_string(),
            PathBuf::from("book.pdf"),
            NavigationMode::NextLink {
                next_class: "next".to_string(),
            },
        );
        assert!(config.is_ok());
    }

    #[test]
    fn test_config_rejects_unparseable_url() {
        let config = Config::new(
            "not a url",
            "content".to_string(),
            PathBuf::from("book.pdf"),
            NavigationMode::NextLink {
                next_class: "next".to_string(),
            },
        );
        assert!(matches!(config, Err(ConfigError::InvalidUrl(_))));
    }
}
