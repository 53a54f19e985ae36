use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::config::schema::{default_languages, RunConfig, CONFIG_VERSION};
use crate::error::ConfigError;

const MAX_WORKERS: usize = 256;

// Primary language subtag followed by optional region/script/variant subtags.
static RE_LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2,8}(?:[-_][A-Za-z0-9]{1,8})*$").unwrap());

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<RunConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

pub fn validate_config(config: &RunConfig) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.workers > MAX_WORKERS {
        return Err(ConfigError::Validation {
            message: format!(
                "workers must be at most {}, got {}",
                MAX_WORKERS, config.workers
            ),
        });
    }

    // The text directory must stay inside the output directory
    let mut components = Path::new(&config.text_dir_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => {
            return Err(ConfigError::Validation {
                message: format!(
                    "text_dir_name must be a single directory name, got '{}'",
                    config.text_dir_name
                ),
            });
        }
    }

    for tag in &config.languages {
        validate_language_tag(tag)?;
    }

    if config.tessdata_dir.as_deref().is_some_and(|d| d.trim().is_empty()) {
        return Err(ConfigError::Validation {
            message: "tessdata_dir must not be empty".to_string(),
        });
    }

    Ok(())
}

pub fn validate_language_tag(tag: &str) -> Result<(), ConfigError> {
    if RE_LANGUAGE_TAG.is_match(tag) {
        Ok(())
    } else {
        Err(ConfigError::InvalidLanguageTag {
            tag: tag.to_string(),
            reason: "expected a BCP-47 tag such as 'en-US'".to_string(),
        })
    }
}

/// Parses a comma-separated list of language tags.
///
/// Entries are trimmed and empty ones dropped. An empty result falls back to
/// the default hint set. Tags are not validated here: the OCR engine decides
/// what it accepts and falls back on its own.
pub fn parse_language_tags(input: &str) -> Vec<String> {
    let tags: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    if tags.is_empty() {
        default_languages()
    } else {
        tags
    }
}

/// Expands a leading `~` to the current user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(path))
    } else if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .map(|h| h.join(rest))
            .unwrap_or_else(|| PathBuf::from(path))
    } else {
        PathBuf::from(path)
    }
}
