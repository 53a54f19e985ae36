pub mod loader;
pub mod schema;

pub use loader::{
    expand_home, load_config, load_config_from_str, parse_language_tags, validate_config,
};
pub use schema::{ImageFormat, RunConfig, DEFAULT_LANGUAGES, SUPPORTED_EXTENSIONS};
