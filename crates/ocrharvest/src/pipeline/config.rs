use std::path::PathBuf;

use crate::config::RunConfig;

pub struct PipelineConfig {
    pub input_directory: PathBuf,
    pub output_directory: PathBuf,
    pub languages: Vec<String>,
    pub workers: usize,
    pub text_dir_name: String,
}

impl PipelineConfig {
    pub fn from_config(
        config: &RunConfig,
        input_directory: impl Into<PathBuf>,
        output_directory: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_directory: input_directory.into(),
            output_directory: output_directory.into(),
            languages: config.languages.clone(),
            workers: config.effective_workers(),
            text_dir_name: config.text_dir_name.clone(),
        }
    }
}
