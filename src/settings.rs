use crate::error::Result;
use crate::readers::AccessMode;
use crate::utils::constants::{ENV_PREFIX, MAX_WORKERS};
use serde::Deserialize;
use std::path::Path;
use validator::Validate;

/// Runtime settings, layered as defaults -> optional config file ->
/// `BRC_*` environment variables. CLI flags are applied on top by the
/// caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(default)]
pub struct ProcessorSettings {
    #[validate(range(min = 1, max = 1024))]
    pub workers: usize,

    pub use_mmap: bool,

    pub show_progress: bool,
}

impl Default for ProcessorSettings {
    fn default() -> Self {
        Self {
            workers: num_cpus::get().clamp(1, MAX_WORKERS),
            use_mmap: true,
            show_progress: false,
        }
    }
}

impl ProcessorSettings {
    /// Load settings from `config_file` (if given) and the environment.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .prefix_separator("_"),
        );

        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        if let Some(workers) = workers {
            self.workers = workers;
        }
        self
    }

    pub fn access_mode(&self) -> AccessMode {
        AccessMode::from_use_mmap(self.use_mmap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ProcessorSettings::default();
        assert!(settings.validate().is_ok());
        assert!(settings.workers >= 1);
        assert_eq!(settings.access_mode(), AccessMode::Mmap);
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "workers = 3")?;
        writeln!(file, "use_mmap = false")?;
        file.flush()?;

        let settings = ProcessorSettings::load(Some(file.path()))?;
        assert_eq!(settings.workers, 3);
        assert_eq!(settings.access_mode(), AccessMode::Buffered);
        assert!(!settings.show_progress);

        Ok(())
    }

    #[test]
    fn test_invalid_worker_count() {
        let settings = ProcessorSettings::default().with_workers(Some(0));
        assert!(settings.validate().is_err());

        let mut file = Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "workers = 0").unwrap();
        file.flush().unwrap();

        let result = ProcessorSettings::load(Some(file.path()));
        assert!(matches!(result, Err(ProcessingError::Validation(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = ProcessorSettings::load(Some(Path::new("/nonexistent/brc.toml")));
        assert!(matches!(result, Err(ProcessingError::Config(_))));
    }
}
