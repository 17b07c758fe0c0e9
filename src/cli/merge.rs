// merge.rs - Merge configuration file with CLI arguments

use crate::cli::{Args, Config};

impl Args {
    /// Merge with configuration from file. CLI arguments take precedence;
    /// a field is only pulled from `config` when it's still at its default.
    pub fn merge_with_config(mut self, config: Config) -> Self {
        if self.output.is_none() {
            self.output = config.output;
        }
        if self.anchor_p_value == 0.025 {
            if let Some(v) = config.anchor_p_value {
                self.anchor_p_value = v;
            }
        }
        if self.model == "jc" {
            if let Some(v) = config.model {
                self.model = v;
            }
        }
        if self.bootstrap_count == 0 {
            if let Some(v) = config.bootstrap_count {
                self.bootstrap_count = v;
            }
        }
        if !self.low_memory && config.low_memory.unwrap_or(false) {
            self.low_memory = true;
        }
        if self.threads.is_none() {
            self.threads = config.threads;
        }
        if !self.truncate_names && config.truncate_names.unwrap_or(false) {
            self.truncate_names = true;
        }
        if !self.join && config.join.unwrap_or(false) {
            self.join = true;
        }
        if !self.verbose && config.verbose.unwrap_or(false) {
            self.verbose = true;
        }
        if !self.extra_verbose && config.extra_verbose.unwrap_or(false) {
            self.extra_verbose = true;
        }

        self
    }

    /// Load configuration and merge with CLI args.
    pub fn with_config_file(self, config_path: &str) -> Result<Self, String> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(config))
    }
}
