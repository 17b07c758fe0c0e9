// config.rs - Configuration file support (spec SPEC_FULL.md §10.3)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    pub output: Option<String>,
    pub anchor_p_value: Option<f64>,
    pub model: Option<String>,
    pub bootstrap_count: Option<usize>,
    pub low_memory: Option<bool>,
    pub threads: Option<usize>,
    pub truncate_names: Option<bool>,
    pub join: Option<bool>,
    pub verbose: Option<bool>,
    pub extra_verbose: Option<bool>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path.display(), e))?;

        println!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, content)
            .map_err(|e| format!("Failed to write config file '{}': {}", path.display(), e))?;

        println!("📄 Saved configuration to: {}", path.display());
        Ok(())
    }

    /// A commented sample configuration, as emitted by `--generate-config`.
    pub fn generate_sample() -> String {
        r#"# andist.toml - Configuration file for andist
# Command line arguments override these settings

# Output distance matrix file (stdout if omitted)
output = "distances.phy"

# p-value floor for the random-anchor length test, in (0, 1)
anchor_p_value = 0.025

# Distance model: raw, jc, kimura, logdet
model = "jc"

# Number of bootstrap replicates to append after the primary matrix (0 disables)
bootstrap_count = 0

# Use inner-parallel (low-memory) scheduling instead of outer-parallel
low_memory = false

# Number of worker threads (omit for auto-detection)
# threads = 8

# Clip printed names to 10 bytes, PHYLIP style
truncate_names = false

# Glue every record within one input file into a single genome with `!`
join = false

# Print the coverage matrix after the distance matrix
verbose = false

# Print raw asymmetric pairs instead of averaging M(i,j) and M(j,i)
extra_verbose = false
"#
        .to_string()
    }
}
