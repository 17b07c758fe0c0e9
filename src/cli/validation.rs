// validation.rs - Resolves and validates CLI arguments (spec §6 "Options
// that affect the core")

use crate::cli::args::Args;
use crate::core::mutation::Model;
use crate::core::driver::Scheduling;

/// Fully resolved, validated run configuration handed to the driver.
pub struct ValidationResult {
    pub inputs: Vec<String>,
    pub output: Option<String>,
    pub anchor_p_value: f64,
    pub model: Model,
    pub bootstrap_count: usize,
    pub scheduling: Scheduling,
    pub threads: Option<usize>,
    pub truncate_names: bool,
    pub join: bool,
    pub verbose: bool,
    pub extra_verbose: bool,
}

/// Validate all command line arguments.
pub fn validate_args(args: &Args) -> Result<ValidationResult, String> {
    if args.inputs.is_empty() {
        return Err("at least one FASTA input file is required".to_string());
    }

    if !(args.anchor_p_value > 0.0 && args.anchor_p_value < 1.0) {
        return Err(format!(
            "--anchor-p-value must lie in (0, 1), got {}",
            args.anchor_p_value
        ));
    }

    let model = match args.model.to_lowercase().as_str() {
        "raw" => Model::Raw,
        "jc" => Model::Jc,
        "kimura" => Model::Kimura,
        "logdet" => Model::LogDet,
        other => return Err(format!("unknown model '{}'. Use: raw, jc, kimura, logdet", other)),
    };

    if let Some(threads) = args.threads {
        if threads == 0 {
            return Err("--threads must be at least 1".to_string());
        }
    }

    let scheduling = if args.low_memory {
        Scheduling::InnerParallel
    } else {
        Scheduling::OuterParallel
    };

    Ok(ValidationResult {
        inputs: args.inputs.clone(),
        output: args.output.clone(),
        anchor_p_value: args.anchor_p_value,
        model,
        bootstrap_count: args.bootstrap_count,
        scheduling,
        threads: args.threads,
        truncate_names: args.truncate_names,
        join: args.join,
        verbose: args.verbose,
        extra_verbose: args.extra_verbose,
    })
}
