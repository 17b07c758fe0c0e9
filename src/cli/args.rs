// args.rs - Command line arguments definition

use argh::FromArgs;

#[derive(FromArgs)]
/// andist - alignment-free pairwise whole-genome distance estimator
pub struct Args {
    /// input FASTA files (one genome per record, or one per file with --join)
    #[argh(positional)]
    pub inputs: Vec<String>,

    /// output distance matrix file (stdout if omitted)
    #[argh(option)]
    pub output: Option<String>,

    /// p-value floor for the random-anchor length test (default: 0.025)
    #[argh(option, default = "0.025")]
    pub anchor_p_value: f64,

    /// distance model: raw, jc, kimura, logdet (default: jc)
    #[argh(option, default = "String::from(\"jc\")")]
    pub model: String,

    /// number of bootstrap replicates to emit after the primary matrix (default: 0)
    #[argh(option, default = "0")]
    pub bootstrap_count: usize,

    /// use inner-parallel (low-memory) scheduling instead of outer-parallel
    #[argh(switch)]
    pub low_memory: bool,

    /// number of worker threads (default: auto-detect)
    #[argh(option)]
    pub threads: Option<usize>,

    /// clip printed names to 10 bytes, PHYLIP style
    #[argh(switch)]
    pub truncate_names: bool,

    /// glue every record within one input file into a single genome with `!`
    #[argh(switch)]
    pub join: bool,

    /// print the coverage matrix after the distance matrix
    #[argh(switch)]
    pub verbose: bool,

    /// print raw asymmetric pairs instead of averaging M(i,j) and M(j,i)
    #[argh(switch)]
    pub extra_verbose: bool,

    /// path to a TOML configuration file
    #[argh(option)]
    pub config: Option<String>,

    /// print a commented sample configuration file and exit
    #[argh(switch)]
    pub generate_config: bool,
}
