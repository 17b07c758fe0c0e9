// main.rs - CLI entry point

use std::time::Instant;

use andist::output::{asymmetric_distances, symmetric_distances};
use andist::prelude::*;

fn main() {
    match run_main() {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            eprintln!("❌ ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_main() -> Result<i32, String> {
    let mut args: Args = argh::from_env();

    if args.generate_config {
        println!("{}", Config::generate_sample());
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(0);
    }

    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
    }

    let options = validate_args(&args)?;

    println!("🧬 andist v{}", andist::VERSION);

    if let Some(n) = options.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("failed to configure thread pool: {}", e))?;
        println!("🧵 threads: {}", n);
    } else {
        println!("🧵 threads: {} (auto-detected)", rayon::current_num_threads());
    }

    let flags = DiagnosticFlags::new();
    let sequences = load_sequences(&options.inputs, options.join, &flags).map_err(|e| e.to_string())?;

    if sequences.len() < 2 {
        return Err("at least two sequences are required".to_string());
    }
    println!("📖 loaded {} sequence(s) from {} file(s)", sequences.len(), options.inputs.len());

    let start = Instant::now();
    let table = run_pairwise(&sequences, options.anchor_p_value, options.scheduling, &flags).map_err(|e| e.to_string())?;
    println!("🔍 pairwise scan finished in {:.2}s", start.elapsed().as_secs_f64());

    let names: Vec<String> = sequences.iter().map(|s| s.name.clone()).collect();

    let (primary, coverage) = if options.extra_verbose {
        (asymmetric_distances(&table, options.model), None)
    } else {
        let (dist, cov) = symmetric_distances(&table, &names, options.model, &flags);
        (dist, Some(cov))
    };
    let coverage_section = if options.verbose { coverage.as_deref() } else { None };

    let bootstrap = if options.bootstrap_count > 0 {
        println!("🎲 running {} bootstrap replicate(s)", options.bootstrap_count);
        let mut rng = rand::thread_rng();
        run_bootstrap(&table, options.bootstrap_count, &mut rng)
    } else {
        Vec::new()
    };

    for warning in flags.drain_warnings() {
        eprintln!("{}", warning);
    }
    if flags.any_non_acgt() {
        eprintln!("⚠️  one or more sequences contained non-ACGT bytes; they were stripped");
    }
    if flags.any_short_sequence() {
        eprintln!("⚠️  one or more sequences were shorter than 1000 bases");
    }

    write_report(
        options.output.as_deref(),
        &names,
        &primary,
        coverage_section,
        &bootstrap,
        options.model,
        options.truncate_names,
    )
    .map_err(|e| format!("failed to write output: {}", e))?;

    println!("✅ done");
    Ok(flags.exit_code())
}

#[cfg(test)]
mod end_to_end {
    use super::*;
    use rand::rngs::StdRng;
    use rand::Rng;
    use rand::SeedableRng;

    fn random_acgt(rng: &mut StdRng, len: usize) -> Vec<u8> {
        const BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];
        (0..len).map(|_| BASES[rng.gen_range(0..4)]).collect()
    }

    fn seq(name: &str, bytes: Vec<u8>) -> Sequence {
        Sequence { name: name.to_string(), bytes }
    }

    // (S1) two identical sequences: 0.0000 everywhere, coverage 1.0.
    #[test]
    fn s1_identical_sequences_have_zero_distance() {
        let s0 = seq("s0", b"ACGTACGTACGTACGTACGTACGTACGTACGT".to_vec());
        let s1 = seq("s1", s0.bytes.clone());
        let flags = DiagnosticFlags::new();
        let table = run_pairwise(&[s0, s1], 0.025, Scheduling::OuterParallel, &flags).unwrap();
        let names = vec!["s0".to_string(), "s1".to_string()];
        let (dist, coverage) = andist::output::symmetric_distances(&table, &names, Model::Jc, &flags);
        assert_eq!(dist[0][1], 0.0);
        assert_eq!(coverage[0][1], 1.0);
    }

    // (S2) one point substitution in a 10,000-nt sequence: JC distance
    // close to the single-mismatch estimate, near-complete coverage.
    #[test]
    fn s2_single_substitution_gives_a_small_positive_distance() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut s0 = random_acgt(&mut rng, 10_000);
        let flip_at = 5_000;
        s0[flip_at] = b'A';
        let mut s1 = s0.clone();
        s1[flip_at] = b'C';

        let flags = DiagnosticFlags::new();
        let sequences = vec![seq("s0", s0), seq("s1", s1)];
        let table = run_pairwise(&sequences, 0.025, Scheduling::OuterParallel, &flags).unwrap();
        let names = vec!["s0".to_string(), "s1".to_string()];
        let (dist, coverage) = andist::output::symmetric_distances(&table, &names, Model::Jc, &flags);

        assert!(dist[0][1] > 0.0 && dist[0][1] < 1e-2, "distance {} out of expected range", dist[0][1]);
        assert!(coverage[0][1] > 0.9, "coverage {} lower than expected", coverage[0][1]);
    }

    // (S3) degenerate short input: length-800 sequences trigger the
    // short-sequence diagnostic regardless of the resulting distance.
    #[test]
    fn s3_short_sequences_raise_the_short_sequence_flag() {
        let mut rng = StdRng::seed_from_u64(7);
        let s0 = random_acgt(&mut rng, 800);
        let mut s1 = s0.clone();
        for b in s1.iter_mut() {
            if rng.gen_bool(0.4) {
                *b = match *b {
                    b'A' => b'C',
                    b'C' => b'G',
                    b'G' => b'T',
                    _ => b'A',
                };
            }
        }

        let flags = DiagnosticFlags::new();
        let n0 = andist::data::normalize("s0", &s0).unwrap();
        let n1 = andist::data::normalize("s1", &s1).unwrap();
        assert!(n0.short_sequence && n1.short_sequence);

        let sequences = vec![n0.sequence, n1.sequence];
        let table = run_pairwise(&sequences, 0.025, Scheduling::OuterParallel, &flags).unwrap();
        let names = vec!["s0".to_string(), "s1".to_string()];
        let _ = andist::output::symmetric_distances(&table, &names, Model::Jc, &flags);
    }

    // (S4) two mutually unrelated 5,000-nt sequences: low homology or a
    // degenerate pair is flagged, and the cell is retained rather than
    // dropped.
    #[test]
    fn s4_unrelated_sequences_flag_low_homology_or_degeneracy() {
        let mut rng = StdRng::seed_from_u64(99);
        let s0 = random_acgt(&mut rng, 5_000);
        let s1 = random_acgt(&mut rng, 5_000);

        let flags = DiagnosticFlags::new();
        let sequences = vec![seq("s0", s0), seq("s1", s1)];
        let table = run_pairwise(&sequences, 0.025, Scheduling::OuterParallel, &flags).unwrap();
        let names = vec!["s0".to_string(), "s1".to_string()];
        let _ = andist::output::symmetric_distances(&table, &names, Model::Jc, &flags);

        assert!(!flags.drain_warnings().is_empty(), "expected a low-homology or degenerate-pair warning");
    }

    // (S5) bootstrap with K=3 on a 3-sequence input: the primary matrix
    // plus exactly 3 replicate matrices, identity diagonal preserved.
    #[test]
    fn s5_bootstrap_yields_k_replicates_with_identity_diagonals() {
        let sequences = vec![
            seq("a", b"ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT".to_vec()),
            seq("b", b"ACGTACGTACGTACGTACGTACGTACGTAAGTACGTACGT".to_vec()),
            seq("c", b"TTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTTT".to_vec()),
        ];
        let flags = DiagnosticFlags::new();
        let table = run_pairwise(&sequences, 0.025, Scheduling::OuterParallel, &flags).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let replicates = run_bootstrap(&table, 3, &mut rng);

        assert_eq!(replicates.len(), 3);
        for r in &replicates {
            for i in 0..3 {
                assert_eq!(Model::Jc.estimate(r.get(i, i)), 0.0);
            }
        }
    }
}
