use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use manifest2config::translate;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Builds the alignment pipeline config.json from a FASTQ read-info manifest"
)]
struct Args {
    /// Manifest of read paths and instrument headers, one sample per line
    #[arg(short, long, default_value = "sample_read_info.txt")]
    manifest: PathBuf,

    /// Output configuration document (overwritten if present)
    #[arg(short, long, default_value = "config.json")]
    output: PathBuf,

    /// Verbose output (show elapsed time)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

/// CLI entry point: parse args, run the translation, and print a concise
/// tab-separated summary: output file, sample count.
fn main() -> Result<()> {
    let args = Args::parse();

    let start = std::time::Instant::now();
    let samples = translate(&args.manifest, &args.output)?;
    let elapsed = start.elapsed();

    println!("{}\t{} samples", args.output.display(), samples);

    if args.verbose {
        println!("Elapsed: {:.3}s", elapsed.as_secs_f64());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["prog"]).unwrap();
        assert_eq!(args.manifest, PathBuf::from("sample_read_info.txt"));
        assert_eq!(args.output, PathBuf::from("config.json"));
        assert!(!args.verbose);
    }

    #[test]
    fn test_args_overrides() {
        let args =
            Args::try_parse_from(["prog", "-m", "reads.txt", "-o", "out.json", "-v"]).unwrap();
        assert_eq!(args.manifest, PathBuf::from("reads.txt"));
        assert_eq!(args.output, PathBuf::from("out.json"));
        assert!(args.verbose);
    }
}
