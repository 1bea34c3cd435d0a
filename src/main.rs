use clap::{Parser, ValueEnum};
use confcollect::{
    from_module, CollectOptions, Collector, ConfigError, EnvSource, Mapping, ModuleSource,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Output format for the collected configuration.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Toml,
}

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Collect configuration from a defaults file and the process environment.",
    long_about = "Loads typed defaults from a TOML definition file, overrides them from environment variables converted to the type of each default, and prints the merged result."
)]
struct Args {
    /// TOML file with the defaults. Only uppercase top-level keys are used.
    #[arg(short, long)]
    defaults: Option<PathBuf>,

    /// Fail if the defaults file cannot be read.
    #[arg(long)]
    strict: bool,

    /// Read nested defaults from PARENT_CHILD environment variables.
    #[arg(long)]
    nested_dicts: bool,

    /// Lowercase top-level keys in the output.
    #[arg(long)]
    key_lower: bool,

    /// Only read environment variables starting with PREFIX_.
    #[arg(short, long)]
    prefix: Option<String>,

    /// Also print environment variables that match no default.
    #[arg(long)]
    include_unknown: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Log each applied value to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// Unknown entries stay out unless asked for; the process environment may hold secrets.
fn collect_options(args: &Args) -> CollectOptions {
    let mut options = CollectOptions::default()
        .nested_dicts(args.nested_dicts)
        .key_lower(args.key_lower)
        .include_unknown(args.include_unknown);
    if let Some(prefix) = &args.prefix {
        options = options.env_prefix(prefix.clone());
    }
    options
}

fn run(args: &Args) -> Result<String, ConfigError> {
    let defaults = match &args.defaults {
        Some(path) => from_module(&ModuleSource::new(path), !args.strict)?,
        None => Mapping::new(),
    };

    let environment = EnvSource::process();
    let config =
        Collector::new(collect_options(args)).collect(environment.vars(), &[], &defaults)?;

    match args.format {
        Format::Json => serde_json::to_string_pretty(&config)
            .map_err(|e| ConfigError::Serialize(e.to_string())),
        Format::Toml => {
            toml::to_string_pretty(&config).map_err(|e| ConfigError::Serialize(e.to_string()))
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Configuration collection failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_entries_off_by_default() {
        let args = Args::parse_from(["confcollect"]);
        let options = collect_options(&args);
        assert!(!options.include_unknown);
        assert!(!options.nested_dicts);
    }

    #[test]
    fn test_flags_map_to_options() {
        let args = Args::parse_from([
            "confcollect",
            "--include-unknown",
            "--nested-dicts",
            "--prefix",
            "APP",
        ]);
        let options = collect_options(&args);
        assert!(options.include_unknown);
        assert!(options.nested_dicts);
        assert_eq!(options.env_prefix.as_deref(), Some("APP"));
    }
}
