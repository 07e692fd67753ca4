mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_FAILURE, EXIT_MANIFEST_ERROR};
use depgen_core::GenerateOptions;
use depgen_schema::OutputFormat;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "depgen",
    version,
    about = "Generate deterministic dependency pin tables from a manifest"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a manifest and emit the generated table.
    Generate {
        /// Path to manifest TOML file.
        #[arg(default_value = "depgen.toml")]
        manifest: PathBuf,
        /// Write to this file atomically instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Output format: go, json, or toml (overrides [emit].format).
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Go package name (overrides [emit].package).
        #[arg(long)]
        package: Option<String>,
    },
    /// Exit non-zero if a generated file is missing or out of date.
    Check {
        /// Path to manifest TOML file.
        #[arg(default_value = "depgen.toml")]
        manifest: PathBuf,
        /// Generated file to compare against.
        #[arg(short, long)]
        output: PathBuf,
        /// Output format: go, json, or toml (overrides [emit].format).
        #[arg(long)]
        format: Option<OutputFormat>,
        /// Go package name (overrides [emit].package).
        #[arg(long)]
        package: Option<String>,
    },
    /// List resolved dependencies in id order.
    List {
        /// Path to manifest TOML file.
        #[arg(default_value = "depgen.toml")]
        manifest: PathBuf,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
    /// Generate man pages in the specified directory.
    ManPages {
        /// Output directory for man pages.
        #[arg(default_value = "man")]
        dir: PathBuf,
    },
}

fn main() -> ExitCode {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("DEPGEN_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::Generate {
            manifest,
            output,
            format,
            package,
        } => commands::generate::run(
            &manifest,
            output.as_deref(),
            GenerateOptions { format, package },
            json_output,
        ),
        Commands::Check {
            manifest,
            output,
            format,
            package,
        } => commands::check::run(
            &manifest,
            &output,
            GenerateOptions { format, package },
            json_output,
        ),
        Commands::List { manifest } => commands::list::run(&manifest, json_output),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
        Commands::ManPages { dir } => commands::man_pages::run::<Cli>(&dir),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("manifest error:") || msg.starts_with("resolve error:") {
                EXIT_MANIFEST_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
