//! frost - freeze schema versions into immutable, verifiable fixtures
//!
//! Subcommands:
//! - `freeze <version>`: run the full freeze pipeline for one declared
//!   schema version
//! - `init`: bootstrap the directory layout and dependency declaration
//! - `list`: print frozen versions in ascending numeric order
//! - `verify <version> --manifest <file>`: compare a current structural
//!   export against the stored fingerprint

mod freeze;
mod init;
mod verify;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "frost", version, about = "Frozen schema snapshot pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Freeze one declared schema version into an immutable fixture set
    Freeze {
        /// The declared schema version, e.g. 1.0.0
        version: String,
        /// Replace an existing fixture set for this version
        #[arg(long)]
        force: bool,
        /// Sandbox name to execute in (default: frost-default)
        #[arg(long)]
        sandbox: Option<String>,
        /// Fixture store root (default: ./Fixtures)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Build descriptor path (default: ./Cargo.toml)
        #[arg(long)]
        manifest_path: Option<PathBuf>,
        /// Build package to generate the driver into
        #[arg(long)]
        package: Option<String>,
        /// Source roots to scan for declarations (default: project root)
        #[arg(long = "source-root")]
        source_roots: Vec<PathBuf>,
    },
    /// Bootstrap the fixture layout and dependency declaration
    Init {
        /// Do not insert the frost-runtime dev-dependency
        #[arg(long)]
        skip_dependency: bool,
    },
    /// List frozen versions in ascending numeric order
    List {
        /// Fixture store root (default: ./Fixtures)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Compare a current structural export against a stored fingerprint
    Verify {
        /// The frozen version to verify against
        version: String,
        /// Path to the current structural manifest export
        #[arg(long)]
        manifest: PathBuf,
        /// Fixture store root (default: ./Fixtures)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Freeze {
            version,
            force,
            sandbox,
            output,
            manifest_path,
            package,
            source_roots,
        } => freeze::run(freeze::FreezeArgs {
            version,
            force,
            sandbox,
            output,
            manifest_path,
            package,
            source_roots,
        }),
        Commands::Init { skip_dependency } => init::run(skip_dependency),
        Commands::List { output } => verify::list(output),
        Commands::Verify {
            version,
            manifest,
            output,
        } => verify::run(&version, &manifest, output),
    };

    let code = match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            1
        }
    };
    std::process::exit(code);
}
