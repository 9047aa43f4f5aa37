use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use git_release::cli::{self, Workspace};
use git_release::ui;

#[derive(Parser)]
#[command(
    name = "git-release",
    version,
    about = "Keep version files consistent and cut tagged releases"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Repository root (default: enclosing git work tree or current directory)"
    )]
    root: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Show debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compare the canonical version with the manifest and, optionally, a release
    Check {
        #[arg(long, help = "Expected release: a version, tag or refs/tags/ ref")]
        expected: Option<String>,
    },

    /// Move both version files to the next version
    Bump {
        #[arg(help = "patch, minor, major or an explicit X.Y.Z[-pre]")]
        kind: String,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// Bump, commit, tag and optionally push
    Release {
        #[arg(help = "patch, minor, major or an explicit X.Y.Z[-pre]")]
        kind: String,

        #[arg(long, help = "Push the branch and tag to the configured remote")]
        push: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,

        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let workspace = match Workspace::resolve(args.root.as_deref(), args.config.as_deref()) {
        Ok(workspace) => workspace,
        Err(e) => {
            ui::display_release_error(&e);
            process::exit(1);
        }
    };

    let outcome = match &args.command {
        Command::Check { expected } => cli::run_check(&workspace, expected.as_deref()),
        Command::Bump { kind, dry_run } => cli::run_bump(&workspace, kind, *dry_run).map(|_| true),
        Command::Release {
            kind,
            push,
            dry_run,
            yes,
        } => {
            // a declined prompt exits 0
            cli::run_release(&workspace, kind, *push, *dry_run, *yes).map(|_| true)
        }
    };

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => process::exit(1),
        Err(e) => {
            ui::display_release_error(&e);
            process::exit(1);
        }
    }
}
