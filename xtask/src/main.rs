use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

/// Crates whose tests need no GPU or window.
const HEADLESS_CRATES: &[&str] = &[
    "duskforge-common",
    "duskforge-render",
    "duskforge-render-soft",
    "duskforge-assets",
    "duskforge-world",
    "duskforge-cli",
];

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for duskforge")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates
    Clippy,
    /// Run all tests
    Test {
        /// Only test crates that run without a GPU
        #[arg(long)]
        headless: bool,
    },
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Render the demo frame to a PNG with the software backend
    Frame {
        #[arg(short, long, default_value = "target/frame.png")]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            run_fmt()?;
            run_clippy()?;
            run_tests(false)?;
            run_doc()?;
        }
        Commands::Fmt => run_fmt()?,
        Commands::Clippy => run_clippy()?,
        Commands::Test { headless } => run_tests(headless)?,
        Commands::Doc => run_doc()?,
        Commands::Build => cargo("cargo build", &["build", "--workspace"])?,
        Commands::Frame { output } => cargo(
            "duskforge-cli render",
            &["run", "-p", "duskforge-cli", "--", "render", "--output", &output],
        )?,
    }

    Ok(())
}

fn run_fmt() -> Result<()> {
    cargo("cargo fmt --check", &["fmt", "--all", "--", "--check"])
}

fn run_clippy() -> Result<()> {
    cargo(
        "cargo clippy",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
    )
}

fn run_tests(headless: bool) -> Result<()> {
    if !headless {
        return cargo("cargo test", &["test", "--workspace"]);
    }
    let mut args = vec!["test"];
    for krate in HEADLESS_CRATES {
        args.extend(["-p", krate]);
    }
    cargo("cargo test (headless)", &args)
}

fn run_doc() -> Result<()> {
    cargo("cargo doc", &["doc", "--workspace", "--no-deps"])
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> Running {step}");
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{step} failed");
    }
    Ok(())
}
