use clap::{Parser, Subcommand};
#[cfg(not(test))]
use xtask::*;

#[derive(Parser)]
#[command(author, version, about = "Development tasks for atrous")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Build,
    Test,
    Clippy,
    Fmt,
    Analyze,
    Bench,
    Sanity {
        /// Path to input WAV file
        input: String,
        /// Path to output CSV file
        output: String,
        /// Target octave of the detail band
        #[arg(long, default_value_t = 3)]
        depth: usize,
    },
}

#[cfg(not(test))]
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = detect_config();

    let status = match cli.command {
        Commands::Build => build_command(&cfg).status()?,
        Commands::Test => test_command(&cfg).status()?,
        Commands::Clippy => clippy_command().status()?,
        Commands::Fmt => fmt_command().status()?,
        Commands::Analyze => {
            let fmt = fmt_command().status()?;
            if !fmt.success() {
                fmt
            } else {
                clippy_command().status()?
            }
        }
        Commands::Bench => bench_command(&cfg).status()?,
        Commands::Sanity {
            input,
            output,
            depth,
        } => sanity_command(&input, &output, depth)?.status()?,
    };

    std::process::exit(status.code().unwrap_or(1));
}
