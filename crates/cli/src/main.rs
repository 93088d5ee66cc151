use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use splitcalc_cli::{Session, render_summary, write_export, write_summary_json};
use splitcalc_export::DEFAULT_FILE_NAME;

#[derive(Parser, Debug)]
#[command(name = "splitcalc", version, about = "Split a bill between people", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print each person's share and the grand total.
    Summary {
        /// Session file (JSON).
        session: PathBuf,
        /// Emit the summary as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Write the itemized CSV export.
    Export {
        /// Session file (JSON).
        session: PathBuf,
        /// Destination file, or `-` for stdout.
        #[arg(short, long, env = "SPLITCALC_EXPORT_PATH", default_value = DEFAULT_FILE_NAME)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    splitcalc_observability::init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();

    match cli.command {
        Commands::Summary { session, json } => {
            let ledger = Session::load(&session)?.into_ledger()?;
            if json {
                write_summary_json(&ledger, stdout.lock())?;
            } else {
                let mut out = stdout.lock();
                out.write_all(render_summary(&ledger).as_bytes())?;
            }
        }
        Commands::Export { session, output } => {
            let ledger = Session::load(&session)?.into_ledger()?;
            write_export(&ledger, &output, stdout.lock())?;
        }
    }

    Ok(())
}
