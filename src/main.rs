use anyhow::{Context, Result};
use clap::Parser;

use backup_rotation::cli::{handle_rotate, RotateArgs};
use backup_rotation::logging::{init_logging, LogArgs};

/// Exit status after Ctrl-C, as a shell would report SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Parser)]
#[command(
    name = "backup-rotation",
    author = "Kaylee Beyene",
    version,
    about = "Scheduled, retention-bounded directory backups",
    long_about = "backup-rotation archives each configured source directory into its \
                  destination as daily, weekly, monthly and yearly tarballs, and deletes \
                  the oldest archives once a period holds more than its retention count."
)]
struct Cli {
    #[command(flatten)]
    rotate: RotateArgs,

    #[command(flatten)]
    log: LogArgs,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log)?;

    ctrlc::set_handler(|| {
        eprintln!();
        eprintln!("Interrupted, rotation aborted");
        std::process::exit(INTERRUPTED_EXIT_CODE);
    })
    .context("Failed to install interrupt handler")?;

    handle_rotate(&cli.rotate).context("Rotation did not start")?;

    Ok(())
}
