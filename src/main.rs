use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use nvm::logging::{self, LogMode};
use nvm::process::ProcessTable;
use nvm::scheduler;

/// Run an NVM0 bytecode image to completion.
#[derive(Parser, Debug)]
#[command(name = "nvm", about = "A small stack-based bytecode VM")]
struct Cli {
    /// Where log records go.
    #[arg(long, value_enum, default_value = "stdio")]
    log: LogMode,

    /// Path to the NVM0 bytecode image.
    bytecode: PathBuf,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // Map clap's own usage-error exit code through to 1.
            return ExitCode::from(1);
        }
    };

    logging::install(cli.log, &PathBuf::from("nvm.log"));

    match run(&cli.bytecode) {
        // The run completed; the VM process's own exit_code is an internal
        // detail observable through the library API, not the OS exit status.
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logging::fatal(format!("{err:#}"));
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(bytecode_path: &PathBuf) -> anyhow::Result<()> {
    let image = std::fs::read(bytecode_path)
        .with_context(|| format!("reading bytecode image {}", bytecode_path.display()))?;

    let mut table = ProcessTable::new();
    let pid = table
        .create(&image, &[])
        .with_context(|| format!("loading bytecode image {}", bytecode_path.display()))?;

    let stdout = std::io::stdout();
    scheduler::run_to_completion(&mut table, pid, &mut |byte| {
        let mut out = stdout.lock();
        let _ = out.write_all(&[byte]);
    });

    Ok(())
}
