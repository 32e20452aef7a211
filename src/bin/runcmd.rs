// src/bin/runcmd.rs

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use runcmd::{ExecContext, ExecOptions, run_command};

/// Run a single command and capture its combined output.
#[derive(Parser, Debug)]
#[command(name = "runcmd", version, about)]
struct Cli {
    /// Working directory for the child process.
    #[arg(short = 'C', long = "directory", value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Echo the child's output as it is produced.
    #[arg(short, long)]
    verbose: bool,

    /// Timeout in seconds; enforced by the native back end only, zero waits
    /// indefinitely.
    #[arg(short, long, default_value_t = 0)]
    timeout: u64,

    /// Hide the child's console window (Windows).
    #[arg(long)]
    hidden: bool,

    /// The command line to run.
    #[arg(required = true, trailing_var_arg = true)]
    command: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let line = cli.command.join(" ");
    let mut ctx = ExecContext::new()
        .verbose(cli.verbose)
        .timeout_secs(cli.timeout)
        .options(ExecOptions {
            hide_console: cli.hidden,
            ..Default::default()
        });
    if let Some(dir) = cli.directory {
        ctx = ctx.cwd(dir);
    }

    if cli.verbose {
        eprintln!("{} {}", "→".blue(), line.green());
    }

    let outcome = run_command(&line, &ctx)?;

    // Verbose mode already echoed the output while it was produced.
    if !cli.verbose {
        print!("{}", outcome.output);
    }
    std::io::Write::flush(&mut std::io::stdout()).ok();

    match outcome.exit_code {
        Some(code) => std::process::exit(code),
        None => {
            if let Some(signal) = &outcome.terminating_signal {
                eprintln!("{}", format!("child terminated by {signal}").red());
            } else if !outcome.completed {
                eprintln!("{}", "child did not run to completion".red());
            }
            std::process::exit(1)
        }
    }
}
