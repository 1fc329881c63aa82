// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cmd::commands::{
    call_command, cat_command, grant_command, grants_command, list_command, mkdir_command,
    revoke_command, write_command,
};
use cmd::common::{HostContext, TerminalApprover, get_home_with_override};
use doctree::Failure;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "doctree")]
struct Cli {
    /// State directory (defaults to $DOCTREE_HOME)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grant access to a host directory and print its handle
    Grant {
        /// Directory to grant
        dir: PathBuf,
        /// Approve without prompting
        #[arg(short, long)]
        yes: bool,
    },
    /// Show recorded grants
    Grants,
    /// Revoke a grant
    Revoke {
        handle: String,
    },
    /// List directories under a path (files with --files)
    Ls {
        handle: String,
        #[arg(default_value = "")]
        path: String,
        /// List files instead of directories
        #[arg(short, long)]
        files: bool,
    },
    /// Create a directory and any missing parents
    Mkdir {
        handle: String,
        path: String,
    },
    /// Print a file's content
    Cat {
        handle: String,
        path: String,
    },
    /// Replace a file's content from stdin or a host file
    Write {
        handle: String,
        path: String,
        /// Read content from this host file instead of stdin
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// Send a raw method call, e.g. `call listDir '{"rootUri": "...", "path": []}'`
    Call {
        method: String,
        /// JSON argument map
        arguments: Option<String>,
    },
}

fn print_line(line: &str) {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", line);
}

fn read_input(from: Option<&PathBuf>) -> Result<Vec<u8>> {
    match from {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut data = Vec::new();
            let _ = std::io::stdin()
                .lock()
                .read_to_end(&mut data)
                .context("Failed to read stdin")?;
            Ok(data)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let home = get_home_with_override(cli.home)?;

    match cli.command {
        Commands::Grant { dir, yes } => {
            let approver = TerminalApprover::new(Some(dir), yes);
            let context = HostContext::new(home, Arc::new(approver))?;
            grant_command(&context, print_line)
        }
        Commands::Grants => grants_command(&HostContext::interactive(home)?, print_line),
        Commands::Revoke { handle } => {
            revoke_command(&HostContext::interactive(home)?, &handle, print_line)
        }
        Commands::Ls {
            handle,
            path,
            files,
        } => list_command(&HostContext::interactive(home)?, &handle, &path, files, print_line),
        Commands::Mkdir { handle, path } => {
            mkdir_command(&HostContext::interactive(home)?, &handle, &path, print_line)
        }
        Commands::Cat { handle, path } => {
            let context = HostContext::interactive(home)?;
            cat_command(&context, &handle, &path, |content| {
                let mut stdout = std::io::stdout().lock();
                let _ = stdout.write_all(content);
                let _ = stdout.flush();
            })
        }
        Commands::Write { handle, path, from } => {
            let data = read_input(from.as_ref())?;
            write_command(&HostContext::interactive(home)?, &handle, &path, data, print_line)
        }
        Commands::Call { method, arguments } => call_command(
            &HostContext::interactive(home)?,
            &method,
            arguments.as_deref(),
            print_line,
        ),
    }
}

fn main() -> ExitCode {
    diagnostics::init_diagnostics();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut stderr = std::io::stderr().lock();
            let _ = match err.downcast_ref::<Failure>() {
                Some(failure) => writeln!(stderr, "{}", failure),
                None => writeln!(stderr, "error: {:#}", err),
            };
            ExitCode::FAILURE
        }
    }
}
