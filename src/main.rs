mod cli;
mod domain;
mod infra;

use crate::cli::CliInvocation;
use crate::infra::{resolve_archived_sessions_dir, resolve_sessions_dir};
use std::io::{self, Write};
use thiserror::Error;

#[derive(Debug, Error)]
enum MainError {
    #[error(transparent)]
    ResolveRoot(#[from] crate::infra::ResolveRootError),

    #[error(transparent)]
    Cli(#[from] crate::cli::CliRunError),
}

fn main() {
    if let Err(error) = run_main() {
        let mut err = io::stderr().lock();
        let _ = writeln!(err, "{error}");
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), MainError> {
    let args = std::env::args().collect::<Vec<_>>();
    let invocation = match crate::cli::parse_invocation(&args) {
        Ok(invocation) => invocation,
        Err(error) => {
            let mut err = io::stderr().lock();
            let _ = writeln!(err, "{error}");
            let _ = writeln!(err);
            print_help();
            std::process::exit(2);
        }
    };

    match invocation {
        CliInvocation::PrintHelp => {
            print_help();
            Ok(())
        }
        CliInvocation::PrintVersion => {
            let mut out = io::stdout().lock();
            let _ = writeln!(out, "{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliInvocation::Command(command) => {
            let live_root = resolve_sessions_dir()?;
            let archived_root = resolve_archived_sessions_dir()?;
            crate::cli::run(command, &live_root, &archived_root)?;
            Ok(())
        }
    }
}

fn print_help() {
    let text = format!(
        "{name} — list and delete Codex session logs\n\nUSAGE:\n  {name}                         List both session roots\n  {name} list [--live|--archived] [--size]  List one or both roots\n  {name} delete <path>           Delete one session file and re-list\n  {name} --help | --version\n\nLIST FLAGS:\n  --live       Only the live sessions root (recursive, *.jsonl)\n  --archived   Only the archived sessions root (flat)\n  --size       Add file_size_bytes and RFC3339 mtime columns\n\nOUTPUT:\n  name<TAB>summary<TAB>path  (with --size: name<TAB>summary<TAB>bytes<TAB>mtime<TAB>path)\n  Archived summaries come from the first user message containing\n  \"My request for Codex:\"; live entries always show the file name.\n\nENV:\n  CODEX_SESSIONS_DIR            Override live root (default: ~/.codex/sessions)\n  CODEX_ARCHIVED_SESSIONS_DIR   Override archived root (default: ~/.codex/archived_sessions)\n",
        name = env!("CARGO_PKG_NAME")
    );
    let mut out = io::stdout().lock();
    let _ = write!(out, "{text}");
}
