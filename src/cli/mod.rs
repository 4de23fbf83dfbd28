use crate::domain::{RootKind, RootState, SessionEntry};
use crate::infra::{
    DeleteError, ListError, ListOutput, SessionCatalog, delete_session_file, file_display_name,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Command(CliCommand),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliCommand {
    List {
        section: Option<RootKind>,
        size: bool,
    },
    Delete {
        path: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),

    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut iter = args.iter().skip(1).peekable();
    let Some(subcommand) = iter.next() else {
        return Ok(CliInvocation::Command(CliCommand::List {
            section: None,
            size: false,
        }));
    };

    match subcommand.as_str() {
        "list" => {
            let mut section: Option<RootKind> = None;
            let mut size = false;

            for arg in iter {
                match arg.as_str() {
                    "--live" => section = Some(RootKind::Live),
                    "--archived" => section = Some(RootKind::Archived),
                    "--size" => size = true,
                    _ if arg.starts_with('-') => {
                        return Err(CliParseError::UnknownFlag(arg.to_string()));
                    }
                    _ => {
                        return Err(CliParseError::UnexpectedArgument(arg.to_string()));
                    }
                }
            }

            Ok(CliInvocation::Command(CliCommand::List { section, size }))
        }
        "delete" => {
            let mut path: Option<PathBuf> = None;

            for arg in iter {
                match arg.as_str() {
                    _ if arg.starts_with('-') => {
                        return Err(CliParseError::UnknownFlag(arg.to_string()));
                    }
                    _ => {
                        if path.is_some() {
                            return Err(CliParseError::UnexpectedArgument(arg.to_string()));
                        }
                        path = Some(PathBuf::from(arg));
                    }
                }
            }

            let path = path.ok_or(CliParseError::MissingArgument("path"))?;
            Ok(CliInvocation::Command(CliCommand::Delete { path }))
        }
        other => Err(CliParseError::UnknownSubcommand(other.to_string())),
    }
}

#[derive(Debug, Error)]
pub enum CliRunError {
    #[error(transparent)]
    List(#[from] ListError),

    #[error(transparent)]
    Delete(#[from] DeleteError),

    #[error(transparent)]
    WriteOutput(#[from] io::Error),
}

pub fn run(command: CliCommand, live_root: &Path, archived_root: &Path) -> Result<(), CliRunError> {
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    let stderr = io::stderr();
    let mut err = io::BufWriter::new(stderr.lock());

    let mut catalog = SessionCatalog::new(live_root.to_path_buf(), archived_root.to_path_buf());
    let changes = catalog.subscribe();
    catalog.init();

    match command {
        CliCommand::List { section, size } => {
            print_listing(&mut out, &mut err, &catalog, section, size)?;
            Ok(())
        }
        CliCommand::Delete { path } => {
            let name = file_display_name(&path);
            delete_session_file(&path)?;
            catalog.refresh();
            if !write_line(&mut out, &format!("Removed file {name}"))? {
                return Ok(());
            }

            // Re-render on the change signal, like the tree view does.
            if changes.try_recv().is_ok() {
                print_listing(&mut out, &mut err, &catalog, None, false)?;
            }
            Ok(())
        }
    }
}

fn print_listing(
    out: &mut impl Write,
    err: &mut impl Write,
    catalog: &SessionCatalog,
    section: Option<RootKind>,
    size: bool,
) -> Result<(), CliRunError> {
    let mut warnings = 0usize;

    if section.is_none() || section == Some(RootKind::Live) {
        let output = catalog.list_live()?;
        warnings += output.warnings.get();
        if section.is_none()
            && !write_line(out, &header_line(RootKind::Live, catalog.live_state()))?
        {
            return Ok(());
        }
        if !print_entries(out, &output, size)? {
            return Ok(());
        }
    }

    if section.is_none() || section == Some(RootKind::Archived) {
        let output = catalog.list_archived()?;
        warnings += output.warnings.get();
        if section.is_none()
            && !write_line(
                out,
                &header_line(RootKind::Archived, catalog.archived_state()),
            )?
        {
            return Ok(());
        }
        if !print_entries(out, &output, size)? {
            return Ok(());
        }
    }

    if warnings > 0 {
        let _ = write_line(err, &format!("warnings: {warnings}"))?;
    }
    Ok(())
}

fn header_line(kind: RootKind, state: RootState) -> String {
    let found = match state {
        RootState::Present => "found",
        RootState::Absent | RootState::NotChecked => "not found",
    };
    format!("{} {found}", kind.label())
}

fn print_entries(out: &mut impl Write, output: &ListOutput, size: bool) -> io::Result<bool> {
    for entry in &output.entries {
        let line = if size {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                entry.name,
                entry.summary,
                entry.file_size_bytes,
                format_modified(entry),
                entry.path.display(),
            )
        } else {
            format!(
                "{}\t{}\t{}",
                entry.name,
                entry.summary,
                entry.path.display()
            )
        };
        if !write_line(out, &line)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn format_modified(entry: &SessionEntry) -> String {
    entry
        .file_modified
        .map(rfc3339_or_dash)
        .unwrap_or_else(|| "-".to_string())
}

fn rfc3339_or_dash(modified: SystemTime) -> String {
    OffsetDateTime::from(modified)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "-".to_string())
}

fn write_line(out: &mut impl Write, line: &str) -> io::Result<bool> {
    match writeln!(out, "{line}") {
        Ok(()) => Ok(true),
        Err(error) if error.kind() == io::ErrorKind::BrokenPipe => Ok(false),
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn parse_defaults_to_full_listing_when_no_args() {
        let parsed = parse_invocation(&args(&["cxsweep"])).expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command(CliCommand::List {
                section: None,
                size: false
            })
        );
    }

    #[test]
    fn parse_help_flag_wins() {
        let parsed = parse_invocation(&args(&["cxsweep", "list", "--help"])).expect("parse");
        assert_eq!(parsed, CliInvocation::PrintHelp);
    }

    #[test]
    fn parse_list_section_and_size_flags() {
        let parsed =
            parse_invocation(&args(&["cxsweep", "list", "--archived", "--size"])).expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command(CliCommand::List {
                section: Some(RootKind::Archived),
                size: true
            })
        );
    }

    #[test]
    fn parse_list_live_section() {
        let parsed = parse_invocation(&args(&["cxsweep", "list", "--live"])).expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command(CliCommand::List {
                section: Some(RootKind::Live),
                size: false
            })
        );
    }

    #[test]
    fn parse_delete_requires_a_path() {
        let parsed = parse_invocation(&args(&["cxsweep", "delete", "/tmp/s.jsonl"])).expect("parse");
        assert_eq!(
            parsed,
            CliInvocation::Command(CliCommand::Delete {
                path: PathBuf::from("/tmp/s.jsonl")
            })
        );

        let error = parse_invocation(&args(&["cxsweep", "delete"])).expect_err("must fail");
        assert!(matches!(error, CliParseError::MissingArgument("path")));
    }

    #[test]
    fn parse_rejects_unknown_subcommands_and_flags() {
        assert!(matches!(
            parse_invocation(&args(&["cxsweep", "prune"])),
            Err(CliParseError::UnknownSubcommand(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["cxsweep", "list", "--bogus"])),
            Err(CliParseError::UnknownFlag(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["cxsweep", "list", "extra"])),
            Err(CliParseError::UnexpectedArgument(_))
        ));
    }
}
