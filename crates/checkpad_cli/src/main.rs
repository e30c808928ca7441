//! Script replay entry point.
//!
//! # Responsibility
//! - Drive one `EditingSession` from a line-oriented keystroke script.
//! - Act as the host: track focus, apply caret requests, print the
//!   rendered document.
//!
//! Script commands, one per line (`#` starts a comment):
//! `type <text>`, `enter`, `escape`, `focus <n>|text`, `check <n>`,
//! `bold`, `italic`, `underline`, `show`.

use checkpad_core::db::open_db;
use checkpad_core::{
    default_log_level, init_logging, CaretAnchor, CaretSurface, CaretTarget, CaretUnavailable,
    EditOutcome, EditingSession, EditorConfig, Field, FormatCommand, FormattingHost, Key,
    KeyValueStore, MemoryStore, PreTriggerText, SqliteStore,
};
use clap::Parser;
use log::warn;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "checkpad", version, about = "Replay an editing script through the checklist editor")]
struct Args {
    /// SQLite file used as the key-value store; in-memory when omitted.
    #[arg(long)]
    db: Option<PathBuf>,
    /// Absolute directory for rotating log files; logging is off when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[arg(long, default_value_t = default_log_level().to_string())]
    log_level: String,
    /// Move text typed before the trigger into the first item.
    #[arg(long)]
    seed_first_item: bool,
    /// Script file; read from stdin when omitted.
    script: Option<PathBuf>,
}

/// Stand-in for the browser selection: the caret lands on the focused field.
struct ReplaySurface {
    focus: Field,
}

impl CaretSurface for ReplaySurface {
    fn place_caret(&mut self, target: &CaretTarget) -> Result<(), CaretUnavailable> {
        self.focus = match &target.anchor {
            CaretAnchor::Item(id) => Field::Item(id.clone()),
            CaretAnchor::Block(block) => Field::FreeText(*block),
        };
        Ok(())
    }
}

struct EchoFormatter;

impl FormattingHost for EchoFormatter {
    fn apply_text_style(&mut self, command: FormatCommand) -> bool {
        println!("(format {command})");
        true
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("checkpad: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), String> {
    if let Some(log_dir) = &args.log_dir {
        init_logging(&args.log_level, &log_dir.to_string_lossy())?;
    }

    let script = read_script(args.script.as_ref())?;
    let config = EditorConfig {
        pre_trigger_text: if args.seed_first_item {
            PreTriggerText::SeedFirstItem
        } else {
            PreTriggerText::KeepAsFreeText
        },
        ..EditorConfig::default()
    };

    match &args.db {
        Some(path) => {
            let conn = open_db(path).map_err(|err| err.to_string())?;
            replay(SqliteStore::new(&conn), config, &script)
        }
        None => replay(MemoryStore::new(), config, &script),
    }
}

fn read_script(path: Option<&PathBuf>) -> Result<String, String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|err| format!("cannot read `{}`: {err}", path.display())),
        None => {
            let mut script = String::new();
            io::stdin()
                .lock()
                .read_to_string(&mut script)
                .map_err(|err| format!("cannot read stdin: {err}"))?;
            Ok(script)
        }
    }
}

fn replay<S: KeyValueStore>(store: S, config: EditorConfig, script: &str) -> Result<(), String> {
    let mut session = EditingSession::open(store, config).map_err(|err| err.to_string())?;
    let mut surface = ReplaySurface {
        focus: Field::FreeText(session.active_text()),
    };

    for (line_no, line) in script.lines().enumerate() {
        // Trailing spaces are significant: `type [] ` completes the trigger.
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let outcome = match command {
            "type" => type_text(&mut session, &surface.focus, rest),
            "enter" => {
                let outcome = session.on_key_down(Key::Enter, &surface.focus);
                if outcome == EditOutcome::PassThrough {
                    type_text(&mut session, &surface.focus, "\n")
                } else {
                    outcome
                }
            }
            "escape" => session.on_key_down(Key::Escape, &surface.focus),
            "focus" => {
                surface.focus = focus_target(&session, rest.trim())
                    .ok_or_else(|| format!("line {}: no field `{}`", line_no + 1, rest.trim()))?;
                EditOutcome::Unchanged
            }
            "check" => {
                let item = item_at(&session, rest.trim())
                    .ok_or_else(|| format!("line {}: no item `{}`", line_no + 1, rest.trim()))?;
                let id = session.document().items()[item].id.clone();
                let checked = session.document().items()[item].checked;
                session.on_checkbox_change(&id, !checked)
            }
            "show" => {
                print!("{}", session.view());
                println!("--");
                EditOutcome::Unchanged
            }
            other => match FormatCommand::parse(other) {
                Some(format) => {
                    session.apply_format(&mut EchoFormatter, format);
                    EditOutcome::Unchanged
                }
                None => return Err(format!("line {}: unknown command `{other}`", line_no + 1)),
            },
        };

        if outcome == EditOutcome::Changed {
            session.flush_caret(&mut surface);
        }
    }

    print!("{}", session.view());
    Ok(())
}

/// Appends `text` to the focused field, as the host would after a keystroke.
fn type_text<S: KeyValueStore>(
    session: &mut EditingSession<S>,
    focus: &Field,
    text: &str,
) -> EditOutcome {
    let current = match focus {
        Field::FreeText(block) => session.document().free_text(*block).map(str::to_string),
        Field::Item(id) => session.document().item(id).map(|item| item.text.clone()),
    };
    let Some(mut content) = current else {
        warn!("event=replay_type module=cli status=skipped reason=focus_gone");
        return EditOutcome::Unchanged;
    };
    content.push_str(text);
    session.on_input(focus, &content)
}

fn focus_target<S: KeyValueStore>(session: &EditingSession<S>, target: &str) -> Option<Field> {
    if target == "text" {
        return Some(Field::FreeText(session.active_text()));
    }
    let index = item_at(session, target)?;
    Some(Field::Item(session.document().items()[index].id.clone()))
}

/// Resolves a 1-based item number to an index.
fn item_at<S: KeyValueStore>(session: &EditingSession<S>, value: &str) -> Option<usize> {
    let number: usize = value.parse().ok()?;
    (1..=session.document().items().len())
        .contains(&number)
        .then(|| number - 1)
}
