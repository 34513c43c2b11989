// SPDX-License-Identifier: MIT
//
// scriptwriter: a bilingual Tamil / English script editor.
//
// This binary wires the sw-engine core to the Python ML toolkit and drives
// it from a line-oriented prompt:
//
//   sw-engine → buffer, history, suggestion session, mutation coordinator
//   bridge    → subprocess adapters (transliteration, speech, generation)
//   command   → `:` command parsing
//
// Each input line flows through:
//
//   stdin → type_char per char + '\n' → lookups spawned on tokio
//   lookup done → Editor::apply_suggestion → document printed
//
// Lines starting with `:` are commands (see command.rs).

mod bridge;
mod command;

use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use sw_engine::options::parse_set;
use sw_engine::{Editor, EditorEvent, EditorHandle, Resolution, Selection, Span};

use crate::bridge::PythonBridge;
use crate::command::{Command, HELP, parse_command};

// ─── Arguments ──────────────────────────────────────────────────────────────

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "scriptwriter")]
#[command(about = "Bilingual script editor with live Tamil transliteration")]
struct Args {
    /// Script file to open (created on first save if missing)
    file: Option<PathBuf>,

    /// Python interpreter that runs the ML toolkit
    #[arg(long, env = "SCRIPTWRITER_PYTHON", default_value = "python3")]
    python: String,

    /// Directory containing the `scriptwriter_ml` package
    #[arg(long, env = "SCRIPTWRITER_ML_ROOT", value_name = "DIR")]
    ml_root: Option<PathBuf>,

    /// Per-request timeout for the ML toolkit
    #[arg(long, default_value_t = 4000, value_name = "MS")]
    timeout_ms: u64,

    /// Log filter, e.g. `sw_engine=debug` (overrides RUST_LOG)
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

// ─── Session ────────────────────────────────────────────────────────────────

enum Flow {
    Continue,
    Quit,
}

/// The interactive session: one editor plus the file it came from.
struct Session {
    handle: EditorHandle,
    path: Option<PathBuf>,
}

impl Session {
    async fn run(&mut self) -> anyhow::Result<()> {
        println!("{}", self.render());
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await.context("reading stdin")? {
            if let Some(cmd) = line.strip_prefix(':') {
                match self.execute(parse_command(cmd)).await {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    Err(msg) => eprintln!("E: {msg}"),
                }
            } else {
                let mut tasks = self.handle.type_str(&line);
                tasks.extend(self.handle.type_char('\n'));
                settle(tasks).await;
            }
            println!("{}", self.render());
        }
        Ok(())
    }

    async fn execute(&mut self, command: Command) -> Result<Flow, String> {
        match command {
            Command::Quit => return Ok(Flow::Quit),
            Command::WriteQuit => {
                self.save(None)?;
                return Ok(Flow::Quit);
            }
            Command::Write(path) => self.save(path)?,
            Command::Undo => self.handle.undo().map_err(|e| e.to_string())?,
            Command::Redo => self.handle.redo().map_err(|e| e.to_string())?,
            Command::Alternate(n) => {
                let alternates = self.handle.with_editor(|ed| ed.alternates().to_vec());
                let choice = alternates
                    .get(n - 1)
                    .ok_or_else(|| format!("no alternate {n}"))?;
                self.handle.select_alternate(choice);
            }
            Command::Backspace(n) => {
                for _ in 0..n {
                    if !self.handle.delete_backward() {
                        break;
                    }
                }
            }
            Command::Select(start, end) => self.handle.set_selection(Span::ordered(start, end)),
            Command::Voice => {
                let task = self.handle.dictate().await.map_err(|e| e.to_string())?;
                settle(task).await;
            }
            Command::Generate(prompt) => {
                self.handle.generate(&prompt).await.map_err(|e| e.to_string())?;
            }
            Command::Speak => self.handle.speak().await.map_err(|e| e.to_string())?,
            Command::Set(args) => {
                for directive in parse_set(&args) {
                    let shown = self
                        .handle
                        .with_editor(|ed| ed.options_mut().apply(&directive))
                        .map_err(|e| e.to_string())?;
                    if let Some(text) = shown {
                        println!("{text}");
                    }
                }
            }
            Command::Show => {}
            Command::Help => println!("{HELP}"),
            Command::Unknown(input) => return Err(format!("not a command: {input}")),
        }
        Ok(Flow::Continue)
    }

    fn save(&mut self, path: Option<PathBuf>) -> Result<(), String> {
        if path.is_some() {
            self.path = path;
        }
        let path = self.path.as_ref().ok_or("no file name")?;
        let content = self.handle.current_content();
        std::fs::write(path, &content).map_err(|e| format!("{}: {e}", path.display()))?;
        info!(path = %path.display(), chars = content.chars().count(), "written");
        println!("\"{}\" written", path.display());
        Ok(())
    }

    fn render(&self) -> String {
        let (content, selection, alternates) = self.handle.with_editor(|ed| {
            (
                ed.current_content(),
                ed.current_selection(),
                ed.alternates().to_vec(),
            )
        });
        let mut out = mark_selection(&content, selection);
        if !alternates.is_empty() {
            let list: Vec<String> = alternates
                .iter()
                .enumerate()
                .map(|(i, alt)| format!("{}) {alt}", i + 1))
                .collect();
            out.push_str("\n  alternates: ");
            out.push_str(&list.join("  "));
        }
        out
    }
}

/// Wait for spawned lookups so the next print shows their outcome.
async fn settle(tasks: impl IntoIterator<Item = JoinHandle<Resolution>>) {
    for task in tasks {
        match task.await {
            Ok(resolution) => debug!(?resolution, "lookup settled"),
            Err(err) => warn!(%err, "lookup task failed"),
        }
    }
}

/// Render `content` with the caret as `|` or the selection in `[...]`.
fn mark_selection(content: &str, selection: Selection) -> String {
    let mut out = String::with_capacity(content.len() + 2);
    for (i, ch) in content.chars().enumerate() {
        if i == selection.start {
            out.push(if selection.is_empty() { '|' } else { '[' });
        }
        if i == selection.end && !selection.is_empty() {
            out.push(']');
        }
        out.push(ch);
    }
    let len = content.chars().count();
    if selection.start == len {
        out.push(if selection.is_empty() { '|' } else { '[' });
    }
    if selection.end == len && !selection.is_empty() {
        out.push(']');
    }
    out
}

// ─── Entry ──────────────────────────────────────────────────────────────────

const DEFAULT_LOG_FILTER: &str = "info";

/// `--log` wins over `RUST_LOG`, which wins over the default.
fn log_directive(cli: Option<&str>, env: Option<String>) -> String {
    cli.map(str::to_owned)
        .or(env)
        .filter(|d| !d.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned())
}

fn setup_tracing(filter: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let directive = log_directive(filter, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|err| {
        eprintln!("invalid log filter {directive:?}: {err}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open(path: Option<&PathBuf>) -> anyhow::Result<Editor> {
    let mut editor = Editor::new();
    if let Some(path) = path {
        match std::fs::read_to_string(path) {
            Ok(text) => editor.load(&text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "new file");
            }
            Err(err) => {
                return Err(err).with_context(|| format!("opening {}", path.display()));
            }
        }
    }
    editor.on_event(|event| match event {
        EditorEvent::SuggestionChanged(range) => debug!(?range, "suggestion range changed"),
        EditorEvent::LookupFailed(reason) => eprintln!("{reason}; kept literal text"),
    });
    Ok(editor)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    setup_tracing(args.log.as_deref());

    let cwd = std::env::current_dir().context("reading current directory")?;
    let ml_root = PythonBridge::locate_ml_root(args.ml_root.clone(), &cwd);
    if ml_root.is_none() {
        warn!("ML toolkit not found; set SCRIPTWRITER_ML_ROOT to the ml directory");
    }
    let bridge = Arc::new(PythonBridge::new(
        args.python.clone(),
        ml_root,
        Duration::from_millis(args.timeout_ms),
    ));

    let editor = open(args.file.as_ref())?;
    let handle = EditorHandle::new(editor, bridge.clone())
        .with_recognizer(bridge.clone())
        .with_synthesizer(bridge.clone())
        .with_generator(bridge);

    let mut session = Session {
        handle,
        path: args.file,
    };
    session.run().await
}

// ─── Tests ──────────────────────────────────────────────────────────────────
