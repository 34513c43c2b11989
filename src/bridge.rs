// SPDX-License-Identifier: MIT
//
// Subprocess adapters: the ML toolkit runs as a Python CLI, one process per
// request. Every call writes its input on stdin, reads one JSON document
// from stdout, and is killed if it outlives the configured timeout.
//
//   transliterate --stdin                → {"candidates": [...], "notes": [...]}
//   transcribe-mic --duration N --language L → {"text", "success", "error"}
//   tts --stdin --language L             → {"success", "error"}
//   -c <draft script>  (stdin: {"prompt", "context"}) → {"response", "error"}

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use sw_engine::adapter::{
    Generation, SpeechRecognizer, SpeechSynthesizer, Synthesis, TextGenerator, Transcription,
    Transliterator,
};
use sw_engine::error::AdapterError;

const CLI_MODULE: &str = "scriptwriter_ml.cli";
const PACKAGE_DIR: &str = "scriptwriter_ml";

/// How many parent directories to search for an `ml/` toolkit checkout.
const ML_SEARCH_DEPTH: usize = 5;

const DRAFT_SCRIPT: &str = r#"
import json, sys
from scriptwriter_ml.llm import draft_scene
req = json.load(sys.stdin)
result = draft_scene(prompt=req["prompt"], context=req["context"])
print(json.dumps({"response": result.response, "error": result.error}, ensure_ascii=False))
"#;

// ─── Wire shapes ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TransliterationReply {
    #[serde(default)]
    candidates: Vec<String>,
    #[serde(default)]
    notes: Vec<String>,
}

#[derive(Serialize)]
struct DraftRequest<'a> {
    prompt: &'a str,
    context: &'a str,
}

// ─── Bridge ─────────────────────────────────────────────────────────────────

/// Runs the Python ML toolkit as a subprocess per request.
#[derive(Debug, Clone)]
pub struct PythonBridge {
    python: String,
    ml_root: Option<PathBuf>,
    timeout: Duration,
}

impl PythonBridge {
    pub const fn new(python: String, ml_root: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            python,
            ml_root,
            timeout,
        }
    }

    /// Use `explicit` if given, otherwise search `start` and its parents for
    /// an `ml/` directory holding the toolkit package.
    pub fn locate_ml_root(explicit: Option<PathBuf>, start: &Path) -> Option<PathBuf> {
        let candidates = explicit.into_iter().chain(
            start
                .ancestors()
                .take(ML_SEARCH_DEPTH)
                .map(|dir| dir.join("ml")),
        );
        for candidate in candidates {
            if candidate.join(PACKAGE_DIR).is_dir() {
                return Some(candidate.canonicalize().unwrap_or(candidate));
            }
        }
        None
    }

    fn python(&self) -> Command {
        let mut command = Command::new(&self.python);
        if let Some(root) = &self.ml_root {
            command.env("PYTHONPATH", root);
        }
        command
    }

    fn cli(&self, subcommand: &str) -> Command {
        let mut command = self.python();
        command.arg("-m").arg(CLI_MODULE).arg(subcommand);
        command
    }

    /// Run `command`, feed it `input`, and return its stdout.
    async fn exec(&self, mut command: Command, input: Option<&str>) -> Result<Vec<u8>, AdapterError> {
        command
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        tracing::trace!(?command, "spawning ml bridge");

        let mut child = command.spawn()?;
        let run = async {
            if let (Some(text), Some(mut stdin)) = (input, child.stdin.take()) {
                stdin.write_all(text.as_bytes()).await?;
                // Closing stdin tells the CLI the request is complete.
                drop(stdin);
            }
            child.wait_with_output().await
        };

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| AdapterError::TimedOut)??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AdapterError::Failed(format!(
                "ml bridge exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }

    async fn exec_json<T: for<'de> Deserialize<'de>>(
        &self,
        command: Command,
        input: Option<&str>,
    ) -> Result<T, AdapterError> {
        let stdout = self.exec(command, input).await?;
        serde_json::from_slice(&stdout).map_err(|err| AdapterError::Malformed(err.to_string()))
    }
}

// ─── Adapter impls ──────────────────────────────────────────────────────────

#[async_trait]
impl Transliterator for PythonBridge {
    async fn lookup(&self, word: &str) -> Result<Vec<String>, AdapterError> {
        if word.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut command = self.cli("transliterate");
        command.arg("--stdin");
        let reply: TransliterationReply = self.exec_json(command, Some(word)).await?;
        for note in &reply.notes {
            tracing::warn!(word, note = note.as_str(), "transliteration note");
        }
        Ok(reply.candidates)
    }
}

#[async_trait]
impl SpeechRecognizer for PythonBridge {
    async fn transcribe(
        &self,
        duration_secs: u32,
        language: &str,
    ) -> Result<Transcription, AdapterError> {
        let mut command = self.cli("transcribe-mic");
        command
            .arg("--duration")
            .arg(duration_secs.to_string())
            .arg("--language")
            .arg(language);
        // Recording alone takes `duration_secs`.
        let bridge = Self {
            timeout: self.timeout + Duration::from_secs(u64::from(duration_secs)),
            ..self.clone()
        };
        bridge.exec_json(command, None).await
    }
}

#[async_trait]
impl SpeechSynthesizer for PythonBridge {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Synthesis, AdapterError> {
        let mut command = self.cli("tts");
        command.arg("--stdin").arg("--language").arg(language);
        self.exec_json(command, Some(text)).await
    }
}

#[async_trait]
impl TextGenerator for PythonBridge {
    async fn generate(&self, prompt: &str, context: &str) -> Result<Generation, AdapterError> {
        let request = serde_json::to_string(&DraftRequest { prompt, context })
            .map_err(|err| AdapterError::Malformed(err.to_string()))?;
        let mut command = self.python();
        command.arg("-c").arg(DRAFT_SCRIPT);
        self.exec_json(command, Some(&request)).await
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
