// ABOUTME: Line-editing capability shared by the REPL and the readline builtin

use crate::config::HISTORY_FILE;
use crate::error::EvalError;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// History lives in the host temp directory; its contents are not part of
/// program semantics.
pub fn history_path() -> PathBuf {
    std::env::temp_dir().join(HISTORY_FILE)
}

/// Prompt for one line of input. A fresh editor is built per call so the
/// `readline` builtin and the REPL share one history file without sharing
/// editor state.
pub fn read_line(prompt: &str) -> Result<String, EvalError> {
    let mut editor = DefaultEditor::new()
        .map_err(|err| EvalError::runtime_error("readline", err.to_string()))?;
    let _ = editor.load_history(&history_path());
    match editor.readline(prompt) {
        Ok(line) => {
            let _ = editor.add_history_entry(line.as_str());
            let _ = editor.save_history(&history_path());
            Ok(line)
        }
        Err(ReadlineError::Eof | ReadlineError::Interrupted) => {
            Err(EvalError::runtime_error("readline", "input interrupted"))
        }
        Err(err) => Err(EvalError::runtime_error("readline", err.to_string())),
    }
}
