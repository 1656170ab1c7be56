//! Where the interactive browser reads its lines from

use async_trait::async_trait;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, EditMode};
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::debug;

/// One line at a time; `None` once input is exhausted or the user hangs up
#[async_trait(?Send)]
pub trait LineSource {
    async fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>>;

    /// True when the source shows the prompt itself
    fn draws_prompt(&self) -> bool {
        false
    }
}

/// Piped or scripted input
pub struct StreamLines<I> {
    lines: Lines<I>,
}

impl<I: AsyncBufRead + Unpin> StreamLines<I> {
    pub fn new(input: I) -> Self {
        Self { lines: input.lines() }
    }
}

#[async_trait(?Send)]
impl<I: AsyncBufRead + Unpin> LineSource for StreamLines<I> {
    async fn read_line(&mut self, _prompt: &str) -> anyhow::Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }
}

/// Terminal line editor with history kept across runs
pub struct EditorLines {
    editor: DefaultEditor,
    history: Option<PathBuf>,
}

impl EditorLines {
    pub fn new(history: Option<PathBuf>) -> anyhow::Result<Self> {
        let config = Config::builder()
            .edit_mode(EditMode::Emacs)
            .auto_add_history(false)
            .build();
        let mut editor = DefaultEditor::with_config(config)?;
        if let Some(path) = &history {
            if let Err(e) = editor.load_history(path) {
                debug!("No browse history loaded from {}: {}", path.display(), e);
            }
        }
        Ok(Self { editor, history })
    }
}

#[async_trait(?Send)]
impl LineSource for EditorLines {
    async fn read_line(&mut self, prompt: &str) -> anyhow::Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                    if let Some(path) = &self.history {
                        if let Err(e) = self.editor.save_history(path) {
                            debug!("Could not save browse history to {}: {}", path.display(), e);
                        }
                    }
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn draws_prompt(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stream_lines_end_with_none() {
        let mut lines = StreamLines::new(&b"next\n\nquit"[..]);
        assert_eq!(lines.read_line("> ").await.unwrap().as_deref(), Some("next"));
        assert_eq!(lines.read_line("> ").await.unwrap().as_deref(), Some(""));
        assert_eq!(lines.read_line("> ").await.unwrap().as_deref(), Some("quit"));
        assert!(lines.read_line("> ").await.unwrap().is_none());
        assert!(!lines.draws_prompt());
    }
}
