use std::io::stdout;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};

use super::input::message_for_event;

const TICK: Duration = Duration::from_millis(250);

impl App {
    /// Open the editor and run until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the terminal cannot be
    /// initialized, or terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let read_scope = crate::perf::scope("app.read_file");
        let source = if self.file_path.exists() {
            std::fs::read_to_string(&self.file_path)
                .with_context(|| format!("Failed to read {}", self.file_path.display()))?
        } else {
            String::new()
        };
        drop(read_scope);

        let model = Model::new(self.file_path.clone(), source, self.theme.clone());
        crate::perf::log_event(
            crate::perf::DebugEvent::AppStart,
            format!(
                "file={} len={}",
                self.file_path.display(),
                model.editor.get_value().len()
            ),
        );

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal: leaf requires an interactive terminal")?;
        let _ = execute!(stdout(), EnableBracketedPaste);
        let result = Self::event_loop(&mut terminal, model);
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();
        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, mut model: Model) -> Result<()> {
        loop {
            terminal.draw(|frame| crate::ui::render(&model, frame))?;
            if model.should_quit {
                break;
            }
            let msg = if event::poll(TICK)? {
                message_for_event(event::read()?)
            } else {
                Some(Message::Tick)
            };
            if let Some(msg) = msg {
                model = update(model, msg);
            }
        }
        // Listener closures hold the preview state; tear down explicitly.
        let Model { editor, .. } = model;
        editor.destroy();
        Ok(())
    }
}
