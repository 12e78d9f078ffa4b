pub mod prompt;
pub mod render;

use std::io::Write;
use std::process::ExitCode;
use std::time::Duration;

use color_print::cstr;
use eyre::Result;
use prompt::PROMPT;
use rustyline::error::ReadlineError;
use tracing::{debug, error};

use crate::model::CareerModel;
use crate::session::{SessionContext, SessionError};

const WELCOME_TEXT: &str = cstr!(
    "
<bold>🎓 Career Guidance Assistant</bold>
<dim>Your AI companion for career planning and guidance</dim>

This assistant helps students:
• Discover career paths
• Get personalized advice
• Learn about different industries
• Plan skill development

<green>/clear</green>        Clear the chat history
<green>/help</green>         Show the help dialogue
<green>/quit</green>         Quit the application
"
);

const HELP_TEXT: &str = cstr!(
    "
<bold>Career Guidance Assistant</bold>

<green>/clear</green>        Clear the chat history and start a new conversation
<green>/help</green>         Show this help dialogue
<green>/quit</green>         Quit the application
"
);

const SPINNER_INTERVAL: Duration = Duration::from_millis(120);

pub struct ChatContext {
    output: Box<dyn Write>,
    input: Option<String>,
    interactive: bool,
    session: SessionContext,
}

impl ChatContext {
    pub fn new(
        output: Box<dyn Write>,
        input: Option<String>,
        interactive: bool,
        model: CareerModel,
    ) -> Self {
        Self {
            output,
            input,
            interactive,
            session: SessionContext::new(model),
        }
    }

    pub async fn run(&mut self) -> Result<ExitCode> {
        // Handle non-interactive mode (single query)
        if let Some(input) = self.input.take() {
            self.submit(&input).await?;
            if let Some(turn) = self.session.conversation().turns().last() {
                writeln!(self.output, "{}", turn.body.display_text())?;
            }
            return Ok(ExitCode::SUCCESS);
        }

        if self.interactive {
            writeln!(self.output, "{}", WELCOME_TEXT)?;
            self.run_interactive().await?;
        }

        Ok(ExitCode::SUCCESS)
    }

    async fn run_interactive(&mut self) -> Result<()> {
        let mut rl = prompt::rl()?;

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    rl.add_history_entry(line.as_str());

                    if line.trim() == "/quit" {
                        break;
                    }

                    if let Err(e) = self.handle_input(&line).await {
                        error!("Failed to handle input: {}", e);
                        writeln!(self.output, "Error: {}", e)?;
                    }
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(e) => {
                    writeln!(self.output, "Error: {}", e)?;
                    break;
                }
            }
        }

        Ok(())
    }

    async fn handle_input(&mut self, input: &str) -> Result<()> {
        match input.trim() {
            "/help" => {
                writeln!(self.output, "{}", HELP_TEXT)?;
            }
            "/clear" => {
                self.session.reset();
                render::render_conversation(&mut self.output, self.session.conversation())?;
                writeln!(self.output, "Conversation cleared.")?;
            }
            _ => {
                self.submit(input).await?;
                if self.interactive {
                    render::render_conversation(&mut self.output, self.session.conversation())?;
                }
            }
        }

        Ok(())
    }

    /// Runs one exchange while a busy indicator ticks.
    async fn submit(&mut self, input: &str) -> Result<()> {
        let output = &mut self.output;
        let interactive = self.interactive;
        let submit = self.session.submit(input);
        tokio::pin!(submit);

        let mut ticker = tokio::time::interval(SPINNER_INTERVAL);
        let mut frame = 0;
        let result = loop {
            tokio::select! {
                result = &mut submit => break result.map(|turns| turns.len()),
                _ = ticker.tick(), if interactive => {
                    render::render_thinking(&mut *output, frame)?;
                    frame += 1;
                }
            }
        };

        if interactive {
            render::clear_line(&mut *output)?;
        }

        match result {
            Ok(added) => {
                debug!(added, "Exchange complete");
                Ok(())
            }
            Err(SessionError::EmptyInput) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::config::GenerationConfig;
    use crate::test_support::StubClient;

    fn context(input: Option<&str>, interactive: bool) -> ChatContext {
        let model = CareerModel::new(StubClient::echo(), GenerationConfig::default()).unwrap();
        ChatContext::new(
            Box::new(io::sink()),
            input.map(str::to_string),
            interactive,
            model,
        )
    }

    #[tokio::test]
    async fn one_shot_records_both_turns() {
        let mut chat = context(Some("I want to work in IT"), false);
        chat.run().await.unwrap();
        assert_eq!(
            chat.session.conversation().texts(),
            vec!["I want to work in IT", "I want to work in IT"]
        );
    }

    #[tokio::test]
    async fn clear_command_resets_history() {
        let mut chat = context(None, true);
        chat.handle_input("hello").await.unwrap();
        chat.handle_input("again").await.unwrap();
        assert_eq!(chat.session.conversation().len(), 4);

        chat.handle_input("/clear").await.unwrap();
        assert!(chat.session.conversation().is_empty());
    }

    #[tokio::test]
    async fn help_does_not_touch_history() {
        let mut chat = context(None, true);
        chat.handle_input("/help").await.unwrap();
        assert!(chat.session.conversation().is_empty());
    }
}
