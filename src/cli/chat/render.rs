use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};

use crate::conversation_state::{ConversationState, Role, Turn, TurnBody};

pub const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn render_turn<W: Write>(out: &mut W, turn: &Turn) -> io::Result<()> {
    let stamp = turn.at.format("%H:%M");
    match (turn.role, &turn.body) {
        (Role::User, body) => {
            writeln!(out, "{} {}", "You".bold().cyan(), stamp.to_string().dark_grey())?;
            writeln!(out, "{}", body.display_text())?;
        }
        (Role::Assistant, TurnBody::Content { text }) => {
            writeln!(out, "{} {}", "Guide".bold().green(), stamp.to_string().dark_grey())?;
            writeln!(out, "{}", text)?;
        }
        (Role::Assistant, body @ TurnBody::Error { .. }) => {
            writeln!(out, "{} {}", "Guide".bold().green(), stamp.to_string().dark_grey())?;
            writeln!(out, "{}", body.display_text().red())?;
        }
    }
    writeln!(out)
}

/// Clears the screen and draws the whole conversation again.
pub fn render_conversation<W: Write>(out: &mut W, conversation: &ConversationState) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    for turn in conversation.turns() {
        render_turn(out, turn)?;
    }
    out.flush()
}

pub fn render_thinking<W: Write>(out: &mut W, frame: usize) -> io::Result<()> {
    write!(out, "\r{} Thinking...", SPINNER[frame % SPINNER.len()])?;
    out.flush()
}

pub fn clear_line<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(out, Clear(ClearType::CurrentLine))?;
    write!(out, "\r")?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation_state::ErrorKind;

    fn rendered(turn: &Turn) -> String {
        let mut out = Vec::new();
        render_turn(&mut out, turn).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn roles_are_labelled() {
        assert!(rendered(&Turn::user("hello")).contains("You"));
        assert!(rendered(&Turn::assistant(TurnBody::content("hi"))).contains("Guide"));
    }

    #[test]
    fn errors_show_marker() {
        let turn = Turn::assistant(TurnBody::error(ErrorKind::Network, "connection refused"));
        assert!(rendered(&turn).contains("An error occurred: connection refused"));
    }

    #[test]
    fn conversation_renders_every_turn_in_order() {
        let mut conversation = ConversationState::new();
        conversation.push(Turn::user("first question"));
        conversation.push(Turn::assistant(TurnBody::content("first answer")));

        let mut out = Vec::new();
        render_conversation(&mut out, &conversation).unwrap();
        let text = String::from_utf8(out).unwrap();

        let q = text.find("first question").unwrap();
        let a = text.find("first answer").unwrap();
        assert!(q < a);
    }
}
