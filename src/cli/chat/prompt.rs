use rustyline::{Config, Editor, Result};

pub const PROMPT: &str = "You > ";

pub fn rl() -> Result<Editor<()>> {
    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(false)
        .build();
    Editor::with_config(config)
}
