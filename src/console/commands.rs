//! Console command parsing

/// A line of user input, decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ConsoleCommand {
    /// Play or pause
    TogglePlay,
    /// Stop and rewind
    Reset,
    /// Click a word to edit it
    Select(usize),
    /// Type into the open editor
    Type(String),
    /// Press the editor's save button
    Save,
    /// Click outside everything
    Away,
    /// Redraw the full frame
    Show,
    Help,
    Quit,
}

/// Command parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum CommandError {
    #[error("Unknown command: {0} (type 'help' for commands)")]
    Unknown(String),

    #[error("'{0}' needs a word number")]
    MissingIndex(String),

    #[error("Not a word number: {0}")]
    InvalidIndex(String),
}

pub(crate) const HELP: &str = "\
Commands:
  play | p | pause     play or pause
  reset | r            stop and rewind to 0.0s
  click <n>            edit word number n (pauses playback)
  type <text>          replace the draft of the word being edited
  save | s             save the draft into the transcript
  away                 click outside the editor (discards the draft)
  show                 redraw
  help | h             this text
  quit | q             exit";

/// Parse one input line. Returns `Ok(None)` for blank lines.
pub(crate) fn parse_command(line: &str) -> Result<Option<ConsoleCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "play" | "p" | "pause" => ConsoleCommand::TogglePlay,
        "reset" | "r" => ConsoleCommand::Reset,
        "click" | "select" => ConsoleCommand::Select(parse_index(verb, rest)?),
        // The draft may legitimately be empty
        "type" => ConsoleCommand::Type(rest.to_string()),
        "save" | "s" => ConsoleCommand::Save,
        "away" => ConsoleCommand::Away,
        "show" => ConsoleCommand::Show,
        "help" | "h" | "?" => ConsoleCommand::Help,
        "quit" | "q" | "exit" => ConsoleCommand::Quit,
        _ => return Err(CommandError::Unknown(verb.to_string())),
    };

    Ok(Some(command))
}

fn parse_index(verb: &str, arg: &str) -> Result<usize, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::MissingIndex(verb.to_string()));
    }
    arg.parse()
        .map_err(|_| CommandError::InvalidIndex(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("play"), Ok(Some(ConsoleCommand::TogglePlay)));
        assert_eq!(parse_command(" P "), Ok(Some(ConsoleCommand::TogglePlay)));
        assert_eq!(parse_command("reset"), Ok(Some(ConsoleCommand::Reset)));
        assert_eq!(parse_command("s"), Ok(Some(ConsoleCommand::Save)));
        assert_eq!(parse_command("away"), Ok(Some(ConsoleCommand::Away)));
        assert_eq!(parse_command("q"), Ok(Some(ConsoleCommand::Quit)));
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_parse_click() {
        assert_eq!(parse_command("click 3"), Ok(Some(ConsoleCommand::Select(3))));
        assert_eq!(parse_command("select  0"), Ok(Some(ConsoleCommand::Select(0))));
        assert_eq!(
            parse_command("click"),
            Err(CommandError::MissingIndex("click".to_string()))
        );
        assert_eq!(
            parse_command("click -1"),
            Err(CommandError::InvalidIndex("-1".to_string()))
        );
    }

    #[test]
    fn test_parse_type_keeps_inner_spaces() {
        assert_eq!(
            parse_command("type New York"),
            Ok(Some(ConsoleCommand::Type("New York".to_string())))
        );
        assert_eq!(
            parse_command("type"),
            Ok(Some(ConsoleCommand::Type(String::new())))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse_command("rewind 5"),
            Err(CommandError::Unknown("rewind".to_string()))
        );
    }
}
