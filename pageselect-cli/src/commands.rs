//! Line commands accepted on stdin.

use std::str::FromStr;

use pageselect_lib::model::PageNumber;
use pageselect_lib::model::RecordId;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  page <n>             go to page n (1-based)
  next | prev          go to the following / preceding page
  toggle <id> on|off   select or deselect one row
  all on|off           select or deselect every row on this page
  first <n>            select the first n rows of the dataset
  clear                deselect everything
  show                 list the current page
  selected             list selected ids
  pending              list pages still waiting for a bulk selection
  help                 show this message
  quit                 exit";

/// An inbound UI event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Page(PageNumber),
    Next,
    Prev,
    Toggle(RecordId, bool),
    All(bool),
    First(usize),
    Clear,
    Show,
    Selected,
    Pending,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} expects {1}")]
    Usage(&'static str, &'static str),
    #[error("not a number: {0}")]
    NotANumber(String),
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };
        let args: Vec<&str> = words.collect();

        let command = match (name, args.as_slice()) {
            ("page", [n]) => {
                let page = PageNumber::new(number(n)?).ok_or(CommandError::Usage("page", "a number of at least 1"))?;
                Command::Page(page)
            }
            ("page", _) => return Err(CommandError::Usage("page", "a page number")),
            ("next", []) => Command::Next,
            ("prev", []) => Command::Prev,
            ("toggle", [id, state]) => Command::Toggle(RecordId(number(id)?), on_off("toggle", state)?),
            ("toggle", _) => return Err(CommandError::Usage("toggle", "an id and on|off")),
            ("all", [state]) => Command::All(on_off("all", state)?),
            ("all", _) => return Err(CommandError::Usage("all", "on|off")),
            // a negative or unparsable count selects nothing
            ("first", [n]) => Command::First(n.parse().unwrap_or(0)),
            ("first", _) => return Err(CommandError::Usage("first", "a row count")),
            ("clear", []) => Command::Clear,
            ("show", []) => Command::Show,
            ("selected", []) => Command::Selected,
            ("pending", []) => Command::Pending,
            ("help" | "?", _) => Command::Help,
            ("quit" | "exit" | "q", _) => Command::Quit,
            (other, _) => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn number<T: FromStr>(raw: &str) -> Result<T, CommandError> {
    raw.parse().map_err(|_| CommandError::NotANumber(raw.to_string()))
}

fn on_off(command: &'static str, raw: &str) -> Result<bool, CommandError> {
    match raw {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        _ => Err(CommandError::Usage(command, "on|off")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(Command::parse("   "), Ok(None));
    }

    #[test]
    fn test_page() {
        assert_eq!(
            Command::parse("page 3"),
            Ok(Some(Command::Page(PageNumber::new(3).unwrap())))
        );
        assert!(matches!(Command::parse("page 0"), Err(CommandError::Usage("page", _))));
        assert_eq!(
            Command::parse("page x"),
            Err(CommandError::NotANumber("x".to_string()))
        );
    }

    #[test]
    fn test_toggle() {
        assert_eq!(
            Command::parse("toggle 27992 on"),
            Ok(Some(Command::Toggle(RecordId(27992), true)))
        );
        assert_eq!(
            Command::parse("toggle 18446744073709551615 off"),
            Ok(Some(Command::Toggle(RecordId(u64::MAX), false)))
        );
        assert_eq!(
            Command::parse("toggle -3 on"),
            Err(CommandError::NotANumber("-3".to_string()))
        );
        assert_eq!(
            Command::parse("toggle 27992 maybe"),
            Err(CommandError::Usage("toggle", "on|off"))
        );
    }

    #[test]
    fn test_first_tolerates_bad_counts() {
        assert_eq!(Command::parse("first 30"), Ok(Some(Command::First(30))));
        assert_eq!(Command::parse("first -4"), Ok(Some(Command::First(0))));
        assert_eq!(Command::parse("first"), Err(CommandError::Usage("first", "a row count")));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(
            Command::parse("dance"),
            Err(CommandError::Unknown("dance".to_string()))
        );
    }
}
