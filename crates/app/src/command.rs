use std::fmt;

use exam_core::model::{ExamId, OPTION_COUNT};
use services::Phase;

/// A line of terminal input, interpreted for the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    // Dashboard
    Catalog,
    Start(ExamId),
    Generate(String),
    History(Option<ExamId>),
    // InExam
    Select(usize),
    Next,
    Previous,
    Goto(i64),
    Status,
    Submit,
    Abandon,
    // Result
    Review,
    Feedback,
    Dashboard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown { phase: Phase, input: String },
    MissingArgument { command: &'static str },
    InvalidNumber { raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "type `help` for commands"),
            CommandError::Unknown { phase, input } => {
                write!(f, "unknown command in {phase:?}: {input}")
            }
            CommandError::MissingArgument { command } => write!(f, "{command} requires a value"),
            CommandError::InvalidNumber { raw } => write!(f, "not a number: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl Command {
    /// Parse `line` against the commands valid in `phase`.
    pub fn parse(phase: Phase, line: &str) -> Result<Self, CommandError> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(w, r)| (w, r.trim()));
        let word = word.to_ascii_lowercase();

        if phase == Phase::InExam && rest.is_empty() {
            if let Some(index) = option_index(&word) {
                return Ok(Command::Select(index));
            }
        }

        match (word.as_str(), phase) {
            ("", _) => Err(CommandError::Empty),
            ("help" | "?", _) => Ok(Command::Help),
            ("quit" | "exit", _) => Ok(Command::Quit),

            ("list" | "catalog", Phase::Dashboard) => Ok(Command::Catalog),
            ("start", Phase::Dashboard) => Ok(Command::Start(exam_id(rest, "start")?)),
            ("generate" | "gen", Phase::Dashboard) => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "generate",
                    });
                }
                Ok(Command::Generate(rest.to_string()))
            }
            ("history", Phase::Dashboard) => {
                let filter = if rest.is_empty() {
                    None
                } else {
                    Some(exam_id(rest, "history")?)
                };
                Ok(Command::History(filter))
            }

            ("n" | "next", Phase::InExam) => Ok(Command::Next),
            ("p" | "prev" | "previous", Phase::InExam) => Ok(Command::Previous),
            ("goto" | "g", Phase::InExam) => {
                let number = number(rest, "goto")?;
                Ok(Command::Goto(number.saturating_sub(1)))
            }
            ("status" | "s", Phase::InExam) => Ok(Command::Status),
            ("submit", Phase::InExam) => Ok(Command::Submit),
            ("abandon", Phase::InExam) => Ok(Command::Abandon),

            ("review", Phase::Result) => Ok(Command::Review),
            ("feedback" | "coach", Phase::Result) => Ok(Command::Feedback),
            ("back" | "dashboard", Phase::Result) => Ok(Command::Dashboard),

            _ => Err(CommandError::Unknown {
                phase,
                input: line.to_string(),
            }),
        }
    }
}

/// `a`-`d` or `1`-`4` to a zero-based option index.
fn option_index(choice: &str) -> Option<usize> {
    let mut chars = choice.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    let index = match c {
        'a'..='z' => usize::from(c as u8 - b'a'),
        '1'..='9' => usize::from(c as u8 - b'1'),
        _ => return None,
    };
    (index < OPTION_COUNT).then_some(index)
}

fn number(raw: &str, command: &'static str) -> Result<i64, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument { command });
    }
    raw.parse().map_err(|_| CommandError::InvalidNumber {
        raw: raw.to_string(),
    })
}

fn exam_id(raw: &str, command: &'static str) -> Result<ExamId, CommandError> {
    if raw.is_empty() {
        return Err(CommandError::MissingArgument { command });
    }
    raw.parse().map_err(|_| CommandError::InvalidNumber {
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_depend_on_phase() {
        assert_eq!(
            Command::parse(Phase::Dashboard, "start 2"),
            Ok(Command::Start(ExamId::new(2)))
        );
        assert!(matches!(
            Command::parse(Phase::InExam, "start 2"),
            Err(CommandError::Unknown { .. })
        ));
        assert_eq!(Command::parse(Phase::Result, "back"), Ok(Command::Dashboard));
        assert_eq!(Command::parse(Phase::InExam, "QUIT"), Ok(Command::Quit));
    }

    #[test]
    fn options_accept_letters_and_digits() {
        assert_eq!(Command::parse(Phase::InExam, "b"), Ok(Command::Select(1)));
        assert_eq!(Command::parse(Phase::InExam, "4"), Ok(Command::Select(3)));
        assert!(Command::parse(Phase::InExam, "e").is_err());
        assert!(Command::parse(Phase::InExam, "0").is_err());
    }

    #[test]
    fn goto_is_one_based() {
        assert_eq!(Command::parse(Phase::InExam, "goto 3"), Ok(Command::Goto(2)));
        assert_eq!(Command::parse(Phase::InExam, "g -4"), Ok(Command::Goto(-5)));
        assert_eq!(
            Command::parse(Phase::InExam, "goto x"),
            Err(CommandError::InvalidNumber { raw: "x".into() })
        );
    }

    #[test]
    fn generate_keeps_the_whole_topic() {
        assert_eq!(
            Command::parse(Phase::Dashboard, "generate  Rust async   runtimes "),
            Ok(Command::Generate("Rust async   runtimes".into()))
        );
        assert_eq!(
            Command::parse(Phase::Dashboard, "generate"),
            Err(CommandError::MissingArgument {
                command: "generate"
            })
        );
        assert_eq!(Command::parse(Phase::Dashboard, "   "), Err(CommandError::Empty));
    }

    #[test]
    fn history_takes_an_optional_filter() {
        assert_eq!(
            Command::parse(Phase::Dashboard, "history"),
            Ok(Command::History(None))
        );
        assert_eq!(
            Command::parse(Phase::Dashboard, "history 1"),
            Ok(Command::History(Some(ExamId::new(1))))
        );
    }
}
