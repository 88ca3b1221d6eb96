//! Description command grammar.
//!
//! # Responsibility
//! - Recognize one isolated description line as a command.
//! - Split keyword and parameter, resolve keyword aliases.
//! - Reject lines that are not command-shaped or miss a required parameter.
//!
//! # Invariants
//! - A command line starts with `\` and has at least one character after it.
//! - Keywords are case-sensitive.
//! - A required parameter that is empty rejects the line; it is never a no-op.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// First character of every command line.
pub const COMMAND_PREFIX: char = '\\';

/// Parameter substituted for an empty `\start` command.
pub const DEFAULT_START_PARAMETER: &str = "now";

/// Command kinds, independent of the alias that selected them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    Tags,
    Subtask,
    Due,
    Start,
    Priority,
    Color,
}

impl CommandKind {
    /// Canonical keyword, used in diagnostics.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Tags => "tag",
            Self::Subtask => "sub",
            Self::Due => "due",
            Self::Start => "start",
            Self::Priority => "prio",
            Self::Color => "color",
        }
    }
}

/// One parsed command line. Borrows from the line it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// Tag names split on single spaces. Empty names are kept; the tag store drops them.
    Tags(Vec<&'a str>),
    /// Subtask title.
    Subtask(&'a str),
    /// Raw date token for the due date.
    Due(&'a str),
    /// Raw date token for the start date, `now` when the line had none.
    Start(&'a str),
    /// Priority value, not yet checked against project bounds.
    Priority(i64),
    /// Color name or id, not yet resolved.
    Color(&'a str),
}

impl Command<'_> {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Tags(_) => CommandKind::Tags,
            Self::Subtask(_) => CommandKind::Subtask,
            Self::Due(_) => CommandKind::Due,
            Self::Start(_) => CommandKind::Start,
            Self::Priority(_) => CommandKind::Priority,
            Self::Color(_) => CommandKind::Color,
        }
    }
}

/// Why a line was not accepted as a trailing command.
///
/// A rejection ends the reverse scan; the line stays in the description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineRejection {
    /// Line does not start with the prefix or has nothing after it.
    NotACommand,
    /// Keyword after the prefix matches no command alias.
    UnknownKeyword(String),
    /// Command needs a parameter but none follows the keyword.
    MissingParameter(CommandKind),
    /// Priority parameter is not an integer.
    InvalidPriority(String),
    /// Priority lies outside the project's inclusive range.
    PriorityOutOfRange { value: i64, start: i64, end: i64 },
    /// Neither the shortcuts nor the fallback resolver understood the date.
    UnresolvedDate(String),
    /// Color name or id is not in the palette.
    UnknownColor(String),
}

impl LineRejection {
    /// Stable reason code for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotACommand => "not_a_command",
            Self::UnknownKeyword(_) => "unknown_keyword",
            Self::MissingParameter(_) => "missing_parameter",
            Self::InvalidPriority(_) => "invalid_priority",
            Self::PriorityOutOfRange { .. } => "priority_out_of_range",
            Self::UnresolvedDate(_) => "unresolved_date",
            Self::UnknownColor(_) => "unknown_color",
        }
    }
}

impl Display for LineRejection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotACommand => write!(f, "line is not a command"),
            Self::UnknownKeyword(keyword) => write!(f, "unknown command keyword `{keyword}`"),
            Self::MissingParameter(kind) => {
                write!(f, "command `{}` requires a parameter", kind.keyword())
            }
            Self::InvalidPriority(value) => write!(f, "priority `{value}` is not an integer"),
            Self::PriorityOutOfRange { value, start, end } => {
                write!(f, "priority {value} is outside [{start}, {end}]")
            }
            Self::UnresolvedDate(value) => write!(f, "cannot resolve date `{value}`"),
            Self::UnknownColor(value) => write!(f, "unknown color `{value}`"),
        }
    }
}

impl Error for LineRejection {}

/// Parses one line (without line terminator) into a [`Command`].
///
/// The keyword runs from after the prefix up to the first space; everything
/// after that space is the parameter. Without a space the parameter is empty.
pub fn parse_command_line(line: &str) -> Result<Command<'_>, LineRejection> {
    let body = match line.strip_prefix(COMMAND_PREFIX) {
        Some(body) if !body.is_empty() => body,
        _ => return Err(LineRejection::NotACommand),
    };

    let (keyword, parameter) = match body.find(' ') {
        Some(index) => (&body[..index], &body[index + 1..]),
        None => (body, ""),
    };

    match keyword {
        "t" | "tag" | "tags" => {
            let parameter = require(parameter, CommandKind::Tags)?;
            Ok(Command::Tags(parameter.split(' ').collect()))
        }
        "s" | "st" | "sub" => Ok(Command::Subtask(require(parameter, CommandKind::Subtask)?)),
        "d" | "due" => Ok(Command::Due(require(parameter, CommandKind::Due)?)),
        "start" => {
            if parameter.is_empty() {
                Ok(Command::Start(DEFAULT_START_PARAMETER))
            } else {
                Ok(Command::Start(parameter))
            }
        }
        "p" | "prio" => {
            let parameter = require(parameter, CommandKind::Priority)?;
            // Surrounding whitespace is tolerated, as for the other parameters.
            parameter
                .trim()
                .parse::<i64>()
                .map(Command::Priority)
                .map_err(|_| LineRejection::InvalidPriority(parameter.to_string()))
        }
        "c" | "col" | "color" => Ok(Command::Color(require(parameter, CommandKind::Color)?)),
        other => Err(LineRejection::UnknownKeyword(other.to_string())),
    }
}

fn require(parameter: &str, kind: CommandKind) -> Result<&str, LineRejection> {
    if parameter.is_empty() {
        Err(LineRejection::MissingParameter(kind))
    } else {
        Ok(parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command_line, Command, CommandKind, LineRejection};

    #[test]
    fn rejects_lines_without_prefix_or_keyword() {
        assert_eq!(parse_command_line(""), Err(LineRejection::NotACommand));
        assert_eq!(parse_command_line("\\"), Err(LineRejection::NotACommand));
        assert_eq!(
            parse_command_line("tag urgent"),
            Err(LineRejection::NotACommand)
        );
    }

    #[test]
    fn resolves_aliases_to_the_same_kind() {
        for line in ["\\t a", "\\tag a", "\\tags a"] {
            assert_eq!(parse_command_line(line).unwrap().kind(), CommandKind::Tags);
        }
        for line in ["\\s a", "\\st a", "\\sub a"] {
            assert_eq!(
                parse_command_line(line).unwrap().kind(),
                CommandKind::Subtask
            );
        }
        for line in ["\\c red", "\\col red", "\\color red"] {
            assert_eq!(parse_command_line(line).unwrap().kind(), CommandKind::Color);
        }
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            parse_command_line("\\Tag urgent"),
            Err(LineRejection::UnknownKeyword("Tag".to_string()))
        );
    }

    #[test]
    fn space_right_after_prefix_yields_empty_keyword() {
        assert_eq!(
            parse_command_line("\\ tag"),
            Err(LineRejection::UnknownKeyword(String::new()))
        );
    }

    #[test]
    fn tags_split_on_single_spaces() {
        assert_eq!(
            parse_command_line("\\t a  b").unwrap(),
            Command::Tags(vec!["a", "", "b"])
        );
    }

    #[test]
    fn subtask_title_keeps_inner_spaces() {
        assert_eq!(
            parse_command_line("\\sub write the report").unwrap(),
            Command::Subtask("write the report")
        );
    }

    #[test]
    fn empty_required_parameter_rejects_line() {
        assert_eq!(
            parse_command_line("\\due"),
            Err(LineRejection::MissingParameter(CommandKind::Due))
        );
        assert_eq!(
            parse_command_line("\\t "),
            Err(LineRejection::MissingParameter(CommandKind::Tags))
        );
        assert_eq!(
            parse_command_line("\\p"),
            Err(LineRejection::MissingParameter(CommandKind::Priority))
        );
    }

    #[test]
    fn empty_start_defaults_to_now() {
        assert_eq!(parse_command_line("\\start").unwrap(), Command::Start("now"));
        assert_eq!(parse_command_line("\\start ").unwrap(), Command::Start("now"));
        assert_eq!(parse_command_line("\\start 3d").unwrap(), Command::Start("3d"));
    }

    #[test]
    fn priority_must_be_an_integer() {
        assert_eq!(parse_command_line("\\p 2").unwrap(), Command::Priority(2));
        assert_eq!(parse_command_line("\\prio -1").unwrap(), Command::Priority(-1));
        assert_eq!(
            parse_command_line("\\p high"),
            Err(LineRejection::InvalidPriority("high".to_string()))
        );
    }

    #[test]
    fn priority_tolerates_surrounding_whitespace() {
        assert_eq!(parse_command_line("\\p 2 ").unwrap(), Command::Priority(2));
        assert_eq!(parse_command_line("\\prio  3\t").unwrap(), Command::Priority(3));
        assert_eq!(
            parse_command_line("\\p  "),
            Err(LineRejection::InvalidPriority(" ".to_string()))
        );
    }

    #[test]
    fn rejections_carry_code_and_message() {
        let cases = [
            (
                LineRejection::UnknownKeyword("x".to_string()),
                "unknown_keyword",
                "unknown command keyword `x`",
            ),
            (
                LineRejection::MissingParameter(CommandKind::Due),
                "missing_parameter",
                "command `due` requires a parameter",
            ),
            (
                LineRejection::PriorityOutOfRange {
                    value: 9,
                    start: 1,
                    end: 5,
                },
                "priority_out_of_range",
                "priority 9 is outside [1, 5]",
            ),
            (
                LineRejection::UnresolvedDate("soonish".to_string()),
                "unresolved_date",
                "cannot resolve date `soonish`",
            ),
            (
                LineRejection::UnknownColor("mauve".to_string()),
                "unknown_color",
                "unknown color `mauve`",
            ),
        ];
        for (rejection, code, message) in cases {
            assert_eq!(rejection.code(), code);
            assert_eq!(rejection.to_string(), message);
        }
    }
}
