//! Line-oriented player input read from stdin.

use std::{
    io::{self, BufRead},
    sync::mpsc,
    thread,
};

use anyhow::{Context, Result};
use lawn_defense_core::{CellCoord, PlantKind, PlayerIntent, SunId, UnknownPlantKind};

/// Help text printed when a line cannot be understood.
pub(crate) const USAGE: &str = "commands: select <plant> | place <row> <col> | \
collect <id>|all | pause | start | menu | advice | dismiss | quit";

/// A single parsed line of player input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InputLine {
    Intent(PlayerIntent),
    CollectAll,
    Advice,
    Dismiss,
    Quit,
    Blank,
}

/// Reasons a line could not be parsed.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub(crate) enum InputError {
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
    #[error("`{command}` expects {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error("`{0}` is not a number")]
    NotANumber(String),
    #[error(transparent)]
    UnknownPlant(#[from] UnknownPlantKind),
}

pub(crate) fn parse_line(line: &str) -> Result<InputLine, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(InputLine::Blank);
    };

    let parsed = match command.to_ascii_lowercase().as_str() {
        "select" => {
            let name = words.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return Err(InputError::MissingArgument {
                    command: "select",
                    expected: "a plant name",
                });
            }
            InputLine::Intent(PlayerIntent::SelectPlant(name.parse::<PlantKind>()?))
        }
        "place" => {
            let (Some(row), Some(column)) = (words.next(), words.next()) else {
                return Err(InputError::MissingArgument {
                    command: "place",
                    expected: "a row and a column",
                });
            };
            InputLine::Intent(PlayerIntent::ClickCell(CellCoord::new(
                number(row)?,
                number(column)?,
            )))
        }
        "collect" => match words.next() {
            Some("all") => InputLine::CollectAll,
            Some(id) => InputLine::Intent(PlayerIntent::CollectSun(SunId::new(number(id)?))),
            None => {
                return Err(InputError::MissingArgument {
                    command: "collect",
                    expected: "a sun id or `all`",
                })
            }
        },
        "clear" => InputLine::Intent(PlayerIntent::ClearSelection),
        "pause" => InputLine::Intent(PlayerIntent::TogglePause),
        "start" => InputLine::Intent(PlayerIntent::StartGame),
        "menu" => InputLine::Intent(PlayerIntent::ExitToMenu),
        "advice" => InputLine::Advice,
        "dismiss" => InputLine::Dismiss,
        "quit" | "exit" => InputLine::Quit,
        other => return Err(InputError::UnknownCommand(other.to_owned())),
    };
    Ok(parsed)
}

fn number(word: &str) -> Result<u32, InputError> {
    word.parse()
        .map_err(|_| InputError::NotANumber(word.to_owned()))
}

/// Forwards stdin lines to the returned channel from a background thread.
/// The channel disconnects once stdin reaches end of file.
pub(crate) fn spawn_stdin_reader() -> Result<mpsc::Receiver<String>> {
    let (sender, receiver) = mpsc::channel();
    let _reader = thread::Builder::new()
        .name("stdin".to_owned())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if sender.send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to spawn stdin reader thread")?;
    Ok(receiver)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!(
            parse_line("select snow pea"),
            Ok(InputLine::Intent(PlayerIntent::SelectPlant(PlantKind::SnowPea)))
        );
        assert_eq!(
            parse_line("  place 2 0 "),
            Ok(InputLine::Intent(PlayerIntent::ClickCell(CellCoord::new(2, 0))))
        );
        assert_eq!(
            parse_line("collect 7"),
            Ok(InputLine::Intent(PlayerIntent::CollectSun(SunId::new(7))))
        );
        assert_eq!(parse_line("collect all"), Ok(InputLine::CollectAll));
        assert_eq!(
            parse_line("PAUSE"),
            Ok(InputLine::Intent(PlayerIntent::TogglePause))
        );
        assert_eq!(parse_line("advice"), Ok(InputLine::Advice));
        assert_eq!(parse_line("dismiss"), Ok(InputLine::Dismiss));
        assert_eq!(parse_line("quit"), Ok(InputLine::Quit));
        assert_eq!(parse_line(""), Ok(InputLine::Blank));
    }

    #[test]
    fn reports_malformed_lines() {
        assert_eq!(
            parse_line("dig"),
            Err(InputError::UnknownCommand("dig".to_owned()))
        );
        assert_eq!(
            parse_line("place 1 x"),
            Err(InputError::NotANumber("x".to_owned()))
        );
        assert!(matches!(
            parse_line("place 1"),
            Err(InputError::MissingArgument { command: "place", .. })
        ));
        assert!(matches!(
            parse_line("select tulip"),
            Err(InputError::UnknownPlant(_))
        ));
    }
}
