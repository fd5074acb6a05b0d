//! Parsing of comma-separated manual command scripts.

use std::{error::Error, fmt};

use wumpus_core::Direction;

/// Delimiter separating individual commands.
const STEP_DELIMITER: char = ',';
/// Prefix marking a shot rather than a move.
const SHOOT_PREFIX: &str = "shoot-";

/// Manual action requested by a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ScriptStep {
    /// Move one cell.
    Move(Direction),
    /// Fire the arrow.
    Shoot(Direction),
    /// Start a new game.
    Reset,
}

/// Errors that can occur while parsing a script.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The script contained no commands.
    Empty,
    /// A command was not recognised.
    UnknownCommand(String),
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "script contained no commands"),
            Self::UnknownCommand(command) => write!(f, "unknown script command '{command}'"),
        }
    }
}

impl Error for ScriptError {}

/// Parses a script such as `right,down,shoot-right,reset`.
pub(crate) fn parse(script: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    let steps = script
        .split(STEP_DELIMITER)
        .map(str::trim)
        .filter(|step| !step.is_empty())
        .map(parse_step)
        .collect::<Result<Vec<_>, _>>()?;

    if steps.is_empty() {
        return Err(ScriptError::Empty);
    }
    Ok(steps)
}

fn parse_step(step: &str) -> Result<ScriptStep, ScriptError> {
    let lowered = step.to_ascii_lowercase();
    if lowered == "reset" {
        return Ok(ScriptStep::Reset);
    }
    if let Some(direction) = lowered.strip_prefix(SHOOT_PREFIX) {
        return parse_direction(direction)
            .map(ScriptStep::Shoot)
            .ok_or_else(|| ScriptError::UnknownCommand(step.to_owned()));
    }
    parse_direction(&lowered)
        .map(ScriptStep::Move)
        .ok_or_else(|| ScriptError::UnknownCommand(step.to_owned()))
}

fn parse_direction(name: &str) -> Option<Direction> {
    Direction::ALL
        .iter()
        .copied()
        .find(|direction| direction.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_moves_shots_and_resets() {
        let steps = parse("right, Down,shoot-up ,reset").expect("script parses");
        assert_eq!(
            steps,
            vec![
                ScriptStep::Move(Direction::Right),
                ScriptStep::Move(Direction::Down),
                ScriptStep::Shoot(Direction::Up),
                ScriptStep::Reset,
            ]
        );
    }

    #[test]
    fn blank_entries_are_skipped() {
        assert_eq!(
            parse("left,,"),
            Ok(vec![ScriptStep::Move(Direction::Left)])
        );
        assert_eq!(parse(" , "), Err(ScriptError::Empty));
    }

    #[test]
    fn unknown_commands_are_reported_verbatim() {
        assert_eq!(
            parse("up,jump"),
            Err(ScriptError::UnknownCommand("jump".to_owned()))
        );
        assert_eq!(
            parse("shoot-sideways"),
            Err(ScriptError::UnknownCommand("shoot-sideways".to_owned()))
        );
    }
}
