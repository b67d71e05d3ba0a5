//! Line protocol spoken on the table's control socket.

use crate::config::{BetUnit, ConfigurationError};
use crate::funding::AccountId;
use crate::wheel::Label;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/roulette.sock";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Spin,
    Clear,
    Bet(Label),
    Unit(BetUnit),
    Fund(AccountId),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Unit(#[from] ConfigurationError),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(CommandError::Empty)?;

        match verb.to_ascii_lowercase().as_str() {
            "spin" => Ok(Self::Spin),
            "clear" => Ok(Self::Clear),
            "bet" => words
                .next()
                .map(|label| Self::Bet(Label::new(label)))
                .ok_or(CommandError::MissingArgument("bet")),
            "unit" => {
                let amount = words.next().ok_or(CommandError::MissingArgument("unit"))?;
                Ok(Self::Unit(amount.parse()?))
            }
            "fund" => words
                .next()
                .map(|account| Self::Fund(AccountId::new(account)))
                .ok_or(CommandError::MissingArgument("fund")),
            _ => Err(CommandError::Unknown(verb.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spin => write!(f, "spin"),
            Self::Clear => write!(f, "clear"),
            Self::Bet(label) => write!(f, "bet {}", label),
            Self::Unit(unit) => write!(f, "unit {}", unit),
            Self::Fund(account) => write!(f, "fund {}", account),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("spin", Command::Spin),
            ("  SPIN  ", Command::Spin),
            ("clear", Command::Clear),
            ("bet 17", Command::Bet(Label::new("17"))),
            ("bet 00", Command::Bet(Label::new("00"))),
            ("unit 50", Command::Unit(BetUnit::Fifty)),
            ("Fund 0xa11ce", Command::Fund(AccountId::new("0xa11ce"))),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>(), Ok(expected));
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!("bet".parse::<Command>(), Err(CommandError::MissingArgument("bet")));
        assert_eq!("fund".parse::<Command>(), Err(CommandError::MissingArgument("fund")));
        assert_eq!(
            "show".parse::<Command>(),
            Err(CommandError::Unknown("show".to_string()))
        );
        assert_eq!(
            "unit 25".parse::<Command>(),
            Err(CommandError::Unit(ConfigurationError::InvalidBetUnit(25)))
        );
    }

    #[test]
    fn test_display_parses_back() {
        for command in [
            Command::Spin,
            Command::Clear,
            Command::Bet(Label::new("36")),
            Command::Unit(BetUnit::Hundred),
            Command::Fund(AccountId::new("player-1")),
        ] {
            assert_eq!(command.to_string().parse::<Command>(), Ok(command));
        }
    }
}
