use crate::grid::ViewportClass;
use crate::ledger::Chips;
use crate::spin::Kinematics;
use crate::wheel::WheelVariant;
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, IntoEnumIterator};
use thiserror::Error;

pub const DEFAULT_STARTING_BALANCE: Chips = 1000;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown wheel variant '{0}' (expected european or american)")]
    UnknownVariant(String),
    #[error("unknown viewport class '{0}' (expected wide, narrow-landscape or narrow-portrait)")]
    UnknownViewport(String),
    #[error("bet unit must be one of 10, 20, 50 or 100, got {0}")]
    InvalidBetUnit(u64),
    #[error("tick budget must be at least 1")]
    InvalidTickBudget,
    #[error("{name} must be a positive finite number, got {value}")]
    InvalidSpeed { name: &'static str, value: f64 },
}

/// Chip value placed by a single click on the betting grid.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    StrumDisplay,
)]
#[serde(try_from = "u64", into = "u64")]
pub enum BetUnit {
    #[default]
    #[strum(to_string = "10")]
    Ten,
    #[strum(to_string = "20")]
    Twenty,
    #[strum(to_string = "50")]
    Fifty,
    #[strum(to_string = "100")]
    Hundred,
}

impl BetUnit {
    pub fn amount(&self) -> Chips {
        match self {
            Self::Ten => 10,
            Self::Twenty => 20,
            Self::Fifty => 50,
            Self::Hundred => 100,
        }
    }
}

impl TryFrom<u64> for BetUnit {
    type Error = ConfigurationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::iter()
            .find(|unit| unit.amount() == value)
            .ok_or(ConfigurationError::InvalidBetUnit(value))
    }
}

impl From<BetUnit> for u64 {
    fn from(unit: BetUnit) -> Self {
        unit.amount()
    }
}

impl std::str::FromStr for BetUnit {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .trim_start_matches('$')
            .parse::<u64>()
            .map_err(|_| ConfigurationError::InvalidBetUnit(0))?;
        Self::try_from(value)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TableConfig {
    pub wheel_variant: WheelVariant,
    pub base_bet_unit: BetUnit,
    pub total_ticks: u32,
    pub initial_wheel_speed: f64,
    pub initial_ball_speed: f64,
    pub starting_balance: Chips,
    /// Fixes the outcome sequence; drawn from OS entropy when absent.
    pub seed: Option<u64>,
    /// Forces a betting-grid layout instead of deriving it from the window size.
    pub viewport: Option<ViewportClass>,
}

impl Default for TableConfig {
    fn default() -> Self {
        let kinematics = Kinematics::default();
        Self {
            wheel_variant: WheelVariant::default(),
            base_bet_unit: BetUnit::default(),
            total_ticks: kinematics.total_ticks,
            initial_wheel_speed: kinematics.initial_wheel_speed,
            initial_ball_speed: kinematics.initial_ball_speed,
            starting_balance: DEFAULT_STARTING_BALANCE,
            seed: None,
            viewport: None,
        }
    }
}

impl TableConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.total_ticks == 0 {
            return Err(ConfigurationError::InvalidTickBudget);
        }
        for (name, value) in [
            ("initial_wheel_speed", self.initial_wheel_speed),
            ("initial_ball_speed", self.initial_ball_speed),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigurationError::InvalidSpeed { name, value });
            }
        }
        Ok(())
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics {
            total_ticks: self.total_ticks,
            initial_wheel_speed: self.initial_wheel_speed,
            initial_ball_speed: self.initial_ball_speed,
        }
    }
}
