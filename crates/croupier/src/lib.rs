pub mod config;
pub mod funding;
pub mod game;
pub mod geometry;
pub mod grid;
pub mod ledger;
mod macros;
pub mod remote;
pub mod spin;
pub mod wheel;

pub use config::{BetUnit, ConfigurationError, TableConfig};
pub use game::{Game, Snapshot};
pub use geometry::{Point, Rect, Size};
pub use grid::{BetCategory, BetCell, BettingGrid, ViewportClass};
pub use ledger::{Bet, BetError, BetLedger, Chips, Settlement};
pub use spin::{InvalidSpinRequest, Phase, SpinSimulator};
pub use wheel::{Color, Label, Pocket, WheelLayout, WheelVariant};
