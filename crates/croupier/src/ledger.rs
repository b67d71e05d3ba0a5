use crate::grid::{BetCategory, BetCell, BettingGrid};
use crate::wheel::{Label, Pocket};
use thiserror::Error;

pub type Chips = u64;

/// Winnings per chip on a straight-up hit; the stake itself is returned on top.
pub const STRAIGHT_UP_MULTIPLIER: Chips = 35;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BetError {
    #[error("insufficient balance: {available} available, {requested} requested")]
    InsufficientBalance { requested: Chips, available: Chips },
    #[error("bets are locked while the wheel is spinning")]
    SpinInProgress,
    #[error("'{0}' is not a straight-up number")]
    UnsupportedBet(Label),
    #[error("no betting cell labelled '{0}'")]
    UnknownLabel(Label),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bet {
    pub cell: BetCell,
    pub amount: Chips,
}

impl Bet {
    fn wins_on(&self, pocket: &Pocket) -> bool {
        self.cell.category == BetCategory::Straight && self.cell.label == pocket.label
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBet {
    pub bet: Bet,
    /// Winnings excluding the returned stake; zero for a losing bet.
    pub payout: Chips,
}

impl ResolvedBet {
    pub fn won(&self) -> bool {
        self.payout > 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub winning: Pocket,
    /// Sum of winnings over every winning bet.
    pub payout: Chips,
    /// Stakes of the winning bets, handed back alongside the payout.
    pub returned: Chips,
    /// Stakes of the losing bets.
    pub forfeited: Chips,
    pub bets: Vec<ResolvedBet>,
}

impl Settlement {
    pub fn staked(&self) -> Chips {
        self.returned + self.forfeited
    }

    pub fn is_win(&self) -> bool {
        self.payout > 0
    }

    /// Balance after this settlement, given the balance the stakes were drawn from.
    pub fn apply(&self, balance: Chips) -> Chips {
        balance.saturating_sub(self.forfeited).saturating_add(self.payout)
    }
}

/// Bets placed for the next spin. Stakes are held against the balance rather
/// than deducted from it, so `total_staked` never exceeds the balance passed
/// to [`BetLedger::place`].
#[derive(Debug, Clone, Default)]
pub struct BetLedger {
    bets: Vec<Bet>,
    total_staked: Chips,
    locked: bool,
}

impl BetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bets(&self) -> &[Bet] {
        &self.bets
    }

    pub fn total_staked(&self) -> Chips {
        self.total_staked
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Freezes the ledger until the next [`BetLedger::settle`].
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn place(
        &mut self,
        cell: &BetCell,
        amount: Chips,
        balance: Chips,
    ) -> Result<&Bet, BetError> {
        if self.locked {
            return Err(BetError::SpinInProgress);
        }
        let total = self
            .total_staked
            .checked_add(amount)
            .filter(|&total| total <= balance)
            .ok_or(BetError::InsufficientBalance {
                requested: amount,
                available: balance.saturating_sub(self.total_staked),
            })?;

        self.total_staked = total;
        self.bets.push(Bet {
            cell: cell.clone(),
            amount,
        });
        Ok(&self.bets[self.bets.len() - 1])
    }

    /// Drops every bet and returns the stake to hand back to the player.
    pub fn clear(&mut self) -> Result<Chips, BetError> {
        if self.locked {
            return Err(BetError::SpinInProgress);
        }
        self.bets.clear();
        Ok(std::mem::take(&mut self.total_staked))
    }

    pub fn settle(&mut self, winning: &Pocket) -> Settlement {
        let mut settlement = Settlement {
            winning: winning.clone(),
            payout: 0,
            returned: 0,
            forfeited: 0,
            bets: Vec::with_capacity(self.bets.len()),
        };

        for bet in self.bets.drain(..) {
            let payout = if bet.wins_on(winning) {
                settlement.returned += bet.amount;
                bet.amount.saturating_mul(STRAIGHT_UP_MULTIPLIER)
            } else {
                settlement.forfeited += bet.amount;
                0
            };
            settlement.payout += payout;
            settlement.bets.push(ResolvedBet { bet, payout });
        }

        self.total_staked = 0;
        self.locked = false;
        settlement
    }

    /// Re-anchors bets onto the cells of a freshly laid out grid, dropping
    /// any bet whose cell no longer exists. Returns the stake dropped.
    pub fn relocate(&mut self, grid: &BettingGrid) -> Chips {
        let mut dropped = 0;
        self.bets.retain_mut(|bet| {
            match grid.find(bet.cell.label.as_str(), bet.cell.category) {
                Some(cell) => {
                    bet.cell = cell.clone();
                    true
                }
                None => {
                    dropped += bet.amount;
                    false
                }
            }
        });
        self.total_staked -= dropped;
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ViewportClass;
    use crate::wheel::{WheelLayout, WheelVariant};

    fn grid() -> BettingGrid {
        BettingGrid::layout(WheelVariant::European, ViewportClass::Wide)
    }

    fn pocket(label: &str) -> Pocket {
        WheelLayout::new(WheelVariant::European)
            .find(label)
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_place_tracks_total() {
        let grid = grid();
        let mut ledger = BetLedger::new();
        ledger.place(grid.find_straight("7").unwrap(), 10, 1000).unwrap();
        ledger.place(grid.find_straight("7").unwrap(), 20, 1000).unwrap();
        ledger.place(grid.find_straight("0").unwrap(), 50, 1000).unwrap();

        assert_eq!(ledger.bets().len(), 3);
        assert_eq!(ledger.total_staked(), 80);
        let sum: Chips = ledger.bets().iter().map(|b| b.amount).sum();
        assert_eq!(sum, ledger.total_staked());
    }

    #[test]
    fn test_insufficient_balance_leaves_ledger_unchanged() {
        let grid = grid();
        let mut ledger = BetLedger::new();
        ledger.place(grid.find_straight("3").unwrap(), 50, 60).unwrap();

        let err = ledger
            .place(grid.find_straight("4").unwrap(), 20, 60)
            .unwrap_err();
        assert_eq!(
            err,
            BetError::InsufficientBalance {
                requested: 20,
                available: 10
            }
        );
        assert_eq!(ledger.bets().len(), 1);
        assert_eq!(ledger.total_staked(), 50);

        // exactly the remaining balance is fine
        ledger.place(grid.find_straight("4").unwrap(), 10, 60).unwrap();
        assert_eq!(ledger.total_staked(), 60);
    }

    #[test]
    fn test_clear_refunds_everything() {
        let grid = grid();
        let mut ledger = BetLedger::new();
        ledger.place(grid.find_straight("11").unwrap(), 10, 100).unwrap();
        ledger.place(grid.find_straight("12").unwrap(), 20, 100).unwrap();

        assert_eq!(ledger.clear(), Ok(30));
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_staked(), 0);
        assert_eq!(ledger.clear(), Ok(0));
    }

    #[test]
    fn test_locked_ledger_rejects_mutation() {
        let grid = grid();
        let mut ledger = BetLedger::new();
        ledger.place(grid.find_straight("11").unwrap(), 10, 100).unwrap();
        ledger.lock();

        assert_eq!(
            ledger.place(grid.find_straight("12").unwrap(), 10, 100).unwrap_err(),
            BetError::SpinInProgress
        );
        assert_eq!(ledger.clear(), Err(BetError::SpinInProgress));
        assert_eq!(ledger.total_staked(), 10);

        ledger.settle(&pocket("11"));
        assert!(!ledger.is_locked());
    }

    #[test]
    fn test_winning_straight_bet_pays_35_to_1() {
        let grid = grid();
        let mut ledger = BetLedger::new();
        ledger.place(grid.find_straight("17").unwrap(), 10, 1000).unwrap();

        let settlement = ledger.settle(&pocket("17"));
        assert_eq!(settlement.payout, 350);
        assert_eq!(settlement.returned, 10);
        assert_eq!(settlement.forfeited, 0);
        assert!(settlement.is_win());
        assert!(settlement.bets[0].won());
        assert_eq!(settlement.apply(1000), 1350);
        assert!(ledger.is_empty());
        assert_eq!(ledger.total_staked(), 0);
    }

    #[test]
    fn test_losing_bet_forfeits_stake() {
        let grid = grid();
        let mut ledger = BetLedger::new();
        ledger.place(grid.find_straight("5").unwrap(), 20, 1000).unwrap();

        let settlement = ledger.settle(&pocket("12"));
        assert_eq!(settlement.payout, 0);
        assert_eq!(settlement.forfeited, 20);
        assert!(!settlement.is_win());
        assert_eq!(settlement.apply(1000), 980);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_mixed_bets() {
        let grid = grid();
        let mut ledger = BetLedger::new();
        ledger.place(grid.find_straight("0").unwrap(), 10, 1000).unwrap();
        ledger.place(grid.find_straight("0").unwrap(), 20, 1000).unwrap();
        ledger.place(grid.find_straight("26").unwrap(), 50, 1000).unwrap();
        ledger
            .place(grid.find("RED", BetCategory::Outside).unwrap(), 10, 1000)
            .unwrap();

        let settlement = ledger.settle(&pocket("0"));
        assert_eq!(settlement.payout, 30 * 35);
        assert_eq!(settlement.returned, 30);
        assert_eq!(settlement.forfeited, 60);
        assert_eq!(settlement.staked(), 90);
        assert_eq!(settlement.bets.len(), 4);
        assert_eq!(settlement.apply(1000), 1000 - 60 + 1050);
    }

    #[test]
    fn test_relocate_follows_new_layout() {
        let mut ledger = BetLedger::new();
        let american = BettingGrid::layout(WheelVariant::American, ViewportClass::Wide);
        ledger.place(american.find_straight("00").unwrap(), 10, 100).unwrap();
        ledger.place(american.find_straight("8").unwrap(), 20, 100).unwrap();

        let portrait = BettingGrid::layout(WheelVariant::European, ViewportClass::NarrowPortrait);
        assert_eq!(ledger.relocate(&portrait), 10);
        assert_eq!(ledger.bets().len(), 1);
        assert_eq!(ledger.total_staked(), 20);
        assert_eq!(ledger.bets()[0].cell, *portrait.find_straight("8").unwrap());
    }
}
