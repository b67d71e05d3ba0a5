use crate::config::{BetUnit, ConfigurationError, TableConfig};
use crate::funding::{AccountId, FundingError, FundingService};
use crate::geometry::Point;
use crate::grid::{BetCategory, BetCell, BettingGrid, ViewportClass};
use crate::ledger::{Bet, BetError, BetLedger, Chips, Settlement};
use crate::spin::{BallPosition, InvalidSpinRequest, Phase, SpinSimulator, SpinState};
use crate::wheel::{Label, Pocket, WheelLayout};

/// Read-only view of everything a presentation layer needs to draw a frame.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub phase: Phase,
    pub wheel_angle: f64,
    pub ball: Option<BallPosition>,
    pub pockets: &'a [Pocket],
    pub arc: f64,
    pub viewport: ViewportClass,
    pub cells: &'a [BetCell],
    pub bets: &'a [Bet],
    pub balance: Chips,
    pub staked: Chips,
    pub unit: BetUnit,
    pub last: Option<&'a Settlement>,
}

/// One player's table: wheel, betting grid, ledger and spin driver, all
/// mutated from a single thread.
pub struct Game {
    config: TableConfig,
    wheel: WheelLayout,
    grid: BettingGrid,
    ledger: BetLedger,
    spinner: SpinSimulator,
    balance: Chips,
    unit: BetUnit,
    last: Option<Settlement>,
    pending: Option<TableConfig>,
}

impl Game {
    pub fn new(config: TableConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let wheel = WheelLayout::new(config.wheel_variant);
        let grid = BettingGrid::layout(config.wheel_variant, config.viewport.unwrap_or_default());
        let spinner = SpinSimulator::new(config.kinematics(), config.seed);

        Ok(Self {
            wheel,
            grid,
            ledger: BetLedger::new(),
            spinner,
            balance: config.starting_balance,
            unit: config.base_bet_unit,
            last: None,
            pending: None,
            config,
        })
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn wheel(&self) -> &WheelLayout {
        &self.wheel
    }

    pub fn grid(&self) -> &BettingGrid {
        &self.grid
    }

    pub fn bets(&self) -> &[Bet] {
        self.ledger.bets()
    }

    pub fn balance(&self) -> Chips {
        self.balance
    }

    pub fn staked(&self) -> Chips {
        self.ledger.total_staked()
    }

    /// Balance not yet committed to a bet.
    pub fn available(&self) -> Chips {
        self.balance.saturating_sub(self.ledger.total_staked())
    }

    pub fn phase(&self) -> Phase {
        self.spinner.phase()
    }

    pub fn is_spinning(&self) -> bool {
        self.spinner.phase() == Phase::Spinning
    }

    pub fn spin_state(&self) -> &SpinState {
        self.spinner.state()
    }

    pub fn bet_unit(&self) -> BetUnit {
        self.unit
    }

    pub fn set_bet_unit(&mut self, unit: BetUnit) {
        self.unit = unit;
    }

    pub fn last_settlement(&self) -> Option<&Settlement> {
        self.last.as_ref()
    }

    /// A click on the betting table. Clicking outside every cell is not an error.
    pub fn pointer_down(&mut self, point: Point) -> Result<Option<&Bet>, BetError> {
        match self.grid.hit_test(point).cloned() {
            Some(cell) => self.stake(cell).map(Some),
            None => Ok(None),
        }
    }

    /// Places one bet unit on the straight-up number `label`.
    pub fn place(&mut self, label: &str) -> Result<&Bet, BetError> {
        let cell = self
            .grid
            .find_straight(label)
            .cloned()
            .ok_or_else(|| BetError::UnknownLabel(Label::new(label)))?;
        self.stake(cell)
    }

    fn stake(&mut self, cell: BetCell) -> Result<&Bet, BetError> {
        if cell.category != BetCategory::Straight {
            return Err(BetError::UnsupportedBet(cell.label));
        }
        let amount = self.unit.amount();
        let bet = self.ledger.place(&cell, amount, self.balance)?;
        log::debug!("Placed {} on {}", bet.amount, bet.cell.label);
        Ok(bet)
    }

    pub fn clear_bets(&mut self) -> Result<Chips, BetError> {
        let refund = self.ledger.clear()?;
        log::debug!("Cleared bets, {} returned", refund);
        Ok(refund)
    }

    pub fn request_spin(&mut self) -> Result<(), InvalidSpinRequest> {
        self.check_spin()?;
        self.spinner.start(&self.wheel)?;
        self.begin_spin();
        Ok(())
    }

    /// Like [`Game::request_spin`], but launches the wheel from a fixed angle
    /// instead of drawing the outcome.
    pub fn request_spin_from(
        &mut self,
        initial_wheel_angle: f64,
    ) -> Result<(), InvalidSpinRequest> {
        self.check_spin()?;
        self.spinner.start_from(initial_wheel_angle)?;
        self.begin_spin();
        Ok(())
    }

    fn check_spin(&self) -> Result<(), InvalidSpinRequest> {
        if self.spinner.phase() != Phase::Idle {
            return Err(InvalidSpinRequest::AlreadySpinning);
        }
        if self.ledger.is_empty() {
            return Err(InvalidSpinRequest::NoBets);
        }
        Ok(())
    }

    fn begin_spin(&mut self) {
        self.ledger.lock();
        log::info!(
            "Spinning with {} bet(s), {} staked",
            self.ledger.bets().len(),
            self.ledger.total_staked()
        );
    }

    /// Advances the spin by one step. On the final step the bets are settled,
    /// the balance updated and the table returned to idle.
    pub fn tick(&mut self) -> Option<Settlement> {
        let outcome = self.spinner.tick(&self.wheel)?;
        let settlement = self.ledger.settle(&outcome.pocket);
        self.balance = settlement.apply(self.balance);
        self.spinner.reset();

        log::info!(
            "Winning number {} ({}): paid {}, lost {}, balance {}",
            settlement.winning.label,
            settlement.winning.color,
            settlement.payout,
            settlement.forfeited,
            self.balance
        );

        if let Some(config) = self.pending.take() {
            self.apply_config(config);
        }
        self.last = Some(settlement.clone());
        Some(settlement)
    }

    /// Spins and ticks to completion without a frame driver.
    pub fn run_spin(&mut self) -> Result<Settlement, InvalidSpinRequest> {
        self.request_spin()?;
        loop {
            if let Some(settlement) = self.tick() {
                return Ok(settlement);
            }
        }
    }

    /// Lays the betting table out for another size class, carrying bets over.
    pub fn relayout(&mut self, viewport: ViewportClass) {
        if self.grid.viewport() == viewport {
            return;
        }
        self.grid = BettingGrid::layout(self.wheel.variant(), viewport);
        self.ledger.relocate(&self.grid);
        log::debug!("Betting table laid out for {}", viewport);
    }

    /// Applies a reloaded configuration. Balance is kept; a spin in progress
    /// finishes under the old settings first.
    pub fn reconfigure(&mut self, config: TableConfig) -> Result<(), ConfigurationError> {
        config.validate()?;
        if self.spinner.phase() == Phase::Idle {
            self.apply_config(config);
        } else {
            self.pending = Some(config);
        }
        Ok(())
    }

    fn apply_config(&mut self, config: TableConfig) {
        if config.wheel_variant != self.wheel.variant() {
            self.wheel = WheelLayout::new(config.wheel_variant);
            self.grid = BettingGrid::layout(config.wheel_variant, self.grid.viewport());
            let dropped = self.ledger.relocate(&self.grid);
            if dropped > 0 {
                log::warn!(
                    "Returned {} staked on pockets the {} wheel lacks",
                    dropped,
                    config.wheel_variant
                );
            }
        }
        if let Some(viewport) = config.viewport {
            self.relayout(viewport);
        }
        if let Some(seed) = config.seed
            && config.seed != self.config.seed
        {
            self.spinner.reseed(seed);
        }
        self.spinner.set_kinematics(config.kinematics());
        self.unit = config.base_bet_unit;
        self.config = config;
    }

    pub fn fund(
        &mut self,
        service: &mut dyn FundingService,
        account: &AccountId,
    ) -> Result<Chips, FundingError> {
        let granted = service.request_funds(account)?;
        self.balance = self.balance.saturating_add(granted);
        Ok(granted)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            phase: self.spinner.phase(),
            wheel_angle: self.spinner.state().wheel_angle,
            ball: self.spinner.ball(),
            pockets: self.wheel.pockets(),
            arc: self.wheel.arc(),
            viewport: self.grid.viewport(),
            cells: self.grid.cells(),
            bets: self.ledger.bets(),
            balance: self.balance,
            staked: self.ledger.total_staked(),
            unit: self.unit,
            last: self.last.as_ref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funding::Faucet;
    use crate::spin::Kinematics;
    use crate::wheel::WheelVariant;

    fn game(balance: Chips) -> Game {
        Game::new(TableConfig {
            starting_balance: balance,
            seed: Some(2024),
            ..TableConfig::default()
        })
        .unwrap()
    }

    fn aim_at(game: &Game, label: &str) -> f64 {
        let index = game.wheel().find(label).unwrap().index;
        Kinematics::default().initial_angle_for(game.wheel(), index)
    }

    fn spin_to_end(game: &mut Game) -> (u32, Settlement) {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if let Some(settlement) = game.tick() {
                return (ticks, settlement);
            }
        }
    }

    #[test]
    fn test_winning_straight_up() {
        let mut game = game(1000);
        game.place("17").unwrap();
        assert_eq!(game.available(), 990);

        let angle = aim_at(&game, "17");
        game.request_spin_from(angle).unwrap();
        let (ticks, settlement) = spin_to_end(&mut game);

        assert_eq!(ticks, 300);
        assert_eq!(settlement.winning.label.as_str(), "17");
        assert_eq!(settlement.payout, 350);
        assert_eq!(game.balance(), 1350);
        assert!(game.bets().is_empty());
        assert_eq!(game.staked(), 0);
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.last_settlement(), Some(&settlement));
    }

    #[test]
    fn test_losing_straight_up() {
        let mut game = game(1000);
        game.set_bet_unit(BetUnit::Twenty);
        game.place("5").unwrap();

        let angle = aim_at(&game, "12");
        game.request_spin_from(angle).unwrap();
        let (_, settlement) = spin_to_end(&mut game);

        assert_eq!(settlement.winning.label.as_str(), "12");
        assert_eq!(settlement.payout, 0);
        assert_eq!(settlement.forfeited, 20);
        assert_eq!(game.balance(), 980);
        assert!(game.bets().is_empty());
    }

    #[test]
    fn test_bet_beyond_balance_is_rejected() {
        let mut game = game(15);
        game.place("1").unwrap();

        let err = game.place("2").unwrap_err();
        assert!(matches!(err, BetError::InsufficientBalance { requested: 10, available: 5 }));
        assert_eq!(game.balance(), 15);
        assert_eq!(game.staked(), 10);
        assert_eq!(game.bets().len(), 1);
    }

    #[test]
    fn test_spin_without_bets_is_rejected() {
        let mut game = game(1000);
        assert_eq!(game.request_spin(), Err(InvalidSpinRequest::NoBets));
        assert_eq!(game.tick(), None);
        assert_eq!(game.spin_state().tick, 0);
        assert_eq!(game.phase(), Phase::Idle);
    }

    #[test]
    fn test_no_changes_while_spinning() {
        let mut game = game(1000);
        game.place("9").unwrap();
        game.request_spin().unwrap();
        game.tick();

        assert_eq!(game.request_spin(), Err(InvalidSpinRequest::AlreadySpinning));
        assert_eq!(game.place("10").unwrap_err(), BetError::SpinInProgress);
        assert_eq!(game.clear_bets(), Err(BetError::SpinInProgress));
        assert_eq!(game.spin_state().tick, 1);

        let (_, settlement) = spin_to_end(&mut game);
        assert_eq!(settlement.staked(), 10);
        assert!(game.place("10").is_ok());
    }

    #[test]
    fn test_clear_refunds_stake() {
        let mut game = game(1000);
        game.set_bet_unit(BetUnit::Fifty);
        game.place("30").unwrap();
        game.place("31").unwrap();
        assert_eq!(game.available(), 900);

        assert_eq!(game.clear_bets(), Ok(100));
        assert_eq!(game.staked(), 0);
        assert_eq!(game.available(), 1000);
        assert_eq!(game.balance(), 1000);
    }

    #[test]
    fn test_pointer_down() {
        let mut game = game(1000);
        let cell = game.grid().find_straight("22").unwrap().clone();

        let bet = game.pointer_down(cell.rect.center()).unwrap().unwrap();
        assert_eq!(bet.cell.label.as_str(), "22");
        assert_eq!(bet.amount, 10);

        assert_eq!(game.pointer_down(Point::new(cell.rect.x, cell.rect.y)), Ok(None));
        assert_eq!(game.pointer_down(Point::new(-1.0, -1.0)), Ok(None));

        let dozen = game.grid().find("2nd 12", BetCategory::Outside).unwrap().clone();
        assert_eq!(
            game.pointer_down(dozen.rect.center()),
            Err(BetError::UnsupportedBet(Label::new("2nd 12")))
        );
        assert_eq!(game.bets().len(), 1);
    }

    #[test]
    fn test_unknown_label() {
        let mut game = game(1000);
        assert_eq!(game.place("00").unwrap_err(), BetError::UnknownLabel(Label::new("00")));
        assert_eq!(game.place("37").unwrap_err(), BetError::UnknownLabel(Label::new("37")));
    }

    #[test]
    fn test_seeded_games_agree() {
        let mut a = game(1000);
        let mut b = game(1000);
        for _ in 0..5 {
            a.place("0").unwrap();
            b.place("0").unwrap();
            let x = a.run_spin().unwrap();
            let y = b.run_spin().unwrap();
            assert_eq!(x.winning, y.winning);
            assert_eq!(a.balance(), b.balance());
        }
    }

    #[test]
    fn test_snapshot_tracks_spin() {
        let mut game = game(1000);
        game.place("4").unwrap();
        let idle = game.snapshot();
        assert_eq!(idle.phase, Phase::Idle);
        assert_eq!(idle.ball, None);
        assert_eq!(idle.bets.len(), 1);
        assert_eq!(idle.pockets.len(), 37);

        game.request_spin().unwrap();
        game.tick();
        let spinning = game.snapshot();
        assert_eq!(spinning.phase, Phase::Spinning);
        assert!(spinning.ball.is_some_and(|b| !b.landed));

        let (_, settlement) = spin_to_end(&mut game);
        let done = game.snapshot();
        assert!(done.ball.is_some_and(|b| b.landed));
        assert!(done.bets.is_empty());
        assert_eq!(done.last, Some(&settlement));
    }

    #[test]
    fn test_relayout_keeps_bets() {
        let mut game = game(1000);
        game.place("14").unwrap();
        game.relayout(ViewportClass::NarrowPortrait);

        let expected = game.grid().find_straight("14").unwrap().clone();
        assert_eq!(game.bets()[0].cell, expected);
        assert_eq!(game.staked(), 10);
    }

    #[test]
    fn test_reconfigure_waits_for_spin() {
        let mut game = game(1000);
        game.place("0").unwrap();
        game.request_spin().unwrap();

        let american = TableConfig {
            wheel_variant: WheelVariant::American,
            base_bet_unit: BetUnit::Hundred,
            ..TableConfig::default()
        };
        game.reconfigure(american).unwrap();
        assert_eq!(game.wheel().len(), 37);

        spin_to_end(&mut game);
        assert_eq!(game.wheel().len(), 38);
        assert_eq!(game.bet_unit(), BetUnit::Hundred);
        assert!(game.place("00").is_ok());

        let broken = TableConfig {
            total_ticks: 0,
            ..TableConfig::default()
        };
        assert_eq!(game.reconfigure(broken), Err(ConfigurationError::InvalidTickBudget));
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = TableConfig {
            initial_wheel_speed: -0.2,
            ..TableConfig::default()
        };
        assert!(Game::new(config).is_err());
    }

    #[test]
    fn test_funding_credits_balance() {
        let mut game = game(0);
        assert!(game.place("1").is_err());

        let mut faucet = Faucet::new(200);
        let account = AccountId::new("player-1");
        assert_eq!(game.fund(&mut faucet, &account), Ok(200));
        assert_eq!(game.balance(), 200);
        assert!(game.fund(&mut faucet, &account).is_err());
        assert_eq!(game.balance(), 200);
        assert!(game.place("1").is_ok());
    }
}
