use crate::wheel::{Pocket, START_ANGLE, WheelLayout};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::f64::consts::{FRAC_PI_2, TAU};
use strum::Display as StrumDisplay;
use thiserror::Error;

pub const DEFAULT_TOTAL_TICKS: u32 = 300;
pub const DEFAULT_WHEEL_SPEED: f64 = 0.2;
pub const DEFAULT_BALL_SPEED: f64 = 0.3;

/// Ball radius at launch, as a fraction of the ball track radius.
pub const BALL_START_RADIUS: f64 = 1.0;
/// Fraction of the launch radius the ball has drifted in to when it stops.
pub const BALL_END_RATIO: f64 = 0.85;
/// The ball is launched from the top of the wheel.
pub const BALL_START_ANGLE: f64 = -FRAC_PI_2;
const BALL_DECAY_BOOST: f64 = 1.5;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSpinRequest {
    #[error("place at least one bet before spinning")]
    NoBets,
    #[error("a spin is already in progress")]
    AlreadySpinning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
pub enum Phase {
    Idle,
    Spinning,
    Resolved,
}

/// Speed curves of a spin. Tick numbers are 1-based: tick `t` is the
/// `t`-th step taken after `start`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kinematics {
    pub total_ticks: u32,
    pub initial_wheel_speed: f64,
    pub initial_ball_speed: f64,
}

impl Default for Kinematics {
    fn default() -> Self {
        Self {
            total_ticks: DEFAULT_TOTAL_TICKS,
            initial_wheel_speed: DEFAULT_WHEEL_SPEED,
            initial_ball_speed: DEFAULT_BALL_SPEED,
        }
    }
}

impl Kinematics {
    fn deceleration(&self, tick: u32) -> f64 {
        1.0 - tick as f64 / self.total_ticks as f64
    }

    fn half(&self) -> f64 {
        self.total_ticks as f64 / 2.0
    }

    fn in_second_half(&self, tick: u32) -> bool {
        tick as f64 > self.half()
    }

    pub fn wheel_speed(&self, tick: u32) -> f64 {
        self.initial_wheel_speed * self.deceleration(tick)
    }

    /// Constant for the first half of the spin, then decays faster than the
    /// wheel as the ball loses energy.
    pub fn ball_speed(&self, tick: u32) -> f64 {
        if self.in_second_half(tick) {
            self.initial_ball_speed * self.deceleration(tick) * BALL_DECAY_BOOST
        } else {
            self.initial_ball_speed
        }
    }

    /// The ball only drifts inward during the second half, reaching
    /// `BALL_END_RATIO` of its launch radius on the last tick.
    pub fn ball_radius(&self, tick: u32, start_radius: f64) -> f64 {
        if !self.in_second_half(tick) {
            return start_radius;
        }
        let remaining = self.total_ticks.saturating_sub(tick) as f64 / self.half();
        start_radius * (BALL_END_RATIO + (1.0 - BALL_END_RATIO) * remaining)
    }

    /// Total wheel rotation over a full spin.
    pub fn wheel_travel(&self) -> f64 {
        (1..=self.total_ticks).map(|t| self.wheel_speed(t)).sum()
    }

    /// Launch angle that brings the wheel to rest with the middle of pocket
    /// `index` selected.
    pub fn initial_angle_for(&self, wheel: &WheelLayout, index: usize) -> f64 {
        (rest_angle(wheel, index) - self.wheel_travel()).rem_euclid(TAU)
    }

    /// Curves whose wheel, launched from `from`, comes to rest with the middle
    /// of pocket `index` selected. The launch speed is the one closest to
    /// `initial_wheel_speed` that lands there, turning at least once. `None`
    /// when the tick budget gives the wheel no travel to adjust.
    pub fn landing_on(&self, wheel: &WheelLayout, from: f64, index: usize) -> Option<Self> {
        let unit_travel = Self {
            initial_wheel_speed: 1.0,
            ..*self
        }
        .wheel_travel();
        if unit_travel <= 0.0 {
            return None;
        }

        let offset = (rest_angle(wheel, index) - from).rem_euclid(TAU);
        let turns = ((self.wheel_travel() - offset) / TAU).round().max(1.0);
        Some(Self {
            initial_wheel_speed: (offset + turns * TAU) / unit_travel,
            ..*self
        })
    }
}

fn rest_angle(wheel: &WheelLayout, index: usize) -> f64 {
    START_ANGLE + (index as f64 + 0.5) * wheel.arc()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinState {
    pub wheel_angle: f64,
    pub ball_angle: f64,
    pub ball_radius: f64,
    pub tick: u32,
    pub total_ticks: u32,
}

/// Where to draw the ball. `radius` is a fraction of the ball track radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallPosition {
    pub angle: f64,
    pub radius: f64,
    pub landed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub pocket: Pocket,
    pub wheel_angle: f64,
    pub ball: BallPosition,
}

pub struct SpinSimulator {
    kinematics: Kinematics,
    /// Curves of the spin in progress.
    active: Kinematics,
    state: SpinState,
    phase: Phase,
    outcome: Option<Outcome>,
    landing: Option<BallPosition>,
    rng: ChaCha20Rng,
}

impl SpinSimulator {
    pub fn new(kinematics: Kinematics, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        };

        Self {
            kinematics,
            active: kinematics,
            state: SpinState {
                wheel_angle: START_ANGLE,
                ball_angle: BALL_START_ANGLE,
                ball_radius: BALL_START_RADIUS,
                tick: 0,
                total_ticks: kinematics.total_ticks,
            },
            phase: Phase::Idle,
            outcome: None,
            landing: None,
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn kinematics(&self) -> &Kinematics {
        &self.kinematics
    }

    /// Takes effect from the next spin; a spin in progress keeps its curves.
    pub fn set_kinematics(&mut self, kinematics: Kinematics) {
        self.kinematics = kinematics;
        if self.phase == Phase::Idle {
            self.state.total_ticks = kinematics.total_ticks;
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha20Rng::seed_from_u64(seed);
    }

    /// Draws the winning pocket up front and launches the wheel from where it
    /// last stopped, at the speed that carries it to that pocket.
    pub fn start(&mut self, wheel: &WheelLayout) -> Result<(), InvalidSpinRequest> {
        if self.phase != Phase::Idle {
            return Err(InvalidSpinRequest::AlreadySpinning);
        }
        let target = self.rng.gen_range(0..wheel.len());
        log::debug!("Drew pocket {} ({})", target, wheel.pockets()[target].label);

        let from = self.state.wheel_angle.rem_euclid(TAU);
        match self.kinematics.landing_on(wheel, from, target) {
            Some(curves) => self.launch(from, curves),
            // too few ticks to steer the wheel; jump to the launch angle instead
            None => self.launch(
                self.kinematics.initial_angle_for(wheel, target),
                self.kinematics,
            ),
        }
        Ok(())
    }

    /// Launches the wheel from an explicit angle; the outcome is whatever
    /// pocket the deceleration curve ends on.
    pub fn start_from(&mut self, initial_wheel_angle: f64) -> Result<(), InvalidSpinRequest> {
        if self.phase != Phase::Idle {
            return Err(InvalidSpinRequest::AlreadySpinning);
        }
        self.launch(initial_wheel_angle, self.kinematics);
        Ok(())
    }

    fn launch(&mut self, initial_wheel_angle: f64, curves: Kinematics) {
        self.active = curves;
        self.state = SpinState {
            wheel_angle: initial_wheel_angle,
            ball_angle: BALL_START_ANGLE,
            ball_radius: BALL_START_RADIUS,
            tick: 0,
            total_ticks: curves.total_ticks,
        };
        self.outcome = None;
        self.landing = None;
        self.phase = Phase::Spinning;
    }

    /// Advances one step. Returns the outcome on the tick that ends the spin,
    /// `None` otherwise (including when no spin is running).
    pub fn tick(&mut self, wheel: &WheelLayout) -> Option<Outcome> {
        if self.phase != Phase::Spinning {
            return None;
        }

        self.state.tick += 1;
        let t = self.state.tick;
        self.state.wheel_angle += self.active.wheel_speed(t);
        self.state.ball_angle += self.active.ball_speed(t);
        self.state.ball_radius = self.active.ball_radius(t, BALL_START_RADIUS);

        if t < self.state.total_ticks {
            return None;
        }

        let index = wheel.index_at(self.state.wheel_angle);
        let ball = BallPosition {
            angle: wheel.pocket_center(index, self.state.wheel_angle),
            radius: self.state.ball_radius,
            landed: true,
        };
        let outcome = Outcome {
            pocket: wheel.pockets()[index].clone(),
            wheel_angle: self.state.wheel_angle,
            ball,
        };
        self.landing = Some(ball);
        self.outcome = Some(outcome.clone());
        self.phase = Phase::Resolved;
        Some(outcome)
    }

    /// Starts a spin if idle, then ticks it to completion.
    pub fn run(&mut self, wheel: &WheelLayout) -> Result<Outcome, InvalidSpinRequest> {
        match self.phase {
            Phase::Idle => self.start(wheel)?,
            Phase::Spinning => {}
            Phase::Resolved => return Err(InvalidSpinRequest::AlreadySpinning),
        }
        loop {
            if let Some(outcome) = self.tick(wheel) {
                return Ok(outcome);
            }
        }
    }

    /// Returns to idle once the outcome has been consumed. The wheel stays
    /// where it stopped and the ball stays in its pocket until the next spin.
    pub fn reset(&mut self) -> Option<Outcome> {
        self.phase = Phase::Idle;
        self.state.tick = 0;
        self.state.total_ticks = self.kinematics.total_ticks;
        self.outcome.take()
    }

    pub fn ball(&self) -> Option<BallPosition> {
        match self.phase {
            Phase::Spinning => Some(BallPosition {
                angle: self.state.ball_angle,
                radius: self.state.ball_radius,
                landed: false,
            }),
            Phase::Resolved | Phase::Idle => self.landing,
        }
    }
}
