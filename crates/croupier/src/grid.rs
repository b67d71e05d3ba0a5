use crate::config::ConfigurationError;
use crate::geometry::{Point, Rect, Size};
use crate::wheel::{Color, Label, WheelLayout, WheelVariant};
use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Windows narrower than this get one of the compact table layouts.
pub const NARROW_BREAKPOINT: f64 = 960.0;

const NUMBERS: usize = 36;
const LANES: usize = 3;
const STEPS: usize = NUMBERS / LANES;

const EVEN_MONEY: [(&str, Color); 6] = [
    ("1-18", Color::Green),
    ("EVEN", Color::Green),
    ("RED", Color::Red),
    ("BLACK", Color::Black),
    ("ODD", Color::Green),
    ("19-36", Color::Green),
];
const DOZENS: [&str; 3] = ["1st 12", "2nd 12", "3rd 12"];
const COLUMN_LABEL: &str = "2 to 1";

fn unknown_viewport(s: &str) -> ConfigurationError {
    ConfigurationError::UnknownViewport(s.to_string())
}

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(
    serialize_all = "kebab-case",
    ascii_case_insensitive,
    parse_err_ty = ConfigurationError,
    parse_err_fn = unknown_viewport
)]
#[serde(rename_all = "kebab-case")]
pub enum ViewportClass {
    #[default]
    Wide,
    NarrowLandscape,
    NarrowPortrait,
}

impl ViewportClass {
    pub fn classify(width: f64, height: f64) -> Self {
        if width >= NARROW_BREAKPOINT {
            Self::Wide
        } else if height < width {
            Self::NarrowLandscape
        } else {
            Self::NarrowPortrait
        }
    }

    fn table(&self) -> GridTable {
        match self {
            Self::Wide => GridTable {
                orientation: Orientation::Horizontal,
                cell: Size::new(53.0, 53.0),
                origin: Point::new(53.0, 0.0),
                canvas: Size::new(795.0, 270.0),
            },
            Self::NarrowLandscape => GridTable {
                orientation: Orientation::Horizontal,
                cell: Size::new(26.0, 26.0),
                origin: Point::new(26.0, 0.0),
                canvas: Size::new(400.0, 135.0),
            },
            Self::NarrowPortrait => GridTable {
                orientation: Orientation::Vertical,
                cell: Size::new(26.0, 26.0),
                origin: Point::new(52.0, 26.0),
                canvas: Size::new(135.0, 400.0),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    /// Numbers run left to right, three rows high, zero on the left.
    Horizontal,
    /// Numbers run top to bottom, three columns wide, zero on top.
    Vertical,
}

/// Geometry of one size class. Positions are expressed in table units:
/// `step` runs along the number sequence (one per group of three numbers),
/// `lane` runs across it, with lanes 0..3 holding numbers and negative
/// lanes holding the outside bets.
#[derive(Debug, Clone, Copy)]
struct GridTable {
    orientation: Orientation,
    cell: Size,
    origin: Point,
    canvas: Size,
}

impl GridTable {
    fn rect(&self, step: f64, lane: f64, steps: f64, lanes: f64) -> Rect {
        let Size { width, height } = self.cell;
        match self.orientation {
            Orientation::Horizontal => Rect::new(
                self.origin.x + step * width,
                self.origin.y + (LANES as f64 - lane - lanes) * height,
                steps * width,
                lanes * height,
            ),
            Orientation::Vertical => Rect::new(
                self.origin.x + lane * width,
                self.origin.y + step * height,
                lanes * width,
                steps * height,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum BetCategory {
    Straight,
    Outside,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BetCell {
    pub rect: Rect,
    pub label: Label,
    pub color: Color,
    pub category: BetCategory,
}

impl BetCell {
    fn straight(rect: Rect, label: &str) -> Self {
        Self {
            rect,
            label: Label::new(label),
            color: Color::of(label),
            category: BetCategory::Straight,
        }
    }

    fn outside(rect: Rect, label: &str, color: Color) -> Self {
        Self {
            rect,
            label: Label::new(label),
            color,
            category: BetCategory::Outside,
        }
    }
}

/// Clickable cells of the betting table for one wheel variant and size class.
#[derive(Debug, Clone, PartialEq)]
pub struct BettingGrid {
    viewport: ViewportClass,
    canvas: Size,
    cells: Vec<BetCell>,
}

impl BettingGrid {
    pub fn layout(variant: WheelVariant, viewport: ViewportClass) -> Self {
        let table = viewport.table();
        let mut cells = Vec::with_capacity(NUMBERS + 16);

        // zero area spans all three lanes just before the first step
        let zeros = variant.zero_labels();
        let share = LANES as f64 / zeros.len() as f64;
        for (i, label) in zeros.iter().enumerate() {
            let rect = table.rect(-1.0, i as f64 * share, 1.0, share);
            cells.push(BetCell::straight(rect, label));
        }

        // numbers follow the wheel sequence, skipping its green pockets
        let wheel = WheelLayout::new(variant);
        let numbers = wheel.pockets().iter().filter(|p| p.color != Color::Green);
        let (mut step, mut lane) = (0, 0);
        for pocket in numbers {
            let rect = table.rect(step as f64, lane as f64, 1.0, 1.0);
            cells.push(BetCell::straight(rect, pocket.label.as_str()));
            lane += 1;
            if lane == LANES {
                lane = 0;
                step += 1;
            }
        }

        for lane in 0..LANES {
            let rect = table.rect(STEPS as f64, lane as f64, 1.0, 1.0);
            cells.push(BetCell::outside(rect, COLUMN_LABEL, Color::Green));
        }

        let dozen = (STEPS / DOZENS.len()) as f64;
        for (i, label) in DOZENS.iter().enumerate() {
            let rect = table.rect(i as f64 * dozen, -1.0, dozen, 1.0);
            cells.push(BetCell::outside(rect, label, Color::Green));
        }

        let pair = (STEPS / EVEN_MONEY.len()) as f64;
        for (i, (label, color)) in EVEN_MONEY.iter().enumerate() {
            let rect = table.rect(i as f64 * pair, -2.0, pair, 1.0);
            cells.push(BetCell::outside(rect, label, *color));
        }

        Self {
            viewport,
            canvas: table.canvas,
            cells,
        }
    }

    pub fn viewport(&self) -> ViewportClass {
        self.viewport
    }

    /// Canvas size the cells were laid out for.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn cells(&self) -> &[BetCell] {
        &self.cells
    }

    /// First cell strictly containing `point`; points on a cell border hit nothing.
    pub fn hit_test(&self, point: Point) -> Option<&BetCell> {
        self.cells.iter().find(|cell| cell.rect.contains(point))
    }

    /// Straight-up cell for a pocket label.
    pub fn find_straight(&self, label: &str) -> Option<&BetCell> {
        self.find(label, BetCategory::Straight)
    }

    pub fn find(&self, label: &str, category: BetCategory) -> Option<&BetCell> {
        self.cells
            .iter()
            .find(|cell| cell.category == category && cell.label.as_str() == label)
    }
}
