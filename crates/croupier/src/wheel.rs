use crate::config::ConfigurationError;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::DeserializeFromStr;
use std::f64::consts::{PI, TAU};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Angle (radians) at which pocket 0 starts when the wheel is at rest.
pub const START_ANGLE: f64 = -1.65;

const EUROPEAN_SEQUENCE: [&str; 37] = [
    "0", "32", "15", "19", "4", "21", "2", "25", "17", "34", "6", "27", "13", "36", "11", "30",
    "8", "23", "10", "5", "24", "16", "33", "1", "20", "14", "31", "9", "22", "18", "29", "7",
    "28", "12", "35", "3", "26",
];

const AMERICAN_SEQUENCE: [&str; 38] = [
    "0", "28", "9", "26", "30", "11", "7", "20", "32", "17", "5", "22", "34", "15", "3", "24",
    "36", "13", "1", "00", "27", "10", "25", "29", "12", "8", "19", "31", "18", "6", "21", "33",
    "16", "4", "23", "35", "14", "2",
];

const RED_NUMBERS: [u8; 18] = [
    1, 3, 5, 7, 9, 12, 14, 16, 18, 19, 21, 23, 25, 27, 30, 32, 34, 36,
];

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct Label(String);

crate::impl_string_newtype!(Label);

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Green,
    Red,
    Black,
}

impl Color {
    /// Colour of a straight-up number on a real wheel. Anything that is not
    /// a number from 1 to 36 ("0", "00") is green.
    pub fn of(label: &str) -> Self {
        match label.parse::<u8>() {
            Ok(0) | Err(_) => Self::Green,
            Ok(n) if RED_NUMBERS.contains(&n) => Self::Red,
            Ok(_) => Self::Black,
        }
    }
}

fn unknown_variant(s: &str) -> ConfigurationError {
    ConfigurationError::UnknownVariant(s.to_string())
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
    ascii_case_insensitive,
    parse_err_ty = ConfigurationError,
    parse_err_fn = unknown_variant
)]
#[serde(rename_all = "lowercase")]
pub enum WheelVariant {
    /// Single zero, 37 pockets.
    #[default]
    #[strum(to_string = "european", serialize = "eu", serialize = "single-zero")]
    European,
    /// Zero and double zero, 38 pockets.
    #[strum(to_string = "american", serialize = "us", serialize = "double-zero")]
    American,
}

impl WheelVariant {
    fn sequence(&self) -> &'static [&'static str] {
        match self {
            Self::European => &EUROPEAN_SEQUENCE,
            Self::American => &AMERICAN_SEQUENCE,
        }
    }

    pub fn zero_labels(&self) -> &'static [&'static str] {
        match self {
            Self::European => &["0"],
            Self::American => &["0", "00"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pocket {
    pub index: usize,
    pub label: Label,
    pub color: Color,
}

/// The fixed pocket order of a wheel. Pocket `i` spans
/// `[START_ANGLE + i * arc, START_ANGLE + (i + 1) * arc)` on a wheel at rest.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelLayout {
    variant: WheelVariant,
    pockets: Vec<Pocket>,
    arc: f64,
}

impl WheelLayout {
    pub fn new(variant: WheelVariant) -> Self {
        let pockets: Vec<Pocket> = variant
            .sequence()
            .iter()
            .enumerate()
            .map(|(index, &label)| Pocket {
                index,
                label: Label::new(label),
                color: Color::of(label),
            })
            .collect();
        let arc = PI / (pockets.len() as f64 / 2.0);

        Self {
            variant,
            pockets,
            arc,
        }
    }

    pub fn variant(&self) -> WheelVariant {
        self.variant
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }

    pub fn len(&self) -> usize {
        self.pockets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pockets.is_empty()
    }

    pub fn arc(&self) -> f64 {
        self.arc
    }

    pub fn pocket(&self, index: usize) -> Option<&Pocket> {
        self.pockets.get(index)
    }

    pub fn find(&self, label: &str) -> Option<&Pocket> {
        self.pockets.iter().find(|p| p.label.as_str() == label)
    }

    /// Index of the pocket selected by a wheel rotated to `wheel_angle`.
    pub fn index_at(&self, wheel_angle: f64) -> usize {
        let offset = (wheel_angle - START_ANGLE).rem_euclid(TAU);
        (offset / self.arc).floor() as usize % self.pockets.len()
    }

    pub fn pocket_at(&self, wheel_angle: f64) -> &Pocket {
        &self.pockets[self.index_at(wheel_angle)]
    }

    /// Screen angle of the middle of pocket `index` when the wheel's first
    /// pocket is drawn starting at `wheel_angle`.
    pub fn pocket_center(&self, index: usize, wheel_angle: f64) -> f64 {
        wheel_angle + index as f64 * self.arc + self.arc / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_pocket_counts() {
        let european = WheelLayout::new(WheelVariant::European);
        let american = WheelLayout::new(WheelVariant::American);
        assert_eq!(european.len(), 37);
        assert_eq!(american.len(), 38);
    }

    #[test]
    fn test_green_pockets() {
        for variant in WheelVariant::iter() {
            let wheel = WheelLayout::new(variant);
            let greens: Vec<_> = wheel
                .pockets()
                .iter()
                .filter(|p| p.color == Color::Green)
                .map(|p| p.label.as_str())
                .collect();
            assert_eq!(greens, variant.zero_labels());

            let reds = wheel.pockets().iter().filter(|p| p.color == Color::Red).count();
            let blacks = wheel.pockets().iter().filter(|p| p.color == Color::Black).count();
            assert_eq!(reds, 18);
            assert_eq!(blacks, 18);
            assert_eq!(greens.len() + reds + blacks, wheel.len());
        }
    }

    #[test]
    fn test_every_number_appears_once() {
        for variant in WheelVariant::iter() {
            let wheel = WheelLayout::new(variant);
            let labels: HashSet<_> = wheel.pockets().iter().map(|p| p.label.as_str()).collect();
            assert_eq!(labels.len(), wheel.len());
            for n in 0..=36 {
                assert!(labels.contains(n.to_string().as_str()), "{variant} lacks {n}");
            }
        }
    }

    #[test]
    fn test_neighbouring_numbers_alternate_colour() {
        for variant in WheelVariant::iter() {
            let wheel = WheelLayout::new(variant);
            let pockets = wheel.pockets();
            for (i, pocket) in pockets.iter().enumerate() {
                let next = &pockets[(i + 1) % pockets.len()];
                if pocket.color != Color::Green && next.color != Color::Green {
                    assert_ne!(pocket.color, next.color, "{} next to {}", pocket.label, next.label);
                }
            }
        }
    }

    #[test]
    fn test_arcs_cover_full_circle() {
        for variant in WheelVariant::iter() {
            let wheel = WheelLayout::new(variant);
            assert!((wheel.arc() * wheel.len() as f64 - TAU).abs() < 1e-12);
        }
    }

    #[test]
    fn test_index_at_wraps_into_range() {
        let wheel = WheelLayout::new(WheelVariant::European);
        assert_eq!(wheel.index_at(START_ANGLE), 0);
        assert_eq!(wheel.index_at(START_ANGLE + 2.5 * wheel.arc()), 2);
        assert_eq!(wheel.index_at(START_ANGLE - 0.5 * wheel.arc()), 36);
        assert_eq!(wheel.index_at(START_ANGLE + 40.0 * TAU + 0.5 * wheel.arc()), 0);
        for k in -200..200 {
            assert!(wheel.index_at(k as f64 * 0.37) < wheel.len());
        }
    }

    #[test]
    fn test_known_colours() {
        assert_eq!(Color::of("0"), Color::Green);
        assert_eq!(Color::of("00"), Color::Green);
        assert_eq!(Color::of("32"), Color::Red);
        assert_eq!(Color::of("17"), Color::Black);
        assert_eq!(Color::of("10"), Color::Black);
        assert_eq!(Color::of("19"), Color::Red);
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!("European".parse::<WheelVariant>(), Ok(WheelVariant::European));
        assert_eq!("us".parse::<WheelVariant>(), Ok(WheelVariant::American));
        assert_eq!(
            "french".parse::<WheelVariant>(),
            Err(ConfigurationError::UnknownVariant("french".to_string()))
        );
        assert_eq!(WheelVariant::American.to_string(), "american");

        let variant: WheelVariant = serde_json::from_str("\"DOUBLE-ZERO\"").unwrap();
        assert_eq!(variant, WheelVariant::American);
        assert!(serde_json::from_str::<WheelVariant>("\"triple-zero\"").is_err());
    }
}
