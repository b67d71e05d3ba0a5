use croupier::funding::FundingError;
use croupier::{BetError, InvalidSpinRequest};
use std::fmt::Display;

/// Status-line wording for a rejected action.
pub trait Rejection: Display {
    fn status_text(&self) -> String {
        sentence(&self.to_string())
    }
}

impl Rejection for BetError {
    fn status_text(&self) -> String {
        match self {
            Self::InsufficientBalance { .. } => "Insufficient balance!".to_string(),
            _ => sentence(&self.to_string()),
        }
    }
}

impl Rejection for InvalidSpinRequest {
    fn status_text(&self) -> String {
        match self {
            Self::NoBets => "Please place at least one bet!".to_string(),
            Self::AlreadySpinning => sentence(&self.to_string()),
        }
    }
}

impl Rejection for FundingError {}

fn sentence(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use croupier::Label;
    use croupier::funding::AccountId;

    #[test]
    fn test_every_rejection_has_text() {
        let cases: Vec<(Box<dyn Rejection>, &str)> = vec![
            (
                Box::new(BetError::InsufficientBalance {
                    requested: 10,
                    available: 5,
                }),
                "Insufficient balance!",
            ),
            (
                Box::new(BetError::SpinInProgress),
                "Bets are locked while the wheel is spinning",
            ),
            (
                Box::new(BetError::UnsupportedBet(Label::new("RED"))),
                "'RED' is not a straight-up number",
            ),
            (Box::new(InvalidSpinRequest::NoBets), "Please place at least one bet!"),
            (
                Box::new(InvalidSpinRequest::AlreadySpinning),
                "A spin is already in progress",
            ),
            (
                Box::new(FundingError::AlreadyFunded(AccountId::new("p1"))),
                "Account p1 has already been funded",
            ),
        ];

        for (rejection, expected) in cases {
            assert_eq!(rejection.status_text(), expected);
        }
    }
}
