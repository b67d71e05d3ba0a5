use crate::ledger::Chips;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Grant handed out by [`Faucet`] when no amount is configured.
pub const DEFAULT_GRANT: Chips = 1000;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct AccountId(String);

crate::impl_string_newtype!(AccountId);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FundingError {
    #[error("no account connected")]
    NoAccount,
    #[error("account {0} has already been funded")]
    AlreadyFunded(AccountId),
}

/// Source of play money outside the game. Implementations never see game state;
/// the caller credits whatever they grant.
pub trait FundingService {
    fn request_funds(&mut self, account: &AccountId) -> Result<Chips, FundingError>;
}

/// In-memory service granting a fixed amount once per account.
#[derive(Debug, Clone)]
pub struct Faucet {
    grant: Chips,
    funded: HashSet<AccountId>,
}

impl Faucet {
    pub fn new(grant: Chips) -> Self {
        Self {
            grant,
            funded: HashSet::new(),
        }
    }
}

impl Default for Faucet {
    fn default() -> Self {
        Self::new(DEFAULT_GRANT)
    }
}

impl FundingService for Faucet {
    fn request_funds(&mut self, account: &AccountId) -> Result<Chips, FundingError> {
        if account.trim().is_empty() {
            return Err(FundingError::NoAccount);
        }
        if !self.funded.insert(account.clone()) {
            return Err(FundingError::AlreadyFunded(account.clone()));
        }
        log::info!("Granted {} chips to {}", self.grant, account);
        Ok(self.grant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faucet_funds_each_account_once() {
        let mut faucet = Faucet::new(500);
        let alice = AccountId::new("0xa11ce");
        let bob = AccountId::new("0xb0b");

        assert_eq!(faucet.request_funds(&alice), Ok(500));
        assert_eq!(faucet.request_funds(&bob), Ok(500));
        assert_eq!(
            faucet.request_funds(&alice),
            Err(FundingError::AlreadyFunded(alice.clone()))
        );
    }

    #[test]
    fn test_faucet_needs_an_account() {
        let mut faucet = Faucet::default();
        assert_eq!(
            faucet.request_funds(&AccountId::new("  ")),
            Err(FundingError::NoAccount)
        );
    }
}
