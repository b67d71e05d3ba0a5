use croupier::config::BetUnit;
use croupier::funding::AccountId;
use croupier::remote::Command;
use croupier::wheel::Label;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Spin,
    Clear,
    Bet(Label),
    Unit(BetUnit),
    Fund(AccountId),
    ConfigReload,
}

impl From<Command> for AppEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Spin => AppEvent::Spin,
            Command::Clear => AppEvent::Clear,
            Command::Bet(label) => AppEvent::Bet(label),
            Command::Unit(unit) => AppEvent::Unit(unit),
            Command::Fund(account) => AppEvent::Fund(account),
        }
    }
}
