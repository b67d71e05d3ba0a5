use clap::{Parser, Subcommand};
use croupier::Game;
use croupier::config::{BetUnit, TableConfig};
use croupier::funding::{AccountId, Faucet};
use croupier::ledger::Chips;
use croupier::remote::{Command, SOCKET_PATH};
use croupier::wheel::{Label, WheelVariant};
use std::io::Write;
use std::os::unix::net::UnixStream;

#[derive(Parser, Debug)]
#[command(name = "croupier", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Spin the wheel on the running table
    Spin,
    /// Take back every bet on the running table
    Clear,
    /// Place one bet unit on a number on the running table
    Bet {
        /// Number to bet on ("0", "00", "1" to "36")
        label: String,
    },
    /// Change the chip value used for new bets on the running table
    Unit {
        /// One of 10, 20, 50 or 100
        amount: BetUnit,
    },
    /// Ask the running table for play money
    Fund {
        /// Account to credit; each account is funded once
        account: String,
    },
    /// Play rounds headlessly and print each settlement
    Simulate {
        /// Numbers to bet on every round
        #[arg(required = true)]
        bets: Vec<String>,

        #[arg(short = 'w', long, default_value = "european")]
        variant: WheelVariant,

        #[arg(short = 'u', long, default_value = "10")]
        unit: BetUnit,

        #[arg(short = 'b', long, default_value_t = 1000)]
        balance: Chips,

        #[arg(short = 'r', long, default_value_t = 1)]
        rounds: u32,

        /// Seed for a reproducible sequence of outcomes
        #[arg(short = 's', long)]
        seed: Option<u64>,

        /// Request play money for this account when the balance runs out
        #[arg(short = 'a', long)]
        account: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Spin => send_command(&Command::Spin),
        Commands::Clear => send_command(&Command::Clear),
        Commands::Bet { label } => send_command(&Command::Bet(Label::new(label))),
        Commands::Unit { amount } => send_command(&Command::Unit(amount)),
        Commands::Fund { account } => send_command(&Command::Fund(AccountId::new(account))),
        Commands::Simulate {
            bets,
            variant,
            unit,
            balance,
            rounds,
            seed,
            account,
        } => simulate(
            TableConfig {
                wheel_variant: variant,
                base_bet_unit: unit,
                starting_balance: balance,
                seed,
                ..TableConfig::default()
            },
            &bets,
            rounds,
            account.map(AccountId::new),
        ),
    }
}

fn simulate(
    config: TableConfig,
    bets: &[String],
    rounds: u32,
    account: Option<AccountId>,
) -> anyhow::Result<()> {
    let mut game = Game::new(config)?;
    let mut faucet = Faucet::default();

    for round in 1..=rounds {
        if game.available() < game.bet_unit().amount()
            && let Some(account) = &account
        {
            match game.fund(&mut faucet, account) {
                Ok(granted) => println!("Round {}: {} funded with ${}", round, account, granted),
                Err(e) => log::warn!("Round {}: {}", round, e),
            }
        }
        for label in bets {
            if let Err(e) = game.place(label) {
                log::warn!("Round {}: bet on {} rejected: {}", round, label, e);
            }
        }
        if game.bets().is_empty() {
            println!("Round {}: no bets could be placed, stopping", round);
            break;
        }

        let settlement = game.run_spin()?;
        let outcome = if settlement.is_win() {
            format!("won ${}", settlement.payout)
        } else {
            format!("lost ${}", settlement.forfeited)
        };
        println!(
            "Round {}: {} {} - {}, balance ${}",
            round,
            settlement.winning.label,
            settlement.winning.color,
            outcome,
            game.balance()
        );
    }
    Ok(())
}

fn send_command(command: &Command) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to the roulette table at {}: {}. Is it running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", command)?;
    Ok(())
}
