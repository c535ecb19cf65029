//! Player balance
//!
//! A session is a plain value: every play consumes it and returns the
//! updated one. Bets are checked against the balance before any entropy is
//! drawn, so a rejected play leaves both the session and the stream intact.

use serde::{Deserialize, Serialize};

use crate::entropy::EntropySource;
use crate::error::{SpinError, SpinResult, validate_bet};
use crate::game::{FlatGame, FlatSpin, PaylineGame, PaylineSpin};

/// Default starting balance for interactive play
pub const DEFAULT_BALANCE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Session {
    balance: f64,
}

impl Session {
    pub fn new(balance: f64) -> SpinResult<Self> {
        if !balance.is_finite() || balance < 0.0 {
            return Err(SpinError::InvalidInput(format!(
                "balance must be a non-negative finite number, got {balance}"
            )));
        }
        Ok(Self { balance })
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    fn stake(&self, bet: f64) -> SpinResult<()> {
        validate_bet(bet)?;
        if bet > self.balance {
            return Err(SpinError::InsufficientBalance {
                balance: self.balance,
                bet,
            });
        }
        Ok(())
    }

    fn settle(self, bet: f64, payout: f64) -> Self {
        Self {
            balance: self.balance - bet + payout,
        }
    }

    /// Play one flat spin: `balance - bet + payout`
    pub fn play_flat(self, game: &FlatGame, source: &mut EntropySource, bet: f64) -> SpinResult<(Self, FlatSpin)> {
        self.stake(bet)?;
        let spin = game.spin(source, bet)?;
        log::debug!("flat spin paid {} on bet {}", spin.payout, bet);
        Ok((self.settle(bet, spin.payout), spin))
    }

    /// Play one payline spin
    pub fn play_lines(
        self,
        game: &PaylineGame,
        source: &mut EntropySource,
        bet: f64,
    ) -> SpinResult<(Self, PaylineSpin)> {
        self.stake(bet)?;
        let spin = game.spin(source, bet)?;
        log::debug!("payline spin paid {} on bet {}", spin.payout(), bet);
        Ok((self.settle(bet, spin.payout()), spin))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self {
            balance: DEFAULT_BALANCE,
        }
    }
}
