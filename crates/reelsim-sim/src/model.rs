//! Games as seen by the simulator

use reelsim_core::{EntropySource, FlatGame, PaylineGame, SpinResult, SymbolSet};

use crate::tally::HitTally;

/// What the simulator needs from a game: one spin's payout, with its hits
/// recorded into the worker's tally.
pub trait SpinModel: Sync {
    /// Play one spin on `source`, returning the payout in credits
    fn play(&self, source: &mut EntropySource, bet: f64, hits: &mut HitTally) -> SpinResult<f64>;

    /// Alphabet used to label hits
    fn symbols(&self) -> &SymbolSet;

    /// Analytic RTP when the game has a closed form
    fn theoretical_rtp(&self) -> Option<f64> {
        None
    }
}

impl SpinModel for FlatGame {
    fn play(&self, source: &mut EntropySource, bet: f64, hits: &mut HitTally) -> SpinResult<f64> {
        let spin = self.spin(source, bet)?;
        if let Some(key) = spin.win_key() {
            hits.record(key);
        }
        Ok(spin.payout)
    }

    fn symbols(&self) -> &SymbolSet {
        FlatGame::symbols(self)
    }

    fn theoretical_rtp(&self) -> Option<f64> {
        Some(FlatGame::theoretical_rtp(self))
    }
}

impl SpinModel for PaylineGame {
    fn play(&self, source: &mut EntropySource, bet: f64, hits: &mut HitTally) -> SpinResult<f64> {
        let spin = self.spin(source, bet)?;
        for key in spin.win_keys() {
            hits.record(key);
        }
        Ok(spin.payout())
    }

    fn symbols(&self) -> &SymbolSet {
        PaylineGame::symbols(self)
    }
}
