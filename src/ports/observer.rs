//! Observer port for batch runs
//!
//! Observers collect data while a batch of games is played without the
//! runner knowing about output formats.

use crate::{Result, analysis::GameSummary, simulation::TaggedOutcome};

/// Hooks called by [`crate::pipeline::BatchRunner`]
///
/// Call order:
/// 1. `on_batch_start` once
/// 2. for every game: `on_game_start`, `on_outcome` for each record in
///    emission order, then `on_game_end`
/// 3. `on_batch_end` once
///
/// All hooks default to doing nothing.
///
/// ```no_run
/// use monopoly_sim::{analysis::GameSummary, ports::Observer};
///
/// struct CountWins(usize);
///
/// impl Observer for CountWins {
///     fn on_game_end(&mut self, summary: &GameSummary) -> monopoly_sim::Result<()> {
///         if summary.is_win() {
///             self.0 += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_batch_start(&mut self, _title: &str, _total_games: usize) -> Result<()> {
        Ok(())
    }

    /// `game_no` is 1-based.
    fn on_game_start(&mut self, _game_no: usize) -> Result<()> {
        Ok(())
    }

    fn on_outcome(&mut self, _record: &TaggedOutcome) -> Result<()> {
        Ok(())
    }

    fn on_game_end(&mut self, _summary: &GameSummary) -> Result<()> {
        Ok(())
    }

    /// Last call of a batch; flush files and finish progress bars here.
    fn on_batch_end(&mut self) -> Result<()> {
        Ok(())
    }
}
