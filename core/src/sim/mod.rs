//! In-process minefield that stands in for a real screen and mouse.

use alloc::rc::Rc;
use core::cell::RefCell;

use crate::*;
pub use board::*;
pub use layout::*;

mod board;
mod layout;

/// Shared handle to a [`SimulatedBoard`], usable as both perception and
/// actuation for a [`DecisionLoop`]. Clones point at the same board.
#[derive(Clone, Debug)]
pub struct SimulatedGame {
    board: Rc<RefCell<SimulatedBoard>>,
}

impl SimulatedGame {
    pub fn new(mine_layout: MineLayout) -> Self {
        Self {
            board: Rc::new(RefCell::new(SimulatedBoard::new(mine_layout))),
        }
    }

    pub fn random(config: MinefieldConfig, seed: u64) -> Self {
        Self::new(MineLayout::random(config, seed))
    }

    pub fn size(&self) -> Coord2 {
        self.board.borrow().size()
    }

    pub fn state(&self) -> SimState {
        self.board.borrow().state()
    }

    /// Copy of the board as it stands now.
    pub fn board(&self) -> SimulatedBoard {
        self.board.borrow().clone()
    }
}

impl PerceptionAdapter for SimulatedGame {
    fn capture(&mut self) -> Snapshot {
        self.board.borrow().snapshot()
    }
}

impl ActuationAdapter for SimulatedGame {
    fn reveal(&mut self, coords: Coord2) {
        match self.board.borrow_mut().reveal(coords) {
            Ok(outcome) => log::trace!("Reveal at {coords:?}: {outcome:?}"),
            Err(err) => log::warn!("Ignored reveal at {coords:?}: {err}"),
        }
    }

    fn mark(&mut self, coords: Coord2) {
        match self.board.borrow_mut().mark(coords) {
            Ok(outcome) => log::trace!("Mark at {coords:?}: {outcome:?}"),
            Err(err) => log::warn!("Ignored mark at {coords:?}: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(game: &SimulatedGame, seed: u64) -> DecisionLoop<SimulatedGame, SimulatedGame> {
        let config = SessionConfig::new(game.size()).unwrap();
        DecisionLoop::new(config, DeductionEngine::seeded(seed), game.clone(), game.clone())
    }

    #[test]
    fn clones_share_one_board() {
        let game = SimulatedGame::new(MineLayout::from_mine_coords((2, 2), &[(1, 1)]).unwrap());
        let mut hands = game.clone();

        hands.mark((1, 1));

        assert_eq!(game.board().cell_at((1, 1)), CellState::Flagged);
    }

    #[test]
    fn loop_stops_on_exploded_mine() {
        // every cell is a mine, so the first guess loses
        let game = SimulatedGame::new(
            MineLayout::from_mine_coords((2, 2), &[(0, 0), (0, 1), (1, 0), (1, 1)]).unwrap(),
        );

        let outcome = session(&game, 3).run().unwrap();

        assert_eq!(outcome, Outcome { state: LoopState::Lost, steps: 1 });
        assert_eq!(game.state(), SimState::Lost);
    }

    #[test]
    fn safe_board_is_won_after_one_reveal() {
        let game = SimulatedGame::new(MineLayout::from_mine_coords((4, 4), &[]).unwrap());

        let outcome = session(&game, 0).run().unwrap();

        assert_eq!(outcome, Outcome { state: LoopState::Won, steps: 1 });
        assert_eq!(game.state(), SimState::Won);
    }

    /// Always guesses the first unopened cell.
    struct FirstCell;

    impl RandomSource for FirstCell {
        fn pick(&mut self, _len: usize) -> usize {
            0
        }
    }

    #[test]
    fn cleared_board_with_flags_stalls() {
        // The simulator flags leftover mines on a win, and flags never count
        // as resolved, so a cleared board reads as playing with nothing to try.
        let game = SimulatedGame::new(MineLayout::from_mine_coords((1, 3), &[(0, 2)]).unwrap());
        let config = SessionConfig::new(game.size()).unwrap();
        let mut session =
            DecisionLoop::new(config, DeductionEngine::new(FirstCell), game.clone(), game.clone());

        let outcome = session.run().unwrap();

        assert_eq!(outcome, Outcome { state: LoopState::Stalled, steps: 1 });
        assert_eq!(game.state(), SimState::Won);
        assert_eq!(session.board().at((0, 2)), CellState::Flagged);
    }

    #[test]
    fn random_games_always_terminate_with_sound_marks() {
        for seed in 0..25 {
            let game = SimulatedGame::random(MinefieldConfig::beginner(), seed);
            let mut session = session(&game, seed);

            let outcome = session.run().unwrap();

            assert!(outcome.state.is_terminal());
            let sim = game.board();
            for (coords, state) in session.board().iter_cells() {
                if state == CellState::Flagged {
                    assert!(sim.mine_layout().contains_mine(coords), "seed {seed}: {coords:?}");
                }
            }
            match outcome.state {
                LoopState::Lost => assert_eq!(sim.state(), SimState::Lost),
                LoopState::Stalled => assert_eq!(sim.state(), SimState::Won),
                state => panic!("seed {seed}: unexpected {state}"),
            }
        }
    }
}
