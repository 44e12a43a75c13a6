use core::fmt;

use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

/// Reads the whole board from whatever is displaying it.
pub trait PerceptionAdapter {
    /// Returns a reading for every cell; unrecognized cells are [`Reading::Unknown`].
    fn capture(&mut self) -> Snapshot;
}

/// Issues moves to whatever is displaying the board. Fire-and-forget.
pub trait ActuationAdapter {
    fn reveal(&mut self, coords: Coord2);
    fn mark(&mut self, coords: Coord2);
}

impl<T: PerceptionAdapter + ?Sized> PerceptionAdapter for &mut T {
    fn capture(&mut self) -> Snapshot {
        (**self).capture()
    }
}

impl<T: ActuationAdapter + ?Sized> ActuationAdapter for &mut T {
    fn reveal(&mut self, coords: Coord2) {
        (**self).reveal(coords)
    }

    fn mark(&mut self, coords: Coord2) {
        (**self).mark(coords)
    }
}

/// Valid transitions:
/// - Initializing -> Scanning
/// - Scanning -> Won | Lost | Deciding
/// - Deciding -> Stalled | Acting
/// - Acting -> Scanning
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    /// Board built, nothing perceived yet
    Initializing,
    Scanning,
    Deciding,
    Acting,
    Won,
    Lost,
    /// No strategy applies and nothing is left to guess
    Stalled,
}

impl LoopState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost | Self::Stalled)
    }
}

impl Default for LoopState {
    fn default() -> Self {
        Self::Initializing
    }
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Initializing => "initializing",
            Self::Scanning => "scanning",
            Self::Deciding => "deciding",
            Self::Acting => "acting",
            Self::Won => "won",
            Self::Lost => "lost",
            Self::Stalled => "stalled",
        })
    }
}

/// What a single [`DecisionLoop::step`] did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// State the loop is in after the step.
    pub state: LoopState,
    /// Status of the board perceived during the step.
    pub status: GameStatus,
    /// Move dispatched during the step, if any.
    pub decision: Option<Decision>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub state: LoopState,
    pub steps: usize,
}

/// Perceive, decide, act, and repeat until the board is won, lost or stalled.
#[derive(Debug)]
pub struct DecisionLoop<P, A, R = SmallRng> {
    config: SessionConfig,
    engine: DeductionEngine<R>,
    perception: P,
    actuation: A,
    board: BoardModel,
    state: LoopState,
    status: GameStatus,
    steps: usize,
}

impl<P, A, R> DecisionLoop<P, A, R>
where
    P: PerceptionAdapter,
    A: ActuationAdapter,
    R: RandomSource,
{
    pub fn new(
        config: SessionConfig,
        engine: DeductionEngine<R>,
        perception: P,
        actuation: A,
    ) -> Self {
        Self {
            config,
            engine,
            perception,
            actuation,
            board: BoardModel::new(config.size),
            state: LoopState::default(),
            status: GameStatus::Playing,
            steps: 0,
        }
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn board(&self) -> &BoardModel {
        &self.board
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Number of moves dispatched so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Runs one scan-decide-act cycle. A no-op once the loop is terminal.
    ///
    /// A snapshot that does not fit the configured board is rejected and the
    /// loop is left as it was.
    pub fn step(&mut self) -> Result<StepReport> {
        if self.state.is_terminal() {
            return Ok(self.report(None));
        }

        let snapshot = self.perception.capture();
        let board = self.board.apply(&snapshot).inspect_err(|err| {
            log::error!("Rejected snapshot of size {:?}: {err}", snapshot.size());
        })?;
        self.state = LoopState::Scanning;

        let unknown = snapshot.unknown_count();
        if unknown > 0 {
            log::debug!("{unknown} cells unrecognized, keeping their previous state");
        }
        self.board = board;
        log::trace!("Board after scan:\n{}", self.board);

        let status = evaluate(&self.board);
        if status != self.status {
            log::info!("Status changed from {} to {}", self.status, status);
            self.status = status;
        }

        match status {
            GameStatus::Won => return Ok(self.finish(LoopState::Won)),
            GameStatus::Lost => return Ok(self.finish(LoopState::Lost)),
            GameStatus::Playing => {}
        }

        self.state = LoopState::Deciding;
        let Some(decision) = self.engine.decide(&self.board) else {
            log::warn!("No move left to make");
            return Ok(self.finish(LoopState::Stalled));
        };
        log::debug!(
            "Step {}: {} by {}",
            self.steps + 1,
            decision.action,
            decision.strategy
        );

        self.state = LoopState::Acting;
        match decision.action {
            Action::Reveal(coords) => self.actuation.reveal(coords),
            Action::Mark(coords) => self.actuation.mark(coords),
        }
        self.steps += 1;
        self.state = LoopState::Scanning;

        Ok(self.report(Some(decision)))
    }

    /// Steps until the loop reaches a terminal state.
    pub fn run(&mut self) -> Result<Outcome> {
        loop {
            let report = self.step()?;
            if report.state.is_terminal() {
                return Ok(Outcome {
                    state: report.state,
                    steps: self.steps,
                });
            }
        }
    }

    fn finish(&mut self, state: LoopState) -> StepReport {
        log::info!("Session ended {} after {} moves", state, self.steps);
        self.state = state;
        self.report(None)
    }

    fn report(&self, decision: Option<Decision>) -> StepReport {
        StepReport {
            state: self.state,
            status: self.status,
            decision,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::VecDeque;
    use alloc::vec::Vec;

    use super::*;

    /// Replays snapshots in order, repeating the last one forever.
    struct ScriptedPerception {
        frames: VecDeque<Snapshot>,
        captures: usize,
    }

    impl ScriptedPerception {
        fn new(frames: &[&str]) -> Self {
            Self {
                frames: frames.iter().map(|text| Snapshot::parse(text).unwrap()).collect(),
                captures: 0,
            }
        }
    }

    impl PerceptionAdapter for ScriptedPerception {
        fn capture(&mut self) -> Snapshot {
            self.captures += 1;
            if self.frames.len() > 1 {
                self.frames.pop_front().unwrap()
            } else {
                self.frames[0].clone()
            }
        }
    }

    #[derive(Default)]
    struct RecordingActuator {
        actions: Vec<Action>,
    }

    impl ActuationAdapter for RecordingActuator {
        fn reveal(&mut self, coords: Coord2) {
            self.actions.push(Action::Reveal(coords));
        }

        fn mark(&mut self, coords: Coord2) {
            self.actions.push(Action::Mark(coords));
        }
    }

    fn config(rows: Coord, cols: Coord) -> SessionConfig {
        SessionConfig::new((rows, cols)).unwrap()
    }

    #[test]
    fn starts_initializing_with_unopened_board() {
        let mut eyes = ScriptedPerception::new(&["##\n##"]);
        let mut hands = RecordingActuator::default();
        let session =
            DecisionLoop::new(config(2, 2), DeductionEngine::seeded(0), &mut eyes, &mut hands);

        assert_eq!(session.state(), LoopState::Initializing);
        assert_eq!(session.board(), &BoardModel::new((2, 2)));
        assert_eq!(session.steps(), 0);
    }

    #[test]
    fn step_dispatches_the_deduced_move() {
        let mut eyes = ScriptedPerception::new(&["F1#\n.1#\n..."]);
        let mut hands = RecordingActuator::default();
        let mut session =
            DecisionLoop::new(config(3, 3), DeductionEngine::seeded(0), &mut eyes, &mut hands);

        let report = session.step().unwrap();

        assert_eq!(report.state, LoopState::Scanning);
        assert_eq!(report.status, GameStatus::Playing);
        assert_eq!(
            report.decision,
            Some(Decision {
                action: Action::Reveal((0, 2)),
                strategy: Strategy::SafeReveal,
            })
        );
        drop(session);
        assert_eq!(hands.actions, [Action::Reveal((0, 2))]);
    }

    #[test]
    fn marks_are_sent_as_marks() {
        let mut eyes = ScriptedPerception::new(&["#1\n11"]);
        let mut hands = RecordingActuator::default();
        let mut session =
            DecisionLoop::new(config(2, 2), DeductionEngine::seeded(0), &mut eyes, &mut hands);

        session.step().unwrap();

        drop(session);
        assert_eq!(hands.actions, [Action::Mark((0, 0))]);
    }

    #[test]
    fn runs_until_won() {
        let mut eyes = ScriptedPerception::new(&["##\n##", "1#\n##", "..\n.#", "..\n.."]);
        let mut hands = RecordingActuator::default();
        let mut session =
            DecisionLoop::new(config(2, 2), DeductionEngine::seeded(5), &mut eyes, &mut hands);

        let outcome = session.run().unwrap();

        assert_eq!(outcome.state, LoopState::Won);
        assert_eq!(outcome.steps, 3);
        assert_eq!(session.board().count_in_state(CellState::Blank), 4);
        drop(session);
        assert_eq!(eyes.captures, 4);
        assert_eq!(hands.actions.len(), 3);
    }

    #[test]
    fn exploded_cell_ends_in_lost() {
        let mut eyes = ScriptedPerception::new(&["##\n##", "*#\n##"]);
        let mut hands = RecordingActuator::default();
        let mut session =
            DecisionLoop::new(config(2, 2), DeductionEngine::seeded(0), &mut eyes, &mut hands);

        let outcome = session.run().unwrap();

        assert_eq!(outcome, Outcome { state: LoopState::Lost, steps: 1 });
    }

    #[test]
    fn nothing_to_do_ends_in_stalled() {
        let mut eyes = ScriptedPerception::new(&["1F\n11"]);
        let mut hands = RecordingActuator::default();
        let mut session =
            DecisionLoop::new(config(2, 2), DeductionEngine::seeded(0), &mut eyes, &mut hands);

        let outcome = session.run().unwrap();

        assert_eq!(outcome, Outcome { state: LoopState::Stalled, steps: 0 });
        drop(session);
        assert!(hands.actions.is_empty());
    }

    #[test]
    fn terminal_state_is_sticky() {
        let mut eyes = ScriptedPerception::new(&["*."]);
        let mut hands = RecordingActuator::default();
        let mut session =
            DecisionLoop::new(config(1, 2), DeductionEngine::seeded(0), &mut eyes, &mut hands);

        assert_eq!(session.step().unwrap().state, LoopState::Lost);
        let again = session.step().unwrap();

        assert_eq!(again.state, LoopState::Lost);
        assert_eq!(again.status, GameStatus::Lost);
        assert_eq!(again.decision, None);
        drop(session);
        assert_eq!(eyes.captures, 1);
    }

    #[test]
    fn malformed_snapshot_leaves_loop_untouched() {
        let mut eyes = ScriptedPerception::new(&["###\n###"]);
        let mut hands = RecordingActuator::default();
        let mut session =
            DecisionLoop::new(config(2, 2), DeductionEngine::seeded(0), &mut eyes, &mut hands);

        assert_eq!(session.step(), Err(GameError::InvalidBoardShape));
        assert_eq!(session.state(), LoopState::Initializing);
        assert_eq!(session.board(), &BoardModel::new((2, 2)));
    }

    #[test]
    fn rescanning_the_same_snapshot_is_idempotent() {
        let frame = "F1#\n.1#\n...";
        let mut eyes = ScriptedPerception::new(&[frame, frame]);
        let mut hands = RecordingActuator::default();
        let mut session =
            DecisionLoop::new(config(3, 3), DeductionEngine::seeded(9), &mut eyes, &mut hands);

        let first = session.step().unwrap();
        let board_after_first = session.board().clone();
        let second = session.step().unwrap();

        assert_eq!(session.board(), &board_after_first);
        assert_eq!(first.decision, second.decision);
    }

    #[test]
    fn unknown_cells_do_not_drive_deductions() {
        // The clue reading drops out on the second scan; the earlier 1 stays.
        let mut eyes = ScriptedPerception::new(&["F1#\n...", "F?#\n..."]);
        let mut hands = RecordingActuator::default();
        let mut session =
            DecisionLoop::new(config(2, 3), DeductionEngine::seeded(0), &mut eyes, &mut hands);

        session.step().unwrap();
        let second = session.step().unwrap();

        assert_eq!(session.board().at((0, 1)), CellState::Numeric(1));
        assert_eq!(second.decision.map(|d| d.action), Some(Action::Reveal((0, 2))));
    }
}
