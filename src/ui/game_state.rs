//! Game state management for the caro GUI

use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::rules::find_five_line;
use crate::search::CacheStats;
use crate::{Board, Cell, Difficulty, Engine, EngineConfig, MoveResult, Pos};

/// Clock budget of player one (the human, who moves first)
pub const PLAYER_ONE_TIME: Duration = Duration::from_secs(3 * 60);
/// Clock budget of player two (the engine, or the second human)
pub const PLAYER_TWO_TIME: Duration = Duration::from_secs(4 * 60);

/// Player one always holds `Cell::Opponent`, player two `Cell::Engine`.
pub const PLAYER_ONE: Cell = Cell::Opponent;
pub const PLAYER_TWO: Cell = Cell::Engine;

/// Game mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Human against the engine
    VsEngine { difficulty: Difficulty },
    /// Two humans sharing the board
    Hotseat,
}

impl Default for GameMode {
    fn default() -> Self {
        GameMode::VsEngine {
            difficulty: Difficulty::default(),
        }
    }
}

impl GameMode {
    pub fn label(self) -> String {
        match self {
            GameMode::VsEngine { difficulty } => format!("vs engine ({difficulty})"),
            GameMode::Hotseat => "two players".to_string(),
        }
    }
}

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    FiveInRow,
    Timeout,
    BoardFull,
}

/// Game result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// `None` for a draw on a full board
    pub winner: Option<Cell>,
    pub reason: EndReason,
    pub winning_line: Vec<Pos>,
}

/// Per-player countdown clocks; only the side to move is running.
#[derive(Debug, Clone)]
pub struct GameClock {
    remaining: [Duration; 2],
    running: Option<(Cell, Instant)>,
}

fn slot(side: Cell) -> usize {
    usize::from(side == PLAYER_TWO)
}

impl GameClock {
    pub fn new(one: Duration, two: Duration) -> Self {
        Self {
            remaining: [one, two],
            running: None,
        }
    }

    /// Charge the running side and start `side`'s clock.
    pub fn switch_to(&mut self, side: Cell, now: Instant) {
        self.stop(now);
        self.running = Some((side, now));
    }

    pub fn stop(&mut self, now: Instant) {
        if let Some((side, since)) = self.running.take() {
            let spent = now.saturating_duration_since(since);
            let left = &mut self.remaining[slot(side)];
            *left = left.saturating_sub(spent);
        }
    }

    pub fn remaining(&self, side: Cell, now: Instant) -> Duration {
        let banked = self.remaining[slot(side)];
        match self.running {
            Some((running, since)) if running == side => {
                banked.saturating_sub(now.saturating_duration_since(since))
            }
            _ => banked,
        }
    }

    /// The running side, if its time is used up.
    pub fn flagged(&self, now: Instant) -> Option<Cell> {
        self.running
            .map(|(side, _)| side)
            .filter(|&side| self.remaining(side, now).is_zero())
    }
}

impl Default for GameClock {
    fn default() -> Self {
        Self::new(PLAYER_ONE_TIME, PLAYER_TWO_TIME)
    }
}

/// Engine computation state
///
/// The engine itself travels to the worker thread and back, so its cache
/// and random source persist across moves.
pub enum AiState {
    Idle,
    Thinking {
        receiver: Receiver<(Engine, MoveResult)>,
        start_time: Instant,
    },
}

/// Main game state
pub struct GameState {
    pub board: Board,
    pub mode: GameMode,
    pub current_turn: Cell,
    pub game_over: Option<GameResult>,
    pub last_move: Option<Pos>,
    pub move_history: Vec<(Pos, Cell)>,
    pub last_ai_result: Option<MoveResult>,
    pub ai_state: AiState,
    pub clock: GameClock,
    pub message: Option<String>,

    engine: Option<Engine>,
    config: EngineConfig,
}

impl GameState {
    pub fn new(mode: GameMode, config: EngineConfig) -> Self {
        let engine = Engine::new(config.clone());
        let mut clock = GameClock::default();
        clock.switch_to(PLAYER_ONE, Instant::now());
        Self {
            board: Board::new(config.board_size),
            mode,
            current_turn: PLAYER_ONE,
            game_over: None,
            last_move: None,
            move_history: Vec::new(),
            last_ai_result: None,
            ai_state: AiState::Idle,
            clock,
            message: None,
            engine: Some(engine),
            config,
        }
    }

    /// Cache statistics of the idle engine (`None` while it is searching)
    pub fn cache_stats(&self) -> Option<CacheStats> {
        self.engine.as_ref().map(Engine::cache_stats)
    }

    /// Start a new game, keeping the mode.
    ///
    /// A search still running is abandoned; its engine is replaced.
    pub fn reset(&mut self) {
        if self.is_ai_thinking() || self.engine.is_none() {
            self.engine = Some(Engine::new(self.config.clone()));
        }
        if let Some(engine) = &self.engine {
            engine.clear_cache();
        }
        self.board = Board::new(self.config.board_size);
        self.current_turn = PLAYER_ONE;
        self.game_over = None;
        self.last_move = None;
        self.move_history.clear();
        self.last_ai_result = None;
        self.ai_state = AiState::Idle;
        self.clock = GameClock::default();
        self.clock.switch_to(PLAYER_ONE, Instant::now());
        self.message = None;
    }

    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn move_count(&self) -> usize {
        self.move_history.len()
    }

    pub fn is_human_turn(&self) -> bool {
        match self.mode {
            GameMode::VsEngine { .. } => self.current_turn == PLAYER_ONE,
            GameMode::Hotseat => true,
        }
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.is_human_turn()
    }

    pub fn is_ai_thinking(&self) -> bool {
        matches!(self.ai_state, AiState::Thinking { .. })
    }

    /// Attempt to place the current player's stone at `pos`
    pub fn try_place_stone(&mut self, pos: Pos) -> Result<(), String> {
        if self.game_over.is_some() {
            return Err("Game is over".to_string());
        }
        if self.is_ai_thinking() || !self.is_human_turn() {
            return Err("Not your turn".to_string());
        }
        if !self.board.is_empty(pos) {
            return Err("Cell is occupied".to_string());
        }

        self.execute_move(pos, Instant::now());
        Ok(())
    }

    /// Place a stone for the side to move (human or engine).
    fn execute_move(&mut self, pos: Pos, now: Instant) {
        let side = self.current_turn;
        self.board.place(pos, side);
        self.move_history.push((pos, side));
        self.last_move = Some(pos);
        self.message = None;

        if let Some(line) = find_five_line(&self.board, side) {
            self.finish(Some(side), EndReason::FiveInRow, line, now);
            return;
        }
        if self.board.is_full() {
            self.finish(None, EndReason::BoardFull, Vec::new(), now);
            return;
        }

        self.current_turn = side.other();
        self.clock.switch_to(self.current_turn, now);
    }

    fn finish(&mut self, winner: Option<Cell>, reason: EndReason, winning_line: Vec<Pos>, now: Instant) {
        self.clock.stop(now);
        debug!(?winner, ?reason, moves = self.move_history.len(), "game over");
        self.game_over = Some(GameResult {
            winner,
            reason,
            winning_line,
        });
    }

    /// End the game if the side to move has run out of time.
    pub fn check_clock(&mut self, now: Instant) {
        if self.game_over.is_some() {
            return;
        }
        if let Some(side) = self.clock.flagged(now) {
            self.finish(Some(side.other()), EndReason::Timeout, Vec::new(), now);
        }
    }

    /// Hand the position to the engine on a worker thread.
    pub fn start_ai_thinking(&mut self) {
        if !self.is_ai_turn() || self.is_ai_thinking() || self.game_over.is_some() {
            return;
        }
        let GameMode::VsEngine { difficulty } = self.mode else {
            return;
        };
        let Some(mut engine) = self.engine.take() else {
            return;
        };

        let board = self.board.clone();
        let (tx, rx) = channel();

        thread::spawn(move || {
            let result = engine.select_move_with_stats(&board, difficulty);
            let _ = tx.send((engine, result));
        });

        self.ai_state = AiState::Thinking {
            receiver: rx,
            start_time: Instant::now(),
        };
    }

    /// Collect the engine's move if the worker has finished.
    pub fn check_ai_result(&mut self) {
        let received = match &self.ai_state {
            AiState::Thinking { receiver, .. } => match receiver.try_recv() {
                Ok(received) => received,
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Disconnected) => {
                    warn!("engine worker exited without a result");
                    self.ai_state = AiState::Idle;
                    self.engine = Some(Engine::new(self.config.clone()));
                    self.message = Some("Engine error".to_string());
                    return;
                }
            },
            AiState::Idle => return,
        };

        let (engine, result) = received;
        self.ai_state = AiState::Idle;
        self.engine = Some(engine);

        if self.game_over.is_some() {
            return;
        }
        match result.best_move {
            Some(pos) if self.board.is_empty(pos) => self.execute_move(pos, Instant::now()),
            Some(pos) => {
                warn!(%pos, "engine returned an occupied cell");
                self.message = Some("Engine returned an invalid move".to_string());
            }
            None => self.message = Some("Engine found no move".to_string()),
        }
        self.last_ai_result = Some(result);
    }

    pub fn ai_thinking_elapsed(&self) -> Option<Duration> {
        match &self.ai_state {
            AiState::Thinking { start_time, .. } => Some(start_time.elapsed()),
            AiState::Idle => None,
        }
    }

    /// Take back the last move, or vs the engine everything back to the
    /// human's last move (also after the engine has won).
    pub fn undo(&mut self) {
        if self.move_history.is_empty() || self.is_ai_thinking() {
            return;
        }

        // Against the engine, keep taking back until the human is to move
        while let Some((pos, side)) = self.move_history.pop() {
            self.board.remove(pos);
            self.current_turn = side;
            if self.mode == GameMode::Hotseat || side == PLAYER_ONE {
                break;
            }
        }
        self.last_move = self.move_history.last().map(|&(pos, _)| pos);
        self.game_over = None;
        self.message = None;
        self.clock.switch_to(self.current_turn, Instant::now());
    }
}
