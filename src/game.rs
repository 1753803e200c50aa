//! Turn handling for a human-vs-computer game.
//!
//! A [`GameSession`] owns both fleets, both shot ledgers, the opponent's AI
//! state and a short event log. A player shot and the computer's reply are
//! applied together by [`GameSession::fire_shot`]; callers never observe a
//! half-finished turn.

use std::collections::VecDeque;

use log::{debug, info};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::ai::{AiState, Difficulty, Strategy};
use crate::board::Fleet;
use crate::common::{GameError, Mark, ShotResult};
use crate::config::{GameConfig, LOG_CAPACITY};
use crate::grid::Grid;
use crate::ledger::ShotLedger;

/// One of the two sides of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

/// Where the game currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    PlayerTurn,
    /// Only held while the computer's reply is being applied.
    OpponentTurn,
    GameOver { winner: Side },
}

/// A single resolved shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotReport {
    pub index: usize,
    pub result: ShotResult,
}

/// What a call to [`GameSession::fire_shot`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Repeat shot, shot out of turn or after the game ended. Nothing changed.
    Ignored,
    /// The player's shot and, unless it ended the game, the computer's reply.
    Played {
        player: ShotReport,
        opponent: Option<ShotReport>,
    },
}

/// Most recent status messages, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    entries: VecDeque<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(LOG_CAPACITY),
        }
    }

    /// Append a line, evicting the oldest past `LOG_CAPACITY`.
    pub fn push(&mut self, line: impl Into<String>) {
        self.entries.push_back(line.into());
        while self.entries.len() > LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}

/// Render-facing view of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellView {
    pub index: usize,
    /// Whether a ship sits here. `None` on the enemy board, where it is hidden.
    pub ship: Option<bool>,
    pub mark: Option<Mark>,
    /// The player may fire here right now.
    pub selectable: bool,
}

/// Complete state of one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    config: GameConfig,
    ai: AiState,
    player_fleet: Fleet,
    opponent_fleet: Fleet,
    /// Cells the player has fired on (the opponent's board).
    player_shots: ShotLedger,
    /// Cells the computer has fired on (the player's board).
    opponent_shots: ShotLedger,
    phase: Phase,
    log: EventLog,
}

impl GameSession {
    /// Start a game with freshly placed fleets for both sides.
    pub fn new(
        config: GameConfig,
        difficulty: Difficulty,
        rng: &mut SmallRng,
    ) -> Result<Self, GameError> {
        let grid = config.grid();
        let player_fleet = Fleet::random(rng, grid, config.fleet())?;
        let opponent_fleet = Fleet::random(rng, grid, config.fleet())?;
        info!(
            "new game on a {}x{} board, {} ships, {} opponent",
            grid.size(),
            grid.size(),
            config.fleet().len(),
            difficulty
        );
        Ok(Self {
            config,
            ai: AiState::fresh(difficulty),
            player_fleet,
            opponent_fleet,
            player_shots: ShotLedger::new(),
            opponent_shots: ShotLedger::new(),
            phase: Phase::PlayerTurn,
            log: EventLog::new(),
        })
    }

    /// Start a game from fleets placed by the caller.
    pub fn with_fleets(
        config: GameConfig,
        difficulty: Difficulty,
        player_fleet: Fleet,
        opponent_fleet: Fleet,
    ) -> Result<Self, GameError> {
        let session = Self {
            config,
            ai: AiState::fresh(difficulty),
            player_fleet,
            opponent_fleet,
            player_shots: ShotLedger::new(),
            opponent_shots: ShotLedger::new(),
            phase: Phase::PlayerTurn,
            log: EventLog::new(),
        };
        session.validate()?;
        Ok(session)
    }

    /// A new game with the same board, fleet and difficulty.
    pub fn restart(&self, rng: &mut SmallRng) -> Result<Self, GameError> {
        info!("restarting game");
        Self::new(self.config.clone(), self.difficulty(), rng)
    }

    /// Change the opponent's difficulty without touching boards or ledgers.
    ///
    /// Switching to a different level drops the old level's hunting state;
    /// selecting the current level again keeps it.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        if self.difficulty() != difficulty {
            info!("difficulty {} -> {}", self.difficulty(), difficulty);
            self.ai = AiState::fresh(difficulty);
        }
    }

    /// Fire the player's shot at `index` and, if the game goes on, let the
    /// computer answer.
    ///
    /// An index off the board is an error and changes nothing. A repeat
    /// shot, or one made when it isn't the player's turn, is ignored.
    pub fn fire_shot(&mut self, index: usize, rng: &mut SmallRng) -> Result<TurnOutcome, GameError> {
        let grid = self.grid();
        if !grid.contains(index) {
            return Err(GameError::InvalidIndex {
                index,
                cells: grid.cells(),
            });
        }
        if self.phase != Phase::PlayerTurn || self.player_shots.contains(index) {
            debug!("ignoring shot at {} in phase {:?}", index, self.phase);
            return Ok(TurnOutcome::Ignored);
        }

        let result = self.opponent_fleet.resolve_shot(index);
        self.player_shots.record(index, result.mark())?;
        debug!("player fires at {}: {:?}", index, result);
        self.log.push(match &result {
            ShotResult::Miss => "You missed.".to_string(),
            ShotResult::Hit(_) => "You HIT the computer!".to_string(),
            ShotResult::Sunk(name) => format!("You SUNK the computer's {}!", name),
        });
        let player = ShotReport { index, result };

        if self.opponent_fleet.all_sunk() {
            self.finish(Side::Player);
            return Ok(TurnOutcome::Played {
                player,
                opponent: None,
            });
        }

        self.phase = Phase::OpponentTurn;
        let opponent = self.opponent_reply(rng)?;
        if self.player_fleet.all_sunk() {
            self.finish(Side::Opponent);
        } else {
            self.phase = Phase::PlayerTurn;
        }
        Ok(TurnOutcome::Played { player, opponent })
    }

    fn opponent_reply(&mut self, rng: &mut SmallRng) -> Result<Option<ShotReport>, GameError> {
        let grid = self.grid();
        let Some(index) = self.ai.pick_shot(rng, &self.opponent_shots, grid) else {
            return Ok(None);
        };
        let result = self.player_fleet.resolve_shot(index);
        self.opponent_shots.record(index, result.mark())?;
        self.ai.observe(index, &result, grid);
        debug!("computer ({}) fires at {}: {:?}", self.difficulty(), index, result);
        self.log.push(match &result {
            ShotResult::Miss => "Computer missed.".to_string(),
            ShotResult::Hit(_) => "Computer HIT your ship!".to_string(),
            ShotResult::Sunk(name) => format!("Computer SUNK your {}!", name),
        });
        Ok(Some(ShotReport { index, result }))
    }

    fn finish(&mut self, winner: Side) {
        self.phase = Phase::GameOver { winner };
        self.log.push(match winner {
            Side::Player => "You win! All enemy ships sunk.",
            Side::Opponent => "Computer wins. Your fleet has been sunk.",
        });
        info!(
            "game over, {:?} wins after {} player shots",
            winner,
            self.player_shots.len()
        );
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.config.grid()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.ai.difficulty()
    }

    pub fn ai(&self) -> &AiState {
        &self.ai
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Side whose move is awaited, `None` once the game is over.
    pub fn turn(&self) -> Option<Side> {
        match self.phase {
            Phase::PlayerTurn => Some(Side::Player),
            Phase::OpponentTurn => Some(Side::Opponent),
            Phase::GameOver { .. } => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, Phase::GameOver { .. })
    }

    pub fn winner(&self) -> Option<Side> {
        match self.phase {
            Phase::GameOver { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn player_fleet(&self) -> &Fleet {
        &self.player_fleet
    }

    pub fn opponent_fleet(&self) -> &Fleet {
        &self.opponent_fleet
    }

    pub fn player_shots(&self) -> &ShotLedger {
        &self.player_shots
    }

    pub fn opponent_shots(&self) -> &ShotLedger {
        &self.opponent_shots
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// Whether the player may fire at `index` right now.
    pub fn is_selectable(&self, index: usize) -> bool {
        self.phase == Phase::PlayerTurn
            && self.grid().contains(index)
            && !self.player_shots.contains(index)
    }

    /// The player's own board: ships revealed, computer shots marked.
    pub fn player_board(&self) -> Vec<CellView> {
        self.grid()
            .indices()
            .map(|index| CellView {
                index,
                ship: Some(self.player_fleet.is_occupied(index)),
                mark: self.opponent_shots.get(index),
                selectable: false,
            })
            .collect()
    }

    /// The enemy board as the player sees it: ships hidden, player shots marked.
    pub fn target_board(&self) -> Vec<CellView> {
        self.grid()
            .indices()
            .map(|index| CellView {
                index,
                ship: None,
                mark: self.player_shots.get(index),
                selectable: self.is_selectable(index),
            })
            .collect()
    }

    /// One-line hint for the enemy board header.
    pub fn status_line(&self) -> &'static str {
        match self.phase {
            Phase::PlayerTurn => "Your turn: click to fire.",
            Phase::OpponentTurn => "Computer is firing...",
            Phase::GameOver { .. } => "Game over.",
        }
    }

    /// Re-check every invariant a decoded session must satisfy.
    pub fn validate(&self) -> Result<(), GameError> {
        let grid = self.grid();
        if grid.size() == 0 || self.config.fleet().is_empty() {
            return Err(GameError::Corrupt("empty board or fleet".into()));
        }
        for (fleet, ledger, side) in [
            (&self.player_fleet, &self.opponent_shots, "player"),
            (&self.opponent_fleet, &self.player_shots, "opponent"),
        ] {
            fleet.validate(grid)?;
            let lengths = fleet.ships().iter().map(|s| (s.name(), s.length()));
            let expected = self.config.fleet().iter().map(|t| (t.name(), t.length()));
            if !lengths.eq(expected) {
                return Err(GameError::Corrupt(format!("{} fleet does not match its definition", side)));
            }
            check_ledger(fleet, ledger, grid)
                .map_err(|why| GameError::Corrupt(format!("{} board: {}", side, why)))?;
        }
        if let Some(cell) = self.ai.tracked_cells().find(|i| !grid.contains(*i)) {
            return Err(GameError::Corrupt(format!("ai tracks cell {} off the board", cell)));
        }
        if self.log.len() > LOG_CAPACITY {
            return Err(GameError::Corrupt("event log over capacity".into()));
        }
        let consistent = match self.phase {
            Phase::GameOver { winner: Side::Player } => self.opponent_fleet.all_sunk(),
            Phase::GameOver { winner: Side::Opponent } => self.player_fleet.all_sunk(),
            Phase::PlayerTurn => !self.opponent_fleet.all_sunk() && !self.player_fleet.all_sunk(),
            Phase::OpponentTurn => false,
        };
        if !consistent {
            return Err(GameError::Corrupt(format!("phase {:?} disagrees with fleets", self.phase)));
        }
        Ok(())
    }
}

/// A ledger and the fleet it fired on must tell the same story: every hit
/// mark on a ship cell that remembers it, every recorded ship hit in the ledger.
fn check_ledger(fleet: &Fleet, ledger: &ShotLedger, grid: Grid) -> Result<(), String> {
    for (index, mark) in ledger.iter() {
        if !grid.contains(index) {
            return Err(format!("shot {} off the board", index));
        }
        let owner = fleet.ship_owning(index).map(|si| &fleet.ships()[si]);
        match (mark, owner) {
            (Mark::Miss, None) => {}
            (Mark::Hit, Some(ship)) if ship.hits().contains(&index) => {}
            (Mark::Hit, Some(ship)) => {
                return Err(format!("hit at {} not recorded on {}", index, ship.name()));
            }
            _ => return Err(format!("shot {} marked {:?}", index, mark)),
        }
    }
    for ship in fleet.ships() {
        if let Some(h) = ship.hits().iter().find(|h| ledger.get(**h) != Some(Mark::Hit)) {
            return Err(format!("{} hit at {} missing from ledger", ship.name(), h));
        }
    }
    Ok(())
}
