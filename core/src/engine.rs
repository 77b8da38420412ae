use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Idle,
    Playing,
    Win,
    Lose,
}

impl GameStatus {
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }

    /// The one action a player is offered in this state.
    pub const fn primary_action(self) -> PrimaryAction {
        match self {
            Self::Idle => PrimaryAction::Start,
            Self::Playing => PrimaryAction::CashOut,
            Self::Win => PrimaryAction::PlayAgain,
            Self::Lose => PrimaryAction::PlayAgain,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PrimaryAction {
    Start,
    CashOut,
    PlayAgain,
}

/// Board epoch. Bumped whenever a round starts, the level changes or the session is reset, so a
/// deferred transition scheduled for an older epoch can be told apart.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoundId(u64);

impl RoundId {
    const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl core::fmt::Display for RoundId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A transition the host has to deliver back through [`RoundEngine::fire`] once `delay` elapsed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingTransition {
    pub round: RoundId,
    pub delay: Duration,
}

/// Everything a front-end needs to draw the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub board: Board,
    pub bombs: CellCount,
    /// Cells revealed this round, the losing bomb included.
    pub revealed: CellCount,
    pub game_status: GameStatus,
    pub level: Level,
    pub bet_amount: Money,
    pub multiplier: Multiplier,
    /// Payout of the most recently completed round, zero after a loss.
    pub total_winnings: Money,
    pub balance: Money,
}

impl GameState {
    pub fn new(config: &EngineConfig, board: Board) -> Self {
        let level = config.default_level;
        Self {
            board,
            bombs: level.bombs_count(),
            revealed: 0,
            game_status: GameStatus::Idle,
            level,
            bet_amount: config.default_bet,
            multiplier: Multiplier::ONE,
            total_winnings: Money::ZERO,
            balance: config.starting_balance,
        }
    }

    pub fn safe_cells(&self) -> CellCount {
        self.level.safe_cells()
    }

    pub fn can_start(&self) -> bool {
        self.game_status.is_idle() && self.balance >= self.bet_amount
    }

    /// What cashing out right now would pay.
    pub fn potential_payout(&self) -> Money {
        self.bet_amount.scaled(self.multiplier)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum Settlement {
    ReturnToIdle,
    CashOut(Money),
}

#[derive(Copy, Clone, Debug, PartialEq)]
struct PendingSettlement {
    round: RoundId,
    settlement: Settlement,
}

/// Owns the game state and applies player intents to it.
///
/// Intents either succeed or are rejected with a [`RoundError`], in which case the state is left
/// exactly as it was. Round endings open a reveal-all window: the engine hands out a
/// [`PendingTransition`] and waits for the host to [`fire`](Self::fire) it.
#[derive(Clone, Debug)]
pub struct RoundEngine<G = RandomBoardGenerator> {
    config: EngineConfig,
    generator: G,
    state: GameState,
    reveal_all: bool,
    round: RoundId,
    pending: Option<PendingSettlement>,
}

impl<G: BoardGenerator> RoundEngine<G> {
    pub fn new(config: EngineConfig, mut generator: G) -> Self {
        let board = generator.generate(config.default_level);
        let state = GameState::new(&config, board);
        Self {
            config,
            generator,
            state,
            reveal_all: false,
            round: RoundId::default(),
            pending: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether every cell should be drawn uncovered, regardless of its own reveal state.
    pub fn reveal_all(&self) -> bool {
        self.reveal_all
    }

    pub fn round(&self) -> RoundId {
        self.round
    }

    pub fn pending_transition(&self) -> Option<PendingTransition> {
        self.pending.map(|pending| PendingTransition {
            round: pending.round,
            delay: self.config.reveal_delay(),
        })
    }

    pub fn is_cell_shown(&self, index: CellIndex) -> bool {
        self.reveal_all
            || self
                .state
                .board
                .cell(index)
                .is_some_and(|cell| cell.is_revealed)
    }

    pub fn start(&mut self) -> Result<RoundId> {
        if !self.state.game_status.is_idle() {
            return Err(RoundError::NotIdle);
        }
        if self.state.bet_amount.is_zero() {
            return Err(RoundError::InvalidBet);
        }
        let balance = self
            .state
            .balance
            .checked_sub(self.state.bet_amount)
            .ok_or(RoundError::InsufficientBalance)?;

        self.state.board = self.generator.generate(self.state.level);
        self.round = self.round.next();
        self.state.game_status = GameStatus::Playing;
        self.state.revealed = 0;
        self.state.multiplier = Multiplier::ONE;
        self.state.total_winnings = Money::ZERO;
        self.state.balance = balance;
        self.reveal_all = false;

        log::debug!(
            "round {} started: level {}, bet {}, balance {}",
            self.round,
            self.state.level,
            self.state.bet_amount,
            self.state.balance
        );
        Ok(self.round)
    }

    pub fn reveal_cell(&mut self, index: CellIndex) -> Result<RevealOutcome> {
        use RevealOutcome::*;

        let coords = self.state.board.validate_index(index)?;
        self.check_accepting_moves()?;

        let cell = &mut self.state.board[coords];
        if cell.is_revealed {
            return Ok(NoChange);
        }
        cell.is_revealed = true;
        let is_bomb = cell.is_bomb;
        self.state.revealed += 1;

        if is_bomb {
            self.state.game_status = GameStatus::Lose;
            self.state.total_winnings = Money::ZERO;
            self.begin_reveal_all(Settlement::ReturnToIdle);
            log::info!(
                "round {} lost on cell {} after {} safe cells",
                self.round,
                index,
                self.state.revealed - 1
            );
            return Ok(HitBomb);
        }

        self.state.multiplier = self.state.level.multiplier_after(self.state.revealed);

        if self.state.revealed == self.state.safe_cells() {
            let winnings = self.state.potential_payout();
            self.state.game_status = GameStatus::Win;
            self.state.total_winnings = winnings;
            self.state.balance = self.state.balance.saturating_add(winnings);
            self.begin_reveal_all(Settlement::ReturnToIdle);
            log::info!(
                "round {} won at x{}, paid {}",
                self.round,
                self.state.multiplier,
                winnings
            );
            Ok(Won)
        } else {
            Ok(Safe)
        }
    }

    pub fn cash_out(&mut self) -> Result<PendingTransition> {
        self.check_accepting_moves()?;
        if self.state.revealed == 0 {
            return Err(RoundError::NothingRevealed);
        }

        let winnings = self.state.potential_payout();
        log::info!(
            "round {} cashed out at x{}, paying {}",
            self.round,
            self.state.multiplier,
            winnings
        );
        Ok(self.begin_reveal_all(Settlement::CashOut(winnings)))
    }

    /// Applies the deferred transition of `round`. Anything but the currently pending round is
    /// rejected as stale.
    pub fn fire(&mut self, round: RoundId) -> Result<SettleOutcome> {
        let pending = self
            .pending
            .filter(|pending| pending.round == round)
            .ok_or(RoundError::StaleTransition)?;
        self.pending = None;

        let outcome = match pending.settlement {
            Settlement::ReturnToIdle => SettleOutcome::ReturnedToIdle,
            Settlement::CashOut(winnings) => {
                self.state.total_winnings = winnings;
                self.state.balance = self.state.balance.saturating_add(winnings);
                SettleOutcome::CashedOut(winnings)
            }
        };

        self.state.board = self.generator.generate(self.state.level);
        self.state.game_status = GameStatus::Idle;
        self.state.revealed = 0;
        self.state.multiplier = Multiplier::ONE;
        self.reveal_all = false;

        log::debug!("round {} settled: {:?}", round, outcome);
        Ok(outcome)
    }

    pub fn change_level(&mut self, level: Level) -> Result<()> {
        self.check_idle()?;

        self.state.level = level;
        self.state.bombs = level.bombs_count();
        self.state.board = self.generator.generate(level);
        self.state.revealed = 0;
        self.state.multiplier = Multiplier::ONE;
        self.round = self.round.next();

        log::debug!("level changed to {}", level);
        Ok(())
    }

    pub fn change_bet(&mut self, amount: Money) -> Result<()> {
        self.check_idle()?;
        if amount.is_zero() {
            return Err(RoundError::InvalidBet);
        }

        self.state.bet_amount = amount;
        log::debug!("bet changed to {}", amount);
        Ok(())
    }

    /// Steps the bet up or down by the configured step, never below the configured minimum.
    pub fn adjust_bet(&mut self, increment: bool) -> Result<Money> {
        self.check_idle()?;

        let step = self.config.bet_step;
        let bet = self.state.bet_amount;
        self.state.bet_amount = if increment {
            bet.saturating_add(step)
        } else {
            bet.saturating_sub(step).max(self.config.min_bet)
        };

        log::debug!("bet adjusted to {}", self.state.bet_amount);
        Ok(self.state.bet_amount)
    }

    /// Back to the session's initial snapshot. Any pending transition is dropped.
    pub fn reset(&mut self) {
        let board = self.generator.generate(self.config.default_level);
        self.state = GameState::new(&self.config, board);
        self.reveal_all = false;
        self.pending = None;
        self.round = self.round.next();

        log::debug!("session reset, balance {}", self.state.balance);
    }

    fn begin_reveal_all(&mut self, settlement: Settlement) -> PendingTransition {
        self.reveal_all = true;
        self.pending = Some(PendingSettlement {
            round: self.round,
            settlement,
        });
        PendingTransition {
            round: self.round,
            delay: self.config.reveal_delay(),
        }
    }

    fn check_idle(&self) -> Result<()> {
        if self.state.game_status.is_idle() {
            Ok(())
        } else {
            Err(RoundError::NotIdle)
        }
    }

    fn check_accepting_moves(&self) -> Result<()> {
        if !self.state.game_status.is_playing() {
            Err(RoundError::NotPlaying)
        } else if self.reveal_all {
            Err(RoundError::RevealInProgress)
        } else {
            Ok(())
        }
    }
}
