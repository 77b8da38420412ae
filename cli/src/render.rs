use mines_core::{
    BET_PRESETS, CellView, EngineConfig, GRID_SIZE, GameEvent, GameState, GameStatus, Money,
    PrimaryAction, RevealOutcome, SettleOutcome, Snapshot,
};
use std::fmt::Write;

use crate::command::Command;

const HIDDEN: char = '.';
const GEM: char = '*';
const BOMB: char = 'X';

fn glyph(cell: CellView, reveal_all: bool) -> char {
    match (cell.is_shown(reveal_all), cell.is_bomb) {
        (false, _) => HIDDEN,
        (true, false) => GEM,
        (true, true) => BOMB,
    }
}

/// Draws the 5x5 grid with column and row numbers, one row per line.
pub fn board(snapshot: Snapshot<'_>) -> String {
    let mut out = String::from("   ");
    for x in 0..GRID_SIZE {
        let _ = write!(out, " {x}");
    }
    for cell in snapshot.state.board.iter() {
        if cell.x == 0 {
            let _ = write!(out, "\n {} ", cell.y);
        }
        out.push(' ');
        out.push(glyph(cell, snapshot.reveal_all));
    }
    out
}

pub fn status_line(state: &GameState) -> String {
    format!(
        "balance {} | bet {} | {} ({} bombs) | x{} | {}",
        state.balance,
        state.bet_amount,
        state.level,
        state.bombs,
        state.multiplier,
        action_hint(state),
    )
}

fn action_hint(state: &GameState) -> String {
    match state.game_status.primary_action() {
        PrimaryAction::Start if state.can_start() => "type \"start\"".to_string(),
        PrimaryAction::Start => "balance too low for this bet".to_string(),
        PrimaryAction::CashOut if state.revealed == 0 => "reveal a cell".to_string(),
        PrimaryAction::CashOut => format!("\"cashout\" for {}", state.potential_payout()),
        PrimaryAction::PlayAgain => "round over".to_string(),
    }
}

pub fn describe(event: &GameEvent, state: &GameState) -> String {
    match *event {
        GameEvent::Started(round) => format!("Round {round} started, {} placed", state.bet_amount),
        GameEvent::Revealed { outcome, .. } => {
            let mut line = match outcome {
                RevealOutcome::NoChange => "Nothing changed".to_string(),
                RevealOutcome::Safe => format!("Gem! {} safe cells to go", safe_left(state)),
                RevealOutcome::HitBomb => "Boom! The bet is lost".to_string(),
                RevealOutcome::Won => format!("Board cleared! You won {}", state.total_winnings),
            };
            if outcome.ends_round() {
                line.push_str(", showing the whole board");
            }
            line
        }
        GameEvent::CashOutRequested(payout) => format!("Cashing out {payout}"),
        GameEvent::Settled(SettleOutcome::CashedOut(payout)) => {
            format!("{payout} added to your balance")
        }
        GameEvent::Settled(SettleOutcome::ReturnedToIdle) => "Ready for the next round".to_string(),
        GameEvent::LevelChanged(level) => format!("Level set to {level}"),
        GameEvent::BetChanged(bet) => format!("Bet set to {bet}"),
        GameEvent::Reset => "Session reset".to_string(),
    }
}

fn safe_left(state: &GameState) -> u8 {
    let safe_revealed = state.board.revealed_count();
    state.safe_cells().saturating_sub(safe_revealed)
}

/// Quick bet amounts and the step used by `bet +` / `bet -`.
pub fn bet_hint(config: &EngineConfig) -> String {
    let presets: Vec<String> = BET_PRESETS.iter().map(Money::to_string).collect();
    format!(
        "bets: {} (steps of {}, minimum {})",
        presets.join(", "),
        config.bet_step,
        config.min_bet
    )
}

/// Full redraw printed after every change.
pub fn frame(event: &GameEvent, snapshot: Snapshot<'_>) -> String {
    format!(
        "{}\n{}\n{}",
        describe(event, snapshot.state),
        board(snapshot),
        status_line(snapshot.state)
    )
}

/// Explains why a command had no effect.
pub fn rejected(command: Command, snapshot: Snapshot<'_>) -> String {
    let state = snapshot.state;
    let reason = match (command, state.game_status) {
        (_, GameStatus::Win | GameStatus::Lose) => "the round is wrapping up",
        (_, GameStatus::Playing) if snapshot.reveal_all => "the round is wrapping up",
        (Command::Start, GameStatus::Idle) if state.balance < state.bet_amount => {
            "balance is too low for this bet"
        }
        (Command::Reveal(_) | Command::CashOut, GameStatus::Idle) => "no round is running",
        (Command::Reveal(_), GameStatus::Playing) => "that cell is already open",
        (Command::CashOut, GameStatus::Playing) => "reveal at least one cell first",
        (Command::Bet(_) | Command::AdjustBet(_), GameStatus::Idle) => "bet is out of range",
        (_, GameStatus::Playing) => "a round is in progress",
        (_, GameStatus::Idle) => "not available right now",
    };
    format!("\"{}\" ignored: {}", command.name(), reason)
}
