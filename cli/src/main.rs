use anyhow::Result;
use clap::Parser;
use mines_core::{Clock, RandomBoardGenerator, RoundEngine, SessionController};
use std::io::{self, BufRead, Write};
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;
use tracing_subscriber::filter::LevelFilter;
use web_time::Instant;

mod command;
mod render;
mod settings;

use command::{Command, CommandError};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// TOML file with session settings
    #[arg(short, long)]
    config: Option<PathBuf>,
}

struct MonotonicClock(Instant);

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.0.elapsed()
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(log_level) = args.verbose.log_level() {
        init_logging(log_level);
    }

    let config = settings::load(args.config.as_deref())?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let engine = RoundEngine::new(config, RandomBoardGenerator::new(seed));
    let mut session = SessionController::new(engine, MonotonicClock(Instant::now()));
    session.subscribe(|event, snapshot| println!("\n{}", render::frame(event, snapshot)));

    let snapshot = session.snapshot();
    println!("{}\n{}", render::board(snapshot), render::status_line(snapshot.state));
    println!("type \"help\" for the list of commands");

    let mut stdout = io::stdout();
    print!("> ");
    stdout.flush()?;
    for line in io::stdin().lock().lines() {
        let line = line?;
        match line.parse::<Command>() {
            Ok(command) => {
                if dispatch(&mut session, command, &mut stdout)?.is_break() {
                    break;
                }
            }
            Err(CommandError::MissingArgument("command")) => {}
            Err(err) => println!("{err}"),
        }
        settle(&mut session, thread::sleep);
        print!("> ");
        stdout.flush()?;
    }
    Ok(())
}

fn init_logging(level: log::Level) {
    let filter = match level {
        log::Level::Error => LevelFilter::ERROR,
        log::Level::Warn => LevelFilter::WARN,
        log::Level::Info => LevelFilter::INFO,
        log::Level::Debug => LevelFilter::DEBUG,
        log::Level::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(io::stderr)
        .init();
}

fn dispatch<C: Clock>(
    session: &mut SessionController<C>,
    command: Command,
    out: &mut impl Write,
) -> Result<ControlFlow<()>> {
    let changed = match command {
        Command::Start => session.start(),
        Command::Reveal(index) => session.reveal_cell(index),
        Command::CashOut => session.cash_out(),
        Command::Level(level) => session.change_level(level),
        Command::Bet(amount) => session.change_bet(amount),
        Command::AdjustBet(increment) => session.adjust_bet(increment),
        Command::Reset => {
            session.reset();
            true
        }
        Command::State => {
            let json = serde_json::to_string_pretty(session.snapshot().state)?;
            writeln!(out, "{json}")?;
            true
        }
        Command::Help => {
            writeln!(out, "{}", command::HELP)?;
            writeln!(out, "{}", render::bet_hint(session.engine().config()))?;
            true
        }
        Command::Quit => return Ok(ControlFlow::Break(())),
    };
    if !changed {
        writeln!(out, "{}", render::rejected(command, session.snapshot()))?;
    }
    Ok(ControlFlow::Continue(()))
}

/// Waits through any reveal-all window so the next prompt sees a settled board.
fn settle<C: Clock>(session: &mut SessionController<C>, mut wait: impl FnMut(Duration)) {
    while let Some(delay) = session.time_until_next() {
        wait(delay);
        session.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mines_core::{EngineConfig, GameStatus, ManualClock, Money};

    fn session() -> (SessionController<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let engine = RoundEngine::new(EngineConfig::default(), RandomBoardGenerator::new(11));
        (SessionController::new(engine, clock.clone()), clock)
    }

    fn run(session: &mut SessionController<ManualClock>, line: &str) -> String {
        let mut out = Vec::new();
        let command = line.parse().unwrap();
        let flow = dispatch(session, command, &mut out).unwrap();
        assert!(flow.is_continue());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn rejected_command_explains_and_changes_nothing() {
        let (mut session, _clock) = session();
        let before = session.snapshot().state.clone();

        let printed = run(&mut session, "cashout");
        assert_eq!(printed, "\"cashout\" ignored: no round is running\n");
        assert_eq!(session.snapshot().state, &before);

        let printed = run(&mut session, "bet 0");
        assert_eq!(printed, "\"bet\" ignored: bet is out of range\n");
        assert_eq!(session.snapshot().state, &before);
    }

    #[test]
    fn accepted_commands_print_nothing_extra() {
        let (mut session, _clock) = session();

        assert_eq!(run(&mut session, "bet 50"), "");
        assert_eq!(run(&mut session, "start"), "");
        let state = session.snapshot().state;
        assert_eq!(state.game_status, GameStatus::Playing);
        assert_eq!(state.balance, Money::from_units(950));
    }

    #[test]
    fn help_lists_bet_presets() {
        let (mut session, _clock) = session();
        let printed = run(&mut session, "help");
        assert!(printed.starts_with(command::HELP));
        assert!(printed.contains("bets: 20.00, 50.00"));
    }

    #[test]
    fn state_prints_json_snapshot() {
        let (mut session, _clock) = session();
        let printed = run(&mut session, "state");
        let json: serde_json::Value = serde_json::from_str(&printed).unwrap();
        assert_eq!(json["game_status"], "idle");
        assert_eq!(json["balance"], 1000.0);
    }

    #[test]
    fn quit_breaks_the_loop() {
        let (mut session, _clock) = session();
        let flow = dispatch(&mut session, Command::Quit, &mut io::sink()).unwrap();
        assert!(flow.is_break());
    }

    #[test]
    fn settle_waits_out_the_reveal_window() {
        let (mut session, clock) = session();
        run(&mut session, "start");
        let bomb = session.snapshot().state.board.bomb_indices().next().unwrap();
        run(&mut session, &format!("reveal {bomb}"));
        assert_eq!(session.snapshot().state.game_status, GameStatus::Lose);

        let mut waited = Vec::new();
        settle(&mut session, |delay| {
            waited.push(delay);
            clock.advance(delay);
        });

        assert_eq!(waited, [Duration::from_secs(2)]);
        assert_eq!(session.snapshot().state.game_status, GameStatus::Idle);
        assert!(!session.snapshot().reveal_all);
        assert_eq!(session.next_deadline(), None);
    }
}
