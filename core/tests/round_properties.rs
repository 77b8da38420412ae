use mines_core::*;
use proptest::prelude::*;

fn engine(seed: u64, level: Level) -> RoundEngine {
    let config = EngineConfig {
        default_level: level,
        ..EngineConfig::default()
    };
    RoundEngine::new(config, RandomBoardGenerator::new(seed))
}

fn level_strategy() -> impl Strategy<Value = Level> {
    prop_oneof![Just(Level::Easy), Just(Level::Medium), Just(Level::Hard)]
}

#[derive(Clone, Debug)]
enum Op {
    Start,
    Reveal(CellIndex),
    CashOut,
    Fire,
    FireStale(usize),
    ChangeLevel(Level),
    ChangeBet(u64),
    AdjustBet(bool),
    Reset,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Start),
        6 => (0usize..30).prop_map(Op::Reveal),
        1 => Just(Op::CashOut),
        2 => Just(Op::Fire),
        1 => any::<usize>().prop_map(Op::FireStale),
        1 => level_strategy().prop_map(Op::ChangeLevel),
        1 => (0u64..1500).prop_map(Op::ChangeBet),
        1 => any::<bool>().prop_map(Op::AdjustBet),
        1 => Just(Op::Reset),
    ]
}

proptest! {
    #[test]
    fn fresh_boards_have_exact_bomb_count(seed in any::<u64>(), level in level_strategy()) {
        let mut generator = RandomBoardGenerator::new(seed);
        let board = generator.generate(level);

        prop_assert_eq!(board.bomb_count(), level.bombs_count());
        prop_assert_eq!(board.bomb_indices().count(), usize::from(level.bombs_count()));
        prop_assert_eq!(board.safe_indices().count(), usize::from(level.safe_cells()));
    }

    #[test]
    fn reveal_order_decides_the_round(
        seed in any::<u64>(),
        level in level_strategy(),
        order in Just((0..25).collect::<Vec<CellIndex>>()).prop_shuffle(),
    ) {
        let mut engine = engine(seed, level);
        engine.start().unwrap();
        let bet = engine.state().bet_amount;
        let balance_after_start = engine.state().balance;
        let mut safe_revealed = 0;
        let mut previous = engine.state().multiplier;

        for index in order {
            let is_bomb = engine.state().board.cell(index).unwrap().is_bomb;
            let outcome = engine.reveal_cell(index).unwrap();
            let state = engine.state();

            if is_bomb {
                prop_assert_eq!(outcome, RevealOutcome::HitBomb);
                prop_assert_eq!(state.game_status, GameStatus::Lose);
                prop_assert_eq!(state.total_winnings, Money::ZERO);
                prop_assert_eq!(state.balance, balance_after_start);
                break;
            }

            safe_revealed += 1;
            prop_assert!(state.multiplier > previous);
            prop_assert_eq!(state.multiplier, level.multiplier_after(safe_revealed));
            previous = state.multiplier;

            if safe_revealed == level.safe_cells() {
                prop_assert_eq!(outcome, RevealOutcome::Won);
                prop_assert_eq!(state.game_status, GameStatus::Win);
                let payout = bet.scaled(state.multiplier);
                prop_assert_eq!(state.total_winnings, payout);
                prop_assert_eq!(state.balance, balance_after_start.saturating_add(payout));
                break;
            }
            prop_assert_eq!(outcome, RevealOutcome::Safe);
            prop_assert_eq!(state.game_status, GameStatus::Playing);
        }

        prop_assert!(engine.reveal_all());
        prop_assert!(engine.pending_transition().is_some());
    }

    #[test]
    fn cash_out_pays_bet_times_multiplier(
        seed in any::<u64>(),
        level in level_strategy(),
        reveals in 1usize..17,
    ) {
        let mut engine = engine(seed, level);
        let balance_before = engine.state().balance;
        engine.start().unwrap();
        let bet = engine.state().bet_amount;
        prop_assert_eq!(engine.state().balance, balance_before.saturating_sub(bet));

        let safe: Vec<_> = engine.state().board.safe_indices().take(reveals).collect();
        for index in safe {
            engine.reveal_cell(index).unwrap();
        }
        let multiplier = engine.state().multiplier;
        let transition = engine.cash_out().unwrap();
        engine.fire(transition.round).unwrap();

        let payout = bet.scaled(multiplier);
        let state = engine.state();
        prop_assert_eq!(state.game_status, GameStatus::Idle);
        prop_assert_eq!(state.total_winnings, payout);
        prop_assert_eq!(state.balance, balance_before.saturating_sub(bet).saturating_add(payout));
        prop_assert_eq!(state.multiplier, Multiplier::ONE);
        prop_assert_eq!(state.board.revealed_count(), 0);
    }

    #[test]
    fn rejected_intents_leave_state_untouched(
        seed in any::<u64>(),
        ops in proptest::collection::vec(op_strategy(), 0..80),
    ) {
        let mut engine = engine(seed, Level::Easy);
        let mut seen_rounds = Vec::new();

        for op in ops {
            let before = engine.state().clone();
            let reveal_all_before = engine.reveal_all();
            if let Some(pending) = engine.pending_transition() {
                seen_rounds.push(pending.round);
            }

            let rejected = match op {
                Op::Start => engine.start().is_err(),
                Op::Reveal(index) => matches!(
                    engine.reveal_cell(index),
                    Err(_) | Ok(RevealOutcome::NoChange)
                ),
                Op::CashOut => engine.cash_out().is_err(),
                Op::Fire => match engine.pending_transition() {
                    Some(pending) => engine.fire(pending.round).is_err(),
                    None => true,
                },
                Op::FireStale(pick) if !seen_rounds.is_empty() => {
                    let round = seen_rounds[pick % seen_rounds.len()];
                    engine.fire(round).is_err()
                }
                Op::FireStale(_) => true,
                Op::ChangeLevel(level) => engine.change_level(level).is_err(),
                Op::ChangeBet(units) => engine.change_bet(Money::from_units(units)).is_err(),
                Op::AdjustBet(increment) => engine.adjust_bet(increment).is_err(),
                Op::Reset => {
                    engine.reset();
                    false
                }
            };

            if rejected {
                prop_assert_eq!(engine.state(), &before);
                prop_assert_eq!(engine.reveal_all(), reveal_all_before);
            }

            let state = engine.state();
            prop_assert_eq!(state.bombs, state.level.bombs_count());
            prop_assert_eq!(state.board.bomb_count(), state.level.bombs_count());
            prop_assert!(!state.bet_amount.is_zero());
            prop_assert_eq!(engine.reveal_all(), engine.pending_transition().is_some());
            if state.game_status.is_idle() {
                prop_assert_eq!(state.revealed, 0);
                prop_assert_eq!(state.multiplier, Multiplier::ONE);
            }
            if state.game_status.is_finished() {
                prop_assert!(engine.reveal_all());
            }
        }
    }
}
