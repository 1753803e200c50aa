use broadside::{
    random_unshot, AiState, Difficulty, Grid, Mark, ParityAi, QueueAi, RandomAi, ShotLedger,
    ShotResult, Strategy,
};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn ledger_with(cells: &[usize]) -> ShotLedger {
    let mut ledger = ShotLedger::new();
    for &c in cells {
        ledger.record(c, Mark::Hit).unwrap();
    }
    ledger
}

fn hit() -> ShotResult {
    ShotResult::Hit("Cruiser".into())
}

#[test]
fn test_hard_extends_row_to_the_left_first() {
    let grid = Grid::new(10);
    let mut rng = SmallRng::seed_from_u64(1);
    // A = 43 (row 4, col 3) and A + 1
    let mut ai = ParityAi::with_hits([43, 44]);
    let ledger = ledger_with(&[43, 44]);
    assert_eq!(ai.pick_shot(&mut rng, &ledger, grid), Some(42));

    let ledger = ledger_with(&[42, 43, 44]);
    assert_eq!(ai.pick_shot(&mut rng, &ledger, grid), Some(45));
}

#[test]
fn test_hard_extends_column() {
    let grid = Grid::new(10);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ai = ParityAi::with_hits([44, 34]);
    assert_eq!(ai.pick_shot(&mut rng, &ledger_with(&[34, 44]), grid), Some(24));
    assert_eq!(ai.pick_shot(&mut rng, &ledger_with(&[24, 34, 44]), grid), Some(54));
}

#[test]
fn test_hard_line_at_board_edge() {
    let grid = Grid::new(10);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ai = ParityAi::with_hits([40, 41]);
    assert_eq!(ai.pick_shot(&mut rng, &ledger_with(&[40, 41]), grid), Some(42));
}

#[test]
fn test_hard_falls_back_to_neighbours_when_ends_are_shot() {
    let grid = Grid::new(10);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ai = ParityAi::with_hits([43, 44]);
    let ledger = ledger_with(&[42, 43, 44, 45]);
    // neighbours of 43: up 33, down 53, left 42, right 44
    assert_eq!(ai.pick_shot(&mut rng, &ledger, grid), Some(33));
}

#[test]
fn test_hard_single_hit_tries_neighbours() {
    let grid = Grid::new(10);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ai = ParityAi::with_hits([55]);
    assert_eq!(ai.pick_shot(&mut rng, &ledger_with(&[55]), grid), Some(45));
    assert_eq!(ai.pick_shot(&mut rng, &ledger_with(&[45, 55]), grid), Some(65));
}

#[test]
fn test_hard_non_colinear_hits_try_neighbours() {
    let grid = Grid::new(10);
    let mut rng = SmallRng::seed_from_u64(1);
    let mut ai = ParityAi::with_hits([0, 11]);
    assert_eq!(ai.pick_shot(&mut rng, &ledger_with(&[0, 11]), grid), Some(10));
    assert_eq!(ai.pick_shot(&mut rng, &ledger_with(&[0, 1, 10, 11]), grid), Some(21));
}

#[test]
fn test_hard_observe_tracks_and_resets() {
    let grid = Grid::new(10);
    let mut ai = ParityAi::new();
    ai.observe(10, &ShotResult::Miss, grid);
    assert!(ai.target_hits().is_empty());
    ai.observe(43, &hit(), grid);
    ai.observe(44, &hit(), grid);
    ai.observe(44, &hit(), grid);
    assert_eq!(ai.target_hits(), &[43, 44]);
    ai.observe(45, &ShotResult::Sunk("Cruiser".into()), grid);
    assert!(ai.target_hits().is_empty());
}

#[test]
fn test_medium_queue_growth_and_order() {
    let grid = Grid::new(10);
    let mut rng = SmallRng::seed_from_u64(3);
    let mut ai = QueueAi::new();
    ai.observe(55, &hit(), grid);
    assert_eq!(ai.target_queue().iter().copied().collect::<Vec<_>>(), vec![45, 65, 54, 56]);
    ai.observe(56, &hit(), grid);
    assert_eq!(
        ai.target_queue().iter().copied().collect::<Vec<_>>(),
        vec![45, 65, 54, 56, 46, 66, 55, 57]
    );

    let mut ledger = ledger_with(&[55, 56]);
    let first = ai.pick_shot(&mut rng, &ledger, grid);
    assert_eq!(first, Some(45));
    ledger.record(45, Mark::Miss).unwrap();
    assert_eq!(ai.pick_shot(&mut rng, &ledger, grid), Some(65));
    ledger.record(65, Mark::Miss).unwrap();
    assert_eq!(ai.pick_shot(&mut rng, &ledger, grid), Some(54));
    ledger.record(54, Mark::Miss).unwrap();
    // 56 and 55 are already shot and get skipped
    assert_eq!(ai.pick_shot(&mut rng, &ledger, grid), Some(46));
}

#[test]
fn test_medium_sink_clears_queue() {
    let grid = Grid::new(10);
    let mut ai = QueueAi::new();
    ai.observe(55, &hit(), grid);
    ai.observe(56, &ShotResult::Sunk("Destroyer".into()), grid);
    assert!(ai.target_queue().is_empty());
}

#[test]
fn test_medium_exhausted_queue_falls_back_to_random() {
    let grid = Grid::new(10);
    let mut rng = SmallRng::seed_from_u64(9);
    let mut ai = QueueAi::new();
    ai.observe(0, &hit(), grid);
    let ledger = ledger_with(&[0, 1, 10]);
    let shot = ai.pick_shot(&mut rng, &ledger, grid).unwrap();
    assert!(!ledger.contains(shot));
    assert!(ai.target_queue().is_empty());
}

#[test]
fn test_easy_picks_last_free_cell_then_none() {
    let grid = Grid::new(2);
    let mut rng = SmallRng::seed_from_u64(5);
    let mut ai = RandomAi;
    let mut ledger = ledger_with(&[0, 1, 3]);
    assert_eq!(ai.pick_shot(&mut rng, &ledger, grid), Some(2));
    ledger.record(2, Mark::Miss).unwrap();
    assert_eq!(ai.pick_shot(&mut rng, &ledger, grid), None);
    assert_eq!(random_unshot(&mut rng, &ledger, grid), None);
}

#[test]
fn test_ai_state_follows_difficulty() {
    for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
        let state = AiState::fresh(d);
        assert_eq!(state.difficulty(), d);
        assert_eq!(state.tracked_cells().count(), 0);
        assert_eq!(d.as_str().parse::<Difficulty>(), Ok(d));
    }
    assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
    assert!("brutal".parse::<Difficulty>().is_err());
    assert_eq!(AiState::default().difficulty(), Difficulty::Easy);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn hunt_mode_fires_on_even_cells_first(seed in any::<u64>()) {
        let grid = Grid::new(10);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ai = AiState::fresh(Difficulty::Hard);
        let mut ledger = ShotLedger::new();
        let evens = grid.indices().filter(|&i| grid.is_even_parity(i)).count();
        for n in 0..grid.cells() {
            let shot = ai.pick_shot(&mut rng, &ledger, grid).unwrap();
            prop_assert!(!ledger.contains(shot));
            prop_assert_eq!(grid.is_even_parity(shot), n < evens);
            ledger.record(shot, Mark::Miss).unwrap();
        }
        prop_assert_eq!(ai.pick_shot(&mut rng, &ledger, grid), None);
    }

    #[test]
    fn every_strategy_picks_fresh_cells(seed in any::<u64>(), level in 0..3usize) {
        let difficulty = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard][level];
        let grid = Grid::new(6);
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut ai = AiState::fresh(difficulty);
        let mut ledger = ShotLedger::new();
        while let Some(shot) = ai.pick_shot(&mut rng, &ledger, grid) {
            prop_assert!(grid.contains(shot));
            ledger.record(shot, Mark::Hit).unwrap();
            ai.observe(shot, &hit(), grid);
        }
        prop_assert_eq!(ledger.len(), grid.cells());
    }
}
