use broadside::{
    Fleet, GameConfig, GameError, Grid, Orientation, Ship, ShipType, ShotResult, NUM_SHIPS,
    SHIPS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Standard fleet laid out on even rows, all starting in column 0.
fn row_fleet(grid: Grid) -> Fleet {
    let ships = SHIPS
        .iter()
        .enumerate()
        .map(|(i, def)| Ship::new(def, Orientation::Horizontal, i * 2, 0, grid).unwrap())
        .collect();
    Fleet::from_ships(ships, grid).unwrap()
}

#[test]
fn test_manual_place_rejects_overlap() {
    let grid = Grid::new(10);
    let mut fleet = Fleet::new();
    let a = Ship::new(&SHIPS[0], Orientation::Horizontal, 0, 0, grid).unwrap();
    let b = Ship::new(&SHIPS[1], Orientation::Vertical, 0, 2, grid).unwrap();
    fleet.place(a, grid).unwrap();
    assert!(matches!(fleet.place(b, grid), Err(GameError::ShipOverlaps)));
    assert_eq!(fleet.len(), 1);
}

#[test]
fn test_two_shots_sink_destroyer() {
    let grid = Grid::new(10);
    let mut fleet = row_fleet(grid);
    assert_eq!(fleet.ship_owning(80), Some(4));

    assert_eq!(fleet.resolve_shot(80), ShotResult::Hit("Destroyer".into()));
    let second = fleet.resolve_shot(81);
    assert!(second.is_hit());
    assert!(second.is_sunk());
    assert_eq!(second.ship_name(), Some("Destroyer"));
    assert!(!fleet.all_sunk());
    assert_eq!(fleet.remaining(), NUM_SHIPS - 1);
}

#[test]
fn test_miss_names_no_ship() {
    let grid = Grid::new(10);
    let mut fleet = row_fleet(grid);
    assert_eq!(fleet.ship_owning(99), None);
    let res = fleet.resolve_shot(99);
    assert_eq!(res, ShotResult::Miss);
    assert!(!res.is_hit());
    assert_eq!(res.ship_name(), None);
}

#[test]
fn test_repeat_shot_reports_same_result() {
    let grid = Grid::new(10);
    let mut fleet = row_fleet(grid);
    let first = fleet.resolve_shot(20);
    let before = fleet.clone();
    let again = fleet.resolve_shot(20);
    assert_eq!(first, again);
    assert_eq!(fleet, before);
    assert_eq!(fleet.ships()[1].hits().len(), 1);

    fleet.resolve_shot(80);
    let sunk = fleet.resolve_shot(81);
    assert_eq!(fleet.resolve_shot(81), sunk);
    assert_eq!(fleet.ships()[4].hits().len(), 2);
}

#[test]
fn test_all_sunk_after_every_cell() {
    let grid = Grid::new(10);
    let mut fleet = row_fleet(grid);
    let cells: Vec<usize> = fleet.ships().iter().flat_map(|s| s.cells().to_vec()).collect();
    assert_eq!(cells.len(), GameConfig::default().total_ship_cells());
    for (n, &cell) in cells.iter().enumerate() {
        assert!(!fleet.all_sunk(), "sunk after only {} hits", n);
        assert!(fleet.resolve_shot(cell).is_hit());
    }
    assert!(fleet.all_sunk());
    assert_eq!(fleet.remaining(), 0);
}

#[test]
fn test_place_random_all_ships_no_overlap() {
    let grid = Grid::new(10);
    let mut rng = SmallRng::seed_from_u64(42);
    let fleet = Fleet::random(&mut rng, grid, &SHIPS).unwrap();
    assert_eq!(fleet.len(), NUM_SHIPS);
    fleet.validate(grid).unwrap();
    let occupied = grid.indices().filter(|&i| fleet.is_occupied(i)).count();
    assert_eq!(occupied, GameConfig::default().total_ship_cells(), "all ships should be placed without overlap");
}

#[test]
fn test_place_random_tight_board() {
    // two length-2 ships on a 2x2 board leave exactly one layout per axis
    let grid = Grid::new(2);
    let ship_types = [ShipType::new("A", 2), ShipType::new("B", 2)];
    let mut rng = SmallRng::seed_from_u64(7);
    let fleet = Fleet::random(&mut rng, grid, &ship_types).unwrap();
    assert_eq!(grid.indices().filter(|&i| fleet.is_occupied(i)).count(), 4);
}

#[test]
fn test_place_random_gives_up_when_impossible() {
    let grid = Grid::new(2);
    let ship_types = [
        ShipType::new("A", 2),
        ShipType::new("B", 2),
        ShipType::new("C", 2),
    ];
    let mut rng = SmallRng::seed_from_u64(1);
    assert!(matches!(
        Fleet::random(&mut rng, grid, &ship_types),
        Err(GameError::UnableToPlaceFleet { .. })
    ));
    assert!(matches!(
        Fleet::random(&mut rng, grid, &[]),
        Err(GameError::EmptyFleet)
    ));
}

#[test]
fn test_reproducible_placement() {
    let grid = Grid::new(10);
    let mut rng1 = SmallRng::seed_from_u64(42);
    let mut rng2 = SmallRng::seed_from_u64(42);
    let f1 = Fleet::random(&mut rng1, grid, &SHIPS).unwrap();
    let f2 = Fleet::random(&mut rng2, grid, &SHIPS).unwrap();
    assert_eq!(f1, f2);
}

#[test]
fn test_standard_fleet_segment_count() {
    let config = GameConfig::default();
    assert_eq!(config.total_ship_cells(), 17);
    assert_eq!(
        config.total_ship_cells(),
        SHIPS.iter().map(ShipType::length).sum::<usize>()
    );
}
