use road_crossing::compute::new_player;
use road_crossing::config::GameConfig;
use road_crossing::entities::*;
use road_crossing::grid;
use road_crossing::placement::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn empty_state() -> GameState {
    GameState {
        player: new_player(),
        enemies: Vec::new(),
        collectibles: Vec::new(),
        session: Session {
            level: 1,
            points: 0,
            collision_detected: false,
            popup: None,
        },
        pending: Vec::new(),
        clock: 0.0,
        config: GameConfig::default(),
    }
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

fn gem(x: f32, y: f32) -> Collectible {
    Collectible {
        x,
        y,
        points: 100,
        sprite: COLLECTIBLE_SPRITE,
    }
}

// ── position_occupied ─────────────────────────────────────────────────────────

#[test]
fn occupied_by_enemy() {
    let mut s = empty_state();
    s.enemies.push(Enemy::new(101.0, 146.0, EnemyKind::Static));
    assert!(position_occupied(&s, 101.0, 146.0));
}

#[test]
fn occupied_by_collectible() {
    let mut s = empty_state();
    s.collectibles.push(gem(0.0, 63.0));
    assert!(position_occupied(&s, 0.0, 63.0));
}

#[test]
fn occupancy_is_exact_not_proximity() {
    let mut s = empty_state();
    s.enemies
        .push(Enemy::new(101.5, 146.0, EnemyKind::Roaming { speed: 200.0 }));
    assert!(!position_occupied(&s, 101.0, 146.0));
    assert!(!position_occupied(&s, 101.5, 63.0));
}

#[test]
fn player_does_not_occupy() {
    let mut s = empty_state();
    s.player.x = 0.0;
    s.player.y = 63.0;
    assert!(!position_occupied(&s, 0.0, 63.0));
}

// ── find_position ─────────────────────────────────────────────────────────────

#[test]
fn initial_position_is_a_lane_cell() {
    let s = empty_state();
    let mut rng = seeded_rng();
    for _ in 0..100 {
        let (x, y) = find_position(&s, Spawn::Initial, &mut rng);
        assert!(grid::lane_cells().any(|cell| cell == (x, y)));
    }
}

#[test]
fn reentry_position_is_off_the_left_edge() {
    let s = empty_state();
    let mut rng = seeded_rng();
    for _ in 0..100 {
        let (x, y) = find_position(&s, Spawn::Reentry, &mut rng);
        assert_eq!(x, -101.0);
        assert!(grid::is_lane_y(y));
    }
}

#[test]
fn filling_the_road_gives_distinct_cells() {
    let mut s = empty_state();
    let mut rng = seeded_rng();
    for _ in 0..grid::lane_capacity() {
        let (x, y) = find_position(&s, Spawn::Initial, &mut rng);
        assert!(!position_occupied(&s, x, y), "({x}, {y}) reused");
        s.collectibles.push(gem(x, y));
    }
    assert_eq!(s.collectibles.len(), 12);
    assert!(first_free_cell(&s, Spawn::Initial).is_none());
}

#[test]
fn last_free_cell_is_found() {
    let mut s = empty_state();
    for (x, y) in grid::lane_cells() {
        if (x, y) != (303.0, 229.0) {
            s.collectibles.push(gem(x, y));
        }
    }
    assert_eq!(first_free_cell(&s, Spawn::Initial), Some((303.0, 229.0)));

    let mut rng = seeded_rng();
    assert_eq!(find_position(&s, Spawn::Initial, &mut rng), (303.0, 229.0));
}

#[test]
fn full_road_still_terminates() {
    let mut s = empty_state();
    for (x, y) in grid::lane_cells() {
        s.collectibles.push(gem(x, y));
    }
    let (x, y) = find_position(&s, Spawn::Initial, &mut seeded_rng());
    assert!(grid::lane_cells().any(|cell| cell == (x, y)));
}

#[test]
fn first_free_cell_scans_row_major() {
    let mut s = empty_state();
    s.collectibles.push(gem(0.0, 63.0));
    assert_eq!(first_free_cell(&s, Spawn::Initial), Some((101.0, 63.0)));
}

#[test]
fn reentry_avoids_waiting_enemies() {
    let mut s = empty_state();
    s.enemies
        .push(Enemy::new(-101.0, 63.0, EnemyKind::Roaming { speed: 200.0 }));
    s.enemies
        .push(Enemy::new(-101.0, 146.0, EnemyKind::Roaming { speed: 200.0 }));
    let mut rng = seeded_rng();
    for _ in 0..20 {
        assert_eq!(find_position(&s, Spawn::Reentry, &mut rng), (-101.0, 229.0));
    }
}

// ── random_speed ──────────────────────────────────────────────────────────────

#[test]
fn speed_stays_in_configured_range() {
    let s = empty_state();
    let mut rng = seeded_rng();
    for _ in 0..1000 {
        let speed = random_speed(&s, &mut rng);
        assert!((150.0..450.0).contains(&speed));
        assert_eq!(speed, speed.trunc());
    }
}
