use road_crossing::grid::*;

#[test]
fn lane_rows_sit_above_their_tiles() {
    assert_eq!(row_y(1), 63.0);
    assert_eq!(row_y(2), 146.0);
    assert_eq!(row_y(3), 229.0);
}

#[test]
fn columns_are_cell_width_apart() {
    assert_eq!(column_x(0), 0.0);
    assert_eq!(column_x(2), 202.0);
    assert_eq!(column_x(3), 303.0);
}

#[test]
fn index_conversion_round_trips() {
    for row in 0..ROWS {
        assert_eq!(row_of(row_y(row)), row as f32);
    }
    for col in 0..COLUMNS {
        assert_eq!(column_of(column_x(col)), col as f32);
    }
}

#[test]
fn player_bounds() {
    assert_eq!(max_x(), 303.0);
    assert_eq!(max_y(), 395.0);
    assert_eq!(min_y(), -20.0);
    assert_eq!(start_position(), (202.0, 395.0));
}

#[test]
fn clamping() {
    assert_eq!(clamp_x(-101.0), 0.0);
    assert_eq!(clamp_x(404.0), 303.0);
    assert_eq!(clamp_x(101.0), 101.0);
    assert_eq!(clamp_y(-103.0), -20.0);
    assert_eq!(clamp_y(478.0), 395.0);
    assert_eq!(clamp_y(146.0), 146.0);
}

#[test]
fn visible_width_spans_all_columns() {
    assert_eq!(visible_width(), 404.0);
}

#[test]
fn lane_cells_cover_the_road_once() {
    let cells: Vec<_> = lane_cells().collect();
    assert_eq!(cells.len(), lane_capacity());
    assert_eq!(cells.len(), 12);
    assert_eq!(cells[0], (0.0, 63.0));
    assert_eq!(cells[11], (303.0, 229.0));
    for (i, a) in cells.iter().enumerate() {
        assert!(cells[i + 1..].iter().all(|b| b != a));
    }
}

#[test]
fn only_lane_rows_are_lanes() {
    assert!(is_lane_y(63.0));
    assert!(is_lane_y(229.0));
    assert!(!is_lane_y(-20.0));
    assert!(!is_lane_y(312.0));
    assert!(!is_lane_y(64.0));
}
