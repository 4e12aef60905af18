//! Compound ("super") match resolution.
use crate::grid::{Direction, Grid};
use crate::matcher::{connected_in_direction, MatchDirection, MatchResult};
use tracing::debug;

/// Extra perpendicular pieces a single member needs to turn a run into a super match.
pub const MIN_EXTENSION: usize = 2;

/// Probes the axis perpendicular to `result` from each member, in list order.
///
/// The first member whose probe collects at least [`MIN_EXTENSION`] extra
/// pieces wins: the returned result is `Super`, listing those extras first
/// and then every original member. Later members are not considered even if
/// their extension would be larger. Results that are not plain horizontal or
/// vertical runs, or that find no extension, are returned unchanged.
pub fn resolve_super_match(grid: &Grid, result: MatchResult) -> MatchResult {
    let (first, second) = if result.direction.is_horizontal() {
        (Direction::Up, Direction::Down)
    } else if result.direction.is_vertical() {
        (Direction::Right, Direction::Left)
    } else {
        return result;
    };

    for &member in &result.pieces {
        let mut extra = Vec::new();
        connected_in_direction(grid, member, first, &mut extra);
        connected_in_direction(grid, member, second, &mut extra);

        if extra.len() >= MIN_EXTENSION {
            debug!(
                from = ?result.direction,
                at = %grid.piece(member).position,
                extension = extra.len(),
                "super match"
            );
            extra.extend(result.pieces.iter().copied());
            return MatchResult {
                pieces: extra,
                direction: MatchDirection::Super,
            };
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{PieceId, Position};
    use crate::matcher::find_match;
    use crate::utils::grid_from_str_array;
    use std::collections::HashSet;

    fn id_at(grid: &Grid, x: usize, y: usize) -> PieceId {
        grid.occupant(Position::new(x, y)).unwrap()
    }

    fn assert_unique(result: &MatchResult) {
        let unique: HashSet<PieceId> = result.pieces.iter().copied().collect();
        assert_eq!(unique.len(), result.len(), "duplicate members in {:?}", result);
    }

    #[test]
    fn test_l_shape_becomes_super() {
        let grid = grid_from_str_array(&[
            "RGB", //
            "RBG", //
            "RRR", //
        ])
        .unwrap();
        let primary = find_match(&grid, id_at(&grid, 1, 0));
        assert_eq!(primary.direction, MatchDirection::Horizontal);

        let result = resolve_super_match(&grid, primary);
        assert_eq!(result.direction, MatchDirection::Super);
        assert_eq!(result.len(), 5);
        assert_unique(&result);
        // Extension pieces come first.
        assert_eq!(result.pieces[0], id_at(&grid, 0, 1));
        assert_eq!(result.pieces[1], id_at(&grid, 0, 2));
    }

    #[test]
    fn test_t_shape_from_vertical_run() {
        let grid = grid_from_str_array(&[
            "GRG", //
            "GRB", //
            "RRR", //
            "BGB", //
        ])
        .unwrap();
        let primary = find_match(&grid, id_at(&grid, 1, 2));
        assert_eq!(primary.direction, MatchDirection::Vertical);

        let result = resolve_super_match(&grid, primary);
        assert_eq!(result.direction, MatchDirection::Super);
        assert_eq!(result.len(), 5);
        assert_unique(&result);
        let members: HashSet<PieceId> = result.pieces.iter().copied().collect();
        assert!(members.contains(&id_at(&grid, 0, 1)));
        assert!(members.contains(&id_at(&grid, 2, 1)));
    }

    #[test]
    fn test_single_extra_piece_is_not_enough() {
        let grid = grid_from_str_array(&[
            "GRG", //
            "RRR", //
            "GBG", //
        ])
        .unwrap();
        let primary = find_match(&grid, id_at(&grid, 0, 1));
        let result = resolve_super_match(&grid, primary.clone());
        assert_eq!(result, primary);
    }

    #[test]
    fn test_first_member_with_extension_wins() {
        // The candidate (1,0) extends upward by two; (2,0) would extend by three.
        let grid = grid_from_str_array(&[
            "GBRG", //
            "BRRB", //
            "GRRG", //
            "BRRR", //
        ])
        .unwrap();
        let primary = find_match(&grid, id_at(&grid, 1, 0));
        assert_eq!(primary.direction, MatchDirection::Horizontal);
        assert_eq!(primary.pieces[0], id_at(&grid, 1, 0));

        let result = resolve_super_match(&grid, primary);
        assert_eq!(result.direction, MatchDirection::Super);
        assert_eq!(result.len(), 5);
        assert!(!result.pieces.contains(&id_at(&grid, 2, 3)));
    }

    #[test]
    fn test_none_result_passes_through() {
        let grid = grid_from_str_array(&["RG"]).unwrap();
        let primary = find_match(&grid, id_at(&grid, 0, 0));
        assert_eq!(resolve_super_match(&grid, primary.clone()), primary);
    }
}
