use ratatui::layout::Position;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Return the cell one step from `pos` in this direction, or `None` if
    /// that cell lies outside a square board with sides of `grid_size`
    /// cells.
    pub(super) fn advance(self, pos: Position, grid_size: u16) -> Option<Position> {
        let Position { mut x, mut y } = pos;
        match self {
            Direction::Up => y = y.checked_sub(1)?,
            Direction::Down => y = increment_in_bounds(y, grid_size)?,
            Direction::Left => x = x.checked_sub(1)?,
            Direction::Right => x = increment_in_bounds(x, grid_size)?,
        }
        Some(Position { x, y })
    }

    pub(super) fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// A turn from `self` to `other` is allowed only if it changes axis.
    /// This rules out both reversing and "turning" onto the current
    /// heading.
    pub(super) fn can_turn_to(self, other: Direction) -> bool {
        self.is_horizontal() != other.is_horizontal()
    }
}

fn increment_in_bounds(x: u16, max: u16) -> Option<u16> {
    x.checked_add(1).filter(|&xx| xx < max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Direction::Up, Position::new(2, 7), Some(Position::new(2, 6)))]
    #[case(Direction::Down, Position::new(2, 7), Some(Position::new(2, 8)))]
    #[case(Direction::Right, Position::new(2, 7), Some(Position::new(3, 7)))]
    #[case(Direction::Left, Position::new(2, 7), Some(Position::new(1, 7)))]
    #[case(Direction::Up, Position::new(2, 0), None)]
    #[case(Direction::Down, Position::new(2, 9), None)]
    #[case(Direction::Right, Position::new(9, 7), None)]
    #[case(Direction::Left, Position::new(0, 7), None)]
    #[case(Direction::Down, Position::new(0, 8), Some(Position::new(0, 9)))]
    #[case(Direction::Right, Position::new(8, 0), Some(Position::new(9, 0)))]
    fn test_direction_advance(
        #[case] d: Direction,
        #[case] pos: Position,
        #[case] r: Option<Position>,
    ) {
        assert_eq!(d.advance(pos, 10), r);
    }

    #[rstest]
    #[case(Direction::Right, Direction::Up, true)]
    #[case(Direction::Right, Direction::Down, true)]
    #[case(Direction::Right, Direction::Left, false)]
    #[case(Direction::Right, Direction::Right, false)]
    #[case(Direction::Up, Direction::Left, true)]
    #[case(Direction::Up, Direction::Right, true)]
    #[case(Direction::Up, Direction::Down, false)]
    #[case(Direction::Down, Direction::Down, false)]
    fn test_can_turn_to(#[case] current: Direction, #[case] wanted: Direction, #[case] ok: bool) {
        assert_eq!(current.can_turn_to(wanted), ok);
    }
}
