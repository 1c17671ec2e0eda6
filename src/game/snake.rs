use super::direction::Direction;
use crate::consts;
use ratatui::layout::Position;
use std::collections::VecDeque;

/// The snake
///
/// All positions are relative to the top-left corner of the board.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(super) struct Snake {
    /// The cells occupied by the snake, head first and tail last.  Never
    /// empty, and no cell appears twice.
    pub(super) cells: VecDeque<Position>,

    /// The direction in which the snake moved on the most recent tick
    pub(super) direction: Direction,
}

impl Snake {
    /// Create a snake `length` cells long with its head at `head`, facing
    /// `direction`, with the rest of its body trailing straight behind it.
    ///
    /// Body cells that would fall off the board are omitted.
    pub(super) fn new(head: Position, direction: Direction, length: u16) -> Snake {
        let behind = match direction {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        };
        let cells = std::iter::successors(Some(head), |&p| behind.advance(p, u16::MAX))
            .take(usize::from(length))
            .collect();
        Snake { cells, direction }
    }

    /// The snake at the start of a game on a `grid_size`×`grid_size` board:
    /// a short horizontal line left of center, facing right
    pub(super) fn starting(grid_size: u16) -> Snake {
        let head = Position::new(grid_size * 2 / 5, grid_size / 2);
        Snake::new(head, Direction::Right, consts::INITIAL_SNAKE_LENGTH)
    }

    /// Return the position of the snake's head
    pub(super) fn head(&self) -> Position {
        self.cells[0]
    }

    pub(super) fn contains(&self, pos: Position) -> bool {
        self.cells.contains(&pos)
    }

    /// Iterate over the cells behind the head
    pub(super) fn body(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().skip(1).copied()
    }

    /// Put the head on `pos`, growing the snake by one cell
    pub(super) fn push_head(&mut self, pos: Position) {
        self.cells.push_front(pos);
    }

    /// Remove the tail cell, leaving the snake at least one cell long
    pub(super) fn drop_tail(&mut self) {
        if self.cells.len() > 1 {
            let _ = self.cells.pop_back();
        }
    }
}
