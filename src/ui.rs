use crate::consts;
use crate::difficulty::Difficulty;
use crate::game::Ending;
use crate::session::{Session, SessionState};
use crate::util::{center_rect, get_display_area, EnumExt};
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Widget},
    Frame,
};

impl<R> Session<R> {
    pub(crate) fn draw(&self, frame: &mut Frame<'_>) {
        frame.render_widget(self, frame.area());
    }
}

impl<R> Widget for &Session<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = get_display_area(area);
        let [score_area, block_area, control_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(display);

        let stats = self.stats();
        Line::styled(
            format!(
                " Score: {}   High Score: {}   Games Played: {}",
                self.game().score(),
                stats.high_score,
                stats.games_played
            ),
            consts::SCORE_BAR_STYLE,
        )
        .render(score_area, buf);

        let grid_size = self.game().grid_size();
        let block_size = Size {
            width: grid_size
                .saturating_mul(consts::CELL_WIDTH)
                .saturating_add(2),
            height: grid_size.saturating_add(2),
        };
        let block_area = center_rect(block_area, block_size);
        Block::bordered().render(block_area, buf);
        let board_area = block_area.inner(Margin::new(1, 1));
        let mut board = Canvas {
            area: board_area,
            buf,
        };
        let game = self.game();
        if let Some(food) = game.food() {
            board.draw_cell(food, consts::FOOD_SYMBOL, consts::FOOD_STYLE);
        }
        if let Some(powerup) = game.powerup() {
            board.draw_cell(
                powerup.position,
                consts::POWERUP_SYMBOL,
                consts::POWERUP_STYLE,
            );
        }
        for p in game.snake_body() {
            board.draw_cell(p, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_STYLE);
        }
        if game.ending().is_some_and(Ending::is_collision) {
            board.draw_cell(
                game.snake_head(),
                consts::COLLISION_SYMBOL,
                consts::COLLISION_STYLE,
            );
        } else {
            board.draw_cell(
                game.snake_head(),
                consts::SNAKE_HEAD_SYMBOL,
                consts::SNAKE_STYLE,
            );
        }

        match self.state() {
            SessionState::Idle | SessionState::Running => (),
            SessionState::Paused => Popup::new([Line::from("PAUSED")]).render(board_area, buf),
            SessionState::CountingDown(n) => {
                Popup::new([Line::from(n.to_string())]).render(board_area, buf);
            }
            SessionState::GameOver => Popup::new([
                Line::from("GAME OVER"),
                Line::from(format!("Final Score: {}", game.score())),
            ])
            .render(board_area, buf),
        }

        ControlBar {
            state: self.state(),
            difficulty: self.difficulty(),
        }
        .render(control_area, buf);
    }
}

/// A bordered box of centered text drawn over the middle of the board
#[derive(Clone, Debug, Eq, PartialEq)]
struct Popup<'a> {
    lines: Vec<Line<'a>>,
}

impl<'a> Popup<'a> {
    fn new<I: IntoIterator<Item = Line<'a>>>(lines: I) -> Popup<'a> {
        Popup {
            lines: lines.into_iter().collect(),
        }
    }

    fn size(&self) -> Size {
        let text_width = self.lines.iter().map(Line::width).max().unwrap_or_default();
        Size {
            width: u16::try_from(text_width)
                .unwrap_or(u16::MAX)
                .saturating_add(4),
            height: u16::try_from(self.lines.len())
                .unwrap_or(u16::MAX)
                .saturating_add(2),
        }
    }
}

impl Widget for Popup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = center_rect(area, self.size());
        Clear.render(area, buf);
        let block = Block::bordered().style(consts::OVERLAY_STYLE);
        let inner = block.inner(area);
        block.render(area, buf);
        for (line, row) in self.lines.into_iter().zip(inner.rows()) {
            line.alignment(Alignment::Center).render(row, buf);
        }
    }
}

/// The line at the bottom of the screen listing the available keys
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct ControlBar {
    state: SessionState,
    difficulty: Difficulty,
}

impl Widget for ControlBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut left = Line::from(" ");
        match self.state {
            SessionState::Idle => push_action(&mut left, "Start", "Enter"),
            SessionState::Running => push_action(&mut left, "Pause", "p"),
            SessionState::Paused => push_action(&mut left, "Resume", "p"),
            SessionState::CountingDown(_) => left.push_span("Resuming…"),
            SessionState::GameOver => push_action(&mut left, "Restart", "r"),
        }
        left.push_span(" · ");
        push_action(&mut left, "Quit", "q");

        let mut right = Line::from("Speed:");
        for d in Difficulty::iter() {
            let key = (d.into_usize() + 1).to_string();
            right.push_span(" ");
            right.push_span(Span::styled(key, consts::KEY_STYLE));
            right.push_span(" ");
            if d == self.difficulty {
                right.push_span(Span::styled(d.as_str(), consts::SELECTED_STYLE));
            } else {
                right.push_span(d.as_str());
            }
        }
        right.push_span(" ");

        let [left_area, right_area] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(u16::try_from(right.width()).unwrap_or(u16::MAX)),
        ])
        .areas(area);
        left.render(left_area, buf);
        right.render(right_area, buf);
    }
}

fn push_action(line: &mut Line<'_>, label: &'static str, key: &'static str) {
    line.push_span(label);
    line.push_span(" (");
    line.push_span(Span::styled(key, consts::KEY_STYLE));
    line.push_span(")");
}

/// Draws on the board in cell coordinates
#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn draw_cell(&mut self, pos: Position, symbol: &str, style: Style) {
        let Some(x) = pos
            .x
            .checked_mul(consts::CELL_WIDTH)
            .and_then(|x| self.area.x.checked_add(x))
        else {
            return;
        };
        let Some(y) = self.area.y.checked_add(pos.y) else {
            return;
        };
        for (x, ch) in (x..).zip(symbol.chars()) {
            if let Some(cell) = self.buf.cell_mut((x, y)) {
                cell.set_char(ch);
                cell.set_style(Style::reset().patch(style));
            }
        }
    }
}
