use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::game::{Direction as Heading, GamePhase, GameState, Position};

/// Terminal columns used to draw one grid cell
pub const CELL_COLUMNS: u16 = 2;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState) {
        let chunks = Self::layout(frame.area());

        // Render header with score and phase
        let stats = self.render_stats(state);
        frame.render_widget(stats, chunks[0]);

        let board_area = Self::board_area(frame.area(), state);
        let board = self.render_board(state);
        frame.render_widget(board, board_area);

        if state.is_game_over {
            let popup = centered(board_area, 24, 5);
            frame.render_widget(Clear, popup);
            frame.render_widget(self.render_game_over(state), popup);
        }

        // Render footer with controls
        let controls = self.render_controls(state);
        frame.render_widget(controls, chunks[2]);
    }

    /// Where the board lands inside a frame of the given size.
    ///
    /// The input side uses the same rectangle to turn mouse clicks into
    /// board coordinates.
    pub fn board_area(area: Rect, state: &GameState) -> Rect {
        let game_area = Self::layout(area)[1];
        let width = (state.grid_width as u16).saturating_mul(CELL_COLUMNS);
        let height = state.grid_height as u16;
        centered(game_area, width, height)
    }

    fn layout(area: Rect) -> Vec<Rect> {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(area)
            .to_vec()
    }

    fn render_board(&self, state: &GameState) -> Paragraph<'_> {
        let border_color = if state.is_game_over {
            Color::Red
        } else {
            Color::Blue
        };

        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Position::new(x as i32, y as i32);

                let cell = if state.is_border(pos) {
                    Span::styled("██", Style::default().fg(border_color))
                } else if pos == state.head() {
                    // Snake head - distinct color, pointing where it goes
                    Span::styled(
                        head_glyph(state.direction()),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.is_occupied_by_snake(pos) {
                    Span::styled("● ", Style::default().fg(Color::LightGreen))
                } else if pos == state.food {
                    Span::styled(
                        "◆ ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else if (x + y) % 2 == 0 {
                    Span::styled(". ", Style::default().fg(Color::Gray))
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        Paragraph::new(lines)
    }

    fn render_stats(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                state.score().to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("Status: ", Style::default().fg(Color::Yellow)),
            Span::styled(status_label(state), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM))
    }

    fn render_game_over(&self, state: &GameState) -> Paragraph<'_> {
        let text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score().to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to replay", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, state: &GameState) -> Paragraph<'_> {
        let mut spans = Vec::new();

        if let Some(label) = play_label(state) {
            spans.push(Span::styled("Space", Style::default().fg(Color::Cyan)));
            spans.push(Span::raw(format!(" {label} | ")));
        }

        spans.push(Span::styled("R", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(format!(" {} | ", reset_label(state))));
        spans.push(Span::styled("Click", Style::default().fg(Color::Cyan)));
        spans.push(Span::raw(" to turn | "));
        spans.push(Span::styled("Q", Style::default().fg(Color::Red)));
        spans.push(Span::raw(" to quit"));

        Paragraph::new(vec![Line::from(spans)])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::TOP))
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// What the start/pause control does next; `None` once the game is over
pub fn play_label(state: &GameState) -> Option<&'static str> {
    if state.is_game_over {
        return None;
    }
    Some(match state.phase {
        GamePhase::Idle => "Start",
        GamePhase::Running => "Pause",
        GamePhase::Paused => "Resume",
    })
}

pub fn reset_label(state: &GameState) -> &'static str {
    if state.is_game_over {
        "Replay"
    } else {
        "New Game"
    }
}

fn head_glyph(heading: Heading) -> &'static str {
    match heading {
        Heading::Up => "▲ ",
        Heading::Down => "▼ ",
        Heading::Left => "◀ ",
        Heading::Right => "▶ ",
    }
}

fn status_label(state: &GameState) -> &'static str {
    if state.is_game_over {
        return "Game Over";
    }
    match state.phase {
        GamePhase::Idle => "Ready",
        GamePhase::Running => "Running",
        GamePhase::Paused => "Paused",
    }
}

/// A `width` x `height` rectangle centered in `area`, clipped to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
