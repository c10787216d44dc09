use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::game::{GameEvent, TapPoint};
use crate::render::CELL_COLUMNS;

#[derive(Debug, Clone, PartialEq)]
pub enum InputAction {
    Game(GameEvent),
    /// Start, pause or resume depending on the current phase
    TogglePlay,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Map a terminal event; `board` is where the grid was last drawn
    pub fn handle_event(&self, event: &Event, board: Rect, grid_width: usize) -> InputAction {
        match event {
            // Only process key press events, not release
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(*key),
            Event::Mouse(mouse) => self.handle_mouse_event(*mouse, board, grid_width),
            _ => InputAction::None,
        }
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> InputAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return InputAction::Quit;
        }

        match key.code {
            KeyCode::Char(' ') | KeyCode::Enter => InputAction::TogglePlay,
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char('n') | KeyCode::Char('N') => {
                InputAction::Game(GameEvent::Reset)
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => InputAction::Quit,
            _ => InputAction::None,
        }
    }

    /// A left click inside the board becomes a tap in board pixels.
    ///
    /// One terminal column is one pixel and a cell is `CELL_COLUMNS` wide,
    /// so rows are scaled to keep cells square. Clicks land on the center
    /// of the column/row they hit.
    pub fn handle_mouse_event(
        &self,
        mouse: MouseEvent,
        board: Rect,
        grid_width: usize,
    ) -> InputAction {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return InputAction::None;
        }

        let inside = mouse.column >= board.x
            && mouse.column < board.x + board.width
            && mouse.row >= board.y
            && mouse.row < board.y + board.height;
        if !inside {
            return InputAction::None;
        }

        let cell = f32::from(CELL_COLUMNS);
        let x = f32::from(mouse.column - board.x) + 0.5;
        let y = (f32::from(mouse.row - board.y) + 0.5) * cell;
        let canvas_width = grid_width as u32 * u32::from(CELL_COLUMNS);

        InputAction::Game(GameEvent::Tap(TapPoint::new(x, y, canvas_width)))
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
