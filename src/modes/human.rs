use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use std::io::{Stderr, stderr};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::game::{GameConfig, GameEvent, GamePhase, GameState};
use crate::input::{InputAction, InputHandler};
use crate::render::Renderer;
use crate::session::GameSession;

pub struct HumanMode {
    session: Arc<GameSession>,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Frame size of the last draw, for mapping clicks onto the board
    last_area: Rect,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let session = match seed {
            Some(seed) => GameSession::with_seed(config, seed),
            None => GameSession::new(config),
        }
        .context("Failed to create game session")?;

        Ok(Self {
            session,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            last_area: Rect::default(),
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        info!("terminal ready");

        // Run game loop with cleanup
        let result = self.run_event_loop(&mut terminal).await;

        self.session.stop().await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame); ticks are driven by the session
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event).await?,
                        Some(Err(err)) => warn!(%err, "terminal event error"),
                        None => self.should_quit = true,
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    let state = self.session.snapshot();
                    let completed = terminal.draw(|frame| {
                        self.renderer.render(frame, &state);
                    }).context("Failed to draw frame")?;
                    self.last_area = completed.area;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                info!("quitting");
                break;
            }
        }

        Ok(())
    }

    async fn handle_event(&mut self, event: Event) -> Result<()> {
        let state = self.session.snapshot();
        let board = Renderer::board_area(self.last_area, &state);

        let event = match self
            .input_handler
            .handle_event(&event, board, state.grid_width)
        {
            InputAction::Game(GameEvent::Tap(tap)) => {
                // Steering only makes sense while the snake is moving
                if !state.is_ticking() {
                    return Ok(());
                }
                GameEvent::Tap(tap)
            }
            InputAction::Game(event) => event,
            InputAction::TogglePlay => match toggle_event(&state) {
                Some(event) => event,
                None => return Ok(()),
            },
            InputAction::Quit => {
                self.should_quit = true;
                return Ok(());
            }
            InputAction::None => return Ok(()),
        };

        self.session
            .dispatch(event)
            .await
            .context("Failed to apply game event")
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// The single start/pause control: start or resume a stopped game, pause a
/// running one, and do nothing once the game is over.
fn toggle_event(state: &GameState) -> Option<GameEvent> {
    if state.is_game_over {
        return None;
    }
    match state.phase {
        GamePhase::Idle | GamePhase::Paused => Some(GameEvent::Start),
        GamePhase::Running => Some(GameEvent::Pause),
    }
}
