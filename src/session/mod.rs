//! Single owner of the live game.
//!
//! [`GameSession`] holds the current snapshot in a `watch` channel: the
//! session is the only writer, renderers read or subscribe. Every change
//! goes through [`GameSession::dispatch`] or the tick loop, both of which
//! take the engine lock for the whole read-modify-write.

mod ticker;

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::game::{GameConfig, GameEngine, GameError, GameEvent, GamePhase, GameState};

struct SessionInner {
    engine: GameEngine,
    /// Identifies the live tick loop; bumped whenever a loop is replaced
    run_epoch: u64,
    ticker: Option<JoinHandle<()>>,
}

pub struct GameSession {
    inner: Mutex<SessionInner>,
    state_tx: watch::Sender<GameState>,
}

impl GameSession {
    /// Validate the config and build an idle session around a fresh game
    pub fn new(config: GameConfig) -> Result<Arc<Self>, GameError> {
        config.validate()?;
        Self::with_engine(GameEngine::new(config))
    }

    /// Like [`GameSession::new`], with reproducible food placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Arc<Self>, GameError> {
        config.validate()?;
        Self::with_engine(GameEngine::with_seed(config, seed))
    }

    fn with_engine(mut engine: GameEngine) -> Result<Arc<Self>, GameError> {
        let state = engine.new_game()?;
        Ok(Self::with_state(engine, state))
    }

    /// Start from an arbitrary snapshot
    pub(crate) fn with_state(engine: GameEngine, state: GameState) -> Arc<Self> {
        let (state_tx, _) = watch::channel(state);
        Arc::new(Self {
            inner: Mutex::new(SessionInner {
                engine,
                run_epoch: 0,
                ticker: None,
            }),
            state_tx,
        })
    }

    /// Copy of the current snapshot
    pub fn snapshot(&self) -> GameState {
        self.state_tx.borrow().clone()
    }

    /// Receiver that is notified after every change
    pub fn subscribe(&self) -> watch::Receiver<GameState> {
        self.state_tx.subscribe()
    }

    /// Apply an event to the current snapshot.
    ///
    /// Starting or resuming a game spawns the tick loop, so this must be
    /// called from inside a tokio runtime.
    pub async fn dispatch(self: &Arc<Self>, event: GameEvent) -> Result<(), GameError> {
        let mut inner = self.inner.lock().await;
        let current = self.snapshot();
        let next = inner.engine.apply(&current, event)?;

        let starts_ticking = !current.is_ticking() && next.is_ticking();
        if starts_ticking || event == GameEvent::Reset {
            inner.run_epoch += 1;
            if let Some(stale) = inner.ticker.take() {
                stale.abort();
            }
        }

        self.state_tx.send_replace(next);

        if starts_ticking {
            let epoch = inner.run_epoch;
            debug!(epoch, "spawning tick loop");
            inner.ticker = Some(tokio::spawn(ticker::run(Arc::clone(self), epoch)));
        }

        Ok(())
    }

    /// Stop the tick loop; a running game is left paused so Start resumes it
    pub async fn stop(&self) {
        let mut inner = self.inner.lock().await;
        inner.run_epoch += 1;
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
            info!("tick loop stopped");
        }

        self.state_tx.send_if_modified(|state| {
            if state.is_ticking() {
                state.phase = GamePhase::Paused;
                true
            } else {
                false
            }
        });
    }

    /// True while a tick loop task is alive
    pub async fn is_ticker_running(&self) -> bool {
        let inner = self.inner.lock().await;
        inner
            .ticker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// One tick from the loop tagged `epoch`.
    ///
    /// Returns whether the loop should keep going.
    async fn tick(&self, epoch: u64) -> Result<bool, GameError> {
        let mut inner = self.inner.lock().await;
        if inner.run_epoch != epoch {
            return Ok(false);
        }

        let current = self.snapshot();
        if !current.is_ticking() {
            return Ok(false);
        }

        let next = match inner.engine.advance(&current) {
            Ok(next) => next,
            Err(err) => {
                // No cell left for food: the board is full, so the game ends here
                let mut ended = current;
                ended.is_game_over = true;
                self.state_tx.send_replace(ended);
                return Err(err);
            }
        };
        let keep_going = next.is_ticking();
        self.state_tx.send_replace(next);

        Ok(keep_going)
    }

    /// Delay the loop should wait before ticking `state`
    async fn tick_delay(&self, state: &GameState) -> std::time::Duration {
        self.inner.lock().await.engine.tick_delay(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, Snake, TapPoint};
    use std::time::Duration;
    use tokio::time::sleep;

    fn session_with(body: Vec<Position>, direction: Direction, food: Position) -> Arc<GameSession> {
        let engine = GameEngine::with_seed(GameConfig::default(), 11);
        let state = GameState::new(Snake::from_body(body, direction), food, 20, 30);
        GameSession::with_state(engine, state)
    }

    fn default_session() -> Arc<GameSession> {
        session_with(vec![Position::new(5, 5)], Direction::Right, Position::new(1, 20))
    }

    #[tokio::test]
    async fn test_new_session_is_idle() {
        let session = GameSession::with_seed(GameConfig::default(), 1).unwrap();
        let state = session.snapshot();

        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.snake.len(), 1);
        assert!(!session.is_ticker_running().await);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let result = GameSession::new(GameConfig::new(2, 2));
        assert!(matches!(result, Err(GameError::InvalidConfig(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_drives_ticks() {
        let session = default_session();
        session.dispatch(GameEvent::Start).await.unwrap();
        assert_eq!(session.snapshot().phase, GamePhase::Running);

        sleep(Duration::from_millis(125)).await;
        assert_eq!(session.snapshot().head(), Position::new(6, 5));

        sleep(Duration::from_millis(120)).await;
        assert_eq!(session.snapshot().head(), Position::new(7, 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks() {
        let session = default_session();
        session.dispatch(GameEvent::Start).await.unwrap();
        sleep(Duration::from_millis(125)).await;

        session.dispatch(GameEvent::Pause).await.unwrap();
        let paused = session.snapshot();
        assert_eq!(paused.phase, GamePhase::Paused);

        sleep(Duration::from_secs(1)).await;
        assert_eq!(session.snapshot(), paused);
        assert!(!session.is_ticker_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quick_resume_keeps_single_loop() {
        let session = default_session();
        session.dispatch(GameEvent::Start).await.unwrap();
        sleep(Duration::from_millis(60)).await;

        session.dispatch(GameEvent::Pause).await.unwrap();
        session.dispatch(GameEvent::Start).await.unwrap();

        // The replaced loop would have ticked at 120ms, the new one ticks at 180ms
        sleep(Duration::from_millis(70)).await;
        assert_eq!(session.snapshot().head(), Position::new(5, 5));

        sleep(Duration::from_millis(55)).await;
        assert_eq!(session.snapshot().head(), Position::new(6, 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_discards_running_game() {
        let session = default_session();
        session.dispatch(GameEvent::Start).await.unwrap();
        sleep(Duration::from_millis(250)).await;

        session.dispatch(GameEvent::Reset).await.unwrap();
        let fresh = session.snapshot();
        assert_eq!(fresh.phase, GamePhase::Idle);
        assert!(!fresh.is_game_over);
        assert_eq!(fresh.snake, Snake::new(Position::new(5, 5), Direction::Right));

        sleep(Duration::from_secs(1)).await;
        assert_eq!(session.snapshot(), fresh);
    }

    #[tokio::test(start_paused = true)]
    async fn test_game_over_ends_loop() {
        let session = session_with(vec![Position::new(2, 1)], Direction::Left, Position::new(9, 9));
        session.dispatch(GameEvent::Start).await.unwrap();

        sleep(Duration::from_millis(500)).await;

        let state = session.snapshot();
        assert!(state.is_game_over);
        assert_eq!(state.head(), Position::new(1, 1));
        assert!(!session.is_ticker_running().await);

        // Only reset gets out of a finished game
        session.dispatch(GameEvent::Start).await.unwrap();
        assert!(!session.is_ticker_running().await);
        session.dispatch(GameEvent::Reset).await.unwrap();
        assert!(!session.snapshot().is_game_over);
    }

    #[tokio::test(start_paused = true)]
    async fn test_longer_snake_ticks_faster() {
        let body = (0..6).map(|i| Position::new(10 - i, 5)).collect();
        let session = session_with(body, Direction::Right, Position::new(1, 20));
        session.dispatch(GameEvent::Start).await.unwrap();

        sleep(Duration::from_millis(115)).await;
        assert_eq!(session.snapshot().head(), Position::new(11, 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tap_turns_running_snake() {
        let session = default_session();

        // Ignored before the game starts
        let tap = GameEvent::Tap(TapPoint::new(55.0, 0.0, 200));
        session.dispatch(tap).await.unwrap();
        assert_eq!(session.snapshot().direction(), Direction::Right);

        session.dispatch(GameEvent::Start).await.unwrap();
        session.dispatch(tap).await.unwrap();
        assert_eq!(session.snapshot().direction(), Direction::Up);

        sleep(Duration::from_millis(125)).await;
        assert_eq!(session.snapshot().head(), Position::new(5, 4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_updates() {
        let session = default_session();
        let mut rx = session.subscribe();

        session.dispatch(GameEvent::Start).await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().phase, GamePhase::Running);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().head(), Position::new(6, 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_loop_and_pauses() {
        let session = default_session();
        session.dispatch(GameEvent::Start).await.unwrap();
        session.stop().await;

        sleep(Duration::from_millis(500)).await;
        assert_eq!(session.snapshot().head(), Position::new(5, 5));
        assert_eq!(session.snapshot().phase, GamePhase::Paused);
        assert!(!session.is_ticker_running().await);

        // Start picks the game back up
        session.dispatch(GameEvent::Start).await.unwrap();
        sleep(Duration::from_millis(125)).await;
        assert_eq!(session.snapshot().head(), Position::new(6, 5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_leaves_idle_game_alone() {
        let session = default_session();
        let before = session.snapshot();

        session.stop().await;
        assert_eq!(session.snapshot(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_board_ends_game() {
        // 4x3 board: the interior is (1,1) and (2,1), food sits on the last free cell
        let config = GameConfig {
            start: Position::new(1, 1),
            ..GameConfig::new(4, 3)
        };
        let engine = GameEngine::with_seed(config, 3);
        let state = GameState::new(
            Snake::new(Position::new(1, 1), Direction::Right),
            Position::new(2, 1),
            4,
            3,
        );
        let session = GameSession::with_state(engine, state);

        session.dispatch(GameEvent::Start).await.unwrap();
        sleep(Duration::from_millis(500)).await;

        let ended = session.snapshot();
        assert!(ended.is_game_over);
        assert!(!ended.is_ticking());
        assert_eq!(ended.head(), Position::new(1, 1));
        assert!(!session.is_ticker_running().await);

        // Start stays a no-op, reset gives a playable game again
        session.dispatch(GameEvent::Start).await.unwrap();
        assert!(session.snapshot().is_game_over);
        session.dispatch(GameEvent::Reset).await.unwrap();
        let fresh = session.snapshot();
        assert!(!fresh.is_game_over);
        assert_eq!(fresh.phase, GamePhase::Idle);
        assert_eq!(fresh.food, Position::new(2, 1));
    }
}
