use std::sync::Arc;

use tracing::{debug, error};

use super::GameSession;

/// Repeating tick task for one run of the game.
///
/// The loop re-reads the latest snapshot before every sleep and the
/// session re-checks the epoch and phase before every tick, so a pause or
/// reset takes effect before the next step.
pub(super) async fn run(session: Arc<GameSession>, epoch: u64) {
    loop {
        let state = session.snapshot();
        if !state.is_ticking() {
            break;
        }

        let delay = session.tick_delay(&state).await;
        tokio::time::sleep(delay).await;

        match session.tick(epoch).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                error!(%err, epoch, "tick failed, stopping loop");
                break;
            }
        }
    }

    debug!(epoch, "tick loop finished");
}
