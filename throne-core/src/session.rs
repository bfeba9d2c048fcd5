//! GameSession - the primary public API for a playthrough.
//!
//! Wraps a [`GameStore`] with the only asynchrony in the system: the
//! wall clock, and the deferred teardown that returns a finished battle to
//! idle a few seconds after it ends. The teardown is a scheduled task owned
//! by the session; it is cancelled if a new battle starts first or the
//! session is dropped.

use crate::intent::{CombatIntent, Effect, Intent, IntentError};
use crate::store::GameStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// How long a finished battle stays readable before it is cleared.
pub const BATTLE_CLEAR_DELAY: Duration = Duration::from_secs(3);

/// Errors from GameSession operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("intent rejected: {0}")]
    Intent(#[from] IntentError),
}

/// Configuration for creating a new game session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Player name; `None` stays on the main menu.
    pub player_name: Option<String>,

    /// Delay before a finished battle is torn down.
    pub battle_clear_delay: Duration,

    /// Whether to run the resource daily tick at startup, as the
    /// presentation layer does on mount.
    pub daily_tick_on_start: bool,
}

impl SessionConfig {
    pub fn new() -> Self {
        Self {
            player_name: None,
            battle_clear_delay: BATTLE_CLEAR_DELAY,
            daily_tick_on_start: true,
        }
    }

    /// Start a playthrough immediately under this name.
    pub fn with_player_name(mut self, name: impl Into<String>) -> Self {
        self.player_name = Some(name.into());
        self
    }

    /// Override the battle teardown delay.
    pub fn with_battle_clear_delay(mut self, delay: Duration) -> Self {
        self.battle_clear_delay = delay;
        self
    }

    /// Skip the startup daily tick.
    pub fn without_daily_tick(mut self) -> Self {
        self.daily_tick_on_start = false;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A running game session.
pub struct GameSession {
    store: Arc<Mutex<GameStore>>,
    battle_clear: Option<JoinHandle<()>>,
    clear_delay: Duration,
}

impl GameSession {
    /// Create a session, run the startup daily tick, and optionally start a
    /// playthrough.
    pub async fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let mut session = Self {
            store: Arc::new(Mutex::new(GameStore::new(Utc::now()))),
            battle_clear: None,
            clear_delay: config.battle_clear_delay,
        };

        if config.daily_tick_on_start {
            session
                .dispatch(Intent::Resource(
                    crate::intent::ResourceIntent::ProcessDailyReset,
                ))
                .await?;
        }
        if let Some(name) = config.player_name {
            session
                .dispatch(Intent::Game(crate::intent::GameIntent::StartNewGame {
                    player_name: name,
                }))
                .await?;
            info!("session started");
        }

        Ok(session)
    }

    /// Dispatch an intent, stamping the current wall-clock time.
    ///
    /// An `EndBattle` schedules the deferred teardown; a `StartBattle`
    /// issued while that teardown is pending cancels it and clears the old
    /// battle immediately, so the new battle never races the timer.
    pub async fn dispatch(&mut self, intent: Intent) -> Result<Vec<Effect>, SessionError> {
        if matches!(intent, Intent::Combat(CombatIntent::StartBattle { .. })) {
            self.cancel_pending_clear().await;
        }

        let effects = {
            let mut store = self.store.lock().await;
            store.dispatch(intent, Utc::now())?
        };

        if effects
            .iter()
            .any(|e| matches!(e, Effect::BattleEnded { .. }))
        {
            self.schedule_battle_clear();
        }

        Ok(effects)
    }

    /// Clone the current state tree.
    pub async fn snapshot(&self) -> GameStore {
        self.store.lock().await.clone()
    }

    /// Whether a battle is on the field (in any phase).
    pub async fn in_battle(&self) -> bool {
        self.store.lock().await.combat().battle.is_some()
    }

    fn schedule_battle_clear(&mut self) {
        let store = Arc::clone(&self.store);
        let delay = self.clear_delay;
        debug!(?delay, "scheduling battle teardown");
        self.battle_clear = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut store = store.lock().await;
            match store.dispatch(Intent::Combat(CombatIntent::ClearBattle), Utc::now()) {
                Ok(_) => debug!("battle cleared"),
                Err(error) => debug!(%error, "battle teardown skipped"),
            }
        }));
    }

    /// Abort a pending teardown and clear the finished battle now.
    async fn cancel_pending_clear(&mut self) {
        if let Some(handle) = self.battle_clear.take() {
            if !handle.is_finished() {
                handle.abort();
                let mut store = self.store.lock().await;
                // The old battle must not outlive its timer.
                let _ = store.dispatch(Intent::Combat(CombatIntent::ClearBattle), Utc::now());
                debug!("pending battle teardown cancelled");
            }
        }
    }
}

impl Drop for GameSession {
    fn drop(&mut self) {
        if let Some(handle) = self.battle_clear.take() {
            handle.abort();
        }
    }
}
