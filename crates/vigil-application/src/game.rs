//! Game lifecycle state machine.
//!
//! `GameSession` owns the session aggregate and is the only code that
//! mutates it, through named transitions: start, confirm the location
//! preview, observe, direct, restart. It consults the energy economy
//! before each turn and delegates generation to the hero generator and
//! the continuation engine.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use vigil_core::config::ApiConfig;
use vigil_core::energy::{DIRECTIVE_COST, OBSERVE_GAIN};
use vigil_core::error::{Result, VigilError};
use vigil_core::hero::HeroProfile;
use vigil_core::message::{Message, Sender};
use vigil_core::session::{SessionState, SessionStatus};
use vigil_core::transport::GenerationTransport;
use vigil_infrastructure::ConfigStore;
use vigil_interaction::{transport_for, ContinuationEngine, HeroGenerator, DEFAULT_MODEL};

/// SYSTEM-visible notice appended when a continuation attempt fails.
/// The turn degrades; the session does not abort.
const DISRUPTION_NOTICE: &str =
    "Interference floods the psychic channel. The connection to the vessel is disrupted.";

/// Builds a transport for a config. Injectable so tests can substitute
/// canned backends.
pub type TransportFactory = Box<dyn Fn(&ApiConfig) -> Arc<dyn GenerationTransport> + Send + Sync>;

/// What one observe/direct transition produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The hero answered; the diary entry is already in the log.
    Narrated {
        diary_entry: String,
        status_description: String,
        hero_died: bool,
    },
    /// The generation attempt failed; a SYSTEM notice is in the log and
    /// any energy already spent or gained for the turn stays spent.
    Disrupted,
}

/// The lifecycle state machine for the single live session.
///
/// # Concurrency
///
/// At most one generation call is in flight at a time. A busy flag is
/// acquired before every network-bound transition and released by a
/// scoped guard on all exit paths; attempts made while busy are rejected
/// with `ActionRejected`, never queued.
pub struct GameSession {
    state: RwLock<SessionState>,
    config: RwLock<Option<ApiConfig>>,
    transport: RwLock<Option<Arc<dyn GenerationTransport>>>,
    last_status: RwLock<String>,
    busy: AtomicBool,
    config_store: Arc<ConfigStore>,
    transport_factory: TransportFactory,
    model: String,
}

impl GameSession {
    /// Creates a menu-stage session backed by the given config store.
    pub fn new(config_store: Arc<ConfigStore>) -> Self {
        Self {
            state: RwLock::new(SessionState::new()),
            config: RwLock::new(None),
            transport: RwLock::new(None),
            last_status: RwLock::new(String::new()),
            busy: AtomicBool::new(false),
            config_store,
            transport_factory: Box::new(|config: &ApiConfig| transport_for(config)),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Overrides the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Overrides how transports are built. Used by tests.
    pub fn with_transport_factory(mut self, factory: TransportFactory) -> Self {
        self.transport_factory = factory;
        self
    }

    /// A point-in-time copy of the session aggregate.
    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    /// Current lifecycle status.
    pub async fn status(&self) -> SessionStatus {
        self.state.read().await.status
    }

    /// Current energy level.
    pub async fn energy(&self) -> u8 {
        self.state.read().await.energy.value()
    }

    /// Copy of the message log.
    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }

    /// The current hero, if one is bound.
    pub async fn hero(&self) -> Option<HeroProfile> {
        self.state.read().await.current_hero.clone()
    }

    /// The hero's most recent status line.
    pub async fn last_status(&self) -> String {
        self.last_status.read().await.clone()
    }

    /// True while a generation call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// `MENU -> SEARCHING -> LOCATION_PREVIEW`.
    ///
    /// Persists the config, resets the session, and generates a hero.
    /// On failure the session reverts to `MENU` and the error is
    /// surfaced once; the persisted config is kept so a retry does not
    /// re-enter credentials.
    pub async fn start(&self, config: ApiConfig) -> Result<HeroProfile> {
        let _guard = self.acquire_busy()?;
        {
            let state = self.state.read().await;
            if state.status != SessionStatus::Menu {
                return Err(VigilError::rejected(format!(
                    "cannot start from {:?}",
                    state.status
                )));
            }
        }

        self.config_store.save(&config)?;
        *self.config.write().await = Some(config.clone());

        self.run_search(&config).await
    }

    /// `ACTIVE | HERO_DEAD -> SEARCHING -> LOCATION_PREVIEW`, reusing
    /// the stored config.
    pub async fn restart(&self) -> Result<HeroProfile> {
        let _guard = self.acquire_busy()?;
        {
            let state = self.state.read().await;
            if !matches!(
                state.status,
                SessionStatus::Active | SessionStatus::HeroDead
            ) {
                return Err(VigilError::rejected(format!(
                    "cannot restart from {:?}",
                    state.status
                )));
            }
        }

        let config = self
            .config
            .read()
            .await
            .clone()
            .ok_or_else(|| VigilError::internal("restart without a stored config"))?;

        self.run_search(&config).await
    }

    /// `LOCATION_PREVIEW -> ACTIVE`, seeding the first diary entry with
    /// a silence turn over empty history. A failed seed degrades to a
    /// SYSTEM notice; the session stays `ACTIVE` either way.
    pub async fn confirm_location(&self) -> Result<TurnOutcome> {
        let _guard = self.acquire_busy()?;
        let hero = {
            let mut state = self.state.write().await;
            if state.status != SessionStatus::LocationPreview {
                return Err(VigilError::rejected(format!(
                    "cannot confirm location from {:?}",
                    state.status
                )));
            }
            state.status = SessionStatus::Active;
            state
                .current_hero
                .clone()
                .ok_or_else(|| VigilError::internal("location preview without a hero"))?
        };

        tracing::info!("location confirmed, session active");
        self.run_turn(&hero, None, false).await
    }

    /// `ACTIVE -> ACTIVE` (or `HERO_DEAD`): a passive observation turn.
    /// Restores energy and lets the story advance on its own.
    pub async fn observe(&self) -> Result<TurnOutcome> {
        let _guard = self.acquire_busy()?;
        let hero = {
            let mut state = self.state.write().await;
            self.require_active(&state)?;
            state.energy.gain(OBSERVE_GAIN);
            state
                .current_hero
                .clone()
                .ok_or_else(|| VigilError::internal("active session without a hero"))?
        };

        self.run_turn(&hero, None, true).await
    }

    /// `ACTIVE -> ACTIVE` (or `HERO_DEAD`): issue a directive.
    ///
    /// Rejected before any mutation when energy cannot cover the cost;
    /// the transport is never invoked for a rejected directive. The cost
    /// is not refunded if the generation attempt fails afterwards.
    pub async fn direct(&self, text: &str) -> Result<TurnOutcome> {
        let _guard = self.acquire_busy()?;
        let hero = {
            let mut state = self.state.write().await;
            self.require_active(&state)?;
            if !state.energy.can_afford(DIRECTIVE_COST) {
                return Err(VigilError::rejected(format!(
                    "not enough energy to speak: have {}, need {}",
                    state.energy.value(),
                    DIRECTIVE_COST
                )));
            }
            state.push(Sender::System, text);
            state.energy.spend(DIRECTIVE_COST)?;
            state
                .current_hero
                .clone()
                .ok_or_else(|| VigilError::internal("active session without a hero"))?
        };

        self.run_turn(&hero, Some(text), true).await
    }

    fn require_active(&self, state: &SessionState) -> Result<()> {
        match state.status {
            SessionStatus::Active => Ok(()),
            SessionStatus::HeroDead => Err(VigilError::rejected(
                "the hero is dead; only restart remains",
            )),
            other => Err(VigilError::rejected(format!(
                "no turn may be taken from {:?}",
                other
            ))),
        }
    }

    /// The shared search transition: reset, generate, preview.
    /// The busy guard is held by the caller.
    async fn run_search(&self, config: &ApiConfig) -> Result<HeroProfile> {
        {
            let mut state = self.state.write().await;
            state.reset_for_search();
        }
        *self.last_status.write().await = String::new();

        let transport = (self.transport_factory)(config);
        *self.transport.write().await = Some(transport.clone());

        let generator = HeroGenerator::new(transport, &self.model);
        match generator.generate().await {
            Ok(hero) => {
                let mut state = self.state.write().await;
                state.status = SessionStatus::LocationPreview;
                state.current_hero = Some(hero.clone());
                Ok(hero)
            }
            Err(err) => {
                tracing::warn!(error = %err, "hero generation failed, returning to menu");
                let mut state = self.state.write().await;
                state.status = SessionStatus::Menu;
                Err(err)
            }
        }
    }

    /// Runs one continuation turn and applies its result. Costs and
    /// gains were already applied by the caller; a failed attempt keeps
    /// them and degrades to a SYSTEM notice.
    async fn run_turn(
        &self,
        hero: &HeroProfile,
        directive: Option<&str>,
        death_matters: bool,
    ) -> Result<TurnOutcome> {
        let transport = self
            .transport
            .read()
            .await
            .clone()
            .ok_or_else(|| VigilError::internal("active session without a transport"))?;
        let engine = ContinuationEngine::new(transport, &self.model);

        let history = self.messages().await;
        match engine.next_turn(hero, &history, directive).await {
            Ok(turn) => {
                let mut state = self.state.write().await;
                state.push(Sender::Hero, turn.diary_entry.clone());
                *self.last_status.write().await = turn.status_description.clone();
                if death_matters && turn.is_dead {
                    tracing::info!("the hero did not survive the turn");
                    state.status = SessionStatus::HeroDead;
                }
                Ok(TurnOutcome::Narrated {
                    diary_entry: turn.diary_entry,
                    status_description: turn.status_description,
                    hero_died: death_matters && turn.is_dead,
                })
            }
            Err(err) if err.is_turn_failure() => {
                tracing::warn!(error = %err, "continuation turn failed");
                let mut state = self.state.write().await;
                state.push(Sender::System, DISRUPTION_NOTICE);
                Ok(TurnOutcome::Disrupted)
            }
            Err(err) => Err(err),
        }
    }

    /// Acquires the busy flag, or rejects if a call is outstanding. The
    /// returned guard releases on drop, so every exit path clears it.
    fn acquire_busy(&self) -> Result<BusyGuard<'_>> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            Ok(BusyGuard(&self.busy))
        } else {
            Err(VigilError::rejected("a turn is already in flight"))
        }
    }
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
