#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::game::{GameSession, TurnOutcome};
    use vigil_core::config::ApiConfig;
    use vigil_core::error::Result;
    use vigil_core::message::Sender;
    use vigil_core::session::SessionStatus;
    use vigil_core::transport::{GenerationRequest, GenerationTransport};
    use vigil_core::VigilError;
    use vigil_infrastructure::ConfigStore;
    use vigil_interaction::testing::{FailingTransport, RecordingTransport};

    const HERO_JSON: &str = r#"{
        "name": "Aldric",
        "archetype": "Disgraced Knight",
        "personality": "Stubborn",
        "origin": "Woke here after the rout at Crowsfield",
        "theme": "dungeon",
        "locationDescription": "A collapsed gatehouse, water dripping somewhere unseen"
    }"#;

    fn turn_json(entry: &str, dead: bool, status: &str) -> String {
        format!(
            r#"{{"diaryEntry": "{}", "isDead": {}, "statusDescription": "{}"}}"#,
            entry, dead, status
        )
    }

    fn store() -> (Arc<ConfigStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        (Arc::new(ConfigStore::with_dir(dir.path())), dir)
    }

    fn session_with(transport: Arc<RecordingTransport>) -> (GameSession, tempfile::TempDir) {
        let (config_store, dir) = store();
        let session = GameSession::new(config_store).with_transport_factory(Box::new(move |_: &ApiConfig| {
            transport.clone() as Arc<dyn GenerationTransport>
        }));
        (session, dir)
    }

    fn config() -> ApiConfig {
        ApiConfig::new("k-test", false)
    }

    /// Wraps a scripted transport so one call can be held open until the
    /// test releases it.
    struct GatedTransport {
        gate: Mutex<Option<tokio::sync::oneshot::Receiver<()>>>,
        inner: RecordingTransport,
    }

    #[async_trait]
    impl GenerationTransport for GatedTransport {
        async fn generate(&self, request: GenerationRequest) -> Result<String> {
            let held = self.gate.lock().unwrap().take();
            if let Some(release) = held {
                let _ = release.await;
            }
            self.inner.generate(request).await
        }
    }

    /// Starts and confirms a session against a scripted transport whose
    /// first two responses are the hero sheet and the seed turn.
    async fn active_session(responses: Vec<String>) -> (GameSession, Arc<RecordingTransport>, tempfile::TempDir) {
        let mut script = vec![
            HERO_JSON.to_string(),
            turn_json("I open my eyes to wet stone.", false, "Dazed"),
        ];
        script.extend(responses);
        let transport = Arc::new(RecordingTransport::scripted(script));
        let (session, dir) = session_with(transport.clone());
        session.start(config()).await.unwrap();
        session.confirm_location().await.unwrap();
        (session, transport, dir)
    }

    #[tokio::test]
    async fn test_successful_start_enters_location_preview() {
        let transport = Arc::new(RecordingTransport::new(HERO_JSON));
        let (session, _dir) = session_with(transport);

        let hero = session.start(config()).await.unwrap();
        assert_eq!(hero.name, "Aldric");

        let state = session.snapshot().await;
        assert_eq!(state.status, SessionStatus::LocationPreview);
        assert!(state.messages.is_empty());
        assert_eq!(state.energy.value(), 50);
        assert_eq!(state.current_hero.as_ref().unwrap(), &hero);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_start_persists_the_config() {
        let transport = Arc::new(RecordingTransport::new(HERO_JSON));
        let (config_store, _dir) = store();
        let session = GameSession::new(config_store.clone()).with_transport_factory(Box::new(
            move |_: &ApiConfig| transport.clone() as Arc<dyn GenerationTransport>,
        ));

        session.start(ApiConfig::new("k-test", true)).await.unwrap();
        let saved = config_store.load().unwrap().unwrap();
        assert_eq!(saved.api_key, "k-test");
        assert!(saved.use_proxy);
    }

    #[tokio::test]
    async fn test_failed_start_reverts_to_menu_and_releases_busy() {
        let failing = Arc::new(FailingTransport::new(VigilError::generation_failed(
            "no route to host",
        )));
        let (config_store, _dir) = store();
        let session = GameSession::new(config_store.clone()).with_transport_factory(Box::new(
            move |_: &ApiConfig| failing.clone() as Arc<dyn GenerationTransport>,
        ));

        let err = session.start(config()).await.unwrap_err();
        assert!(err.is_generation_failed());
        assert_eq!(session.status().await, SessionStatus::Menu);
        assert!(!session.is_busy());
        // The config stays persisted for an immediate retry.
        assert!(config_store.load().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_start_rejected_outside_menu() {
        let transport = Arc::new(RecordingTransport::new(HERO_JSON));
        let (session, _dir) = session_with(transport);
        session.start(config()).await.unwrap();

        let err = session.start(config()).await.unwrap_err();
        assert!(err.is_rejected());
    }

    #[tokio::test]
    async fn test_confirm_location_seeds_exactly_one_hero_entry() {
        let transport = Arc::new(RecordingTransport::scripted(vec![
            HERO_JSON.to_string(),
            turn_json("I open my eyes to wet stone.", false, "Dazed"),
        ]));
        let (session, _dir) = session_with(transport);
        session.start(config()).await.unwrap();

        let outcome = session.confirm_location().await.unwrap();
        assert!(matches!(outcome, TurnOutcome::Narrated { .. }));

        let state = session.snapshot().await;
        assert_eq!(state.status, SessionStatus::Active);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].sender, Sender::Hero);
        assert_eq!(session.last_status().await, "Dazed");
    }

    #[tokio::test]
    async fn test_failed_seed_leaves_session_active_with_a_notice() {
        let transport = Arc::new(RecordingTransport::scripted(vec![
            HERO_JSON.to_string(),
            "garbage, not json".to_string(),
        ]));
        let (session, _dir) = session_with(transport);
        session.start(config()).await.unwrap();

        let outcome = session.confirm_location().await.unwrap();
        assert_eq!(outcome, TurnOutcome::Disrupted);

        let state = session.snapshot().await;
        assert_eq!(state.status, SessionStatus::Active);
        assert_eq!(state.messages.len(), 1);
        assert_eq!(state.messages[0].sender, Sender::System);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_directive_observe_scenario() {
        // Energy 50, directive costs 35, observation restores 15.
        let (session, transport, _dir) = active_session(vec![
            turn_json("The voice. I obey and stand.", false, "On his feet"),
            turn_json("Nothing speaks. I walk the wall east.", false, "Walking"),
        ])
        .await;
        assert_eq!(session.energy().await, 50);
        let calls_before = transport.call_count();

        let outcome = session.direct("Open your eyes").await.unwrap();
        match outcome {
            TurnOutcome::Narrated {
                status_description,
                hero_died,
                ..
            } => {
                assert_eq!(status_description, "On his feet");
                assert!(!hero_died);
            }
            other => panic!("expected a narrated turn, got {:?}", other),
        }
        assert_eq!(session.energy().await, 15);

        let messages = session.messages().await;
        assert_eq!(messages.len(), 3); // seed + SYSTEM directive + HERO reply
        assert_eq!(messages[1].sender, Sender::System);
        assert_eq!(messages[1].content, "Open your eyes");
        assert_eq!(messages[2].sender, Sender::Hero);

        // The directive's SYSTEM entry must be part of the prompt context.
        let request = transport.last_request().unwrap();
        assert!(request.prompt.contains("VOICE: Open your eyes"));

        // A second directive with 15 energy is rejected: no messages, no
        // transport call, no energy change.
        let err = session.direct("Run!").await.unwrap_err();
        assert!(err.is_rejected());
        assert_eq!(session.energy().await, 15);
        assert_eq!(session.messages().await.len(), 3);
        assert_eq!(transport.call_count(), calls_before + 1);

        // Observation restores energy and appends only a HERO entry.
        session.observe().await.unwrap();
        assert_eq!(session.energy().await, 30);
        let messages = session.messages().await;
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[3].sender, Sender::Hero);
        assert_eq!(session.last_status().await, "Walking");
    }

    #[tokio::test]
    async fn test_death_disables_turns_until_restart() {
        let (session, _transport, _dir) = active_session(vec![
            turn_json("The floor gives way beneath me.", true, "Dead"),
            HERO_JSON.to_string(),
        ])
        .await;

        let outcome = session.observe().await.unwrap();
        assert!(matches!(outcome, TurnOutcome::Narrated { hero_died: true, .. }));
        assert_eq!(session.status().await, SessionStatus::HeroDead);

        assert!(session.observe().await.unwrap_err().is_rejected());
        assert!(session.direct("Get up").await.unwrap_err().is_rejected());

        let hero = session.restart().await.unwrap();
        assert_eq!(hero.name, "Aldric");
        let state = session.snapshot().await;
        assert_eq!(state.status, SessionStatus::LocationPreview);
        assert!(state.messages.is_empty());
        assert_eq!(state.energy.value(), 50);
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_spent_energy_and_appends_notice() {
        let (session, _transport, _dir) = active_session(vec![
            "%% static %%".to_string(),
        ])
        .await;

        let outcome = session.direct("Look around").await.unwrap();
        assert_eq!(outcome, TurnOutcome::Disrupted);
        // Cost is not refunded; the player paid to attempt the directive.
        assert_eq!(session.energy().await, 15);

        let messages = session.messages().await;
        assert_eq!(messages.len(), 3); // seed + directive + disruption notice
        assert_eq!(messages[2].sender, Sender::System);
        assert_ne!(messages[2].content, "Look around");
        assert_eq!(session.status().await, SessionStatus::Active);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_turn_in_flight_rejects_new_requests() {
        let transport = Arc::new(GatedTransport {
            gate: Mutex::new(None),
            inner: RecordingTransport::scripted(vec![
                HERO_JSON.to_string(),
                turn_json("I open my eyes to wet stone.", false, "Dazed"),
                turn_json("Nothing speaks. I wait.", false, "Waiting"),
            ]),
        });
        let (config_store, _dir) = store();
        let session = {
            let transport = transport.clone();
            Arc::new(GameSession::new(config_store).with_transport_factory(Box::new(
                move |_: &ApiConfig| transport.clone() as Arc<dyn GenerationTransport>,
            )))
        };
        session.start(config()).await.unwrap();
        session.confirm_location().await.unwrap();

        let (release, held) = tokio::sync::oneshot::channel();
        *transport.gate.lock().unwrap() = Some(held);
        let pending = {
            let session = session.clone();
            tokio::spawn(async move { session.observe().await })
        };
        while !session.is_busy() {
            tokio::task::yield_now().await;
        }

        // The held observation already applied its gain: 50 + 15.
        assert_eq!(session.energy().await, 65);

        // While it is outstanding, everything else is rejected, not
        // queued, and nothing is mutated.
        assert!(session.direct("Run!").await.unwrap_err().is_rejected());
        assert!(session.observe().await.unwrap_err().is_rejected());
        assert!(session.restart().await.unwrap_err().is_rejected());
        assert_eq!(session.energy().await, 65);
        assert_eq!(session.messages().await.len(), 1);

        release.send(()).unwrap();
        let outcome = pending.await.unwrap().unwrap();
        assert!(matches!(outcome, TurnOutcome::Narrated { .. }));
        assert!(!session.is_busy());
        assert_eq!(session.messages().await.len(), 2);
    }

    #[tokio::test]
    async fn test_restart_rejected_before_any_session_exists() {
        let transport = Arc::new(RecordingTransport::new(HERO_JSON));
        let (session, _dir) = session_with(transport);
        assert!(session.restart().await.unwrap_err().is_rejected());
    }

    #[tokio::test]
    async fn test_observe_rejected_in_location_preview() {
        let transport = Arc::new(RecordingTransport::new(HERO_JSON));
        let (session, _dir) = session_with(transport);
        session.start(config()).await.unwrap();
        assert!(session.observe().await.unwrap_err().is_rejected());
        assert!(session.direct("hello").await.unwrap_err().is_rejected());
    }
}
