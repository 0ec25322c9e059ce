//! Per-turn story continuation.
//!
//! Builds a single instruction block from the hero's identity, a bounded
//! window of the conversation log, and either the observer's directive or
//! the silence marker, then asks the backend for a `TurnShape` answer at
//! elevated randomness.

use std::sync::Arc;

use vigil_core::error::Result;
use vigil_core::hero::HeroProfile;
use vigil_core::message::{Message, Sender};
use vigil_core::schema::parse_turn;
use vigil_core::transport::{GenerationRequest, GenerationTransport, ResponseShape};
use vigil_core::turn::TurnResult;

/// How many trailing log entries enter the prompt. Older entries are
/// dropped, not summarized.
pub const HISTORY_WINDOW: usize = 10;

/// Turns are sampled hot to reduce narrative repetition.
pub const TURN_TEMPERATURE: f32 = 1.1;

/// The silence marker. A silent turn must still move the story: the
/// prompt demands new concrete events, because a "nothing happens"
/// answer would stall the narrative.
const SILENT_INSTRUCTION: &str = "THE VOICE IS SILENT. The hero is left to himself. \
Time passes. Advance the plot with a sequence of concrete new events; \
do not restate the hero's current situation.";

/// Builds and runs one continuation turn.
pub struct ContinuationEngine {
    transport: Arc<dyn GenerationTransport>,
    model: String,
}

impl ContinuationEngine {
    pub fn new(transport: Arc<dyn GenerationTransport>, model: impl Into<String>) -> Self {
        Self {
            transport,
            model: model.into(),
        }
    }

    /// Produces the hero's next diary entry.
    ///
    /// `directive` carries the observer's literal words, or `None` for a
    /// passive observation turn. No internal retry; the caller decides
    /// what a failed turn means.
    pub async fn next_turn(
        &self,
        hero: &HeroProfile,
        history: &[Message],
        directive: Option<&str>,
    ) -> Result<TurnResult> {
        let prompt = build_prompt(hero, history, directive);
        tracing::debug!(
            silent = directive.is_none(),
            window = history.len().min(HISTORY_WINDOW),
            "running continuation turn"
        );

        let raw = self
            .transport
            .generate(GenerationRequest {
                model: self.model.clone(),
                prompt,
                temperature: Some(TURN_TEMPERATURE),
                shape: ResponseShape::Turn,
            })
            .await?;

        parse_turn(&raw)
    }
}

/// Renders the trailing log window as alternating VOICE/HERO lines.
fn render_log(history: &[Message]) -> String {
    let start = history.len().saturating_sub(HISTORY_WINDOW);
    history[start..]
        .iter()
        .map(|msg| {
            let speaker = match msg.sender {
                Sender::System => "VOICE",
                Sender::Hero => "HERO",
            };
            format!("{}: {}", speaker, msg.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn build_prompt(hero: &HeroProfile, history: &[Message], directive: Option<&str>) -> String {
    let action = match directive {
        Some(text) => format!("THE VOICE: \"{}\"", text),
        None => SILENT_INSTRUCTION.to_string(),
    };

    format!(
        "You are playing the role of {name}. Archetype: {archetype}. Personality: {personality}.\n\
         The hero writes a diary in the first person.\n\
         CONVERSATION LOG:\n{log}\n\
         CURRENT INSTRUCTION:\n{action}\n\n\
         Return the answer strictly as JSON:\n\
         {{\n  \"diaryEntry\": \"1-3 paragraphs of diary text\",\n  \"isDead\": true/false,\n  \"statusDescription\": \"a short status line\"\n}}",
        name = hero.name,
        archetype = hero.archetype,
        personality = hero.personality,
        log = render_log(history),
        action = action,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use vigil_core::hero::Theme;

    fn test_hero() -> HeroProfile {
        HeroProfile {
            name: "Aldric".into(),
            archetype: "Disgraced Knight".into(),
            personality: "Stubborn".into(),
            origin: "Unknown".into(),
            theme: Theme::Forest,
            location_description: "A pine hollow".into(),
            start_coordinates: "1°2'N, 3°4'E".into(),
        }
    }

    fn log_of(n: usize) -> Vec<Message> {
        (0..n)
            .map(|i| {
                let sender = if i % 2 == 0 { Sender::System } else { Sender::Hero };
                Message::new(sender, format!("entry {}", i))
            })
            .collect()
    }

    const TURN_JSON: &str = r#"{
        "diaryEntry": "The brush parts and something low slips past me.",
        "isDead": false,
        "statusDescription": "Alert"
    }"#;

    #[test]
    fn test_render_log_keeps_only_the_last_ten() {
        let rendered = render_log(&log_of(12));
        assert!(!rendered.contains("entry 0"));
        assert!(!rendered.contains("entry 1"));
        assert!(rendered.contains("entry 2"));
        assert!(rendered.contains("entry 11"));
        assert_eq!(rendered.lines().count(), 10);
    }

    #[test]
    fn test_render_log_labels_speakers() {
        let rendered = render_log(&log_of(2));
        assert_eq!(rendered, "VOICE: entry 0\nHERO: entry 1");
    }

    #[test]
    fn test_directive_branch_embeds_the_literal_text() {
        let prompt = build_prompt(&test_hero(), &[], Some("Open your eyes"));
        assert!(prompt.contains("THE VOICE: \"Open your eyes\""));
        assert!(!prompt.contains("SILENT"));
    }

    #[test]
    fn test_silence_branch_demands_forward_progress() {
        let prompt = build_prompt(&test_hero(), &[], None);
        assert!(prompt.contains("THE VOICE IS SILENT"));
        assert!(prompt.contains("concrete new events"));
    }

    #[tokio::test]
    async fn test_next_turn_runs_hot_and_windows_history() {
        let transport = Arc::new(RecordingTransport::new(TURN_JSON));
        let engine = ContinuationEngine::new(transport.clone(), "gemini-2.5-flash");

        let turn = engine
            .next_turn(&test_hero(), &log_of(12), None)
            .await
            .unwrap();
        assert!(!turn.is_dead);
        assert_eq!(turn.status_description, "Alert");

        let request = transport.last_request().unwrap();
        assert_eq!(request.shape, ResponseShape::Turn);
        assert_eq!(request.temperature, Some(TURN_TEMPERATURE));
        assert!(!request.prompt.contains("entry 1\n"));
        assert!(request.prompt.contains("entry 11"));
    }

    #[tokio::test]
    async fn test_next_turn_rejects_malformed_output() {
        let transport = Arc::new(RecordingTransport::new(
            r#"{"diaryEntry": "x", "isDead": "maybe", "statusDescription": "ok"}"#,
        ));
        let engine = ContinuationEngine::new(transport, "gemini-2.5-flash");
        let err = engine
            .next_turn(&test_hero(), &[], Some("run"))
            .await
            .unwrap_err();
        assert!(err.is_schema_violation());
    }
}
