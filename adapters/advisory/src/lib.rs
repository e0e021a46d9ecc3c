#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Advisory adapter that asks a text generator for a one-sentence tip.
//!
//! The [`Advisor`] turns a game-state summary into a prompt and always
//! answers with displayable text: provider failures are logged and replaced by
//! fixed fallback lines. [`AdvisoryBridge`] runs the advisor off the tick loop
//! and hands the result back through non-blocking polling.

mod bridge;
mod gemini;

use lawn_defense_core::{LawnView, PlantKind, ZombieKind};
use tracing::{debug, warn};

pub use bridge::AdvisoryBridge;
pub use gemini::{GeminiClient, DEFAULT_MODEL};

/// Text returned when no API key is configured.
pub const MISSING_KEY_FALLBACK: &str = "Mumble mumble... (Missing API Key!)";
/// Text returned when the provider request fails.
pub const REQUEST_FAILED_FALLBACK: &str = "Brains...? No, wait, plants! (AI Error)";
/// Text returned when the provider answers with nothing.
pub const EMPTY_REPLY_FALLBACK: &str = "Wibble wobble! Plant more!";

/// Errors raised while requesting advice.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// No credentials were configured for the provider.
    #[error("no API key configured")]
    MissingApiKey,
    /// The provider could not be reached or rejected the request.
    #[error("advisory request failed: {0}")]
    Request(String),
    /// The provider answered with a body that could not be decoded.
    #[error("malformed advisory response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The background runtime could not be started.
    #[error("failed to start advisory runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Provider capable of turning a prompt into free-form text.
pub trait TextGenerator: Send + Sync {
    /// Generates text for the prompt. Blocks until the provider answers.
    fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

/// Summary of the game state handed to the text generator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdvisoryRequest {
    /// Sun available to spend.
    pub sun: u32,
    /// Kinds of every plant on the lawn, in identifier order.
    pub plants: Vec<PlantKind>,
    /// Kinds of every zombie on the lawn, in identifier order.
    pub zombies: Vec<ZombieKind>,
}

impl AdvisoryRequest {
    /// Summarises a lawn view.
    #[must_use]
    pub fn from_view(view: &LawnView) -> Self {
        Self {
            sun: view.sun,
            plants: view.plants.iter().map(|plant| plant.kind).collect(),
            zombies: view.zombies.iter().map(|zombie| zombie.kind).collect(),
        }
    }

    /// Formats the prompt sent to the text generator.
    #[must_use]
    pub fn prompt(&self) -> String {
        let plants = join_or_none(self.plants.iter().map(|kind| kind.name()));
        let zombies = join_or_none(self.zombies.iter().map(|kind| kind.name()));
        let seeds = PlantKind::ALL
            .iter()
            .map(|kind| format!("{} ({} sun): {}", kind.name(), kind.cost(), kind.description()))
            .collect::<Vec<_>>()
            .join("; ");

        format!(
            "You are the eccentric neighbour who sells seeds in a lawn defense game \
             where plants hold off zombies.\n\
             Speak in a chaotic, slightly nonsensical but helpful style.\n\
             \n\
             Current game state:\n\
             - Sun available: {sun}\n\
             - Plants on the lawn: {plants}\n\
             - Zombies attacking: {zombies}\n\
             - Available seeds: {seeds}\n\
             \n\
             Give ONE sentence with a strategic tip on what to plant next or how to survive.\n\
             Keep it short and crazy.",
            sun = self.sun,
        )
    }
}

fn join_or_none<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let joined = names.collect::<Vec<_>>().join(", ");
    if joined.is_empty() {
        "None".to_owned()
    } else {
        joined
    }
}

/// Produces advice text, substituting fallbacks for every failure.
pub struct Advisor {
    generator: Option<Box<dyn TextGenerator>>,
}

impl Advisor {
    /// Creates an advisor backed by the provided generator.
    #[must_use]
    pub fn new(generator: impl TextGenerator + 'static) -> Self {
        Self {
            generator: Some(Box::new(generator)),
        }
    }

    /// Creates an advisor that has no credentials and always falls back.
    #[must_use]
    pub fn without_credentials() -> Self {
        Self { generator: None }
    }

    /// Creates an advisor talking to the hosted model when a non-empty key is
    /// provided.
    #[must_use]
    pub fn from_api_key(api_key: Option<String>, model: &str) -> Self {
        match api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => Self::new(GeminiClient::new(key, model)),
            None => Self::without_credentials(),
        }
    }

    /// Reports whether a generator is configured.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        self.generator.is_some()
    }

    /// Asks for a tip. Never fails; errors are logged and replaced.
    #[must_use]
    pub fn advise(&self, request: &AdvisoryRequest) -> String {
        let Some(generator) = self.generator.as_ref() else {
            warn!("advisory requested without an api key");
            return MISSING_KEY_FALLBACK.to_owned();
        };

        debug!(sun = request.sun, plants = request.plants.len(), "requesting advice");
        match generator.generate(&request.prompt()) {
            Ok(text) if text.trim().is_empty() => EMPTY_REPLY_FALLBACK.to_owned(),
            Ok(text) => text.trim().to_owned(),
            Err(AdvisoryError::MissingApiKey) => {
                warn!("advisory provider has no api key");
                MISSING_KEY_FALLBACK.to_owned()
            }
            Err(error) => {
                warn!(%error, "advisory provider failed");
                REQUEST_FAILED_FALLBACK.to_owned()
            }
        }
    }
}

impl std::fmt::Debug for Advisor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Advisor")
            .field("has_credentials", &self.has_credentials())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    struct Canned(Result<&'static str, fn() -> AdvisoryError>);

    impl TextGenerator for Canned {
        fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
            assert!(prompt.contains("Sun available"));
            self.0.map(str::to_owned).map_err(|error| error())
        }
    }

    fn request() -> AdvisoryRequest {
        AdvisoryRequest {
            sun: 75,
            plants: vec![PlantKind::Sunflower, PlantKind::Peashooter],
            zombies: vec![],
        }
    }

    #[test]
    fn prompt_summarises_state_and_catalog() {
        let prompt = request().prompt();

        assert!(prompt.contains("Sun available: 75"));
        assert!(prompt.contains("Plants on the lawn: Sunflower, Peashooter"));
        assert!(prompt.contains("Zombies attacking: None"));
        assert!(prompt.contains("Repeater (200 sun): Shoots two peas at a time"));
        assert!(prompt.contains("Wall-nut (50 sun): Blocks zombies with high health"));
    }

    #[test]
    fn missing_credentials_fall_back_without_calling_out() {
        let advisor = Advisor::from_api_key(Some("   ".to_owned()), DEFAULT_MODEL);

        assert!(!advisor.has_credentials());
        assert_eq!(advisor.advise(&request()), MISSING_KEY_FALLBACK);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, bytes: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .expect("log buffer poisoned")
                .extend_from_slice(bytes);
            Ok(bytes.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn missing_credentials_are_logged() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let advice = tracing::subscriber::with_default(subscriber, || {
            Advisor::without_credentials().advise(&request())
        });

        assert_eq!(advice, MISSING_KEY_FALLBACK);
        let output = String::from_utf8(log.0.lock().expect("log buffer poisoned").clone())
            .expect("utf-8 log output");
        assert!(output.contains("WARN"), "log output: {output}");
        assert!(output.contains("without an api key"), "log output: {output}");
    }

    #[test]
    fn failures_and_empty_replies_use_distinct_fallbacks() {
        let failing = Advisor::new(Canned(Err(|| AdvisoryError::Request("timeout".into()))));
        let silent = Advisor::new(Canned(Ok("  \n")));
        let chatty = Advisor::new(Canned(Ok(" Plant sunflowers first! \n")));

        assert_eq!(failing.advise(&request()), REQUEST_FAILED_FALLBACK);
        assert_eq!(silent.advise(&request()), EMPTY_REPLY_FALLBACK);
        assert_eq!(chatty.advise(&request()), "Plant sunflowers first!");
    }
}
