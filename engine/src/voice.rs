use crate::engine::SearchEngine;
use crate::query::SearchQuery;
use crate::response::SearchResponse;
use thiserror::Error;

/// Outcome of a speech-recognition attempt.
#[derive(Debug, Clone)]
pub struct Transcript {
    pub text: String,
    /// Provider-reported confidence in [0, 1].
    pub confidence: f32,
}

#[derive(Debug, Error)]
pub enum VoiceSearchError {
    #[error("speech recognition is not available on this platform")]
    Unsupported,
    #[error("speech recognition failed: {0}")]
    Recognition(String),
}

/// Platform capability the voice adapter depends on. The engine never
/// touches a speech API directly; tests plug in a canned recognizer.
pub trait SpeechRecognizer {
    fn start_listening(&self) -> Result<Transcript, VoiceSearchError>;
}

#[derive(Debug, Clone)]
pub struct VoiceSearchResult {
    pub transcript: Transcript,
    pub response: SearchResponse,
}

/// Bridges a recognizer to the normal text search path. This is the
/// only non-text entry point into the engine.
pub struct VoiceSearch<R: SpeechRecognizer> {
    recognizer: R,
}

impl<R: SpeechRecognizer> VoiceSearch<R> {
    pub fn new(recognizer: R) -> Self {
        Self { recognizer }
    }

    pub fn start(&self, engine: &SearchEngine) -> Result<VoiceSearchResult, VoiceSearchError> {
        let transcript = self.recognizer.start_listening()?;
        tracing::info!(
            text = %transcript.text,
            confidence = transcript.confidence,
            "voice transcript received"
        );
        let query = SearchQuery::text(transcript.text.clone());
        let response = engine.search(&query);
        Ok(VoiceSearchResult { transcript, response })
    }
}
