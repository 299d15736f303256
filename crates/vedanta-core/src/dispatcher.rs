//! Turn dispatch with automatic provider fallback
//!
//! A turn runs as a spawned task that feeds fragments through a channel. The
//! consumer sees one `TurnStream` of plain text regardless of which provider
//! ultimately answered; dropping the stream cancels the turn.

use std::collections::HashMap;
use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;

use crate::logging::Logger;
use crate::prompts;
use crate::providers::{ChatProvider, ProviderError};
use crate::registry::{self, ProviderId};
use crate::session::ChatSession;
use crate::store::ProfileStore;
use crate::types::CancellationToken;

/// Text fragments for one assistant turn
///
/// Never yields errors: provider failures are absorbed by fallback, and the
/// worst case is a stream carrying a single apology message. Dropping the
/// stream cancels the in-flight request and leaves the transcript without an
/// assistant entry for this turn.
pub struct TurnStream {
    rx: mpsc::UnboundedReceiver<String>,
    cancel: CancellationToken,
}

impl TurnStream {
    /// Drain the stream into one string
    pub async fn collect_text(mut self) -> String {
        let mut text = String::new();
        while let Some(fragment) = self.rx.recv().await {
            text.push_str(&fragment);
        }
        text
    }
}

impl Stream for TurnStream {
    type Item = String;

    fn poll_next(
        mut self: std::pin::Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for TurnStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Runs turns against the provider set, falling back in catalog order
pub struct Dispatcher {
    providers: HashMap<ProviderId, Arc<dyn ChatProvider>>,
    profile: ProfileStore,
    logger: Arc<dyn Logger>,
}

impl Dispatcher {
    pub fn new(
        providers: HashMap<ProviderId, Arc<dyn ChatProvider>>,
        profile: ProfileStore,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            providers,
            profile,
            logger,
        }
    }

    /// Append the user turn and stream the assistant's reply.
    ///
    /// The session's own provider goes first with the session's model; on
    /// failure before any output, the remaining catalog providers are tried
    /// once each in order, with their own stored keys and selected models.
    /// A provider that requires a key it does not have is skipped without
    /// network activity. If every candidate fails, the stream carries an
    /// apology message that is not recorded in the transcript.
    pub fn send_turn(&self, session: &ChatSession, user_text: &str) -> TurnStream {
        session.push_user(user_text);

        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        // active provider not configured: fixed guidance, no network, no
        // fallback
        let active = session.provider();
        let active_info = registry::provider(active);
        if active_info.requires_key && !self.profile.has_key_for(active) {
            self.logger.warn(&format!(
                "provider {} has no key configured, skipping dispatch",
                active
            ));
            let _ = tx.send(prompts::NOT_CONFIGURED_MESSAGE.to_string());
            return TurnStream { rx, cancel };
        }

        let candidates = self.candidates(session);
        let transcript = session.transcript();
        let session = session.clone();
        let logger = Arc::clone(&self.logger);
        let token = cancel.clone();

        tokio::spawn(async move {
            let mut any_succeeded = false;

            for (provider, model, api_key) in candidates {
                if token.is_cancelled() {
                    return;
                }

                let id = provider.id();
                logger.debug(&format!("dispatching turn to {} ({})", id, model));

                let stream = match provider
                    .stream_chat(transcript.clone(), &model, api_key.as_deref(), token.clone())
                    .await
                {
                    Ok(stream) => stream,
                    Err(e) => {
                        logger.warn(&format!("{} failed to start: {}", id, e));
                        continue;
                    }
                };

                let mut stream = stream;
                let mut assembled = String::new();
                let mut failed: Option<ProviderError> = None;

                while let Some(item) = stream.next().await {
                    match item {
                        Ok(fragment) => {
                            if fragment.is_empty() {
                                continue;
                            }
                            assembled.push_str(&fragment);
                            if tx.send(fragment).is_err() {
                                // consumer gone; do not record a partial turn
                                token.cancel();
                                return;
                            }
                        }
                        Err(e) => {
                            failed = Some(e);
                            break;
                        }
                    }
                }

                match failed {
                    None => {
                        session.push_assistant(assembled);
                        any_succeeded = true;
                        break;
                    }
                    Some(ProviderError::Cancelled) => {
                        logger.debug(&format!("{} cancelled mid-stream", id));
                        return;
                    }
                    Some(e) if assembled.is_empty() => {
                        // nothing reached the consumer; next candidate
                        logger.warn(&format!("{} failed before output: {}", id, e));
                        continue;
                    }
                    Some(e) => {
                        // partial output already shown; keep it, stop here
                        logger.error(&format!("{} failed mid-stream: {}", id, e));
                        session.push_assistant(assembled);
                        any_succeeded = true;
                        break;
                    }
                }
            }

            if !any_succeeded && !token.is_cancelled() {
                let _ = tx.send(prompts::APOLOGY_MESSAGE.to_string());
            }
        });

        TurnStream { rx, cancel }
    }

    /// Fallback order: the session's provider first, then the rest of the
    /// catalog, each at most once. Hosted providers without a stored key are
    /// excluded outright.
    fn candidates(
        &self,
        session: &ChatSession,
    ) -> Vec<(Arc<dyn ChatProvider>, String, Option<String>)> {
        let active = session.provider();
        let mut out = Vec::new();

        if let Some(provider) = self.providers.get(&active) {
            out.push((
                Arc::clone(provider),
                session.model().to_string(),
                self.profile.api_key(active),
            ));
        }

        for info in registry::all() {
            if info.id == active {
                continue;
            }
            let key = self.profile.api_key(info.id);
            if info.requires_key && key.is_none() {
                continue;
            }
            if let Some(provider) = self.providers.get(&info.id) {
                out.push((
                    Arc::clone(provider),
                    self.profile.selected_model(info.id),
                    key,
                ));
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use crate::providers::{AttemptLog, MockBehavior, MockProvider};
    use crate::session::Level;
    use crate::store::MemoryKeyValueStore;
    use parking_lot::Mutex;

    fn dispatcher_with(
        entries: Vec<(ProviderId, MockBehavior)>,
        log: AttemptLog,
    ) -> (Dispatcher, ProfileStore) {
        let backend = Arc::new(MemoryKeyValueStore::new());
        let profile = ProfileStore::new(backend);
        let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);

        let mut providers: HashMap<ProviderId, Arc<dyn ChatProvider>> = HashMap::new();
        for (id, behavior) in entries {
            providers.insert(
                id,
                Arc::new(
                    MockProvider::new(id, behavior, Arc::clone(&logger))
                        .with_attempt_log(Arc::clone(&log)),
                ),
            );
        }

        (
            Dispatcher::new(providers, profile.clone(), logger),
            profile,
        )
    }

    fn attempt_log() -> AttemptLog {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[tokio::test]
    async fn test_happy_path_appends_assistant_turn() {
        let log = attempt_log();
        let (dispatcher, profile) = dispatcher_with(
            vec![(
                ProviderId::Gemini,
                MockBehavior::Respond("🙏 Namaste, seeker.".into()),
            )],
            log,
        );
        profile.set_api_key(ProviderId::Gemini, "AIza-test").unwrap();

        let session = ChatSession::new(ProviderId::Gemini, "gemini-2.0-flash-exp", Level::Beginner);
        let text = dispatcher
            .send_turn(&session, "Who am I?")
            .collect_text()
            .await;

        assert_eq!(text, "🙏 Namaste, seeker.");
        let visible = session.visible_history();
        assert_eq!(visible.len(), 2);
        assert_eq!(visible[1].content, text);
    }

    #[tokio::test]
    async fn test_missing_key_yields_guidance_without_dispatch() {
        let log = attempt_log();
        let (dispatcher, _profile) = dispatcher_with(
            vec![(
                ProviderId::Gemini,
                MockBehavior::Respond("should never be reached".into()),
            )],
            Arc::clone(&log),
        );

        let session = ChatSession::new(ProviderId::Gemini, "gemini-2.0-flash-exp", Level::Beginner);
        let text = dispatcher
            .send_turn(&session, "Who am I?")
            .collect_text()
            .await;

        assert_eq!(text, prompts::NOT_CONFIGURED_MESSAGE);
        assert!(log.lock().is_empty());
        // the user turn is still recorded
        let visible = session.visible_history();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].content, "Who am I?");
    }

    #[tokio::test]
    async fn test_fallback_walks_catalog_order() {
        let log = attempt_log();
        let (dispatcher, profile) = dispatcher_with(
            vec![
                (
                    ProviderId::Gemini,
                    MockBehavior::FailToStart("quota exceeded".into()),
                ),
                (
                    ProviderId::Groq,
                    MockBehavior::FailToStart("rate limited".into()),
                ),
                (
                    ProviderId::HuggingFace,
                    MockBehavior::Respond("the answer".into()),
                ),
            ],
            Arc::clone(&log),
        );
        profile.set_api_key(ProviderId::Gemini, "AIza-a").unwrap();
        profile.set_api_key(ProviderId::Groq, "gsk_b").unwrap();
        profile.set_api_key(ProviderId::HuggingFace, "hf_c").unwrap();

        let session = ChatSession::new(ProviderId::Gemini, "gemini-2.0-flash-exp", Level::Beginner);
        let text = dispatcher
            .send_turn(&session, "q")
            .collect_text()
            .await;

        assert_eq!(text, "the answer");
        assert_eq!(
            *log.lock(),
            vec![ProviderId::Gemini, ProviderId::Groq, ProviderId::HuggingFace]
        );
    }

    #[tokio::test]
    async fn test_fallback_skips_unconfigured_providers() {
        let log = attempt_log();
        let (dispatcher, profile) = dispatcher_with(
            vec![
                (
                    ProviderId::Gemini,
                    MockBehavior::FailToStart("down".into()),
                ),
                (
                    ProviderId::Groq,
                    MockBehavior::Respond("never keyed".into()),
                ),
                (ProviderId::Ollama, MockBehavior::Respond("local ok".into())),
            ],
            Arc::clone(&log),
        );
        // only the active provider has a key; groq must be skipped, ollama
        // needs none
        profile.set_api_key(ProviderId::Gemini, "AIza-a").unwrap();

        let session = ChatSession::new(ProviderId::Gemini, "gemini-2.0-flash-exp", Level::Beginner);
        let text = dispatcher
            .send_turn(&session, "q")
            .collect_text()
            .await;

        assert_eq!(text, "local ok");
        assert_eq!(*log.lock(), vec![ProviderId::Gemini, ProviderId::Ollama]);
    }

    #[tokio::test]
    async fn test_all_failed_yields_apology_outside_transcript() {
        let log = attempt_log();
        let (dispatcher, profile) = dispatcher_with(
            vec![(
                ProviderId::Gemini,
                MockBehavior::FailToStart("down".into()),
            )],
            log,
        );
        profile.set_api_key(ProviderId::Gemini, "AIza-a").unwrap();

        let session = ChatSession::new(ProviderId::Gemini, "gemini-2.0-flash-exp", Level::Beginner);
        let text = dispatcher
            .send_turn(&session, "q")
            .collect_text()
            .await;

        assert_eq!(text, prompts::APOLOGY_MESSAGE);
        // apology is display-only: no assistant entry
        let visible = session.visible_history();
        assert_eq!(visible.len(), 1);
    }

    #[tokio::test]
    async fn test_partial_output_then_failure_keeps_partial_and_stops() {
        let log = attempt_log();
        let (dispatcher, profile) = dispatcher_with(
            vec![
                (
                    ProviderId::Gemini,
                    MockBehavior::FailAfter {
                        fragments: vec!["The Self ".into(), "is ".into()],
                        message: "connection reset".into(),
                    },
                ),
                (
                    ProviderId::Groq,
                    MockBehavior::Respond("should not run".into()),
                ),
            ],
            Arc::clone(&log),
        );
        profile.set_api_key(ProviderId::Gemini, "AIza-a").unwrap();
        profile.set_api_key(ProviderId::Groq, "gsk_b").unwrap();

        let session = ChatSession::new(ProviderId::Gemini, "gemini-2.0-flash-exp", Level::Beginner);
        let text = dispatcher
            .send_turn(&session, "q")
            .collect_text()
            .await;

        assert_eq!(text, "The Self is ");
        assert_eq!(*log.lock(), vec![ProviderId::Gemini]);
        let visible = session.visible_history();
        assert_eq!(visible[1].content, "The Self is ");
    }

    #[tokio::test]
    async fn test_dropping_stream_cancels_without_assistant_entry() {
        let profile = ProfileStore::new(Arc::new(MemoryKeyValueStore::new()));
        profile.set_api_key(ProviderId::Gemini, "AIza-a").unwrap();

        let mut providers: HashMap<ProviderId, Arc<dyn ChatProvider>> = HashMap::new();
        providers.insert(
            ProviderId::Gemini,
            Arc::new(
                MockProvider::new(
                    ProviderId::Gemini,
                    MockBehavior::Fragments(vec!["a".into(), "b".into(), "c".into()]),
                    Arc::new(NoOpLogger),
                )
                .with_fragment_delay(std::time::Duration::from_millis(50)),
            ),
        );
        let dispatcher = Dispatcher::new(providers, profile, Arc::new(NoOpLogger));

        let session = ChatSession::new(ProviderId::Gemini, "gemini-2.0-flash-exp", Level::Beginner);
        let mut stream = dispatcher.send_turn(&session, "q");
        let first = stream.next().await;
        assert_eq!(first.as_deref(), Some("a"));
        drop(stream);

        // give the worker time to observe the closed channel
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        // user turn recorded, no assistant turn
        let visible = session.visible_history();
        assert_eq!(visible.len(), 1);
    }

    #[tokio::test]
    async fn test_transcript_order_across_two_turns() {
        let log = attempt_log();
        let (dispatcher, profile) = dispatcher_with(
            vec![(ProviderId::Groq, MockBehavior::Respond("reply".into()))],
            log,
        );
        profile.set_api_key(ProviderId::Groq, "gsk_a").unwrap();

        let session = ChatSession::new(ProviderId::Groq, "llama-3.3-70b-versatile", Level::Advanced);
        dispatcher.send_turn(&session, "first").collect_text().await;
        dispatcher.send_turn(&session, "second").collect_text().await;

        let contents: Vec<String> = session
            .visible_history()
            .into_iter()
            .map(|m| m.content)
            .collect();
        assert_eq!(contents, vec!["first", "reply", "second", "reply"]);
    }
}
