//! End-to-end turn flow through the public API

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use parking_lot::Mutex;
use vedanta_core::providers::{AttemptLog, ChatProvider, MockBehavior, MockProvider};
use vedanta_core::{
    prompts, ChatContext, Level, Logger, MemoryKeyValueStore, MessageRole, NoOpLogger, ProviderId,
};

struct Harness {
    ctx: ChatContext,
    attempts: AttemptLog,
}

fn harness(entries: Vec<(ProviderId, MockBehavior)>) -> Harness {
    let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
    let attempts: AttemptLog = Arc::new(Mutex::new(Vec::new()));

    let providers: HashMap<ProviderId, Arc<dyn ChatProvider>> = entries
        .into_iter()
        .map(|(id, behavior)| {
            let provider: Arc<dyn ChatProvider> = Arc::new(
                MockProvider::new(id, behavior, Arc::clone(&logger))
                    .with_attempt_log(Arc::clone(&attempts)),
            );
            (id, provider)
        })
        .collect();

    let ctx = ChatContext::with_providers(Arc::new(MemoryKeyValueStore::new()), providers, logger);
    Harness { ctx, attempts }
}

#[tokio::test]
async fn streamed_fragments_concatenate_to_the_transcript_entry() {
    let h = harness(vec![(
        ProviderId::Gemini,
        MockBehavior::Fragments(vec![
            "🙏 Namaste. ".into(),
            "Brahman is ".into(),
            "the unchanging reality.".into(),
        ]),
    )]);
    h.ctx
        .profile()
        .set_api_key(ProviderId::Gemini, "AIza-key")
        .unwrap();

    let session = h.ctx.create_session(Level::Beginner);
    let mut stream = h.ctx.send_turn(&session, "What is Brahman?");

    let mut seen = Vec::new();
    while let Some(fragment) = stream.next().await {
        seen.push(fragment);
    }
    assert_eq!(seen.len(), 3);

    let full: String = seen.concat();
    let visible = session.visible_history();
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[1].role, MessageRole::Assistant);
    assert_eq!(visible[1].content, full);
}

#[tokio::test]
async fn fallback_tries_each_configured_provider_at_most_once() {
    let h = harness(vec![
        (ProviderId::Gemini, MockBehavior::FailToStart("429".into())),
        (ProviderId::Groq, MockBehavior::FailToStart("500".into())),
        (ProviderId::HuggingFace, MockBehavior::FailToStart("timeout".into())),
        (ProviderId::Ollama, MockBehavior::Respond("from the local model".into())),
        (ProviderId::OpenRouter, MockBehavior::Respond("never reached".into())),
    ]);
    let profile = h.ctx.profile();
    profile.set_api_key(ProviderId::Gemini, "AIza-a").unwrap();
    profile.set_api_key(ProviderId::Groq, "gsk_b").unwrap();
    profile.set_api_key(ProviderId::HuggingFace, "hf_c").unwrap();
    profile.set_api_key(ProviderId::OpenRouter, "sk-or-d").unwrap();

    let session = h.ctx.create_session(Level::Intermediate);
    let text = h.ctx.send_turn(&session, "hello").collect_text().await;

    assert_eq!(text, "from the local model");
    assert_eq!(
        *h.attempts.lock(),
        vec![
            ProviderId::Gemini,
            ProviderId::Groq,
            ProviderId::HuggingFace,
            ProviderId::Ollama,
        ]
    );
}

#[tokio::test]
async fn exhausted_fallback_shows_apology_but_keeps_transcript_clean() {
    let h = harness(vec![
        (ProviderId::Gemini, MockBehavior::FailToStart("down".into())),
        (ProviderId::Groq, MockBehavior::FailToStart("down".into())),
    ]);
    let profile = h.ctx.profile();
    profile.set_api_key(ProviderId::Gemini, "AIza-a").unwrap();
    profile.set_api_key(ProviderId::Groq, "gsk_b").unwrap();

    let session = h.ctx.create_session(Level::Advanced);
    let text = h.ctx.send_turn(&session, "anyone there?").collect_text().await;

    assert_eq!(text, prompts::APOLOGY_MESSAGE);
    let visible = session.visible_history();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].role, MessageRole::User);
}

#[tokio::test]
async fn unconfigured_active_provider_short_circuits() {
    let h = harness(vec![
        (ProviderId::Gemini, MockBehavior::Respond("unreachable".into())),
        (ProviderId::Ollama, MockBehavior::Respond("also unreachable".into())),
    ]);

    let session = h.ctx.create_session(Level::Beginner);
    let text = h.ctx.send_turn(&session, "hi").collect_text().await;

    assert_eq!(text, prompts::NOT_CONFIGURED_MESSAGE);
    assert!(h.attempts.lock().is_empty());
}

#[tokio::test]
async fn unreachable_local_provider_falls_through_to_apology() {
    // ollama needs no key, so dispatch is attempted; with no other provider
    // configured the failure exhausts the chain
    let h = harness(vec![
        (ProviderId::Ollama, MockBehavior::FailToStart("connection refused".into())),
        (ProviderId::Gemini, MockBehavior::Respond("unkeyed".into())),
    ]);
    h.ctx.profile().set_active_provider(ProviderId::Ollama).unwrap();
    assert!(h.ctx.has_valid_key());

    let session = h.ctx.create_session(Level::Beginner);
    let text = h.ctx.send_turn(&session, "hello?").collect_text().await;

    assert_eq!(text, prompts::APOLOGY_MESSAGE);
    assert_eq!(*h.attempts.lock(), vec![ProviderId::Ollama]);
    assert_eq!(session.visible_history().len(), 1);
}

#[tokio::test]
async fn multi_turn_transcript_alternates_in_order() {
    let h = harness(vec![(
        ProviderId::Groq,
        MockBehavior::Respond("a reply".into()),
    )]);
    let profile = h.ctx.profile();
    profile.set_active_provider(ProviderId::Groq).unwrap();
    profile.set_api_key(ProviderId::Groq, "gsk_a").unwrap();

    let session = h.ctx.create_session(Level::Intermediate);
    h.ctx.send_turn(&session, "first question").collect_text().await;
    h.ctx.send_turn(&session, "second question").collect_text().await;

    let roles: Vec<MessageRole> = session.transcript().iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![
            MessageRole::System,
            MessageRole::User,
            MessageRole::Assistant,
            MessageRole::User,
            MessageRole::Assistant,
        ]
    );
}

#[tokio::test]
async fn dropping_the_stream_cancels_and_skips_fallback() {
    let logger: Arc<dyn Logger> = Arc::new(NoOpLogger);
    let attempts: AttemptLog = Arc::new(Mutex::new(Vec::new()));

    let mut providers: HashMap<ProviderId, Arc<dyn ChatProvider>> = HashMap::new();
    providers.insert(
        ProviderId::Gemini,
        Arc::new(
            MockProvider::new(
                ProviderId::Gemini,
                MockBehavior::Fragments(vec!["one ".into(), "two ".into(), "three".into()]),
                Arc::clone(&logger),
            )
            .with_attempt_log(Arc::clone(&attempts))
            .with_fragment_delay(Duration::from_millis(40)),
        ),
    );
    providers.insert(
        ProviderId::Groq,
        Arc::new(
            MockProvider::new(
                ProviderId::Groq,
                MockBehavior::Respond("fallback".into()),
                Arc::clone(&logger),
            )
            .with_attempt_log(Arc::clone(&attempts)),
        ),
    );

    let ctx = ChatContext::with_providers(Arc::new(MemoryKeyValueStore::new()), providers, logger);
    ctx.profile().set_api_key(ProviderId::Gemini, "AIza-a").unwrap();
    ctx.profile().set_api_key(ProviderId::Groq, "gsk_b").unwrap();

    let session = ctx.create_session(Level::Beginner);
    let mut stream = ctx.send_turn(&session, "long question");
    assert_eq!(stream.next().await.as_deref(), Some("one "));
    drop(stream);

    tokio::time::sleep(Duration::from_millis(200)).await;

    // no assistant entry, and no second provider attempted
    assert_eq!(session.visible_history().len(), 1);
    assert_eq!(*attempts.lock(), vec![ProviderId::Gemini]);
}

#[tokio::test]
async fn key_validation_flows_through_the_context() {
    let h = harness(vec![(
        ProviderId::Groq,
        MockBehavior::Respond("Test successful.".into()),
    )]);

    assert!(h.ctx.test_key(ProviderId::Groq, "gsk_valid").await);
    assert!(!h.ctx.test_key(ProviderId::Groq, "wrong-prefix").await);

    h.ctx.set_api_key(ProviderId::Groq, "gsk_valid").unwrap();
    h.ctx.profile().set_active_provider(ProviderId::Groq).unwrap();
    assert!(h.ctx.has_valid_key());
}
