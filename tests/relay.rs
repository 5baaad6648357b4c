//! Message routing: greeting, direction selection and text translation.

mod support;

use support::*;
use voice_relay::language::{Direction, Language};
use voice_relay::messages;
use voice_relay::transport::{ChatId, Keyboard};
use voice_relay::{IncomingMessage, MessageKind, Relay, RelayAction, Transcription, TranslationOutcome, UserId, VoiceNote};

fn text(user: i64, body: &str) -> IncomingMessage {
    IncomingMessage {
        user: UserId(user),
        chat: ChatId(user),
        kind: MessageKind::Text(body.to_string()),
    }
}

fn relay_with(translator: &std::sync::Arc<ScriptedTranslator>) -> (Relay, Harness) {
    // The harness keeps the shared fakes; the relay gets its own pipeline
    // over the same transport and direction store.
    let h = Harness::new(
        RecordingTransport::default(),
        false,
        Transcription::Recognized("hello".into()),
        chain(&[translator]),
    );
    let pipeline = voice_relay::VoicePipeline::builder()
        .directions(h.directions.clone())
        .transport(h.transport.clone())
        .scratch(voice_relay::scratch::ScratchDir::new(h.scratch.clone()))
        .converter(std::sync::Arc::new(FakeConverter { fail: false }))
        .recognizer(h.recognizer.clone())
        .translator(chain(&[translator]))
        .build()
        .unwrap();
    (Relay::new(pipeline), h)
}

#[tokio::test]
async fn start_greets_with_direction_keyboard() {
    let t = ScriptedTranslator::new("T", Reply::Echo);
    let (relay, h) = relay_with(&t);

    let action = relay.handle(text(1, "/start")).await;

    assert_eq!(action, RelayAction::Greeted);
    let sent = h.transport.last().unwrap();
    assert_eq!(sent.text, messages::GREETING);
    assert_eq!(sent.keyboard, Some(Keyboard::directions()));
}

#[tokio::test]
async fn selecting_a_label_stores_direction() {
    let t = ScriptedTranslator::new("T", Reply::Echo);
    let (relay, h) = relay_with(&t);
    let direction = Direction::new(Language::Uz, Language::Ru);

    let action = relay.handle(text(7, &direction.label())).await;

    assert_eq!(action, RelayAction::DirectionSelected(direction));
    assert_eq!(h.directions.get(UserId(7)), Some(direction));
    assert_eq!(h.directions.get(UserId(8)), None);
    assert_eq!(
        h.transport.last().map(|s| s.text),
        Some(messages::direction_selected(&direction.label()))
    );
}

#[tokio::test]
async fn latest_selection_wins() {
    let t = ScriptedTranslator::new("T", Reply::Echo);
    let (relay, h) = relay_with(&t);
    let first = Direction::new(Language::En, Language::Ru);
    let second = Direction::new(Language::Ru, Language::Uz);

    relay.handle(text(3, &first.label())).await;
    relay.handle(text(3, &second.label())).await;

    assert_eq!(h.directions.get(UserId(3)), Some(second));
}

#[tokio::test]
async fn text_without_direction_prompts_for_one() {
    let t = ScriptedTranslator::new("T", Reply::Echo);
    let (relay, h) = relay_with(&t);

    let action = relay.handle(text(5, "salom dunyo")).await;

    assert_eq!(action, RelayAction::DirectionMissing);
    let sent = h.transport.last().unwrap();
    assert_eq!(sent.text, messages::SELECT_DIRECTION_FOR_TEXT);
    assert_eq!(sent.keyboard, Some(Keyboard::directions()));
    assert_eq!(t.calls(), 0);
}

#[tokio::test]
async fn text_is_translated_with_selected_direction() {
    let t = ScriptedTranslator::new("T", Reply::Fixed("hello world"));
    let (relay, h) = relay_with(&t);
    h.directions.set(UserId(5), Direction::new(Language::Uz, Language::En));

    let action = relay.handle(text(5, "  salom dunyo ")).await;

    assert_eq!(
        action,
        RelayAction::TextTranslated(TranslationOutcome::Translated {
            text: "hello world".into(),
            provider: "T".into(),
        })
    );
    assert_eq!(
        h.transport.last().map(|s| s.text),
        Some(messages::translation("T", "hello world"))
    );
}

#[tokio::test]
async fn voice_is_routed_to_pipeline() {
    let t = ScriptedTranslator::new("T", Reply::Echo);
    let (relay, h) = relay_with(&t);
    h.directions.set(UserId(9), Direction::new(Language::En, Language::Ru));

    let action = relay
        .handle(IncomingMessage {
            user: UserId(9),
            chat: ChatId(9),
            kind: MessageKind::Voice(VoiceNote {
                file_id: "voice-9".into(),
                duration_secs: None,
            }),
        })
        .await;

    match action {
        RelayAction::Voice(report) => assert_eq!(report.transcript.as_deref(), Some("hello")),
        other => panic!("unexpected action: {:?}", other),
    }
    assert_eq!(t.calls(), 1);
    assert_eq!(file_count(&h.scratch), 0);
}

#[tokio::test]
async fn unsupported_messages_are_ignored() {
    let t = ScriptedTranslator::new("T", Reply::Echo);
    let (relay, h) = relay_with(&t);

    let action = relay
        .handle(IncomingMessage {
            user: UserId(1),
            chat: ChatId(1),
            kind: MessageKind::Other,
        })
        .await;

    assert_eq!(action, RelayAction::Ignored);
    assert!(h.transport.texts().is_empty());
}
