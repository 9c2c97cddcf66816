// Active session controller tests - optimistic update and reconciliation

use crate::client::{ChatClient, ChatError, ChatReply, EmotionScore, SarcasmVerdict};
use crate::controller::SessionController;
use crate::sentiment::{ERROR_LABEL, NEUTRAL_LABEL};
use crate::session::{Role, SessionStore};

fn new_controller() -> SessionController {
    SessionController::new(SessionStore::new())
}

fn joy_reply(response: &str) -> ChatReply {
    ChatReply {
        response: response.to_string(),
        sarcasm: SarcasmVerdict {
            sarcastic: false,
            reason: String::new(),
        },
        emotion: EmotionScore {
            label: "joy".to_string(),
            confidence: 91.0,
        },
    }
}

#[test]
fn test_create_conversation_becomes_active() {
    let mut controller = new_controller();
    let id = controller.create_conversation();

    assert_eq!(controller.active_conversation_id(), Some(id.as_str()));
    assert!(controller.working_messages().is_empty());
    assert_eq!(controller.conversations().len(), 1);
    assert!(!controller.busy());
}

#[test]
fn test_update_input_requires_active_session() {
    let mut controller = new_controller();

    // No conversation open: typing goes nowhere
    controller.update_input("hello");
    assert_eq!(controller.input(), "");

    controller.create_conversation();
    controller.update_input("hello");
    assert_eq!(controller.input(), "hello");
}

#[test]
fn test_begin_submission_rejects_blank_input() {
    let mut controller = new_controller();
    controller.create_conversation();

    assert!(controller.begin_submission().is_none());

    controller.update_input("   ");
    assert!(controller.begin_submission().is_none());

    // Nothing changed in the store
    assert!(controller.conversations()[0].messages.is_empty());
}

#[test]
fn test_begin_submission_rejects_without_active_session() {
    let mut controller = new_controller();
    assert!(controller.begin_submission().is_none());
}

#[test]
fn test_begin_submission_is_optimistic() {
    let mut controller = new_controller();
    let id = controller.create_conversation();
    controller.update_input("hello");

    let submission = controller.begin_submission().expect("submission");

    assert_eq!(submission.conversation_id, id);
    assert_eq!(submission.message, "hello");
    assert!(submission.history.is_empty());

    // Synchronously visible before any network response: the stored
    // history already carries the pending user message.
    let stored = controller.store().get(&id).unwrap();
    assert_eq!(stored.messages.len(), 1);
    assert!(stored.messages[0].is_pending());
    assert_eq!(stored.overall_sentiment, NEUTRAL_LABEL);

    assert_eq!(controller.input(), "");
    assert!(controller.busy());
}

#[test]
fn test_begin_submission_rejects_while_busy() {
    let mut controller = new_controller();
    controller.create_conversation();
    controller.update_input("first");
    let _submission = controller.begin_submission().expect("submission");

    controller.update_input("second");
    assert!(controller.begin_submission().is_none());
}

#[test]
fn test_history_snapshot_excludes_submitted_message() {
    let mut controller = new_controller();
    let id = controller.create_conversation();

    controller.update_input("hello");
    let first = controller.begin_submission().unwrap();
    controller.resolve_submission(first, &joy_reply("hi"));

    controller.update_input("how are you");
    let second = controller.begin_submission().unwrap();

    assert_eq!(second.history.len(), 2);
    assert_eq!(second.history[0].role, Role::User);
    assert_eq!(second.history[0].content, "hello");
    assert_eq!(second.history[1].role, Role::Assistant);
    assert_eq!(second.history[1].content, "hi");

    // Store has three messages by now: two user turns and one reply
    assert_eq!(controller.store().get(&id).unwrap().messages.len(), 3);
}

#[test]
fn test_resolve_submission_reconciles_into_store() {
    let mut controller = new_controller();
    let id = controller.create_conversation();
    controller.update_input("hello");
    let submission = controller.begin_submission().unwrap();

    controller.resolve_submission(submission, &joy_reply("hi"));

    let stored = controller.store().get(&id).unwrap();
    assert_eq!(stored.messages.len(), 2);

    let user = &stored.messages[0];
    let annotation = user.sentiment.as_ref().unwrap();
    assert!(!annotation.pending);
    assert_eq!(annotation.emotion_label, "joy");
    assert_eq!(annotation.emotion_confidence, 91.0);

    let assistant = &stored.messages[1];
    assert_eq!(assistant.role, Role::Assistant);
    assert_eq!(assistant.content, "hi");

    assert_eq!(stored.overall_sentiment, "joy");
    assert!(!controller.busy());

    // Working copy was refreshed too
    assert_eq!(controller.working_messages().len(), 2);
}

#[test]
fn test_fail_submission_degrades_annotation() {
    let mut controller = new_controller();
    let id = controller.create_conversation();
    controller.update_input("hello");
    let submission = controller.begin_submission().unwrap();

    let error = ChatError::Api {
        status: 500,
        detail: "An internal server error occurred: boom".to_string(),
    };
    controller.fail_submission(submission, &error);

    let stored = controller.store().get(&id).unwrap();
    assert_eq!(stored.messages.len(), 2);

    let annotation = stored.messages[0].sentiment.as_ref().unwrap();
    assert!(!annotation.pending);
    assert_eq!(annotation.emotion_label, ERROR_LABEL);
    assert_eq!(annotation.sarcasm_reason, "Analysis failed");

    // The failure is visible in the transcript, not just a log line
    assert_eq!(stored.messages[1].role, Role::Assistant);
    assert!(stored.messages[1]
        .content
        .contains("An internal server error occurred: boom"));

    // Failed analyses never count toward the aggregate
    assert_eq!(stored.overall_sentiment, NEUTRAL_LABEL);
    assert!(!controller.busy());
}

#[test]
fn test_failure_keeps_prior_aggregate() {
    let mut controller = new_controller();
    let id = controller.create_conversation();

    controller.update_input("good news");
    let first = controller.begin_submission().unwrap();
    controller.resolve_submission(first, &joy_reply("wonderful"));

    controller.update_input("more news");
    let second = controller.begin_submission().unwrap();
    let error = ChatError::Api {
        status: 502,
        detail: "API Error: Bad Gateway (502)".to_string(),
    };
    controller.fail_submission(second, &error);

    // Still computed from the previously resolved message
    assert_eq!(
        controller.store().get(&id).unwrap().overall_sentiment,
        "joy"
    );
}

#[test]
fn test_cross_conversation_isolation() {
    let mut controller = new_controller();
    let a = controller.create_conversation();
    controller.update_input("message for a");
    let submission = controller.begin_submission().unwrap();

    // User opens another conversation before the reply arrives
    let b = controller.create_conversation();
    assert_eq!(controller.active_conversation_id(), Some(b.as_str()));

    // The new conversation is not busy; the original one still is
    assert!(!controller.busy());
    controller.switch_conversation(&a);
    assert!(controller.busy());
    controller.switch_conversation(&b);

    controller.resolve_submission(submission, &joy_reply("landed in a"));

    let stored_a = controller.store().get(&a).unwrap();
    assert_eq!(stored_a.messages.len(), 2);
    assert_eq!(stored_a.messages[1].content, "landed in a");
    assert_eq!(stored_a.overall_sentiment, "joy");

    let stored_b = controller.store().get(&b).unwrap();
    assert!(stored_b.messages.is_empty());

    // The active working copy still shows B, untouched
    assert_eq!(controller.active_conversation_id(), Some(b.as_str()));
    assert!(controller.working_messages().is_empty());
}

#[test]
fn test_switch_refreshes_working_copy() {
    let mut controller = new_controller();
    let a = controller.create_conversation();
    controller.update_input("hello");
    let submission = controller.begin_submission().unwrap();
    controller.resolve_submission(submission, &joy_reply("hi"));

    controller.create_conversation();
    assert!(controller.working_messages().is_empty());

    controller.switch_conversation(&a);
    assert_eq!(controller.working_messages().len(), 2);
    assert_eq!(controller.input(), "");
}

#[test]
fn test_switch_to_unknown_id_yields_empty_working_copy() {
    let mut controller = new_controller();
    controller.create_conversation();

    controller.switch_conversation("no-such-id");
    assert_eq!(controller.active_conversation_id(), Some("no-such-id"));
    assert!(controller.working_messages().is_empty());
}

#[test]
fn test_delete_active_falls_back_to_most_recent() {
    let mut controller = new_controller();
    let a = controller.create_conversation();
    let b = controller.create_conversation();

    // Give A the most recent activity, then delete the active B
    controller.switch_conversation(&a);
    controller.update_input("bump");
    let submission = controller.begin_submission().unwrap();
    controller.resolve_submission(submission, &joy_reply("ok"));

    controller.switch_conversation(&b);
    controller.delete_conversation(&b);

    assert_eq!(controller.active_conversation_id(), Some(a.as_str()));
    assert_eq!(controller.working_messages().len(), 2);
}

#[test]
fn test_delete_last_conversation_empties_session() {
    let mut controller = new_controller();
    let id = controller.create_conversation();

    controller.delete_conversation(&id);

    assert_eq!(controller.active_conversation_id(), None);
    assert!(controller.working_messages().is_empty());
    assert!(controller.conversations().is_empty());
}

#[test]
fn test_delete_unknown_id_changes_nothing() {
    let mut controller = new_controller();
    let id = controller.create_conversation();

    controller.delete_conversation("no-such-id");

    assert_eq!(controller.active_conversation_id(), Some(id.as_str()));
    assert_eq!(controller.conversations().len(), 1);
}

#[test]
fn test_resolve_after_delete_is_dropped() {
    let mut controller = new_controller();
    let id = controller.create_conversation();
    controller.update_input("hello");
    let submission = controller.begin_submission().unwrap();

    controller.delete_conversation(&id);
    controller.resolve_submission(submission, &joy_reply("too late"));

    assert!(controller.conversations().is_empty());
}

#[test]
fn test_submit_folds_connection_failure_into_transcript() {
    // Nothing listens on this port; the request fails with a transport
    // error and the controller converts it into the Failed transition.
    let client = ChatClient::new("http://127.0.0.1:9").expect("client");
    let mut controller = new_controller();
    let id = controller.create_conversation();
    controller.update_input("hello");

    let sent = tokio_test::block_on(controller.submit(&client));
    assert!(sent);

    let stored = controller.store().get(&id).unwrap();
    assert_eq!(stored.messages.len(), 2);
    assert_eq!(
        stored.messages[0].sentiment.as_ref().unwrap().emotion_label,
        ERROR_LABEL
    );
    assert!(stored.messages[1]
        .content
        .contains("Could not connect to the assistant."));
    assert!(!controller.busy());
}

#[test]
fn test_submit_without_input_issues_no_request() {
    let client = ChatClient::new("http://127.0.0.1:9").expect("client");
    let mut controller = new_controller();
    controller.create_conversation();

    let sent = tokio_test::block_on(controller.submit(&client));
    assert!(!sent);
}
