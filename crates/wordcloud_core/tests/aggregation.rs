use wordcloud_core::{
    CategoryId, DedupPolicy, IngestOutcome, MessageEvent, MessageValidationError,
    VisualizationMode, WordCloudSession,
};

fn message(id: &str, text: &str) -> MessageEvent {
    MessageEvent::new(id, text, 1_700_000_000_000).with_sender("user-1", "Ada")
}

fn assert_category_sums_match_global(session: &WordCloudSession) {
    let snapshot = session.snapshot();
    for (word, count) in snapshot.global.iter() {
        let summed: u64 = snapshot
            .categories
            .values()
            .map(|counts| counts.get(word))
            .sum();
        assert_eq!(summed, count, "word `{word}`");
    }
    let category_total: u64 = snapshot.categories.values().map(|counts| counts.total()).sum();
    assert_eq!(category_total, snapshot.global.total());
}

#[test]
fn counts_words_across_messages() {
    let mut session = WordCloudSession::default();
    session.ingest(&message("m-1", "cat cat"));
    session.ingest(&message("m-2", "dog"));

    let snapshot = session.snapshot();
    assert_eq!(snapshot.global.get("cat"), 2);
    assert_eq!(snapshot.global.get("dog"), 1);
    assert_eq!(snapshot.global.len(), 2);
    assert_eq!(snapshot.processed_messages, 2);
}

#[test]
fn cloud_command_advances_epoch_without_counting() {
    let mut session = WordCloudSession::default();
    let outcome = session.ingest(&message("m-1", "/cloud"));

    let IngestOutcome::Command(transition) = &outcome else {
        panic!("expected command outcome, got {outcome:?}");
    };
    assert_eq!(transition.previous_epoch, CategoryId(0));
    assert_eq!(transition.epoch, CategoryId(1));
    assert_eq!(session.epoch(), CategoryId(1));
    assert_eq!(session.mode(), VisualizationMode::Cloud);
    assert!(session.snapshot().global.is_empty());
    assert!(session.snapshot().categories.is_empty());
}

#[test]
fn chart_command_switches_mode_and_keeps_epoch() {
    let mut session = WordCloudSession::default();
    let outcome = session.ingest(&message("m-1", " /chart "));

    assert!(matches!(outcome, IngestOutcome::Command(_)));
    assert_eq!(session.mode(), VisualizationMode::Chart);
    assert_eq!(session.epoch(), CategoryId(0));
    assert!(session.snapshot().global.is_empty());
}

#[test]
fn commands_are_case_sensitive_and_argument_free() {
    let mut session = WordCloudSession::default();
    let outcome = session.ingest(&message("m-1", "/Chart please"));

    assert_eq!(outcome.tokens(), ["/chart", "please"]);
    assert_eq!(session.mode(), VisualizationMode::Cloud);
}

#[test]
fn words_are_attributed_to_the_active_epoch() {
    let mut session = WordCloudSession::default();
    session.ingest(&message("m-1", "alpha beta"));
    session.ingest(&message("m-2", "/cloud"));
    session.ingest(&message("m-3", "beta gamma"));
    session.ingest(&message("m-4", "/chart"));
    session.ingest(&message("m-5", "gamma"));

    let snapshot = session.snapshot();
    let first = &snapshot.categories[&CategoryId(0)];
    let second = &snapshot.categories[&CategoryId(1)];
    assert_eq!(first.get("beta"), 1);
    assert_eq!(first.get("gamma"), 0);
    assert_eq!(second.get("beta"), 1);
    assert_eq!(second.get("gamma"), 2);
    assert_eq!(snapshot.global.get("beta"), 2);
    assert_eq!(snapshot.populated_categories(), vec![CategoryId(0), CategoryId(1)]);
    assert_category_sums_match_global(&session);
}

#[test]
fn category_sums_match_global_for_long_streams() {
    let mut session = WordCloudSession::default();
    let texts = [
        "red green", "/cloud", "green blue blue", "/chart", "red", "/cloud", "/cloud",
        "blue! RED?", "...", "green", "/cloud", "red red red",
    ];
    for (index, text) in texts.iter().enumerate() {
        session.ingest(&message(&format!("m-{index}"), text));
        assert_category_sums_match_global(&session);
    }
    // Epoch 2 never received words, so it is not a populated category.
    assert_eq!(
        session.snapshot().populated_categories(),
        vec![CategoryId(0), CategoryId(1), CategoryId(3), CategoryId(4)]
    );
}

#[test]
fn duplicate_message_changes_counts_once() {
    let mut session = WordCloudSession::default();
    let event = message("m-1", "echo echo");

    assert!(matches!(session.ingest(&event), IngestOutcome::Counted { .. }));
    let after_first = session.snapshot();
    assert_eq!(session.ingest(&event), IngestOutcome::Duplicate);
    assert_eq!(session.snapshot(), after_first);
    assert_eq!(after_first.global.get("echo"), 2);
}

#[test]
fn redelivered_command_is_not_reapplied() {
    let mut session = WordCloudSession::default();
    let command = message("m-1", "/cloud");
    session.ingest(&command);
    session.ingest(&command);
    assert_eq!(session.epoch(), CategoryId(1));
}

#[test]
fn punctuation_only_message_is_marked_processed() {
    let mut session = WordCloudSession::default();
    let event = message("m-1", "?!...");

    assert_eq!(session.ingest(&event), IngestOutcome::Empty);
    assert!(session.dedup().contains("m-1"));
    assert_eq!(session.snapshot().processed_messages, 1);
    assert_eq!(session.ingest(&event), IngestOutcome::Duplicate);
}

#[test]
fn malformed_messages_are_rejected_without_side_effects() {
    let mut session = WordCloudSession::default();

    let blank_id = message(" ", "hello");
    assert_eq!(
        session.ingest(&blank_id),
        IngestOutcome::Rejected(MessageValidationError::EmptyId)
    );

    let blank_text = message("m-1", "   ");
    assert!(matches!(
        session.ingest(&blank_text),
        IngestOutcome::Rejected(MessageValidationError::EmptyText { .. })
    ));

    let mut no_timestamp = message("m-2", "hello");
    no_timestamp.created_at = None;
    assert!(matches!(
        session.ingest(&no_timestamp),
        IngestOutcome::Rejected(MessageValidationError::MissingTimestamp { .. })
    ));

    assert!(session.dedup().is_empty());
    assert!(session.snapshot().global.is_empty());
    // A corrected redelivery under the same id is still accepted.
    assert!(matches!(
        session.ingest(&message("m-1", "hello")),
        IngestOutcome::Counted { .. }
    ));
}

#[test]
fn recent_window_policy_forgets_old_ids() {
    let mut session = WordCloudSession::new(DedupPolicy::Recent { capacity: 2 });
    session.ingest(&message("m-1", "one"));
    session.ingest(&message("m-2", "two"));
    session.ingest(&message("m-3", "three"));

    // `m-1` fell out of the window, so a redelivery counts again.
    assert!(matches!(
        session.ingest(&message("m-1", "one")),
        IngestOutcome::Counted { .. }
    ));
    assert_eq!(session.snapshot().global.get("one"), 2);
    assert_eq!(session.ingest(&message("m-3", "three")), IngestOutcome::Duplicate);
}

#[test]
fn message_wire_shape_uses_host_field_names() {
    let value = serde_json::json!({
        "id": "abc",
        "text": "Hi there",
        "senderId": "u-7",
        "senderName": "Grace",
        "createdAt": 1_700_000_000_123_i64
    });
    let event: MessageEvent = serde_json::from_value(value).expect("decode message");
    assert_eq!(event.sender_id, "u-7");
    assert_eq!(event.sender_name, "Grace");
    assert_eq!(event.created_at, Some(1_700_000_000_123));

    let missing_time: MessageEvent =
        serde_json::from_value(serde_json::json!({ "id": "x", "text": "hey" }))
            .expect("decode partial message");
    assert!(missing_time.validate().is_err());
}
