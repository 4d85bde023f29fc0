// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the conversation-to-report pipeline.
//!
//! Each test creates an isolated TestHarness with temp SQLite and mock
//! adapters. Tests are independent and order-insensitive.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use hearth_assessment::selection::select_book;
use hearth_core::{EmailType, HearthError, Language, QueueStatus, Role, SessionStatus};
use hearth_email::{schedule_sequence, REPORT_FILENAME};
use hearth_test_utils::{plan_json, TestHarness};

// ---- Conversation ----

#[tokio::test]
async fn assessment_runs_to_completion_and_report_is_delivered() {
    let harness = TestHarness::builder()
        .with_mock_responses([
            "Welcome. My question for you: what do you call your place in the kitchen?",
            "You said the line. My question for you: when did it stop feeling like yours?",
            "Thank you. ASSESSMENT COMPLETE. Your personalized report is being prepared.",
        ])
        .build()
        .await
        .unwrap();
    let conversation = &harness.services.conversation;
    let session = harness.create_session(Language::En).await.unwrap();

    let opening = conversation.handle_turn(&session.id, None).await.unwrap();
    assert!(!opening.is_complete);

    let reply = conversation
        .handle_turn(&session.id, Some("I run the line."))
        .await
        .unwrap();
    assert!(!reply.is_complete);
    assert_eq!(reply.exchange_count, 1);

    let last = conversation
        .handle_turn(&session.id, Some("About a year ago."))
        .await
        .unwrap();
    assert!(last.is_complete);

    let view = conversation.view(&session.id).await.unwrap();
    assert_eq!(view.session.status, SessionStatus::Complete);
    assert_eq!(view.phase, "complete");

    let closed = conversation.handle_turn(&session.id, Some("one more")).await;
    assert!(matches!(closed, Err(HearthError::AssessmentClosed { .. })));

    harness.provider.add_response(plan_json(Language::En)).await;
    let (generated, delivery) = harness
        .services
        .reports
        .generate_and_deliver(&session.id)
        .await
        .unwrap();
    assert!(generated.is_new());
    let delivery = delivery.unwrap();
    assert!(delivery.pdf_attached && delivery.sequence_scheduled);

    let sent = harness.email.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ana@example.com");
    assert_eq!(sent[0].attachments[0].filename, REPORT_FILENAME);

    let queued = harness.storage.list_emails(Some(QueueStatus::Pending)).await.unwrap();
    assert_eq!(queued.len(), 5);
}

#[tokio::test]
async fn failed_model_call_keeps_the_answer_and_retries_without_duplicating_it() {
    let harness = TestHarness::builder()
        .with_mock_responses(["Welcome. My question for you: where do you cook?"])
        .build()
        .await
        .unwrap();
    let conversation = &harness.services.conversation;
    let session = harness.create_session(Language::En).await.unwrap();
    conversation.handle_turn(&session.id, None).await.unwrap();

    harness.provider.add_failure("overloaded").await;
    let failed = conversation
        .handle_turn(&session.id, Some("A hotel kitchen."))
        .await;
    let err = failed.unwrap_err();
    assert!(err.is_retryable());

    harness
        .provider
        .add_response("A hotel. My question for you: how long?")
        .await;
    conversation.handle_turn(&session.id, None).await.unwrap();

    let turns = harness.storage.list_turns(&session.id).await.unwrap();
    let users: Vec<_> = turns.iter().filter(|t| t.role == Role::User).collect();
    assert_eq!(users.len(), 1);
    assert_eq!(turns.last().unwrap().role, Role::Assistant);
}

#[tokio::test]
async fn resubmitting_the_same_answer_after_a_failure_counts_it_once() {
    let harness = TestHarness::builder()
        .with_mock_responses(["Welcome. My question for you: where do you cook?"])
        .build()
        .await
        .unwrap();
    let conversation = &harness.services.conversation;
    let session = harness.create_session(Language::En).await.unwrap();
    conversation.handle_turn(&session.id, None).await.unwrap();

    harness.provider.add_failure("overloaded").await;
    assert!(conversation
        .handle_turn(&session.id, Some("A hotel kitchen."))
        .await
        .is_err());

    harness
        .provider
        .add_response("A hotel. My question for you: how long?")
        .await;
    let reply = conversation
        .handle_turn(&session.id, Some("A hotel kitchen."))
        .await
        .unwrap();
    assert_eq!(reply.exchange_count, 1);

    let turns = harness.storage.list_turns(&session.id).await.unwrap();
    assert_eq!(turns.iter().filter(|t| t.role == Role::User).count(), 1);
    assert_eq!(conversation.view(&session.id).await.unwrap().exchange_count, 1);
}

#[tokio::test]
async fn negated_disclosure_answers_continue_the_assessment() {
    let harness = TestHarness::builder()
        .with_mock_responses([
            "Welcome. My question for you: how are you?",
            "Thank you. My question for you: what would rest look like?",
            "Bienvenida. Mi pregunta para ti: ¿cómo estás?",
            "Gracias. Mi pregunta para ti: ¿qué te daría descanso?",
        ])
        .build()
        .await
        .unwrap();
    let conversation = &harness.services.conversation;
    let answers = [
        (
            Language::En,
            "No, I have never had thoughts of suicide or self-harm. I'm just tired.",
        ),
        (Language::Es, "No, nunca he pensado en hacerme daño. Solo estoy cansada."),
    ];

    for (language, answer) in answers {
        let session = harness.create_session(language).await.unwrap();
        conversation.handle_turn(&session.id, None).await.unwrap();
        let reply = conversation.handle_turn(&session.id, Some(answer)).await.unwrap();
        assert!(!reply.halted, "{answer}");
        assert_eq!(
            conversation.session(&session.id).await.unwrap().status,
            SessionStatus::Active
        );
    }
    assert_eq!(harness.provider.request_count().await, 4);
}

#[tokio::test]
async fn crisis_answer_halts_without_a_model_call() {
    let harness = TestHarness::builder()
        .with_mock_responses(["Welcome. My question for you: how are you?"])
        .build()
        .await
        .unwrap();
    let conversation = &harness.services.conversation;
    let session = harness.create_session(Language::En).await.unwrap();
    conversation.handle_turn(&session.id, None).await.unwrap();

    let reply = conversation
        .handle_turn(&session.id, Some("Some nights I want to end my life."))
        .await
        .unwrap();
    assert!(reply.halted);
    assert!(!reply.is_complete);
    assert_eq!(harness.provider.request_count().await, 1);

    let session = conversation.session(&session.id).await.unwrap();
    assert_eq!(session.status, SessionStatus::Halted);
    let report = harness.services.reports.generate(&session.id).await;
    assert!(matches!(report, Err(HearthError::InvalidInput(_))));
}

#[tokio::test]
async fn exchange_ceiling_completes_the_assessment() {
    let harness = TestHarness::builder()
        .with_config(|config| config.assessment.max_exchanges = 2)
        .build()
        .await
        .unwrap();
    let conversation = &harness.services.conversation;
    let session = harness.create_session(Language::En).await.unwrap();

    conversation.handle_turn(&session.id, None).await.unwrap();
    let first = conversation.handle_turn(&session.id, Some("one")).await.unwrap();
    assert!(!first.is_complete);
    let second = conversation.handle_turn(&session.id, Some("two")).await.unwrap();
    assert!(second.is_complete);
}

// ---- Plan synthesis ----

#[tokio::test]
async fn spanish_transcript_is_synthesized_in_spanish() {
    let harness = TestHarness::builder()
        .with_mock_responses([plan_json(Language::Es)])
        .build()
        .await
        .unwrap();
    let session = harness.create_session(Language::Es).await.unwrap();
    for i in 0..20 {
        let (role, text) = if i % 2 == 0 {
            (Role::Assistant, format!("Pregunta número {i}: ¿cómo te sientes en la cocina?"))
        } else {
            (Role::User, format!("Respuesta {i}: cansada, pero sigo."))
        };
        harness.storage.append_turn(&session.id, role, &text).await.unwrap();
    }
    harness
        .storage
        .update_session_status(&session.id, SessionStatus::Complete)
        .await
        .unwrap();

    let plan = harness
        .services
        .reports
        .generate(&session.id)
        .await
        .unwrap()
        .into_plan();

    let requests = harness.provider.requests().await;
    assert!(requests[0].system_prompt.starts_with("Conviertes una conversación"));
    assert!(requests[0].messages[0].content.starts_with("Asistente: "));

    const ENGLISH_STOP_WORDS: [&str; 6] = [" the ", " and ", " with ", " your ", " you ", " is "];
    let paragraph = format!(" {} ", plan.bottom_line.paragraph_1.to_lowercase());
    for word in ENGLISH_STOP_WORDS {
        assert!(!paragraph.contains(word), "found {word:?} in {paragraph:?}");
    }

    let mut empty = Vec::new();
    plan.visit_leaves(|path, value| {
        if value.trim().is_empty() {
            empty.push(path.to_string());
        }
    });
    assert!(empty.is_empty(), "empty fields: {empty:?}");
}

#[tokio::test]
async fn garbage_extraction_output_still_yields_a_complete_plan() {
    let harness = TestHarness::builder()
        .with_mock_responses(["I could not produce JSON for this one, sorry."])
        .build()
        .await
        .unwrap();
    let session = harness.completed_session(Language::En).await.unwrap();
    let plan = harness
        .services
        .reports
        .generate(&session.id)
        .await
        .unwrap()
        .into_plan();
    assert!(plan.validate().is_ok());
}

#[tokio::test]
async fn perfectionism_in_exact_words_selects_the_perfectionism_book() {
    let mut plan: hearth_core::Plan = serde_json::from_str(&plan_json(Language::Es)).unwrap();
    plan.pattern_analysis.pattern_exact_words = "perfeccionismo".into();
    assert_eq!(select_book(&plan).id, "perfectionism");
    assert_eq!(select_book(&plan).id, select_book(&plan).id);
}

// ---- Report generation guard ----

#[tokio::test]
async fn concurrent_generation_stores_exactly_one_plan() {
    let harness = TestHarness::builder()
        .with_mock_responses([plan_json(Language::En), plan_json(Language::En)])
        .build()
        .await
        .unwrap();
    let session = harness.completed_session(Language::En).await.unwrap();
    let services = Arc::clone(&harness.services);

    let (a, b) = tokio::join!(
        services.reports.generate(&session.id),
        services.reports.generate(&session.id),
    );
    let outcomes = [a, b];
    let created = outcomes
        .iter()
        .filter(|r| matches!(r, Ok(g) if g.is_new()))
        .count();
    assert_eq!(created, 1);
    for outcome in &outcomes {
        match outcome {
            Ok(_) | Err(HearthError::Conflict(_)) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    let stored = harness.storage.get_plan(&session.id).await.unwrap().unwrap();
    let again = harness.services.reports.generate(&session.id).await.unwrap();
    assert!(!again.is_new());
    assert_eq!(again.plan(), &stored);
}

#[tokio::test]
async fn pdf_failure_falls_back_to_a_link() {
    let harness = TestHarness::builder()
        .with_mock_responses([plan_json(Language::En)])
        .build()
        .await
        .unwrap();
    harness.pdf.set_failing(true);
    let session = harness.completed_session(Language::En).await.unwrap();

    let (_, delivery) = harness
        .services
        .reports
        .generate_and_deliver(&session.id)
        .await
        .unwrap();
    let delivery = delivery.unwrap();
    assert!(!delivery.message_id.is_empty());
    assert!(!delivery.pdf_attached);

    let sent = harness.email.sent().await;
    assert!(sent[0].attachments.is_empty());
    assert!(sent[0].html.contains(&format!("/v1/sessions/{}/report", session.id)));
}

#[tokio::test]
async fn failed_report_email_is_sent_on_the_next_request() {
    let harness = TestHarness::builder()
        .with_mock_responses([plan_json(Language::En)])
        .build()
        .await
        .unwrap();
    let session = harness.completed_session(Language::En).await.unwrap();
    let reports = &harness.services.reports;

    harness.email.set_failing(true);
    let failed = reports.generate_and_deliver(&session.id).await;
    assert!(matches!(failed, Err(HearthError::Email { .. })));
    assert!(harness.storage.get_plan(&session.id).await.unwrap().is_some());
    assert!(!harness.storage.report_delivered(&session.id).await.unwrap());

    harness.email.set_failing(false);
    let (generated, delivery) = reports.generate_and_deliver(&session.id).await.unwrap();
    assert!(!generated.is_new());
    let delivery = delivery.unwrap();
    assert!(delivery.message_id.starts_with("<hearth-report-"));
    assert!(harness.storage.report_delivered(&session.id).await.unwrap());

    let (_, delivery) = reports.generate_and_deliver(&session.id).await.unwrap();
    assert!(delivery.is_none());
    assert_eq!(harness.email.sent().await.len(), 1);
    assert_eq!(harness.provider.request_count().await, 1);

    let queued = harness.storage.list_emails(Some(QueueStatus::Pending)).await.unwrap();
    assert_eq!(queued.len(), 5);
}

// ---- Email sequence ----

#[tokio::test]
async fn sequence_is_scheduled_at_exact_day_offsets_and_only_once() {
    let harness = TestHarness::builder().build().await.unwrap();
    let session = harness.completed_session(Language::En).await.unwrap();
    let t = Utc.with_ymd_and_hms(2026, 3, 4, 15, 30, 0).unwrap();

    let args = ("user-1", session.id.as_str(), "ana@example.com", "Ana Ruiz");
    let first = schedule_sequence(harness.storage.as_ref(), args.0, args.1, args.2, args.3, t)
        .await
        .unwrap();
    let second = schedule_sequence(harness.storage.as_ref(), args.0, args.1, args.2, args.3, t)
        .await
        .unwrap();
    assert_eq!(first.len(), 5);
    assert_eq!(second.len(), 5);
    assert_eq!(harness.storage.list_emails(None).await.unwrap().len(), 5);

    let mut due: Vec<_> = first.iter().map(|e| (e.email_type, e.scheduled_for)).collect();
    due.sort_by_key(|(_, at)| *at);
    assert_eq!(
        due,
        vec![
            (EmailType::PatternCheckIn, t + Duration::days(3)),
            (EmailType::FirstWeek, t + Duration::days(7)),
            (EmailType::Midpoint, t + Duration::days(14)),
            (EmailType::FinalStretch, t + Duration::days(21)),
            (EmailType::ThirtyDay, t + Duration::days(30)),
        ]
    );
}

#[tokio::test]
async fn queue_sends_due_entries_and_marks_failures_without_retrying() {
    let harness = TestHarness::builder()
        .with_mock_responses([plan_json(Language::Es)])
        .build()
        .await
        .unwrap();
    let session = harness.completed_session(Language::Es).await.unwrap();
    harness
        .services
        .reports
        .generate_and_deliver(&session.id)
        .await
        .unwrap();
    let queue = &harness.services.queue;

    let summary = queue.run_once(Utc::now() + Duration::days(3) + Duration::minutes(1)).await.unwrap();
    assert_eq!((summary.claimed, summary.sent, summary.failed), (1, 1, 0));
    let sent = harness.email.sent().await;
    assert_eq!(sent.len(), 2);
    assert!(sent[1].idempotency_key.as_deref().unwrap().starts_with("<hearth-queue-"));

    harness.email.set_failing(true);
    let summary = queue.run_once(Utc::now() + Duration::days(8)).await.unwrap();
    assert_eq!((summary.sent, summary.failed), (0, 1));
    let failed = harness.storage.list_emails(Some(QueueStatus::Failed)).await.unwrap();
    assert_eq!(failed.len(), 1);
    assert!(failed[0].error_message.is_some());

    harness.email.set_failing(false);
    let summary = queue.run_once(Utc::now() + Duration::days(8)).await.unwrap();
    assert_eq!(summary.claimed, 0);
}
