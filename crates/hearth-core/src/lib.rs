// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Hearth assessment service.
//!
//! This crate provides the error type, the domain types shared by every
//! crate (sessions, transcript turns, the Plan, email queue entries), and the
//! adapter traits behind which the external collaborators live.

pub mod error;
pub mod plan;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::HearthError;
pub use plan::Plan;
pub use types::{
    AdapterType, AssessmentSession, ConversationTurn, EmailQueueEntry, EmailType, HealthStatus,
    Language, QueueStatus, Role, SessionStatus,
};

// Re-export all adapter traits at crate root.
pub use traits::{EmailTransport, PdfRenderer, PluginAdapter, ProviderAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn retryable_errors_are_upstream_failures() {
        let provider = HearthError::Provider {
            message: "overloaded".into(),
            source: None,
        };
        let timeout = HearthError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        assert!(provider.is_retryable());
        assert!(timeout.is_retryable());

        assert!(!HearthError::Conflict("busy".into()).is_retryable());
        assert!(!HearthError::Internal("boom".into()).is_retryable());
        assert!(
            !HearthError::NotFound {
                entity: "session",
                id: "s1".into()
            }
            .is_retryable()
        );
    }

    #[test]
    fn language_round_trips_through_strum_and_serde() {
        assert_eq!(Language::from_str("es").unwrap(), Language::Es);
        assert_eq!(Language::En.to_string(), "en");
        let json = serde_json::to_string(&Language::Es).unwrap();
        assert_eq!(json, "\"es\"");
        assert!(Language::from_str("fr").is_err());
    }

    #[test]
    fn drip_offsets_are_fixed() {
        let offsets: Vec<i64> = EmailType::SEQUENCE.iter().map(|t| t.offset_days()).collect();
        assert_eq!(offsets, vec![3, 7, 14, 21, 30]);
    }

    #[test]
    fn email_type_storage_names() {
        assert_eq!(EmailType::PatternCheckIn.to_string(), "pattern_check_in");
        assert_eq!(
            EmailType::from_str("thirty_day").unwrap(),
            EmailType::ThirtyDay
        );
    }

    #[test]
    fn only_active_sessions_accept_turns() {
        assert!(SessionStatus::Active.accepts_turns());
        assert!(!SessionStatus::Complete.accepts_turns());
        assert!(!SessionStatus::Halted.accepts_turns());
    }

    #[test]
    fn empty_plan_fails_validation_with_paths() {
        let problems = Plan::default().validate().unwrap_err();
        assert!(problems.contains(&"kitchen_term".to_string()));
        assert!(problems.contains(&"domain_breakdown.craft.block".to_string()));
        assert!(problems.contains(&"thirty_day_protocol.daily_actions".to_string()));
    }

    #[test]
    fn partial_json_deserializes_with_defaults() {
        let plan: Plan = serde_json::from_str(
            r#"{"kitchen_term": "the line", "pattern_analysis": {"pattern_exact_words": "I hold it all"}}"#,
        )
        .unwrap();
        assert_eq!(plan.kitchen_term, "the line");
        assert_eq!(plan.pattern_analysis.pattern_exact_words, "I hold it all");
        assert!(plan.bottom_line.paragraph_1.is_empty());
    }

    #[test]
    fn visit_leaves_reaches_list_items() {
        let mut plan = Plan::default();
        plan.thirty_day_protocol.daily_actions = vec!["walk".into(), "".into()];
        let problems = plan.validate().unwrap_err();
        assert!(problems.contains(&"thirty_day_protocol.daily_actions[1]".to_string()));
        assert!(!problems.contains(&"thirty_day_protocol.daily_actions[0]".to_string()));
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_provider_adapter<T: ProviderAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
        fn _assert_pdf_renderer<T: PdfRenderer>() {}
        fn _assert_email_transport<T: EmailTransport>() {}
    }
}
