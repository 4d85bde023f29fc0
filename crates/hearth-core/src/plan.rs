// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The canonical structured report synthesized from an assessment transcript.
//!
//! Every field defaults to empty on deserialization so that partially-shaped
//! model output still parses; [`Plan::validate`] then rejects any plan with an
//! empty leaf. A plan is stored once per session and never mutated.

use serde::{Deserialize, Serialize};

/// Number of entries in the daily action list.
pub const DAILY_ACTION_COUNT: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    /// The user's own description of their work world.
    pub kitchen_term: String,
    pub pattern_analysis: PatternAnalysis,
    pub domain_breakdown: DomainBreakdown,
    pub energy_assessment: EnergyAssessment,
    pub thirty_day_protocol: ThirtyDayProtocol,
    pub bottom_line: BottomLine,
    pub pull_quote: String,
    pub development_reminders: Vec<String>,
    pub next_steps: NextSteps,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternAnalysis {
    /// The pattern named in the user's literal words.
    pub pattern_exact_words: String,
    pub pattern_reframe: String,
    pub pattern_trigger: String,
    pub protective_function: String,
    pub pattern_cost: String,
    pub proof_of_capability: String,
    pub proof_context: String,
    pub anchor_habit: String,
    pub synthesized_truth: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainAssessment {
    pub current_state: String,
    pub block: String,
    pub growth_edge: String,
}

/// The four fixed life domains, in report order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainBreakdown {
    pub identity: DomainAssessment,
    pub craft: DomainAssessment,
    pub purpose: DomainAssessment,
    pub environment: DomainAssessment,
}

impl DomainBreakdown {
    /// Domains paired with their stable keys, in report order.
    pub fn entries(&self) -> [(&'static str, &DomainAssessment); 4] {
        [
            ("identity", &self.identity),
            ("craft", &self.craft),
            ("purpose", &self.purpose),
            ("environment", &self.environment),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyAssessment {
    pub primary_state: String,
    pub regulation_capacity: String,
    pub observable_patterns: Vec<String>,
    pub energy_reality: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImmediateAction {
    pub anchor: String,
    pub specific_action: String,
    pub time_and_reps: String,
    pub why_this_works: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookRecommendation {
    pub title: String,
    pub author: String,
    pub why_this_book: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeekFocus {
    pub focus: String,
    pub practice: String,
    pub marker: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeeklyBreakdown {
    pub week_1: WeekFocus,
    pub week_2: WeekFocus,
    pub week_3: WeekFocus,
    pub week_4: WeekFocus,
}

impl WeeklyBreakdown {
    pub fn weeks(&self) -> [&WeekFocus; 4] {
        [&self.week_1, &self.week_2, &self.week_3, &self.week_4]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThirtyDayProtocol {
    pub seventy_two_hour_action: ImmediateAction,
    pub book_recommendation: BookRecommendation,
    pub weekly_breakdown: WeeklyBreakdown,
    pub daily_actions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BottomLine {
    pub paragraph_1: String,
    pub paragraph_2: String,
    pub paragraph_3: String,
    pub emphasis_statement: String,
}

/// Contact details and links shown at the end of the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NextSteps {
    pub contact_email: String,
    pub booking_url: String,
    pub community_url: String,
}

impl Plan {
    /// Visits every leaf string with its dotted path, list items included.
    pub fn visit_leaves<F: FnMut(&str, &str)>(&self, mut visit: F) {
        let pa = &self.pattern_analysis;
        let p = &self.thirty_day_protocol;
        let a = &p.seventy_two_hour_action;
        let b = &p.book_recommendation;
        let e = &self.energy_assessment;
        let bl = &self.bottom_line;
        let ns = &self.next_steps;

        let scalars = [
            ("kitchen_term", &self.kitchen_term),
            ("pattern_analysis.pattern_exact_words", &pa.pattern_exact_words),
            ("pattern_analysis.pattern_reframe", &pa.pattern_reframe),
            ("pattern_analysis.pattern_trigger", &pa.pattern_trigger),
            ("pattern_analysis.protective_function", &pa.protective_function),
            ("pattern_analysis.pattern_cost", &pa.pattern_cost),
            ("pattern_analysis.proof_of_capability", &pa.proof_of_capability),
            ("pattern_analysis.proof_context", &pa.proof_context),
            ("pattern_analysis.anchor_habit", &pa.anchor_habit),
            ("pattern_analysis.synthesized_truth", &pa.synthesized_truth),
            ("energy_assessment.primary_state", &e.primary_state),
            ("energy_assessment.regulation_capacity", &e.regulation_capacity),
            ("energy_assessment.energy_reality", &e.energy_reality),
            ("thirty_day_protocol.seventy_two_hour_action.anchor", &a.anchor),
            (
                "thirty_day_protocol.seventy_two_hour_action.specific_action",
                &a.specific_action,
            ),
            (
                "thirty_day_protocol.seventy_two_hour_action.time_and_reps",
                &a.time_and_reps,
            ),
            (
                "thirty_day_protocol.seventy_two_hour_action.why_this_works",
                &a.why_this_works,
            ),
            ("thirty_day_protocol.book_recommendation.title", &b.title),
            ("thirty_day_protocol.book_recommendation.author", &b.author),
            (
                "thirty_day_protocol.book_recommendation.why_this_book",
                &b.why_this_book,
            ),
            ("bottom_line.paragraph_1", &bl.paragraph_1),
            ("bottom_line.paragraph_2", &bl.paragraph_2),
            ("bottom_line.paragraph_3", &bl.paragraph_3),
            ("bottom_line.emphasis_statement", &bl.emphasis_statement),
            ("pull_quote", &self.pull_quote),
            ("next_steps.contact_email", &ns.contact_email),
            ("next_steps.booking_url", &ns.booking_url),
            ("next_steps.community_url", &ns.community_url),
        ];
        for (path, value) in scalars {
            visit(path, value);
        }

        for (key, domain) in self.domain_breakdown.entries() {
            visit(&format!("domain_breakdown.{key}.current_state"), &domain.current_state);
            visit(&format!("domain_breakdown.{key}.block"), &domain.block);
            visit(&format!("domain_breakdown.{key}.growth_edge"), &domain.growth_edge);
        }

        for (i, week) in p.weekly_breakdown.weeks().into_iter().enumerate() {
            let n = i + 1;
            visit(&format!("thirty_day_protocol.weekly_breakdown.week_{n}.focus"), &week.focus);
            visit(
                &format!("thirty_day_protocol.weekly_breakdown.week_{n}.practice"),
                &week.practice,
            );
            visit(&format!("thirty_day_protocol.weekly_breakdown.week_{n}.marker"), &week.marker);
        }

        for (i, item) in e.observable_patterns.iter().enumerate() {
            visit(&format!("energy_assessment.observable_patterns[{i}]"), item);
        }
        for (i, item) in p.daily_actions.iter().enumerate() {
            visit(&format!("thirty_day_protocol.daily_actions[{i}]"), item);
        }
        for (i, item) in self.development_reminders.iter().enumerate() {
            visit(&format!("development_reminders[{i}]"), item);
        }
    }

    /// Checks that every leaf string and every list is non-empty.
    ///
    /// Returns the dotted paths of all offending fields.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut problems = Vec::new();
        self.visit_leaves(|path, value| {
            if value.trim().is_empty() {
                problems.push(path.to_string());
            }
        });

        let lists = [
            (
                "energy_assessment.observable_patterns",
                self.energy_assessment.observable_patterns.is_empty(),
            ),
            (
                "thirty_day_protocol.daily_actions",
                self.thirty_day_protocol.daily_actions.is_empty(),
            ),
            ("development_reminders", self.development_reminders.is_empty()),
        ];
        for (path, empty) in lists {
            if empty {
                problems.push(path.to_string());
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}
