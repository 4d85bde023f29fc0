// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic content selection over a finished plan.
//!
//! Book selection scores the static catalog by keyword hits. Postscripts run a
//! short ordered rule list per drip email; the first matching rule wins.

use hearth_core::{EmailType, Language, Plan};

/// A static book recommendation.
#[derive(Debug, PartialEq, Eq)]
pub struct BookEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub author: &'static str,
    rationale_en: &'static str,
    rationale_es: &'static str,
    pub purchase_url: &'static str,
    /// Lower-case keywords, English and Spanish.
    pub tags: &'static [&'static str],
}

impl BookEntry {
    pub fn rationale(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.rationale_en,
            Language::Es => self.rationale_es,
        }
    }
}

/// Index into [`CATALOG`] of the entry used when nothing scores.
const DEFAULT_BOOK: usize = 2;

pub static CATALOG: [BookEntry; 8] = [
    BookEntry {
        id: "perfectionism",
        title: "The Gifts of Imperfection",
        author: "Brené Brown",
        rationale_en: "For anyone whose standards have turned from a source of pride into a source of exhaustion.",
        rationale_es: "Para quien siente que sus estándares pasaron de ser motivo de orgullo a ser motivo de agotamiento.",
        purchase_url: "https://bookshop.org/search?keywords=the+gifts+of+imperfection",
        tags: &[
            "perfect",
            "perfeccion",
            "not good enough",
            "suficientemente bueno",
            "mistake",
            "error",
            "flawless",
            "impecable",
            "control",
        ],
    },
    BookEntry {
        id: "boundaries",
        title: "Set Boundaries, Find Peace",
        author: "Nedra Glover Tawwab",
        rationale_en: "Practical language for saying no when every shift asks you for a yes.",
        rationale_es: "Lenguaje práctico para decir que no cuando cada turno te pide un sí.",
        purchase_url: "https://bookshop.org/search?keywords=set+boundaries+find+peace",
        tags: &[
            "boundar",
            "límite",
            "limite",
            "say no",
            "decir que no",
            "people pleas",
            "complacer",
            "can't say no",
            "no puedo decir que no",
        ],
    },
    BookEntry {
        id: "stress-cycle",
        title: "Burnout: The Secret to Unlocking the Stress Cycle",
        author: "Emily Nagoski and Amelia Nagoski",
        rationale_en: "Explains why stress stays in the body after service ends and how to finish the cycle.",
        rationale_es: "Explica por qué el estrés se queda en el cuerpo después del servicio y cómo cerrar el ciclo.",
        purchase_url: "https://bookshop.org/search?keywords=burnout+nagoski",
        tags: &[
            "burnout",
            "burned out",
            "quemad",
            "exhaust",
            "agotad",
            "agotamiento",
            "stress",
            "estrés",
            "estres",
        ],
    },
    BookEntry {
        id: "self-compassion",
        title: "Self-Compassion",
        author: "Kristin Neff",
        rationale_en: "For the inner voice that is harder on you than any chef ever was.",
        rationale_es: "Para esa voz interna que te trata más duro que cualquier chef.",
        purchase_url: "https://bookshop.org/search?keywords=self-compassion+neff",
        tags: &[
            "critic",
            "crític",
            "hard on myself",
            "duro conmigo",
            "exigente",
            "shame",
            "vergüenza",
            "guilt",
            "culpa",
        ],
    },
    BookEntry {
        id: "meaning",
        title: "Man's Search for Meaning",
        author: "Viktor E. Frankl",
        rationale_en: "A return to the question of why, for when the reason you started has gone quiet.",
        rationale_es: "Un regreso a la pregunta del porqué, para cuando la razón por la que empezaste se quedó callada.",
        purchase_url: "https://bookshop.org/search?keywords=man%27s+search+for+meaning",
        tags: &[
            "purpose",
            "propósito",
            "proposito",
            "meaning",
            "sentido",
            "why i started",
            "por qué empecé",
            "passion",
            "pasión",
        ],
    },
    BookEntry {
        id: "rest",
        title: "Rest: Why You Get More Done When You Work Less",
        author: "Alex Soojung-Kim Pang",
        rationale_en: "Makes the case that rest is a skill, not a reward you earn after the last ticket.",
        rationale_es: "Defiende que el descanso es una habilidad, no un premio que te ganas después de la última comanda.",
        purchase_url: "https://bookshop.org/search?keywords=rest+soojung-kim+pang",
        tags: &[
            "need rest",
            "no rest",
            "never rest",
            "resting",
            "rest day",
            "descans",
            "sleep",
            "dormir",
            "day off",
            "día libre",
            "dia libre",
            "never stop",
            "nunca paro",
        ],
    },
    BookEntry {
        id: "habits",
        title: "Atomic Habits",
        author: "James Clear",
        rationale_en: "Small, repeatable changes that fit inside a schedule you do not fully control.",
        rationale_es: "Cambios pequeños y repetibles que caben en un horario que no controlas del todo.",
        purchase_url: "https://bookshop.org/search?keywords=atomic+habits",
        tags: &[
            "habit",
            "hábito",
            "habito",
            "routine",
            "rutina",
            "consisten",
            "disciplin",
        ],
    },
    BookEntry {
        id: "industry-identity",
        title: "Kitchen Confidential",
        author: "Anthony Bourdain",
        rationale_en: "For when your identity and the industry have become hard to tell apart.",
        rationale_es: "Para cuando tu identidad y la industria se volvieron difíciles de separar.",
        purchase_url: "https://bookshop.org/search?keywords=kitchen+confidential",
        tags: &[
            "chef",
            "cook",
            "cociner",
            "restaurant",
            "restaurante",
            "industry",
            "industria",
            "identity",
            "identidad",
        ],
    },
];

/// The entry used when no tag matches.
pub fn default_book() -> &'static BookEntry {
    &CATALOG[DEFAULT_BOOK]
}

fn scored_text(plan: &Plan) -> String {
    let pa = &plan.pattern_analysis;
    [
        pa.pattern_exact_words.as_str(),
        pa.pattern_reframe.as_str(),
        pa.pattern_trigger.as_str(),
        pa.protective_function.as_str(),
        pa.synthesized_truth.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// Whether `keyword` occurs in `text` at the start of a word.
///
/// Keywords are word prefixes ("boundar" matches "boundaries"), so "rent"
/// does not match "current".
pub fn mentions(text: &str, keyword: &str) -> bool {
    text.match_indices(keyword).any(|(at, _)| {
        text[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}

/// Number of the entry's tags found in `text`.
pub fn score(entry: &BookEntry, text: &str) -> usize {
    entry.tags.iter().filter(|tag| mentions(text, tag)).count()
}

/// Highest-scoring catalog entry, earliest on ties, default when all are zero.
pub fn select_book(plan: &Plan) -> &'static BookEntry {
    let text = scored_text(plan);
    let mut best: Option<(&'static BookEntry, usize)> = None;
    for entry in &CATALOG {
        let s = score(entry, &text);
        if s > 0 && best.is_none_or(|(_, top)| s > top) {
            best = Some((entry, s));
        }
    }
    best.map_or_else(default_book, |(entry, _)| entry)
}

/// First catalog entry whose title overlaps `title` or whose author's last
/// name appears in `author`.
pub fn find_catalog_match(title: &str, author: &str) -> Option<&'static BookEntry> {
    let title = title.trim().to_lowercase();
    let author = author.trim().to_lowercase();
    CATALOG.iter().find(|entry| {
        let entry_title = entry.title.to_lowercase();
        let title_hit = !title.is_empty()
            && (title.contains(&entry_title) || entry_title.contains(&title));
        let author_hit = !author.is_empty()
            && entry
                .author
                .split_whitespace()
                .last()
                .is_some_and(|last| author.contains(&last.to_lowercase()));
        title_hit || author_hit
    })
}

/// The book shown in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBook {
    pub title: String,
    pub author: String,
    pub rationale: String,
    /// Absent when the plan's own choice is not in the catalog.
    pub purchase_url: Option<String>,
}

/// The plan's explicit book when it names one, with a catalog link if any;
/// otherwise the keyword-selected catalog entry.
pub fn resolve_book(plan: &Plan, language: Language) -> ResolvedBook {
    let book = &plan.thirty_day_protocol.book_recommendation;
    if !book.title.trim().is_empty() {
        let link = find_catalog_match(&book.title, &book.author);
        let rationale = if book.why_this_book.trim().is_empty() {
            link.map(|e| e.rationale(language).to_string()).unwrap_or_default()
        } else {
            book.why_this_book.clone()
        };
        return ResolvedBook {
            title: book.title.clone(),
            author: book.author.clone(),
            rationale,
            purchase_url: link.map(|e| e.purchase_url.to_string()),
        };
    }

    let entry = select_book(plan);
    ResolvedBook {
        title: entry.title.to_string(),
        author: entry.author.to_string(),
        rationale: entry.rationale(language).to_string(),
        purchase_url: Some(entry.purchase_url.to_string()),
    }
}

// --- Postscripts ---

/// Keyword category checked by a postscript rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// The user named their pattern in their own words.
    Pattern,
    Business,
    Relationship,
    Body,
}

/// Plan text a rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanField {
    PatternExactWords,
    PatternCost,
    PatternTrigger,
    EnvironmentCurrentState,
    EnvironmentBlock,
    IdentityBlock,
    PurposeBlock,
    EnergyReality,
    ObservablePatterns,
}

impl PlanField {
    fn text(self, plan: &Plan) -> String {
        let d = &plan.domain_breakdown;
        match self {
            PlanField::PatternExactWords => plan.pattern_analysis.pattern_exact_words.clone(),
            PlanField::PatternCost => plan.pattern_analysis.pattern_cost.clone(),
            PlanField::PatternTrigger => plan.pattern_analysis.pattern_trigger.clone(),
            PlanField::EnvironmentCurrentState => d.environment.current_state.clone(),
            PlanField::EnvironmentBlock => d.environment.block.clone(),
            PlanField::IdentityBlock => d.identity.block.clone(),
            PlanField::PurposeBlock => d.purpose.block.clone(),
            PlanField::EnergyReality => plan.energy_assessment.energy_reality.clone(),
            PlanField::ObservablePatterns => plan.energy_assessment.observable_patterns.join(" "),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub category: Category,
    pub field: PlanField,
}

const fn rule(category: Category, field: PlanField) -> Rule {
    Rule { category, field }
}

const BUSINESS_WORDS: &[&str] = &[
    "money", "business", "owner", "rent", "bills", "debt", "payroll", "sales", "financ",
    "dinero", "negocio", "dueñ", "renta", "deuda", "nómina", "nomina", "ventas", "cuentas",
];

const RELATIONSHIP_WORDS: &[&str] = &[
    "partner", "wife", "husband", "kids", "family", "friend", "relationship", "marriage",
    "pareja", "esposa", "esposo", "hijos", "familia", "amig", "relación", "relacion",
    "matrimonio",
];

const BODY_WORDS: &[&str] = &[
    "sleep", "pain", "body", "health", "meals", "eating", "drinking", "headache", "tired",
    "dormir", "sueño", "dolor", "cuerpo", "salud", "comida", "beber", "cansad",
];

impl Category {
    fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::Pattern => &[],
            Category::Business => BUSINESS_WORDS,
            Category::Relationship => RELATIONSHIP_WORDS,
            Category::Body => BODY_WORDS,
        }
    }
}

const PATTERN_CHECK_IN_RULES: &[Rule] = &[
    rule(Category::Body, PlanField::EnergyReality),
    rule(Category::Relationship, PlanField::EnvironmentBlock),
    rule(Category::Pattern, PlanField::PatternExactWords),
];

const FIRST_WEEK_RULES: &[Rule] = &[
    rule(Category::Body, PlanField::ObservablePatterns),
    rule(Category::Business, PlanField::EnvironmentBlock),
    rule(Category::Pattern, PlanField::PatternExactWords),
];

const MIDPOINT_RULES: &[Rule] = &[
    rule(Category::Business, PlanField::EnvironmentCurrentState),
    rule(Category::Relationship, PlanField::IdentityBlock),
    rule(Category::Pattern, PlanField::PatternExactWords),
];

const FINAL_STRETCH_RULES: &[Rule] = &[
    rule(Category::Relationship, PlanField::EnvironmentBlock),
    rule(Category::Body, PlanField::PatternCost),
    rule(Category::Pattern, PlanField::PatternExactWords),
];

const THIRTY_DAY_RULES: &[Rule] = &[
    rule(Category::Business, PlanField::PurposeBlock),
    rule(Category::Relationship, PlanField::PatternTrigger),
    rule(Category::Pattern, PlanField::PatternExactWords),
];

/// Ordered rules for one drip email. Keyword checks come first; the pattern
/// rule matches any plan that names a pattern, so it closes every list.
pub fn rules_for(email_type: EmailType) -> &'static [Rule] {
    match email_type {
        EmailType::PatternCheckIn => PATTERN_CHECK_IN_RULES,
        EmailType::FirstWeek => FIRST_WEEK_RULES,
        EmailType::Midpoint => MIDPOINT_RULES,
        EmailType::FinalStretch => FINAL_STRETCH_RULES,
        EmailType::ThirtyDay => THIRTY_DAY_RULES,
    }
}

fn present(text: &str, language: Language) -> bool {
    let t = text.trim();
    !t.is_empty() && t != crate::script::pack(language).placeholder
}

/// The first rule that matches the plan, if any.
pub fn matching_rule(email_type: EmailType, plan: &Plan, language: Language) -> Option<Rule> {
    rules_for(email_type).iter().copied().find(|r| match r.category {
        Category::Pattern => present(&plan.pattern_analysis.pattern_exact_words, language),
        keyword => {
            let text = r.field.text(plan).to_lowercase();
            keyword.keywords().iter().any(|k| mentions(&text, k))
        }
    })
}

/// The personalised postscript for a drip email, or the generic one.
pub fn postscript(email_type: EmailType, plan: Option<&Plan>, language: Language) -> String {
    let matched = plan.and_then(|p| matching_rule(email_type, p, language).map(|r| (p, r)));
    let Some((plan, rule)) = matched else {
        return generic_postscript(language).to_string();
    };

    let pattern = plan.pattern_analysis.pattern_exact_words.trim();
    let kitchen = if present(&plan.kitchen_term, language) {
        plan.kitchen_term.trim()
    } else {
        match language {
            Language::En => "work",
            Language::Es => "el trabajo",
        }
    };

    match (rule.category, language) {
        (Category::Pattern, Language::En) => format!(
            "P.S. You called it {pattern}. When you catch it this week, just name it. Noticing is the first rep."
        ),
        (Category::Pattern, Language::Es) => format!(
            "P.D. Lo llamaste {pattern}. Cuando lo notes esta semana, solo nómbralo. Darte cuenta es la primera repetición."
        ),
        (Category::Business, Language::En) => format!(
            "P.S. The money side of {kitchen} is real pressure. Recovery has to fit inside that reality, so keep this week's practice small enough to survive a bad sales night."
        ),
        (Category::Business, Language::Es) => format!(
            "P.D. La parte del dinero en {kitchen} es presión real. La recuperación tiene que caber dentro de esa realidad, así que mantén la práctica de esta semana lo bastante pequeña para sobrevivir una mala noche de ventas."
        ),
        (Category::Relationship, Language::En) => format!(
            "P.S. The people waiting for you outside {kitchen} feel your recovery too. Tell one of them what you are working on this week."
        ),
        (Category::Relationship, Language::Es) => format!(
            "P.D. Las personas que te esperan fuera de {kitchen} también sienten tu recuperación. Cuéntale a una de ellas en qué estás trabajando esta semana."
        ),
        (Category::Body, Language::En) => "P.S. Your body has been keeping score of every double. Tonight, give it ten quiet minutes before sleep. That counts.".to_string(),
        (Category::Body, Language::Es) => "P.D. Tu cuerpo ha llevado la cuenta de cada doble turno. Esta noche dale diez minutos de calma antes de dormir. Eso cuenta.".to_string(),
    }
}

/// Postscript used when no rule matches or there is no plan.
pub fn generic_postscript(language: Language) -> &'static str {
    match language {
        Language::En => "P.S. Small and repeated beats big and rare. Whatever you did this week counts.",
        Language::Es => "P.D. Lo pequeño y constante gana a lo grande y ocasional. Lo que hiciste esta semana cuenta.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_core::plan::NextSteps;

    fn blank_pattern_plan() -> Plan {
        let mut plan = crate::fallback::default_plan(Language::En, &NextSteps::default());
        let pa = &mut plan.pattern_analysis;
        pa.pattern_exact_words = String::new();
        pa.pattern_reframe = String::new();
        pa.pattern_trigger = String::new();
        pa.protective_function = String::new();
        pa.synthesized_truth = String::new();
        plan
    }

    #[test]
    fn catalog_has_unique_ids_and_tags() {
        let mut ids: Vec<&str> = CATALOG.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        for entry in &CATALOG {
            assert!(!entry.tags.is_empty());
            for tag in entry.tags {
                assert_eq!(tag.to_lowercase(), *tag);
            }
        }
    }

    #[test]
    fn spanish_perfectionism_selects_perfectionism_entry() {
        let mut plan = blank_pattern_plan();
        plan.pattern_analysis.pattern_exact_words = "perfeccionismo".into();
        assert_eq!(select_book(&plan).id, "perfectionism");
    }

    #[test]
    fn zero_score_returns_default() {
        let plan = blank_pattern_plan();
        assert_eq!(select_book(&plan), default_book());
    }

    #[test]
    fn highest_score_wins_and_ties_keep_catalog_order() {
        let mut plan = blank_pattern_plan();
        plan.pattern_analysis.pattern_trigger = "I never rest, no sleep, no day off, and I am stressed".into();
        assert_eq!(select_book(&plan).id, "rest");

        plan.pattern_analysis.pattern_trigger = "stress and sleep".into();
        assert_eq!(select_book(&plan).id, "stress-cycle");
    }

    #[test]
    fn restaurant_alone_selects_industry_identity() {
        let mut plan = blank_pattern_plan();
        plan.pattern_analysis.pattern_exact_words = "the restaurant is my whole life".into();
        assert_eq!(select_book(&plan).id, "industry-identity");

        plan.pattern_analysis.pattern_exact_words = "no interest in anything but the menu".into();
        assert_eq!(select_book(&plan), default_book());
    }

    #[test]
    fn keywords_match_at_word_starts_only() {
        assert!(mentions("setting boundaries", "boundar"));
        assert!(mentions("(rent) is due", "rent"));
        assert!(!mentions("the current menu", "rent"));
        assert!(!mentions("back in spain", "pain"));
        assert!(mentions("perfeccionismo", "perfeccion"));
    }

    #[test]
    fn every_rule_list_ends_with_the_pattern_rule() {
        for email_type in EmailType::SEQUENCE {
            let rules = rules_for(email_type);
            assert_eq!(rules.last().map(|r| r.category), Some(Category::Pattern));
            assert_eq!(
                rules.iter().filter(|r| r.category == Category::Pattern).count(),
                1
            );
        }
    }

    #[test]
    fn pattern_check_in_prefers_body_and_relationship_signals() {
        let mut plan = blank_pattern_plan();
        plan.pattern_analysis.pattern_exact_words = "carrying everything".into();
        plan.energy_assessment.energy_reality = "I can barely sleep".into();
        let rule = matching_rule(EmailType::PatternCheckIn, &plan, Language::En).unwrap();
        assert_eq!(rule.category, Category::Body);

        plan.energy_assessment.energy_reality = "steady".into();
        plan.domain_breakdown.environment.block = "My family never sees me".into();
        let rule = matching_rule(EmailType::PatternCheckIn, &plan, Language::En).unwrap();
        assert_eq!(rule.category, Category::Relationship);

        plan.domain_breakdown.environment.block = "quiet".into();
        let rule = matching_rule(EmailType::PatternCheckIn, &plan, Language::En).unwrap();
        assert_eq!(rule.category, Category::Pattern);
    }

    #[test]
    fn selection_is_deterministic() {
        let plan = crate::fallback::default_plan(Language::Es, &NextSteps::default());
        let first = select_book(&plan);
        for _ in 0..10 {
            assert_eq!(select_book(&plan), first);
        }
    }

    #[test]
    fn explicit_book_keeps_display_text_and_recovers_link() {
        let mut plan = blank_pattern_plan();
        let book = &mut plan.thirty_day_protocol.book_recommendation;
        book.title = "Atomic Habits: An Easy & Proven Way".into();
        book.author = "J. Clear".into();
        book.why_this_book = "Because you said routine saves you.".into();

        let resolved = resolve_book(&plan, Language::En);
        assert_eq!(resolved.title, "Atomic Habits: An Easy & Proven Way");
        assert_eq!(resolved.rationale, "Because you said routine saves you.");
        assert_eq!(
            resolved.purchase_url.as_deref(),
            Some("https://bookshop.org/search?keywords=atomic+habits")
        );
    }

    #[test]
    fn author_last_name_matches() {
        let found = find_catalog_match("Hiperestrés", "Emily Nagoski y Amelia Nagoski").unwrap();
        assert_eq!(found.id, "stress-cycle");
    }

    #[test]
    fn unknown_explicit_book_has_no_link() {
        let mut plan = blank_pattern_plan();
        let book = &mut plan.thirty_day_protocol.book_recommendation;
        book.title = "The Body Keeps the Score".into();
        book.author = "Bessel van der Kolk".into();
        let resolved = resolve_book(&plan, Language::En);
        assert_eq!(resolved.title, "The Body Keeps the Score");
        assert_eq!(resolved.purchase_url, None);
    }

    #[test]
    fn missing_book_falls_back_to_selection() {
        let mut plan = blank_pattern_plan();
        plan.thirty_day_protocol.book_recommendation.title = String::new();
        plan.pattern_analysis.pattern_exact_words = "I'm the owner, I can't say no".into();
        let resolved = resolve_book(&plan, Language::Es);
        assert_eq!(resolved.title, "Set Boundaries, Find Peace");
        assert!(resolved.rationale.starts_with("Lenguaje práctico"));
        assert!(resolved.purchase_url.is_some());
    }

    #[test]
    fn first_matching_rule_wins() {
        let mut plan = blank_pattern_plan();
        plan.energy_assessment.observable_patterns = vec!["Skipping meals".into()];
        plan.domain_breakdown.environment.block = "Payroll and rent every month".into();
        let rule = matching_rule(EmailType::FirstWeek, &plan, Language::En).unwrap();
        assert_eq!(rule.category, Category::Body);

        plan.energy_assessment.observable_patterns = vec!["Pacing the floor".into()];
        let rule = matching_rule(EmailType::FirstWeek, &plan, Language::En).unwrap();
        assert_eq!(rule.category, Category::Business);
    }

    #[test]
    fn placeholder_pattern_does_not_count() {
        let mut plan = blank_pattern_plan();
        plan.pattern_analysis.pattern_exact_words = "Not specified".into();
        plan.energy_assessment.energy_reality = "steady".into();
        plan.domain_breakdown.environment.block = "quiet".into();
        assert_eq!(matching_rule(EmailType::PatternCheckIn, &plan, Language::En), None);
        assert_eq!(
            postscript(EmailType::PatternCheckIn, Some(&plan), Language::En),
            generic_postscript(Language::En)
        );
    }

    #[test]
    fn pattern_postscript_interpolates_words() {
        let mut plan = blank_pattern_plan();
        plan.pattern_analysis.pattern_exact_words = "\"lo cargo todo\"".into();
        let ps = postscript(EmailType::PatternCheckIn, Some(&plan), Language::Es);
        assert!(ps.starts_with("P.D. Lo llamaste \"lo cargo todo\"."));
    }

    #[test]
    fn no_plan_gets_generic_postscript() {
        for email_type in EmailType::SEQUENCE {
            assert_eq!(
                postscript(email_type, None, Language::Es),
                generic_postscript(Language::Es)
            );
        }
    }
}
