// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plan to HTML. Pure: identical inputs always give identical bytes.
//!
//! Both variants render the same sections in the same order. The interactive
//! variant wraps each section in a navigable page; the print variant separates
//! sections with explicit page breaks.

use chrono::{Datelike, NaiveDate};
use hearth_assessment::script;
use hearth_assessment::selection::{self, ResolvedBook};
use hearth_core::plan::DomainAssessment;
use hearth_core::{Language, Plan};
use serde::Deserialize;

use crate::format::{escape_attr, escape_html, inline, paragraphs};

/// Presentation variant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Multi-page web view with previous/next navigation.
    #[default]
    Interactive,
    /// Source document for the PDF service.
    Print,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub variant: Variant,
    pub language: Language,
}

struct Labels {
    html_lang: &'static str,
    report_title: &'static str,
    prepared_for: &'static str,
    pattern: &'static str,
    your_words: &'static str,
    reframe: &'static str,
    trigger: &'static str,
    protects: &'static str,
    cost: &'static str,
    proof: &'static str,
    anchor: &'static str,
    truth: &'static str,
    roadmap: &'static str,
    first_72: &'static str,
    week: &'static str,
    day_30: &'static str,
    domains: &'static str,
    domain_names: [&'static str; 4],
    current_state: &'static str,
    block: &'static str,
    growth_edge: &'static str,
    energy: &'static str,
    primary_state: &'static str,
    regulation: &'static str,
    observed: &'static str,
    protocol: &'static str,
    action_72: &'static str,
    specific_action: &'static str,
    time_and_reps: &'static str,
    why: &'static str,
    book: &'static str,
    by: &'static str,
    get_book: &'static str,
    weekly: &'static str,
    focus: &'static str,
    practice: &'static str,
    marker: &'static str,
    daily: &'static str,
    day: &'static str,
    bottom_line: &'static str,
    in_your_words: &'static str,
    next_steps: &'static str,
    contact: &'static str,
    book_call: &'static str,
    community: &'static str,
    reminders: &'static str,
    previous: &'static str,
    next: &'static str,
    page: &'static str,
}

static EN: Labels = Labels {
    html_lang: "en",
    report_title: "Your Recovery Report",
    prepared_for: "Prepared for",
    pattern: "Your Pattern",
    your_words: "In your words",
    reframe: "Another way to see it",
    trigger: "What sets it off",
    protects: "What it protects you from",
    cost: "What it costs you",
    proof: "Proof you can do this",
    anchor: "Your anchor habit",
    truth: "What is really going on",
    roadmap: "Your 30-Day Roadmap",
    first_72: "First 72 hours",
    week: "Week",
    day_30: "Day 30",
    domains: "Four Domains",
    domain_names: ["Identity", "Craft", "Purpose", "Environment"],
    current_state: "Where you are",
    block: "What is in the way",
    growth_edge: "Your growth edge",
    energy: "Your Energy",
    primary_state: "Primary state",
    regulation: "Coming down",
    observed: "What we noticed",
    protocol: "Your 30-Day Protocol",
    action_72: "Your 72-hour action",
    specific_action: "Do this",
    time_and_reps: "How long and how often",
    why: "Why this works",
    book: "Your book",
    by: "by",
    get_book: "Get the book",
    weekly: "Week by week",
    focus: "Focus",
    practice: "Practice",
    marker: "You will know it is working when",
    daily: "Thirty daily actions",
    day: "Day",
    bottom_line: "The Bottom Line",
    in_your_words: "In your own words",
    next_steps: "Next Steps",
    contact: "Write to us",
    book_call: "Book a conversation",
    community: "Join the community",
    reminders: "For the Hard Days",
    previous: "Previous",
    next: "Next",
    page: "Page",
};

static ES: Labels = Labels {
    html_lang: "es",
    report_title: "Tu Reporte de Recuperación",
    prepared_for: "Preparado para",
    pattern: "Tu Patrón",
    your_words: "En tus palabras",
    reframe: "Otra forma de verlo",
    trigger: "Qué lo activa",
    protects: "De qué te protege",
    cost: "Lo que te cuesta",
    proof: "Prueba de que puedes",
    anchor: "Tu hábito ancla",
    truth: "Lo que realmente está pasando",
    roadmap: "Tu Ruta de 30 Días",
    first_72: "Primeras 72 horas",
    week: "Semana",
    day_30: "Día 30",
    domains: "Cuatro Áreas",
    domain_names: ["Identidad", "Oficio", "Propósito", "Entorno"],
    current_state: "Dónde estás",
    block: "Qué se interpone",
    growth_edge: "Tu punto de crecimiento",
    energy: "Tu Energía",
    primary_state: "Estado principal",
    regulation: "Bajar el ritmo",
    observed: "Lo que notamos",
    protocol: "Tu Protocolo de 30 Días",
    action_72: "Tu acción de 72 horas",
    specific_action: "Haz esto",
    time_and_reps: "Cuánto tiempo y con qué frecuencia",
    why: "Por qué funciona",
    book: "Tu libro",
    by: "de",
    get_book: "Consigue el libro",
    weekly: "Semana por semana",
    focus: "Enfoque",
    practice: "Práctica",
    marker: "Sabrás que funciona cuando",
    daily: "Treinta acciones diarias",
    day: "Día",
    bottom_line: "En Resumen",
    in_your_words: "En tus propias palabras",
    next_steps: "Próximos Pasos",
    contact: "Escríbenos",
    book_call: "Agenda una conversación",
    community: "Únete a la comunidad",
    reminders: "Para los Días Difíciles",
    previous: "Anterior",
    next: "Siguiente",
    page: "Página",
};

fn labels(language: Language) -> &'static Labels {
    match language {
        Language::En => &EN,
        Language::Es => &ES,
    }
}

const ES_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Long-form date in the report language.
pub fn format_date(date: NaiveDate, language: Language) -> String {
    match language {
        Language::En => date.format("%B %-d, %Y").to_string(),
        Language::Es => format!(
            "{} de {} de {}",
            date.day(),
            ES_MONTHS[date.month0() as usize],
            date.year()
        ),
    }
}

/// Field access with the placeholder substituted for blank values.
struct Fields {
    placeholder: &'static str,
}

impl Fields {
    fn text<'a>(&self, value: &'a str) -> &'a str {
        if value.trim().is_empty() {
            self.placeholder
        } else {
            value
        }
    }

    fn inline(&self, value: &str) -> String {
        inline(self.text(value))
    }

    fn paragraphs(&self, value: &str) -> String {
        paragraphs(self.text(value))
    }

    fn list<'a>(&self, items: &'a [String]) -> Vec<&'a str> {
        let present: Vec<&str> = items
            .iter()
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
            .collect();
        if present.is_empty() {
            vec![self.placeholder]
        } else {
            present
        }
    }
}

/// Renders the full report document.
pub fn render(
    plan: &Plan,
    client_name: &str,
    session_date: NaiveDate,
    options: &RenderOptions,
) -> String {
    let l = labels(options.language);
    let f = Fields {
        placeholder: script::pack(options.language).placeholder,
    };
    let book = selection::resolve_book(plan, options.language);
    let date = format_date(session_date, options.language);

    let sections = [
        cover(l, &f, plan, client_name, &date),
        pattern_summary(l, &f, plan),
        roadmap(l, &f, plan),
        domain_grid(l, &f, plan),
        energy(l, &f, plan),
        protocol(l, &f, plan, &book),
        bottom_line(l, &f, plan),
        pull_quote(l, &f, plan),
        next_steps(l, &f, plan),
        reminders(l, &f, plan),
    ];

    let body = match options.variant {
        Variant::Print => sections.join("\n<div class=\"page-break\"></div>\n"),
        Variant::Interactive => paginate(l, &sections),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title} | {name}</title>
<style>
{base_css}{variant_css}</style>
</head>
<body class="{variant_class}">
<main class="report">
{body}
</main>
</body>
</html>
"#,
        lang = l.html_lang,
        title = escape_html(l.report_title),
        name = escape_html(f.text(client_name)),
        base_css = BASE_CSS,
        variant_css = match options.variant {
            Variant::Print => PRINT_CSS,
            Variant::Interactive => INTERACTIVE_CSS,
        },
        variant_class = match options.variant {
            Variant::Print => "print",
            Variant::Interactive => "interactive",
        },
    )
}

/// Per-page footer handed to the PDF service alongside the print variant.
pub fn render_footer(client_name: &str, session_date: NaiveDate, language: Language) -> String {
    let l = labels(language);
    let placeholder = script::pack(language).placeholder;
    let name = if client_name.trim().is_empty() {
        placeholder
    } else {
        client_name
    };
    format!(
        r#"<div style="font-family: Georgia, serif; font-size: 8px; color: #7a6a5a; width: 100%; padding: 0 15mm; display: flex; justify-content: space-between;"><span>{title} · {name} · {date}</span><span>{page} <span class="pageNumber"></span> / <span class="totalPages"></span></span></div>"#,
        title = escape_html(l.report_title),
        name = escape_html(name),
        date = escape_html(&format_date(session_date, language)),
        page = l.page,
    )
}

fn paginate(l: &Labels, sections: &[String]) -> String {
    let total = sections.len();
    sections
        .iter()
        .enumerate()
        .map(|(i, content)| {
            let n = i + 1;
            let prev = if n > 1 {
                format!(r##"<a class="prev" href="#page-{}">{}</a>"##, n - 1, l.previous)
            } else {
                String::new()
            };
            let next = if n < total {
                format!(r##"<a class="next" href="#page-{}">{}</a>"##, n + 1, l.next)
            } else {
                String::new()
            };
            format!(
                r#"<section class="page" id="page-{n}">
{content}
<nav class="pager">{prev}<span class="count">{n} / {total}</span>{next}</nav>
</section>"#
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn item(label: &str, value_html: &str) -> String {
    format!(
        r#"<div class="item"><h3>{}</h3><div class="value">{value_html}</div></div>"#,
        escape_html(label)
    )
}

fn cover(l: &Labels, f: &Fields, plan: &Plan, client_name: &str, date: &str) -> String {
    format!(
        r#"<div class="cover">
<h1>{title}</h1>
<p class="client">{prepared} <strong>{name}</strong></p>
<p class="date">{date}</p>
<p class="kitchen">{kitchen}</p>
</div>"#,
        title = escape_html(l.report_title),
        prepared = escape_html(l.prepared_for),
        name = escape_html(f.text(client_name)),
        date = escape_html(date),
        kitchen = f.inline(&plan.kitchen_term),
    )
}

fn pattern_summary(l: &Labels, f: &Fields, plan: &Plan) -> String {
    let pa = &plan.pattern_analysis;
    let proof = format!(
        "{} <span class=\"context\">({})</span>",
        f.inline(&pa.proof_of_capability),
        f.inline(&pa.proof_context)
    );
    [
        format!("<h2>{}</h2>", escape_html(l.pattern)),
        format!(
            r#"<h3>{}</h3>
<blockquote class="exact-words">{}</blockquote>"#,
            escape_html(l.your_words),
            f.inline(&pa.pattern_exact_words)
        ),
        item(l.reframe, &f.inline(&pa.pattern_reframe)),
        item(l.trigger, &f.inline(&pa.pattern_trigger)),
        item(l.protects, &f.inline(&pa.protective_function)),
        item(l.cost, &f.inline(&pa.pattern_cost)),
        item(l.proof, &proof),
        item(l.anchor, &f.inline(&pa.anchor_habit)),
        item(l.truth, &f.paragraphs(&pa.synthesized_truth)),
    ]
    .join("\n")
}

fn roadmap(l: &Labels, f: &Fields, plan: &Plan) -> String {
    let p = &plan.thirty_day_protocol;
    let mut steps = vec![format!(
        r#"<li><span class="when">{}</span> {}</li>"#,
        escape_html(l.first_72),
        f.inline(&p.seventy_two_hour_action.specific_action)
    )];
    for (i, week) in p.weekly_breakdown.weeks().into_iter().enumerate() {
        steps.push(format!(
            r#"<li><span class="when">{} {}</span> {}</li>"#,
            escape_html(l.week),
            i + 1,
            f.inline(&week.focus)
        ));
    }
    steps.push(format!(
        r#"<li><span class="when">{}</span> {}</li>"#,
        escape_html(l.day_30),
        f.inline(&plan.bottom_line.emphasis_statement)
    ));
    format!(
        "<h2>{}</h2>\n<ol class=\"roadmap\">\n{}\n</ol>",
        escape_html(l.roadmap),
        steps.join("\n")
    )
}

fn domain_card(l: &Labels, f: &Fields, name: &str, d: &DomainAssessment) -> String {
    format!(
        r#"<div class="domain">
<h3>{name}</h3>
{current}
{block}
{edge}
</div>"#,
        name = escape_html(name),
        current = item(l.current_state, &f.inline(&d.current_state)),
        block = item(l.block, &f.inline(&d.block)),
        edge = item(l.growth_edge, &f.inline(&d.growth_edge)),
    )
}

fn domain_grid(l: &Labels, f: &Fields, plan: &Plan) -> String {
    let cards: Vec<String> = plan
        .domain_breakdown
        .entries()
        .iter()
        .zip(l.domain_names)
        .map(|((_, d), name)| domain_card(l, f, name, d))
        .collect();
    format!(
        "<h2>{}</h2>\n<div class=\"domain-row\">\n{}\n{}\n</div>\n<div class=\"domain-row\">\n{}\n{}\n</div>",
        escape_html(l.domains),
        cards[0],
        cards[1],
        cards[2],
        cards[3]
    )
}

fn bullet_list(class: &str, items: &[&str]) -> String {
    let lis: Vec<String> = items
        .iter()
        .map(|s| format!("<li>{}</li>", inline(s)))
        .collect();
    format!("<ul class=\"{class}\">\n{}\n</ul>", lis.join("\n"))
}

fn energy(l: &Labels, f: &Fields, plan: &Plan) -> String {
    let e = &plan.energy_assessment;
    [
        format!("<h2>{}</h2>", escape_html(l.energy)),
        item(l.primary_state, &f.inline(&e.primary_state)),
        item(l.regulation, &f.inline(&e.regulation_capacity)),
        item(
            l.observed,
            &bullet_list("observed", &f.list(&e.observable_patterns)),
        ),
        f.paragraphs(&e.energy_reality),
    ]
    .join("\n")
}

fn protocol(l: &Labels, f: &Fields, plan: &Plan, book: &ResolvedBook) -> String {
    let p = &plan.thirty_day_protocol;
    let a = &p.seventy_two_hour_action;

    let action = format!(
        r#"<div class="action">
<h3>{title}</h3>
<p class="anchor">{anchor}</p>
{specific}
{reps}
{why}
</div>"#,
        title = escape_html(l.action_72),
        anchor = f.inline(&a.anchor),
        specific = item(l.specific_action, &f.inline(&a.specific_action)),
        reps = item(l.time_and_reps, &f.inline(&a.time_and_reps)),
        why = item(l.why, &f.inline(&a.why_this_works)),
    );

    let link = match &book.purchase_url {
        Some(url) => format!(
            r#"<p><a class="buy" href="{}">{}</a></p>"#,
            escape_attr(url),
            escape_html(l.get_book)
        ),
        None => String::new(),
    };
    let book_html = format!(
        r#"<div class="book">
<h3>{heading}</h3>
<p class="title"><em>{title}</em> {by} {author}</p>
{rationale}
{link}
</div>"#,
        heading = escape_html(l.book),
        title = f.inline(&book.title),
        by = escape_html(l.by),
        author = f.inline(&book.author),
        rationale = f.paragraphs(&book.rationale),
    );

    let weeks: Vec<String> = p
        .weekly_breakdown
        .weeks()
        .into_iter()
        .enumerate()
        .map(|(i, w)| {
            format!(
                r#"<div class="week">
<h4>{week} {n}</h4>
{focus}
{practice}
{marker}
</div>"#,
                week = escape_html(l.week),
                n = i + 1,
                focus = item(l.focus, &f.inline(&w.focus)),
                practice = item(l.practice, &f.inline(&w.practice)),
                marker = item(l.marker, &f.inline(&w.marker)),
            )
        })
        .collect();

    let days: Vec<String> = f
        .list(&p.daily_actions)
        .iter()
        .enumerate()
        .map(|(i, d)| {
            format!(
                r#"<li><span class="day">{} {}</span> {}</li>"#,
                escape_html(l.day),
                i + 1,
                inline(d)
            )
        })
        .collect();

    format!(
        "<h2>{protocol}</h2>\n{action}\n{book_html}\n<h3>{weekly}</h3>\n<div class=\"weeks\">\n{weeks}\n</div>\n<h3>{daily}</h3>\n<ol class=\"daily\">\n{days}\n</ol>",
        protocol = escape_html(l.protocol),
        weekly = escape_html(l.weekly),
        weeks = weeks.join("\n"),
        daily = escape_html(l.daily),
        days = days.join("\n"),
    )
}

fn bottom_line(l: &Labels, f: &Fields, plan: &Plan) -> String {
    let b = &plan.bottom_line;
    [
        format!("<h2>{}</h2>", escape_html(l.bottom_line)),
        f.paragraphs(&b.paragraph_1),
        f.paragraphs(&b.paragraph_2),
        f.paragraphs(&b.paragraph_3),
        format!(
            r#"<p class="emphasis"><strong>{}</strong></p>"#,
            escape_html(f.text(&b.emphasis_statement))
        ),
    ]
    .join("\n")
}

fn pull_quote(l: &Labels, f: &Fields, plan: &Plan) -> String {
    format!(
        r#"<figure class="pull-quote">
<blockquote>{}</blockquote>
<figcaption>{}</figcaption>
</figure>"#,
        f.inline(&plan.pull_quote),
        escape_html(l.in_your_words)
    )
}

fn next_steps(l: &Labels, f: &Fields, plan: &Plan) -> String {
    let ns = &plan.next_steps;
    let email = f.text(&ns.contact_email);
    let booking = f.text(&ns.booking_url);
    let community = f.text(&ns.community_url);
    format!(
        r#"<h2>{heading}</h2>
<ul class="next-steps">
<li>{contact}: <a href="mailto:{email_attr}">{email}</a></li>
<li><a href="{booking_attr}">{book_call}</a></li>
<li><a href="{community_attr}">{join}</a></li>
</ul>"#,
        heading = escape_html(l.next_steps),
        contact = escape_html(l.contact),
        email_attr = escape_attr(email),
        email = escape_html(email),
        booking_attr = escape_attr(booking),
        book_call = escape_html(l.book_call),
        community_attr = escape_attr(community),
        join = escape_html(l.community),
    )
}

fn reminders(l: &Labels, f: &Fields, plan: &Plan) -> String {
    format!(
        "<h2>{}</h2>\n{}",
        escape_html(l.reminders),
        bullet_list("reminders", &f.list(&plan.development_reminders))
    )
}

const BASE_CSS: &str = r#"body { font-family: Georgia, 'Times New Roman', serif; color: #2b211a; background: #fbf7f2; margin: 0; line-height: 1.6; }
.report { max-width: 760px; margin: 0 auto; padding: 32px 24px; }
h1 { font-size: 34px; margin: 0 0 12px; color: #8a3b12; }
h2 { font-size: 24px; color: #8a3b12; border-bottom: 2px solid #e8d6c3; padding-bottom: 6px; }
h3 { font-size: 15px; text-transform: uppercase; letter-spacing: 0.06em; color: #7a6a5a; margin: 18px 0 4px; }
.cover { text-align: center; padding: 120px 0; }
.exact-words, .pull-quote blockquote { font-size: 22px; font-style: italic; border-left: 4px solid #c8632b; margin: 16px 0; padding: 8px 16px; }
.domain-row { display: flex; gap: 16px; }
.domain { flex: 1; background: #fff; border: 1px solid #e8d6c3; border-radius: 8px; padding: 12px 16px; }
.action, .book, .week { background: #fff; border: 1px solid #e8d6c3; border-radius: 8px; padding: 12px 16px; margin: 12px 0; }
.emphasis { font-size: 19px; color: #8a3b12; }
.day, .when { font-weight: bold; color: #c8632b; margin-right: 6px; }
.context { color: #7a6a5a; }
a { color: #8a3b12; }
"#;

const PRINT_CSS: &str = r#"@page { size: Letter; margin: 15mm 15mm 20mm 15mm; }
.page-break { page-break-after: always; break-after: page; }
body { background: #fff; }
.cover { padding: 200px 0; }
"#;

const INTERACTIVE_CSS: &str = r#".page { display: none; min-height: 80vh; }
.page:target, .page:first-of-type { display: block; }
main:has(.page:target) .page:first-of-type:not(:target) { display: none; }
.pager { display: flex; justify-content: space-between; align-items: center; margin-top: 32px; font-size: 14px; }
.pager a { text-decoration: none; padding: 6px 14px; border: 1px solid #c8632b; border-radius: 16px; }
.pager .count { color: #7a6a5a; }
"#;
