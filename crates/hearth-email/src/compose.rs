// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The six Hearth emails: report delivery and the five-part drip sequence.
//!
//! Every template has a personalised body built from the Plan and a generic
//! body for when no Plan can be loaded. Drip emails end with a postscript
//! chosen by [`hearth_assessment::selection::postscript`].

use hearth_assessment::selection;
use hearth_config::HearthConfig;
use hearth_core::types::{EmailAttachment, OutboundEmail};
use hearth_core::{EmailType, Language, Plan};
use hearth_report::format::{escape_attr, escape_html, inline};

/// Filename of the attached report.
pub const REPORT_FILENAME: &str = "hearth-report.pdf";

/// Who an email goes to, and in which language.
#[derive(Debug, Clone, Copy)]
pub struct Recipient<'a> {
    pub email: &'a str,
    pub display_name: &'a str,
    pub session_id: &'a str,
    pub language: Language,
}

/// Rendered parts of one email before layout.
struct Content {
    subject: String,
    paragraphs: Vec<String>,
    link: Option<(String, String)>,
    postscript: Option<String>,
}

/// Builds [`OutboundEmail`]s from plans and templates.
#[derive(Debug, Clone)]
pub struct EmailComposer {
    from: String,
    from_domain: String,
    reply_to: Option<String>,
    public_base_url: String,
}

impl EmailComposer {
    pub fn new(
        from_name: &str,
        from_address: &str,
        reply_to: Option<String>,
        public_base_url: &str,
    ) -> Self {
        let from_domain = from_address
            .rsplit_once('@')
            .map(|(_, domain)| domain.to_string())
            .unwrap_or_else(|| "localhost".to_string());
        Self {
            from: format!("{from_name} <{from_address}>"),
            from_domain,
            reply_to,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &HearthConfig) -> Self {
        Self::new(
            &config.email.from_name,
            &config.email.from_address,
            config.email.reply_to.clone(),
            &config.service.public_base_url,
        )
    }

    /// Public link to the interactive report.
    pub fn report_url(&self, session_id: &str) -> String {
        format!("{}/v1/sessions/{session_id}/report", self.public_base_url)
    }

    /// Message-ID used for a queued drip email.
    pub fn queue_message_id(&self, entry_id: i64) -> String {
        format!("<hearth-queue-{entry_id}@{}>", self.from_domain)
    }

    /// The report delivery email.
    ///
    /// Attaches the PDF when `pdf` is present, otherwise links to the web report.
    pub fn report_email(
        &self,
        to: &Recipient<'_>,
        plan: Option<&Plan>,
        pdf: Option<Vec<u8>>,
    ) -> OutboundEmail {
        let url = self.report_url(to.session_id);
        let content = report_content(to, plan, pdf.is_some(), &url);
        let attachments = pdf
            .map(|bytes| EmailAttachment {
                filename: REPORT_FILENAME.to_string(),
                content_type: "application/pdf".to_string(),
                bytes,
            })
            .into_iter()
            .collect();
        self.assemble(
            to,
            content,
            attachments,
            format!("<hearth-report-{}@{}>", to.session_id, self.from_domain),
        )
    }

    /// One drip email. `entry_id` keys the Message-ID for duplicate detection.
    pub fn drip_email(
        &self,
        email_type: EmailType,
        entry_id: i64,
        to: &Recipient<'_>,
        plan: Option<&Plan>,
    ) -> OutboundEmail {
        let url = self.report_url(to.session_id);
        let mut content = drip_content(email_type, to, plan, &url);
        content.postscript = Some(selection::postscript(email_type, plan, to.language));
        self.assemble(to, content, Vec::new(), self.queue_message_id(entry_id))
    }

    fn assemble(
        &self,
        to: &Recipient<'_>,
        content: Content,
        attachments: Vec<EmailAttachment>,
        message_id: String,
    ) -> OutboundEmail {
        OutboundEmail {
            from: self.from.clone(),
            to: to.email.to_string(),
            reply_to: self.reply_to.clone(),
            subject: content.subject.clone(),
            html: layout(&content, to.language),
            attachments,
            idempotency_key: Some(message_id),
        }
    }
}

fn present(text: &str) -> Option<&str> {
    let t = text.trim();
    (!t.is_empty()).then_some(t)
}

fn first_name(display_name: &str) -> &str {
    display_name.split_whitespace().next().unwrap_or_default()
}

fn greeting(to: &Recipient<'_>) -> String {
    let name = escape_html(first_name(to.display_name));
    match (to.language, name.is_empty()) {
        (Language::En, false) => format!("Hi {name},"),
        (Language::En, true) => "Hi there,".to_string(),
        (Language::Es, false) => format!("Hola {name}:"),
        (Language::Es, true) => "Hola:".to_string(),
    }
}

fn report_content(to: &Recipient<'_>, plan: Option<&Plan>, attached: bool, url: &str) -> Content {
    let es = to.language == Language::Es;
    let mut paragraphs = vec![greeting(to)];

    let quote = plan.and_then(|p| present(&p.pull_quote));
    let action = plan.and_then(|p| present(&p.thirty_day_protocol.seventy_two_hour_action.specific_action));
    let emphasis = plan.and_then(|p| present(&p.bottom_line.emphasis_statement));

    paragraphs.push(if es {
        "Tu reporte de recuperación está listo. Lo armamos a partir de lo que compartiste, con tus propias palabras.".to_string()
    } else {
        "Your recovery report is ready. We built it from what you shared, in your own words.".to_string()
    });
    if let Some(quote) = quote {
        paragraphs.push(if es {
            format!("Una frase tuya que vale la pena releer: {}", inline(quote))
        } else {
            format!("One thing you said that is worth reading again: {}", inline(quote))
        });
    }
    match action {
        Some(action) => paragraphs.push(if es {
            format!("Empieza por aquí en las próximas 72 horas: {}", inline(action))
        } else {
            format!("Start here in the next 72 hours: {}", inline(action))
        }),
        None => paragraphs.push(if es {
            "Empieza por la acción de 72 horas. Es pequeña a propósito.".to_string()
        } else {
            "Start with the 72-hour action. It is small on purpose.".to_string()
        }),
    }
    if let Some(emphasis) = emphasis {
        paragraphs.push(format!("<strong>{}</strong>", escape_html(emphasis)));
    }
    paragraphs.push(match (es, attached) {
        (false, true) => "Your full report is attached as a PDF. Keep it somewhere you will see it.".to_string(),
        (false, false) => "You can open your full report any time from the link below.".to_string(),
        (true, true) => "Tu reporte completo va adjunto en PDF. Guárdalo donde lo puedas ver.".to_string(),
        (true, false) => "Puedes abrir tu reporte completo cuando quieras desde el enlace de abajo.".to_string(),
    });

    Content {
        subject: if es {
            "Tu reporte de recuperación Hearth".to_string()
        } else {
            "Your Hearth recovery report".to_string()
        },
        paragraphs,
        link: Some((
            if es { "Ver mi reporte" } else { "View my report" }.to_string(),
            url.to_string(),
        )),
        postscript: None,
    }
}

fn drip_content(
    email_type: EmailType,
    to: &Recipient<'_>,
    plan: Option<&Plan>,
    url: &str,
) -> Content {
    let es = to.language == Language::Es;
    let mut paragraphs = vec![greeting(to)];
    let weeks = plan.map(|p| p.thirty_day_protocol.weekly_breakdown.weeks());
    let week = |i: usize| weeks.and_then(|w| present(&w[i].focus));

    let (subject, body): (&str, Vec<String>) = match email_type {
        EmailType::PatternCheckIn => {
            let action = plan.and_then(|p| {
                present(&p.thirty_day_protocol.seventy_two_hour_action.specific_action)
            });
            let body = match (es, action) {
                (false, Some(a)) => vec![
                    format!("Three days ago your report asked you to try one thing: {}", inline(a)),
                    "Did it happen? If it did, notice what made it possible. If it did not, that is information too. Shrink it and try again today.".to_string(),
                ],
                (false, None) => vec![
                    "Three days in. Did you try the first small action from your report?".to_string(),
                    "If it happened, notice what made it possible. If it did not, shrink it and try again today.".to_string(),
                ],
                (true, Some(a)) => vec![
                    format!("Hace tres días tu reporte te pidió probar una sola cosa: {}", inline(a)),
                    "¿Lo hiciste? Si sí, fíjate qué lo hizo posible. Si no, eso también es información. Hazlo más pequeño y vuelve a intentarlo hoy.".to_string(),
                ],
                (true, None) => vec![
                    "Van tres días. ¿Probaste la primera acción pequeña de tu reporte?".to_string(),
                    "Si lo hiciste, fíjate qué lo hizo posible. Si no, hazlo más pequeño y vuelve a intentarlo hoy.".to_string(),
                ],
            };
            (if es { "¿Cómo van tus primeras 72 horas?" } else { "How did your first 72 hours go?" }, body)
        }
        EmailType::FirstWeek => {
            let marker = weeks.and_then(|w| present(&w[0].marker));
            let mut body = Vec::new();
            match (es, week(0)) {
                (false, Some(f)) => body.push(format!("Week one was about {}.", inline(f))),
                (true, Some(f)) => body.push(format!("La primera semana se trató de {}.", inline(f))),
                (false, None) => body.push("One week down.".to_string()),
                (true, None) => body.push("Una semana completa.".to_string()),
            }
            if let Some(m) = marker {
                body.push(if es {
                    format!("La señal que buscábamos: {}", inline(m))
                } else {
                    format!("The sign we were looking for: {}", inline(m))
                });
            }
            if let Some(next) = week(1) {
                body.push(if es {
                    format!("Esta semana el enfoque pasa a {}.", inline(next))
                } else {
                    format!("This week the focus moves to {}.", inline(next))
                });
            }
            (if es { "Una semana después" } else { "One week in" }, body)
        }
        EmailType::Midpoint => {
            let anchor = plan.and_then(|p| present(&p.pattern_analysis.anchor_habit));
            let mut body = vec![if es {
                "Vas a la mitad. La mayoría de la gente abandona aquí, justo cuando empieza a funcionar.".to_string()
            } else {
                "You are halfway. This is where most people drift, right when it starts to work.".to_string()
            }];
            if let Some(a) = anchor {
                body.push(if es {
                    format!("Sigue enganchando todo a lo que ya haces: {}", inline(a))
                } else {
                    format!("Keep hooking everything onto what you already do: {}", inline(a))
                });
            }
            if let Some(next) = week(2) {
                body.push(if es {
                    format!("Semana tres: {}.", inline(next))
                } else {
                    format!("Week three: {}.", inline(next))
                });
            }
            (if es { "La mitad del camino" } else { "Halfway there" }, body)
        }
        EmailType::FinalStretch => {
            let emphasis = plan.and_then(|p| present(&p.bottom_line.emphasis_statement));
            let mut body = vec![if es {
                "Última semana del protocolo.".to_string()
            } else {
                "Final week of the protocol.".to_string()
            }];
            if let Some(f) = week(3) {
                body.push(if es {
                    format!("El enfoque: {}.", inline(f))
                } else {
                    format!("The focus: {}.", inline(f))
                });
            }
            if let Some(e) = emphasis {
                body.push(if es {
                    format!("Lo que te pedimos recordar: <strong>{}</strong>", escape_html(e))
                } else {
                    format!("The line we asked you to remember: <strong>{}</strong>", escape_html(e))
                });
            }
            (if es { "La recta final" } else { "The final stretch" }, body)
        }
        EmailType::ThirtyDay => {
            let quote = plan.and_then(|p| present(&p.pull_quote));
            let booking = plan.and_then(|p| present(&p.next_steps.booking_url));
            let mut body = vec![if es {
                "Treinta días. Sea como sea que hayan salido, llegaste hasta aquí.".to_string()
            } else {
                "Thirty days. However they went, you made it here.".to_string()
            }];
            if let Some(q) = quote {
                body.push(if es {
                    format!("Al principio dijiste {}. ¿Sigue siendo cierto?", inline(q))
                } else {
                    format!("At the start you said {}. Is it still true?", inline(q))
                });
            }
            if let Some(b) = booking {
                body.push(if es {
                    format!(
                        r#"Si quieres hablar de lo que sigue, <a href="{}">agenda una conversación</a>."#,
                        escape_attr(b)
                    )
                } else {
                    format!(
                        r#"If you want to talk about what comes next, <a href="{}">book a conversation</a>."#,
                        escape_attr(b)
                    )
                });
            }
            (if es { "Tus 30 días" } else { "Your 30 days" }, body)
        }
    };
    paragraphs.extend(body);

    Content {
        subject: subject.to_string(),
        paragraphs,
        link: Some((
            if es { "Volver a mi reporte" } else { "Revisit my report" }.to_string(),
            url.to_string(),
        )),
        postscript: None,
    }
}

fn layout(content: &Content, language: Language) -> String {
    let mut body: String = content
        .paragraphs
        .iter()
        .map(|p| format!("<p>{p}</p>\n"))
        .collect();
    if let Some((label, url)) = &content.link {
        body.push_str(&format!(
            "<p><a class=\"button\" href=\"{}\">{}</a></p>\n",
            escape_attr(url),
            escape_html(label)
        ));
    }
    if let Some(ps) = &content.postscript {
        body.push_str(&format!("<p class=\"ps\">{}</p>\n", inline(ps)));
    }
    let signoff = match language {
        Language::En => "With you,<br>Hearth",
        Language::Es => "Contigo,<br>Hearth",
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: Georgia, serif; color: #2b211a; background: #fbf7f2; margin: 0; padding: 24px; line-height: 1.6; }}
.container {{ max-width: 560px; margin: 0 auto; background: #fff; border: 1px solid #e8d6c3; border-radius: 8px; padding: 28px; }}
.button {{ display: inline-block; background: #c8632b; color: #fff; text-decoration: none; padding: 10px 20px; border-radius: 18px; }}
.ps {{ color: #7a6a5a; font-style: italic; }}
</style>
</head>
<body>
<div class="container">
{body}<p>{signoff}</p>
</div>
</body>
</html>
"#,
        lang = language,
        title = escape_html(&content.subject),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_assessment::fallback::default_plan;
    use hearth_core::plan::NextSteps;

    fn composer() -> EmailComposer {
        EmailComposer::new(
            "Hearth",
            "reports@hearth.test",
            Some("care@hearth.test".into()),
            "https://app.hearth.test/",
        )
    }

    fn recipient(language: Language) -> Recipient<'static> {
        Recipient {
            email: "ana@example.com",
            display_name: "Ana María López",
            session_id: "sess-1",
            language,
        }
    }

    fn plan(language: Language) -> Plan {
        default_plan(
            language,
            &NextSteps {
                contact_email: "hello@hearth.test".into(),
                booking_url: "https://hearth.test/book".into(),
                community_url: "https://hearth.test/community".into(),
            },
        )
    }

    #[test]
    fn report_email_attaches_pdf_when_present() {
        let p = plan(Language::En);
        let email = composer().report_email(
            &recipient(Language::En),
            Some(&p),
            Some(b"%PDF".to_vec()),
        );
        assert_eq!(email.attachments.len(), 1);
        assert_eq!(email.attachments[0].filename, REPORT_FILENAME);
        assert_eq!(email.attachments[0].content_type, "application/pdf");
        assert!(email.html.contains("attached"));
        assert_eq!(email.from, "Hearth <reports@hearth.test>");
        assert_eq!(email.reply_to.as_deref(), Some("care@hearth.test"));
        assert_eq!(
            email.idempotency_key.as_deref(),
            Some("<hearth-report-sess-1@hearth.test>")
        );
    }

    #[test]
    fn report_email_links_when_pdf_missing() {
        let p = plan(Language::Es);
        let email = composer().report_email(&recipient(Language::Es), Some(&p), None);
        assert!(email.attachments.is_empty());
        assert!(email
            .html
            .contains("https://app.hearth.test/v1/sessions/sess-1/report"));
        assert_eq!(email.subject, "Tu reporte de recuperación Hearth");
        assert!(email.html.contains("Hola Ana:"));
    }

    #[test]
    fn report_email_without_plan_is_generic() {
        let email = composer().report_email(&recipient(Language::En), None, None);
        assert!(email.html.contains("Start with the 72-hour action."));
    }

    #[test]
    fn every_drip_email_has_a_distinct_subject_and_postscript() {
        let p = plan(Language::En);
        let mut subjects = std::collections::HashSet::new();
        for (i, email_type) in EmailType::SEQUENCE.into_iter().enumerate() {
            let email = composer().drip_email(email_type, i as i64, &recipient(Language::En), Some(&p));
            assert!(email.html.contains("P.S."), "{email_type:?} lacks a postscript");
            assert!(subjects.insert(email.subject));
        }
        assert_eq!(subjects.len(), 5);
    }

    #[test]
    fn drip_without_plan_uses_generic_postscript() {
        let email = composer().drip_email(
            EmailType::Midpoint,
            9,
            &recipient(Language::Es),
            None,
        );
        assert!(email
            .html
            .contains(selection::generic_postscript(Language::Es)));
        assert_eq!(
            email.idempotency_key.as_deref(),
            Some("<hearth-queue-9@hearth.test>")
        );
    }

    #[test]
    fn drip_interpolates_plan_fields() {
        let p = plan(Language::En);
        let email = composer().drip_email(
            EmailType::PatternCheckIn,
            1,
            &recipient(Language::En),
            Some(&p),
        );
        let action = &p.thirty_day_protocol.seventy_two_hour_action.specific_action;
        assert!(email.html.contains(&inline(action)));
    }

    #[test]
    fn display_name_is_escaped() {
        let to = Recipient {
            display_name: "<b>Sam</b>",
            ..recipient(Language::En)
        };
        let email = composer().report_email(&to, None, None);
        assert!(email.html.contains("Hi &lt;b&gt;Sam&lt;/b&gt;,"));
    }

    #[test]
    fn blank_display_name_gets_neutral_greeting() {
        let to = Recipient {
            display_name: " ",
            ..recipient(Language::Es)
        };
        let email = composer().drip_email(EmailType::ThirtyDay, 2, &to, None);
        assert!(email.html.contains("<p>Hola:</p>"));
    }
}
