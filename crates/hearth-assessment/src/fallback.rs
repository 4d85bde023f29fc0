// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generic, fully populated plans used when extraction cannot be trusted.

use hearth_core::Language;
use hearth_core::plan::{
    BookRecommendation, BottomLine, DomainAssessment, DomainBreakdown, EnergyAssessment,
    ImmediateAction, NextSteps, PatternAnalysis, Plan, ThirtyDayProtocol, WeekFocus,
    WeeklyBreakdown,
};

/// A schema-complete plan with generic text in `language`.
///
/// `next_steps` comes from configuration; every other leaf is authored here.
pub fn default_plan(language: Language, next_steps: &NextSteps) -> Plan {
    let mut plan = match language {
        Language::En => english(),
        Language::Es => spanish(),
    };
    plan.next_steps = next_steps.clone();
    plan
}

/// The generic daily action list for `language`, always thirty entries.
pub fn default_daily_actions(language: Language) -> Vec<String> {
    let actions: &[&str] = match language {
        Language::En => &EN_DAILY,
        Language::Es => &ES_DAILY,
    };
    to_strings(actions)
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn domain(current_state: &str, block: &str, growth_edge: &str) -> DomainAssessment {
    DomainAssessment {
        current_state: current_state.to_string(),
        block: block.to_string(),
        growth_edge: growth_edge.to_string(),
    }
}

fn week(focus: &str, practice: &str, marker: &str) -> WeekFocus {
    WeekFocus {
        focus: focus.to_string(),
        practice: practice.to_string(),
        marker: marker.to_string(),
    }
}

fn english() -> Plan {
    Plan {
        kitchen_term: "your kitchen".into(),
        pattern_analysis: PatternAnalysis {
            pattern_exact_words: "\"I just keep going\"".into(),
            pattern_reframe: "Pushing through is a skill that got you through hard services. It was never meant to be the only gear you have.".into(),
            pattern_trigger: "Busy shifts, short staff and the feeling that everything depends on you.".into(),
            protective_function: "Staying in motion keeps you from feeling how tired you really are.".into(),
            pattern_cost: "Your rest, your patience and the parts of you that exist outside of work.".into(),
            proof_of_capability: "You showed up to this conversation and answered honestly. That is the same muscle recovery uses.".into(),
            proof_context: "During this assessment.".into(),
            anchor_habit: "Your first coffee or drink of water of the day.".into(),
            synthesized_truth: "You have been running on effort for a long time. The work you do asks for everything, and you have given it. Recovery is not about caring less. It is about building a life that can hold how much you care.".into(),
        },
        domain_breakdown: DomainBreakdown {
            identity: domain(
                "Much of who you are has become tied to your work.",
                "There is little time or energy left for anything else.",
                "Reconnect with one thing that is yours alone, outside of service.",
            ),
            craft: domain(
                "You still know how to do the work well, even when it feels heavy.",
                "Pace and pressure leave no room to enjoy the skill itself.",
                "Find one moment per shift to do something with full attention.",
            ),
            purpose: domain(
                "The reason you started is still in there, under the fatigue.",
                "Survival mode has pushed the bigger why out of view.",
                "Write down, in one sentence, why this work mattered to you at the start.",
            ),
            environment: domain(
                "Your surroundings demand more than they give back right now.",
                "Hours, money and people pull in different directions.",
                "Name one boundary at work you can hold for the next two weeks.",
            ),
        },
        energy_assessment: EnergyAssessment {
            primary_state: "Running on adrenaline".into(),
            regulation_capacity: "Coming down after a shift takes longer than it should.".into(),
            observable_patterns: to_strings(&[
                "Trouble winding down after service",
                "Skipping meals during shifts",
                "Feeling on edge on days off",
            ]),
            energy_reality: "Most of your energy goes to getting through the next shift, which leaves little for recovering from the last one.".into(),
        },
        thirty_day_protocol: ThirtyDayProtocol {
            seventy_two_hour_action: ImmediateAction {
                anchor: "Your first drink of water after you wake up".into(),
                specific_action: "Stand still and take three slow breaths before you check your phone.".into(),
                time_and_reps: "One minute, every morning for three days".into(),
                why_this_works: "Attaching a tiny action to something you already do makes it stick without willpower.".into(),
            },
            book_recommendation: BookRecommendation {
                title: "Burnout: The Secret to Unlocking the Stress Cycle".into(),
                author: "Emily Nagoski and Amelia Nagoski".into(),
                why_this_book: "It explains why stress stays in the body after the shift ends and gives practical ways to finish the cycle.".into(),
            },
            weekly_breakdown: WeeklyBreakdown {
                week_1: week(
                    "Notice",
                    "Each night, write one sentence about how the shift left you feeling.",
                    "You can name your state without judging it.",
                ),
                week_2: week(
                    "Recover",
                    "Protect ten minutes after every shift for something that calms you down.",
                    "Falling asleep comes a little easier.",
                ),
                week_3: week(
                    "Reconnect",
                    "Spend one hour this week on something unrelated to work.",
                    "You remember a part of yourself you had set aside.",
                ),
                week_4: week(
                    "Sustain",
                    "Choose the two practices that helped most and plan them into next month.",
                    "Your recovery has a rhythm you can keep.",
                ),
            },
            daily_actions: default_daily_actions(Language::En),
        },
        bottom_line: BottomLine {
            paragraph_1: "You have carried a lot, for a long time, mostly without anyone noticing how much it costs.".into(),
            paragraph_2: "That tiredness is not a character flaw. It is what happens when effort has no off switch.".into(),
            paragraph_3: "The next thirty days are about small, repeatable actions that give some of that energy back to you.".into(),
            emphasis_statement: "You do not have to burn out to prove you care.".into(),
        },
        pull_quote: "\"I just keep going.\"".into(),
        development_reminders: to_strings(&[
            "Small and repeated beats big and rare.",
            "A bad day is data, not failure.",
            "Rest is part of the work.",
        ]),
        next_steps: NextSteps::default(),
    }
}

fn spanish() -> Plan {
    Plan {
        kitchen_term: "tu cocina".into(),
        pattern_analysis: PatternAnalysis {
            pattern_exact_words: "\"Solo sigo adelante\"".into(),
            pattern_reframe: "Aguantar es una habilidad que te sacó adelante en servicios difíciles. Nunca debió ser tu única velocidad.".into(),
            pattern_trigger: "Turnos pesados, poco personal y la sensación de que todo depende de ti.".into(),
            protective_function: "Mantenerte en movimiento evita que sientas lo cansado que realmente estás.".into(),
            pattern_cost: "Tu descanso, tu paciencia y las partes de ti que existen fuera del trabajo.".into(),
            proof_of_capability: "Llegaste a esta conversación y respondiste con honestidad. Es el mismo músculo que usa la recuperación.".into(),
            proof_context: "Durante esta evaluación.".into(),
            anchor_habit: "Tu primer café o vaso de agua del día.".into(),
            synthesized_truth: "Llevas mucho tiempo funcionando a puro esfuerzo. Tu trabajo pide todo y lo has dado. Recuperarte no es que te importe menos. Es construir una vida que pueda sostener cuánto te importa.".into(),
        },
        domain_breakdown: DomainBreakdown {
            identity: domain(
                "Gran parte de quién eres se ha amarrado a tu trabajo.",
                "Queda poco tiempo y poca energía para cualquier otra cosa.",
                "Recupera una cosa que sea solo tuya, fuera del servicio.",
            ),
            craft: domain(
                "Sigues sabiendo hacer bien el trabajo, aunque se sienta pesado.",
                "El ritmo y la presión no dejan espacio para disfrutar la técnica.",
                "Busca un momento en cada turno para hacer algo con toda tu atención.",
            ),
            purpose: domain(
                "La razón por la que empezaste sigue ahí, debajo del cansancio.",
                "El modo supervivencia tapó el porqué más grande.",
                "Escribe en una oración por qué este trabajo te importaba al principio.",
            ),
            environment: domain(
                "Tu entorno exige más de lo que te devuelve en este momento.",
                "Horarios, dinero y personas jalan en direcciones distintas.",
                "Nombra un límite en el trabajo que puedas sostener las próximas dos semanas.",
            ),
        },
        energy_assessment: EnergyAssessment {
            primary_state: "Funcionando con pura adrenalina".into(),
            regulation_capacity: "Bajar el ritmo después de un turno te toma más de lo que debería.".into(),
            observable_patterns: to_strings(&[
                "Dificultad para desconectarte después del servicio",
                "Saltarte comidas durante el turno",
                "Sentirte tenso en tus días libres",
            ]),
            energy_reality: "Casi toda tu energía se va en sobrevivir el próximo turno, y queda poca para recuperarte del anterior.".into(),
        },
        thirty_day_protocol: ThirtyDayProtocol {
            seventy_two_hour_action: ImmediateAction {
                anchor: "Tu primer vaso de agua al despertar".into(),
                specific_action: "Quédate quieto y respira lento tres veces antes de revisar el teléfono.".into(),
                time_and_reps: "Un minuto, cada mañana durante tres días".into(),
                why_this_works: "Enganchar una acción pequeña a algo que ya haces permite que se quede sin depender de la fuerza de voluntad.".into(),
            },
            book_recommendation: BookRecommendation {
                title: "Hiperestrés (Burnout)".into(),
                author: "Emily Nagoski y Amelia Nagoski".into(),
                why_this_book: "Explica por qué el estrés se queda en el cuerpo después del turno y da formas prácticas de cerrar el ciclo.".into(),
            },
            weekly_breakdown: WeeklyBreakdown {
                week_1: week(
                    "Observar",
                    "Cada noche, escribe una oración sobre cómo te dejó el turno.",
                    "Puedes nombrar tu estado sin juzgarlo.",
                ),
                week_2: week(
                    "Recuperar",
                    "Protege diez minutos después de cada turno para algo que te calme.",
                    "Dormirte se vuelve un poco más fácil.",
                ),
                week_3: week(
                    "Reconectar",
                    "Dedica una hora esta semana a algo que no tenga que ver con el trabajo.",
                    "Recuerdas una parte de ti que habías dejado de lado.",
                ),
                week_4: week(
                    "Sostener",
                    "Elige las dos prácticas que más te ayudaron y agéndalas para el próximo mes.",
                    "Tu recuperación tiene un ritmo que puedes mantener.",
                ),
            },
            daily_actions: default_daily_actions(Language::Es),
        },
        bottom_line: BottomLine {
            paragraph_1: "Has cargado mucho, durante mucho tiempo, casi siempre sin que nadie note lo que te cuesta.".into(),
            paragraph_2: "Ese cansancio no es un defecto de carácter. Es lo que pasa cuando el esfuerzo no tiene botón de apagado.".into(),
            paragraph_3: "Los próximos treinta días se tratan de acciones pequeñas y repetibles que te devuelvan algo de esa energía.".into(),
            emphasis_statement: "No tienes que quemarte para demostrar que te importa.".into(),
        },
        pull_quote: "\"Solo sigo adelante.\"".into(),
        development_reminders: to_strings(&[
            "Lo pequeño y constante gana a lo grande y ocasional.",
            "Un mal día es información, no un fracaso.",
            "Descansar también es parte del trabajo.",
        ]),
        next_steps: NextSteps::default(),
    }
}

const EN_DAILY: [&str; 30] = [
    "Drink a full glass of water before your first coffee.",
    "Take three slow breaths before you walk into work.",
    "Eat one real meal sitting down.",
    "Write one sentence about how today's shift felt.",
    "Step outside for two minutes during your break.",
    "Put your phone in another room for the first ten minutes home.",
    "Stretch your back and shoulders for five minutes.",
    "Tell one coworker something they did well.",
    "Go to bed fifteen minutes earlier than usual.",
    "Notice one moment today when you felt calm.",
    "Say no to one thing that is not yours to carry.",
    "Cook or make something just for yourself.",
    "Take a ten minute walk without headphones.",
    "Write down one thing you are proud of from this week.",
    "Drink water every time you wash your hands at work.",
    "Text someone you have been meaning to reach.",
    "Spend five minutes doing nothing on purpose.",
    "Leave work on time once this week and notice how it feels.",
    "Name the feeling in your body right now.",
    "Read five pages of your book.",
    "Eat something green today.",
    "Ask for help with one task.",
    "Take your full break, start to finish.",
    "Write down why you started this work.",
    "Do one thing this week only for fun.",
    "Thank yourself out loud for showing up.",
    "Plan one rest block into next week.",
    "Notice when your shoulders rise and drop them.",
    "Share one thing from this month with someone you trust.",
    "Choose the practice you will keep going next month.",
];

const ES_DAILY: [&str; 30] = [
    "Toma un vaso de agua completo antes de tu primer café.",
    "Respira lento tres veces antes de entrar al trabajo.",
    "Come una comida de verdad sentado.",
    "Escribe una oración sobre cómo se sintió el turno de hoy.",
    "Sal dos minutos al aire libre durante tu descanso.",
    "Deja el teléfono en otro cuarto los primeros diez minutos en casa.",
    "Estira la espalda y los hombros cinco minutos.",
    "Dile a un compañero algo que hizo bien.",
    "Acuéstate quince minutos antes de lo normal.",
    "Nota un momento de hoy en que te sentiste en calma.",
    "Di que no a una cosa que no te toca cargar.",
    "Cocina o prepara algo solo para ti.",
    "Camina diez minutos sin audífonos.",
    "Escribe algo de esta semana de lo que te sientas orgulloso.",
    "Toma agua cada vez que te laves las manos en el trabajo.",
    "Escríbele a alguien a quien has querido buscar.",
    "Pasa cinco minutos sin hacer nada, a propósito.",
    "Sal a tiempo del trabajo una vez esta semana y nota cómo se siente.",
    "Nombra lo que sientes en el cuerpo ahora mismo.",
    "Lee cinco páginas de tu libro.",
    "Come algo verde hoy.",
    "Pide ayuda con una tarea.",
    "Toma tu descanso completo, de principio a fin.",
    "Escribe por qué empezaste en este trabajo.",
    "Haz una cosa esta semana solo por diversión.",
    "Agradécete en voz alta por presentarte.",
    "Agenda un bloque de descanso para la próxima semana.",
    "Nota cuando se te suben los hombros y bájalos.",
    "Comparte algo de este mes con alguien de confianza.",
    "Elige la práctica que vas a mantener el próximo mes.",
];
