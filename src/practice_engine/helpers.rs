//! Shared builder functions used by every topic generator.
//!
//! Topic files pick numbers and write the bilingual text; everything that is
//! the same for all of them (language switch, hint steps, the final answer
//! step, the escalation guard, level clamping) lives here.

use crate::answer_token::CanonicalAnswer;
use crate::practice_engine::{
    models::{AnswerShape, Figure, HintStep, Lang, RenderPayload, SelectionConstraints, VariationKind},
    selector::VariationPool,
};

/// A generated problem before its answer is sealed into a token.
#[derive(Debug, Clone)]
pub struct ProblemDraft {
    pub level: u8,
    pub variation_key: &'static str,
    pub kind: VariationKind,
    pub presentation: RenderPayload,
    pub answer: CanonicalAnswer,
    pub tolerance: f64,
    pub hints: Vec<HintStep>,
}

/// Pick the Swedish or English wording.
pub fn localized(lang: Lang, sv: String, en: String) -> String {
    match lang {
        Lang::Sv => sv,
        Lang::En => en,
    }
}

/// `localized` for fixed strings.
pub fn tr(lang: Lang, sv: &str, en: &str) -> String {
    match lang {
        Lang::Sv => sv.to_string(),
        Lang::En => en.to_string(),
    }
}

/// Hint step with text only.
pub fn hint(text: impl Into<String>) -> HintStep {
    HintStep { text: Some(text.into()), formula: None }
}

/// Hint step with explanatory text and a formula.
pub fn hint_formula(text: impl Into<String>, formula: impl Into<String>) -> HintStep {
    HintStep {
        text: Some(text.into()),
        formula: Some(formula.into()),
    }
}

/// Final hint step: restates the canonical answer in readable form.
pub fn answer_step(lang: Lang, answer: &CanonicalAnswer) -> HintStep {
    hint_formula(tr(lang, "Svar:", "Answer:"), answer.human_readable())
}

/// Presentation payload without a figure.
pub fn payload(description: String, formula: Option<String>, shape: AnswerShape) -> RenderPayload {
    RenderPayload {
        description,
        formula,
        answer_shape: Some(shape),
        figure: None,
    }
}

/// Presentation payload carrying a visual figure.
pub fn payload_with_figure(
    description: String,
    formula: Option<String>,
    shape: AnswerShape,
    figure: Figure,
) -> RenderPayload {
    RenderPayload {
        figure: Some(figure),
        ..payload(description, formula, shape)
    }
}

/// Assemble a [`ProblemDraft`].
///
/// The answer must already be computed; the closing answer step is appended
/// here so no generator can forget it.
pub fn draft(
    lang: Lang,
    pool: &VariationPool,
    level: u8,
    key: &'static str,
    presentation: RenderPayload,
    answer: CanonicalAnswer,
    tolerance: f64,
    mut hints: Vec<HintStep>,
) -> ProblemDraft {
    hints.push(answer_step(lang, &answer));
    ProblemDraft {
        level,
        variation_key: key,
        kind: pool.kind_of(key),
        presentation,
        answer,
        tolerance,
        hints,
    }
}

/// Clamp a requested level into `1..=max_level`.
pub fn clamp_level(level: u8, max_level: usize) -> u8 {
    let max = u8::try_from(max_level).unwrap_or(u8::MAX).max(1);
    level.clamp(1, max)
}

/// Adaptive escalation: a level-1 request from a learner who hides concept
/// questions and has excluded the foundational variation is served level 2.
pub fn should_escalate(level: u8, constraints: &SelectionConstraints, foundational: &str) -> bool {
    level == 1 && constraints.hide_concept && constraints.is_excluded(foundational)
}

/// 1-based level whose pool declares `key`.
pub fn level_of(pools: &[VariationPool], key: &str) -> Option<u8> {
    pools
        .iter()
        .position(|pool| pool.contains(key))
        .and_then(|i| u8::try_from(i + 1).ok())
}

/// Format a number for display inside problem text (same rules as canonical answers).
pub fn num(v: f64) -> String {
    crate::answer_token::format_number(v)
}

/// Swedish text uses a decimal comma; English a decimal point.
pub fn num_local(lang: Lang, v: f64) -> String {
    match lang {
        Lang::Sv => num(v).replace('.', ","),
        Lang::En => num(v),
    }
}
