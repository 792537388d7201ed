//! Circle geometry: radius, diameter, circumference, area.
//!
//! Answers involving π are approximate. Tokens carry a tolerance of 1% of the
//! answer (never below 0.1) so learners using 3.14 instead of π are accepted.

use std::f64::consts::PI;

use rand::Rng;

use crate::answer_token::CanonicalAnswer;
use crate::practice_engine::{
    helpers::{
        clamp_level, draft, hint, hint_formula, level_of, localized, num, num_local,
        payload, payload_with_figure, should_escalate, tr, ProblemDraft,
    },
    models::{AnswerShape, Figure, Lang, SelectionConstraints, VariationDescriptor},
    random::{rand_float, rand_int, round_to},
    selector::VariationPool,
};

pub const FOUNDATIONAL: &str = "radius_diameter";

pub const LEVEL_1: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::concept("radius_diameter"),
        VariationDescriptor::concept("pi_meaning"),
        VariationDescriptor::calculate("circumference"),
    ],
    "circumference",
);

pub const LEVEL_2: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::calculate("area"),
        VariationDescriptor::calculate("area_from_diameter"),
        VariationDescriptor::calculate("radius_from_circumference"),
    ],
    "area",
);

pub const POOLS: &[VariationPool] = &[LEVEL_1, LEVEL_2];

const UNIT: &str = "cm";

pub fn generate<R: Rng>(
    rng: &mut R,
    level: u8,
    lang: Lang,
    constraints: &SelectionConstraints,
) -> ProblemDraft {
    let level = clamp_level(level, POOLS.len());
    if should_escalate(level, constraints, FOUNDATIONAL) {
        return level2(rng, lang, None, constraints);
    }
    match level {
        1 => level1(rng, lang, None, constraints),
        _ => level2(rng, lang, None, constraints),
    }
}

pub fn generate_by_variation<R: Rng>(rng: &mut R, key: &str, lang: Lang) -> Option<ProblemDraft> {
    let open = SelectionConstraints::default();
    let draft = match level_of(POOLS, key)? {
        1 => level1(rng, lang, Some(key), &open),
        _ => level2(rng, lang, Some(key), &open),
    };
    Some(draft)
}

/// Allowed deviation for a π-based answer.
pub fn pi_tolerance(answer: f64) -> f64 {
    round_to((answer.abs() * 0.01).max(0.1), 2)
}

fn circle(radius: f64, show_radius: bool) -> Figure {
    Figure::Circle {
        radius,
        show_radius,
        show_diameter: !show_radius,
        unit: UNIT.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Level 1
// ---------------------------------------------------------------------------

pub fn level1<R: Rng>(
    rng: &mut R,
    lang: Lang,
    variant: Option<&str>,
    constraints: &SelectionConstraints,
) -> ProblemDraft {
    match LEVEL_1.resolve(rng, variant, constraints) {
        "radius_diameter" => radius_diameter(rng, lang),
        "pi_meaning" => pi_meaning(rng, lang),
        _ => circumference(rng, lang),
    }
}

fn radius_diameter<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let d = rand_int(rng, 3, 40);
    let r = d as f64 / 2.0;

    let description = localized(
        lang,
        format!("En cirkel har diametern {d} {UNIT}. Hur lång är radien?"),
        format!("A circle has diameter {d} {UNIT}. How long is the radius?"),
    );
    let hints = vec![
        hint(tr(
            lang,
            "Radien går från mittpunkten till kanten; diametern går tvärs över hela cirkeln.",
            "The radius runs from the centre to the edge; the diameter runs all the way across.",
        )),
        hint_formula(tr(lang, "Radien är halva diametern.", "The radius is half the diameter."), "r = \\frac{d}{2}"),
    ];

    draft(lang, &LEVEL_1, 1, "radius_diameter",
        payload_with_figure(description, Some(format!("d = {d}")), AnswerShape::Number, circle(r, false)),
        CanonicalAnswer::from(r), 0.0, hints)
}

fn pi_meaning<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let d = rand_int(rng, 2, 20);
    let c = round_to(PI * d as f64, 2);
    let ratio = round_to(PI, 2);

    let description = localized(
        lang,
        format!(
            "En cirkel med diametern {d} {UNIT} har omkretsen {} {UNIT}. Vad blir omkretsen delat med diametern (två decimaler)?",
            num_local(lang, c)
        ),
        format!(
            "A circle with diameter {d} {UNIT} has circumference {} {UNIT}. What is the circumference divided by the diameter (two decimals)?",
            num(c)
        ),
    );
    let hints = vec![
        hint(tr(
            lang,
            "Kvoten mellan omkrets och diameter är samma för alla cirklar.",
            "The ratio of circumference to diameter is the same for every circle.",
        )),
        hint_formula(tr(lang, "Den kvoten kallas π.", "That ratio is called π."), "\\frac{C}{d} = \\pi"),
    ];

    draft(lang, &LEVEL_1, 1, "pi_meaning",
        payload_with_figure(description, Some(format!("\\frac{{{}}}{{{d}}}", num(c))), AnswerShape::Number, circle(d as f64 / 2.0, false)),
        CanonicalAnswer::from(ratio), 0.01, hints)
}

fn circumference<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let r = rand_float(rng, 1.0, 15.0, 1);
    let c = round_to(2.0 * PI * r, 1);

    let description = localized(
        lang,
        format!("Beräkna omkretsen av en cirkel med radien {} {UNIT}. Avrunda till en decimal.", num_local(lang, r)),
        format!("Find the circumference of a circle with radius {} {UNIT}. Round to one decimal.", num(r)),
    );
    let hints = vec![
        hint_formula(tr(lang, "Omkretsen är π gånger diametern.", "The circumference is π times the diameter."), "C = 2\\pi r"),
        hint_formula(
            tr(lang, "Sätt in radien.", "Substitute the radius."),
            format!("C = 2 \\cdot \\pi \\cdot {} \\approx {}", num(r), num(c)),
        ),
    ];

    draft(lang, &LEVEL_1, 1, "circumference",
        payload_with_figure(description, Some("C = 2\\pi r".to_string()), AnswerShape::Number, circle(r, true)),
        CanonicalAnswer::from(c), pi_tolerance(c), hints)
}

// ---------------------------------------------------------------------------
// Level 2
// ---------------------------------------------------------------------------

pub fn level2<R: Rng>(
    rng: &mut R,
    lang: Lang,
    variant: Option<&str>,
    constraints: &SelectionConstraints,
) -> ProblemDraft {
    match LEVEL_2.resolve(rng, variant, constraints) {
        "area_from_diameter" => area_from_diameter(rng, lang),
        "radius_from_circumference" => radius_from_circumference(rng, lang),
        _ => area(rng, lang),
    }
}

fn area<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let r = rand_int(rng, 1, 12) as f64;
    let a = round_to(PI * r * r, 1);

    let description = localized(
        lang,
        format!("Beräkna arean av en cirkel med radien {} {UNIT}. Avrunda till en decimal.", num(r)),
        format!("Find the area of a circle with radius {} {UNIT}. Round to one decimal.", num(r)),
    );
    let hints = vec![
        hint_formula(tr(lang, "Arean av en cirkel:", "Area of a circle:"), "A = \\pi r^2"),
        hint_formula(
            tr(lang, "Kvadrera radien först.", "Square the radius first."),
            format!("A = \\pi \\cdot {}^2 = \\pi \\cdot {} \\approx {}", num(r), num(r * r), num(a)),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "area",
        payload_with_figure(description, Some("A = \\pi r^2".to_string()), AnswerShape::Number, circle(r, true)),
        CanonicalAnswer::from(a), pi_tolerance(a), hints)
}

fn area_from_diameter<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let d = rand_int(rng, 2, 24);
    let r = d as f64 / 2.0;
    let a = round_to(PI * r * r, 1);

    let description = localized(
        lang,
        format!("En cirkel har diametern {d} {UNIT}. Beräkna arean med en decimal."),
        format!("A circle has diameter {d} {UNIT}. Find its area to one decimal."),
    );
    let hints = vec![
        hint_formula(
            tr(lang, "Börja med radien.", "Start with the radius."),
            format!("r = \\frac{{{d}}}{{2}} = {}", num(r)),
        ),
        hint_formula(
            tr(lang, "Använd areaformeln.", "Use the area formula."),
            format!("A = \\pi \\cdot {}^2 \\approx {}", num(r), num(a)),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "area_from_diameter",
        payload_with_figure(description, Some(format!("d = {d}")), AnswerShape::Number, circle(r, false)),
        CanonicalAnswer::from(a), pi_tolerance(a), hints)
}

fn radius_from_circumference<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let r = rand_int(rng, 2, 20) as f64;
    let c = round_to(2.0 * PI * r, 2);

    let description = localized(
        lang,
        format!("En cirkel har omkretsen {} {UNIT}. Hur lång är radien? Avrunda till en decimal.", num_local(lang, c)),
        format!("A circle has circumference {} {UNIT}. How long is the radius? Round to one decimal.", num(c)),
    );
    let hints = vec![
        hint_formula(tr(lang, "Lös ut r ur omkretsformeln.", "Solve the circumference formula for r."), "r = \\frac{C}{2\\pi}"),
        hint_formula(
            tr(lang, "Sätt in omkretsen.", "Substitute the circumference."),
            format!("r = \\frac{{{}}}{{2\\pi}} \\approx {}", num(c), num(r)),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "radius_from_circumference",
        payload(description, Some(format!("C = {}", num(c))), AnswerShape::Number),
        CanonicalAnswer::from(r), 0.1, hints)
}
