//! Scale: maps and drawings, reductions and enlargements.
//!
//! "Find the scale" answers are structured ratios and accept `1:50` or the
//! JSON object form on submission.

use rand::Rng;

use crate::answer_token::CanonicalAnswer;
use crate::practice_engine::{
    helpers::{
        clamp_level, draft, hint, hint_formula, level_of, localized, num, num_local, payload,
        should_escalate, tr, ProblemDraft,
    },
    models::{AnswerShape, Lang, SelectionConstraints, VariationDescriptor},
    random::{pick, rand_int, round_to},
    selector::VariationPool,
};

pub const FOUNDATIONAL: &str = "scale_meaning";

pub const LEVEL_1: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::concept("scale_meaning"),
        VariationDescriptor::calculate("real_length"),
    ],
    "real_length",
);

pub const LEVEL_2: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::calculate("find_scale"),
        VariationDescriptor::calculate("drawing_length"),
        VariationDescriptor::calculate("enlargement_scale"),
    ],
    "find_scale",
);

pub const POOLS: &[VariationPool] = &[LEVEL_1, LEVEL_2];

const REDUCTIONS: &[i64] = &[20, 50, 100, 200, 250, 500, 1000];
const ENLARGEMENTS: &[i64] = &[2, 4, 5, 10, 20];

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

fn reduction<R: Rng>(rng: &mut R) -> i64 {
    pick(rng, REDUCTIONS).copied().unwrap_or(100)
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
        "scale_meaning" => scale_meaning(rng, lang),
        _ => real_length(rng, lang),
    }
}

fn scale_meaning<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let n = reduction(rng);

    let description = localized(
        lang,
        format!("En karta har skalan 1:{n}. Hur många centimeter i verkligheten motsvarar 1 cm på kartan?"),
        format!("A map has scale 1:{n}. How many centimetres in reality does 1 cm on the map represent?"),
    );
    let hints = vec![
        hint(tr(
            lang,
            "Skalan skrivs bild : verklighet.",
            "A scale is written picture : reality.",
        )),
        hint_formula(
            localized(lang, format!("1 cm på kartan är {n} cm i verkligheten."), format!("1 cm on the map is {n} cm in reality.")),
            format!("1 : {n}"),
        ),
    ];

    draft(lang, &LEVEL_1, 1, "scale_meaning",
        payload(description, Some(format!("1:{n}")), AnswerShape::Number),
        CanonicalAnswer::from(n), 0.0, hints)
}

fn real_length<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let n = reduction(rng);
    let drawn = rand_int(rng, 2, 24);
    let real_cm = drawn * n;
    let real_m = round_to(real_cm as f64 / 100.0, 2);

    let description = localized(
        lang,
        format!("På en ritning i skala 1:{n} är en vägg {drawn} cm lång. Hur lång är väggen i verkligheten, i meter?"),
        format!("On a drawing in scale 1:{n} a wall is {drawn} cm long. How long is the wall in reality, in metres?"),
    );
    let hints = vec![
        hint_formula(
            tr(lang, "Multiplicera ritningens längd med skalfaktorn.", "Multiply the drawing length by the scale factor."),
            format!("{drawn} \\cdot {n} = {real_cm}\\text{{ cm}}"),
        ),
        hint_formula(
            tr(lang, "Omvandla till meter.", "Convert to metres."),
            format!("{real_cm}\\text{{ cm}} = {}\\text{{ m}}", num(real_m)),
        ),
    ];

    draft(lang, &LEVEL_1, 1, "real_length",
        payload(description, Some(format!("1:{n}")), AnswerShape::Number),
        CanonicalAnswer::from(real_m), 0.0, hints)
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
        "drawing_length" => drawing_length(rng, lang),
        "enlargement_scale" => enlargement_scale(rng, lang),
        _ => find_scale(rng, lang),
    }
}

fn find_scale<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let n = reduction(rng);
    let drawn = rand_int(rng, 2, 12);
    let real_cm = drawn * n;
    let real_m = real_cm as f64 / 100.0;

    let description = localized(
        lang,
        format!(
            "En sträcka som är {} m i verkligheten är {drawn} cm på en karta. Vilken skala har kartan? Svara i formen 1:x.",
            num_local(lang, real_m)
        ),
        format!(
            "A distance of {} m in reality is {drawn} cm on a map. What is the map's scale? Answer in the form 1:x.",
            num(real_m)
        ),
    );
    let hints = vec![
        hint_formula(
            tr(lang, "Gör om till samma enhet.", "Use the same unit on both sides."),
            format!("{}\\text{{ m}} = {real_cm}\\text{{ cm}}", num(real_m)),
        ),
        hint_formula(
            tr(lang, "Skriv som bild : verklighet och förkorta.", "Write picture : reality and simplify."),
            format!("{drawn} : {real_cm} = 1 : {n}"),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "find_scale",
        payload(description, None, AnswerShape::Ratio),
        CanonicalAnswer::ratio(1, n), 0.0, hints)
}

fn drawing_length<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let n = reduction(rng);
    let drawn = rand_int(rng, 2, 20);
    let real_cm = drawn * n;
    let real_m = real_cm as f64 / 100.0;

    let description = localized(
        lang,
        format!(
            "Ett hus är {} m långt. Hur lång blir det på en ritning i skala 1:{n}? Svara i centimeter.",
            num_local(lang, real_m)
        ),
        format!(
            "A house is {} m long. How long is it on a drawing in scale 1:{n}? Answer in centimetres.",
            num(real_m)
        ),
    );
    let hints = vec![
        hint_formula(
            tr(lang, "Omvandla till centimeter.", "Convert to centimetres."),
            format!("{}\\text{{ m}} = {real_cm}\\text{{ cm}}", num(real_m)),
        ),
        hint_formula(
            tr(lang, "Dela med skalfaktorn.", "Divide by the scale factor."),
            format!("\\frac{{{real_cm}}}{{{n}}} = {drawn}"),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "drawing_length",
        payload(description, Some(format!("1:{n}")), AnswerShape::Number),
        CanonicalAnswer::from(drawn), 0.0, hints)
}

fn enlargement_scale<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let k = pick(rng, ENLARGEMENTS).copied().unwrap_or(10);
    let real_mm = rand_int(rng, 2, 9);
    let drawn_mm = real_mm * k;

    let description = localized(
        lang,
        format!("En myra är {real_mm} mm lång. På en bild är den {drawn_mm} mm. Vilken skala har bilden? Svara i formen x:1."),
        format!("An ant is {real_mm} mm long. In a picture it is {drawn_mm} mm. What is the picture's scale? Answer in the form x:1."),
    );
    let hints = vec![
        hint(tr(
            lang,
            "Bilden är större än verkligheten, så det är en förstoring.",
            "The picture is larger than reality, so this is an enlargement.",
        )),
        hint_formula(
            tr(lang, "Skriv bild : verklighet och förkorta.", "Write picture : reality and simplify."),
            format!("{drawn_mm} : {real_mm} = {k} : 1"),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "enlargement_scale",
        payload(description, None, AnswerShape::Ratio),
        CanonicalAnswer::ratio(k, 1), 0.0, hints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn find_scale_answers_are_ratios() {
        let mut rng = StdRng::seed_from_u64(21);
        for key in ["find_scale", "enlargement_scale"] {
            let d = generate_by_variation(&mut rng, key, Lang::Sv).unwrap();
            assert!(matches!(d.answer, CanonicalAnswer::Structured(_)), "{key}");
            assert_eq!(d.presentation.answer_shape, Some(AnswerShape::Ratio));
            let last = d.hints.last().and_then(|h| h.formula.clone()).unwrap();
            assert!(last.contains(':'), "{last}");
        }
    }

    #[test]
    fn find_scale_left_side_is_one() {
        for seed in 0..30 {
            let mut rng = StdRng::seed_from_u64(seed);
            let d = generate_by_variation(&mut rng, "find_scale", Lang::En).unwrap();
            let formula = d.hints.last().and_then(|h| h.formula.clone()).unwrap();
            assert!(formula.starts_with("1:"), "{formula}");
        }
    }

    #[test]
    fn escalation_skips_scale_meaning() {
        let mut rng = StdRng::seed_from_u64(22);
        let constraints = SelectionConstraints::excluding([FOUNDATIONAL]).without_concepts();
        for _ in 0..50 {
            let d = generate(&mut rng, 1, Lang::En, &constraints);
            assert_eq!(d.level, 2);
        }
    }
}
