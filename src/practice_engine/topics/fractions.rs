//! Fractions: equivalence, simplification, arithmetic.
//!
//! Fraction answers are reduced and written `n/d` (or just `n` when the
//! denominator reduces to 1) so a learner's simplified answer compares
//! equal after normalisation.

use rand::Rng;

use crate::answer_token::CanonicalAnswer;
use crate::practice_engine::{
    helpers::{clamp_level, draft, hint, hint_formula, level_of, localized, payload, should_escalate, tr, ProblemDraft},
    models::{AnswerShape, Lang, SelectionConstraints, VariationDescriptor},
    random::{gcd, lcm, pick, rand_int, reduce_fraction},
    selector::VariationPool,
};

pub const FOUNDATIONAL: &str = "equivalent_fraction";

pub const LEVEL_1: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::concept("equivalent_fraction"),
        VariationDescriptor::concept("compare_fractions"),
        VariationDescriptor::calculate("simplify"),
    ],
    "simplify",
);

pub const LEVEL_2: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::calculate("add_unlike"),
        VariationDescriptor::calculate("multiply"),
        VariationDescriptor::concept("fraction_of_amount"),
    ],
    "add_unlike",
);

pub const POOLS: &[VariationPool] = &[LEVEL_1, LEVEL_2];

const DENOMINATORS: &[i64] = &[2, 3, 4, 5, 6, 8, 10, 12];

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

/// Reduced fraction as a canonical answer.
pub fn fraction_answer(n: i64, d: i64) -> CanonicalAnswer {
    match reduce_fraction(n, d) {
        (n, 1) => CanonicalAnswer::Text(n.to_string()),
        (n, d) => CanonicalAnswer::fraction(n, d),
    }
}

fn frac(n: i64, d: i64) -> String {
    format!("\\frac{{{n}}}{{{d}}}")
}

/// A proper fraction already in lowest terms.
fn proper_fraction<R: Rng>(rng: &mut R) -> (i64, i64) {
    let d = pick(rng, DENOMINATORS).copied().unwrap_or(4);
    loop {
        let n = rand_int(rng, 1, d - 1);
        if gcd(n, d) == 1 {
            return (n, d);
        }
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
        "equivalent_fraction" => equivalent_fraction(rng, lang),
        "compare_fractions" => compare_fractions(rng, lang),
        _ => simplify(rng, lang),
    }
}

fn equivalent_fraction<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let (n, d) = proper_fraction(rng);
    let k = rand_int(rng, 2, 6);
    let formula = format!("{} = \\frac{{?}}{{{}}}", frac(n, d), d * k);

    let description = tr(
        lang,
        "Vilken täljare gör bråken lika stora?",
        "Which numerator makes the fractions equal?",
    );
    let hints = vec![
        hint(tr(
            lang,
            "Förlänger du ett bråk multiplicerar du täljare och nämnare med samma tal.",
            "To extend a fraction, multiply numerator and denominator by the same number.",
        )),
        hint_formula(
            localized(
                lang,
                format!("Nämnaren har multiplicerats med {k}."),
                format!("The denominator was multiplied by {k}."),
            ),
            format!("{} = {}", frac(n, d), frac(n * k, d * k)),
        ),
    ];

    draft(lang, &LEVEL_1, 1, "equivalent_fraction",
        payload(description, Some(formula), AnswerShape::Number),
        CanonicalAnswer::from(n * k), 0.0, hints)
}

fn compare_fractions<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let (a, b) = proper_fraction(rng);
    let (c, d) = loop {
        let (c, d) = proper_fraction(rng);
        if a * d != c * b {
            break (c, d);
        }
    };
    let common = lcm(b, d);
    let (left, right) = (a * (common / b), c * (common / d));
    let larger = if left > right { (a, b) } else { (c, d) };

    let description = localized(
        lang,
        format!("Vilket bråk är störst, {a}/{b} eller {c}/{d}? Svara med bråket."),
        format!("Which fraction is larger, {a}/{b} or {c}/{d}? Answer with the fraction."),
    );
    let hints = vec![
        hint(tr(
            lang,
            "Skriv om bråken med gemensam nämnare.",
            "Rewrite the fractions with a common denominator.",
        )),
        hint_formula(
            localized(lang, format!("Gemensam nämnare: {common}."), format!("Common denominator: {common}.")),
            format!("{} \\text{{ , }} {}", frac(left, common), frac(right, common)),
        ),
    ];

    draft(lang, &LEVEL_1, 1, "compare_fractions",
        payload(description, Some(format!("{} \\; ? \\; {}", frac(a, b), frac(c, d))), AnswerShape::Fraction),
        CanonicalAnswer::fraction(larger.0, larger.1), 0.0, hints)
}

fn simplify<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let (n, d) = proper_fraction(rng);
    let k = rand_int(rng, 2, 7);
    let (big_n, big_d) = (n * k, d * k);

    let description = tr(lang, "Förkorta bråket så långt det går.", "Simplify the fraction fully.");
    let hints = vec![
        hint(localized(
            lang,
            format!("Hitta största gemensamma delaren till {big_n} och {big_d}."),
            format!("Find the greatest common divisor of {big_n} and {big_d}."),
        )),
        hint_formula(
            localized(lang, format!("SGD är {k}. Dela båda med {k}."), format!("The GCD is {k}. Divide both by {k}.")),
            format!("\\frac{{{big_n} / {k}}}{{{big_d} / {k}}}"),
        ),
    ];

    draft(lang, &LEVEL_1, 1, "simplify",
        payload(description, Some(frac(big_n, big_d)), AnswerShape::Fraction),
        fraction_answer(big_n, big_d), 0.0, hints)
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
        "multiply" => multiply(rng, lang),
        "fraction_of_amount" => fraction_of_amount(rng, lang),
        _ => add_unlike(rng, lang),
    }
}

fn add_unlike<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let (a, b) = proper_fraction(rng);
    let (c, d) = loop {
        let (c, d) = proper_fraction(rng);
        if d != b {
            break (c, d);
        }
    };
    let common = lcm(b, d);
    let sum = a * (common / b) + c * (common / d);
    let answer = fraction_answer(sum, common);

    let description = tr(
        lang,
        "Addera bråken och svara i enklaste form.",
        "Add the fractions and give the answer in simplest form.",
    );
    let hints = vec![
        hint_formula(
            localized(
                lang,
                format!("Minsta gemensamma nämnare är {common}."),
                format!("The least common denominator is {common}."),
            ),
            format!("{} + {}", frac(a * (common / b), common), frac(c * (common / d), common)),
        ),
        hint_formula(
            tr(lang, "Addera täljarna och förkorta.", "Add the numerators and simplify."),
            frac(sum, common),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "add_unlike",
        payload(description, Some(format!("{} + {}", frac(a, b), frac(c, d))), AnswerShape::Fraction),
        answer, 0.0, hints)
}

fn multiply<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let (a, b) = proper_fraction(rng);
    let (c, d) = proper_fraction(rng);
    let answer = fraction_answer(a * c, b * d);

    let description = tr(
        lang,
        "Multiplicera bråken och svara i enklaste form.",
        "Multiply the fractions and give the answer in simplest form.",
    );
    let hints = vec![
        hint_formula(
            tr(lang, "Täljare gånger täljare, nämnare gånger nämnare.", "Numerator times numerator, denominator times denominator."),
            frac(a * c, b * d),
        ),
        hint(tr(lang, "Förkorta om det går.", "Simplify if possible.")),
    ];

    draft(lang, &LEVEL_2, 2, "multiply",
        payload(description, Some(format!("{} \\cdot {}", frac(a, b), frac(c, d))), AnswerShape::Fraction),
        answer, 0.0, hints)
}

fn fraction_of_amount<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let (n, d) = proper_fraction(rng);
    let whole = d * rand_int(rng, 2, 12);
    let part = whole / d * n;

    let description = localized(
        lang,
        format!("Hur mycket är {n}/{d} av {whole}?"),
        format!("What is {n}/{d} of {whole}?"),
    );
    let hints = vec![
        hint_formula(
            localized(lang, format!("Dela först {whole} i {d} lika delar."), format!("First split {whole} into {d} equal parts.")),
            format!("{whole} / {d} = {}", whole / d),
        ),
        hint_formula(
            localized(lang, format!("Ta {n} sådana delar."), format!("Take {n} of those parts.")),
            format!("{} \\cdot {n} = {part}", whole / d),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "fraction_of_amount",
        payload(description, Some(format!("{} \\cdot {whole}", frac(n, d))), AnswerShape::Number),
        CanonicalAnswer::from(part), 0.0, hints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn fraction_answers_are_reduced() {
        assert_eq!(fraction_answer(6, 8), CanonicalAnswer::from("3/4"));
        assert_eq!(fraction_answer(4, 2), CanonicalAnswer::from("2"));
        assert_eq!(fraction_answer(5, 10), CanonicalAnswer::from("1/2"));
    }

    #[test]
    fn simplify_answer_is_in_lowest_terms() {
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let d = generate_by_variation(&mut rng, "simplify", Lang::Sv).unwrap();
            let CanonicalAnswer::Text(s) = &d.answer else { panic!("text expected") };
            let (n, den) = s.split_once('/').expect("proper fraction");
            let (n, den): (i64, i64) = (n.parse().unwrap(), den.parse().unwrap());
            assert_eq!(gcd(n, den), 1, "{s} not reduced");
        }
    }

    #[test]
    fn compare_picks_the_larger_fraction() {
        for seed in 0..40 {
            let mut rng = StdRng::seed_from_u64(seed);
            let d = generate_by_variation(&mut rng, "compare_fractions", Lang::En).unwrap();
            let CanonicalAnswer::Text(s) = &d.answer else { panic!("text expected") };
            let (n, den) = s.split_once('/').unwrap();
            let chosen = n.parse::<f64>().unwrap() / den.parse::<f64>().unwrap();
            // Both candidates appear in the description; the answer must be one of them.
            assert!(d.presentation.description.contains(s.as_str()));
            assert!(chosen > 0.0 && chosen < 1.0);
        }
    }
}
