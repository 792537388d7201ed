//! Percent: conversions, parts of a whole, and change.

use rand::Rng;

use crate::answer_token::CanonicalAnswer;
use crate::practice_engine::{
    helpers::{
        clamp_level, draft, hint, hint_formula, level_of, localized, num, num_local, payload,
        should_escalate, tr, ProblemDraft,
    },
    models::{AnswerShape, Lang, SelectionConstraints, VariationDescriptor},
    random::{pick, rand_int, round_to, weighted_choice},
    selector::VariationPool,
};

pub const FOUNDATIONAL: &str = "percent_to_decimal";

pub const LEVEL_1: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::concept("percent_to_decimal"),
        VariationDescriptor::concept("fraction_to_percent"),
        VariationDescriptor::calculate("percent_of"),
    ],
    "percent_of",
);

pub const LEVEL_2: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::calculate("percent_change"),
        VariationDescriptor::calculate("find_whole"),
        VariationDescriptor::calculate("apply_change"),
    ],
    "percent_change",
);

pub const POOLS: &[VariationPool] = &[LEVEL_1, LEVEL_2];

/// Percentages that give friendly numbers; round ones are drawn more often.
const FRIENDLY_PERCENTS: &[(i64, u32)] = &[
    (5, 2), (10, 4), (15, 2), (20, 4), (25, 4), (30, 2),
    (40, 2), (50, 4), (60, 1), (75, 3), (80, 1), (12, 1), (35, 1),
];

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

fn friendly_percent<R: Rng>(rng: &mut R) -> i64 {
    weighted_choice(rng, FRIENDLY_PERCENTS).copied().unwrap_or(10)
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
        "percent_to_decimal" => percent_to_decimal(rng, lang),
        "fraction_to_percent" => fraction_to_percent(rng, lang),
        _ => percent_of(rng, lang),
    }
}

fn percent_to_decimal<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let p = rand_int(rng, 1, 150);
    let decimal = round_to(p as f64 / 100.0, 2);

    let description = localized(
        lang,
        format!("Skriv {p} % i decimalform."),
        format!("Write {p}% as a decimal."),
    );
    let hints = vec![
        hint(tr(lang, "Procent betyder hundradelar.", "Percent means hundredths.")),
        hint_formula(
            tr(lang, "Dela med 100.", "Divide by 100."),
            format!("\\frac{{{p}}}{{100}} = {}", num(decimal)),
        ),
    ];

    draft(lang, &LEVEL_1, 1, "percent_to_decimal",
        payload(description, Some(format!("{p}\\%")), AnswerShape::Number),
        CanonicalAnswer::from(decimal), 0.0, hints)
}

fn fraction_to_percent<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let d = pick(rng, &[2i64, 4, 5, 10, 20, 25]).copied().unwrap_or(4);
    let n = rand_int(rng, 1, d - 1);
    let percent = n * (100 / d);

    let description = localized(
        lang,
        format!("Hur många procent är {n}/{d}?"),
        format!("What percentage is {n}/{d}?"),
    );
    let hints = vec![
        hint_formula(
            localized(
                lang,
                format!("Förläng så att nämnaren blir 100 (gånger {})", 100 / d),
                format!("Extend so the denominator becomes 100 (times {})", 100 / d),
            ),
            format!("\\frac{{{n}}}{{{d}}} = \\frac{{{percent}}}{{100}}"),
        ),
        hint(tr(lang, "Hundradelar är procent.", "Hundredths are percent.")),
    ];

    draft(lang, &LEVEL_1, 1, "fraction_to_percent",
        payload(description, Some(format!("\\frac{{{n}}}{{{d}}}")), AnswerShape::Number),
        CanonicalAnswer::from(percent), 0.0, hints)
}

fn percent_of<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let p = friendly_percent(rng);
    let whole = rand_int(rng, 2, 40) * 10;
    let part = round_to(whole as f64 * p as f64 / 100.0, 2);

    let description = localized(
        lang,
        format!("Hur mycket är {p} % av {whole} kr?"),
        format!("What is {p}% of {whole} kr?"),
    );
    let hints = vec![
        hint_formula(
            localized(lang, format!("{p} % = {}", num_local(lang, p as f64 / 100.0)), format!("{p}% = {}", num(p as f64 / 100.0))),
            format!("{} \\cdot {whole}", num(p as f64 / 100.0)),
        ),
        hint_formula(tr(lang, "Multiplicera.", "Multiply."), format!("= {}", num(part))),
    ];

    draft(lang, &LEVEL_1, 1, "percent_of",
        payload(description, Some(format!("{p}\\% \\cdot {whole}")), AnswerShape::Number),
        CanonicalAnswer::from(part), 0.0, hints)
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
        "find_whole" => find_whole(rng, lang),
        "apply_change" => apply_change(rng, lang),
        _ => percent_change(rng, lang),
    }
}

fn percent_change<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let old = rand_int(rng, 1, 20) * 100;
    let change = friendly_percent(rng);
    let increase = rng.gen_bool(0.5);
    let signed_change = if increase { change } else { -change };
    let new = old + old * signed_change / 100;
    let diff = new - old;

    let description = localized(
        lang,
        format!("Priset ändras från {old} kr till {new} kr. Hur många procent är förändringen? (Minskning anges negativt.)"),
        format!("The price changes from {old} kr to {new} kr. What is the percentage change? (Give a decrease as negative.)"),
    );
    let hints = vec![
        hint_formula(
            tr(lang, "Räkna ut förändringen i kronor.", "Work out the change in kronor."),
            format!("{new} - {old} = {diff}"),
        ),
        hint_formula(
            tr(lang, "Dela förändringen med det gamla värdet.", "Divide the change by the old value."),
            format!("\\frac{{{diff}}}{{{old}}} = {}", num(diff as f64 / old as f64)),
        ),
        hint(tr(lang, "Multiplicera med 100 för att få procent.", "Multiply by 100 to get percent.")),
    ];

    draft(lang, &LEVEL_2, 2, "percent_change",
        payload(description, None, AnswerShape::Number),
        CanonicalAnswer::from(signed_change), 0.0, hints)
}

fn find_whole<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let p = friendly_percent(rng);
    let whole = rand_int(rng, 1, 30) * 20;
    let part = round_to(whole as f64 * p as f64 / 100.0, 2);

    let description = localized(
        lang,
        format!("{p} % av en summa är {} kr. Hur stor är hela summan?", num_local(lang, part)),
        format!("{p}% of an amount is {} kr. What is the whole amount?", num(part)),
    );
    let hints = vec![
        hint_formula(
            tr(lang, "Ta reda på 1 %.", "Find 1%."),
            format!("\\frac{{{}}}{{{p}}} = {}", num(part), num(part / p as f64)),
        ),
        hint_formula(
            tr(lang, "Hela summan är 100 %.", "The whole amount is 100%."),
            format!("{} \\cdot 100 = {whole}", num(part / p as f64)),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "find_whole",
        payload(description, None, AnswerShape::Number),
        CanonicalAnswer::from(whole), 0.0, hints)
}

fn apply_change<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let price = rand_int(rng, 5, 80) * 10;
    let p = friendly_percent(rng);
    let increase = rng.gen_bool(0.5);
    let factor = if increase { 1.0 + p as f64 / 100.0 } else { 1.0 - p as f64 / 100.0 };
    let result = round_to(price as f64 * factor, 2);

    let description = if increase {
        localized(
            lang,
            format!("En vara kostar {price} kr och priset höjs med {p} %. Vad blir det nya priset?"),
            format!("An item costs {price} kr and the price rises by {p}%. What is the new price?"),
        )
    } else {
        localized(
            lang,
            format!("En vara kostar {price} kr och priset sänks med {p} %. Vad blir det nya priset?"),
            format!("An item costs {price} kr and the price drops by {p}%. What is the new price?"),
        )
    };
    let hints = vec![
        hint_formula(
            tr(lang, "Skriv förändringen som förändringsfaktor.", "Write the change as a multiplier."),
            num(round_to(factor, 4)),
        ),
        hint_formula(
            tr(lang, "Multiplicera priset med faktorn.", "Multiply the price by the multiplier."),
            format!("{price} \\cdot {} = {}", num(round_to(factor, 4)), num(result)),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "apply_change",
        payload(description, None, AnswerShape::Number),
        CanonicalAnswer::from(result), 0.0, hints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn percent_change_sign_matches_direction() {
        for seed in 0..60 {
            let mut rng = StdRng::seed_from_u64(seed);
            let d = generate_by_variation(&mut rng, "percent_change", Lang::En).unwrap();
            let CanonicalAnswer::Numeric(change) = d.answer else { panic!("numeric expected") };
            assert!(change != 0.0);
            assert_eq!(change.fract(), 0.0);
        }
    }

    #[test]
    fn level_two_has_no_concept_variations() {
        assert!(LEVEL_2
            .variations()
            .iter()
            .all(|v| v.kind == crate::practice_engine::models::VariationKind::Calculate));
    }
}
