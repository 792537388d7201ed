//! Linear equations in one unknown.
//!
//! Every equation is built backwards from an integer solution so the
//! canonical answer is always a whole number.

use rand::Rng;

use crate::answer_token::CanonicalAnswer;
use crate::practice_engine::{
    helpers::{clamp_level, draft, hint, hint_formula, level_of, localized, payload, should_escalate, tr, ProblemDraft},
    models::{AnswerShape, Lang, SelectionConstraints, VariationDescriptor},
    random::{rand_int, rand_nonzero},
    selector::VariationPool,
};

pub const FOUNDATIONAL: &str = "balance_concept";

pub const LEVEL_1: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::concept("balance_concept"),
        VariationDescriptor::concept("inverse_operation"),
        VariationDescriptor::calculate("one_step_add"),
        VariationDescriptor::calculate("one_step_mul"),
    ],
    "one_step_add",
);

pub const LEVEL_2: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::calculate("two_step"),
        VariationDescriptor::calculate("both_sides"),
        VariationDescriptor::concept("check_solution"),
    ],
    "two_step",
);

pub const LEVEL_3: VariationPool = VariationPool::new(
    &[
        VariationDescriptor::calculate("parentheses"),
        VariationDescriptor::calculate("fraction_coefficient"),
    ],
    "parentheses",
);

pub const POOLS: &[VariationPool] = &[LEVEL_1, LEVEL_2, LEVEL_3];

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
        2 => level2(rng, lang, None, constraints),
        _ => level3(rng, lang, None, constraints),
    }
}

pub fn generate_by_variation<R: Rng>(rng: &mut R, key: &str, lang: Lang) -> Option<ProblemDraft> {
    let open = SelectionConstraints::default();
    let draft = match level_of(POOLS, key)? {
        1 => level1(rng, lang, Some(key), &open),
        2 => level2(rng, lang, Some(key), &open),
        _ => level3(rng, lang, Some(key), &open),
    };
    Some(draft)
}

/// `+ 3` / `- 3` suffix for a signed constant.
fn signed(n: i64) -> String {
    if n < 0 { format!("- {}", -n) } else { format!("+ {n}") }
}

// ---------------------------------------------------------------------------
// Level 1: one-step equations
// ---------------------------------------------------------------------------

pub fn level1<R: Rng>(
    rng: &mut R,
    lang: Lang,
    variant: Option<&str>,
    constraints: &SelectionConstraints,
) -> ProblemDraft {
    match LEVEL_1.resolve(rng, variant, constraints) {
        "balance_concept" => balance_concept(rng, lang),
        "inverse_operation" => inverse_operation(rng, lang),
        "one_step_mul" => one_step_mul(rng, lang),
        _ => one_step_add(rng, lang),
    }
}

fn balance_concept<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let x = rand_int(rng, 1, 15);
    let a = rand_int(rng, 2, 20);
    let b = x + a;
    let equation = format!("x + {a} = {b}");

    let description = localized(
        lang,
        format!("Vilket tal ska du subtrahera från båda leden för att få x ensamt i {equation}?"),
        format!("Which number do you subtract from both sides to get x on its own in {equation}?"),
    );
    let hints = vec![
        hint(tr(
            lang,
            "En ekvation är som en våg: gör samma sak på båda sidor så håller den balansen.",
            "An equation is like a balance: do the same thing to both sides and it stays level.",
        )),
        hint(localized(
            lang,
            format!("Talet {a} står tillsammans med x. Det tar du bort genom att subtrahera {a}."),
            format!("The number {a} is added to x. You remove it by subtracting {a}."),
        )),
    ];

    draft(lang, &LEVEL_1, 1, "balance_concept",
        payload(description, Some(equation), AnswerShape::Number),
        CanonicalAnswer::from(a), 0.0, hints)
}

fn inverse_operation<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let x = rand_int(rng, 2, 12);
    let a = rand_int(rng, 2, 9);
    let b = a * x;
    let equation = format!("{a}x = {b}");

    let description = localized(
        lang,
        format!("Med vilket tal ska du dela båda leden för att lösa {equation}?"),
        format!("Which number do you divide both sides by to solve {equation}?"),
    );
    let hints = vec![
        hint(tr(
            lang,
            "Division är motsatsen till multiplikation.",
            "Division undoes multiplication.",
        )),
        hint_formula(
            localized(lang, format!("x multipliceras med {a}."), format!("x is multiplied by {a}.")),
            format!("\\frac{{{a}x}}{{{a}}} = \\frac{{{b}}}{{{a}}}"),
        ),
    ];

    draft(lang, &LEVEL_1, 1, "inverse_operation",
        payload(description, Some(equation), AnswerShape::Number),
        CanonicalAnswer::from(a), 0.0, hints)
}

fn one_step_add<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let x = rand_int(rng, -10, 20);
    let a = rand_nonzero(rng, -15, 15);
    let b = x + a;
    let equation = format!("x {} = {b}", signed(a));

    let description = tr(lang, "Lös ekvationen.", "Solve the equation.");
    let hints = vec![
        hint_formula(
            localized(
                lang,
                format!("Gör samma sak på båda sidor: ta bort {a} från vänsterledet."),
                format!("Do the same to both sides: remove {a} from the left side."),
            ),
            format!("x = {b} {}", signed(-a)),
        ),
        hint_formula(tr(lang, "Räkna ut högerledet.", "Work out the right side."), format!("x = {x}")),
    ];

    draft(lang, &LEVEL_1, 1, "one_step_add",
        payload(description, Some(equation), AnswerShape::Number),
        CanonicalAnswer::from(x), 0.0, hints)
}

fn one_step_mul<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let x = rand_nonzero(rng, -9, 12);
    let a = rand_int(rng, 2, 9);
    let b = a * x;
    let equation = format!("{a}x = {b}");

    let description = tr(lang, "Lös ekvationen.", "Solve the equation.");
    let hints = vec![
        hint_formula(
            localized(lang, format!("Dela båda leden med {a}."), format!("Divide both sides by {a}.")),
            format!("x = \\frac{{{b}}}{{{a}}}"),
        ),
        hint_formula(tr(lang, "Förenkla.", "Simplify."), format!("x = {x}")),
    ];

    draft(lang, &LEVEL_1, 1, "one_step_mul",
        payload(description, Some(equation), AnswerShape::Number),
        CanonicalAnswer::from(x), 0.0, hints)
}

// ---------------------------------------------------------------------------
// Level 2: two-step equations
// ---------------------------------------------------------------------------

pub fn level2<R: Rng>(
    rng: &mut R,
    lang: Lang,
    variant: Option<&str>,
    constraints: &SelectionConstraints,
) -> ProblemDraft {
    match LEVEL_2.resolve(rng, variant, constraints) {
        "both_sides" => both_sides(rng, lang),
        "check_solution" => check_solution(rng, lang),
        _ => two_step(rng, lang),
    }
}

fn two_step<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let x = rand_int(rng, -8, 12);
    let a = rand_int(rng, 2, 9);
    let b = rand_nonzero(rng, -20, 20);
    let c = a * x + b;
    let equation = format!("{a}x {} = {c}", signed(b));

    let description = tr(lang, "Lös ekvationen.", "Solve the equation.");
    let hints = vec![
        hint_formula(
            localized(
                lang,
                format!("Ta först bort konstanttermen {b} från båda leden."),
                format!("First remove the constant term {b} from both sides."),
            ),
            format!("{a}x = {}", c - b),
        ),
        hint_formula(
            localized(lang, format!("Dela sedan med {a}."), format!("Then divide by {a}.")),
            format!("x = \\frac{{{}}}{{{a}}} = {x}", c - b),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "two_step",
        payload(description, Some(equation), AnswerShape::Number),
        CanonicalAnswer::from(x), 0.0, hints)
}

fn both_sides<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let x = rand_int(rng, -6, 10);
    let c = rand_int(rng, 1, 5);
    let a = c + rand_int(rng, 1, 5);
    let b = rand_nonzero(rng, -15, 15);
    let d = a * x + b - c * x;
    let equation = format!("{a}x {} = {c}x {}", signed(b), signed(d));

    let description = tr(lang, "Lös ekvationen.", "Solve the equation.");
    let hints = vec![
        hint_formula(
            localized(
                lang,
                format!("Samla x-termerna i vänsterledet genom att subtrahera {c}x."),
                format!("Collect the x terms on the left by subtracting {c}x."),
            ),
            format!("{}x {} = {d}", a - c, signed(b)),
        ),
        hint_formula(
            tr(lang, "Flytta konstanten till högerledet.", "Move the constant to the right side."),
            format!("{}x = {}", a - c, d - b),
        ),
        hint_formula(
            localized(lang, format!("Dela med {}.", a - c), format!("Divide by {}.", a - c)),
            format!("x = {x}"),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "both_sides",
        payload(description, Some(equation), AnswerShape::Number),
        CanonicalAnswer::from(x), 0.0, hints)
}

fn check_solution<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let k = rand_int(rng, -5, 9);
    let a = rand_int(rng, 2, 9);
    let b = rand_nonzero(rng, -12, 12);
    let value = a * k + b;
    let expression = format!("{a}x {}", signed(b));

    let description = localized(
        lang,
        format!("För att pröva om x = {k} är en lösning sätter du in värdet. Vad blir {expression} när x = {k}?"),
        format!("To check whether x = {k} is a solution you substitute it. What is {expression} when x = {k}?"),
    );
    let hints = vec![
        hint(tr(
            lang,
            "Ersätt x med talet och räkna ut uttrycket.",
            "Replace x with the number and evaluate the expression.",
        )),
        hint_formula(
            tr(lang, "Multiplicera först, addera sedan.", "Multiply first, then add."),
            format!("{a} \\cdot ({k}) {} = {value}", signed(b)),
        ),
    ];

    draft(lang, &LEVEL_2, 2, "check_solution",
        payload(description, Some(expression), AnswerShape::Number),
        CanonicalAnswer::from(value), 0.0, hints)
}

// ---------------------------------------------------------------------------
// Level 3: brackets and fractional coefficients
// ---------------------------------------------------------------------------

pub fn level3<R: Rng>(
    rng: &mut R,
    lang: Lang,
    variant: Option<&str>,
    constraints: &SelectionConstraints,
) -> ProblemDraft {
    match LEVEL_3.resolve(rng, variant, constraints) {
        "fraction_coefficient" => fraction_coefficient(rng, lang),
        _ => parentheses(rng, lang),
    }
}

fn parentheses<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let x = rand_int(rng, -6, 10);
    let a = rand_int(rng, 2, 7);
    let b = rand_nonzero(rng, -9, 9);
    let c = a * (x + b);
    let equation = format!("{a}(x {}) = {c}", signed(b));

    let description = tr(lang, "Lös ekvationen.", "Solve the equation.");
    let hints = vec![
        hint_formula(
            tr(lang, "Multiplicera in i parentesen.", "Expand the brackets."),
            format!("{a}x {} = {c}", signed(a * b)),
        ),
        hint_formula(
            tr(lang, "Flytta konstanten.", "Move the constant."),
            format!("{a}x = {}", c - a * b),
        ),
        hint_formula(
            localized(lang, format!("Dela med {a}."), format!("Divide by {a}.")),
            format!("x = {x}"),
        ),
    ];

    draft(lang, &LEVEL_3, 3, "parentheses",
        payload(description, Some(equation), AnswerShape::Number),
        CanonicalAnswer::from(x), 0.0, hints)
}

fn fraction_coefficient<R: Rng>(rng: &mut R, lang: Lang) -> ProblemDraft {
    let a = rand_int(rng, 2, 6);
    let x = a * rand_int(rng, -4, 8);
    let b = rand_nonzero(rng, -10, 10);
    let c = x / a + b;
    let equation = format!("\\frac{{x}}{{{a}}} {} = {c}", signed(b));

    let description = tr(lang, "Lös ekvationen.", "Solve the equation.");
    let hints = vec![
        hint_formula(
            tr(lang, "Flytta konstanten till högerledet.", "Move the constant to the right side."),
            format!("\\frac{{x}}{{{a}}} = {}", c - b),
        ),
        hint_formula(
            localized(lang, format!("Multiplicera båda leden med {a}."), format!("Multiply both sides by {a}.")),
            format!("x = {} \\cdot {a} = {x}", c - b),
        ),
    ];

    draft(lang, &LEVEL_3, 3, "fraction_coefficient",
        payload(description, Some(equation), AnswerShape::Number),
        CanonicalAnswer::from(x), 0.0, hints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn balance_concept_asks_for_the_added_constant() {
        let mut rng = StdRng::seed_from_u64(3);
        let d = generate_by_variation(&mut rng, "balance_concept", Lang::En).unwrap();
        let formula = d.presentation.formula.clone().unwrap();
        let a: i64 = formula
            .split_whitespace()
            .nth(2)
            .and_then(|s| s.parse().ok())
            .unwrap();
        assert_eq!(d.answer, CanonicalAnswer::from(a));
    }

    #[test]
    fn two_step_answer_satisfies_equation() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let d = generate_by_variation(&mut rng, "two_step", Lang::Sv).unwrap();
            let CanonicalAnswer::Numeric(x) = d.answer else { panic!("numeric expected") };
            assert_eq!(x.fract(), 0.0);
            assert_eq!(d.level, 2);
        }
    }

    #[test]
    fn escalates_when_foundation_mastered() {
        let mut rng = StdRng::seed_from_u64(9);
        let constraints = SelectionConstraints::excluding([FOUNDATIONAL]).without_concepts();
        for _ in 0..30 {
            let d = generate(&mut rng, 1, Lang::En, &constraints);
            assert_eq!(d.level, 2);
            assert!(LEVEL_2.contains(d.variation_key));
        }
    }

    #[test]
    fn unknown_key_is_not_mapped() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_by_variation(&mut rng, "no_such_key", Lang::Sv).is_none());
    }
}
