//! Topic generators, one module per curriculum topic.
//!
//! Every module exposes the same surface:
//!
//! ```ignore
//! pub const POOLS: &[VariationPool];      // one pool per level
//! pub const FOUNDATIONAL: &str;           // concept key that gates escalation
//!
//! pub fn generate<R: Rng>(rng: &mut R, level: u8, lang: Lang,
//!                         constraints: &SelectionConstraints) -> ProblemDraft;
//! pub fn generate_by_variation<R: Rng>(rng: &mut R, key: &str,
//!                                      lang: Lang) -> Option<ProblemDraft>;
//! ```
//!
//! The facade in `generator.rs` dispatches to these and seals the answer.

/// EQ-: balance method, one- and two-step equations, parentheses
pub mod equations;
/// FR-: equivalence, simplifying, arithmetic with fractions
pub mod fractions;
/// PC-: conversions, percent of, percent change
pub mod percent;
/// CG-: radius, circumference, area (tolerance answers)
pub mod circle;
/// SC-: map scales, reductions, enlargements (ratio answers)
pub mod scale;
