//! Problem generation: variation selection, topic generators, and the facade.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | Shared types: topics, requests, constraints, the problem descriptor |
//! | `random`    | Seeded integer/float draws, weighted choice, gcd and fraction reduction |
//! | `selector`  | `VariationPool` and the constraint-aware selection step |
//! | `helpers`   | Shared builders: bilingual text, hint steps, `ProblemDraft` |
//! | `generator` | Entry points `generate()` / `generate_by_variation()` |
//! | `topics`    | One generator module per curriculum topic |

pub mod generator;
pub mod helpers;
pub mod models;
pub mod random;
pub mod selector;
pub mod topics;

pub use generator::{generate, generate_by_variation};
pub use models::{
    AnswerShape, Figure, HintStep, Lang, ProblemDescriptor, ProblemMeta, ProblemRequest,
    RenderPayload, SelectionConstraints, Topic, VariationDescriptor, VariationKind,
    VariationRequest,
};
pub use selector::VariationPool;
