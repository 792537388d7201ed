use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::answer_token::AnswerToken;

// ---------------------------------------------------------------------------
// Topics and languages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    LinearEquations,
    Fractions,
    Percent,
    CircleGeometry,
    Scale,
}

impl Topic {
    /// Every topic in catalogue order.
    pub const ALL: [Topic; 5] = [
        Topic::LinearEquations,
        Topic::Fractions,
        Topic::Percent,
        Topic::CircleGeometry,
        Topic::Scale,
    ];

    /// Short prefix used in subject ids (e.g. `"EQ-1A2B3C4D"`).
    pub fn prefix(self) -> &'static str {
        match self {
            Topic::LinearEquations => "EQ",
            Topic::Fractions       => "FR",
            Topic::Percent         => "PC",
            Topic::CircleGeometry  => "CG",
            Topic::Scale           => "SC",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Topic::LinearEquations => "Linear Equations",
            Topic::Fractions       => "Fractions",
            Topic::Percent         => "Percent",
            Topic::CircleGeometry  => "Circle Geometry",
            Topic::Scale           => "Scale",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LinearEquations" | "linear_equations" => Ok(Topic::LinearEquations),
            "Fractions" | "fractions"              => Ok(Topic::Fractions),
            "Percent" | "percent"                  => Ok(Topic::Percent),
            "CircleGeometry" | "circle_geometry"   => Ok(Topic::CircleGeometry),
            "Scale" | "scale"                      => Ok(Topic::Scale),
            _ => Err(format!("Unknown topic: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    Sv,
    En,
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sv" => Ok(Lang::Sv),
            "en" => Ok(Lang::En),
            other => Err(format!("Unknown language: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Variations
// ---------------------------------------------------------------------------

/// Whether a variation tests understanding or computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariationKind {
    Concept,
    Calculate,
}

/// One named sub-skill inside a level's pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariationDescriptor {
    pub key: &'static str,
    pub kind: VariationKind,
}

impl VariationDescriptor {
    pub const fn concept(key: &'static str) -> Self {
        Self { key, kind: VariationKind::Concept }
    }

    pub const fn calculate(key: &'static str) -> Self {
        Self { key, kind: VariationKind::Calculate }
    }
}

/// Per-request filters applied before a variation is drawn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionConstraints {
    /// Variation keys the learner should not be asked about (e.g. mastered skills).
    #[serde(default)]
    pub exclude: HashSet<String>,
    /// Drop every concept-kind variation.
    #[serde(default)]
    pub hide_concept: bool,
}

impl SelectionConstraints {
    pub fn excluding<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exclude: keys.into_iter().map(Into::into).collect(),
            hide_concept: false,
        }
    }

    pub fn without_concepts(mut self) -> Self {
        self.hide_concept = true;
        self
    }

    pub fn is_excluded(&self, key: &str) -> bool {
        self.exclude.contains(key)
    }
}

// ---------------------------------------------------------------------------
// Problem output
// ---------------------------------------------------------------------------

/// What kind of input box the client should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerShape {
    Number,
    Fraction,
    Ratio,
    Text,
}

/// Visual geometry descriptor; lengths are in the problem's unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Figure {
    Circle {
        radius: f64,
        show_radius: bool,
        show_diameter: bool,
        unit: String,
    },
}

/// Opaque-to-the-core presentation of a problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPayload {
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer_shape: Option<AnswerShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub figure: Option<Figure>,
}

/// One worked-solution step. The last step of every problem restates the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemMeta {
    pub topic: Topic,
    pub level: u8,
    pub difficulty: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDescriptor {
    pub subject_id: String,
    pub presentation: RenderPayload,
    pub token: AnswerToken,
    pub hints: Vec<HintStep>,
    /// Stable key of the sub-skill that was asked; feed it back to
    /// `generate_by_variation` to get the same kind of question again.
    pub variation_key: String,
    pub kind: VariationKind,
    pub meta: ProblemMeta,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemRequest {
    pub topic: Topic,
    pub level: u8,
    pub lang: Lang,
    #[serde(default)]
    pub constraints: SelectionConstraints,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl ProblemRequest {
    /// Level 1, Swedish, no constraints, entropy-seeded.
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            level: 1,
            lang: Lang::default(),
            constraints: SelectionConstraints::default(),
            rng_seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariationRequest {
    pub topic: Topic,
    pub key: String,
    pub lang: Lang,
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl VariationRequest {
    pub fn new(topic: Topic, key: impl Into<String>) -> Self {
        Self {
            topic,
            key: key.into(),
            lang: Lang::default(),
            rng_seed: None,
        }
    }
}
