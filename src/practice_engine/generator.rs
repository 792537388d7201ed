use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use tracing::{debug, warn};

use crate::answer_token::{issue, CryptoContext, TokenError};
use crate::practice_engine::{
    helpers::ProblemDraft,
    models::{
        Lang, ProblemDescriptor, ProblemMeta, ProblemRequest, SelectionConstraints, Topic,
        VariationKind, VariationRequest,
    },
    selector::VariationPool,
    topics,
};

impl Topic {
    pub(crate) fn pools(self) -> &'static [VariationPool] {
        match self {
            Topic::LinearEquations => topics::equations::POOLS,
            Topic::Fractions       => topics::fractions::POOLS,
            Topic::Percent         => topics::percent::POOLS,
            Topic::CircleGeometry  => topics::circle::POOLS,
            Topic::Scale           => topics::scale::POOLS,
        }
    }

    /// Every variation key this topic declares, level by level.
    pub fn variation_keys(self) -> Vec<&'static str> {
        self.pools().iter().flat_map(|pool| pool.keys()).collect()
    }

    /// Highest level this topic serves; requests above it are clamped.
    pub fn max_level(self) -> u8 {
        u8::try_from(self.pools().len()).unwrap_or(u8::MAX)
    }
}

/// Generate a unique subject id from topic + request RNG.
fn make_subject_id(topic: Topic, rng: &mut impl RngCore) -> String {
    format!("{}-{:08X}", topic.prefix(), rng.next_u32())
}

fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None       => StdRng::from_entropy(),
    }
}

/// Core dispatch: routes to the topic module and seals the answer into a token.
pub fn generate(ctx: &CryptoContext, request: ProblemRequest) -> Result<ProblemDescriptor, TokenError> {
    let mut rng = seeded(request.rng_seed);
    let subject_id = make_subject_id(request.topic, &mut rng);
    let draft = dispatch(&mut rng, request.topic, request.level, request.lang, &request.constraints);

    debug!(
        topic = %request.topic,
        requested_level = request.level,
        served_level = draft.level,
        variation = draft.variation_key,
        "generated problem"
    );
    finish(ctx, request.topic, subject_id, draft)
}

/// Generate a problem for one specific variation key.
///
/// A key the topic does not declare falls back to an ordinary level-1
/// problem with no constraints; callers can tell from `variation_key`.
pub fn generate_by_variation(
    ctx: &CryptoContext,
    request: VariationRequest,
) -> Result<ProblemDescriptor, TokenError> {
    let mut rng = seeded(request.rng_seed);
    let subject_id = make_subject_id(request.topic, &mut rng);

    let draft = match by_variation(&mut rng, request.topic, &request.key, request.lang) {
        Some(draft) => draft,
        None => {
            warn!(topic = %request.topic, key = %request.key, "unknown variation key, serving level 1");
            dispatch(&mut rng, request.topic, 1, request.lang, &SelectionConstraints::default())
        }
    };
    finish(ctx, request.topic, subject_id, draft)
}

fn dispatch<R: Rng>(
    rng: &mut R,
    topic: Topic,
    level: u8,
    lang: Lang,
    constraints: &SelectionConstraints,
) -> ProblemDraft {
    match topic {
        Topic::LinearEquations =>
            topics::equations::generate(rng, level, lang, constraints),

        Topic::Fractions =>
            topics::fractions::generate(rng, level, lang, constraints),

        Topic::Percent =>
            topics::percent::generate(rng, level, lang, constraints),

        Topic::CircleGeometry =>
            topics::circle::generate(rng, level, lang, constraints),

        Topic::Scale =>
            topics::scale::generate(rng, level, lang, constraints),
    }
}

fn by_variation<R: Rng>(rng: &mut R, topic: Topic, key: &str, lang: Lang) -> Option<ProblemDraft> {
    match topic {
        Topic::LinearEquations => topics::equations::generate_by_variation(rng, key, lang),
        Topic::Fractions       => topics::fractions::generate_by_variation(rng, key, lang),
        Topic::Percent         => topics::percent::generate_by_variation(rng, key, lang),
        Topic::CircleGeometry  => topics::circle::generate_by_variation(rng, key, lang),
        Topic::Scale           => topics::scale::generate_by_variation(rng, key, lang),
    }
}

/// Concept questions sit half a step below calculations on the same level.
fn difficulty(level: u8, kind: VariationKind) -> u8 {
    let base = level.saturating_mul(2);
    match kind {
        VariationKind::Concept => base.saturating_sub(1),
        VariationKind::Calculate => base,
    }
}

fn finish(
    ctx: &CryptoContext,
    topic: Topic,
    subject_id: String,
    draft: ProblemDraft,
) -> Result<ProblemDescriptor, TokenError> {
    let token = issue(ctx, &subject_id, &draft.answer, draft.tolerance)?;

    Ok(ProblemDescriptor {
        subject_id,
        presentation: draft.presentation,
        token,
        hints: draft.hints,
        variation_key: draft.variation_key.to_string(),
        kind: draft.kind,
        meta: ProblemMeta {
            topic,
            level: draft.level,
            difficulty: difficulty(draft.level, draft.kind),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_orders_concepts_before_calculations() {
        assert_eq!(difficulty(1, VariationKind::Concept), 1);
        assert_eq!(difficulty(1, VariationKind::Calculate), 2);
        assert_eq!(difficulty(3, VariationKind::Calculate), 6);
    }

    #[test]
    fn subject_id_is_prefix_and_eight_hex_digits() {
        let mut rng = StdRng::seed_from_u64(1);
        let id = make_subject_id(Topic::Fractions, &mut rng);
        let (prefix, hex) = id.split_once('-').unwrap();
        assert_eq!(prefix, "FR");
        assert_eq!(hex.len(), 8);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn keys_are_unique_within_a_topic() {
        for topic in Topic::ALL {
            let keys = topic.variation_keys();
            let unique: std::collections::HashSet<_> = keys.iter().collect();
            assert_eq!(unique.len(), keys.len(), "{topic}");
        }
    }
}
