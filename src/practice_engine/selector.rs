//! Variation pool selection.
//!
//! Every topic declares one [`VariationPool`] per level. Picking the sub-skill
//! to ask about is the same four-step filter for all of them, so it lives
//! here instead of in each topic file.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::practice_engine::models::{SelectionConstraints, VariationDescriptor, VariationKind};

/// A level's declared variations plus the key served when filtering leaves nothing.
#[derive(Debug, Clone, Copy)]
pub struct VariationPool {
    variations: &'static [VariationDescriptor],
    fallback: &'static str,
}

impl VariationPool {
    pub const fn new(variations: &'static [VariationDescriptor], fallback: &'static str) -> Self {
        Self { variations, fallback }
    }

    pub fn variations(&self) -> &'static [VariationDescriptor] {
        self.variations
    }

    pub fn fallback(&self) -> &'static str {
        self.fallback
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        self.variations.iter().map(|v| v.key)
    }

    pub fn descriptor(&self, key: &str) -> Option<&'static VariationDescriptor> {
        self.variations.iter().find(|v| v.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.descriptor(key).is_some()
    }

    /// Kind of `key`, treating unknown keys (only the fallback can be one) as calculate.
    pub fn kind_of(&self, key: &str) -> VariationKind {
        self.descriptor(key).map_or(VariationKind::Calculate, |v| v.kind)
    }

    /// Pick a variation key under `constraints`.
    ///
    /// Removes excluded keys, then concept variations when `hide_concept` is
    /// set, then draws uniformly from what is left. An empty result yields
    /// the pool's fallback; this never fails.
    pub fn select<R: Rng>(&self, rng: &mut R, constraints: &SelectionConstraints) -> &'static str {
        let candidates: Vec<&VariationDescriptor> = self
            .variations
            .iter()
            .filter(|v| !constraints.is_excluded(v.key))
            .filter(|v| !(constraints.hide_concept && v.kind == VariationKind::Concept))
            .collect();

        match candidates.choose(rng) {
            Some(v) => v.key,
            None => {
                debug!(
                    fallback = self.fallback,
                    excluded = constraints.exclude.len(),
                    hide_concept = constraints.hide_concept,
                    "variation pool empty after filtering, serving fallback"
                );
                self.fallback
            }
        }
    }

    /// Use `requested` when this pool declares it, otherwise [`select`](Self::select).
    pub fn resolve<R: Rng>(
        &self,
        rng: &mut R,
        requested: Option<&str>,
        constraints: &SelectionConstraints,
    ) -> &'static str {
        match requested.and_then(|key| self.descriptor(key)) {
            Some(v) => v.key,
            None => self.select(rng, constraints),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const POOL: VariationPool = VariationPool::new(
        &[
            VariationDescriptor::concept("idea_a"),
            VariationDescriptor::concept("idea_b"),
            VariationDescriptor::calculate("calc_a"),
            VariationDescriptor::calculate("calc_b"),
        ],
        "calc_a",
    );

    #[test]
    fn hide_concept_never_returns_concept_keys() {
        let mut rng = StdRng::seed_from_u64(11);
        let constraints = SelectionConstraints::default().without_concepts();
        for _ in 0..1000 {
            let key = POOL.select(&mut rng, &constraints);
            assert_eq!(POOL.kind_of(key), VariationKind::Calculate, "got {key}");
        }
    }

    #[test]
    fn excluded_keys_are_never_returned() {
        let mut rng = StdRng::seed_from_u64(12);
        let constraints = SelectionConstraints::excluding(["idea_a", "calc_b"]);
        for _ in 0..500 {
            let key = POOL.select(&mut rng, &constraints);
            assert!(key == "idea_b" || key == "calc_a", "got {key}");
        }
    }

    #[test]
    fn excluding_everything_serves_fallback() {
        let mut rng = StdRng::seed_from_u64(13);
        let constraints = SelectionConstraints::excluding(POOL.keys());
        assert_eq!(POOL.select(&mut rng, &constraints), "calc_a");

        let only_concepts = SelectionConstraints::excluding(["calc_a", "calc_b"]).without_concepts();
        assert_eq!(POOL.select(&mut rng, &only_concepts), "calc_a");
    }

    #[test]
    fn resolve_prefers_declared_request() {
        let mut rng = StdRng::seed_from_u64(15);
        let hidden = SelectionConstraints::excluding(POOL.keys()).without_concepts();
        assert_eq!(POOL.resolve(&mut rng, Some("idea_b"), &hidden), "idea_b");
        assert_eq!(POOL.resolve(&mut rng, Some("unknown"), &hidden), "calc_a");
    }

    #[test]
    fn unconstrained_selection_reaches_every_key() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..400 {
            seen.insert(POOL.select(&mut rng, &SelectionConstraints::default()));
        }
        assert_eq!(seen.len(), 4);
    }
}
