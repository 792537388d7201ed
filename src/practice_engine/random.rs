//! Randomness and small numeric helpers shared by every topic generator.
//!
//! All functions take the caller's RNG so a seeded request reproduces the
//! same numbers in the same order.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniform integer in `min..=max`. The bounds may be given in either order.
pub fn rand_int<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rng.gen_range(lo..=hi)
}

/// Uniform integer in `min..=max` that is never zero.
///
/// Falls back to `1` when the range only contains zero.
pub fn rand_nonzero<R: Rng>(rng: &mut R, min: i64, max: i64) -> i64 {
    if min == 0 && max == 0 {
        return 1;
    }
    loop {
        let n = rand_int(rng, min, max);
        if n != 0 {
            return n;
        }
    }
}

/// Uniform float in `min..=max`, rounded to `decimals` places.
pub fn rand_float<R: Rng>(rng: &mut R, min: f64, max: f64, decimals: u32) -> f64 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    let raw = if lo == hi { lo } else { rng.gen_range(lo..=hi) };
    round_to(raw, decimals)
}

/// Round half away from zero to a fixed number of decimals.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Pick one element uniformly. `None` only for an empty slice.
pub fn pick<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    items.choose(rng)
}

/// Pick one element with probability proportional to its weight.
///
/// Returns `None` when the slice is empty or every weight is zero.
pub fn weighted_choice<'a, T, R: Rng>(
    rng: &mut R,
    items: &'a [(T, u32)],
) -> Option<&'a T> {
    let dist = WeightedIndex::new(items.iter().map(|(_, w)| *w)).ok()?;
    items.get(dist.sample(rng)).map(|(item, _)| item)
}

/// Greatest common divisor, always non-negative. `gcd(0, 0) == 0`.
pub fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a as i64
}

/// Least common multiple, always non-negative. Zero if either input is zero.
pub fn lcm(a: i64, b: i64) -> i64 {
    if a == 0 || b == 0 {
        return 0;
    }
    (a / gcd(a, b) * b).abs()
}

/// Reduce `n/d` to lowest terms with a positive denominator.
pub fn reduce_fraction(n: i64, d: i64) -> (i64, i64) {
    let g = gcd(n, d).max(1);
    let (n, d) = (n / g, d / g);
    if d < 0 { (-n, -d) } else { (n, d) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn rand_int_stays_in_range_and_accepts_swapped_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..500 {
            let n = rand_int(&mut rng, 10, -3);
            assert!((-3..=10).contains(&n));
        }
    }

    #[test]
    fn rand_nonzero_never_returns_zero() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..500 {
            assert_ne!(rand_nonzero(&mut rng, -2, 2), 0);
        }
        assert_eq!(rand_nonzero(&mut rng, 0, 0), 1);
    }

    #[test]
    fn rand_float_is_rounded() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let v = rand_float(&mut rng, 1.0, 9.0, 1);
            assert!((1.0..=9.0).contains(&v));
            assert_eq!(round_to(v, 1), v);
        }
    }

    #[test]
    fn weighted_choice_skips_zero_weights() {
        let mut rng = StdRng::seed_from_u64(4);
        let items = [("never", 0u32), ("always", 5)];
        for _ in 0..100 {
            assert_eq!(weighted_choice(&mut rng, &items), Some(&"always"));
        }
        let empty: [(&str, u32); 0] = [];
        assert_eq!(weighted_choice(&mut rng, &empty), None);
        assert_eq!(weighted_choice(&mut rng, &[("a", 0u32)]), None);
    }

    #[test]
    fn gcd_and_lcm() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(lcm(4, 6), 12);
        assert_eq!(lcm(-4, 6), 12);
        assert_eq!(lcm(0, 6), 0);
    }

    #[test]
    fn reduce_fraction_normalises_sign() {
        assert_eq!(reduce_fraction(6, 8), (3, 4));
        assert_eq!(reduce_fraction(3, -9), (-1, 3));
        assert_eq!(reduce_fraction(0, 5), (0, 1));
    }
}
