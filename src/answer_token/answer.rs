//! Canonical answers and the normalisation that decides "same answer".
//!
//! A generator produces a [`CanonicalAnswer`] before any hint text is built.
//! The variant is serialized with an explicit `type` tag inside the token, so
//! the verifying side knows the shape without sniffing the decrypted string.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ground-truth answer computed by a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CanonicalAnswer {
    Numeric(f64),
    Text(String),
    Structured(Value),
}

impl CanonicalAnswer {
    /// Scale-style ratio `{ "left": l, "right": r }`.
    pub fn ratio(left: i64, right: i64) -> Self {
        let mut map = Map::new();
        map.insert("left".into(), Value::from(left));
        map.insert("right".into(), Value::from(right));
        CanonicalAnswer::Structured(Value::Object(map))
    }

    /// Fraction in the `n/d` text form. Callers reduce before calling.
    pub fn fraction(numerator: i64, denominator: i64) -> Self {
        CanonicalAnswer::Text(format!("{numerator}/{denominator}"))
    }

    /// The exact string that submissions are compared against (before normalisation).
    pub fn canonical_string(&self) -> String {
        match self {
            CanonicalAnswer::Numeric(v) => format_number(*v),
            CanonicalAnswer::Text(s) => s.clone(),
            CanonicalAnswer::Structured(v) => v.to_string(),
        }
    }

    /// How the answer is written out in the final hint step.
    ///
    /// Ratios read as `l:r`; everything else uses the canonical string.
    pub fn human_readable(&self) -> String {
        match self {
            CanonicalAnswer::Structured(v) => match ratio_parts(v) {
                Some((l, r)) => format!("{l}:{r}"),
                None => v.to_string(),
            },
            other => other.canonical_string(),
        }
    }

    /// Bring a raw learner submission into this answer's canonical string form.
    ///
    /// Only structured answers need this: a JSON submission is re-serialized
    /// compactly with sorted keys, and `l:r` is lifted to a ratio object when
    /// the expected answer is a ratio. Other shapes pass through unchanged.
    pub fn canonicalize_submission(&self, raw: &str) -> String {
        let CanonicalAnswer::Structured(expected) = self else {
            return raw.to_string();
        };
        let trimmed = raw.trim();
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return value.to_string();
        }
        if ratio_parts(expected).is_some() {
            if let Some((l, r)) = trimmed.split_once(':') {
                if let (Some(l), Some(r)) = (parse_integer(l), parse_integer(r)) {
                    let mut map = Map::new();
                    map.insert("left".into(), Value::from(l));
                    map.insert("right".into(), Value::from(r));
                    return Value::Object(map).to_string();
                }
            }
        }
        raw.to_string()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, CanonicalAnswer::Numeric(_))
    }
}

impl From<f64> for CanonicalAnswer {
    fn from(v: f64) -> Self {
        CanonicalAnswer::Numeric(v)
    }
}

impl From<i64> for CanonicalAnswer {
    fn from(v: i64) -> Self {
        CanonicalAnswer::Numeric(v as f64)
    }
}

impl From<&str> for CanonicalAnswer {
    fn from(s: &str) -> Self {
        CanonicalAnswer::Text(s.to_string())
    }
}

impl From<String> for CanonicalAnswer {
    fn from(s: String) -> Self {
        CanonicalAnswer::Text(s)
    }
}

impl From<Value> for CanonicalAnswer {
    fn from(v: Value) -> Self {
        CanonicalAnswer::Structured(v)
    }
}

fn ratio_parts(v: &Value) -> Option<(i64, i64)> {
    let obj = v.as_object()?;
    Some((obj.get("left")?.as_i64()?, obj.get("right")?.as_i64()?))
}

fn parse_integer(s: &str) -> Option<i64> {
    let cleaned: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    cleaned.parse().ok()
}

/// Lexical normalisation applied to both sides before comparison:
/// lower-case, trim, decimal comma to point, strip every whitespace character.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(',', ".")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Deterministic decimal rendering: at most 6 decimals, trailing zeros
/// trimmed, no grouping separators, never `-0`.
pub fn format_number(v: f64) -> String {
    let s = format!("{:.6}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Parse a normalised string as a finite number.
///
/// Only plain signed decimals (`-12`, `3.5`) count; exponents, a leading
/// `+`, and bare trailing or leading points do not.
pub fn parse_finite(s: &str) -> Option<f64> {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !digits(int) || !frac.map_or(true, digits) {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_handles_lexical_noise() {
        assert_eq!(normalize("  5,5 "), "5.5");
        assert_eq!(normalize("X = 4"), "x=4");
        assert_eq!(normalize("\t3 / 4\n"), "3/4");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn normalize_does_not_equate_fraction_and_decimal() {
        assert_ne!(normalize("1/2"), normalize("0.5"));
    }

    #[test]
    fn format_number_is_fixed_and_trimmed() {
        assert_eq!(format_number(42.0), "42");
        assert_eq!(format_number(5.5), "5.5");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-0.0000001), "0");
        assert_eq!(format_number(1234567.25), "1234567.25");
        assert_eq!(format_number(-3.14159265), "-3.141593");
    }

    #[test]
    fn parse_finite_rejects_specials() {
        assert_eq!(parse_finite("10.5"), Some(10.5));
        assert_eq!(parse_finite("inf"), None);
        assert_eq!(parse_finite("nan"), None);
        assert_eq!(parse_finite("5.5x"), None);
    }

    #[test]
    fn parse_finite_accepts_only_plain_decimals() {
        assert_eq!(parse_finite("-12"), Some(-12.0));
        assert_eq!(parse_finite("0.25"), Some(0.25));
        for raw in ["1e1", "+10", "10.", ".5", "-", "", "1.2.3", "--1", "1_000"] {
            assert_eq!(parse_finite(raw), None, "{raw}");
        }
    }

    #[test]
    fn ratio_accepts_colon_and_json_submissions() {
        let answer = CanonicalAnswer::ratio(1, 50);
        let canonical = answer.canonical_string();
        assert_eq!(canonical, r#"{"left":1,"right":50}"#);
        assert_eq!(answer.human_readable(), "1:50");
        assert_eq!(answer.canonicalize_submission("1 : 50"), canonical);
        assert_eq!(answer.canonicalize_submission(r#"{ "right": 50, "left": 1 }"#), canonical);
        assert_eq!(answer.canonicalize_submission("1/50"), "1/50");
    }

    #[test]
    fn non_structured_submissions_pass_through() {
        let answer = CanonicalAnswer::from("3/4");
        assert_eq!(answer.canonicalize_submission(" 3/4 "), " 3/4 ");
    }

    #[test]
    fn tagged_serialization_carries_discriminant() {
        let json = serde_json::to_string(&CanonicalAnswer::from(7i64)).unwrap();
        assert_eq!(json, r#"{"type":"numeric","value":7.0}"#);
        let back: CanonicalAnswer = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CanonicalAnswer::Numeric(7.0));
    }
}
