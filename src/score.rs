//! Bounded one-decimal scores typed as text, stepped with buttons or set
//! with a slider.

use std::fmt;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("cannot build score grammar: {0}")]
    Grammar(#[from] regex::Error),

    #[error("maximum score {0} is above {MAX_SUPPORTED}, the largest the score grammar can express")]
    MaxTooLarge(u8),
}

/// Largest maximum whose every tenth up to it is a single digit or the
/// maximum itself.
pub const MAX_SUPPORTED: u8 = 10;

/// A non-negative score counted in tenths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Score(u16);

impl Score {
    pub const ZERO: Score = Score(0);

    pub fn from_tenths(tenths: u16) -> Self {
        Self(tenths)
    }

    pub fn tenths(self) -> u16 {
        self.0
    }

    pub fn as_f32(self) -> f32 {
        f32::from(self.0) / 10.0
    }

    /// Reads `"7"`, `"1,5"` or `"1.5"`. Anything else, including an empty
    /// string or a second fractional digit, gives `None`.
    pub fn parse(text: &str) -> Option<Score> {
        let (whole, fraction) = match text.split_once(['.', ',']) {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (text, None),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let whole: u16 = whole.parse().ok()?;
        let fraction = match fraction {
            None => 0,
            Some(digit) if digit.len() == 1 && digit.as_bytes()[0].is_ascii_digit() => {
                u16::from(digit.as_bytes()[0] - b'0')
            }
            Some(_) => return None,
        };

        whole.checked_mul(10)?.checked_add(fraction).map(Score)
    }

    /// Sum of the given scores, empty or malformed values counting as zero.
    /// Saturates instead of overflowing.
    pub fn total<'a>(values: impl IntoIterator<Item = &'a str>) -> Score {
        let tenths: u32 = values
            .into_iter()
            .filter_map(Score::parse)
            .map(|score| u32::from(score.tenths()))
            .sum();
        Score(u16::try_from(tenths).unwrap_or(u16::MAX))
    }
}

/// One decimal, comma separated.
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0 / 10, self.0 % 10)
    }
}

/// The `[0, max]` range every criterion is scored in.
#[derive(Debug, Clone)]
pub struct ScoreScale {
    max: u8,
    grammar: Regex,
}

impl ScoreScale {
    pub fn new(max: u8) -> Result<Self, ScoreError> {
        if max > MAX_SUPPORTED {
            return Err(ScoreError::MaxTooLarge(max));
        }

        let grammar = Regex::new(&format!(r"^({max}([.,]0)?|[0-9]([.,][0-9])?)$"))?;
        Ok(Self { max, grammar })
    }

    pub fn max(&self) -> Score {
        Score(u16::from(self.max) * 10)
    }

    /// Whether the text may stand in a score field.
    pub fn accepts(&self, text: &str) -> bool {
        if text.is_empty() {
            return true;
        }

        self.grammar.is_match(text) && Score::parse(text).is_some_and(|score| score <= self.max())
    }

    /// Returns the new field value for a raw edit, or `None` when the edit
    /// must be dropped and the field left as it was.
    pub fn edit(&self, proposed: &str) -> Option<String> {
        self.accepts(proposed).then(|| proposed.to_string())
    }

    /// Numeric value of a field; empty or malformed text reads as zero.
    pub fn value(&self, text: &str) -> Score {
        Score::parse(text).unwrap_or_default().min(self.max())
    }

    /// Moves the value by `steps` tenths, clamped to the scale.
    pub fn step(&self, text: &str, steps: i32) -> String {
        let tenths = i32::from(self.value(text).tenths()) + steps;
        let clamped = tenths.clamp(0, i32::from(self.max().tenths()));
        Score(clamped as u16).to_string()
    }

    pub fn can_increment(&self, text: &str) -> bool {
        self.value(text) < self.max()
    }

    pub fn can_decrement(&self, text: &str) -> bool {
        self.value(text) > Score::ZERO
    }

    /// Plus button. `None` when already at the maximum.
    pub fn increment(&self, text: &str) -> Option<String> {
        self.can_increment(text).then(|| self.step(text, 1))
    }

    /// Minus button. `None` when already at zero.
    pub fn decrement(&self, text: &str) -> Option<String> {
        self.can_decrement(text).then(|| self.step(text, -1))
    }

    pub fn slider_position(&self, text: &str) -> f32 {
        self.value(text).as_f32()
    }

    /// Field value for a slider position, snapped to the nearest tenth.
    pub fn from_slider(&self, position: f32) -> String {
        let tenths = (position * 10.0).round().clamp(0.0, f32::from(self.max().tenths()));
        Score(tenths as u16).to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn scale() -> ScoreScale {
        ScoreScale::new(2).unwrap()
    }

    #[test]
    fn parses_both_separators() {
        assert_eq!(Score::parse("1,5"), Some(Score::from_tenths(15)));
        assert_eq!(Score::parse("1.5"), Some(Score::from_tenths(15)));
        assert_eq!(Score::parse("2"), Some(Score::from_tenths(20)));
        assert_eq!(Score::parse(""), None);
        assert_eq!(Score::parse("1,55"), None);
        assert_eq!(Score::parse(",5"), None);
        assert_eq!(Score::parse("1,"), None);
        assert_eq!(Score::parse("-1"), None);
    }

    #[test]
    fn displays_with_a_comma() {
        assert_eq!(Score::from_tenths(0).to_string(), "0,0");
        assert_eq!(Score::from_tenths(15).to_string(), "1,5");
        assert_eq!(Score::from_tenths(100).to_string(), "10,0");
    }

    #[test]
    fn rejects_malformed_edits() {
        let scale = scale();
        assert_eq!(scale.edit("abc"), None);
        assert_eq!(scale.edit("1,5"), Some("1,5".to_string()));
        assert_eq!(scale.edit("1.5"), Some("1.5".to_string()));
        assert_eq!(scale.edit("3,0"), None);
        assert_eq!(scale.edit("2,0"), Some("2,0".to_string()));
        assert_eq!(scale.edit("2,5"), None);
        assert_eq!(scale.edit("1,55"), None);
        assert_eq!(scale.edit(""), Some(String::new()));
    }

    #[test]
    fn accepts_two_digit_maximum() {
        let scale = ScoreScale::new(10).unwrap();
        assert!(scale.accepts("10"));
        assert!(scale.accepts("10,0"));
        assert!(scale.accepts("9,9"));
        assert!(!scale.accepts("10,5"));
        assert!(!scale.accepts("11"));
    }

    #[test]
    fn refuses_maximums_the_grammar_cannot_express() {
        assert!(matches!(ScoreScale::new(11), Err(ScoreError::MaxTooLarge(11))));
        assert!(matches!(ScoreScale::new(12), Err(ScoreError::MaxTooLarge(12))));
        assert!(ScoreScale::new(MAX_SUPPORTED).is_ok());
    }

    #[test]
    fn every_reachable_value_is_accepted() {
        for max in 0..=MAX_SUPPORTED {
            let scale = ScoreScale::new(max).unwrap();
            let mut value = String::new();
            for _ in 0..=u16::from(max) * 10 {
                value = scale.step(&value, 1);
                assert!(scale.accepts(&value), "max {max}: stepped to {value:?}");
            }
            for tenth in 0..=u16::from(max) * 10 {
                let slid = scale.from_slider(f32::from(tenth) / 10.0);
                assert!(scale.accepts(&slid), "max {max}: slider gave {slid:?}");
            }
        }
    }

    #[test]
    fn stepping_is_clamped_to_the_scale() {
        let scale = scale();
        for start in ["", "0", "0,3", "1,5", "1.9", "2"] {
            for n in 0..30 {
                let expected = (i32::from(scale.value(start).tenths()) + n).clamp(0, 20);

                let mut up = start.to_string();
                let mut down = start.to_string();
                for _ in 0..n {
                    up = scale.step(&up, 1);
                    down = scale.step(&down, -1);
                }

                assert_eq!(scale.value(&up).tenths() as i32, expected, "{start:?} +{n}");
                let expected = (i32::from(scale.value(start).tenths()) - n).clamp(0, 20);
                assert_eq!(scale.value(&down).tenths() as i32, expected, "{start:?} -{n}");
            }
        }
    }

    #[test]
    fn buttons_are_disabled_at_the_bounds() {
        let scale = scale();
        assert_eq!(scale.decrement(""), None);
        assert_eq!(scale.decrement("0,0"), None);
        assert_eq!(scale.increment("2"), None);
        assert_eq!(scale.increment("1,9"), Some("2,0".to_string()));
        assert_eq!(scale.decrement("0.1"), Some("0,0".to_string()));
        assert_eq!(scale.increment(""), Some("0,1".to_string()));
    }

    #[test]
    fn slider_tracks_the_text_value() {
        let scale = scale();
        assert_eq!(scale.slider_position("1,5"), 1.5);
        assert_eq!(scale.slider_position(""), 0.0);
        assert_eq!(scale.from_slider(1.4999), "1,5");
        assert_eq!(scale.from_slider(0.3), "0,3");
        assert_eq!(scale.from_slider(7.0), "2,0");
    }

    #[test]
    fn total_ignores_empty_fields() {
        let total = Score::total(["1,5", "", "2", "0.3", "abc"]);
        assert_eq!(total, Score::from_tenths(38));
        assert_eq!(total.to_string(), "3,8");
    }

    #[test]
    fn total_saturates_on_huge_values() {
        assert_eq!(Score::total(["6553", "6553", "1"]), Score::from_tenths(u16::MAX));
    }
}
