use regex::Regex;
use std::sync::LazyLock;

static STAT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,3}(?:,\d{3})+|\d{1,15})(\D*)$").expect("valid regex")
});

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatTarget {
    pub original: String,
    pub value: u64,
    pub suffix: String,
}

impl StatTarget {
    pub fn parse(text: &str) -> Option<Self> {
        let captures = STAT_PATTERN.captures(text)?;
        let value = captures.get(1)?.as_str().replace(',', "").parse::<u64>().ok()?;
        let suffix = captures.get(2).map_or("", |m| m.as_str()).trim_end();

        Some(Self {
            original: text.to_string(),
            value,
            suffix: suffix.to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CounterAnimation {
    target: StatTarget,
    steps: u32,
    step: u32,
}

impl CounterAnimation {
    pub fn new(target: StatTarget, steps: u32) -> Self {
        Self {
            target,
            steps: steps.max(1),
            step: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.steps
    }

    /// Text for the next frame, or `None` once the final frame was produced.
    /// The last frame is always the authored text.
    pub fn tick(&mut self) -> Option<String> {
        if self.is_finished() {
            return None;
        }

        self.step += 1;
        if self.is_finished() {
            return Some(self.target.original.clone());
        }

        let steps = u128::from(self.steps);
        let scaled = u128::from(self.target.value) * u128::from(self.step);
        let current = scaled.div_ceil(steps).min(u128::from(self.target.value));
        Some(format!("{current}{}", self.target.suffix))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatsTrigger {
    fired: bool,
}

impl StatsTrigger {
    pub fn fire(&mut self) -> bool {
        !std::mem::replace(&mut self.fired, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(text: &str, steps: u32) -> Vec<String> {
        let target = StatTarget::parse(text).expect("numeric stat");
        let mut animation = CounterAnimation::new(target, steps);
        std::iter::from_fn(|| animation.tick()).collect()
    }

    fn leading_number(frame: &str) -> u64 {
        frame
            .trim_end_matches(|c: char| !c.is_ascii_digit())
            .parse()
            .expect("frame starts with digits")
    }

    #[test]
    fn counter_climbs_monotonically_and_lands_on_the_authored_text() {
        let sequence = frames("50+", 50);

        assert_eq!(sequence.len(), 50);
        assert_eq!(sequence.first().map(String::as_str), Some("1+"));
        assert_eq!(sequence.last().map(String::as_str), Some("50+"));

        let values: Vec<u64> = sequence.iter().map(|frame| leading_number(frame)).collect();
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        assert!(sequence.iter().all(|frame| frame.ends_with('+')));
    }

    #[test]
    fn small_targets_repeat_values_instead_of_overshooting() {
        let sequence = frames("3 yrs", 50);

        let values: Vec<u64> = sequence.iter().map(|frame| leading_number(frame)).collect();
        assert!(values.iter().all(|value| *value <= 3));
        assert_eq!(sequence.last().map(String::as_str), Some("3 yrs"));
    }

    #[test]
    fn malformed_stats_are_not_animated() {
        assert_eq!(StatTarget::parse("∞"), None);
        assert_eq!(StatTarget::parse("v2"), None);
        assert_eq!(StatTarget::parse("10k20"), None);
        assert_eq!(StatTarget::parse(""), None);
        assert_eq!(StatTarget::parse("12,34"), None);
    }

    #[test]
    fn thousands_separators_count_to_the_full_value() {
        let target = StatTarget::parse("1,000+").expect("grouped stat");
        assert_eq!(target.value, 1_000);
        assert_eq!(target.suffix, "+");

        let sequence = frames("1,000+", 50);
        assert_eq!(sequence.first().map(String::as_str), Some("20+"));
        assert_eq!(sequence[48], "980+");
        assert_eq!(sequence.last().map(String::as_str), Some("1,000+"));
    }

    #[test]
    fn suffix_is_preserved() {
        let target = StatTarget::parse("120+").expect("numeric stat");
        assert_eq!(target.value, 120);
        assert_eq!(target.suffix, "+");

        let bare = StatTarget::parse("7").expect("numeric stat");
        assert_eq!(bare.suffix, "");
    }

    #[test]
    fn trigger_fires_at_most_once() {
        let mut trigger = StatsTrigger::default();
        assert!(trigger.fire());
        assert!(!trigger.fire());
        assert!(!trigger.fire());
    }
}
