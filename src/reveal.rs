#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealTracker {
    entered: Vec<bool>,
}

impl RevealTracker {
    pub fn new(count: usize) -> Self {
        Self {
            entered: vec![false; count],
        }
    }

    /// Feeds one intersection report. Returns true only for the report that
    /// flips the element to entered; leaving the viewport never unflips it.
    pub fn observe(&mut self, index: usize, is_intersecting: bool) -> bool {
        let Some(entered) = self.entered.get_mut(index) else {
            return false;
        };
        if *entered || !is_intersecting {
            return false;
        }
        *entered = true;
        true
    }

    pub fn entered_count(&self) -> usize {
        self.entered.iter().filter(|entered| **entered).count()
    }
}

pub fn stagger_delays(count: usize, step_ms: u32) -> impl Iterator<Item = u32> {
    (0..count).map(move |index| {
        u32::try_from(index)
            .unwrap_or(u32::MAX)
            .saturating_mul(step_ms)
    })
}

pub fn lazy_image_source<'a>(
    src: Option<&'a str>,
    mobile_src: Option<&'a str>,
    viewport_width: f64,
    mobile_breakpoint: f64,
) -> Option<&'a str> {
    let non_empty = |value: Option<&'a str>| value.map(str::trim).filter(|value| !value.is_empty());

    if viewport_width <= mobile_breakpoint {
        if let Some(mobile) = non_empty(mobile_src) {
            return Some(mobile);
        }
    }
    non_empty(src)
}
