#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameGate {
    pending: bool,
}

impl FrameGate {
    pub fn request(&mut self) -> bool {
        !std::mem::replace(&mut self.pending, true)
    }

    pub fn begin_frame(&mut self) {
        self.pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionBounds {
    pub top: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub document_height: f64,
    pub viewport_height: f64,
}

pub fn nav_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Index of the last section whose (offset-adjusted) range contains
/// `scroll_y`. Later sections win when ranges overlap.
pub fn active_section(sections: &[SectionBounds], scroll_y: f64, offset: f64) -> Option<usize> {
    sections
        .iter()
        .enumerate()
        .filter(|(_, section)| {
            let top = section.top - offset;
            top <= scroll_y && scroll_y < top + section.height
        })
        .map(|(index, _)| index)
        .last()
}

/// Percentage of the scrollable distance covered. Not clamped; a page that
/// cannot scroll reports zero.
pub fn progress_percent(metrics: ScrollMetrics) -> f64 {
    let scrollable = metrics.document_height - metrics.viewport_height;
    if scrollable <= 0.0 {
        return 0.0;
    }
    metrics.scroll_y / scrollable * 100.0
}

pub fn anchor_scroll_target(target_top: f64, nav_height: f64, gap: f64) -> f64 {
    (target_top - nav_height - gap).max(0.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollUpdate {
    pub scrolled: bool,
    pub scrolled_changed: bool,
    pub highlight: Option<usize>,
    pub progress: f64,
    pub scroll_y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollReactor {
    threshold: f64,
    section_offset: f64,
    scrolled: bool,
    active: Option<usize>,
}

impl ScrollReactor {
    pub fn new(threshold: f64, section_offset: f64) -> Self {
        Self {
            threshold,
            section_offset,
            scrolled: false,
            active: None,
        }
    }

    /// Recomputes everything for one frame. When no section contains the
    /// scroll position the previous highlight stays.
    pub fn update(&mut self, metrics: ScrollMetrics, sections: &[SectionBounds]) -> ScrollUpdate {
        let scrolled = nav_scrolled(metrics.scroll_y, self.threshold);
        let scrolled_changed = scrolled != self.scrolled;
        self.scrolled = scrolled;

        let highlight = match active_section(sections, metrics.scroll_y, self.section_offset) {
            Some(index) if self.active != Some(index) => {
                self.active = Some(index);
                Some(index)
            }
            _ => None,
        };

        ScrollUpdate {
            scrolled,
            scrolled_changed,
            highlight,
            progress: progress_percent(metrics),
            scroll_y: metrics.scroll_y,
        }
    }
}
