use serde::Serialize;

use crate::shortcuts::ShortcutStyle;
use crate::telemetry::{LogLevel, DEFAULT_LOG_LEVEL};
use crate::toast::ToastTiming;

const DEFAULT_HOME_NAV_THRESHOLD_PX: f64 = 100.0;
const DEFAULT_NOT_FOUND_NAV_THRESHOLD_PX: f64 = 50.0;
const DEFAULT_SECTION_OFFSET_PX: f64 = 150.0;
const DEFAULT_ANCHOR_GAP_PX: f64 = 40.0;
const DEFAULT_CURSOR_MIN_VIEWPORT_PX: f64 = 1024.0;
const DEFAULT_MOBILE_BREAKPOINT_PX: f64 = 768.0;
const DEFAULT_REVEAL_THRESHOLD: f64 = 0.15;
const DEFAULT_REVEAL_ROOT_MARGIN: &str = "0px 0px -100px 0px";
const DEFAULT_STATS_THRESHOLD: f64 = 0.5;
const DEFAULT_STAT_STEPS: u32 = 50;
const DEFAULT_STAT_INTERVAL_MS: u32 = 30;
const DEFAULT_STAGGER_STEP_MS: u32 = 100;
const DEFAULT_TOAST_DISPLAY_MS: u32 = 3_000;
const DEFAULT_TOAST_EXIT_MS: u32 = 300;
const DEFAULT_TOAST_MAX_VISIBLE: usize = 4;
const DEFAULT_FORM_RESET_MS: u32 = 3_000;
const DEFAULT_FADE_IN_DELAY_MS: u32 = 100;

const CURSOR_EASE: f64 = 0.9;
const FOLLOWER_EASE: f64 = 0.15;
const TILT_DIVISOR: f64 = 25.0;
const TILT_PERSPECTIVE_PX: f64 = 1_000.0;
const TILT_LIFT_PX: f64 = 8.0;

const NAV_THRESHOLD_PX_BOUNDS: (f64, f64) = (0.0, 2_000.0);
const SECTION_OFFSET_PX_BOUNDS: (f64, f64) = (0.0, 1_000.0);
const ANCHOR_GAP_PX_BOUNDS: (f64, f64) = (0.0, 500.0);
const CURSOR_MIN_VIEWPORT_PX_BOUNDS: (f64, f64) = (0.0, 10_000.0);
const REVEAL_THRESHOLD_BOUNDS: (f64, f64) = (0.0, 1.0);
const STAT_STEPS_BOUNDS: (u32, u32) = (1, 1_000);
const STAT_INTERVAL_MS_BOUNDS: (u32, u32) = (1, 1_000);
const TOAST_DISPLAY_MS_BOUNDS: (u32, u32) = (500, 60_000);
const TOAST_MAX_VISIBLE_BOUNDS: (u32, u32) = (1, 10);
const FORM_RESET_MS_BOUNDS: (u32, u32) = (0, 60_000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageProfile {
    Home,
    NotFound,
}

impl PageProfile {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" | "index" => Some(Self::Home),
            "not-found" | "404" => Some(Self::NotFound),
            _ => None,
        }
    }

    pub fn shortcut_style(self) -> ShortcutStyle {
        match self {
            Self::Home => ShortcutStyle::AltLetter,
            Self::NotFound => ShortcutStyle::PlainLetter,
        }
    }

    fn default_nav_threshold(self) -> f64 {
        match self {
            Self::Home => DEFAULT_HOME_NAV_THRESHOLD_PX,
            Self::NotFound => DEFAULT_NOT_FOUND_NAV_THRESHOLD_PX,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InteractionConfig {
    pub page: PageProfile,
    pub nav_threshold_px: f64,
    pub section_offset_px: f64,
    pub anchor_gap_px: f64,
    pub cursor_min_viewport_px: f64,
    pub cursor_ease: f64,
    pub follower_ease: f64,
    pub tilt_divisor: f64,
    pub tilt_perspective_px: f64,
    pub tilt_lift_px: f64,
    pub mobile_breakpoint_px: f64,
    pub reveal_threshold: f64,
    pub reveal_root_margin: String,
    pub stagger_step_ms: u32,
    pub stats_threshold: f64,
    pub stat_steps: u32,
    pub stat_interval_ms: u32,
    pub toast: ToastTiming,
    pub form_reset_ms: u32,
    pub fade_in_delay_ms: u32,
    pub log_level: LogLevel,
}

impl InteractionConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let page = lookup("page")
            .and_then(|value| PageProfile::parse(&value))
            .unwrap_or(PageProfile::Home);
        let log_level = lookup("log-level")
            .and_then(|value| LogLevel::parse(&value))
            .unwrap_or(DEFAULT_LOG_LEVEL);

        let toast = ToastTiming {
            display_ms: parse_u32_with_bounds(
                &lookup,
                "toast-duration",
                DEFAULT_TOAST_DISPLAY_MS,
                TOAST_DISPLAY_MS_BOUNDS,
            ),
            exit_ms: DEFAULT_TOAST_EXIT_MS,
            max_visible: parse_u32_with_bounds(
                &lookup,
                "max-toasts",
                DEFAULT_TOAST_MAX_VISIBLE as u32,
                TOAST_MAX_VISIBLE_BOUNDS,
            ) as usize,
        };

        Self {
            page,
            nav_threshold_px: parse_f64_with_bounds(
                &lookup,
                "nav-threshold",
                page.default_nav_threshold(),
                NAV_THRESHOLD_PX_BOUNDS,
            ),
            section_offset_px: parse_f64_with_bounds(
                &lookup,
                "section-offset",
                DEFAULT_SECTION_OFFSET_PX,
                SECTION_OFFSET_PX_BOUNDS,
            ),
            anchor_gap_px: parse_f64_with_bounds(
                &lookup,
                "anchor-gap",
                DEFAULT_ANCHOR_GAP_PX,
                ANCHOR_GAP_PX_BOUNDS,
            ),
            cursor_min_viewport_px: parse_f64_with_bounds(
                &lookup,
                "cursor-min-width",
                DEFAULT_CURSOR_MIN_VIEWPORT_PX,
                CURSOR_MIN_VIEWPORT_PX_BOUNDS,
            ),
            cursor_ease: CURSOR_EASE,
            follower_ease: FOLLOWER_EASE,
            tilt_divisor: TILT_DIVISOR,
            tilt_perspective_px: TILT_PERSPECTIVE_PX,
            tilt_lift_px: TILT_LIFT_PX,
            mobile_breakpoint_px: DEFAULT_MOBILE_BREAKPOINT_PX,
            reveal_threshold: parse_f64_with_bounds(
                &lookup,
                "reveal-threshold",
                DEFAULT_REVEAL_THRESHOLD,
                REVEAL_THRESHOLD_BOUNDS,
            ),
            reveal_root_margin: DEFAULT_REVEAL_ROOT_MARGIN.to_string(),
            stagger_step_ms: DEFAULT_STAGGER_STEP_MS,
            stats_threshold: DEFAULT_STATS_THRESHOLD,
            stat_steps: parse_u32_with_bounds(
                &lookup,
                "stat-steps",
                DEFAULT_STAT_STEPS,
                STAT_STEPS_BOUNDS,
            ),
            stat_interval_ms: parse_u32_with_bounds(
                &lookup,
                "stat-interval",
                DEFAULT_STAT_INTERVAL_MS,
                STAT_INTERVAL_MS_BOUNDS,
            ),
            toast,
            form_reset_ms: parse_u32_with_bounds(
                &lookup,
                "form-reset",
                DEFAULT_FORM_RESET_MS,
                FORM_RESET_MS_BOUNDS,
            ),
            fade_in_delay_ms: DEFAULT_FADE_IN_DELAY_MS,
            log_level,
        }
    }
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_f64_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f64,
    bounds: (f64, f64),
) -> f64 {
    lookup(key)
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_u32_with_bounds(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u32,
    bounds: (u32, u32),
) -> u32 {
    lookup(key)
        .and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| values.get(key).cloned()
    }

    #[test]
    fn defaults_follow_the_home_profile() {
        let config = InteractionConfig::default();

        assert_eq!(config.page, PageProfile::Home);
        assert_eq!(config.nav_threshold_px, 100.0);
        assert_eq!(config.section_offset_px, 150.0);
        assert_eq!(config.stat_steps, 50);
        assert_eq!(config.stat_interval_ms, 30);
        assert_eq!(config.toast.display_ms, 3_000);
        assert_eq!(config.toast.exit_ms, 300);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn not_found_profile_lowers_nav_threshold_and_uses_plain_shortcuts() {
        let config = InteractionConfig::from_lookup(lookup_from(&[("page", "not-found")]));

        assert_eq!(config.page, PageProfile::NotFound);
        assert_eq!(config.nav_threshold_px, 50.0);
        assert_eq!(config.page.shortcut_style(), ShortcutStyle::PlainLetter);
    }

    #[test]
    fn out_of_bounds_overrides_fall_back_to_defaults() {
        let config = InteractionConfig::from_lookup(lookup_from(&[
            ("nav-threshold", "80"),
            ("reveal-threshold", "1.5"),
            ("stat-steps", "0"),
            ("max-toasts", " 2 "),
            ("log-level", "debug"),
        ]));

        assert_eq!(config.nav_threshold_px, 80.0);
        assert_eq!(config.reveal_threshold, 0.15);
        assert_eq!(config.stat_steps, 50);
        assert_eq!(config.toast.max_visible, 2);
        assert_eq!(config.log_level, LogLevel::Debug);
    }
}
