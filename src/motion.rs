use std::fmt::Write as _;

const DEFAULT_PARALLAX_SPEED: f64 = 0.5;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothedPoint {
    position: Point,
    ease: f64,
}

impl SmoothedPoint {
    pub fn new(ease: f64) -> Self {
        Self {
            position: Point::default(),
            ease: ease.clamp(0.0, 1.0),
        }
    }

    pub fn step_toward(&mut self, target: Point) -> Point {
        self.position.x += (target.x - self.position.x) * self.ease;
        self.position.y += (target.y - self.position.y) * self.ease;
        self.position
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CursorTrail {
    pointer: Point,
    cursor: SmoothedPoint,
    follower: SmoothedPoint,
}

impl CursorTrail {
    pub fn new(cursor_ease: f64, follower_ease: f64) -> Self {
        Self {
            pointer: Point::default(),
            cursor: SmoothedPoint::new(cursor_ease),
            follower: SmoothedPoint::new(follower_ease),
        }
    }

    pub fn record_pointer(&mut self, x: f64, y: f64) {
        self.pointer = Point::new(x, y);
    }

    pub fn frame(&mut self) -> (Point, Point) {
        let cursor = self.cursor.step_toward(self.pointer);
        let follower = self.follower.step_toward(self.pointer);
        (cursor, follower)
    }
}

pub fn cursor_enabled(viewport_width: f64, min_viewport_width: f64) -> bool {
    viewport_width > min_viewport_width
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tilt {
    pub rotate_x_deg: f64,
    pub rotate_y_deg: f64,
    pub perspective_px: f64,
    pub lift_px: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltStyle {
    pub divisor: f64,
    pub perspective_px: f64,
    pub lift_px: f64,
}

pub fn tilt_for_pointer(client_x: f64, client_y: f64, rect: CardRect, style: TiltStyle) -> Tilt {
    let x = client_x - rect.left;
    let y = client_y - rect.top;
    let center_x = rect.width / 2.0;
    let center_y = rect.height / 2.0;

    Tilt {
        rotate_x_deg: (y - center_y) / style.divisor,
        rotate_y_deg: (center_x - x) / style.divisor,
        perspective_px: style.perspective_px,
        lift_px: style.lift_px,
    }
}

pub fn parallax_speed(raw: Option<&str>) -> f64 {
    raw.map(str::trim)
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_PARALLAX_SPEED)
}

pub fn parallax_offset(scroll_y: f64, speed: f64) -> f64 {
    -(scroll_y * speed)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriftRange {
    pub amplitude_px: f64,
    pub rotate_deg: f64,
    pub base_interval_ms: u32,
    pub per_index_ms: u32,
}

impl DriftRange {
    pub const FLOATING_ELEMENT: Self = Self {
        amplitude_px: 100.0,
        rotate_deg: 30.0,
        base_interval_ms: 4_000,
        per_index_ms: 1_000,
    };

    pub const FLOATING_CARD: Self = Self {
        amplitude_px: 20.0,
        rotate_deg: 0.0,
        base_interval_ms: 3_000,
        per_index_ms: 1_000,
    };

    pub fn interval_ms(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.base_interval_ms
            .saturating_add(self.per_index_ms.saturating_mul(index))
    }

    pub fn sample(&self, unit: [f64; 3]) -> Drift {
        Drift {
            x: (unit[0] - 0.5) * self.amplitude_px,
            y: (unit[1] - 0.5) * self.amplitude_px,
            rotate_deg: (unit[2] - 0.5) * self.rotate_deg,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Drift {
    pub x: f64,
    pub y: f64,
    pub rotate_deg: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionLayers {
    pub parallax_y: f64,
    pub drift: Drift,
    pub tilt: Option<Tilt>,
}

impl MotionLayers {
    pub fn compose(&self) -> Transform {
        Transform {
            perspective_px: self.tilt.map(|tilt| tilt.perspective_px),
            translate_x: self.drift.x,
            translate_y: self.parallax_y + self.drift.y,
            rotate_x_deg: self.tilt.map_or(0.0, |tilt| tilt.rotate_x_deg),
            rotate_y_deg: self.tilt.map_or(0.0, |tilt| tilt.rotate_y_deg),
            lift_px: self.tilt.map(|tilt| tilt.lift_px),
            rotate_deg: self.drift.rotate_deg,
            scale: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub perspective_px: Option<f64>,
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotate_x_deg: f64,
    pub rotate_y_deg: f64,
    /// Applied after the rotations, so it lifts along the tilted normal.
    pub lift_px: Option<f64>,
    pub rotate_deg: f64,
    pub scale: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            perspective_px: None,
            translate_x: 0.0,
            translate_y: 0.0,
            rotate_x_deg: 0.0,
            rotate_y_deg: 0.0,
            lift_px: None,
            rotate_deg: 0.0,
            scale: 1.0,
        }
    }
}

impl Transform {
    /// CSS `transform` value; empty for the identity so the stylesheet's own
    /// transform applies again.
    pub fn to_css(&self) -> String {
        let mut css = String::new();

        if let Some(perspective) = self.perspective_px {
            push_function(&mut css, format_args!("perspective({perspective}px)"));
        }
        if self.translate_x != 0.0 || self.translate_y != 0.0 {
            push_function(
                &mut css,
                format_args!("translate({}px, {}px)", self.translate_x, self.translate_y),
            );
        }
        if self.rotate_x_deg != 0.0 {
            push_function(&mut css, format_args!("rotateX({}deg)", self.rotate_x_deg));
        }
        if self.rotate_y_deg != 0.0 {
            push_function(&mut css, format_args!("rotateY({}deg)", self.rotate_y_deg));
        }
        if let Some(lift) = self.lift_px {
            push_function(&mut css, format_args!("translateY({}px)", -lift));
        }
        if self.rotate_deg != 0.0 {
            push_function(&mut css, format_args!("rotate({}deg)", self.rotate_deg));
        }
        if self.scale != 1.0 {
            push_function(&mut css, format_args!("scale({})", self.scale));
        }

        css
    }
}

fn push_function(css: &mut String, function: std::fmt::Arguments<'_>) {
    if !css.is_empty() {
        css.push(' ');
    }
    let _ = css.write_fmt(function);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tilt_style() -> TiltStyle {
        TiltStyle {
            divisor: 25.0,
            perspective_px: 1_000.0,
            lift_px: 8.0,
        }
    }

    #[test]
    fn cursor_closes_ninety_percent_and_follower_fifteen_percent_per_frame() {
        let mut trail = CursorTrail::new(0.9, 0.15);
        trail.record_pointer(100.0, 200.0);

        let (cursor, follower) = trail.frame();
        assert!((cursor.x - 90.0).abs() < 1e-9);
        assert!((cursor.y - 180.0).abs() < 1e-9);
        assert!((follower.x - 15.0).abs() < 1e-9);
        assert!((follower.y - 30.0).abs() < 1e-9);

        let (cursor, follower) = trail.frame();
        assert!((cursor.x - 99.0).abs() < 1e-9);
        assert!((follower.x - 27.75).abs() < 1e-9);
    }

    #[test]
    fn cursor_requires_a_desktop_viewport() {
        assert!(!cursor_enabled(1024.0, 1024.0));
        assert!(cursor_enabled(1025.0, 1024.0));
    }

    #[test]
    fn tilt_is_zero_at_the_card_centre_and_signed_off_centre() {
        let rect = CardRect {
            left: 100.0,
            top: 50.0,
            width: 300.0,
            height: 200.0,
        };

        let centred = tilt_for_pointer(250.0, 150.0, rect, tilt_style());
        assert_eq!(centred.rotate_x_deg, 0.0);
        assert_eq!(centred.rotate_y_deg, 0.0);

        let corner = tilt_for_pointer(100.0, 50.0, rect, tilt_style());
        assert_eq!(corner.rotate_x_deg, -4.0);
        assert_eq!(corner.rotate_y_deg, 6.0);
    }

    #[test]
    fn parallax_moves_against_the_scroll() {
        assert_eq!(parallax_offset(200.0, 0.5), -100.0);
        assert_eq!(parallax_speed(Some("0.2")), 0.2);
        assert_eq!(parallax_speed(Some("")), 0.5);
        assert_eq!(parallax_speed(Some("fast")), 0.5);
        assert_eq!(parallax_speed(None), 0.5);
    }

    #[test]
    fn layers_compose_without_clobbering_each_other() {
        let mut layers = MotionLayers {
            parallax_y: -40.0,
            ..MotionLayers::default()
        };
        layers.drift = DriftRange::FLOATING_ELEMENT.sample([1.0, 0.5, 0.0]);
        assert_eq!(
            layers.compose().to_css(),
            "translate(50px, -40px) rotate(-15deg)"
        );

        layers.tilt = Some(tilt_for_pointer(
            0.0,
            0.0,
            CardRect {
                left: 0.0,
                top: 0.0,
                width: 50.0,
                height: 50.0,
            },
            tilt_style(),
        ));
        assert_eq!(
            layers.compose().to_css(),
            "perspective(1000px) translate(50px, -40px) rotateX(-1deg) rotateY(1deg) translateY(-8px) rotate(-15deg)"
        );

        layers.tilt = None;
        layers.parallax_y = 0.0;
        layers.drift = Drift::default();
        assert_eq!(layers.compose().to_css(), "");
    }

    #[test]
    fn tilted_card_lifts_after_rotating() {
        let rect = CardRect {
            left: 100.0,
            top: 50.0,
            width: 300.0,
            height: 200.0,
        };
        let layers = MotionLayers {
            tilt: Some(tilt_for_pointer(100.0, 50.0, rect, tilt_style())),
            ..MotionLayers::default()
        };

        assert_eq!(
            layers.compose().to_css(),
            "perspective(1000px) rotateX(-4deg) rotateY(6deg) translateY(-8px)"
        );
    }

    #[test]
    fn drift_intervals_are_staggered_per_element() {
        assert_eq!(DriftRange::FLOATING_ELEMENT.interval_ms(0), 4_000);
        assert_eq!(DriftRange::FLOATING_ELEMENT.interval_ms(2), 6_000);
        assert_eq!(DriftRange::FLOATING_CARD.interval_ms(1), 4_000);
    }
}
