use serde::{Deserialize, Serialize};

use super::canvas::{Canvas, Paint};
use super::geometry::Point;
use super::labels::{bearing_label, gps_time_label, heading_label};
use crate::display::DisplaySnapshot;
use crate::sky::{elevation_radius, project_all, DotStyle};

/// Elevations of the faint reference rings drawn while satellites are known.
const REFERENCE_RING_ELEVATIONS: [f64; 2] = [60.0, 30.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
enum CompassPoint {
    N,
    E,
    S,
    W,
}

impl CompassPoint {
    const ALL: [CompassPoint; 4] = [
        CompassPoint::N,
        CompassPoint::E,
        CompassPoint::S,
        CompassPoint::W,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Derived dimensions of the polar plot for one viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLayout {
    pub center: Point,
    pub circle_radius: f64,
}

impl FrameLayout {
    pub fn new(viewport: Viewport, text_height: f64) -> Self {
        let cx = viewport.width as f64 / 2.0;
        let cy = viewport.height as f64 / 2.0;
        Self {
            center: Point::new(cx, cy),
            circle_radius: cx.min(cy) - text_height * 2.0,
        }
    }

    /// Marker pointing up just past the rim, closed back on its tip.
    pub fn marker(&self) -> [Point; 4] {
        let Point { x: cx, y: cy } = self.center;
        let r = self.circle_radius;
        let tip = Point::new(cx, cy - r * 9.0 / 8.0);
        [
            tip,
            Point::new(cx - r / 16.0, cy - r * 7.0 / 8.0),
            Point::new(cx + r / 16.0, cy - r * 7.0 / 8.0),
            tip,
        ]
    }
}

/// Draws one frame of the sky view from a snapshot.
///
/// The compass rotation, when present, turns the whole rose and sky beneath a
/// fixed north marker. The travel marker is drawn in its own scope so its
/// rotation never leaks into the satellite dots.
pub fn render_frame<C: Canvas>(
    canvas: &mut C,
    snapshot: &DisplaySnapshot,
    viewport: Viewport,
    text_height: f64,
) {
    let layout = FrameLayout::new(viewport, text_height);
    let center = layout.center;
    let radius = layout.circle_radius;
    let marker = layout.marker();

    let mut scene = canvas.scoped();

    if let Some(fix) = &snapshot.fix {
        scene.draw_text(
            &gps_time_label(fix.timestamp_ms),
            Point::new(center.x, center.y * 2.0),
            Paint::Travel,
        );
    }

    if let Some(rotation) = snapshot.compass_rotation.filter(|r| r.is_finite()) {
        scene.draw_text(
            &heading_label(rotation),
            Point::new(center.x, text_height),
            Paint::Text,
        );
        scene.draw_path(&marker, Paint::Text);
        scene.rotate(rotation, center);
    }

    for point in CompassPoint::ALL {
        scene.draw_text(
            &point.to_string(),
            Point::new(center.x, center.y - radius),
            Paint::Text,
        );
        scene.rotate(90.0, center);
    }

    if snapshot.satellites.is_some() {
        for elevation in REFERENCE_RING_ELEVATIONS {
            scene.draw_circle(center, elevation_radius(elevation, radius), Paint::Ring);
        }
    }
    scene.draw_circle(center, radius, Paint::Ring);

    if let Some(magnetic_bearing) = snapshot.magnetic_bearing() {
        if magnetic_bearing.is_finite() {
            let mut travel = scene.scoped();
            travel.rotate(magnetic_bearing, center);
            travel.draw_path(&marker, Paint::Travel);
            travel.draw_text(&bearing_label(magnetic_bearing), marker[0], Paint::Travel);
        }
    }

    if let Some(satellites) = &snapshot.satellites {
        for dot in project_all(satellites, center, radius) {
            let paint = match dot.style {
                DotStyle::Filled => Paint::UsedSpot,
                DotStyle::Outlined => Paint::IgnoredSpot,
            };
            scene.draw_circle(dot.position, dot.radius, paint);
        }
    }
}
