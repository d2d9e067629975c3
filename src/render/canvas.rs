use serde::Serialize;
use std::fmt;
use std::ops::{Deref, DerefMut};

use super::geometry::{apply, rotation_about, Point, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaintStyle {
    Fill,
    Stroke,
    FillAndStroke,
}

/// What a primitive is drawn with. Backends pick the actual colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Paint {
    /// Labels, compass letters and the fixed north marker.
    Text,
    /// Travel direction marker, its label and the GPS clock.
    Travel,
    /// Elevation rings.
    Ring,
    /// Satellite used in the position solution.
    UsedSpot,
    /// Satellite tracked but not used.
    IgnoredSpot,
}

impl Paint {
    pub fn style(&self) -> PaintStyle {
        match self {
            Paint::Text => PaintStyle::FillAndStroke,
            Paint::Travel => PaintStyle::FillAndStroke,
            Paint::Ring => PaintStyle::Stroke,
            Paint::UsedSpot => PaintStyle::Fill,
            Paint::IgnoredSpot => PaintStyle::Stroke,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Paint::Text => "white",
            Paint::Travel => "magenta",
            Paint::Ring => "yellow",
            Paint::UsedSpot => "green",
            Paint::IgnoredSpot => "cyan",
        }
    }
}

/// Immediate-mode 2D drawing surface with a save/restore transform stack.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    /// Rotates everything drawn afterwards about `pivot`, clockwise for positive degrees.
    fn rotate(&mut self, degrees: f64, pivot: Point);
    /// Text is centred horizontally on `at`, with its baseline at `at.y`.
    fn draw_text(&mut self, text: &str, at: Point, paint: Paint);
    fn draw_circle(&mut self, center: Point, radius: f64, paint: Paint);
    fn draw_path(&mut self, points: &[Point], paint: Paint);

    /// Saves the current transform; it is restored when the guard drops.
    fn scoped(&mut self) -> ScopedTransform<'_, Self>
    where
        Self: Sized,
    {
        ScopedTransform::new(self)
    }
}

/// Save/restore pair tied to a lexical scope.
pub struct ScopedTransform<'a, C: Canvas> {
    canvas: &'a mut C,
}

impl<'a, C: Canvas> ScopedTransform<'a, C> {
    pub fn new(canvas: &'a mut C) -> Self {
        canvas.save();
        Self { canvas }
    }
}

impl<C: Canvas> Deref for ScopedTransform<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: Canvas> DerefMut for ScopedTransform<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: Canvas> Drop for ScopedTransform<'_, C> {
    fn drop(&mut self) {
        self.canvas.restore();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Save,
    Restore,
    Rotate { degrees: f64, pivot: Point },
    Text { text: String, at: Point, paint: Paint },
    Circle { center: Point, radius: f64, paint: Paint },
    Path { points: Vec<Point>, paint: Paint },
}

struct PaintTag(Paint);

impl fmt::Display for PaintTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.0, self.0.color(), self.0.style())
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCommand::Save => write!(f, "save"),
            DrawCommand::Restore => write!(f, "restore"),
            DrawCommand::Rotate { degrees, pivot } => write!(f, "rotate {:.1} about {}", degrees, pivot),
            DrawCommand::Text { text, at, paint } => write!(f, "text {:?} at {} {}", text, at, PaintTag(*paint)),
            DrawCommand::Circle { center, radius, paint } => {
                write!(f, "circle {} r={:.1} {}", center, radius, PaintTag(*paint))
            }
            DrawCommand::Path { points, paint } => {
                let pts: Vec<String> = points.iter().map(|p| p.to_string()).collect();
                write!(f, "path {} {}", pts.join(" "), PaintTag(*paint))
            }
        }
    }
}

/// A primitive together with the transform in effect when it was drawn.
#[derive(Debug, Clone, Copy)]
pub struct Placed<'a> {
    pub command: &'a DrawCommand,
    pub transform: Transform,
}

impl Placed<'_> {
    /// Anchor point of the primitive in screen coordinates.
    pub fn anchor(&self) -> Option<Point> {
        let p = match self.command {
            DrawCommand::Text { at, .. } => *at,
            DrawCommand::Circle { center, .. } => *center,
            DrawCommand::Path { points, .. } => *points.first()?,
            _ => return None,
        };
        Some(apply(&self.transform, p))
    }
}

impl fmt::Display for Placed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.anchor() {
            Some(anchor) => write!(f, "{} -> {}", self.command, anchor),
            None => write!(f, "{}", self.command),
        }
    }
}

/// Replays the save/rotate/restore stack of `commands` and returns every
/// primitive with the transform it was drawn under.
pub fn place(commands: &[DrawCommand]) -> Vec<Placed<'_>> {
    let mut stack = Vec::new();
    let mut current = Transform::identity();
    let mut out = Vec::new();

    for command in commands {
        match command {
            DrawCommand::Save => stack.push(current),
            DrawCommand::Restore => current = stack.pop().unwrap_or_else(Transform::identity),
            DrawCommand::Rotate { degrees, pivot } => {
                current *= rotation_about(*degrees, *pivot);
            }
            _ => out.push(Placed {
                command,
                transform: current,
            }),
        }
    }
    out
}

/// Canvas that records what was drawn.
#[derive(Debug, Clone, Default)]
pub struct CommandList {
    commands: Vec<DrawCommand>,
    depth: usize,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Number of saves not yet matched by a restore.
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Canvas for CommandList {
    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        if self.depth == 0 {
            log::warn!("Unbalanced restore ignored");
            return;
        }
        self.depth -= 1;
        self.commands.push(DrawCommand::Restore);
    }

    fn rotate(&mut self, degrees: f64, pivot: Point) {
        self.commands.push(DrawCommand::Rotate { degrees, pivot });
    }

    fn draw_text(&mut self, text: &str, at: Point, paint: Paint) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            paint,
        });
    }

    fn draw_circle(&mut self, center: Point, radius: f64, paint: Paint) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            paint,
        });
    }

    fn draw_path(&mut self, points: &[Point], paint: Paint) {
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            paint,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_transform_restores_on_drop() {
        let mut list = CommandList::new();
        {
            let mut scope = list.scoped();
            scope.rotate(45.0, Point::new(0.0, 0.0));
            assert_eq!(scope.depth(), 1);
        }
        assert_eq!(list.depth(), 0);
        assert_eq!(
            list.commands().last(),
            Some(&DrawCommand::Restore)
        );
    }

    #[test]
    fn scoped_transform_restores_on_unwind() {
        let mut list = CommandList::new();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut scope = list.scoped();
            scope.rotate(10.0, Point::new(0.0, 0.0));
            panic!("draw failed");
        }));
        assert!(result.is_err());
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn placed_primitives_carry_scoped_rotation_only_inside_scope() {
        let pivot = Point::new(50.0, 50.0);
        let top = Point::new(50.0, 0.0);
        let mut list = CommandList::new();
        {
            let mut scope = list.scoped();
            scope.rotate(90.0, pivot);
            scope.draw_circle(top, 1.0, Paint::Ring);
        }
        list.draw_circle(top, 1.0, Paint::Ring);

        let placed = place(list.commands());
        assert_eq!(placed.len(), 2);
        let rotated = placed[0].anchor().unwrap();
        assert!(rotated.distance_to(Point::new(100.0, 50.0)) < 1e-9);
        assert_eq!(placed[1].anchor(), Some(top));
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut list = CommandList::new();
        list.restore();
        assert!(list.commands().is_empty());
    }

    #[test]
    fn commands_print_readably() {
        let cmd = DrawCommand::Text {
            text: "N".into(),
            at: Point::new(1.0, 2.0),
            paint: Paint::Text,
        };
        assert_eq!(
            cmd.to_string(),
            "text \"N\" at (1.0, 2.0) [text white fill_and_stroke]"
        );
        assert_eq!(Paint::UsedSpot.to_string(), "used_spot");
    }

    #[test]
    fn placed_primitives_print_their_screen_anchor() {
        let mut list = CommandList::new();
        list.rotate(90.0, Point::new(50.0, 50.0));
        list.draw_text("N", Point::new(50.0, 0.0), Paint::Text);
        list.rotate(-90.0, Point::new(50.0, 50.0));
        list.draw_circle(Point::new(50.0, 10.0), 2.0, Paint::Ring);

        let lines: Vec<String> = place(list.commands()).iter().map(|p| p.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "text \"N\" at (50.0, 0.0) [text white fill_and_stroke] -> (100.0, 50.0)",
                "circle (50.0, 10.0) r=2.0 [ring yellow stroke] -> (50.0, 10.0)",
            ]
        );
    }
}
