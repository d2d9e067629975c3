use serde::Serialize;

use super::parser::{Scenario, Step};
use crate::display::{pump, EventSource, SkyDisplay, SkyEvent};
use crate::render::{place, render_frame, CommandList, DrawCommand, Placed, Viewport};

/// One rendered frame of a replay.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub index: usize,
    /// Scenario step that requested the frame.
    pub step: usize,
    /// Whether any update since the previous frame asked for a redraw.
    pub redraw_requested: bool,
    /// Notice on screen when the frame was drawn.
    pub notice: Option<String>,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    /// Every primitive of the frame with its position on screen.
    pub fn placed(&self) -> Vec<Placed<'_>> {
        place(&self.commands)
    }
}

/// Walks a scenario, yielding updates up to the next wait or frame request.
pub struct ScenarioCursor<'a> {
    steps: &'a [Step],
    position: usize,
}

impl<'a> ScenarioCursor<'a> {
    pub fn new(scenario: &'a Scenario) -> Self {
        Self {
            steps: &scenario.steps,
            position: 0,
        }
    }

    /// Consumes the wait or frame request at the cursor, returning it with its
    /// step index.
    pub fn take_control(&mut self) -> Option<(usize, &'a Step)> {
        let steps = self.steps;
        let step = steps.get(self.position).filter(|s| !s.is_update())?;
        self.position += 1;
        Some((self.position - 1, step))
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.steps.len()
    }
}

impl EventSource for ScenarioCursor<'_> {
    fn next_event(&mut self) -> Option<SkyEvent> {
        let event = self.steps.get(self.position)?.event()?;
        self.position += 1;
        Some(event)
    }
}

/// Replays `scenario` into `display`, drawing a frame at every render step.
pub fn play(
    scenario: &Scenario,
    display: &mut SkyDisplay,
    viewport: Viewport,
    text_height: f64,
) -> Vec<Frame> {
    let mut cursor = ScenarioCursor::new(scenario);
    let mut frames = Vec::new();

    loop {
        let delivered = pump(&mut cursor, display);
        let Some((step, control)) = cursor.take_control() else {
            log::debug!("Scenario finished after {} trailing updates", delivered);
            break;
        };

        if let Step::Wait(duration) = control {
            log::debug!("Waiting {:?} at step {}", duration, step);
            display.notices().elapse(*duration);
            continue;
        }

        let redraw_requested = display.take_redraw();
        let snapshot = display.snapshot();
        let mut canvas = CommandList::new();
        render_frame(&mut canvas, &snapshot, viewport, text_height);
        debug_assert_eq!(canvas.depth(), 0);
        log::debug!(
            "Frame {} at step {}: {} commands after {} updates",
            frames.len(),
            step,
            canvas.commands().len(),
            delivered
        );

        frames.push(Frame {
            index: frames.len(),
            step,
            redraw_requested,
            notice: display.notices().showing().map(|n| n.message.clone()),
            commands: canvas.into_commands(),
        });
    }

    debug_assert!(cursor.is_finished());
    frames
}
