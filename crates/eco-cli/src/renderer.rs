//! Terminal renderer: one icon per cell plus a population line.

use eco_core::{EntityKind, IconConfig, Point};
use eco_world::{Renderer, World};
use std::io::Write;
use tracing::warn;

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const PROMPT: &str = "[s] simulate  [p] pause  [r] reverse  [q] quit";

pub struct ConsoleRenderer<W: Write> {
    out: W,
    icons: IconConfig,
}

impl<W: Write> ConsoleRenderer<W> {
    pub fn new(out: W, icons: IconConfig) -> Self {
        Self { out, icons }
    }

    fn icon_at(&self, world: &World, point: Point) -> &str {
        world
            .entity_at(point)
            .and_then(|id| world.entity(id).ok())
            .map(|entity| self.icons.icon(entity.kind()))
            .unwrap_or(self.icons.default.as_str())
    }

    /// Full frame as text, without the clear sequence
    pub fn frame(&self, world: &World, turn: u64) -> String {
        let mut frame = format!("Turn {}\n", turn);
        for y in 0..world.height() {
            for x in 0..world.width() {
                frame.push_str(self.icon_at(world, Point::new(x, y)));
            }
            frame.push('\n');
        }

        let census = world.census();
        let counts: Vec<String> = EntityKind::all()
            .into_iter()
            .map(|kind| format!("{} {}", self.icons.icon(kind), census.get(kind)))
            .collect();
        frame.push_str(&counts.join("  "));
        frame.push('\n');
        frame.push_str(PROMPT);
        frame.push('\n');
        frame
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write frame");
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn render(&mut self, world: &World, turn: u64) {
        let frame = self.frame(world, turn);
        self.emit(&frame);
    }

    fn clear_frame(&mut self) {
        self.emit(CLEAR_SCREEN);
    }

    fn pause_notice(&mut self) {
        self.emit("Paused. Enter s to resume, r to step back, q to quit.\n");
    }

    fn end_notice(&mut self) {
        self.emit("Simulation finished.\n");
    }
}
