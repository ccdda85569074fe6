use crate::world::World;

/// Display surface driven by [`Simulation::start`](crate::Simulation::start)
pub trait Renderer {
    /// Draw the world as it stands at `turn`
    fn render(&mut self, world: &World, turn: u64);

    fn clear_frame(&mut self);

    /// Shown once each time the loop enters the paused state
    fn pause_notice(&mut self);

    fn end_notice(&mut self);
}
