use super::{Canvas, Event, Key};
use crate::config::WorldConfig;
use crate::domain::{Cell, CellWorld, Position};

/// Where the session is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Pointer input toggles cells, nothing evolves
    Seeding,
    /// One generation per clock tick
    Running,
    /// Quit received
    Stopped,
}

/// Session orchestrates the simulation.
/// This is the application layer that coordinates domain logic.
pub struct Session {
    world: CellWorld,
    phase: Phase,
    update_timer: f32,
    tick_interval: f32,
    random_fill: f64,
    /// Last cell toggled by the current drag, so a drag doesn't
    /// re-toggle the tile it is still inside
    last_flipped: Option<Position>,
}

impl Session {
    pub fn new(world: CellWorld, config: &WorldConfig) -> Self {
        Self {
            world,
            phase: Phase::Seeding,
            update_timer: 0.0,
            tick_interval: config.tick_interval(),
            random_fill: config.random_fill,
            last_flipped: None,
        }
    }

    pub const fn world(&self) -> &CellWorld {
        &self.world
    }

    pub const fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_stopped(&self) -> bool {
        self.phase == Phase::Stopped
    }

    /// Draw every cell once
    pub fn start(&mut self, canvas: &mut dyn Canvas) {
        let cells: Vec<&Cell> = self.world.cells().collect();
        Self::redraw(canvas, &cells);
    }

    /// React to a single input event
    pub fn handle(&mut self, event: Event, canvas: &mut dyn Canvas) {
        if event == Event::Quit {
            log::info!("Quit requested at generation {}", self.world.generation());
            self.phase = Phase::Stopped;
            return;
        }
        if self.phase != Phase::Seeding {
            return;
        }

        match event {
            Event::PointerDown(point) => {
                self.last_flipped = None;
                self.flip(point, canvas);
            }
            Event::PointerDrag(point, true) => self.flip(point, canvas),
            Event::PointerDrag(_, false) => self.last_flipped = None,
            Event::KeyPress(Key::Return) => {
                log::info!(
                    "Starting simulation with {} live cells under {}",
                    self.world.population(),
                    self.world.rule().name()
                );
                self.phase = Phase::Running;
                self.update_timer = 0.0;
            }
            Event::KeyPress(Key::Space) => {
                let cells = self.world.clear();
                Self::redraw(canvas, &cells);
            }
            Event::KeyPress(Key::R) => {
                let cells = self.world.randomize(self.random_fill);
                Self::redraw(canvas, &cells);
            }
            Event::KeyPress(Key::Other) | Event::Quit => {}
        }
    }

    /// Advance the clock by `delta` seconds.
    /// Runs a generation when a full tick interval has elapsed.
    pub fn tick(&mut self, delta: f32, canvas: &mut dyn Canvas) -> bool {
        if self.phase != Phase::Running {
            return false;
        }

        self.update_timer += delta;
        if self.update_timer < self.tick_interval {
            return false;
        }
        self.update_timer = 0.0;

        let changed = self.world.update();
        Self::redraw(canvas, &changed);
        true
    }

    fn flip(&mut self, point: (f32, f32), canvas: &mut dyn Canvas) {
        let Some(position) = self.world.get_cell(point).map(Cell::position) else {
            return;
        };
        if self.last_flipped == Some(position) {
            return;
        }
        if let Some(cell) = self.world.flip_at(point) {
            Self::redraw(canvas, &[cell]);
        }
        self.last_flipped = Some(position);
    }

    fn redraw(canvas: &mut dyn Canvas, cells: &[&Cell]) {
        cells.iter().for_each(|cell| canvas.draw_cell(cell));
        canvas.present(cells.len());
    }
}
