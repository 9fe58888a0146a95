use macroquad::prelude::*;

use crate::application::{Canvas, Phase, Session};
use crate::config::WorldConfig;
use crate::domain::{Cell, Position, State};

/// Convert a cell state to a drawable colour
pub fn colour(state: State) -> Color {
    Color::from_rgba(state.r(), state.g(), state.b(), 255)
}

/// Canvas backed by a persistent render target.
/// Only queued tiles are drawn into the target; the target itself is
/// composited onto the screen every frame.
pub struct MacroquadCanvas {
    target: RenderTarget,
    camera: Camera2D,
    size: Vec2,
    /// Top-left corner of a tile relative to its lattice position
    tile_offset: f32,
    cell_size: f32,
    background: Color,
    cleared: bool,
    pending: Vec<(Position, State)>,
}

impl MacroquadCanvas {
    pub fn new(config: &WorldConfig) -> Self {
        let (width, height) = config.extent();
        let size = vec2(width as f32, height as f32);

        let target = render_target(width, height);
        target.texture.set_filter(FilterMode::Nearest);

        let camera = Camera2D {
            zoom: vec2(2.0 / size.x, 2.0 / size.y),
            target: size / 2.0,
            render_target: Some(target.clone()),
            ..Default::default()
        };

        Self {
            target,
            camera,
            size,
            tile_offset: config.gap as f32 / 2.0,
            cell_size: config.cell_size as f32,
            background: colour(config.palette.background),
            cleared: false,
            pending: Vec::new(),
        }
    }

    /// Draw the accumulated tiles onto the current frame
    pub fn composite(&self) {
        draw_texture_ex(
            &self.target.texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(self.size),
                ..Default::default()
            },
        );
    }
}

impl Canvas for MacroquadCanvas {
    fn draw_cell(&mut self, cell: &Cell) {
        self.pending.push((cell.position(), cell.state()));
    }

    fn present(&mut self, changed: usize) {
        set_camera(&self.camera);
        if !self.cleared {
            clear_background(self.background);
            self.cleared = true;
        }
        for (position, state) in self.pending.drain(..) {
            draw_rectangle(
                position.x as f32 + self.tile_offset,
                position.y as f32 + self.tile_offset,
                self.cell_size,
                self.cell_size,
                colour(state),
            );
        }
        set_default_camera();
        log::trace!("Presented {} tiles", changed);
    }
}

/// Centered splash text shown while the world is built
pub fn draw_loading(config: &WorldConfig) {
    clear_background(colour(config.palette.background));
    let text = "Loading...";
    let dims = measure_text(text, None, 36, 1.0);
    draw_text(
        text,
        (screen_width() - dims.width) / 2.0,
        (screen_height() + dims.height) / 2.0,
        36.0,
        colour(config.palette.active),
    );
}

/// One-line status overlay in the bottom-left corner
pub fn draw_status(session: &Session) {
    let world = session.world();
    let text = match session.phase() {
        Phase::Seeding => format!(
            "Seeding | {} | click: toggle  space: clear  R: random  return: start",
            world.rule().name()
        ),
        Phase::Running | Phase::Stopped => format!(
            "{} | generation {} | population {}",
            world.rule().name(),
            world.generation(),
            world.population()
        ),
    };
    let y = screen_height() - 6.0;
    draw_rectangle(0.0, y - 14.0, screen_width(), 20.0, Color::from_rgba(0, 0, 0, 160));
    draw_text(&text, 6.0, y, 16.0, Color::from_rgba(180, 180, 180, 255));
}
