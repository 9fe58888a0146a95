use macroquad::prelude::*;

use crate::application::{Event, Key};

/// Translates macroquad's per-frame input state into session events.
pub struct InputPoller {
    /// Screen-space offset of lattice position (0, 0)
    origin: f32,
    last_mouse: Option<(f32, f32)>,
}

impl InputPoller {
    pub fn new(origin: f32) -> Self {
        Self {
            origin,
            last_mouse: None,
        }
    }

    /// Convert a screen point to lattice coordinates
    pub fn to_lattice(&self, (x, y): (f32, f32)) -> (f32, f32) {
        (x - self.origin, y - self.origin)
    }

    /// Collect this frame's events, quit first
    pub fn poll(&mut self) -> Vec<Event> {
        let mut events = Vec::new();

        if is_quit_requested() || is_key_pressed(KeyCode::Escape) {
            events.push(Event::Quit);
        }

        let mouse = mouse_position();
        let point = self.to_lattice(mouse);
        if is_mouse_button_pressed(MouseButton::Left) {
            events.push(Event::PointerDown(point));
        } else if self.last_mouse != Some(mouse) {
            events.push(Event::PointerDrag(point, is_mouse_button_down(MouseButton::Left)));
        }
        self.last_mouse = Some(mouse);

        events.extend(
            get_keys_pressed()
                .into_iter()
                .map(|key| Event::KeyPress(map_key(key))),
        );
        events
    }
}

fn map_key(key: KeyCode) -> Key {
    match key {
        KeyCode::Enter | KeyCode::KpEnter => Key::Return,
        KeyCode::Space => Key::Space,
        KeyCode::R => Key::R,
        _ => Key::Other,
    }
}
