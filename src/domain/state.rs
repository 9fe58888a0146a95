use serde::{Deserialize, Serialize};

/// State of a single cell, stored as the colour it is drawn with.
/// Rules compare states by value, so any number of distinct colours
/// can act as distinct automaton states.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct State(pub [u8; 3]);

impl State {
    pub const BLACK: State = State([0, 0, 0]);
    pub const WHITE: State = State([255, 255, 255]);
    pub const GREY: State = State([150, 150, 150]);
    pub const RED: State = State([200, 40, 40]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub const fn r(self) -> u8 {
        self.0[0]
    }

    pub const fn g(self) -> u8 {
        self.0[1]
    }

    pub const fn b(self) -> u8 {
        self.0[2]
    }
}

/// The canonical states the engine itself needs to know about.
/// Everything else is up to the rule.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Value every cell starts with and `off` forces
    pub inactive: State,
    /// Value `flip` turns a cell into
    pub active: State,
    /// Colour showing through the gaps between tiles
    pub background: State,
}

impl Palette {
    /// Toggle between the two canonical states.
    /// Anything that is not `active` becomes `active`.
    pub fn toggle(&self, state: State) -> State {
        if state == self.active {
            self.inactive
        } else {
            self.active
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            inactive: State::BLACK,
            active: State::WHITE,
            background: State::GREY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_swaps_canonical_pair() {
        let palette = Palette::default();
        assert_eq!(palette.toggle(State::WHITE), State::BLACK);
        assert_eq!(palette.toggle(State::BLACK), State::WHITE);
    }

    #[test]
    fn test_toggle_activates_foreign_state() {
        let palette = Palette::default();
        assert_eq!(palette.toggle(State::RED), State::WHITE);
    }

    #[test]
    fn test_state_serializes_as_triple() {
        let json = serde_json::to_string(&State::rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "[1,2,3]");
    }
}
