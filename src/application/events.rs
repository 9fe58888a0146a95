use crate::domain::Cell;

/// Keys the session reacts to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Return,
    Space,
    R,
    Other,
}

/// Discrete input events, in lattice coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    Quit,
    PointerDown((f32, f32)),
    /// Pointer moved; flag is whether the primary button is held.
    /// While held, each tile entered is flipped once; staying inside the
    /// tile that was just flipped does not flip it again.
    PointerDrag((f32, f32), bool),
    KeyPress(Key),
}

/// Drawing surface the session forwards cells to.
pub trait Canvas {
    /// Queue a cell's tile with its current state
    fn draw_cell(&mut self, cell: &Cell);

    /// Flush everything queued since the last call
    fn present(&mut self, changed: usize);
}
