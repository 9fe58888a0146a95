use std::fmt;

use super::{Palette, Rule, State};

/// Pixel coordinate of a tile centre on the lattice.
/// Doubles as the key identifying a cell inside its world.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The eight Moore-neighbourhood directions.
/// Discriminants double as slot indices in [`Neighbours`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::S,
        Direction::E,
        Direction::W,
        Direction::NE,
        Direction::NW,
        Direction::SE,
        Direction::SW,
    ];

    /// Step in lattice units, screen orientation (north is -y)
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::N => (0, -1),
            Direction::S => (0, 1),
            Direction::E => (1, 0),
            Direction::W => (-1, 0),
            Direction::NE => (1, -1),
            Direction::NW => (-1, -1),
            Direction::SE => (1, 1),
            Direction::SW => (-1, 1),
        }
    }
}

/// Read-only view of the states around a cell, keyed by direction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Neighbours([State; 8]);

impl Neighbours {
    /// States in [`Direction::ALL`] order
    pub const fn new(states: [State; 8]) -> Self {
        Self(states)
    }

    pub const fn filled(state: State) -> Self {
        Self([state; 8])
    }

    /// Resolve arena links against a snapshot of the previous generation.
    pub(crate) fn gather(snapshot: &[State], links: &[usize; 8]) -> Self {
        Self(links.map(|idx| snapshot[idx]))
    }

    pub fn get(&self, direction: Direction) -> State {
        self.0[direction as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, State)> + '_ {
        Direction::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Number of neighbours currently in `state`
    pub fn count(&self, state: State) -> usize {
        self.0.iter().filter(|&&s| s == state).count()
    }
}

/// A single lattice site.
///
/// Neighbour links are arena indices into the owning world's cell vector,
/// so cells never own each other.
#[derive(Clone, Debug)]
pub struct Cell {
    position: Position,
    state: State,
    dirty: bool,
    links: [usize; 8],
}

impl Cell {
    pub(crate) fn new(position: Position, state: State) -> Self {
        Self {
            position,
            state,
            dirty: false,
            links: [0; 8],
        }
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn state(&self) -> State {
        self.state
    }

    /// True iff the most recent update changed the state
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub(crate) fn link(&mut self, links: [usize; 8]) {
        self.links = links;
    }

    pub(crate) const fn links(&self) -> &[usize; 8] {
        &self.links
    }

    /// Run `rule` against the given neighbourhood and store the result.
    /// Returns whether the state changed.
    pub fn update(&mut self, rule: &dyn Rule, neighbours: &Neighbours) -> bool {
        let next = rule.next(self.state, neighbours);
        self.apply(next)
    }

    /// Force the inactive state.
    pub fn off(&mut self, inactive: State) -> bool {
        let neighbours = Neighbours::filled(self.state);
        self.update(&move |_: State, _: &Neighbours| inactive, &neighbours)
    }

    /// Toggle between the palette's active and inactive states.
    pub fn flip(&mut self, palette: &Palette) -> bool {
        let palette = *palette;
        let neighbours = Neighbours::filled(self.state);
        self.update(
            &move |state: State, _: &Neighbours| palette.toggle(state),
            &neighbours,
        )
    }

    pub(crate) fn apply(&mut self, next: State) -> bool {
        self.dirty = next != self.state;
        self.state = next;
        self.dirty
    }
}
