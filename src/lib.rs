// Domain layer - Core business logic
pub mod domain;

// Configuration shared by the domain and the front-end
pub mod config;

// Application layer - Use cases and coordination
pub mod application;

// Infrastructure layer - rendering, input
pub mod rendering;
pub mod input;

// Re-exports for convenience
pub use domain::{Cell, CellWorld, Direction, Neighbours, Palette, Position, Rule, State};
pub use application::{Canvas, Event, Key, Phase, Session};
pub use config::WorldConfig;
