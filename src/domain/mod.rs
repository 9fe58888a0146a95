mod cell;
mod rules;
mod state;
mod world;

pub use cell::{Cell, Direction, Neighbours, Position};
pub use rules::{
    BriansBrain, LifeRule, Rule, RuleError, BUILTIN_RULES, all_rules, default_rule, load, from_file,
};
pub use state::{Palette, State};
pub use world::{CellWorld, WorldError};
