use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::{Neighbours, Palette, State};

/// Trait for cellular automaton rules.
/// A rule is a pure function of a cell's state and its neighbourhood;
/// the world never looks at anything else.
pub trait Rule: Send + Sync {
    /// Compute the next state of a cell
    fn next(&self, current: State, neighbours: &Neighbours) -> State;

    /// Name of the rule
    fn name(&self) -> &str {
        "custom"
    }

    /// Short description
    fn description(&self) -> &str {
        ""
    }
}

impl<F> Rule for F
where
    F: Fn(State, &Neighbours) -> State + Send + Sync,
{
    fn next(&self, current: State, neighbours: &Neighbours) -> State {
        self(current, neighbours)
    }
}

/// Errors raised while resolving a rule source.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    #[error("Failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse rule file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid rulestring {0:?}, expected something like B3/S23")]
    InvalidRulestring(String),
    #[error("Neighbour count {0} is out of range (0-8)")]
    CountOutOfRange(u8),
    #[error("Unknown rule {0:?}")]
    Unknown(String),
}

/// Outer-totalistic two-state rule in B/S notation.
/// Cells in any state other than `alive`/`dead` are left untouched.
#[derive(Clone, Debug, PartialEq)]
pub struct LifeRule {
    name: String,
    notation: String,
    birth: [bool; 9],
    survival: [bool; 9],
    alive: State,
    dead: State,
}

impl LifeRule {
    pub fn new(
        name: impl Into<String>,
        birth: &[u8],
        survival: &[u8],
        palette: &Palette,
    ) -> Result<Self, RuleError> {
        let birth = Self::count_table(birth)?;
        let survival = Self::count_table(survival)?;
        Ok(Self {
            name: name.into(),
            notation: Self::notation(&birth, &survival),
            birth,
            survival,
            alive: palette.active,
            dead: palette.inactive,
        })
    }

    /// Parse `B<digits>/S<digits>` (either order, case-insensitive)
    pub fn parse(rulestring: &str, palette: &Palette) -> Result<Self, RuleError> {
        let invalid = || RuleError::InvalidRulestring(rulestring.to_string());

        let mut birth = None;
        let mut survival = None;
        for part in rulestring.trim().split('/') {
            let mut chars = part.chars();
            let slot = match chars.next() {
                Some('B' | 'b') => &mut birth,
                Some('S' | 's') => &mut survival,
                _ => return Err(invalid()),
            };
            if slot.is_some() {
                return Err(invalid());
            }
            let counts = chars
                .map(|c| c.to_digit(10).map(|d| d as u8).ok_or_else(invalid))
                .collect::<Result<Vec<u8>, _>>()?;
            *slot = Some(counts);
        }

        match (birth, survival) {
            (Some(b), Some(s)) => Self::new(rulestring.trim().to_uppercase(), &b, &s, palette),
            _ => Err(invalid()),
        }
    }

    /// Conway's Game of Life (B3/S23)
    pub fn conway(palette: &Palette) -> Self {
        Self::preset("Conway", &[3], &[2, 3], palette)
    }

    /// HighLife (B36/S23), grows replicators
    pub fn high_life(palette: &Palette) -> Self {
        Self::preset("HighLife", &[3, 6], &[2, 3], palette)
    }

    /// Seeds (B2/S), every live cell dies each generation
    pub fn seeds(palette: &Palette) -> Self {
        Self::preset("Seeds", &[2], &[], palette)
    }

    /// Day & Night (B3678/S34678), symmetric under inversion
    pub fn day_and_night(palette: &Palette) -> Self {
        Self::preset("Day&Night", &[3, 6, 7, 8], &[3, 4, 6, 7, 8], palette)
    }

    fn preset(name: &str, birth: &[u8], survival: &[u8], palette: &Palette) -> Self {
        let table = |counts: &[u8]| {
            let mut table = [false; 9];
            counts.iter().for_each(|&n| table[n as usize] = true);
            table
        };
        let (birth, survival) = (table(birth), table(survival));
        Self {
            name: name.to_string(),
            notation: Self::notation(&birth, &survival),
            birth,
            survival,
            alive: palette.active,
            dead: palette.inactive,
        }
    }

    fn count_table(counts: &[u8]) -> Result<[bool; 9], RuleError> {
        let mut table = [false; 9];
        for &n in counts {
            *table.get_mut(n as usize).ok_or(RuleError::CountOutOfRange(n))? = true;
        }
        Ok(table)
    }

    fn notation(birth: &[bool; 9], survival: &[bool; 9]) -> String {
        let digits = |table: &[bool; 9]| -> String {
            (0..9u8)
                .filter(|&n| table[n as usize])
                .map(|n| char::from(b'0' + n))
                .collect()
        };
        format!("B{}/S{}", digits(birth), digits(survival))
    }
}

impl Rule for LifeRule {
    fn next(&self, current: State, neighbours: &Neighbours) -> State {
        let live = neighbours.count(self.alive);
        let table = if current == self.alive {
            &self.survival
        } else if current == self.dead {
            &self.birth
        } else {
            return current;
        };
        if table[live] { self.alive } else { self.dead }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.notation
    }
}

/// Brian's Brain: ready -> firing -> refractory -> ready.
/// A ready cell fires when exactly two neighbours are firing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BriansBrain {
    ready: State,
    firing: State,
    refractory: State,
}

impl BriansBrain {
    pub fn new(palette: &Palette, refractory: State) -> Self {
        Self {
            ready: palette.inactive,
            firing: palette.active,
            refractory,
        }
    }
}

impl Rule for BriansBrain {
    fn next(&self, current: State, neighbours: &Neighbours) -> State {
        if current == self.firing {
            self.refractory
        } else if current == self.refractory {
            self.ready
        } else if current == self.ready && neighbours.count(self.firing) == 2 {
            self.firing
        } else {
            current
        }
    }

    fn name(&self) -> &str {
        "Brian's Brain"
    }

    fn description(&self) -> &str {
        "B2/S/3 - Three states"
    }
}

/// JSON rule file layout
#[derive(Debug, Deserialize)]
struct RuleFile {
    name: Option<String>,
    birth: Vec<u8>,
    survival: Vec<u8>,
}

/// Names accepted by [`load`] besides rulestrings and file paths
pub const BUILTIN_RULES: &[&str] = &["conway", "highlife", "seeds", "daynight", "briansbrain"];

/// Get all built-in rules
pub fn all_rules(palette: &Palette) -> Vec<(&'static str, Box<dyn Rule>)> {
    BUILTIN_RULES
        .iter()
        .filter_map(|&name| builtin(name, palette).map(|rule| (name, rule)))
        .collect()
}

/// Get default rule (Conway's Life)
pub fn default_rule(palette: &Palette) -> Box<dyn Rule> {
    Box::new(LifeRule::conway(palette))
}

fn builtin(name: &str, palette: &Palette) -> Option<Box<dyn Rule>> {
    let key: String = name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let rule: Box<dyn Rule> = match key.as_str() {
        "conway" | "life" => Box::new(LifeRule::conway(palette)),
        "highlife" => Box::new(LifeRule::high_life(palette)),
        "seeds" => Box::new(LifeRule::seeds(palette)),
        "daynight" | "dayandnight" => Box::new(LifeRule::day_and_night(palette)),
        "briansbrain" => Box::new(BriansBrain::new(palette, State::RED)),
        _ => return None,
    };
    Some(rule)
}

/// Load a rule from a JSON rule file.
pub fn from_file(path: &Path, palette: &Palette) -> Result<Box<dyn Rule>, RuleError> {
    let text = fs::read_to_string(path).map_err(|source| RuleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file: RuleFile = serde_json::from_str(&text).map_err(|source| RuleError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let name = file.name.unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string())
    });
    Ok(Box::new(LifeRule::new(name, &file.birth, &file.survival, palette)?))
}

/// Resolve a rule source: a built-in name, a B/S rulestring,
/// or a path to a `.json` rule file.
pub fn load(source: &str, palette: &Palette) -> Result<Box<dyn Rule>, RuleError> {
    let source = source.trim();

    if let Some(rule) = builtin(source, palette) {
        return Ok(rule);
    }

    let path = Path::new(source);
    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        return from_file(path, palette);
    }

    if source.starts_with(['B', 'b', 'S', 's']) && source.contains('/') {
        return Ok(Box::new(LifeRule::parse(source, palette)?));
    }

    Err(RuleError::Unknown(source.to_string()))
}
