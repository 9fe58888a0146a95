use std::collections::HashMap;

use rand::Rng;
use rayon::prelude::*;

use super::{Cell, Direction, Neighbours, Palette, Position, Rule, State};
use crate::config::{ConfigError, WorldConfig};

/// Errors raised while building a world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Cell at {position} has no {direction:?} neighbour")]
    MissingNeighbour {
        position: Position,
        direction: Direction,
    },
}

/// CellWorld owns every cell of a toroidal lattice and advances them
/// in lockstep under a single rule.
pub struct CellWorld {
    /// Row-major arena; neighbour links index into it
    cells: Vec<Cell>,
    index: HashMap<Position, usize>,
    rule: Box<dyn Rule>,
    palette: Palette,
    columns: usize,
    rows: usize,
    pitch: i32,
    cell_size: i32,
    generation: u64,
}

impl CellWorld {
    /// Build every cell and wire its wraparound neighbourhood.
    pub fn new(rule: Box<dyn Rule>, config: &WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;

        let pitch = config.pitch() as i32;
        let (columns, rows) = (config.columns(), config.rows());
        let (wrap_x, wrap_y) = config.extent();
        let (wrap_x, wrap_y) = (wrap_x as i32, wrap_y as i32);

        let mut cells = Vec::with_capacity(columns * rows);
        let mut index = HashMap::with_capacity(columns * rows);
        for row in 0..rows {
            for col in 0..columns {
                let position = Position::new(col as i32 * pitch, row as i32 * pitch);
                index.insert(position, cells.len());
                cells.push(Cell::new(position, config.palette.inactive));
            }
        }

        for cell in cells.iter_mut() {
            let position = cell.position();
            let mut links = [0; 8];
            for (slot, direction) in links.iter_mut().zip(Direction::ALL) {
                let (dx, dy) = direction.offset();
                let target = Position::new(
                    (position.x + dx * pitch).rem_euclid(wrap_x),
                    (position.y + dy * pitch).rem_euclid(wrap_y),
                );
                *slot = *index
                    .get(&target)
                    .ok_or(WorldError::MissingNeighbour { position, direction })?;
            }
            cell.link(links);
        }

        log::info!(
            "Built {}x{} lattice ({} cells, pitch {}) under rule {}",
            columns,
            rows,
            cells.len(),
            pitch,
            rule.name()
        );

        Ok(Self {
            cells,
            index,
            rule,
            palette: config.palette,
            columns,
            rows,
            pitch,
            cell_size: config.cell_size as i32,
            generation: 0,
        })
    }

    /// Lattice dimensions in cells (columns, rows)
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }

    pub fn rule(&self) -> &dyn Rule {
        self.rule.as_ref()
    }

    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Generations advanced so far
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.index.get(&position).map(|&idx| &self.cells[idx])
    }

    /// The cell adjacent to `position` in `direction`, across edges
    pub fn neighbour(&self, position: Position, direction: Direction) -> Option<&Cell> {
        let idx = *self.index.get(&position)?;
        Some(&self.cells[self.cells[idx].links()[direction as usize]])
    }

    /// Number of cells not in the inactive state
    pub fn population(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.state() != self.palette.inactive)
            .count()
    }

    /// Advance every cell one generation and return the ones that changed.
    ///
    /// Next states are computed from a snapshot of the current generation
    /// before any cell is written, so evaluation order never matters.
    pub fn update(&mut self) -> Vec<&Cell> {
        let snapshot: Vec<State> = self.cells.iter().map(Cell::state).collect();
        let rule = self.rule.as_ref();

        let next: Vec<State> = self
            .cells
            .par_iter()
            .map(|cell| {
                let neighbours = Neighbours::gather(&snapshot, cell.links());
                rule.next(cell.state(), &neighbours)
            })
            .collect();

        self.cells
            .iter_mut()
            .zip(next)
            .for_each(|(cell, state)| {
                cell.apply(state);
            });
        self.generation += 1;

        let changed = self.dirty_cells();
        log::debug!(
            "Generation {}: {} changed, population {}",
            self.generation,
            changed.len(),
            self.population()
        );
        changed
    }

    /// Cells whose most recent update changed their state
    pub fn dirty_cells(&self) -> Vec<&Cell> {
        self.cells.iter().filter(|cell| cell.is_dirty()).collect()
    }

    /// Map a lattice-space point to the cell whose tile contains it.
    /// A point counts as inside when it is within half a cell size of the
    /// tile centre on both axes.
    pub fn get_cell(&self, point: (f32, f32)) -> Option<&Cell> {
        self.locate(point).map(|idx| &self.cells[idx])
    }

    /// Toggle the cell under `point`, if any.
    pub fn flip_at(&mut self, point: (f32, f32)) -> Option<&Cell> {
        let idx = self.locate(point)?;
        let cell = &mut self.cells[idx];
        cell.flip(&self.palette);
        log::trace!("Flipped {} to {:?}", cell.position(), cell.state());
        Some(&self.cells[idx])
    }

    /// Turn every cell off. Returns all cells so the caller can redraw them.
    pub fn clear(&mut self) -> Vec<&Cell> {
        let inactive = self.palette.inactive;
        self.cells.iter_mut().for_each(|cell| {
            cell.off(inactive);
        });
        self.generation = 0;
        self.cells.iter().collect()
    }

    /// Set each cell active with the given probability, inactive otherwise.
    /// Returns the cells that changed.
    pub fn randomize(&mut self, probability: f64) -> Vec<&Cell> {
        let mut rng = rand::rng();
        let probability = probability.clamp(0.0, 1.0);
        let Palette { active, inactive, .. } = self.palette;

        self.cells.iter_mut().for_each(|cell| {
            let state = if rng.random_bool(probability) { active } else { inactive };
            cell.apply(state);
        });
        self.generation = 0;
        self.dirty_cells()
    }

    fn locate(&self, (x, y): (f32, f32)) -> Option<usize> {
        let pitch = self.pitch as f32;
        // Nearest tile, clamped so border tiles keep their full catchment
        let nearest = |v: f32, count: usize| (v / pitch).round().clamp(0.0, (count - 1) as f32) as usize;
        let (col, row) = (nearest(x, self.columns), nearest(y, self.rows));

        let half = self.cell_size as f32 / 2.0;
        let (cx, cy) = (col as f32 * pitch, row as f32 * pitch);
        ((x - cx).abs() <= half && (y - cy).abs() <= half).then(|| row * self.columns + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LifeRule;

    /// 10x10 lattice with a pitch of 10 (8px tiles, 2px gap)
    fn config() -> WorldConfig {
        WorldConfig {
            width: 100,
            height: 100,
            cell_size: 8,
            gap: 2,
            ..Default::default()
        }
    }

    fn conway_world(config: &WorldConfig) -> CellWorld {
        CellWorld::new(Box::new(LifeRule::conway(&config.palette)), config).unwrap()
    }

    fn at(col: i32, row: i32) -> (f32, f32) {
        ((col * 10) as f32, (row * 10) as f32)
    }

    fn live_positions(world: &CellWorld) -> Vec<Position> {
        let mut live: Vec<_> = world
            .cells()
            .filter(|c| c.state() == world.palette().active)
            .map(Cell::position)
            .collect();
        live.sort_by_key(|p| (p.y, p.x));
        live
    }

    #[test]
    fn test_lattice_is_fully_tiled() {
        let world = conway_world(&config());
        assert_eq!(world.dimensions(), (10, 10));
        assert_eq!(world.cells().count(), 100);
        for row in 0..10 {
            for col in 0..10 {
                assert!(world.cell(Position::new(col * 10, row * 10)).is_some());
            }
        }
        assert!(world.cell(Position::new(5, 0)).is_none());
    }

    #[test]
    fn test_toroidal_adjacency_completeness() {
        let world = conway_world(&config());
        for cell in world.cells() {
            let p = cell.position();
            for direction in Direction::ALL {
                let (dx, dy) = direction.offset();
                let expected = Position::new((p.x + dx * 10).rem_euclid(100), (p.y + dy * 10).rem_euclid(100));
                let found = world.neighbour(p, direction).unwrap();
                assert_eq!(found.position(), expected, "{:?} of {}", direction, p);
            }
        }
    }

    #[test]
    fn test_edge_wraparound() {
        let world = conway_world(&config());
        let origin = Position::new(0, 40);

        assert_eq!(world.neighbour(origin, Direction::W).unwrap().position(), Position::new(90, 40));
        assert_eq!(world.neighbour(origin, Direction::NW).unwrap().position(), Position::new(90, 30));
        assert_eq!(world.neighbour(origin, Direction::SW).unwrap().position(), Position::new(90, 50));

        let corner = Position::new(90, 90);
        assert_eq!(world.neighbour(corner, Direction::SE).unwrap().position(), Position::new(0, 0));
    }

    #[test]
    fn test_wraparound_with_remainder_strip() {
        // 640 is not a multiple of 17; the lattice wraps at 38 * 17
        let config = WorldConfig::default();
        let world = conway_world(&config);
        let last = Position::new(37 * 17, 0);

        assert_eq!(world.neighbour(last, Direction::E).unwrap().position(), Position::new(0, 0));
        assert_eq!(world.neighbour(Position::new(0, 0), Direction::W).unwrap().position(), last);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = WorldConfig { width: 0, ..config() };
        let result = CellWorld::new(Box::new(LifeRule::conway(&config.palette)), &config);
        assert!(matches!(result, Err(WorldError::Config(ConfigError::InvalidDimensions))));
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut world = conway_world(&config());
        for col in 4..=6 {
            world.flip_at(at(col, 5));
        }
        let horizontal = live_positions(&world);

        world.update();
        assert_eq!(
            live_positions(&world),
            vec![Position::new(50, 40), Position::new(50, 50), Position::new(50, 60)]
        );

        world.update();
        assert_eq!(live_positions(&world), horizontal);
        assert_eq!(world.generation(), 2);
    }

    #[test]
    fn test_blinker_across_edge() {
        let mut world = conway_world(&config());
        for col in [9, 0, 1] {
            world.flip_at(at(col, 0));
        }

        world.update();
        // Vertical through column 0, wrapping over the top edge
        assert_eq!(
            live_positions(&world),
            vec![Position::new(0, 0), Position::new(0, 10), Position::new(0, 90)]
        );
    }

    #[test]
    fn test_minimal_torus_blinker() {
        // 3x3 torus: every cell neighbours every other, so a full row of
        // three gives each cell exactly 2 or 3 live neighbours
        let config = WorldConfig { width: 30, height: 30, cell_size: 8, gap: 2, ..Default::default() };
        let mut world = conway_world(&config);
        for col in 0..3 {
            world.flip_at(at(col, 1));
        }

        let changed = world.update();
        // Dead cells see 3 live neighbours and are born; live cells see 2 and survive
        assert_eq!(changed.len(), 6);
        assert_eq!(world.population(), 9);
    }

    #[test]
    fn test_block_still_life() {
        let mut world = conway_world(&config());
        for (col, row) in [(4, 4), (5, 4), (4, 5), (5, 5)] {
            world.flip_at(at(col, row));
        }
        let before = live_positions(&world);

        let changed = world.update();
        assert!(changed.is_empty());
        assert_eq!(live_positions(&world), before);
    }

    #[test]
    fn test_dirty_set_is_exact() {
        let mut world = conway_world(&config());
        for col in 4..=6 {
            world.flip_at(at(col, 5));
        }

        let before: HashMap<Position, State> = world.cells().map(|c| (c.position(), c.state())).collect();
        let changed: Vec<Position> = world.update().into_iter().map(Cell::position).collect();

        let expected: Vec<Position> = world
            .cells()
            .filter(|c| before[&c.position()] != c.state())
            .map(Cell::position)
            .collect();
        assert_eq!(changed.len(), 4);
        assert_eq!(changed, expected);
    }

    #[test]
    fn test_dirty_flag_does_not_linger() {
        let mut world = conway_world(&config());
        world.flip_at(at(3, 3));
        assert!(world.cell(Position::new(30, 30)).unwrap().is_dirty());

        // Lone cell dies, then nothing changes
        assert_eq!(world.update().len(), 1);
        assert!(world.update().is_empty());
        assert!(world.cells().all(|c| !c.is_dirty()));
    }

    #[test]
    fn test_update_reads_previous_generation() {
        // Each cell copies its western neighbour. With in-place sequential
        // updates a single live cell would smear across the whole row.
        let config = config();
        let shift = |_: State, near: &Neighbours| near.get(Direction::W);
        let mut world = CellWorld::new(Box::new(shift), &config).unwrap();
        world.flip_at(at(2, 3));

        world.update();
        assert_eq!(live_positions(&world), vec![Position::new(30, 30)]);
        world.update();
        assert_eq!(live_positions(&world), vec![Position::new(40, 30)]);
    }

    #[test]
    fn test_get_cell_tolerance() {
        let world = conway_world(&config());

        // Exact centre
        assert_eq!(world.get_cell((30.0, 40.0)).unwrap().position(), Position::new(30, 40));
        // Right on the tolerance edge (half of 8px)
        assert_eq!(world.get_cell((34.0, 36.0)).unwrap().position(), Position::new(30, 40));
        // Inside the 2px gap between columns 3 and 4
        assert!(world.get_cell((35.0, 40.0)).is_none());
        // Outside the lattice
        assert!(world.get_cell((-10.0, 0.0)).is_none());
        assert!(world.get_cell((0.0, 120.0)).is_none());
        // Tile of column 0 reaches slightly left of the origin
        assert_eq!(world.get_cell((-3.0, 0.0)).unwrap().position(), Position::new(0, 0));
    }

    #[test]
    fn test_get_cell_tolerance_at_border_without_gap() {
        let config = WorldConfig { width: 40, height: 40, cell_size: 10, gap: 0, ..Default::default() };
        let world = conway_world(&config);

        // Half a cell past the outermost tiles still belongs to them
        assert_eq!(world.get_cell((35.0, 0.0)).unwrap().position(), Position::new(30, 0));
        assert_eq!(world.get_cell((-5.0, 0.0)).unwrap().position(), Position::new(0, 0));
        assert_eq!(world.get_cell((0.0, 35.0)).unwrap().position(), Position::new(0, 30));
        // Beyond that nothing is hit
        assert!(world.get_cell((35.5, 0.0)).is_none());
        assert!(world.get_cell((0.0, -5.5)).is_none());
    }

    #[test]
    fn test_flip_at_gap_is_noop() {
        let mut world = conway_world(&config());
        assert!(world.flip_at((35.0, 35.0)).is_none());
        assert_eq!(world.population(), 0);
    }

    #[test]
    fn test_clear_turns_everything_off() {
        let mut world = conway_world(&config());
        world.flip_at(at(1, 1));
        world.flip_at(at(2, 2));

        let redrawn = world.clear();
        assert_eq!(redrawn.len(), 100);
        assert_eq!(world.population(), 0);
        assert_eq!(world.dirty_cells().len(), 2);

        // Second clear changes nothing
        world.clear();
        assert!(world.dirty_cells().is_empty());
    }

    #[test]
    fn test_randomize_extremes() {
        let mut world = conway_world(&config());

        assert_eq!(world.randomize(1.0).len(), 100);
        assert_eq!(world.population(), 100);

        assert_eq!(world.randomize(0.0).len(), 100);
        assert_eq!(world.population(), 0);
    }
}
