use std::fmt;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::backend::{Backend, BackendKind, ComputeBackend};
use crate::board::Board;
use crate::counter::{Boundary, NeighborCounter, Strategy};
use crate::error::Result;
use crate::mask::NeighborhoodMask;
use crate::presets::Preset;
use crate::rule::{Rule, RuleTable};

static PHYSICAL_CORES: OnceLock<usize> = OnceLock::new();

#[inline]
fn physical_core_count() -> usize {
    *PHYSICAL_CORES.get_or_init(|| num_cpus::get_physical().max(1))
}

/// Pool size for the rayon backend: explicit count or physical cores, then the cap.
fn resolve_thread_count(config: &AutomataConfig) -> usize {
    let mut threads = config.thread_count.unwrap_or_else(physical_core_count);
    if let Some(cap) = config.max_threads {
        threads = threads.min(cap);
    }
    threads.max(1)
}

/// Configuration for an automaton instance.
///
/// Use `AutomataConfig::default()` (spectral, toroidal, serial), or adjust
/// individual knobs via the builder methods.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AutomataConfig {
    /// Neighbor counting algorithm.
    pub strategy: Strategy,
    /// Edge handling. The spectral strategy requires `Toroidal`.
    pub boundary: Boundary,
    /// Execution backend, fixed for the automaton's lifetime.
    pub backend: BackendKind,
    /// Size of the rayon pool; the serial backend ignores it.
    /// Unset, the pool gets one worker per physical core.
    pub thread_count: Option<usize>,
    /// Ceiling applied to the rayon pool size after `thread_count` resolves.
    pub max_threads: Option<usize>,
}

impl AutomataConfig {
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Pin the rayon pool to `n` workers (at least one).
    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = Some(n.max(1));
        self
    }

    /// Cap the rayon pool at `n` workers, detected or explicit.
    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }
}

/// Timing of a [`Automata::run`] loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RunReport {
    pub iterations: u64,
    /// Cells per board.
    pub cells: u64,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn steps_per_second(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            self.iterations as f64 / secs
        } else {
            0.0
        }
    }

    pub fn cells_per_second(&self) -> f64 {
        self.steps_per_second() * self.cells as f64
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = (self.cells as f64).sqrt() as u64;
        write!(
            f,
            "Performed {} iterations of {side}x{side} cells in {:.3} sec: {:.0} Hz (board) {:.2} BHz (cell)",
            self.iterations,
            self.elapsed.as_secs_f64(),
            self.steps_per_second(),
            self.cells_per_second() / 1e9,
        )
    }
}

/// A binary cellular automaton on a square board.
///
/// Each [`step`](Self::step) counts neighbors, applies the rule into a second
/// buffer and swaps it in, so no partial update is ever visible.
pub struct Automata<B = Backend> {
    board: Board,
    next: Vec<u8>,
    counts: Vec<u32>,
    counter: NeighborCounter,
    mask: NeighborhoodMask,
    rule: Rule,
    rule_table: RuleTable,
    backend: B,
    config: AutomataConfig,
    generation: u64,
}

impl Automata<Backend> {
    /// Build with the backend named in `config`.
    pub fn new(
        board: Board,
        mask: NeighborhoodMask,
        rule: Rule,
        config: AutomataConfig,
    ) -> Result<Self> {
        let threads = resolve_thread_count(&config);
        let backend = Backend::new(config.backend, threads)?;
        Self::with_backend(board, mask, rule, config, backend)
    }

    /// Standard Game of Life with default configuration.
    pub fn conway(board: Board) -> Result<Self> {
        Self::new(
            board,
            NeighborhoodMask::moore(1),
            Rule::conway(),
            AutomataConfig::default(),
        )
    }

    pub fn from_preset(board: Board, preset: Preset, config: AutomataConfig) -> Result<Self> {
        Self::new(board, preset.mask, preset.rule, config)
    }
}

impl<B: ComputeBackend> Automata<B> {
    /// Build on an explicit backend instance. `config.backend` is replaced by
    /// the backend's own kind.
    pub fn with_backend(
        board: Board,
        mask: NeighborhoodMask,
        rule: Rule,
        mut config: AutomataConfig,
        mut backend: B,
    ) -> Result<Self> {
        let max_count = mask.sum();
        rule.validate(max_count)?;
        config.backend = backend.kind();
        let size = board.size();
        let counter =
            NeighborCounter::new(config.strategy, config.boundary, size, &mask, &mut backend)?;
        debug!(
            size,
            mask_height = mask.height(),
            mask_width = mask.width(),
            rule = %rule,
            strategy = %config.strategy,
            boundary = %config.boundary,
            backend = %config.backend,
            threads = backend.threads(),
            "automaton ready"
        );
        Ok(Self {
            next: vec![0; board.cell_count()],
            counts: vec![0; board.cell_count()],
            board,
            counter,
            rule_table: RuleTable::new(&rule, max_count),
            mask,
            rule,
            backend,
            config,
            generation: 0,
        })
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        self.counter
            .count(&mut self.backend, &self.board, &mut self.counts);
        self.backend.apply_rule(
            self.board.cells(),
            &self.counts,
            &self.rule_table,
            &mut self.next,
        );
        std::mem::swap(self.board.cells_mut_vec(), &mut self.next);
        self.generation += 1;
    }

    pub fn step_n(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Step `iterations` times and report throughput.
    pub fn run(&mut self, iterations: u64) -> RunReport {
        let start = Instant::now();
        self.step_n(iterations);
        let report = RunReport {
            iterations,
            cells: self.board.cell_count() as u64,
            elapsed: start.elapsed(),
        };
        info!(
            iterations,
            size = self.board.size(),
            elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
            steps_per_sec = report.steps_per_second(),
            cells_per_sec = report.cells_per_second(),
            "run finished"
        );
        report
    }

    /// Snapshot of the current board.
    pub fn current_board(&self) -> Board {
        self.board.clone()
    }

    /// Borrow the current board without copying.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Neighbor counts of the current board, row-major.
    pub fn counts(&mut self) -> Vec<u32> {
        let mut out = vec![0; self.board.cell_count()];
        self.counter.count(&mut self.backend, &self.board, &mut out);
        out
    }

    pub fn population(&self) -> u64 {
        self.board.population()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn mask(&self) -> &NeighborhoodMask {
        &self.mask
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    pub fn config(&self) -> &AutomataConfig {
        &self.config
    }

    /// Worker threads of the backend in use.
    pub fn backend_threads(&self) -> usize {
        self.backend.threads()
    }

    pub fn strategy(&self) -> Strategy {
        self.counter.strategy()
    }

    pub fn into_board(self) -> Board {
        self.board
    }
}

#[cfg(test)]
mod tests {
    use super::{Automata, AutomataConfig, RunReport, resolve_thread_count};
    use crate::backend::BackendKind;
    use crate::board::Board;
    use crate::counter::{Boundary, Strategy};
    use crate::error::Error;
    use crate::mask::NeighborhoodMask;
    use crate::rule::Rule;
    use std::time::Duration;

    #[test]
    fn thread_count_respects_cap() {
        let config = AutomataConfig::default().thread_count(12).max_threads(4);
        assert_eq!(resolve_thread_count(&config), 4);
        let config = AutomataConfig::default().thread_count(3);
        assert_eq!(resolve_thread_count(&config), 3);
        assert!(resolve_thread_count(&AutomataConfig::default()) >= 1);
    }

    #[test]
    fn rejects_rule_beyond_mask_sum() {
        let board = Board::new(8).unwrap();
        let err = Automata::new(
            board,
            NeighborhoodMask::moore(1),
            Rule::new([2, 3], [9]),
            AutomataConfig::default(),
        );
        assert!(matches!(err, Err(Error::InvalidRule { count: 9, max: 8 })));
    }

    #[test]
    fn rejects_mask_larger_than_board() {
        let board = Board::new(4).unwrap();
        for strategy in [Strategy::Spectral, Strategy::Spatial] {
            let err = Automata::new(
                board.clone(),
                NeighborhoodMask::moore(2),
                Rule::conway(),
                AutomataConfig::default().strategy(strategy),
            );
            assert!(matches!(err, Err(Error::InvalidShape(_))), "{strategy}");
        }
    }

    #[test]
    fn snapshot_is_detached() {
        let board = Board::from_alive(6, [(1, 1), (1, 2), (2, 1), (2, 2)]).unwrap();
        let automata = Automata::conway(board.clone()).unwrap();
        let mut snapshot = automata.current_board();
        snapshot.set(0, 0, true);
        assert_eq!(automata.board(), &board);
    }

    #[test]
    fn step_advances_generation() {
        let mut automata = Automata::conway(Board::new(4).unwrap()).unwrap();
        automata.step_n(3);
        assert_eq!(automata.generation(), 3);
        assert_eq!(automata.population(), 0);
    }

    #[test]
    fn config_records_backend_kind() {
        let automata = Automata::new(
            Board::new(8).unwrap(),
            NeighborhoodMask::moore(1),
            Rule::conway(),
            AutomataConfig::default()
                .backend(BackendKind::Rayon)
                .thread_count(2)
                .boundary(Boundary::Toroidal),
        )
        .unwrap();
        assert_eq!(automata.config().backend, BackendKind::Rayon);
        assert_eq!(automata.backend_threads(), 2);
    }

    #[test]
    fn report_derives_throughput() {
        let report = RunReport {
            iterations: 100,
            cells: 1024 * 1024,
            elapsed: Duration::from_secs(2),
        };
        assert_eq!(report.steps_per_second(), 50.0);
        assert_eq!(report.cells_per_second(), 50.0 * 1_048_576.0);
        assert!(report.to_string().starts_with("Performed 100 iterations of 1024x1024 cells"));
    }
}
