//! Convolution-based binary cellular automata on square boards.
//!
//! Neighbor counts come from either a frequency-domain circular convolution
//! or a direct correlation; the two agree cell for cell on a toroidal board.

pub mod automata;
pub mod backend;
pub mod board;
pub mod counter;
pub mod error;
pub mod io;
pub mod kernel;
pub mod mask;
pub mod presets;
pub mod rule;

pub use automata::{Automata, AutomataConfig, RunReport};
pub use backend::{Backend, BackendKind, ComputeBackend, RayonBackend, SerialBackend};
pub use board::Board;
pub use counter::{Boundary, NeighborCounter, Strategy};
pub use error::{Error, Result};
pub use mask::NeighborhoodMask;
pub use presets::{Preset, preset};
pub use rule::{Rule, RuleTable};
