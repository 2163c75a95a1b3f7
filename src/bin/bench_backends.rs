use std::time::Instant;

use conv_life::io::seed;
use conv_life::{Automata, AutomataConfig, BackendKind, NeighborhoodMask, Rule, Strategy};

const SIZE: usize = 1024;
const ITERATIONS: u64 = 50;

fn parse_threads() -> Option<usize> {
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        if args[i] == "--threads" {
            i += 1;
            let n = args
                .get(i)
                .and_then(|v| v.parse().ok())
                .unwrap_or_else(|| panic!("--threads requires a positive integer"));
            return Some(n);
        }
        i += 1;
    }
    None
}

fn main() {
    let threads = parse_threads();
    let board = seed::random(SIZE, 0.42, 0x5EED_1234_ABCD_EF01).expect("valid density");

    for strategy in [Strategy::Spectral, Strategy::Spatial] {
        let mut populations = Vec::new();
        for backend in [BackendKind::Serial, BackendKind::Rayon] {
            let mut config = AutomataConfig::default().strategy(strategy).backend(backend);
            if let Some(n) = threads {
                config = config.thread_count(n);
            }
            let setup = Instant::now();
            let mut automata = Automata::new(
                board.clone(),
                NeighborhoodMask::moore(1),
                Rule::conway(),
                config,
            )
            .expect("valid automaton");
            let setup_ms = setup.elapsed().as_secs_f64() * 1000.0;
            let report = automata.run(ITERATIONS);
            populations.push(automata.population());
            println!(
                "{strategy:<9} {backend:<7} setup {setup_ms:>8.2} ms | {:>8.1} Hz | {:>6.3} BHz (cell)",
                report.steps_per_second(),
                report.cells_per_second() / 1e9,
            );
        }
        let status = if populations.windows(2).all(|w| w[0] == w[1]) {
            "MATCH"
        } else {
            "MISMATCH"
        };
        println!("  final population {populations:?} [{status}]");
    }
}
