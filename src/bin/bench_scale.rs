use conv_life::io::seed;
use conv_life::{Automata, AutomataConfig, NeighborhoodMask, Rule, Strategy};

fn bench(size: usize, strategy: Strategy, iterations: u64) -> (f64, u64) {
    let board = seed::random(size, 0.42, 0x5EED_1234_ABCD_EF01).expect("valid density");
    let config = AutomataConfig::default().strategy(strategy);
    let mut automata = Automata::new(board, NeighborhoodMask::moore(1), Rule::conway(), config)
        .expect("valid automaton");
    let report = automata.run(iterations);
    (report.elapsed.as_secs_f64() * 1000.0, automata.population())
}

fn main() {
    let scales: &[(usize, u64)] = &[(64, 500), (256, 200), (512, 100), (1024, 50), (2048, 10)];

    println!(
        "{:<10} {:<9} {:>8} {:>12} {:>10} {:>12}",
        "Grid", "Strategy", "Iters", "Total(ms)", "Avg(ms)", "Pop"
    );
    println!("{}", "-".repeat(66));

    for &(size, iters) in scales {
        for strategy in [Strategy::Spectral, Strategy::Spatial] {
            let (total_ms, pop) = bench(size, strategy, iters);
            println!(
                "{:<10} {:<9} {:>8} {:>12.1} {:>10.4} {:>12}",
                format!("{size}x{size}"),
                strategy.to_string(),
                iters,
                total_ms,
                total_ms / iters as f64,
                pop
            );
        }
    }
}
