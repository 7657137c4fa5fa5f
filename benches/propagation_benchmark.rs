use breachsim::{
    vulnerability_analysis, AnalysisConfig, AttackScenario, Dependency, Network,
    SimulationConfig, Simulator,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

/// Layered plant: each layer fully feeds the next
fn layered_network(layers: usize, width: usize) -> Network {
    let name = |layer: usize, i: usize| format!("L{}-D{}", layer, i);

    let mut devices = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for i in 0..width {
            let risk = ((layer * width + i) % 10) as f64 / 10.0;
            devices.push((name(layer, i), risk));
        }
    }

    let mut dependencies = Vec::new();
    for layer in 0..layers.saturating_sub(1) {
        for i in 0..width {
            for j in 0..width {
                dependencies.push(Dependency::with_weight(
                    name(layer, i),
                    name(layer + 1, j),
                    1.0 + (i + j) as f64 % 3.0 * 0.5,
                ));
            }
        }
    }

    Network::build(devices, dependencies).expect("generated network is valid")
}

/// Benchmark a single seeded simulation
fn bench_simulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");

    for layers in [4, 16, 64].iter() {
        let network = layered_network(*layers, 8);
        let scenario = AttackScenario::new(["L0-D0"], "bench");
        let simulator = Simulator::new(SimulationConfig::with_seed(1));

        group.bench_with_input(BenchmarkId::from_parameter(layers), layers, |b, _| {
            b.iter(|| simulator.simulate(&network, &scenario).unwrap());
        });
    }
    group.finish();
}

/// Benchmark a parallel Monte-Carlo batch
fn bench_batch(c: &mut Criterion) {
    let network = layered_network(16, 8);
    let scenario = AttackScenario::new(["L0-D0", "L0-D1"], "bench");
    let simulator = Simulator::new(SimulationConfig::with_seed(1));

    c.bench_function("simulate_batch_256", |b| {
        b.iter(|| simulator.simulate_batch(&network, &scenario, 256).unwrap());
    });
}

/// Benchmark centrality and critical path analysis
fn bench_vulnerability(c: &mut Criterion) {
    let mut group = c.benchmark_group("vulnerability_analysis");

    for layers in [4, 16, 32].iter() {
        let network = layered_network(*layers, 8);
        group.bench_with_input(BenchmarkId::from_parameter(layers), layers, |b, _| {
            b.iter(|| vulnerability_analysis(&network, &AnalysisConfig::default()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simulate, bench_batch, bench_vulnerability);
criterion_main!(benches);
