// Baseline vs degraded metrics demo
// Run with: cargo run --bin demo_run --release [results.json]
//
// Feeds two collectors a deterministic scripted event stream (seeded RNG,
// Werner-state noise) for two nodes, prints both snapshots and the
// robustness report, and saves everything as JSON.

use std::collections::BTreeMap;
use std::fs;

use anyhow::Context;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use qnm_core::{
    robustness_report, DeliveryEvent, DeliveryOutcome, DensityMatrix, FallbackRetriever,
    MetricsCollector, MetricsSnapshot, RequestDescriptor, StateRetriever,
};

const SEED: u64 = 20_240_817;
const FIDELITY_THRESHOLD: f64 = 0.5;
const REQUESTS_PER_NODE: u64 = 5;
const UNITS_PER_REQUEST: u32 = 2;
const MAX_ATTEMPTS_PER_UNIT: u32 = 64;

/// Link quality knobs for one run.
struct LinkProfile {
    label: &'static str,
    /// Werner parameter range for generated pairs.
    quality: (f64, f64),
    /// Per-attempt generation time range, ns.
    attempt_ns: (f64, f64),
}

const BASELINE: LinkProfile = LinkProfile {
    label: "baseline",
    quality: (0.80, 0.98),
    attempt_ns: (150_000.0, 450_000.0),
};

const DEGRADED: LinkProfile = LinkProfile {
    label: "degraded",
    quality: (0.25, 0.75),
    attempt_ns: (300_000.0, 900_000.0),
};

#[derive(Serialize)]
struct DemoResults {
    generated_at: String,
    seed: u64,
    requests_per_node: u64,
    units_per_request: u32,
    fidelity_threshold: f64,
    baseline: MetricsSnapshot,
    degraded: MetricsSnapshot,
    robustness: BTreeMap<String, f64>,
}

/// Drive one full run: register requests for both nodes and deliver units
/// until every quota is met, regenerating pairs the threshold rejects.
fn run_simulation(profile: &LinkProfile, rng: &mut ChaCha8Rng) -> MetricsSnapshot {
    println!("Running {} simulation...", profile.label);

    let mut collector = MetricsCollector::new().with_threshold(FIDELITY_THRESHOLD);
    let mut now_ns = 0.0;
    collector.start(now_ns);

    let mut next_request_id = 1u64;
    for node in ["alice", "bob"] {
        for _ in 0..REQUESTS_PER_NODE {
            let request_id = next_request_id;
            next_request_id += 1;
            collector
                .record_request(RequestDescriptor::new(request_id, node, UNITS_PER_REQUEST), now_ns)
                .unwrap_or_else(|err| panic!("demo generated a bad request: {err}"));

            for unit_ref in 0..u64::from(UNITS_PER_REQUEST) {
                let mut attempts = 0;
                loop {
                    attempts += 1;
                    now_ns += rng.gen_range(profile.attempt_ns.0..profile.attempt_ns.1);

                    // Give up on fidelity filtering after too many retries
                    // and deliver the pair unscored, so the demo always
                    // terminates.
                    let state = if attempts > MAX_ATTEMPTS_PER_UNIT {
                        None
                    } else {
                        let p = rng.gen_range(profile.quality.0..profile.quality.1);
                        let pair = *DensityMatrix::werner(p).matrix();
                        // Memory peek occasionally misses; the raw register
                        // read is the explicit secondary strategy.
                        let peek_hits = rng.gen_bool(0.9);
                        let peek = move |_: u64| peek_hits.then_some(pair);
                        let raw_read = move |_: u64| Some(pair);
                        FallbackRetriever::new(peek, raw_read).retrieve(unit_ref)
                    };

                    let outcome = collector
                        .record_delivery(DeliveryEvent { request_id, unit_ref, state }, now_ns);
                    match outcome {
                        DeliveryOutcome::Accepted { .. } => break,
                        DeliveryOutcome::Rejected { .. } => continue,
                        other => panic!("unexpected outcome in scripted demo: {other:?}"),
                    }
                }
            }
        }
    }

    collector.finish(now_ns);
    collector.snapshot()
}

fn print_snapshot(label: &str, snap: &MetricsSnapshot) {
    println!("\n{}", "=".repeat(60));
    println!("{} METRICS", label.to_uppercase());
    println!("{}", "=".repeat(60));
    println!("  Completed requests:  {}", snap.total_requests);
    println!("  Simulation time:     {:.3} ms", snap.simulation_time_ns / 1e6);
    println!("  Throughput:          {:.2} units/s", snap.throughput);
    println!("  Mean request latency: {:.3} ms", snap.mean_request_latency / 1e6);
    println!("  Mean unit latency:    {:.3} ms", snap.mean_unit_latency / 1e6);
    println!("  Mean scaled latency:  {:.3} ms", snap.mean_scaled_latency / 1e6);
    if let Some(f) = snap.mean_fidelity {
        println!("  Mean fidelity:       {:.6}", f);
    }
    println!("  Rejected states:     {}", snap.rejected_states);
    println!("  Fairness (throughput): {:.6}", snap.fairness_throughput);
    println!("  Fairness (latency):    {:.6}", snap.fairness_latency);
    if let Some(j) = snap.fairness_fidelity {
        println!("  Fairness (fidelity):   {:.6}", j);
    }
    println!("  Per-node breakdown:");
    for (node_id, node) in &snap.per_node {
        print!(
            "    {}: {:.2} units/s, avg latency {:.3} ms, {} units",
            node_id,
            node.throughput,
            node.avg_latency / 1e6,
            node.total_units
        );
        match node.avg_fidelity {
            Some(f) => println!(", avg fidelity {:.6}", f),
            None => println!(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let results_path = std::env::args().nth(1).unwrap_or_else(|| "metrics_results.json".to_string());

    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let baseline = run_simulation(&BASELINE, &mut rng);
    let degraded = run_simulation(&DEGRADED, &mut rng);

    print_snapshot("baseline", &baseline);
    print_snapshot("degraded", &degraded);

    let robustness = robustness_report(&baseline, &degraded);
    println!("\n{}", "=".repeat(60));
    println!("ROBUSTNESS (degraded vs baseline, 1.0 = unaffected)");
    println!("{}", "=".repeat(60));
    for (metric, ratio) in &robustness {
        println!("  {}: {:.6}", metric, ratio);
    }

    let results = DemoResults {
        generated_at: chrono::Utc::now().to_rfc3339(),
        seed: SEED,
        requests_per_node: REQUESTS_PER_NODE,
        units_per_request: UNITS_PER_REQUEST,
        fidelity_threshold: FIDELITY_THRESHOLD,
        baseline,
        degraded,
        robustness,
    };
    let json = serde_json::to_string_pretty(&results).context("serializing demo results")?;
    fs::write(&results_path, json).with_context(|| format!("writing {results_path}"))?;
    println!("\nResults saved to: {}", results_path);

    Ok(())
}
