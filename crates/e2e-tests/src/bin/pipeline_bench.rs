use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use e2e_tests::{day, synthetic_batch, KeywordVectorizer, TestHarness};
use review_embeddings::{HashingVectorizer, Vectorizer};
use review_topics::{ExtractionConfig, TopicExtractor, TopicsConfig};

#[derive(Parser, Debug)]
#[command(name = "pipeline_bench", about = "Daily pipeline timing harness")]
struct Args {
    #[arg(long, value_enum, default_value = "hashing")]
    vectorizer: VectorizerChoice,
    /// Consecutive days per iteration
    #[arg(long, default_value_t = 14)]
    days: u32,
    /// Reviews per day
    #[arg(long, default_value_t = 200)]
    batch_size: usize,
    #[arg(long, default_value_t = 3)]
    iterations: usize,
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Write latest.json and latest.txt here
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Serialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum VectorizerChoice {
    Hashing,
    Keyword,
}

#[derive(Debug, Serialize)]
struct StepMetrics {
    p50_ms: f64,
    p90_ms: f64,
    p99_ms: f64,
    samples: usize,
}

#[derive(Debug, Serialize)]
struct BenchmarkOutput {
    vectorizer: VectorizerChoice,
    days: u32,
    batch_size: usize,
    iterations: usize,
    final_catalog_size: usize,
    steps: BTreeMap<String, StepMetrics>,
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    if args.days == 0 || args.days > 28 {
        return Err("--days must be between 1 and 28".to_string());
    }

    let mut durations: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    let mut final_catalog_size = 0;

    for iteration in 0..args.iterations {
        let vectorizer = make_vectorizer(args.vectorizer)?;
        let extractor = TopicExtractor::new(vectorizer.clone(), ExtractionConfig::default())
            .map_err(|e| e.to_string())?;
        let mut harness = TestHarness::with_config(vectorizer, TopicsConfig::default());
        let mut rng = StdRng::seed_from_u64(args.seed + iteration as u64);

        for n in 1..=args.days {
            let batch = synthetic_batch(&mut rng, args.batch_size);

            let start = Instant::now();
            extractor.extract(&batch).map_err(|e| e.to_string())?;
            record(&mut durations, "extract", start);

            let start = Instant::now();
            harness
                .pipeline
                .run_day(day(n), &batch)
                .map_err(|e| e.to_string())?;
            record(&mut durations, "run_day", start);
        }

        let start = Instant::now();
        harness
            .pipeline
            .trends()
            .matrix(None, None)
            .map_err(|e| e.to_string())?;
        record(&mut durations, "report", start);

        final_catalog_size = harness.catalog().len();
    }

    let output = BenchmarkOutput {
        vectorizer: args.vectorizer,
        days: args.days,
        batch_size: args.batch_size,
        iterations: args.iterations,
        final_catalog_size,
        steps: durations
            .into_iter()
            .map(|(step, mut values)| {
                values.sort_by(|a, b| a.total_cmp(b));
                let metrics = StepMetrics {
                    p50_ms: percentile(&values, 50.0),
                    p90_ms: percentile(&values, 90.0),
                    p99_ms: percentile(&values, 99.0),
                    samples: values.len(),
                };
                (step, metrics)
            })
            .collect(),
    };

    let table = render_table(&output);
    print!("{}", table);

    if let Some(out_dir) = &args.out_dir {
        let json = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
        fs::create_dir_all(out_dir).map_err(|e| format!("Failed to create out dir: {e}"))?;
        fs::write(out_dir.join("latest.json"), json).map_err(|e| e.to_string())?;
        fs::write(out_dir.join("latest.txt"), table).map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn make_vectorizer(choice: VectorizerChoice) -> Result<Arc<dyn Vectorizer>, String> {
    let vectorizer: Arc<dyn Vectorizer> = match choice {
        VectorizerChoice::Hashing => {
            Arc::new(HashingVectorizer::new(256).map_err(|e| e.to_string())?)
        }
        VectorizerChoice::Keyword => Arc::new(KeywordVectorizer::new()),
    };
    Ok(vectorizer)
}

fn record(durations: &mut BTreeMap<String, Vec<f64>>, step: &str, start: Instant) {
    durations
        .entry(step.to_string())
        .or_default()
        .push(start.elapsed().as_secs_f64() * 1000.0);
}

fn percentile(values: &[f64], percentile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let rank = (percentile / 100.0) * (values.len() as f64 - 1.0);
    let low = rank.floor() as usize;
    let high = rank.ceil() as usize;
    if low == high {
        values[low]
    } else {
        let weight = rank - low as f64;
        values[low] + (values[high] - values[low]) * weight
    }
}

fn render_table(output: &BenchmarkOutput) -> String {
    let mut lines = vec![
        format!(
            "Pipeline bench (vectorizer={:?}, days={}, batch={}, iterations={})",
            output.vectorizer, output.days, output.batch_size, output.iterations
        ),
        format!("Final catalog size: {}", output.final_catalog_size),
        format!(
            "{:<10} {:>10} {:>10} {:>10} {:>8}",
            "step", "p50_ms", "p90_ms", "p99_ms", "samples"
        ),
    ];
    for (step, m) in &output.steps {
        lines.push(format!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>8}",
            step, m.p50_ms, m.p90_ms, m.p99_ms, m.samples
        ));
    }
    lines.join("\n") + "\n"
}
