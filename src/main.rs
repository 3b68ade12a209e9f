//! Timing and counting experiments for in place block merge sorting

use std::{
    fs::File,
    io::{BufWriter, Write as _},
    path::Path,
    time::Duration,
};

use anyhow::Context as _;
use clap::Parser as _;
use rand::{SeedableRng as _, rngs::StdRng};

mod algorithms;
mod cli;
mod data;
mod error;
mod metrics;


/// The metrics collected during the experiment
#[cfg(feature = "counters")]
type RunMetrics = metrics::SortMetrics;
/// The metrics collected during the experiment
#[cfg(not(feature = "counters"))]
type RunMetrics = metrics::NoMetrics;

/// A single measured run
#[derive(Debug, Clone, Copy)]
struct Sample {
    duration: Duration,
    metrics: Option<metrics::SortMetrics>,
}

/// Program entry point
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::Args::parse();
    args.validate()?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => {
            log::warn!("No seed provided, generating one using system rng");
            StdRng::from_os_rng()
        }
    };

    let (samples, stats) = with_data_type! { args; T, D => {
        let sorter = args.sorter::<T, RunMetrics>();

        log::info!(
            "Running measurements for the following algorithm:\n{} (stable: {})",
            sorter.name,
            sorter.is_stable,
        );
        log::info!(
            "Runs: {}, Slice size: {}, Data type: {} {}",
            args.runs,
            args.size,
            args.data,
            args.element,
        );

        perform_experiment::<T, D, RunMetrics>(&sorter, args.runs, args.size, &mut rng)
    }};

    println!("Stats (ms): {stats:?}");
    if let Some(average) = average_metrics(&samples) {
        println!("Average {average}");
    }

    if let Some(path) = &args.output {
        write_samples(path, &samples)?;
    }

    Ok(())
}

/// Perform a time sampling experiment on the given sort
///
/// - runs: The number of samples to measure
/// - size: The size of the slices to sort
/// - rng: The rng used for sampling the data
fn perform_experiment<T: Ord + std::fmt::Debug, D: data::Data<T>, M: metrics::Report>(
    sorter: &cli::Sorter<T, M>,
    runs: usize,
    size: usize,
    rng: &mut StdRng,
) -> (Vec<Sample>, rolling_stats::Stats<f64>) {
    let mut samples = Vec::with_capacity(runs);
    let mut stats: rolling_stats::Stats<f64> = rolling_stats::Stats::new();

    let bar = indicatif::ProgressBar::new(runs as u64);

    for run in 0..=runs {
        let mut data = D::initialize(size, rng);
        let mut metrics = M::default();

        let now = std::time::Instant::now();
        (sorter.sort)(std::hint::black_box(&mut data), &mut metrics);
        let elapsed = now.elapsed();

        debug_assert!(
            data.is_sorted(),
            "{data:?} is not sorted after algorithm run"
        );

        // The first run is a warmup
        if run != 0 {
            log::debug!("Run {run} took {elapsed:?}");

            stats.update(elapsed.as_secs_f64() * 1e3);
            samples.push(Sample {
                duration: elapsed,
                metrics: metrics.report(),
            });

            bar.inc(1);
        }
    }

    bar.finish_and_clear();
    (samples, stats)
}

/// The average counts over all samples, if counts were collected
fn average_metrics(samples: &[Sample]) -> Option<metrics::SortMetrics> {
    let count = samples.len() as u64;
    if count == 0 {
        return None;
    }

    let mut total = metrics::SortMetrics::default();
    for sample in samples {
        total += sample.metrics?;
    }

    Some(metrics::SortMetrics {
        compares: total.compares / count,
        assignments: total.assignments / count,
    })
}

/// Write the samples as csv, counts are left empty if not collected
fn write_samples(path: &Path, samples: &[Sample]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "run,nanoseconds,compares,assignments")?;
    for (run, sample) in samples.iter().enumerate() {
        let (compares, assignments) = match sample.metrics {
            Some(metrics) => (metrics.compares.to_string(), metrics.assignments.to_string()),
            None => (String::new(), String::new()),
        };

        writeln!(
            writer,
            "{run},{},{compares},{assignments}",
            sample.duration.as_nanos()
        )?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write output file {}", path.display()))?;

    log::info!("Wrote {} samples to {}", samples.len(), path.display());
    Ok(())
}
