//! `bufmeter estimate` – bytes for a set of buffered ranges.

use anyhow::{bail, Result};
use bufmeter_core::estimate::{time_to_byte_range, EstimateReport};
use bufmeter_core::ranges::TimeRange;

pub fn run_estimate(ranges: &[TimeRange], duration: f64, size: u64, epsilon: f64) -> Result<()> {
    if !duration.is_finite() || duration <= 0.0 {
        bail!("duration must be a positive number of seconds (got {duration})");
    }
    if !epsilon.is_finite() || epsilon < 0.0 {
        bail!("epsilon must be a non-negative number of seconds (got {epsilon})");
    }

    let report = EstimateReport::analyze(ranges, duration, size, epsilon);
    let dropped = ranges.len() - ranges.iter().filter(|r| r.is_well_formed()).count();
    if dropped > 0 {
        println!("Ignored {dropped} malformed range(s).");
    }

    println!(
        "  {:>10}  {:>10}  {:>12}  {:>12}",
        "Start(s)", "End(s)", "FirstByte", "LastByte"
    );
    for r in report.merged.iter() {
        match time_to_byte_range(r.start, r.end, duration, size) {
            Some(b) => println!(
                "  {:>10.3}  {:>10.3}  {:>12}  {:>12}",
                r.start, r.end, b.start, b.end
            ),
            None => println!("  {:>10.3}  {:>10.3}  {:>12}  {:>12}", r.start, r.end, "-", "-"),
        }
    }
    println!(
        "Covered: {:.3}s of {:.3}s ({:.1}%)",
        report.covered_secs,
        report.duration_secs,
        report.coverage_fraction() * 100.0
    );
    println!("Estimated bytes: {} of {}", report.estimated_bytes, report.total_size_bytes);
    if report.fully_covered {
        println!("Fully buffered.");
    }
    Ok(())
}
