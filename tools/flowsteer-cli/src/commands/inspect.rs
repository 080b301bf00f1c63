//! Aggregate and classify precomputed flow fields.

use std::path::PathBuf;

use anyhow::Context;
use flowsteer_common::config::AppConfig;
use flowsteer_common::error::FlowsteerError;
use flowsteer_motion_model::direction::ClassificationResult;
use flowsteer_motion_model::field::MotionVector;
use flowsteer_motion_model::flo::load_flo;
use flowsteer_processing_core::aggregate::FlowAggregator;
use flowsteer_processing_core::tally::DirectionTally;
use serde::Serialize;

#[derive(Serialize)]
struct FieldReport<'a> {
    path: &'a std::path::Path,
    width: usize,
    height: usize,
    mean: MotionVector,
    #[serde(flatten)]
    result: ClassificationResult,
}

pub fn run(
    config: &AppConfig,
    paths: Vec<PathBuf>,
    threshold: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let classifier = super::classifier_for(config, threshold)?;
    let aggregator = FlowAggregator::new();
    let mut tally = DirectionTally::new();

    for path in &paths {
        let field = load_flo(path)
            .map_err(FlowsteerError::from)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mean = aggregator.aggregate(&field)?;
        let result = classifier.classify(mean);
        tally.record(&result);

        if json {
            let report = FieldReport {
                path,
                width: field.width(),
                height: field.height(),
                mean,
                result,
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            println!(
                "{}  {}x{}  mean=({:.3}, {:.3})  {result}",
                path.display(),
                field.width(),
                field.height(),
                mean.dx,
                mean.dy
            );
        }
    }

    if !json && paths.len() > 1 {
        println!();
        println!("Fields: {}", tally.total);
        println!(
            "  Turning: {} ({} on a bucket boundary)",
            tally.turning_frames(),
            tally.coarse_frames()
        );
        if let Some(direction) = tally.dominant() {
            println!("  Most common: {direction}");
        }
        if let Some(angle) = tally.mean_turning_angle() {
            println!("  Mean turning angle: {angle:.2}");
        }
    }

    Ok(())
}
