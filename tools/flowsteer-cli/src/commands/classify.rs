//! Classify a single motion vector.

use flowsteer_common::config::AppConfig;
use flowsteer_motion_model::field::MotionVector;

pub fn run(
    config: &AppConfig,
    dx: f64,
    dy: f64,
    threshold: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let classifier = super::classifier_for(config, threshold)?;
    let motion = MotionVector::new(dx, dy);
    let result = classifier.classify(motion);

    tracing::debug!(
        dx,
        dy,
        raw_angle = motion.angle_degrees(),
        threshold = classifier.threshold(),
        "Classified vector"
    );

    if json {
        println!("{}", serde_json::to_string(&result)?);
    } else {
        println!("{result}");
    }

    Ok(())
}
