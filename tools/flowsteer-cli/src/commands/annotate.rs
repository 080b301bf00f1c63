//! Annotate a video file.

use std::path::PathBuf;

use flowsteer_common::config::AppConfig;
use flowsteer_motion_model::direction::Direction;
use flowsteer_video_engine::annotate::{annotate_video, AnnotateJob};
use flowsteer_video_engine::frame_loop::{LoopProgress, ProgressCallback};

pub async fn run(
    mut config: AppConfig,
    input: PathBuf,
    output: PathBuf,
    threshold: Option<f64>,
    fourcc: Option<String>,
    report: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(threshold) = threshold {
        config.classifier.threshold = threshold;
    }
    if let Some(fourcc) = fourcc {
        config.output.fourcc = fourcc;
    }

    println!("Annotating: {}", input.display());
    println!("  Output: {}", output.display());
    println!("  Threshold: {}", config.classifier.threshold);

    let progress_cb: ProgressCallback = Box::new(|p: LoopProgress| {
        print!("\r  Frames: {}  ({})          ", p.frames_written, p.result);
    });

    let job = AnnotateJob {
        input,
        output: output.clone(),
        config,
        report_path: report.clone(),
        progress: Some(progress_cb),
    };

    let summary = annotate_video(job).await?;

    println!("\nAnnotation complete: {}", output.display());
    println!(
        "  Frames read: {}, written: {}",
        summary.frames_read, summary.frames_written
    );
    for direction in Direction::ALL {
        let count = summary.tally.count(direction);
        if count > 0 {
            println!("  {direction:<13} {count}");
        }
    }
    if let Some(path) = report {
        println!("  Report: {}", path.display());
    }

    Ok(())
}
