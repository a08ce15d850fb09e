//! Analyze a recorded landmark stream.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use shotform_analysis::{AnalysisInput, CancellationToken, RecordedPoseStream, ShotAnalyzer};
use shotform_common::clock::FrameClock;
use shotform_common::config::AppConfig;
use shotform_pose_model::{
    AnalysisSettings, BoundaryPolicy, FeedbackBands, ShootingSide, ShotReport, WristSmoothing,
};

/// Per-call settings given on the command line. `None` keeps the configured value.
pub struct Overrides {
    pub side: Option<ShootingSide>,
    pub confidence: Option<f64>,
    pub min_valid_frames: Option<usize>,
    pub bands: Option<FeedbackBands>,
    pub boundary_policy: Option<BoundaryPolicy>,
    pub smoothing: Option<WristSmoothing>,
}

impl Overrides {
    fn apply(self, settings: &mut AnalysisSettings) {
        if let Some(side) = self.side {
            settings.shooting_side = side;
        }
        if let Some(confidence) = self.confidence {
            settings.confidence_threshold = confidence;
        }
        if let Some(min_valid_frames) = self.min_valid_frames {
            settings.min_valid_frames = min_valid_frames;
        }
        if let Some(bands) = self.bands {
            settings.feedback_bands = bands;
        }
        if let Some(policy) = self.boundary_policy {
            settings.boundary_policy = policy;
        }
        if let Some(smoothing) = self.smoothing {
            settings.wrist_smoothing = smoothing;
        }
    }
}

/// JSON output wrapper.
#[derive(Serialize)]
struct ReportEnvelope<'a> {
    generated_at: DateTime<Utc>,
    tool_version: &'static str,
    stream: String,
    settings: &'a AnalysisSettings,
    report: &'a ShotReport,
}

pub fn run(
    config: &AppConfig,
    stream: PathBuf,
    overrides: Overrides,
    overlay: bool,
    json: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let mut settings = config.analysis.clone();
    overrides.apply(&mut settings);

    let analyzer = ShotAnalyzer::new(settings)
        .map_err(|e| anyhow::anyhow!("Invalid analysis settings: {e}"))?;

    let recorded = RecordedPoseStream::from_path(&stream)
        .map_err(|e| anyhow::anyhow!("Failed to load landmark stream: {e}"))?;

    let input = AnalysisInput::new(recorded.header().fps).with_overlay(overlay);
    let frames = recorded.dense_frames();
    let cancel = CancellationToken::new();
    // Ctrl-C stops the scan at the next frame and still reports.
    signal_hook::flag::register(signal_hook::consts::SIGINT, cancel.flag())?;

    #[cfg(feature = "rayon")]
    let report = analyzer.analyze_parallel(&recorded, &frames, &input, &cancel);
    #[cfg(not(feature = "rayon"))]
    let report = analyzer.analyze(&recorded, frames, &input, &cancel);

    let envelope = ReportEnvelope {
        generated_at: Utc::now(),
        tool_version: env!("CARGO_PKG_VERSION"),
        stream: stream.display().to_string(),
        settings: analyzer.settings(),
        report: &report,
    };

    if let Some(path) = &output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&envelope)?)?;
        tracing::info!(path = %path.display(), "Report written");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else {
        print_summary(&stream, &report);
        if let Some(path) = &output {
            println!("\nReport written to: {}", path.display());
        }
    }

    Ok(())
}

fn print_summary(stream: &std::path::Path, report: &ShotReport) {
    println!("Analyzed: {}", stream.display());
    println!("  Shooting side: {}", report.shooting_side);
    println!(
        "  Frames: {} total, {} valid",
        report.total_frames, report.valid_frames
    );
    println!("  Status: {}", report.status);
    if let Some(reason) = &report.reason {
        println!("  Reason: {reason}");
    }

    if let Some(release) = &report.release {
        let timestamp = FrameClock::new(report.fps)
            .map(|clock| format!(" @ {}", clock.format_frame(release.frame_index)))
            .unwrap_or_default();
        println!(
            "  Release: frame {}{} (confidence {:.2})",
            release.frame_index, timestamp, release.confidence
        );
    }
    if let Some(angle) = &report.angle {
        println!("  Release angle: {:.1}°", angle.degrees);
    }
    if let Some(feedback) = &report.feedback {
        println!();
        println!(
            "Feedback: {} [{}] {}",
            feedback.label, feedback.rating, feedback.range
        );
        println!("  {}", feedback.recommendation);
    }

    if let Some(annotations) = &report.annotations {
        println!();
        println!("Overlay:");
        for a in annotations {
            let angle = a
                .elbow_angle
                .map(|deg| format!("{deg:6.1}°"))
                .unwrap_or_else(|| "     -".to_string());
            let marker = if a.is_release { "  <- release" } else { "" };
            let detected = if a.detected { "pose" } else { "----" };
            println!("  {:>5}  {detected}  {angle}{marker}", a.frame_index);
        }
    }
}
