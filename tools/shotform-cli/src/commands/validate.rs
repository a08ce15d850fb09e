//! Validate a recorded landmark stream.

use std::path::PathBuf;

use shotform_analysis::RecordedPoseStream;
use shotform_common::clock::FrameClock;
use shotform_pose_model::{CoordinateSpace, LandmarkStreamHeader};

pub fn run(stream: PathBuf) -> anyhow::Result<()> {
    println!("Validating landmark stream at: {}", stream.display());

    let recorded = RecordedPoseStream::from_path(&stream)
        .map_err(|e| anyhow::anyhow!("Failed to load landmark stream: {e}"))?;

    let header = recorded.header();
    let frames = &recorded.stream().frames;
    let dense = recorded.dense_frames();

    println!("  Schema version: {}", header.schema_version);
    println!("  Resolution: {}x{}", header.width, header.height);
    println!("  FPS: {}", header.fps);
    println!("  Coordinates: {:?}", header.coordinate_space);
    if let Some(source) = &header.source {
        println!("  Source: {source}");
    }
    println!("  Frames recorded: {}", frames.len());
    println!("  Frames with landmarks: {}", recorded.stream().detected_count());
    println!("  Frames missing from stream: {}", dense.len() - frames.len());
    if let Some(clock) = FrameClock::new(header.fps) {
        println!("  Duration: {}", clock.format_frame(dense.len()));
    }

    let issues = header_issues(header);
    if issues.is_empty() {
        println!("\nStream is valid.");
    } else {
        println!("\nValidation issues:");
        for issue in &issues {
            println!("  - {issue}");
        }
        println!(
            "\n{} issue(s) found. Analysis results may be unreliable.",
            issues.len()
        );
    }

    Ok(())
}

fn header_issues(header: &LandmarkStreamHeader) -> Vec<String> {
    let mut issues = Vec::new();
    if header.schema_version != LandmarkStreamHeader::SCHEMA_VERSION {
        issues.push(format!(
            "schema version {} differs from supported {}",
            header.schema_version,
            LandmarkStreamHeader::SCHEMA_VERSION
        ));
    }
    if FrameClock::new(header.fps).is_none() {
        issues.push(format!(
            "frame rate {} is not positive; release time will be omitted",
            header.fps
        ));
    }
    if header.coordinate_space == CoordinateSpace::Normalized
        && (header.width == 0 || header.height == 0)
    {
        issues.push("normalized coordinates need non-zero width and height".to_string());
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_issues() {
        assert!(header_issues(&LandmarkStreamHeader::new(640, 480, 30.0)).is_empty());

        let mut header = LandmarkStreamHeader::new(0, 480, 0.0);
        header.coordinate_space = CoordinateSpace::Normalized;
        assert_eq!(header_issues(&header).len(), 2);
    }
}
