//! Line-based geometry descriptor built on the segment extractor.
use super::options::GeometryOptions;
use super::types::GeometryDescriptor;
use crate::angle::deviation_deg;
use crate::edges::Grad;
use crate::segments::{extract_segments, LineSegment};

pub(crate) fn describe_geometry(grad: &Grad, opts: &GeometryOptions) -> GeometryDescriptor {
    summarize_segments(extract_segments(grad, &opts.lsd), opts)
}

pub(crate) fn summarize_segments(segments: Vec<LineSegment>, opts: &GeometryOptions) -> GeometryDescriptor {
    let mut total_length = 0.0f32;
    let mut aligned_length = 0.0f32;
    for seg in &segments {
        total_length += seg.length;
        let off_axis = deviation_deg(seg.orientation_deg, 0.0).min(deviation_deg(seg.orientation_deg, 90.0));
        if off_axis <= opts.alignment_tolerance_deg {
            aligned_length += seg.length;
        }
    }
    let regularity = if total_length > 0.0 {
        aligned_length / total_length
    } else {
        0.0
    };
    GeometryDescriptor {
        segments,
        regularity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_segments_are_regular() {
        let segments = vec![
            LineSegment::new([0.0, 10.0], [100.0, 10.0], 0.5, 200),
            LineSegment::new([20.0, 0.0], [20.0, 50.0], 0.5, 100),
            LineSegment::new([0.0, 0.0], [30.0, 30.0], 0.5, 60),
        ];
        let geo = summarize_segments(segments, &GeometryOptions::default());
        let diag = 30.0f32 * std::f32::consts::SQRT_2;
        let expected = 150.0 / (150.0 + diag);
        assert!((geo.regularity - expected).abs() < 1e-4);
        assert_eq!(geo.segments.len(), 3);
    }

    #[test]
    fn no_segments_gives_empty_descriptor() {
        let geo = summarize_segments(Vec::new(), &GeometryOptions::default());
        assert!(geo.is_empty());
        assert_eq!(geo.regularity, 0.0);
    }
}
