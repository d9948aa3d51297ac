use std::fmt;

use serde::Serialize;

use crate::error::EmptyResultError;

/// Per-segment label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SegmentLabel {
    #[serde(rename = "AI")]
    Ai,
    Human,
}

impl fmt::Display for SegmentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentLabel::Ai => write!(f, "AI"),
            SegmentLabel::Human => write!(f, "Human"),
        }
    }
}

/// Classifier verdict for one fixed-length segment.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SegmentPrediction {
    pub label: SegmentLabel,
    /// `max(p, 1 - p)` for model output `p`; in `[0.5, 1.0]`.
    pub confidence: f32,
}

impl SegmentPrediction {
    /// Derive label and confidence from a raw model probability.
    pub fn from_probability(probability_ai: f32) -> Self {
        if probability_ai > 0.5 {
            Self {
                label: SegmentLabel::Ai,
                confidence: probability_ai,
            }
        } else {
            Self {
                label: SegmentLabel::Human,
                confidence: 1.0 - probability_ai,
            }
        }
    }
}

/// File-level verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "AI")]
    Ai,
    Human,
    Uncertain,
    Mixed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Ai => write!(f, "AI"),
            Verdict::Human => write!(f, "Human"),
            Verdict::Uncertain => write!(f, "Uncertain"),
            Verdict::Mixed => write!(f, "Mixed"),
        }
    }
}

/// One entry in the per-segment timeline, in playback order.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SegmentReport {
    /// Segment start offset from the beginning of the file, in seconds.
    pub timestamp_secs: u32,
    pub prediction: SegmentLabel,
    pub confidence: f32,
}

/// Aggregate over an ordered sequence of segment predictions.
///
/// Created fresh per analysis and not mutated afterwards; persistence, if
/// any, is the caller's concern.
#[derive(Clone, Debug, Serialize)]
pub struct FileResult {
    pub total_chunks: usize,
    pub ai_chunks: usize,
    pub human_chunks: usize,
    pub percent_ai: f32,
    pub percent_human: f32,
    /// Mean of the per-segment confidences.
    pub aggregate_confidence: f32,
    pub overall_prediction: Verdict,
    pub segments: Vec<SegmentReport>,
}

/// Combine ordered segment predictions into a file-level verdict.
///
/// The decision table is ordered and first-match-wins; the percentage gates
/// run before the confidence band, and anything left over is `Mixed`. The
/// 60/40 thresholds reproduce the trained system's behavior and are not to
/// be adjusted.
pub fn aggregate(
    predictions: &[SegmentPrediction],
    segment_seconds: u32,
) -> Result<FileResult, EmptyResultError> {
    if predictions.is_empty() {
        return Err(EmptyResultError);
    }
    let total = predictions.len();
    let ai = predictions
        .iter()
        .filter(|p| p.label == SegmentLabel::Ai)
        .count();
    let human = total - ai;
    let percent_ai = ai as f32 / total as f32 * 100.0;
    let percent_human = human as f32 / total as f32 * 100.0;
    let aggregate_confidence = (predictions
        .iter()
        .map(|p| p.confidence as f64)
        .sum::<f64>()
        / total as f64) as f32;

    let overall_prediction = if percent_ai > 60.0 {
        Verdict::Ai
    } else if percent_human > 60.0 {
        Verdict::Human
    } else if (40.0..=60.0).contains(&aggregate_confidence) {
        Verdict::Uncertain
    } else {
        Verdict::Mixed
    };

    let segments = predictions
        .iter()
        .enumerate()
        .map(|(idx, p)| SegmentReport {
            timestamp_secs: idx as u32 * segment_seconds,
            prediction: p.label,
            confidence: p.confidence,
        })
        .collect();

    Ok(FileResult {
        total_chunks: total,
        ai_chunks: ai,
        human_chunks: human,
        percent_ai,
        percent_human,
        aggregate_confidence,
        overall_prediction,
        segments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(label: SegmentLabel, confidence: f32) -> SegmentPrediction {
        SegmentPrediction { label, confidence }
    }

    fn mixed_set(ai: usize, human: usize, confidence: f32) -> Vec<SegmentPrediction> {
        let mut predictions = vec![prediction(SegmentLabel::Ai, confidence); ai];
        predictions.extend(vec![prediction(SegmentLabel::Human, confidence); human]);
        predictions
    }

    #[test]
    fn majority_ai_wins_first_branch() {
        let result = aggregate(&mixed_set(7, 3, 0.9), 3).unwrap();
        assert_eq!(result.overall_prediction, Verdict::Ai);
        assert_eq!(result.total_chunks, 10);
        assert_eq!(result.ai_chunks, 7);
        assert_eq!(result.human_chunks, 3);
        assert!((result.percent_ai - 70.0).abs() < 1e-5);
        assert!((result.percent_human - 30.0).abs() < 1e-5);
        assert!((result.aggregate_confidence - 0.9).abs() < 1e-6);
    }

    #[test]
    fn majority_human_wins_second_branch() {
        let result = aggregate(&mixed_set(3, 7, 0.8), 3).unwrap();
        assert_eq!(result.overall_prediction, Verdict::Human);
    }

    #[test]
    fn even_split_with_midband_confidence_is_uncertain() {
        // Synthetic confidences; the band is compared against the raw mean.
        let result = aggregate(&mixed_set(5, 5, 50.0), 3).unwrap();
        assert_eq!(result.overall_prediction, Verdict::Uncertain);
    }

    #[test]
    fn near_split_with_high_confidence_is_mixed() {
        let result = aggregate(&mixed_set(11, 9, 70.0), 3).unwrap();
        assert!((result.percent_ai - 55.0).abs() < 1e-5);
        assert_eq!(result.overall_prediction, Verdict::Mixed);
    }

    #[test]
    fn band_edges_are_inclusive() {
        let at_forty = aggregate(&mixed_set(5, 5, 40.0), 3).unwrap();
        assert_eq!(at_forty.overall_prediction, Verdict::Uncertain);
        let at_sixty = aggregate(&mixed_set(5, 5, 60.0), 3).unwrap();
        assert_eq!(at_sixty.overall_prediction, Verdict::Uncertain);
        let above = aggregate(&mixed_set(5, 5, 60.001), 3).unwrap();
        assert_eq!(above.overall_prediction, Verdict::Mixed);
    }

    #[test]
    fn exactly_sixty_percent_falls_through_the_gates() {
        // 6/10 is not strictly greater than 60, so neither gate fires.
        let result = aggregate(&mixed_set(6, 4, 0.9), 3).unwrap();
        assert_eq!(result.overall_prediction, Verdict::Mixed);
    }

    #[test]
    fn single_segment_always_hits_a_percentage_gate() {
        let ai = aggregate(&[prediction(SegmentLabel::Ai, 0.7)], 3).unwrap();
        assert_eq!(ai.total_chunks, 1);
        assert!((ai.percent_ai - 100.0).abs() < 1e-5);
        assert_eq!(ai.overall_prediction, Verdict::Ai);

        let human = aggregate(&[prediction(SegmentLabel::Human, 0.7)], 3).unwrap();
        assert!((human.percent_ai - 0.0).abs() < 1e-5);
        assert_eq!(human.overall_prediction, Verdict::Human);
    }

    #[test]
    fn zero_segments_is_a_defended_error() {
        assert!(aggregate(&[], 3).is_err());
    }

    #[test]
    fn timeline_keeps_segment_order_and_spacing() {
        let result = aggregate(&mixed_set(2, 2, 0.9), 3).unwrap();
        let stamps: Vec<u32> = result.segments.iter().map(|s| s.timestamp_secs).collect();
        assert_eq!(stamps, vec![0, 3, 6, 9]);
        assert_eq!(result.segments[0].prediction, SegmentLabel::Ai);
        assert_eq!(result.segments[3].prediction, SegmentLabel::Human);
    }

    #[test]
    fn labels_derive_from_the_half_threshold() {
        let ai = SegmentPrediction::from_probability(0.9);
        assert_eq!(ai.label, SegmentLabel::Ai);
        assert!((ai.confidence - 0.9).abs() < 1e-6);

        let human = SegmentPrediction::from_probability(0.2);
        assert_eq!(human.label, SegmentLabel::Human);
        assert!((human.confidence - 0.8).abs() < 1e-6);

        // Exactly 0.5 is not strictly greater, so it reads as Human.
        let tie = SegmentPrediction::from_probability(0.5);
        assert_eq!(tie.label, SegmentLabel::Human);
        assert!((tie.confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn result_serializes_with_original_api_labels() {
        let result = aggregate(&mixed_set(3, 1, 0.9), 3).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["overall_prediction"], "AI");
        assert_eq!(json["total_chunks"], 4);
        assert_eq!(json["segments"][0]["prediction"], "AI");
        assert_eq!(json["segments"][0]["timestamp_secs"], 0);
    }
}
