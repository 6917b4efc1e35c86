//! Best-frame selection.

use crate::error::{CoverError, PipelineResult};
use covergen_models::FrameScore;

/// Pick the frame index with the maximum composite score.
///
/// Exact ties prefer the frame closest to the temporal middle of the
/// sampled sequence; equidistant candidates resolve to the earlier frame.
/// Both rules are deterministic so repeated runs select the same frame.
pub fn select_cover_frame(scores: &[FrameScore]) -> PipelineResult<usize> {
    if scores.is_empty() {
        return Err(CoverError::NoFrames);
    }

    let middle = (scores.len() - 1) as f64 / 2.0;
    let mut best = 0usize;
    for i in 1..scores.len() {
        let better = scores[i].score > scores[best].score
            || (scores[i].score == scores[best].score
                && (i as f64 - middle).abs() < (best as f64 - middle).abs());
        if better {
            best = i;
        }
    }
    Ok(scores[best].frame_index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(frame_index: usize, score: f64) -> FrameScore {
        FrameScore {
            frame_index,
            timestamp: frame_index as f64,
            brightness: 0.5,
            laplacian_var: 0.0,
            entropy: 0.0,
            subtitle_penalty: 0.0,
            face_area: 0.0,
            score,
        }
    }

    fn scores(values: &[f64]) -> Vec<FrameScore> {
        values.iter().enumerate().map(|(i, &s)| score(i, s)).collect()
    }

    #[test]
    fn test_picks_maximum() {
        let s = scores(&[0.1, 0.3, 0.8, 0.2]);
        assert_eq!(select_cover_frame(&s).unwrap(), 2);
    }

    #[test]
    fn test_tie_breaks_toward_middle_then_earlier() {
        // Middle of a 4-element sequence is 1.5; indices 1 and 2 are
        // equidistant, so the earlier one wins.
        let s = scores(&[0.2, 0.9, 0.9, 0.1]);
        assert_eq!(select_cover_frame(&s).unwrap(), 1);
    }

    #[test]
    fn test_tie_prefers_frame_nearest_middle() {
        // Middle of 5 elements is index 2; a tie between 0 and 2 goes to 2.
        let s = scores(&[0.9, 0.1, 0.9, 0.1, 0.1]);
        assert_eq!(select_cover_frame(&s).unwrap(), 2);
    }

    #[test]
    fn test_empty_input_is_no_frames() {
        assert!(matches!(select_cover_frame(&[]), Err(CoverError::NoFrames)));
    }

    #[test]
    fn test_single_frame() {
        let s = scores(&[0.4]);
        assert_eq!(select_cover_frame(&s).unwrap(), 0);
    }
}
