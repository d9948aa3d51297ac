/// Iterate consecutive, non-overlapping windows of exactly
/// `segment_samples`, dropping any trailing remainder.
///
/// Dropping the tail is a deliberate contract: aggregate statistics must
/// only reflect full-length context, so a short remainder is never padded.
pub(crate) fn segments(samples: &[f32], segment_samples: usize) -> impl Iterator<Item = &[f32]> {
    samples.chunks_exact(segment_samples.max(1))
}

/// Number of full segments an input of `total` samples yields.
pub(crate) fn segment_count(total: usize, segment_samples: usize) -> usize {
    total / segment_samples.max(1)
}
