//! Vector math for similarity scoring
//!
//! Accumulation happens in `f64` so that scores stay stable for
//! high-dimensional `f32` embeddings.

/// Dot product; 0 when lengths differ
pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum()
}

/// L2 norm; 0 for an empty vector
pub fn magnitude(v: &[f32]) -> f64 {
    v.iter()
        .map(|x| f64::from(*x) * f64::from(*x))
        .sum::<f64>()
        .sqrt()
}

/// Cosine similarity of `a` and `b`.
///
/// Returns 0 for empty or mismatched-length vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    cosine_similarity_with_magnitudes(a, b, magnitude(a), magnitude(b))
}

/// Cosine similarity with precomputed magnitudes, for comparing many vectors
/// against one fixed query. Returns 0 if either magnitude is not positive.
pub fn cosine_similarity_with_magnitudes(
    a: &[f32],
    b: &[f32],
    magnitude_a: f64,
    magnitude_b: f64,
) -> f64 {
    if a.is_empty() || a.len() != b.len() || magnitude_a <= 0.0 || magnitude_b <= 0.0 {
        return 0.0;
    }
    dot(a, b) / (magnitude_a * magnitude_b)
}

/// Unit-length copy of `v`; unchanged if empty or zero
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let mag = magnitude(v);
    if v.is_empty() || mag == 0.0 {
        return v.to_vec();
    }
    v.iter().map(|x| (f64::from(*x) / mag) as f32).collect()
}
