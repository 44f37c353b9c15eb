//! Vector similarity helpers

/// Calculate cosine similarity between two vectors
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Cosine similarity mapped onto the `[0, 1]` score scale.
///
/// Opposed and orthogonal vectors both score 0.
pub fn similarity_score(a: &[f32], b: &[f32]) -> f32 {
    cosine_similarity(a, b).clamp(0.0, 1.0)
}
