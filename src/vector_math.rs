use std::cmp::Ordering;

/// Cosine similarity between two equal-length vectors.
///
/// If either vector has zero norm the similarity is defined as 0 rather than
/// dividing by zero; a zero-norm query is "similar to nothing". Mismatched
/// lengths also score 0; the index guarantees equal dimensions, so that
/// branch is unreachable in practice.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f64::EPSILON {
        return 0.0;
    }
    (dot / denom) as f32
}

/// Ranks candidate vectors by descending cosine similarity to the query.
///
/// Returns `(candidate index, score)` pairs. The sort is stable, so equal
/// scores keep insertion order.
pub fn rank_descending_by_cosine<'a, I>(query: &[f32], candidates: I) -> Vec<(usize, f32)>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut scores: Vec<(usize, f32)> = candidates
        .into_iter()
        .enumerate()
        .map(|(idx, candidate)| (idx, cosine_similarity(query, candidate)))
        .collect();

    scores.sort_by(|left, right| right.1.partial_cmp(&left.1).unwrap_or(Ordering::Equal));
    scores
}
