//! Deterministic hash-based feature vectors.
//!
//! Text is mapped to a fixed-length vector by hashing its UTF-8 bytes with
//! SHA-256 and cycling the digest bytes across all slots, each normalized to
//! `[0, 1]`. The mapping is reproducible and uniformly spread but carries no
//! semantic meaning: texts differing by a single byte produce uncorrelated
//! vectors. That trade (retrieval quality for zero external dependency and
//! constant-time, network-free operation) is part of the contract; do not
//! swap in a real embedding model here without changing the search tests.

use sha2::{Digest, Sha256};

/// Process-wide vector dimension. Every vector in the system has exactly
/// this length; mixing dimensions is impossible because vectors are only
/// produced by [`feature_vector`].
pub const EMBEDDING_DIM: usize = 1536;

/// Maps text to its feature vector. Pure, deterministic, never fails.
pub fn feature_vector(text: &str) -> Vec<f32> {
    let digest = Sha256::digest(text.as_bytes());
    let mut vector = Vec::with_capacity(EMBEDDING_DIM);
    for i in 0..EMBEDDING_DIM {
        let byte = digest[i % digest.len()];
        vector.push(f32::from(byte) / 255.0);
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vectors_are_deterministic() {
        let first = feature_vector("the quick brown fox");
        let second = feature_vector("the quick brown fox");
        assert_eq!(first, second);
    }

    #[test]
    fn dimension_is_fixed_regardless_of_input_length() {
        assert_eq!(feature_vector("").len(), EMBEDDING_DIM);
        assert_eq!(feature_vector("a").len(), EMBEDDING_DIM);
        assert_eq!(feature_vector(&"long ".repeat(10_000)).len(), EMBEDDING_DIM);
    }

    #[test]
    fn components_are_normalized() {
        let vector = feature_vector("normalization check");
        assert!(vector.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn near_duplicate_texts_produce_different_vectors() {
        let a = feature_vector("power in physics");
        let b = feature_vector("power in physics.");
        assert_ne!(a, b);
    }
}
