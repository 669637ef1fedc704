//! In-memory document index with overlapping character-window chunking and
//! top-k cosine similarity search.

use uuid::Uuid;

use crate::embedding::feature_vector;
use crate::vector_math::rank_descending_by_cosine;

/// Chunking configuration. `chunk_overlap` must stay below `chunk_size`;
/// [`crate::core::config::AppConfig`] validates that at the boundary.
#[derive(Debug, Clone, Copy)]
pub struct IndexConfig {
    /// Window length in characters.
    pub chunk_size: usize,
    /// Back-step in characters between consecutive windows.
    pub chunk_overlap: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// A contiguous window of a source document, the unit of retrieval.
/// Immutable after creation; owned exclusively by the index.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub text: String,
    pub source_filename: String,
    pub source_label: String,
    feature_vector: Vec<f32>,
}

/// One search hit: a chunk reference and its cosine score in `[-1, 1]`.
/// Ephemeral, produced per search call.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityResult<'a> {
    pub chunk: &'a DocumentChunk,
    pub score: f32,
}

/// Read-mostly store of chunked documents and their feature vectors.
///
/// Populated before serving starts; concurrent searches share it read-only.
pub struct DocumentIndex {
    config: IndexConfig,
    chunks: Vec<DocumentChunk>,
}

impl DocumentIndex {
    pub fn new(config: IndexConfig) -> Self {
        Self {
            config,
            chunks: Vec::new(),
        }
    }

    /// Splits `text` into overlapping windows, vectorizes each and appends
    /// them to the index. Empty text yields zero chunks, not an error.
    /// Returns the number of chunks added.
    pub fn add_document(&mut self, text: &str, filename: &str, source_label: &str) -> usize {
        let windows = split_into_chunks(text, self.config.chunk_size, self.config.chunk_overlap);
        let added = windows.len();

        for window in windows {
            let vector = feature_vector(&window);
            self.chunks.push(DocumentChunk {
                id: Uuid::new_v4(),
                text: window,
                source_filename: filename.to_string(),
                source_label: source_label.to_string(),
                feature_vector: vector,
            });
        }

        added
    }

    /// Top-k chunks by descending cosine similarity to `query_vector`.
    ///
    /// Ties break by insertion order (earlier-inserted wins). Returns fewer
    /// than `k` results when the index holds fewer chunks, and an empty
    /// sequence for an empty index.
    pub fn search(&self, query_vector: &[f32], k: usize) -> Vec<SimilarityResult<'_>> {
        if self.chunks.is_empty() || k == 0 {
            return Vec::new();
        }

        let vectors = self.chunks.iter().map(|chunk| chunk.feature_vector.as_slice());
        rank_descending_by_cosine(query_vector, vectors)
            .into_iter()
            .take(k)
            .map(|(idx, score)| SimilarityResult {
                chunk: &self.chunks[idx],
                score,
            })
            .collect()
    }

    pub fn document_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Distinct source filenames in insertion order.
    pub fn known_titles(&self) -> Vec<String> {
        let mut titles: Vec<String> = Vec::new();
        for chunk in &self.chunks {
            if !titles.iter().any(|t| t == &chunk.source_filename) {
                titles.push(chunk.source_filename.clone());
            }
        }
        titles
    }
}

/// Overlapping character windows: each chunk spans
/// `[start, start + chunk_size)`, the next start advances by
/// `chunk_size - overlap`, and the loop stops once start reaches the end.
/// Indexing is by character, so multi-byte text never splits a code point.
fn split_into_chunks(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let step = chunk_size.saturating_sub(overlap).max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < total {
        let end = (start + chunk_size).min(total);
        chunks.push(chars[start..end].iter().collect());
        start += step;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_zero_chunks() {
        assert!(split_into_chunks("", 1000, 200).is_empty());

        let mut index = DocumentIndex::new(IndexConfig::default());
        assert_eq!(index.add_document("", "empty.txt", "test"), 0);
        assert!(index.is_empty());
    }

    #[test]
    fn short_text_yields_a_single_chunk() {
        let chunks = split_into_chunks("short document", 1000, 200);
        assert_eq!(chunks, vec!["short document".to_string()]);
    }

    #[test]
    fn chunk_count_follows_the_window_step() {
        // 2000 chars, window 1000, back-step 200: starts at 0, 800, 1600.
        let text = "x".repeat(2000);
        let chunks = split_into_chunks(&text, 1000, 200);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[2].chars().count(), 400);
    }

    #[test]
    fn chunks_cover_the_text_with_no_gap() {
        let text: String = ('a'..='z').cycle().take(2500).collect();
        let chars: Vec<char> = text.chars().collect();
        let (chunk_size, overlap) = (1000, 200);
        let step = chunk_size - overlap;
        let chunks = split_into_chunks(&text, chunk_size, overlap);

        // Chunk i is exactly the window starting at i * step; consecutive
        // starts differ by less than the window length, so there is no gap,
        // and the final window reaches the end of the text.
        for (i, chunk) in chunks.iter().enumerate() {
            let start = i * step;
            let end = (start + chunk_size).min(chars.len());
            let expected: String = chars[start..end].iter().collect();
            assert_eq!(chunk, &expected);
        }
        assert!((chunks.len() - 1) * step + chunk_size >= chars.len());
        assert!(chunks.len() * step >= chars.len());
    }

    #[test]
    fn multibyte_text_chunks_on_char_boundaries() {
        let text = "日本語テキスト".repeat(300);
        let chars: Vec<char> = text.chars().collect();
        let chunks = split_into_chunks(&text, 1000, 200);
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            let start = i * 800;
            let end = (start + 1000).min(chars.len());
            let expected: String = chars[start..end].iter().collect();
            assert_eq!(chunk, &expected);
        }
    }

    #[test]
    fn search_returns_at_most_min_k_and_index_size() {
        let mut index = DocumentIndex::new(IndexConfig::default());
        index.add_document("gravity pulls objects toward earth", "g.txt", "sample");
        index.add_document("machine learning finds patterns", "ml.txt", "sample");

        let query = feature_vector("gravity");
        assert_eq!(index.search(&query, 10).len(), 2);
        assert_eq!(index.search(&query, 1).len(), 1);
        assert!(index.search(&query, 0).is_empty());
    }

    #[test]
    fn search_results_are_sorted_descending() {
        let mut index = DocumentIndex::new(IndexConfig::default());
        for text in ["alpha", "beta", "gamma", "delta"] {
            index.add_document(text, &format!("{text}.txt"), "sample");
        }

        let results = index.search(&feature_vector("beta"), 4);
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        // Hash vectors are deterministic: the exact-text match ranks first.
        assert_eq!(results[0].chunk.source_filename, "beta.txt");
        assert!((results[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn empty_index_search_is_empty_not_an_error() {
        let index = DocumentIndex::new(IndexConfig::default());
        assert!(index.search(&feature_vector("anything"), 3).is_empty());
    }

    #[test]
    fn known_titles_dedup_in_insertion_order() {
        let mut index = DocumentIndex::new(IndexConfig::default());
        index.add_document(&"a".repeat(1500), "first.txt", "sample");
        index.add_document("b", "second.txt", "sample");

        assert_eq!(index.known_titles(), vec!["first.txt", "second.txt"]);
    }
}
