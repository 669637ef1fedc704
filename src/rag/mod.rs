//! Document retrieval: the in-memory chunk index and the built-in sample
//! corpus used to seed it.

mod index;
mod seed;

pub use index::{DocumentChunk, DocumentIndex, IndexConfig, SimilarityResult};
pub use seed::seed_sample_documents;
