//! Built-in sample corpus loaded at startup so a fresh process can answer
//! knowledge queries before any documents are ingested.

use super::DocumentIndex;

const SAMPLE_SOURCE: &str = "sample_document";

const SAMPLE_DOCS: &[(&str, &str)] = &[
    (
        "AI_Introduction.txt",
        "Artificial Intelligence (AI) is a branch of computer science that aims to create \
         intelligent machines that work and react like humans. AI encompasses machine learning, \
         natural language processing, computer vision, and robotics.",
    ),
    (
        "Machine_Learning.txt",
        "Machine Learning is a subset of AI that enables computers to learn and improve from \
         experience without being explicitly programmed. It uses algorithms to identify patterns \
         in data and make predictions or decisions.",
    ),
    (
        "NLP_Overview.txt",
        "Natural Language Processing (NLP) is a field of AI that focuses on the interaction \
         between computers and human language. It enables machines to understand, interpret, and \
         generate human language in a meaningful way.",
    ),
    (
        "Gravity_Explanation.txt",
        "Gravity is a fundamental force of nature that attracts objects with mass toward each \
         other. On Earth, gravity pulls everything toward the center of the planet, which is why \
         objects fall when dropped.",
    ),
    (
        "Power_Physics.txt",
        "Power in physics refers to the rate at which work is done or energy is transferred. It \
         is measured in watts (W) and represents how quickly energy is used or produced. Power \
         can be calculated as work divided by time or force times velocity.",
    ),
    (
        "Electrical_Power.txt",
        "Electrical power is the rate at which electrical energy is transferred by an electric \
         circuit. It is calculated as voltage times current (P = V \u{d7} I) and is measured in \
         watts. Higher power means more energy is being used per unit time.",
    ),
    (
        "Computing_Power.txt",
        "Computing power refers to the ability of a computer system to process data and perform \
         calculations. It is often measured in terms of processing speed, memory capacity, and \
         the ability to handle complex algorithms and large datasets.",
    ),
];

/// Populates the index with the sample documents. Returns the chunk count.
pub fn seed_sample_documents(index: &mut DocumentIndex) -> usize {
    let mut added = 0;
    for (filename, content) in SAMPLE_DOCS {
        added += index.add_document(content, filename, SAMPLE_SOURCE);
    }
    tracing::info!("Seeded sample corpus: {} chunks", added);
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::IndexConfig;

    #[test]
    fn seeding_adds_one_chunk_per_sample_document() {
        let mut index = DocumentIndex::new(IndexConfig::default());
        let added = seed_sample_documents(&mut index);

        // Every sample document is shorter than one chunk window.
        assert_eq!(added, SAMPLE_DOCS.len());
        assert_eq!(index.document_count(), SAMPLE_DOCS.len());
        assert_eq!(index.known_titles().len(), SAMPLE_DOCS.len());
    }
}
