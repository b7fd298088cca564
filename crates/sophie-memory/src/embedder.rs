// SPDX-FileCopyrightText: 2026 Sophie Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local feature-hashing embedder.
//!
//! Produces fixed-length, L2-normalized vectors from word and bigram
//! features with no model download and no network access. Hashes come from
//! SHA-256, so a stored vector means the same thing after a rebuild.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use sophie_core::error::SophieError;
use sophie_core::traits::{EmbeddingAdapter, PluginAdapter};
use sophie_core::types::{AdapterType, EmbeddingInput, EmbeddingOutput, HealthStatus};

/// Weight of a bigram feature relative to a unigram.
const BIGRAM_WEIGHT: f32 = 0.5;

/// Signed feature-hashing embedder.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    /// Embed a single text.
    ///
    /// Every input, including empty and punctuation-only text, yields a
    /// non-zero vector, so a stored text is always its own nearest neighbour.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let tokens = tokenize(text);
        let mut embedding = vec![0.0_f32; self.dimensions];

        if tokens.is_empty() {
            let raw = format!("raw:{}", text.trim());
            self.add_feature(&mut embedding, &raw, 1.0);
            return l2_normalize(embedding);
        }

        let mut counts: BTreeMap<&str, f32> = BTreeMap::new();
        for token in &tokens {
            *counts.entry(token.as_str()).or_insert(0.0) += 1.0;
        }

        let doc_len = tokens.len() as f32;
        for (token, count) in counts {
            let tf = (1.0 + count / doc_len).ln();
            // Longer tokens are rarer; a cheap stand-in for document frequency.
            let idf = 1.0 + token.chars().count() as f32 * 0.1;
            self.add_feature(&mut embedding, token, tf * idf);
        }

        for pair in tokens.windows(2) {
            let bigram = format!("{}_{}", pair[0], pair[1]);
            self.add_feature(&mut embedding, &bigram, BIGRAM_WEIGHT);
        }

        l2_normalize(embedding)
    }

    fn add_feature(&self, embedding: &mut [f32], feature: &str, weight: f32) {
        let digest = Sha256::digest(feature.as_bytes());
        let mut bucket = [0u8; 8];
        bucket.copy_from_slice(&digest[..8]);
        let index = (u64::from_le_bytes(bucket) % self.dimensions as u64) as usize;
        let sign = if digest[8] & 1 == 0 { 1.0 } else { -1.0 };
        embedding[index] += sign * weight;
    }
}

/// Lowercase alphanumeric words longer than one character, falling back to
/// single characters when that leaves nothing.
fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    let long: Vec<String> = words
        .iter()
        .filter(|w| w.chars().count() > 1)
        .map(|w| w.to_string())
        .collect();
    if long.is_empty() {
        words.into_iter().map(String::from).collect()
    } else {
        long
    }
}

fn l2_normalize(mut vec: Vec<f32>) -> Vec<f32> {
    let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in &mut vec {
            *v /= norm;
        }
    }
    vec
}

#[async_trait]
impl PluginAdapter for HashEmbedder {
    fn name(&self) -> &str {
        "hash-embedder"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Embedding
    }

    async fn health_check(&self) -> Result<HealthStatus, SophieError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), SophieError> {
        Ok(())
    }
}

#[async_trait]
impl EmbeddingAdapter for HashEmbedder {
    fn dimensions(&self) -> Option<usize> {
        Some(self.dimensions)
    }

    async fn embed(&self, input: EmbeddingInput) -> Result<EmbeddingOutput, SophieError> {
        Ok(EmbeddingOutput {
            embeddings: input.texts.iter().map(|t| self.embed_text(t)).collect(),
            dimensions: self.dimensions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::cosine_similarity;
    use proptest::prelude::*;

    #[test]
    fn same_text_same_vector() {
        let embedder = HashEmbedder::new(384);
        assert_eq!(
            embedder.embed_text("my cat is called Tom"),
            embedder.embed_text("my cat is called Tom")
        );
    }

    #[test]
    fn case_and_punctuation_do_not_matter() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed_text("My cat is called Tom.");
        let b = embedder.embed_text("my cat, is called tom");
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn shared_words_score_higher_than_unrelated() {
        let embedder = HashEmbedder::new(1024);
        let stored = embedder.embed_text("my sister lives in Manchester");
        let related = embedder.embed_text("where does my sister live");
        let unrelated = embedder.embed_text("quantum chromodynamics lecture");
        assert!(cosine_similarity(&stored, &related) > cosine_similarity(&stored, &unrelated));
    }

    #[test]
    fn short_and_symbolic_inputs_are_not_zero() {
        let embedder = HashEmbedder::new(64);
        for text in ["a", "?!", "", "   "] {
            let v = embedder.embed_text(text);
            let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5, "`{text}` embedded to norm {norm}");
        }
    }

    #[tokio::test]
    async fn adapter_reports_dimensions() {
        let embedder = HashEmbedder::new(128);
        let out = embedder
            .embed(EmbeddingInput {
                texts: vec!["one".into(), "two".into()],
            })
            .await
            .unwrap();
        assert_eq!(out.dimensions, 128);
        assert_eq!(out.embeddings.len(), 2);
        assert!(out.embeddings.iter().all(|e| e.len() == 128));
        assert_eq!(embedder.dimensions(), Some(128));
    }

    proptest! {
        #[test]
        fn every_text_is_its_own_best_match(text in "\\PC{0,60}") {
            let embedder = HashEmbedder::new(256);
            let v = embedder.embed_text(&text);
            prop_assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-4);
        }
    }
}
