//! Text embedding capability.
//!
//! Template selection only needs `embed(text) -> vector`; `HashingEmbedder`
//! provides a deterministic bag-of-words implementation so the pipeline runs
//! without a model, and a learned embedder can be swapped in behind the same
//! trait.
use super::text::content_tokens;
use crate::error::EmbedError;

pub trait Embedder: Send + Sync {
    fn dimension(&self) -> usize;
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError>;
}

/// Feature-hashed term counts, L2-normalised.
#[derive(Clone, Debug)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

/// 32-bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for &b in bytes {
        hash ^= b as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

impl Embedder for HashingEmbedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        let tokens = content_tokens(text);
        if tokens.is_empty() {
            return Err(EmbedError::EmptyText);
        }
        let mut v = vec![0.0f32; self.dimension];
        for t in &tokens {
            v[fnv1a(t.as_bytes()) as usize % self.dimension] += 1.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        for x in &mut v {
            *x /= norm;
        }
        Ok(v)
    }
}

/// Cosine similarity; 0 when either vector is zero or the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na <= 0.0 || nb <= 0.0 {
        0.0
    } else {
        (dot / (na * nb)).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_is_deterministic_and_normalised() {
        let e = HashingEmbedder::default();
        let a = e.embed("steel frame with metallic finish").expect("embed");
        let b = e.embed("steel frame with metallic finish").expect("embed");
        assert_eq!(a, b);
        assert_eq!(a.len(), 256);
        let norm: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn shared_words_raise_similarity() {
        let e = HashingEmbedder::default();
        let topic = e.embed("beam girder horizontal member").expect("embed");
        let close = e.embed("horizontal beam").expect("embed");
        let far = e.embed("glass facade").expect("embed");
        assert!(cosine_similarity(&topic, &close) > cosine_similarity(&topic, &far));
        assert!(cosine_similarity(&topic, &close) > 0.5);
    }

    #[test]
    fn stopword_only_text_is_rejected() {
        let e = HashingEmbedder::default();
        assert!(matches!(e.embed("the of and"), Err(EmbedError::EmptyText)));
    }

    #[test]
    fn cosine_handles_degenerate_input() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
    }
}
