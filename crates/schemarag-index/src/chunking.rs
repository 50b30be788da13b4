//! Token-aware document chunking.
//!
//! Token counts are estimated as `ceil(chars / 4)` — a fixed, cheap
//! heuristic, not a real tokenizer. Documents under the chunking threshold
//! pass through as a single chunk; larger ones are split into overlapping
//! word-aligned chunks.

/// Chunking kicks in above this estimated token count.
pub const CHUNK_THRESHOLD_TOKENS: usize = 1500;
/// Default per-chunk token budget.
pub const DEFAULT_MAX_TOKENS: usize = 800;
/// Default overlap token budget between adjacent chunks.
pub const DEFAULT_OVERLAP_TOKENS: usize = 120;
/// Overlap never drops below this many words.
pub const MIN_OVERLAP_WORDS: usize = 5;

/// Estimated token count: `ceil(len / 4)`.
pub fn estimate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// One chunk of a parent document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChunk {
    pub chunk_index: usize,
    pub chunks_total: usize,
    pub text: String,
}

/// Greedy word-accumulating chunker with backward overlap.
#[derive(Debug, Clone)]
pub struct TokenChunker {
    pub max_tokens: usize,
    pub overlap_tokens: usize,
    pub chunk_threshold: usize,
}

impl Default for TokenChunker {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            overlap_tokens: DEFAULT_OVERLAP_TOKENS,
            chunk_threshold: CHUNK_THRESHOLD_TOKENS,
        }
    }
}

impl TokenChunker {
    pub fn new(max_tokens: usize, overlap_tokens: usize) -> Self {
        Self {
            max_tokens,
            overlap_tokens,
            ..Self::default()
        }
    }

    /// Chunk a document. Below the threshold the text passes through
    /// unchanged as a single chunk.
    pub fn chunk_document(&self, text: &str) -> Vec<DocumentChunk> {
        let pieces = if estimate_tokens(text) > self.chunk_threshold {
            self.split_words(text)
        } else {
            vec![text.to_string()]
        };

        let total = pieces.len();
        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, text)| DocumentChunk {
                chunk_index,
                chunks_total: total,
                text,
            })
            .collect()
    }

    /// Split normalized text into overlapping word-aligned chunks. Always
    /// makes forward progress: an oversized single word still closes a
    /// chunk, and the next start is strictly past the previous one.
    fn split_words(&self, text: &str) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < words.len() {
            let mut end = start;
            let mut token_count = 0usize;

            while end < words.len() {
                let projected = token_count + estimate_tokens(words[end]);
                if projected > self.max_tokens {
                    break;
                }
                token_count = projected;
                end += 1;
            }

            // A single word over budget still gets a chunk of its own.
            if end == start {
                end = start + 1;
            }
            chunks.push(words[start..end].join(" "));

            let overlap = self.overlap_words(&words, end);
            start = std::cmp::max(end.saturating_sub(overlap), start + 1);
        }

        chunks
    }

    /// Walk backward from `end` accumulating words until the overlap token
    /// budget is met, with a floor of `MIN_OVERLAP_WORDS`.
    fn overlap_words(&self, words: &[&str], end: usize) -> usize {
        let mut token_count = 0usize;
        let mut count = 0usize;

        for word in words[..end].iter().rev() {
            token_count += estimate_tokens(word);
            if token_count >= self.overlap_tokens {
                break;
            }
            count += 1;
        }

        count.max(MIN_OVERLAP_WORDS)
    }
}
