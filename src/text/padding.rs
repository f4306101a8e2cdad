//! Fixed-length padding and truncation of token-id sequences.
//!
//! Mirrors Keras `pad_sequences`: every sequence becomes exactly `maxlen`
//! ids, shorter ones filled with the padding id, longer ones cut. Which side
//! gets filled or cut is a property of how the model was trained, so both
//! sides are configuration.

use serde::{Deserialize, Serialize};

/// Padding id reserved by every vocabulary.
pub const PAD_ID: u32 = 0;

/// Sequence length the bundled emotion model was trained with.
pub const DEFAULT_MAXLEN: usize = 40;

/// Which end of a sequence padding is added to, or truncation removes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Pre,
    Post,
}

/// Padding and truncation settings shared by every model call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddingConfig {
    pub maxlen: usize,
    pub padding: Side,
    pub truncating: Side,
}

impl Default for PaddingConfig {
    fn default() -> Self {
        Self {
            maxlen: DEFAULT_MAXLEN,
            padding: Side::Pre,
            truncating: Side::Pre,
        }
    }
}

impl PaddingConfig {
    pub fn with_maxlen(maxlen: usize) -> Self {
        Self {
            maxlen,
            ..Self::default()
        }
    }

    /// Pad or truncate one sequence to exactly `maxlen` ids.
    pub fn pad(&self, ids: &[u32]) -> Vec<u32> {
        let maxlen = self.maxlen;
        let kept: &[u32] = if ids.len() > maxlen {
            match self.truncating {
                Side::Pre => &ids[ids.len() - maxlen..],
                Side::Post => &ids[..maxlen],
            }
        } else {
            ids
        };

        let fill = maxlen - kept.len();
        let mut out = Vec::with_capacity(maxlen);
        match self.padding {
            Side::Pre => {
                out.extend(std::iter::repeat(PAD_ID).take(fill));
                out.extend_from_slice(kept);
            }
            Side::Post => {
                out.extend_from_slice(kept);
                out.extend(std::iter::repeat(PAD_ID).take(fill));
            }
        }
        out
    }

    /// Pad every sequence into one row-major batch.
    pub fn pad_batch<S: AsRef<[u32]>>(&self, sequences: &[S]) -> PaddedBatch {
        let mut ids = Vec::with_capacity(sequences.len() * self.maxlen);
        for seq in sequences {
            ids.extend(self.pad(seq.as_ref()));
        }
        PaddedBatch {
            rows: sequences.len(),
            maxlen: self.maxlen,
            ids,
        }
    }
}

/// A `rows × maxlen` matrix of token ids, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedBatch {
    rows: usize,
    maxlen: usize,
    ids: Vec<u32>,
}

impl PaddedBatch {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn maxlen(&self) -> usize {
        self.maxlen
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Ids of row `index`.
    pub fn row(&self, index: usize) -> &[u32] {
        let start = index * self.maxlen;
        &self.ids[start..start + self.maxlen]
    }

    /// Flat id buffer, as handed to the tensor constructor.
    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }
}
