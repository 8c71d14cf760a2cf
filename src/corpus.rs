//! Bag-of-words corpus adaptation
//!
//! The sampler works on a flat list of word *instances*: every `(word, count)`
//! pair of every document is expanded into `count` entries, each tagged with
//! the document that owns it.
#[cfg(feature = "serde1")]
use serde::{Deserialize, Serialize};

use std::fmt;

/// The trait implemented by word ids in a bag-of-words corpus
///
/// Ids that cannot be represented as a `usize` (e.g. negative ids) are out of
/// range.
pub trait WordDatum: Copy {
    /// The vocabulary index of the word, if it is representable
    fn word_ix(self) -> Option<usize>;

    /// The raw id, for error reporting
    fn raw_id(self) -> i128;
}

/// The trait implemented by word counts in a bag-of-words corpus
pub trait CountDatum: Copy {
    /// The number of instances, or `None` if the count is negative or not
    /// finite. Fractional counts are truncated toward zero.
    fn n_instances(self) -> Option<usize>;

    /// The raw count, for error reporting
    fn raw_count(self) -> f64;
}

macro_rules! impl_int_datum {
    ($($kind: ty),*) => {
        $(
            impl WordDatum for $kind {
                #[inline]
                fn word_ix(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }

                #[inline]
                fn raw_id(self) -> i128 {
                    self as i128
                }
            }

            impl CountDatum for $kind {
                #[inline]
                fn n_instances(self) -> Option<usize> {
                    usize::try_from(self).ok()
                }

                #[inline]
                fn raw_count(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

macro_rules! impl_float_count {
    ($($kind: ty),*) => {
        $(
            impl CountDatum for $kind {
                #[inline]
                fn n_instances(self) -> Option<usize> {
                    let x = f64::from(self);
                    // `as usize` saturates, so bound before truncating
                    if x.is_finite() && x >= 0.0 && x < usize::MAX as f64 {
                        Some(x.trunc() as usize)
                    } else {
                        None
                    }
                }

                #[inline]
                fn raw_count(self) -> f64 {
                    f64::from(self)
                }
            }
        )*
    };
}

impl_int_datum!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
impl_float_count!(f32, f64);

/// A single `(word, count)` entry of a document
///
/// Implemented for owned pairs and references to pairs so that corpora can be
/// passed by value or by reference.
pub trait BowEntry {
    type Word: WordDatum;
    type Count: CountDatum;

    fn into_entry(self) -> (Self::Word, Self::Count);
}

impl<W: WordDatum, N: CountDatum> BowEntry for (W, N) {
    type Word = W;
    type Count = N;

    #[inline]
    fn into_entry(self) -> (W, N) {
        self
    }
}

impl<'a, W: WordDatum, N: CountDatum> BowEntry for &'a (W, N) {
    type Word = W;
    type Count = N;

    #[inline]
    fn into_entry(self) -> (W, N) {
        *self
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub enum CorpusError {
    /// A word id is negative or not less than the vocabulary size
    WordIdOutOfRange {
        doc_ix: usize,
        entry_ix: usize,
        word_id: i128,
        vocab_size: usize,
    },
    /// A word count is negative, not finite, or too large to expand
    InvalidCount {
        doc_ix: usize,
        entry_ix: usize,
        count: f64,
    },
}

impl std::error::Error for CorpusError {}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WordIdOutOfRange {
                doc_ix,
                entry_ix,
                word_id,
                vocab_size,
            } => write!(
                f,
                "word id {} at entry {} of document {} is outside the \
                vocabulary [0, {})",
                word_id, entry_ix, doc_ix, vocab_size
            ),
            Self::InvalidCount {
                doc_ix,
                entry_ix,
                count,
            } => write!(
                f,
                "count {} at entry {} of document {} must be a non-negative \
                finite number that fits in a usize",
                count, entry_ix, doc_ix
            ),
        }
    }
}

/// The word instances of a corpus in corpus order
///
/// # Example
///
/// ```rust
/// # use ldagibbs::corpus::WordInstances;
/// let corpus = vec![
///     vec![(0_usize, 2_u32), (1, 1)],
///     vec![(1, 1), (2, 3)],
/// ];
///
/// let instances = WordInstances::from_bow(&corpus, 3).unwrap();
///
/// assert_eq!(instances.n(), 7);
/// assert_eq!(instances.word_ids(), &[0, 0, 1, 1, 2, 2, 2]);
/// assert_eq!(instances.doc_ids(), &[0, 0, 0, 1, 1, 1, 1]);
/// assert_eq!(instances.doc_lengths(), &[3, 4]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde1", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde1", serde(rename_all = "snake_case"))]
pub struct WordInstances {
    vocab_size: usize,
    word_ids: Vec<usize>,
    doc_ids: Vec<usize>,
    doc_lengths: Vec<usize>,
    doc_word_indices: Vec<Vec<usize>>,
}

impl WordInstances {
    /// Expand a bag-of-words corpus into word instances
    ///
    /// # Arguments
    /// - corpus: a sequence of documents, each a sequence of `(word, count)`
    ///   pairs.
    /// - vocab_size: every word id must be in `[0, vocab_size)`.
    ///
    /// Documents with no words are kept; they own no instances.
    pub fn from_bow<C, D, E>(
        corpus: C,
        vocab_size: usize,
    ) -> Result<Self, CorpusError>
    where
        C: IntoIterator<Item = D>,
        D: IntoIterator<Item = E>,
        E: BowEntry,
    {
        let mut word_ids: Vec<usize> = Vec::new();
        let mut doc_ids: Vec<usize> = Vec::new();
        let mut doc_lengths: Vec<usize> = Vec::new();
        let mut doc_word_indices: Vec<Vec<usize>> = Vec::new();

        for (doc_ix, doc) in corpus.into_iter().enumerate() {
            let mut word_indices: Vec<usize> = Vec::new();
            for (entry_ix, entry) in doc.into_iter().enumerate() {
                let (word, count) = entry.into_entry();

                let word_ix = word
                    .word_ix()
                    .filter(|&ix| ix < vocab_size)
                    .ok_or_else(|| CorpusError::WordIdOutOfRange {
                        doc_ix,
                        entry_ix,
                        word_id: word.raw_id(),
                        vocab_size,
                    })?;

                let n = count.n_instances().ok_or_else(|| {
                    CorpusError::InvalidCount {
                        doc_ix,
                        entry_ix,
                        count: count.raw_count(),
                    }
                })?;

                for _ in 0..n {
                    word_indices.push(word_ids.len());
                    word_ids.push(word_ix);
                    doc_ids.push(doc_ix);
                }
            }
            doc_lengths.push(word_indices.len());
            doc_word_indices.push(word_indices);
        }

        Ok(WordInstances {
            vocab_size,
            word_ids,
            doc_ids,
            doc_lengths,
            doc_word_indices,
        })
    }

    /// The total number of word instances, N
    #[inline]
    pub fn n(&self) -> usize {
        self.word_ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.word_ids.is_empty()
    }

    #[inline]
    pub fn num_docs(&self) -> usize {
        self.doc_lengths.len()
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// The vocabulary index of each instance
    #[inline]
    pub fn word_ids(&self) -> &[usize] {
        &self.word_ids
    }

    /// The owning document of each instance
    #[inline]
    pub fn doc_ids(&self) -> &[usize] {
        &self.doc_ids
    }

    /// The number of instances in each document
    #[inline]
    pub fn doc_lengths(&self) -> &[usize] {
        &self.doc_lengths
    }

    /// The instance indices that belong to document `doc_ix`
    #[inline]
    pub fn doc_word_indices(&self, doc_ix: usize) -> &[usize] {
        &self.doc_word_indices[doc_ix]
    }
}
