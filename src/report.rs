//! Human-readable summaries of topic-word distributions
use crate::matrix::Matrix;
use itertools::Itertools;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Lookup from vocabulary index to token
pub trait IdToToken {
    fn token(&self, id: usize) -> Option<&str>;
}

impl<S: AsRef<str>> IdToToken for HashMap<usize, S> {
    fn token(&self, id: usize) -> Option<&str> {
        self.get(&id).map(AsRef::as_ref)
    }
}

impl<S: AsRef<str>> IdToToken for BTreeMap<usize, S> {
    fn token(&self, id: usize) -> Option<&str> {
        self.get(&id).map(AsRef::as_ref)
    }
}

impl<S: AsRef<str>> IdToToken for [S] {
    fn token(&self, id: usize) -> Option<&str> {
        self.get(id).map(AsRef::as_ref)
    }
}

impl<S: AsRef<str>> IdToToken for Vec<S> {
    fn token(&self, id: usize) -> Option<&str> {
        self.as_slice().token(id)
    }
}

/// One line per topic listing its highest-weighted tokens as
/// `token(percent)`, in descending order of weight.
///
/// Tokens ranked `1..top_n` are listed: the single highest-weighted token of
/// each topic is left out. Ties are ranked by vocabulary index. Ids missing
/// from `id2token` are shown as `#<id>`.
///
/// # Example
///
/// ```rust
/// # use ldagibbs::matrix::Matrix;
/// # use ldagibbs::report::topic_summaries;
/// let beta = Matrix::from_row_major(2, 4, vec![
///     0.1, 0.2, 0.3, 0.4,
///     0.7, 0.1, 0.15, 0.05,
/// ]).unwrap();
/// let id2token = vec!["graph", "trees", "user", "system"];
///
/// let lines = topic_summaries(&beta, &id2token, 3);
/// assert_eq!(lines[0], "user(30.00), trees(20.00)");
/// assert_eq!(lines[1], "user(15.00), trees(10.00)");
/// ```
pub fn topic_summaries<M>(beta: &Matrix, id2token: &M, top_n: usize) -> Vec<String>
where
    M: IdToToken + ?Sized,
{
    (0..beta.n_rows())
        .map(|k| {
            let row = beta.row(k);
            (0..row.len())
                .sorted_by(|&a, &b| {
                    row[b].partial_cmp(&row[a]).unwrap_or(Ordering::Equal)
                })
                .skip(1)
                .take(top_n.saturating_sub(1))
                .map(|ix| {
                    let weight = row[ix] * 100.0;
                    match id2token.token(ix) {
                        Some(token) => format!("{}({:.2})", token, weight),
                        None => format!("#{}({:.2})", ix, weight),
                    }
                })
                .join(", ")
        })
        .collect()
}

/// Print [`topic_summaries`] to stdout, one topic per line
pub fn print_topics<M>(beta: &Matrix, id2token: &M, top_n: usize)
where
    M: IdToToken + ?Sized,
{
    topic_summaries(beta, id2token, top_n)
        .iter()
        .for_each(|line| println!("{}", line));
}
