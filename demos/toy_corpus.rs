//! Fit two topics to a handful of paper titles and print them
use ldagibbs::prelude::*;
use std::collections::{BTreeMap, HashMap};

const DOCUMENTS: [&str; 10] = [
    "Human machine interface for lab abc computer applications",
    "A survey of user opinion of computer system response time",
    "The EPS user interface management system",
    "System and human system engineering testing of EPS",
    "Relation of user perceived response time to error measurement",
    "The generation of random binary unordered trees",
    "The intersection graph of paths in trees",
    "Graph minors IV Widths of trees and well quasi ordering",
    "Graph minors A survey",
    "a and",
];

const STOP_WORDS: [&str; 7] = ["for", "a", "of", "the", "and", "to", "in"];

fn main() {
    let texts: Vec<Vec<String>> = DOCUMENTS
        .iter()
        .map(|doc| {
            doc.to_lowercase()
                .split_whitespace()
                .filter(|word| !STOP_WORDS.contains(word))
                .map(String::from)
                .collect()
        })
        .collect();

    // drop words that appear only once in the whole corpus
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    texts
        .iter()
        .flatten()
        .for_each(|word| *frequency.entry(word.as_str()).or_insert(0) += 1);

    let mut token2id: BTreeMap<&str, usize> = BTreeMap::new();
    let corpus: Vec<Vec<(usize, usize)>> = texts
        .iter()
        .map(|text| {
            let mut bow: BTreeMap<usize, usize> = BTreeMap::new();
            text.iter()
                .filter(|word| frequency[word.as_str()] > 1)
                .for_each(|word| {
                    let next_id = token2id.len();
                    let id = *token2id.entry(word.as_str()).or_insert(next_id);
                    *bow.entry(id).or_insert(0) += 1;
                });
            bow.into_iter().collect()
        })
        .collect();

    let id2token: BTreeMap<usize, &str> =
        token2id.iter().map(|(&token, &id)| (id, token)).collect();

    let config = GibbsLdaConfig::new(2, id2token.len(), 1.0, 1.0, 1000, 999)
        .with_store_beta(true)
        .with_store_theta(true)
        .with_store_z(true);

    let mut lda = match GibbsLda::new(&corpus, config) {
        Ok(lda) => lda,
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    };

    lda.fit();
    println!("Documents: {}", lda.num_docs());
    println!("Corpus words: {}", lda.num_words());
    println!("{}", "-".repeat(80));
    print_topics(&lda.samples().beta()[0], &id2token, 20);
}
