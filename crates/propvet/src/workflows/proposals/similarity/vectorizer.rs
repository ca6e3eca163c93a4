use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use super::stopwords;

/// The vocabulary keeps only this many terms, most frequent first.
pub const MAX_VOCABULARY_TERMS: usize = 5000;

/// Lowercased alphanumeric tokens of at least two characters, stop words
/// removed.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !stopwords::is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// L2-normalized tf-idf vectors for the tokenized documents, keyed by
/// vocabulary index. Documents with no in-vocabulary tokens come back empty.
///
/// Ordered maps keep every float reduction in a fixed order, so a fixed
/// input always produces bit-identical scores.
pub(crate) fn vectorize(documents: &[Vec<String>]) -> Vec<BTreeMap<usize, f64>> {
    let counts: Vec<HashMap<&str, usize>> =
        documents.iter().map(|tokens| term_counts(tokens)).collect();
    let vocabulary = build_vocabulary(&counts);

    let document_count = documents.len();
    let mut document_frequency = vec![0usize; vocabulary.len()];
    for document in &counts {
        for (term, _) in document {
            if let Some(&index) = vocabulary.get(term) {
                document_frequency[index] += 1;
            }
        }
    }

    // Smoothed idf, as if one extra document contained every term.
    let idf: Vec<f64> = document_frequency
        .iter()
        .map(|&df| ((1 + document_count) as f64 / (1 + df) as f64).ln() + 1.0)
        .collect();

    counts
        .iter()
        .map(|document| {
            let mut weights: BTreeMap<usize, f64> = document
                .iter()
                .filter_map(|(term, &count)| {
                    vocabulary
                        .get(term)
                        .map(|&index| (index, count as f64 * idf[index]))
                })
                .collect();

            let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for weight in weights.values_mut() {
                    *weight /= norm;
                }
            }
            weights
        })
        .collect()
}

/// Dot product of two vectors normalized by `vectorize`; 0.0 when either is
/// empty.
pub(crate) fn cosine(a: &BTreeMap<usize, f64>, b: &BTreeMap<usize, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(index, weight)| large.get(index).map(|other| weight * other))
        .sum()
}

fn term_counts(tokens: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Terms ranked by total frequency across the corpus, capped at
/// `MAX_VOCABULARY_TERMS`. Ties break alphabetically so the selection is
/// deterministic.
fn build_vocabulary<'a>(counts: &[HashMap<&'a str, usize>]) -> HashMap<&'a str, usize> {
    let mut totals: HashMap<&str, usize> = HashMap::new();
    for document in counts {
        for (&term, &count) in document {
            *totals.entry(term).or_insert(0) += count;
        }
    }

    let mut ranked: Vec<(&str, usize)> = totals.into_iter().collect();
    ranked.sort_by_key(|&(term, count)| (Reverse(count), term));
    ranked.truncate(MAX_VOCABULARY_TERMS);

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (term, _))| (term, index))
        .collect()
}
