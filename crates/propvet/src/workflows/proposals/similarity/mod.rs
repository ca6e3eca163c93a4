//! TF-IDF cosine similarity over proposal comparison texts.
//!
//! The corpus is re-vectorized on every call; nothing is cached between
//! scoring runs, so a score is always a snapshot of the corpus it was
//! computed against.

mod stopwords;
mod vectorizer;

pub use vectorizer::MAX_VOCABULARY_TERMS;

/// Highest pairwise similarity between `new_text` and any corpus member,
/// as a percentage in [0.0, 100.0] rounded to two decimals.
///
/// An empty corpus scores exactly 0.0: nothing to compare against is not an
/// error. The result is independent of corpus ordering.
pub fn similarity_percent(new_text: &str, corpus: &[String]) -> f64 {
    if corpus.is_empty() {
        return 0.0;
    }

    let mut documents: Vec<Vec<String>> = corpus
        .iter()
        .map(|text| vectorizer::tokenize(text))
        .collect();
    documents.push(vectorizer::tokenize(new_text));

    let vectors = vectorizer::vectorize(&documents);
    let Some((candidate, peers)) = vectors.split_last() else {
        return 0.0;
    };

    let best = peers
        .iter()
        .map(|peer| vectorizer::cosine(candidate, peer))
        .fold(0.0_f64, f64::max);

    round_percent(best * 100.0)
}

fn round_percent(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
