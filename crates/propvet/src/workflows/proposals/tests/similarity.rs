use crate::workflows::proposals::similarity::similarity_percent;

fn corpus(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|text| text.to_string()).collect()
}

#[test]
fn empty_corpus_scores_exactly_zero() {
    assert_eq!(similarity_percent("A novel study of anything", &[]), 0.0);
}

#[test]
fn identical_text_scores_full_marks() {
    let peers = corpus(&["AI in Healthcare"]);
    assert_eq!(similarity_percent("AI in Healthcare", &peers), 100.0);
}

#[test]
fn disjoint_vocabularies_score_zero() {
    let peers = corpus(&["tomato irrigation scheduling greenhouse"]);
    assert_eq!(
        similarity_percent("quantum lattice cryptography protocols", &peers),
        0.0
    );
}

#[test]
fn partial_overlap_scores_between_bounds() {
    let peers = corpus(&["machine learning for crop yield prediction"]);
    let score = similarity_percent("deep learning for crop disease detection", &peers);
    assert!(score > 0.0, "shared terms should register, got {score}");
    assert!(score < 100.0, "distinct texts should not max out, got {score}");
}

#[test]
fn score_is_bounded_and_rounded() {
    let peers = corpus(&[
        "distributed consensus for replicated logs",
        "consensus protocols in distributed databases",
        "benchmarking log replication",
    ]);
    let score = similarity_percent("replicated log consensus benchmarking", &peers);
    assert!((0.0..=100.0).contains(&score));
    let cents = score * 100.0;
    assert!(
        (cents - cents.round()).abs() < 1e-9,
        "expected two-decimal rounding, got {score}"
    );
}

#[test]
fn reported_maximum_ignores_corpus_order() {
    let forward = corpus(&[
        "edge caching for video delivery",
        "a survey of intrusion detection",
        "video delivery over edge networks",
    ]);
    let reversed: Vec<String> = forward.iter().rev().cloned().collect();
    let text = "edge network caching for video";
    assert_eq!(
        similarity_percent(text, &forward),
        similarity_percent(text, &reversed)
    );
}

#[test]
fn maximum_wins_over_weaker_matches() {
    let peers = corpus(&[
        "unrelated marine biology fieldwork",
        "graph partitioning heuristics evaluated",
    ]);
    let near = similarity_percent("graph partitioning heuristics evaluated", &peers);
    assert_eq!(near, 100.0);
}

#[test]
fn stop_words_alone_carry_no_signal() {
    let peers = corpus(&["the of and in was were"]);
    assert_eq!(similarity_percent("the of and in was were", &peers), 0.0);
}

#[test]
fn single_character_tokens_are_ignored() {
    let peers = corpus(&["x y z"]);
    assert_eq!(similarity_percent("x y z", &peers), 0.0);
}
