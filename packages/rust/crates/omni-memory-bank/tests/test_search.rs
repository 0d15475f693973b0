use omni_memory_bank::{
    DocumentCorpus, MAX_RESULTS, SCORE_THRESHOLD, extract_snippet, query_terms, score, search,
};

fn corpus(entries: &[(&str, &str)]) -> DocumentCorpus {
    entries
        .iter()
        .map(|(name, body)| ((*name).to_string(), (*body).to_string()))
        .collect()
}

#[test]
fn test_unrelated_corpus_returns_no_hits() {
    let docs = corpus(&[("projectbrief", "# Brief\n\nUnrelated filler text.")]);
    assert!(search("kubernetes operator reconciliation", &docs).is_empty());
}

#[test]
fn test_exact_phrase_scores_one() {
    let docs = corpus(&[("techContext", "## Stack\n\nWe use PostgreSQL for storage.")]);
    let hits = search("PostgreSQL for storage", &docs);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].document_name, "techContext");
    assert!((hits[0].relevance_score - 1.0).abs() < f64::EPSILON);
    assert!(hits[0].snippet.contains("PostgreSQL for storage"));
    assert_eq!(hits[0].snippet, "**Stack**: We use PostgreSQL for storage.");
}

#[test]
fn test_verbatim_containment_always_scores_one() {
    let cases = [
        ("release train", "The Release Train leaves every Friday."),
        ("a b", "Plan a b test."),
        ("Caching", "caching"),
    ];
    for (query, paragraph) in cases {
        let value = score(query, &query_terms(query), paragraph);
        assert!((value - 1.0).abs() < f64::EPSILON, "{query} in {paragraph}");
    }
}

#[test]
fn test_absent_terms_score_zero() {
    let query = "graphql federation gateway";
    let value = score(query, &query_terms(query), "We expose a REST API behind nginx.");
    assert!(value.abs() < f64::EPSILON);
}

#[test]
fn test_results_are_capped_and_sorted() {
    let mut entries: Vec<(String, String)> = Vec::new();
    for index in 0..4 {
        entries.push((
            format!("doc{index}"),
            format!(
                "## Part {index}\n\nThe deploy pipeline runs nightly.\n\nOnly the pipeline here.\n\nDeploy pipeline nightly builds."
            ),
        ));
    }
    let docs: DocumentCorpus = entries.into_iter().collect();
    let hits = search("deploy pipeline nightly", &docs);

    assert_eq!(hits.len(), MAX_RESULTS);
    assert!(
        hits.windows(2)
            .all(|pair| pair[0].relevance_score >= pair[1].relevance_score)
    );
    assert!(hits.iter().all(|hit| hit.relevance_score > SCORE_THRESHOLD));
    assert!(hits.iter().all(|hit| hit.relevance_score <= 1.0));
}

#[test]
fn test_ties_keep_encounter_order() {
    let docs = corpus(&[
        ("activeContext", "## Focus\n\nMigrating billing service to queues."),
        ("progress", "## Done\n\nBilling service migrated to queues."),
    ]);
    let hits = search("billing queues", &docs);

    assert_eq!(hits.len(), 2);
    assert!((hits[0].relevance_score - hits[1].relevance_score).abs() < f64::EPSILON);
    assert_eq!(hits[0].document_name, "activeContext");
    assert_eq!(hits[1].document_name, "progress");
}

#[test]
fn test_exact_match_outranks_partial() {
    let docs = corpus(&[
        ("activeContext", "## Notes\n\nThe cache layer and the queue."),
        ("techContext", "## Stack\n\nRedis cache layer for sessions."),
    ]);
    let hits = search("Redis cache layer", &docs);

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].document_name, "techContext");
    assert!((hits[0].relevance_score - 1.0).abs() < f64::EPSILON);
    assert!(hits[1].relevance_score < 1.0);
}

#[test]
fn test_single_partial_term_is_below_threshold() {
    let docs = corpus(&[("progress", "## Done\n\nKafka consumers are live.")]);
    assert!(search("kafka schema registry migration", &docs).is_empty());
}

#[test]
fn test_snippet_never_splits_words() {
    let paragraph = "Our architecture relies on event sourcing for every aggregate. \
        Commands are validated, converted into domain events and appended to the store. \
        Projections subscribe to the event stream and maintain denormalized read models \
        that power the dashboards, the reporting exports, and the notification service. \
        Snapshots are taken every hundred events to keep rehydration cheap.";
    let terms = query_terms("projections dashboards notification");
    let snippet = extract_snippet(paragraph, &terms, "");

    let inner = snippet.trim_start_matches("...").trim_end_matches("...");
    assert!(!inner.is_empty());
    let Some(offset) = paragraph.find(inner) else {
        panic!("snippet body must be a slice of the paragraph: {snippet}");
    };
    let before = paragraph[..offset].chars().last();
    let after = paragraph[offset + inner.len()..].chars().next();
    assert!(before.is_none_or(|ch| ch == ' ' || ch == '\n'));
    assert!(after.is_none_or(|ch| ch == ' ' || ch == '\n'));
    assert!(snippet.starts_with("..."));
    assert!(snippet.contains("dashboards"));
    assert!(snippet.contains("notification"));
}

#[test]
fn test_repeated_query_words_weigh_on_the_ratio() {
    let docs = corpus(&[("techContext", "## Stack\n\nThe cache is warm.")]);
    let query = "cache cache layer";

    let value = score(query, &query_terms(query), "The cache is warm.");
    assert!((value - 0.8 / 3.0).abs() < 1e-9);
    assert!(value <= SCORE_THRESHOLD);
    assert!(search(query, &docs).is_empty());
}

#[test]
fn test_text_before_first_heading_keeps_its_first_line_as_label() {
    let docs = corpus(&[(
        "projectbrief",
        "# Brief\n\nThe billing service owns invoices.\n\n## Goals\n\nShip.",
    )]);
    let hits = search("billing service", &docs);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].snippet, "**# Brief**: The billing service owns invoices.");
}
