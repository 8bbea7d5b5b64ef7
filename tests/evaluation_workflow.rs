use review_eval::catalog::ReviewCatalog;
use review_eval::config::EvalConfig;
use review_eval::error::EvalError;
use review_eval::models::rating::RatingValue;
use review_eval::session::{EvaluationSession, ReviewSource, BATCH_SIZE};
use review_eval::store::CsvResultStore;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const HEADER: &str = "user_id,review_id,rating,comment,timestamp";

// Helper to lay out a data folder the way the annotation team ships it
fn write_data_dir(dir: &Path) {
    fs::write(dir.join("user.csv"), "User,annotator_id\nalice,1\nbob,2\n").unwrap();

    let mut assignments: HashMap<String, Vec<(String, String)>> = HashMap::new();
    let mut texts: HashMap<String, HashMap<String, String>> = HashMap::new();
    for (annotator, prefix) in [("1", "A"), ("2", "B")] {
        let queue = (1..=12)
            .map(|i| {
                let paper = format!("{prefix}{i}");
                texts.entry(paper.clone()).or_default().insert(
                    "human".into(),
                    format!("**Summary** Paper {paper}.\n**Strengths**\n- novel\n**Weaknesses**\n- small"),
                );
                (paper, "human".to_string())
            })
            .collect();
        assignments.insert(annotator.into(), queue);
    }
    fs::write(
        dir.join("annotator_mapping.json"),
        serde_json::to_string(&assignments).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.join("combined_mapping.json"),
        serde_json::to_string(&texts).unwrap(),
    )
    .unwrap();
}

fn setup() -> (tempfile::TempDir, ReviewCatalog, CsvResultStore) {
    let dir = tempfile::tempdir().unwrap();
    write_data_dir(dir.path());
    let config = EvalConfig {
        data_dir: dir.path().to_path_buf(),
        ..EvalConfig::default()
    };
    let catalog = ReviewCatalog::load(&config).unwrap();
    let store = CsvResultStore::new(config.results_path());
    (dir, catalog, store)
}

#[test]
fn alice_rates_everything_five() {
    let (_dir, catalog, store) = setup();

    let mut session = EvaluationSession::select_user(&catalog, "alice").unwrap();
    let ids: Vec<String> = session.load_batch().iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids.len(), BATCH_SIZE);
    for id in &ids {
        session.set_rating(id, 5, None).unwrap();
    }
    let receipt = session.submit(&store).unwrap();
    assert_eq!(receipt.rows_written, BATCH_SIZE);

    let contents = fs::read_to_string(store.path()).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some(HEADER));
    assert_eq!(lines.count(), BATCH_SIZE);

    let rows = store.read_all().unwrap();
    assert_eq!(rows.len(), BATCH_SIZE);
    for (row, id) in rows.iter().zip(&ids) {
        assert_eq!(row.user_id, "alice");
        assert_eq!(&row.review_id, id);
        assert_eq!(row.rating, RatingValue::Excellent);
        assert_eq!(row.comment, "");
        assert_eq!(row.timestamp, receipt.submitted_at);
    }
}

#[test]
fn incomplete_batch_leaves_file_untouched() {
    let (_dir, catalog, store) = setup();

    // bob submits first so the file already has content
    let mut bob = EvaluationSession::select_user(&catalog, "bob").unwrap();
    let bob_ids: Vec<String> = bob.load_batch().iter().map(|r| r.id.clone()).collect();
    for id in &bob_ids {
        bob.set_rating(id, 2, Some("needs work".into())).unwrap();
    }
    bob.submit(&store).unwrap();
    let before = fs::read(store.path()).unwrap();

    let mut alice = EvaluationSession::select_user(&catalog, "alice").unwrap();
    let ids: Vec<String> = alice.load_batch().iter().map(|r| r.id.clone()).collect();
    for id in ids.iter().take(BATCH_SIZE - 1) {
        alice.set_rating(id, 3, None).unwrap();
    }
    let err = alice.submit(&store).unwrap_err();
    assert!(matches!(err, EvalError::IncompleteSubmission { rated: 9, required: 10 }));

    assert_eq!(fs::read(store.path()).unwrap(), before);
}

#[test]
fn second_submission_appends_without_new_header() {
    let (_dir, catalog, store) = setup();

    let mut session = EvaluationSession::select_user(&catalog, "alice").unwrap();
    for round in [4, 1] {
        let ids: Vec<String> = session.load_batch().iter().map(|r| r.id.clone()).collect();
        for id in &ids {
            session.set_rating(id, round, None).unwrap();
        }
        session.submit(&store).unwrap();
    }

    let contents = fs::read_to_string(store.path()).unwrap();
    assert_eq!(contents.matches(HEADER).count(), 1);
    assert_eq!(contents.lines().count(), 1 + 2 * BATCH_SIZE);
    assert_eq!(store.progress("alice").unwrap(), 2 * BATCH_SIZE);
    assert_eq!(store.progress("bob").unwrap(), 0);
}

#[test]
fn batches_are_per_user_and_deterministic() {
    let (_dir, catalog, _store) = setup();

    let alice = catalog.user("alice").unwrap();
    let bob = catalog.user("bob").unwrap();
    assert_eq!(catalog.batch_for(alice), catalog.batch_for(alice));
    assert_ne!(catalog.batch_for(alice), catalog.batch_for(bob));
    assert!(catalog.batch_for(bob).iter().all(|r| r.paper_id.starts_with('B')));
}

#[test]
fn comments_reach_the_file_as_typed() {
    let (_dir, catalog, store) = setup();

    let mut session = EvaluationSession::select_user(&catalog, "alice").unwrap();
    let ids: Vec<String> = session.load_batch().iter().map(|r| r.id.clone()).collect();
    for id in &ids {
        session.set_rating(id, 3, Some("   ".into())).unwrap();
    }
    session
        .set_rating(&ids[0], 4, Some("  indented, \"quoted\" ".into()))
        .unwrap();
    session.submit(&store).unwrap();

    let rows = store.read_all().unwrap();
    assert_eq!(rows[0].comment, "  indented, \"quoted\" ");
    assert_eq!(rows[0].rating, RatingValue::VeryGood);
    assert!(rows[1..].iter().all(|r| r.comment.is_empty()));
}
