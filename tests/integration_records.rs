use typedojo::clock::ManualClock;
use typedojo::engine::Engine;
use typedojo::record::{export_csv, RecordStore};
use typedojo::sentence::SentenceSet;
use typedojo::session::Key;
use typedojo::sink::StoreSink;

/// Completed sentences travel through the background writer into SQLite
#[test]
fn completed_sessions_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("state").join("records.db");

    let clock = ManualClock::default();
    let sentences = SentenceSet::builtin().unwrap().with_tag("knex").unwrap();
    let first_id = sentences.get(0).unwrap().id;
    let first_text = sentences.get(0).unwrap().text.clone();

    let mut engine = Engine::new(
        sentences,
        77,
        Box::new(clock.clone()),
        Box::new(StoreSink::spawn(db.clone())),
    );

    engine.start();
    for (i, c) in first_text.chars().enumerate() {
        if i > 0 {
            clock.advance_ms(100);
        }
        engine.key_press(Key::Char(c));
    }
    // an abandoned attempt on the next sentence saves nothing
    engine.next();
    engine.key_press(Key::Char('r'));

    // dropping the engine drops the sink, which drains the queue
    drop(engine);

    let store = RecordStore::open(&db).unwrap();
    let records = store.for_user(77).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].sentence_id, first_id);

    let len = first_text.chars().count() as f64;
    let elapsed = (len - 1.0) * 100.0 / 1000.0;
    let expected = ((len / 5.0) * (60.0 / elapsed)).round() as u32;
    assert_eq!(records[0].wpm, expected);

    let best = store.best_per_sentence(77).unwrap();
    assert_eq!(best.len(), 1);
    assert_eq!(best[0].best_wpm, expected);

    let mut csv = Vec::new();
    export_csv(&records, &mut csv).unwrap();
    assert!(String::from_utf8(csv)
        .unwrap()
        .contains(&format!("{first_id},77,{expected},")));
}
