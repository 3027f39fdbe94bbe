use catch_core::ScoreEntry;
use score_store::{ScoreStore, StoreError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Fresh, not-yet-existing directory under the system temp dir
fn scratch_dir(label: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!(
        "score-store-{}-{}-{}-{}",
        label,
        std::process::id(),
        n,
        chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn entry(name: &str, score: u64) -> ScoreEntry {
    ScoreEntry {
        name: name.to_string(),
        score,
        timestamp: Some("2026-10-14T00:00:00.000Z".to_string()),
    }
}

fn backups_in(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.to_string_lossy().contains(".backup."))
        .collect()
}

#[test]
fn test_load_initialises_missing_file() {
    let dir = scratch_dir("init").join("nested");
    let store = ScoreStore::in_dir(&dir);

    let entries = store.load().expect("load should succeed");
    assert!(entries.is_empty());
    assert!(dir.is_dir());

    let raw = fs::read_to_string(store.path()).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed, serde_json::json!([]));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let dir_mode = fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        let file_mode = fs::metadata(store.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700);
        assert_eq!(file_mode, 0o600);
    }
}

#[test]
fn test_submit_to_empty_store() {
    let store = ScoreStore::in_dir(scratch_dir("alice"));
    store.submit("Alice", 42).unwrap();

    let board = store.leaderboard().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].name, "Alice");
    assert_eq!(board[0].score, 42);
    let ts = board[0].timestamp.as_deref().expect("timestamp is set");
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok(), "not ISO-8601: {}", ts);
    assert!(ts.ends_with('Z'));
}

#[test]
fn test_save_of_load_is_idempotent() {
    let store = ScoreStore::in_dir(scratch_dir("roundtrip"));
    store.submit("Alice", 42).unwrap();
    store.submit("Bob", 7).unwrap();
    store.submit("Carol", 99).unwrap();

    let before = fs::read(store.path()).unwrap();
    let loaded = store.load().unwrap();
    store.save(&loaded).unwrap();
    let after = fs::read(store.path()).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_no_temp_file_left_behind() {
    let store = ScoreStore::in_dir(scratch_dir("tmp"));
    store.save(&[entry("A", 1)]).unwrap();
    assert!(store.path().exists());
    assert!(!store.temp_path().exists());
}

#[test]
fn test_corrupted_file_is_backed_up_and_reset() {
    let dir = scratch_dir("corrupt");
    let store = ScoreStore::in_dir(&dir);
    store.load().unwrap();
    fs::write(store.path(), "[{\"name\": \"Alice\", \"score\": 4").unwrap();

    let entries = store.load().expect("corruption must not surface as an error");
    assert!(entries.is_empty());

    let backups = backups_in(&dir);
    assert_eq!(backups.len(), 1, "expected exactly one backup: {:?}", backups);
    assert_eq!(
        fs::read_to_string(&backups[0]).unwrap(),
        "[{\"name\": \"Alice\", \"score\": 4"
    );
    let suffix = backups[0].to_string_lossy().rsplit('.').next().unwrap().to_string();
    assert!(suffix.parse::<i64>().is_ok(), "backup suffix is epoch ms: {}", suffix);

    // reset file is a valid empty leaderboard
    let raw = fs::read_to_string(store.path()).unwrap();
    assert_eq!(serde_json::from_str::<serde_json::Value>(&raw).unwrap(), serde_json::json!([]));

    // a second load finds nothing more to recover
    store.load().unwrap();
    assert_eq!(backups_in(&dir).len(), 1);
}

#[test]
fn test_back_to_back_corruptions_keep_every_backup() {
    let dir = scratch_dir("repeat");
    let store = ScoreStore::in_dir(&dir);
    store.load().unwrap();

    for i in 0..3 {
        fs::write(store.path(), format!("broken {}", i)).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    let mut contents: Vec<String> = backups_in(&dir)
        .iter()
        .map(|p| fs::read_to_string(p).unwrap())
        .collect();
    contents.sort();
    assert_eq!(contents, vec!["broken 0", "broken 1", "broken 2"]);
}

#[test]
fn test_corrupted_file_is_kept_when_no_backup_name_is_free() {
    let dir = scratch_dir("nobackup");
    let store = ScoreStore::in_dir(&dir);
    store.load().unwrap();

    // Occupy every backup name the next few seconds could produce
    let start = chrono::Utc::now().timestamp_millis();
    let taken: Vec<PathBuf> = (start..start + 3000)
        .map(|ms| PathBuf::from(format!("{}.backup.{}", store.path().display(), ms)))
        .collect();
    for path in &taken {
        fs::create_dir(path).unwrap();
    }

    fs::write(store.path(), "not json").unwrap();
    assert!(store.load().unwrap().is_empty());

    assert_eq!(fs::read_to_string(store.path()).unwrap(), "not json");
    assert!(taken.iter().all(|p| p.is_dir()));
    assert!(!store.temp_path().exists());
}

#[test]
fn test_failed_reset_keeps_backup_and_surfaces_on_next_write() {
    let dir = scratch_dir("noreset");
    let store = ScoreStore::in_dir(&dir);
    store.load().unwrap();
    fs::write(store.path(), "not json").unwrap();
    // A directory where the temp file goes makes every write fail
    fs::create_dir(store.temp_path()).unwrap();

    assert!(store.load().unwrap().is_empty());

    let backups = backups_in(&dir);
    assert_eq!(backups.len(), 1);
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "not json");

    match store.submit("Alice", 1) {
        Err(StoreError::Write { .. }) => {}
        other => panic!("expected Write error, got {:?}", other),
    }
    assert_eq!(fs::read_to_string(&backups[0]).unwrap(), "not json");
}

#[test]
fn test_non_array_file_is_recovered() {
    let dir = scratch_dir("object");
    let store = ScoreStore::in_dir(&dir);
    store.load().unwrap();
    fs::write(store.path(), "{\"scores\": []}").unwrap();

    assert!(store.load().unwrap().is_empty());
    assert_eq!(backups_in(&dir).len(), 1);
}

#[test]
fn test_invalid_entries_are_filtered() {
    let dir = scratch_dir("filter");
    let store = ScoreStore::in_dir(&dir);
    store.load().unwrap();
    fs::write(
        store.path(),
        r#"[
            {"name": "Good", "score": 10, "timestamp": "2026-10-14T00:00:00.000Z"},
            {"name": "Negative", "score": -5},
            {"name": "Text", "score": "12"},
            {"score": 3},
            42,
            {"name": "AlsoGood", "score": 2}
        ]"#,
    )
    .unwrap();

    let entries = store.load().unwrap();
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Good", "AlsoGood"]);
    assert!(backups_in(&dir).is_empty());
}

#[test]
fn test_store_caps_at_fifty() {
    let store = ScoreStore::in_dir(scratch_dir("cap"));
    let seeded: Vec<ScoreEntry> = (0..50).map(|i| entry(&format!("p{}", i), 10 + i)).collect();
    store.save(&seeded).unwrap();

    store.submit("Winner", 1000).unwrap();

    let all = store.load().unwrap();
    assert_eq!(all.len(), 50);
    assert_eq!(all[0].name, "Winner");
    // the previous lowest (p0 with 10) is gone
    assert!(all.iter().all(|e| e.name != "p0"));
    assert_eq!(all.last().unwrap().score, 11);
}

#[test]
fn test_low_score_does_not_enter_full_store() {
    let store = ScoreStore::in_dir(scratch_dir("low"));
    let seeded: Vec<ScoreEntry> = (0..50).map(|i| entry(&format!("p{}", i), 10 + i)).collect();
    store.save(&seeded).unwrap();

    store.submit("Loser", 1).unwrap();

    let all = store.load().unwrap();
    assert_eq!(all.len(), 50);
    assert!(all.iter().all(|e| e.name != "Loser"));
}

#[test]
fn test_leaderboard_returns_at_most_ten() {
    let store = ScoreStore::in_dir(scratch_dir("top10"));
    let seeded: Vec<ScoreEntry> = (0..50).map(|i| entry(&format!("p{}", i), i)).collect();
    store.save(&seeded).unwrap();

    let board = store.leaderboard().unwrap();
    assert_eq!(board.len(), 10);
    let scores: Vec<u64> = board.iter().map(|e| e.score).collect();
    assert_eq!(scores, (40..50).rev().collect::<Vec<u64>>());
}

#[test]
fn test_ties_keep_submission_order() {
    let store = ScoreStore::in_dir(scratch_dir("ties"));
    store.submit("First", 5).unwrap();
    store.submit("Second", 5).unwrap();
    store.submit("Top", 6).unwrap();

    let names: Vec<String> = store.leaderboard().unwrap().into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["Top", "First", "Second"]);
}

#[test]
fn test_io_failure_is_surfaced() {
    let dir = scratch_dir("blocked");
    fs::create_dir_all(&dir).unwrap();
    let blocker = dir.join("not-a-dir");
    fs::write(&blocker, "file in the way").unwrap();

    let store = ScoreStore::in_dir(&blocker);
    match store.submit("Alice", 1) {
        Err(StoreError::CreateDir { .. }) => {}
        other => panic!("expected CreateDir error, got {:?}", other),
    }
}

#[test]
fn test_reload_after_restart_sees_previous_writes() {
    let dir = scratch_dir("restart");
    ScoreStore::in_dir(&dir).submit("Before", 3).unwrap();

    let reopened = ScoreStore::in_dir(&dir);
    let board = reopened.leaderboard().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board[0].name, "Before");
}

#[test]
fn test_concurrent_submits_in_one_process_are_not_lost() {
    let store = std::sync::Arc::new(ScoreStore::in_dir(scratch_dir("threads")));
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || store.submit(&format!("t{}", i), i).unwrap())
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(store.load().unwrap().len(), 8);
}
