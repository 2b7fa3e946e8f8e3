//! Durable record of alerts already sent.
//!
//! The store maps a fingerprint to the Unix time (seconds) it was last
//! alerted on and is persisted as pretty-printed JSON:
//!
//! ```text
//! {
//!   "6461b77e9cb873d1816cb237aeb45d2f24b0e775": 1760745600
//! }
//! ```
//!
//! A single mutex covers the read, the compare, the update and the file
//! write, so sibling workers offering the same fingerprint at the same time
//! produce exactly one `true`.

use chrono::Utc;
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Fingerprint -> last alerted time in Unix seconds.
pub type Snapshot = BTreeMap<String, i64>;

/// Keys whose value is not an integer, written back untouched.
type Extra = BTreeMap<String, Value>;

#[derive(Debug, Default)]
struct State {
    entries: Snapshot,
    extra: Extra,
}

#[derive(Debug)]
pub struct DedupStore {
    path: PathBuf,
    window_secs: i64,
    state: Mutex<State>,
}

/// Split a parsed document into timestamp entries and everything else.
fn split_document(doc: BTreeMap<String, Value>) -> (Snapshot, Extra) {
    let mut entries = Snapshot::new();
    let mut extra = Extra::new();
    for (key, value) in doc {
        match value.as_i64() {
            Some(ts) => {
                entries.insert(key, ts);
            }
            None => {
                warn!(%key, %value, "History value is not a timestamp; keeping it as-is");
                extra.insert(key, value);
            }
        }
    }
    (entries, extra)
}

impl DedupStore {
    /// Load the snapshot at `path`.
    ///
    /// A missing, unreadable or malformed file is not an error: it is
    /// logged and the store starts empty. Inside a well-formed object, a
    /// value that is not an integer only skips that key; it is carried
    /// along and written back on the next persist.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>, window: Duration) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
                Ok(doc) => {
                    let (entries, extra) = split_document(doc);
                    info!(entries = entries.len(), skipped = extra.len(), "Loaded alert history");
                    State { entries, extra }
                }
                Err(e) => {
                    warn!(error = %e, "Alert history is malformed; starting empty");
                    State::default()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No alert history yet; starting empty");
                State::default()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read alert history; starting empty");
                State::default()
            }
        };

        Self::from_state(path, window, state)
    }

    /// Build a store from an in-memory snapshot without touching disk.
    #[cfg(test)]
    pub fn with_entries(path: impl Into<PathBuf>, window: Duration, entries: Snapshot) -> Self {
        Self::from_state(
            path.into(),
            window,
            State {
                entries,
                extra: Extra::new(),
            },
        )
    }

    fn from_state(path: PathBuf, window: Duration, state: State) -> Self {
        Self {
            path,
            window_secs: i64::try_from(window.as_secs()).unwrap_or(i64::MAX),
            state: Mutex::new(state),
        }
    }

    /// Decide whether `fp` should be alerted on now.
    pub fn should_emit(&self, fp: &str) -> bool {
        self.should_emit_at(fp, Utc::now().timestamp())
    }

    /// Decide whether `fp` should be alerted on at time `now`.
    ///
    /// Returns `true` when there is no entry or the entry is at least one
    /// window old. On `true` the entry is set to `now` and the snapshot is
    /// written before the lock is released. A failed write is logged; the
    /// in-memory update stands for the rest of the run.
    pub fn should_emit_at(&self, fp: &str, now: i64) -> bool {
        let mut state = self.lock();

        if let Some(&seen) = state.entries.get(fp) {
            if now.saturating_sub(seen) < self.window_secs {
                debug!(fingerprint = %fp, seen, now, "Suppressed by dedup window");
                return false;
            }
        }

        state.extra.remove(fp);
        state.entries.insert(fp.to_string(), now);
        if let Err(e) = self.persist(&state) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist alert history");
        }
        true
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Last alerted time for `fp`, if any.
    #[cfg(test)]
    pub fn last_seen(&self, fp: &str) -> Option<i64> {
        self.lock().entries.get(fp).copied()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Copy of the current timestamp entries.
    #[cfg(test)]
    pub fn snapshot(&self) -> Snapshot {
        self.lock().entries.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A worker that panicked mid-update leaves a map that is still valid
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Write to a sibling temp file, then rename over the snapshot.
    fn persist(&self, state: &State) -> io::Result<()> {
        let doc = state
            .extra
            .iter()
            .map(|(k, v)| (k.as_str(), v.clone()))
            .chain(state.entries.iter().map(|(k, ts)| (k.as_str(), Value::from(*ts))))
            .collect::<BTreeMap<&str, Value>>();
        let json = serde_json::to_string_pretty(&doc)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WINDOW: Duration = Duration::from_secs(72 * 3600);
    const FP: &str = "6461b77e9cb873d1816cb237aeb45d2f24b0e775";

    static SEQ: AtomicUsize = AtomicUsize::new(0);

    fn scratch_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "job_radar_history_{tag}_{}_{}.json",
            std::process::id(),
            SEQ.fetch_add(1, Ordering::SeqCst)
        ))
    }

    #[test]
    fn test_first_sighting_emits_and_persists() {
        let path = scratch_path("first");
        let store = DedupStore::load(&path, WINDOW);
        assert!(store.is_empty());

        assert!(store.should_emit_at(FP, 1_000));
        assert_eq!(store.last_seen(FP), Some(1_000));

        let reloaded = DedupStore::load(&path, WINDOW);
        assert_eq!(reloaded.last_seen(FP), Some(1_000));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_window_boundaries() {
        let path = scratch_path("window");
        let store = DedupStore::load(&path, WINDOW);
        let t0 = 1_700_000_000;
        let window = WINDOW.as_secs() as i64;

        assert!(store.should_emit_at(FP, t0));
        assert!(!store.should_emit_at(FP, t0 + 3600));
        assert!(!store.should_emit_at(FP, t0 + window - 1));
        assert_eq!(store.last_seen(FP), Some(t0));

        // exactly one window elapsed alerts again
        assert!(store.should_emit_at(FP, t0 + window));
        assert_eq!(store.last_seen(FP), Some(t0 + window));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_clock_going_backwards_never_lowers_timestamp() {
        let path = scratch_path("skew");
        let store = DedupStore::load(&path, WINDOW);
        assert!(store.should_emit_at(FP, 5_000));
        assert!(!store.should_emit_at(FP, 4_000));
        assert_eq!(store.last_seen(FP), Some(5_000));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_snapshot_starts_empty() {
        let path = scratch_path("malformed");
        std::fs::write(&path, "{ not json").unwrap();
        let store = DedupStore::load(&path, WINDOW);
        assert!(store.is_empty());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_snapshot_round_trip_preserves_unknown_keys() {
        let path = scratch_path("roundtrip");
        std::fs::write(
            &path,
            r#"{
  "legacy-key": 42,
  "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa": 1700000000
}"#,
        )
        .unwrap();

        let store = DedupStore::load(&path, WINDOW);
        assert_eq!(store.len(), 2);
        assert!(store.should_emit_at(FP, 1_800_000_000));

        let reloaded = DedupStore::load(&path, WINDOW);
        assert_eq!(reloaded.snapshot(), store.snapshot());
        assert_eq!(reloaded.last_seen("legacy-key"), Some(42));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"legacy-key\": 42"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_non_integer_value_skips_only_that_key() {
        let path = scratch_path("comment");
        std::fs::write(
            &path,
            r#"{
  "_comment": "managed by job_radar",
  "6461b77e9cb873d1816cb237aeb45d2f24b0e775": 1760745600
}"#,
        )
        .unwrap();

        let store = DedupStore::load(&path, WINDOW);
        assert_eq!(store.len(), 1);
        assert!(!store.should_emit_at(FP, 1_760_745_600 + 3600));

        let other = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
        assert!(store.should_emit_at(other, 1_760_750_000));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"_comment\": \"managed by job_radar\""));
        let reloaded = DedupStore::load(&path, WINDOW);
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.last_seen(FP), Some(1_760_745_600));
        assert_eq!(reloaded.last_seen(other), Some(1_760_750_000));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_persist_failure_keeps_in_memory_decision() {
        let dir = std::env::temp_dir().join("job_radar_missing_dir_for_history_test");
        let _ = std::fs::remove_dir_all(&dir);
        let store = DedupStore::load(dir.join("history.json"), WINDOW);

        assert!(store.should_emit_at(FP, 100));
        assert!(!store.should_emit_at(FP, 200));
        assert_eq!(store.last_seen(FP), Some(100));
    }

    #[test]
    fn test_parallel_offers_emit_once() {
        let path = scratch_path("parallel");
        let store = Arc::new(DedupStore::load(&path, WINDOW));

        let handles = (0..20)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || store.should_emit_at(FP, 1_000))
            })
            .collect::<Vec<_>>();

        let emitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|emitted| *emitted)
            .count();

        assert_eq!(emitted, 1);
        assert_eq!(DedupStore::load(&path, WINDOW).len(), 1);
        let _ = std::fs::remove_file(&path);
    }
}
