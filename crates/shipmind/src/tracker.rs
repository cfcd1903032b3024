//! Background queries with a request-id guard.
//!
//! Each query runs on its own thread and reports back over a channel that the UI polls
//! once per frame. Only the newest request may update the displayed info; answers to
//! older requests are dropped.

use crate::{client::ShipMind, info::HabitatInfo};
use std::sync::mpsc::{self, TryRecvError};
use std::sync::Arc;

#[derive(Default)]
pub struct QueryTracker {
    latest_id: u64,
    loading: bool,
    current: Option<HabitatInfo>,
    pending: Vec<(u64, mpsc::Receiver<HabitatInfo>)>,
}

impl QueryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next request id and mark the tracker loading.
    pub fn begin(&mut self) -> u64 {
        self.latest_id += 1;
        self.loading = true;
        self.latest_id
    }

    /// Start a query on a worker thread. Refused (returns `None`) while one is outstanding.
    pub fn issue(&mut self, mind: Arc<ShipMind>) -> Option<u64> {
        if self.loading {
            log::debug!("Ship Mind query already in flight");
            return None;
        }
        let id = self.begin();
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let info = mind.fetch_habitat_info();
            let _ = tx.send(info);
        });
        self.pending.push((id, rx));
        log::info!("Ship Mind query #{} issued", id);
        Some(id)
    }

    /// Apply a completion. Returns `true` if it was the latest request and is now shown.
    pub fn resolve(&mut self, id: u64, info: HabitatInfo) -> bool {
        if id != self.latest_id {
            log::debug!("Discarding stale Ship Mind answer #{} (latest #{})", id, self.latest_id);
            return false;
        }
        self.current = Some(info);
        self.loading = false;
        true
    }

    /// Collect finished queries. Call every frame. Returns `true` if the shown info changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        let mut finished = Vec::new();

        for (index, (id, rx)) in self.pending.iter().enumerate() {
            match rx.try_recv() {
                Ok(info) => finished.push((index, *id, info)),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Disconnected) => {
                    log::error!("Ship Mind worker #{} exited without answering", id);
                    finished.push((index, *id, HabitatInfo::offline()));
                }
            }
        }

        for (index, id, info) in finished.into_iter().rev() {
            self.pending.swap_remove(index);
            changed |= self.resolve(id, info);
        }
        changed
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Latest applied answer, if any query has completed.
    pub fn current(&self) -> Option<&HabitatInfo> {
        self.current.as_ref()
    }

    pub fn latest_id(&self) -> u64 {
        self.latest_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{wrap, StubTransport};
    use std::time::{Duration, Instant};

    fn info(text: &str) -> HabitatInfo {
        HabitatInfo {
            description: text.to_string(),
            facts: vec!["a".into(), "b".into(), "c".into()],
        }
    }

    #[test]
    fn tracker_ids_increase() {
        let mut tracker = QueryTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();
        assert!(second > first);
        assert!(tracker.is_loading());
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut tracker = QueryTracker::new();
        let first = tracker.begin();
        let second = tracker.begin();

        assert!(tracker.resolve(second, info("new")));
        assert!(!tracker.is_loading());
        assert!(!tracker.resolve(first, info("old")));
        assert_eq!(tracker.current().map(|i| i.description.as_str()), Some("new"));
    }

    #[test]
    fn stale_completion_keeps_loading() {
        let mut tracker = QueryTracker::new();
        let first = tracker.begin();
        let _second = tracker.begin();
        assert!(!tracker.resolve(first, info("old")));
        assert!(tracker.is_loading());
        assert!(tracker.current().is_none());
    }

    #[test]
    fn issue_runs_in_background_and_poll_applies() {
        let answer = r#"{"description":"Huge.","facts":["x","y","z"]}"#;
        let (stub, _) = StubTransport::ok(&wrap(answer));
        let mind = Arc::new(ShipMind::new(Some("secret".into()), Box::new(stub)));

        let mut tracker = QueryTracker::new();
        assert_eq!(tracker.issue(mind.clone()), Some(1));
        assert_eq!(tracker.issue(mind), None);

        let deadline = Instant::now() + Duration::from_secs(5);
        while !tracker.poll() {
            assert!(Instant::now() < deadline, "query never completed");
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(!tracker.is_loading());
        assert_eq!(tracker.current().map(|i| i.description.as_str()), Some("Huge."));
    }
}
