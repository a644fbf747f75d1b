use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};

use crate::app::SchedulerHandle;
use crate::storage::config::DayConfig;
use crate::sync::remote::{FetchError, RemoteEvents};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The event collection was replaced with this many events.
    Applied(usize),
    /// The source returned nothing; state left untouched.
    Empty,
    /// A newer fetch started before this one finished; response dropped.
    Stale,
}

fn query_instant(instant: DateTime<Utc>) -> String {
    urlencoding::encode(&instant.to_rfc3339_opts(SecondsFormat::Secs, true)).into_owned()
}

/// Query covering the day before through the day after `date`, anchored on
/// the configured start and end hours.
pub fn fetch_query(date: NaiveDate, day: &DayConfig) -> String {
    let midnight = date.and_time(NaiveTime::MIN).and_utc();
    let start = midnight + Duration::hours(i64::from(day.start_hour)) - Duration::days(1);
    let end = midnight + Duration::hours(i64::from(day.end_hour)) + Duration::days(1);
    format!("?start={}&end={}", query_instant(start), query_instant(end))
}

#[derive(Clone)]
pub struct EventFetcher {
    remote: Arc<dyn RemoteEvents>,
    generation: Arc<AtomicU64>,
    discard_stale: bool,
}

impl EventFetcher {
    pub fn new(remote: Arc<dyn RemoteEvents>) -> Self {
        Self {
            remote,
            generation: Arc::new(AtomicU64::new(0)),
            discard_stale: true,
        }
    }

    pub fn with_discard_stale(mut self, discard_stale: bool) -> Self {
        self.discard_stale = discard_stale;
        self
    }

    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Loads events around `date` into `handle`.
    ///
    /// Loading is raised before the request and cleared once it settles,
    /// whether it succeeded or not; errors are returned after the flag is
    /// cleared. When stale responses are discarded, a fetch overtaken by a
    /// newer one leaves both the loading flag and the events to the newer
    /// fetch, so a `true` is only paired with a `false` on the same handle
    /// for the newest request. Callers sharing one handle across fetches
    /// always see loading end; a handle used by a single overtaken fetch
    /// does not.
    pub async fn fetch<H: SchedulerHandle + ?Sized>(
        &self,
        date: NaiveDate,
        day: &DayConfig,
        handle: &mut H,
    ) -> Result<FetchOutcome, FetchError> {
        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = fetch_query(date, day);

        handle.trigger_loading(true);
        let result = self.remote.fetch_events(&query).await;

        let stale = self.discard_stale && ticket != self.current_generation();
        if !stale {
            handle.trigger_loading(false);
        }

        let events = result.map_err(|e| {
            tracing::error!("Fetching events for {} failed: {}", date, e);
            e
        })?;

        if stale {
            tracing::debug!("Discarding stale events for {} (request {})", date, ticket);
            return Ok(FetchOutcome::Stale);
        }

        match events {
            Some(events) if !events.is_empty() => {
                let count = events.len();
                handle.handle_events(events);
                Ok(FetchOutcome::Applied(count))
            }
            _ => Ok(FetchOutcome::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::MockSchedulerHandle;
    use crate::calendar::Event;
    use crate::ui::slot_click::DialogSeed;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use mockall::Sequence;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    type Reply = Result<Option<Vec<Event>>, FetchError>;

    struct StaticRemote {
        reply: Mutex<Option<Reply>>,
        queries: Mutex<Vec<String>>,
    }

    impl StaticRemote {
        fn new(reply: Reply) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RemoteEvents for StaticRemote {
        async fn fetch_events(&self, query: &str) -> Reply {
            self.queries.lock().unwrap().push(query.to_string());
            self.reply.lock().unwrap().take().unwrap_or(Ok(None))
        }
    }

    /// Each call waits for the reply sent on its own channel.
    struct GatedRemote {
        gates: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
    }

    #[async_trait]
    impl RemoteEvents for GatedRemote {
        async fn fetch_events(&self, _query: &str) -> Reply {
            let gate = self.gates.lock().unwrap().pop_front().unwrap();
            gate.await.unwrap()
        }
    }

    #[derive(Default)]
    struct Recorder {
        loading: Vec<bool>,
        events: Option<Vec<Event>>,
    }

    impl SchedulerHandle for Recorder {
        fn trigger_loading(&mut self, loading: bool) {
            self.loading.push(loading);
        }

        fn handle_events(&mut self, events: Vec<Event>) {
            self.events = Some(events);
        }

        fn trigger_dialog(&mut self, _open: bool, _seed: Option<DialogSeed>) {}
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn day() -> DayConfig {
        DayConfig { start_hour: 9, end_hour: 17 }
    }

    fn remote_event(id: &str) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        Event::new(id, id, start, start + Duration::hours(1))
    }

    #[test]
    fn query_spans_day_before_to_day_after() {
        assert_eq!(
            fetch_query(date(5), &day()),
            "?start=2024-03-04T09%3A00%3A00Z&end=2024-03-06T17%3A00%3A00Z"
        );
    }

    #[test]
    fn query_handles_midnight_end_hour() {
        let day = DayConfig { start_hour: 0, end_hour: 24 };

        assert_eq!(
            fetch_query(date(5), &day),
            "?start=2024-03-04T00%3A00%3A00Z&end=2024-03-07T00%3A00%3A00Z"
        );
    }

    #[tokio::test]
    async fn successful_fetch_replaces_events() {
        let remote = Arc::new(StaticRemote::new(Ok(Some(vec![remote_event("r1")]))));
        let fetcher = EventFetcher::new(remote.clone());
        let mut handle = Recorder::default();

        let outcome = fetcher.fetch(date(5), &day(), &mut handle).await.unwrap();

        assert_eq!(outcome, FetchOutcome::Applied(1));
        assert_eq!(handle.loading, vec![true, false]);
        assert_eq!(handle.events.unwrap()[0].id, "r1");
        assert_eq!(
            *remote.queries.lock().unwrap(),
            vec!["?start=2024-03-04T09%3A00%3A00Z&end=2024-03-06T17%3A00%3A00Z".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_result_leaves_events_untouched() {
        for reply in [Ok(None), Ok(Some(Vec::new()))] {
            let fetcher = EventFetcher::new(Arc::new(StaticRemote::new(reply)));
            let mut handle = Recorder::default();

            let outcome = fetcher.fetch(date(5), &day(), &mut handle).await.unwrap();

            assert_eq!(outcome, FetchOutcome::Empty);
            assert_eq!(handle.loading, vec![true, false]);
            assert!(handle.events.is_none());
        }
    }

    #[tokio::test]
    async fn failure_clears_loading_and_propagates() {
        let failure = FetchError::ParseError("bad payload".to_string());
        let fetcher = EventFetcher::new(Arc::new(StaticRemote::new(Err(failure))));

        let mut seq = Sequence::new();
        let mut handle = MockSchedulerHandle::new();
        handle
            .expect_trigger_loading()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        handle
            .expect_trigger_loading()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        handle.expect_handle_events().never();

        let result = fetcher.fetch(date(5), &day(), &mut handle).await;

        assert!(matches!(result, Err(FetchError::ParseError(ref msg)) if msg == "bad payload"));
    }

    async fn race(discard_stale: bool) -> (Result<FetchOutcome, FetchError>, Recorder, Recorder) {
        let (old_tx, old_rx) = oneshot::channel();
        let (new_tx, new_rx) = oneshot::channel();
        let remote = GatedRemote {
            gates: Mutex::new(VecDeque::from([old_rx, new_rx])),
        };
        let fetcher = EventFetcher::new(Arc::new(remote)).with_discard_stale(discard_stale);
        let mut old_handle = Recorder::default();
        let mut new_handle = Recorder::default();

        let day = day();

        let (old, new, ()) = tokio::join!(
            fetcher.fetch(date(5), &day, &mut old_handle),
            fetcher.fetch(date(6), &day, &mut new_handle),
            async {
                new_tx.send(Ok(Some(vec![remote_event("new")]))).ok();
                tokio::task::yield_now().await;
                old_tx.send(Ok(Some(vec![remote_event("old")]))).ok();
            }
        );

        assert_eq!(new.unwrap(), FetchOutcome::Applied(1));
        assert_eq!(fetcher.current_generation(), 2);
        (old, old_handle, new_handle)
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let (old, old_handle, new_handle) = race(true).await;

        assert_eq!(old.unwrap(), FetchOutcome::Stale);
        assert!(old_handle.events.is_none());
        assert_eq!(old_handle.loading, vec![true]);
        assert_eq!(new_handle.loading, vec![true, false]);
        assert_eq!(new_handle.events.unwrap()[0].id, "new");
    }

    #[tokio::test]
    async fn stale_response_applies_when_sequencing_disabled() {
        let (old, old_handle, _) = race(false).await;

        assert_eq!(old.unwrap(), FetchOutcome::Applied(1));
        assert_eq!(old_handle.loading, vec![true, false]);
        assert_eq!(old_handle.events.unwrap()[0].id, "old");
    }
}
