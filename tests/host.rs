use lifecycle_log::prelude::*;
use std::time::Duration;
use tokio::time::{advance, Instant};

fn host(config: HostConfig) -> (Host, MemorySink) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let sink = MemorySink::new();
    let host = Host::with_clock(config, sink.clone(), FixedClock::new("9:00:00 AM"));
    (host, sink)
}

fn phases(host: &Host) -> Vec<Phase> {
    host.demo().unwrap().log().iter().map(LogEntry::phase).collect()
}

fn titles(host: &Host) -> Vec<String> {
    host.demo()
        .unwrap()
        .log()
        .iter()
        .map(|entry| entry.title().to_owned())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn it_mounts_and_updates() {
    let (mut host, _) = host(HostConfig::default());
    host.try_settle().unwrap();

    // The did-mount entry follows construction, reconciliation and first render,
    // so a settled mount holds four entries and one increment brings it to eight.
    assert_eq!(
        titles(&host),
        [
            "1. Constructor",
            "2. getDerivedStateFromProps",
            "3. render",
            "4. componentDidMount"
        ]
    );
    assert_eq!(phases(&host), [Phase::Mounting; 4]);

    host.increment().unwrap();

    assert_eq!(host.demo().unwrap().counter(), 1);
    assert_eq!(host.demo().unwrap().log().len(), 8);
    assert_eq!(
        titles(&host)[4..],
        [
            "3. render",
            "2. shouldComponentUpdate",
            "4. getSnapshotBeforeUpdate",
            "5. componentDidUpdate"
        ]
    );
    assert_eq!(phases(&host)[4..], [Phase::Updating; 4]);
}

#[tokio::test(start_paused = true)]
async fn it_grows_the_log_monotonically() {
    let (mut host, sink) = host(HostConfig::default());
    host.try_settle().unwrap();

    let mut seen = host.demo().unwrap().log().clone();
    for _ in 0..5 {
        host.increment().unwrap();

        let log = host.demo().unwrap().log().clone();
        assert_eq!(log.len(), seen.len() + 4);
        assert_eq!(&log.as_slice()[..seen.len()], seen.as_slice());
        seen = log;
    }
    assert_eq!(host.demo().unwrap().counter(), 5);

    host.toggle().unwrap();
    assert!(!host.is_mounted());
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.events()[0].phase, Phase::Unmounting);
}

#[tokio::test(start_paused = true)]
async fn it_fetches_once_after_the_delay() {
    let (mut host, _) = host(HostConfig::default());
    let start = Instant::now();

    host.try_settle().unwrap();
    assert_eq!(host.demo().unwrap().async_payload(), None);
    assert_eq!(
        host.view().unwrap().demo.unwrap().payload_label(),
        "Loading..."
    );

    host.run_until_idle().await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(1500));
    assert_eq!(host.demo().unwrap().async_payload(), Some("Fetched data"));

    // The fetch is a state change without a counter change.
    assert_eq!(host.demo().unwrap().log().len(), 4);

    host.increment().unwrap();
    assert_eq!(host.demo().unwrap().async_payload(), Some("Fetched data"));
}

#[tokio::test(start_paused = true)]
async fn it_uses_the_configured_fetch() {
    let config = HostConfig::default()
        .with_fetch_delay(Duration::from_millis(10))
        .with_fetch_payload("ready");
    let (mut host, _) = host(config);

    host.try_settle().unwrap();
    advance(Duration::from_millis(10)).await;
    host.run_until_idle().await.unwrap();

    assert_eq!(host.demo().unwrap().async_payload(), Some("ready"));
}

#[tokio::test(start_paused = true)]
async fn it_never_fetches_into_an_unmounted_instance() {
    let (mut host, sink) = host(HostConfig::default());
    let first = host.instance().unwrap();

    host.try_settle().unwrap();
    advance(Duration::from_millis(1000)).await;

    host.toggle().unwrap();
    assert!(host.runtime().is_idle());

    host.toggle().unwrap();
    let second = host.instance().unwrap();
    assert_ne!(first, second);
    assert_eq!(host.runtime().task_count(), 1);

    // The first instance's fetch would have landed here.
    host.try_settle().unwrap();
    advance(Duration::from_millis(600)).await;
    host.try_settle().unwrap();
    assert_eq!(host.demo().unwrap().async_payload(), None);

    host.run_until_idle().await.unwrap();
    assert_eq!(host.demo().unwrap().async_payload(), Some("Fetched data"));
    assert_eq!(sink.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn it_drops_fetch_updates_queued_before_unmount() {
    let (mut host, _) = host(HostConfig::default());
    host.try_settle().unwrap();
    advance(Duration::from_millis(1500)).await;

    // Finish the fetch task without running the update it queues.
    assert!(host.runtime().poll_tasks());
    assert_eq!(host.runtime().task_count(), 0);
    assert!(!host.runtime().is_idle());

    host.toggle().unwrap();
    assert_eq!(host.runtime().run_updates(), Ok(true));
    assert!(host.runtime().is_idle());

    host.toggle().unwrap();
    host.try_settle().unwrap();
    assert_eq!(host.demo().unwrap().async_payload(), None);
    assert_eq!(host.demo().unwrap().log().len(), 4);
}

#[tokio::test(start_paused = true)]
async fn it_starts_fresh_after_remount() {
    let (mut host, sink) = host(HostConfig::default());
    host.try_settle().unwrap();
    host.increment().unwrap();
    host.increment().unwrap();
    host.run_until_idle().await.unwrap();

    host.toggle().unwrap();
    host.toggle().unwrap();
    host.try_settle().unwrap();

    let demo = host.demo().unwrap();
    assert_eq!(demo.counter(), 0);
    assert_eq!(demo.async_payload(), None);
    assert_eq!(demo.log().len(), 4);
    assert!(demo.log()[0].title().contains("Constructor"));
    assert_eq!(sink.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn it_renders_the_shell() {
    let (mut host, _) = host(HostConfig::default());
    host.try_settle().unwrap();
    host.increment().unwrap();

    let text = host.view().unwrap().to_string();
    assert!(text.contains("[t] Unmount Component"));
    assert!(text.contains("Component State: 1"));
    assert!(text.contains("[Updating] 5. componentDidUpdate  (9:00:00 AM)"));

    host.toggle().unwrap();
    let view = host.view().unwrap();
    assert!(view.demo.is_none());
    assert_eq!(view.toggle_label(), "Mount Component");
}

#[test]
fn it_rejects_increments_while_unmounted() {
    let (mut host, _) = host(HostConfig::default().with_initially_mounted(false));

    assert_eq!(host.increment(), Err(HostError::NotMounted));
    assert_eq!(host.try_settle(), Ok(false));
}
