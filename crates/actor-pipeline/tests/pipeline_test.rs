use actor_pipeline::{
    generate, Pipeline, PipelineConfig, PipelineError, Predicate, Stage, TerminationPolicy,
    TerminationToken, WorkerExit,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Passes everything through, but panics on one value.
struct PanicsOn(u64);

#[async_trait]
impl Stage for PanicsOn {
    type Input = u64;
    type Output = u64;

    async fn process(&self, input: u64) -> Option<u64> {
        if input == self.0 {
            panic!("stage blew up on {input}");
        }
        Some(input)
    }
}

#[tokio::test]
async fn test_all_workers_policy_delivers_everything() {
    let config = PipelineConfig::default().with_workers(3).with_capacity(4);
    let (submitter, collector) =
        Pipeline::spawn(&config, Predicate::new(|n: &u64| n % 2 == 0)).unwrap();

    let producer = tokio::spawn(generate(submitter, 0..100u64, Duration::ZERO));
    let summary = collector.wait().await.unwrap();
    assert_eq!(producer.await.unwrap().unwrap(), 100);

    let mut values: Vec<u64> = summary.results.iter().map(|r| r.payload).collect();
    values.sort_unstable();
    assert_eq!(values, (0..100).step_by(2).collect::<Vec<_>>());

    assert_eq!(summary.tokens.len(), 3);
    assert!(summary.tokens.iter().all(|t| matches!(
        t,
        TerminationToken::WorkerExited {
            exit: WorkerExit::Completed,
            ..
        }
    )));
    assert!(summary.failed_workers.is_empty());

    // Per worker, output sequence numbers are 0, 1, 2, … in arrival order.
    let mut next_expected = HashMap::new();
    for result in &summary.results {
        let assignment = result.assignment.expect("results carry their worker");
        assert_eq!(result.worker(), Some(assignment.worker));
        assert!(assignment.worker.0 < 3);
        let expected = next_expected.entry(assignment.worker).or_insert(0u64);
        assert_eq!(assignment.worker_seq, *expected);
        *expected += 1;
    }
}

#[tokio::test]
async fn test_first_token_policy_stops_early() {
    let config = PipelineConfig::default()
        .with_workers(4)
        .with_termination(TerminationPolicy::FirstToken);
    let (submitter, collector) = Pipeline::spawn(&config, Predicate::new(|_: &u64| true)).unwrap();
    assert_eq!(collector.expected_tokens(), 1);

    tokio::spawn(generate(submitter, 0..40u64, Duration::ZERO));
    let summary = collector
        .wait_timeout(Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(summary.tokens.len(), 1);
    assert!(summary.results.len() <= 40);
}

#[tokio::test]
async fn test_slow_collector_blocks_submitter() {
    let capacity = 2;
    let workers = 2;
    let config = PipelineConfig::default()
        .with_workers(workers)
        .with_capacity(capacity);
    let (submitter, mut collector) =
        Pipeline::spawn(&config, Predicate::new(|_: &u64| true)).unwrap();

    let observer = submitter.clone();
    let producer = tokio::spawn(generate(submitter, 0..20u64, Duration::ZERO));

    // Nobody is reading results yet.
    tokio::time::sleep(Duration::from_millis(50)).await;
    let accepted = observer.accepted();
    assert!(accepted > 0);
    assert!(accepted <= (2 * capacity + workers) as u64);
    assert!(!producer.is_finished());

    let mut received = 0;
    while collector.next().await.unwrap().is_some() {
        received += 1;
    }
    assert_eq!(received, 20);
    assert!(collector.is_finished());
    assert_eq!(collector.tokens_seen(), workers);
    assert_eq!(producer.await.unwrap().unwrap(), 20);
}

#[tokio::test]
async fn test_panicking_worker_gets_injected_token() {
    actor_pipeline::tracing::try_setup_tracing();
    let config = PipelineConfig::default().with_workers(2);
    let (submitter, collector) = Pipeline::spawn(&config, PanicsOn(13)).unwrap();

    tokio::spawn(generate(submitter, 0..20u64, Duration::ZERO));
    let summary = collector
        .wait_timeout(Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(summary.results.len(), 19);
    assert!(summary.results.iter().all(|r| r.payload != 13));
    assert_eq!(summary.tokens.len(), 2);
    assert_eq!(summary.failed_workers.len(), 1);
    assert!(summary.tokens.iter().any(|t| matches!(
        t,
        TerminationToken::WorkerExited {
            exit: WorkerExit::Failed,
            ..
        }
    )));
}

#[tokio::test]
async fn test_panicking_worker_is_restarted() {
    let config = PipelineConfig::default()
        .with_workers(2)
        .with_max_restarts(1);
    let (submitter, collector) = Pipeline::spawn(&config, PanicsOn(13)).unwrap();

    tokio::spawn(generate(submitter, 0..20u64, Duration::ZERO));
    let summary = collector
        .wait_timeout(Duration::from_secs(5))
        .await
        .unwrap();

    assert_eq!(summary.results.len(), 19);
    assert!(summary.failed_workers.is_empty());
    assert_eq!(summary.tokens.len(), 2);
}

#[tokio::test]
async fn test_dropped_submitter_reports_premature_close() {
    let config = PipelineConfig::default().with_workers(3);
    let (submitter, collector) = Pipeline::spawn(&config, Predicate::new(|_: &u64| true)).unwrap();

    for n in 0..5u64 {
        submitter.submit(n).await.unwrap();
    }
    drop(submitter);

    match collector.wait().await {
        Err(PipelineError::ChannelClosed { expected, received }) => {
            assert_eq!(expected, 3);
            assert_eq!(received, 0);
        }
        other => panic!("expected ChannelClosed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_undrained_pipeline_times_out() {
    let config = PipelineConfig::default();
    let (submitter, collector) = Pipeline::spawn(&config, Predicate::new(|_: &u64| true)).unwrap();
    submitter.submit(1).await.unwrap();

    // The submitter stays open, so no token ever arrives.
    let window = Duration::from_millis(50);
    let result = collector.wait_timeout(window).await;
    assert!(matches!(result, Err(PipelineError::DrainTimeout(w)) if w == window));
    drop(submitter);
}

#[tokio::test]
async fn test_closed_submitter_refuses_work() {
    let config = PipelineConfig::default().with_workers(2);
    let (submitter, collector) = Pipeline::spawn(&config, Predicate::new(|_: &u64| true)).unwrap();

    assert_eq!(submitter.worker_count(), 2);
    submitter.submit(1).await.unwrap();
    submitter.close().await.unwrap();

    let clone = submitter.clone();
    assert!(matches!(clone.submit(2).await, Err(PipelineError::Closed)));
    assert!(matches!(clone.close().await, Err(PipelineError::Closed)));

    let summary = collector.wait().await.unwrap();
    assert_eq!(summary.results.len(), 1);
    assert_eq!(summary.tokens.len(), 2);
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let config = PipelineConfig::default().with_workers(0);
    let result = Pipeline::spawn(&config, Predicate::new(|_: &u64| true));
    assert!(matches!(result, Err(PipelineError::Config(_))));
}
