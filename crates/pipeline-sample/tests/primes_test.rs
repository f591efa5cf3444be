use actor_pipeline::{generate, Pipeline, PipelineConfig, TerminationToken, WorkerExit};
use pipeline_sample::primes::{is_prime, PrimeFilter};
use std::collections::HashMap;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_prime_pipeline_finds_every_prime() {
    let config = PipelineConfig::default().with_workers(3);
    let (submitter, collector) =
        Pipeline::spawn(&config, PrimeFilter::new(Duration::from_millis(1))).unwrap();

    let generator = tokio::spawn(generate(submitter, 0..272u64, Duration::from_millis(10)));
    let summary = collector
        .wait_timeout(Duration::from_secs(10))
        .await
        .unwrap();
    assert_eq!(generator.await.unwrap().unwrap(), 272);

    let mut primes: Vec<u64> = summary.results.iter().map(|r| r.payload).collect();
    primes.sort_unstable();
    let expected: Vec<u64> = (0..272).filter(|&n| is_prime(n)).collect();
    assert_eq!(primes.len(), 58);
    assert_eq!(primes, expected);

    // Valid worker ids, strictly increasing sequence per worker.
    let mut last_seq: HashMap<u32, u64> = HashMap::new();
    for result in &summary.results {
        let assignment = result.assignment.expect("results carry their worker");
        assert!(assignment.worker.0 < 3);
        if let Some(previous) = last_seq.insert(assignment.worker.0, assignment.worker_seq) {
            assert!(assignment.worker_seq > previous);
        }
    }

    assert_eq!(summary.tokens.len(), 3);
    assert!(summary.tokens.iter().all(|t| matches!(
        t,
        TerminationToken::WorkerExited {
            exit: WorkerExit::Completed,
            ..
        }
    )));
}

#[tokio::test]
async fn test_single_worker_preserves_input_order() {
    let config = PipelineConfig::default().with_workers(1).with_capacity(1);
    let (submitter, collector) = Pipeline::spawn(&config, PrimeFilter::default()).unwrap();

    tokio::spawn(generate(submitter, 0..100u64, Duration::ZERO));
    let summary = collector.wait().await.unwrap();

    let primes: Vec<u64> = summary.results.iter().map(|r| r.payload).collect();
    let mut sorted = primes.clone();
    sorted.sort_unstable();
    assert_eq!(primes, sorted);
    assert_eq!(primes.len(), 25);
}
