use actor_pipeline::{PeerOutcome, TerminationPolicy};
use pipeline_sample::lifecycle::{System, SystemConfig, SystemError};

/// Full end-to-end run with the real monitor, pipeline and rally.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_full_system_integration() {
    actor_pipeline::tracing::try_setup_tracing();
    let system = System::start(SystemConfig::default()).expect("Failed to start system");

    // Account traffic
    let mut tasks = Vec::new();
    for _ in 0..100 {
        let account = system.account.clone();
        tasks.push(tokio::spawn(async move { account.deposit(2.0).await }));
    }
    for _ in 0..50 {
        let account = system.account.clone();
        tasks.push(tokio::spawn(async move { account.withdraw(1.0).await }));
    }
    for task in tasks {
        task.await.unwrap().expect("Failed to queue mutation");
    }

    // Prime filter
    let limit = system.config().prime_limit;
    let summary = system
        .run_prime_filter(limit)
        .await
        .expect("Failed to run pipeline");
    assert_eq!(summary.results.len(), 58);
    assert_eq!(summary.tokens.len(), 3);
    assert!(summary.failed_workers.is_empty());

    // Rally
    let report = system.play_rally().await.expect("Failed to play rally");
    assert_eq!(report.first.outcome, PeerOutcome::Completed);
    assert_eq!(report.winner().map(|w| w.name.as_str()), Some("Serena"));

    // Graceful shutdown drains and reports the final state
    let final_state = system.shutdown().await.expect("Failed to shutdown system");
    assert_eq!(final_state.balance, 10000.01 + 200.0 - 50.0);
    assert_eq!(final_state.deposits, 100);
    assert_eq!(final_state.withdrawals, 50);
}

#[tokio::test]
async fn test_first_token_policy_through_system() {
    let mut config = SystemConfig::default();
    config.pipeline.termination = TerminationPolicy::FirstToken;
    config.pipeline.worker_count = 4;

    let system = System::start(config).unwrap();
    let summary = system.run_prime_filter(200).await.unwrap();
    assert_eq!(summary.tokens.len(), 1);
    assert!(summary.results.len() <= 46);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_config_is_refused_at_start() {
    let mut config = SystemConfig::default();
    config.rally.second.name = config.rally.first.name.clone();

    assert!(matches!(
        System::start(config),
        Err(SystemError::Config(_))
    ));
}

#[tokio::test]
async fn test_config_from_toml() {
    let config = SystemConfig::from_toml_str(
        r#"
        initial_balance = 50.0
        prime_limit = 30

        [pipeline]
        worker_count = 2
        channel_capacity = 1
        "#,
    )
    .unwrap();

    let system = System::start(config).unwrap();
    system.account.deposit(5.0).await.unwrap();

    let summary = system.run_prime_filter(30).await.unwrap();
    assert_eq!(summary.results.len(), 10);
    assert_eq!(summary.tokens.len(), 2);

    assert_eq!(system.shutdown().await.unwrap().balance, 55.0);
}
