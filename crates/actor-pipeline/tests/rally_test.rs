use actor_pipeline::{PeerConfig, PeerOutcome, PeerState, Rally, RallyConfig, StallCause};

const TIMED_OUT_FORWARDING: PeerOutcome = PeerOutcome::Stalled {
    phase: PeerState::Forwarding,
    cause: StallCause::TimedOut,
};

fn rally(first: u32, second: u32, timeout_ms: u64) -> RallyConfig {
    RallyConfig {
        first: PeerConfig {
            name: "left".into(),
            rounds: first,
        },
        second: PeerConfig {
            name: "right".into(),
            rounds: second,
        },
        timeout_ms,
        serve: 100,
    }
}

#[tokio::test]
async fn test_default_rally_has_a_winner() {
    let report = Rally::play(&RallyConfig::default()).await.unwrap();
    assert_eq!(report.first.outcome, PeerOutcome::Completed);
    assert_eq!(report.second.outcome, TIMED_OUT_FORWARDING);
    assert_eq!(report.winner().unwrap().name, "Serena");
}

#[tokio::test]
async fn test_longer_first_peer_wins() {
    let report = Rally::play(&rally(6, 3, 50)).await.unwrap();

    assert_eq!(report.second.outcome, PeerOutcome::Completed);
    assert_eq!(report.second.rounds_completed, 3);
    // Three full rounds, then the fourth serve-back goes unanswered.
    assert_eq!(report.first.rounds_completed, 3);
    assert_eq!(report.first.last_received, Some(106));
    assert_eq!(report.first.outcome, TIMED_OUT_FORWARDING);
    assert_eq!(report.winner().unwrap().name, "left");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_many_concurrent_rallies_all_terminate() {
    let mut games = Vec::new();
    for n in 1..=20u32 {
        games.push(tokio::spawn(async move {
            Rally::play(&rally(n, n + 5, 100)).await
        }));
    }

    for game in games {
        let report = game.await.unwrap().unwrap();
        assert!(report.winner().is_some());
        assert_eq!(report.first.outcome, PeerOutcome::Completed);
        assert_eq!(report.second.outcome, TIMED_OUT_FORWARDING);
    }
}
