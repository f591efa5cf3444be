use actor_pipeline::{MonitorError, Resource, ResourceMonitor};

// --- Test Resource ---

#[derive(Debug)]
struct Ledger {
    entries: Vec<i64>,
    locked: bool,
}

#[derive(Debug)]
enum LedgerOp {
    Post(i64),
    Lock,
}

#[derive(Debug, thiserror::Error)]
#[error("Ledger is locked")]
struct LedgerLocked;

impl Resource for Ledger {
    type Mutation = LedgerOp;
    type Snapshot = (usize, i64);
    type Error = LedgerLocked;

    fn apply(&mut self, op: LedgerOp) -> Result<(), LedgerLocked> {
        if self.locked {
            return Err(LedgerLocked);
        }
        match op {
            LedgerOp::Post(amount) => self.entries.push(amount),
            LedgerOp::Lock => self.locked = true,
        }
        Ok(())
    }

    fn snapshot(&self) -> (usize, i64) {
        (self.entries.len(), self.entries.iter().sum())
    }
}

fn ledger() -> Ledger {
    Ledger {
        entries: Vec::new(),
        locked: false,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_monitor_full_lifecycle() {
    let (monitor, client) = ResourceMonitor::new(10, ledger());
    let handle = tokio::spawn(monitor.run());

    // 1. Fire-and-forget mutations are applied in order
    client.apply(LedgerOp::Post(10)).await.unwrap();
    client.apply(LedgerOp::Post(-4)).await.unwrap();

    // 2. A read sees everything queued before it
    assert_eq!(client.read().await.unwrap(), (2, 6));

    // 3. Rejections surface on the confirmed path
    client.apply_confirmed(LedgerOp::Lock).await.unwrap();
    let refused = client.apply_confirmed(LedgerOp::Post(1)).await;
    assert!(matches!(refused, Err(MonitorError::Rejected(_))));

    // 4. Stop returns the final state, and so does the task
    assert_eq!(client.stop().await.unwrap(), (2, 6));
    assert_eq!(handle.await.unwrap(), (2, 6));

    // 5. Nothing is accepted afterwards
    assert!(client.is_closed());
    assert!(matches!(
        client.apply(LedgerOp::Post(1)).await,
        Err(MonitorError::Closed)
    ));
    assert!(matches!(client.read().await, Err(MonitorError::Closed)));
}

#[tokio::test]
async fn test_stop_drains_requests_queued_before_it() {
    let (monitor, client) = ResourceMonitor::new(100, ledger());

    // Queue everything before the monitor even starts.
    for n in 1..=50 {
        client.apply(LedgerOp::Post(n)).await.unwrap();
    }
    let stopper = client.clone();
    let stop = tokio::spawn(async move { stopper.stop().await });
    tokio::task::yield_now().await;

    tokio::spawn(monitor.run());
    assert_eq!(stop.await.unwrap().unwrap(), (50, 1275));
}

#[tokio::test]
async fn test_second_stop_is_refused() {
    let (monitor, client) = ResourceMonitor::new(10, ledger());
    let first = client.clone();
    let second = client.clone();

    let a = tokio::spawn(async move { first.stop().await });
    let b = tokio::spawn(async move { second.stop().await });
    tokio::spawn(monitor.run());

    let outcomes = [a.await.unwrap(), b.await.unwrap()];
    let winners = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(MonitorError::Closed))));
}

#[tokio::test]
async fn test_monitor_ends_when_clients_are_dropped() {
    let (monitor, client) = ResourceMonitor::new(10, ledger());
    let handle = tokio::spawn(monitor.run());

    client.apply(LedgerOp::Post(7)).await.unwrap();
    drop(client);

    assert_eq!(handle.await.unwrap(), (1, 7));
}

#[tokio::test]
async fn test_concurrent_clients_lose_no_updates() {
    let (monitor, client) = ResourceMonitor::new(8, ledger());
    tokio::spawn(monitor.run());

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..100 {
                client.apply(LedgerOp::Post(1)).await.unwrap();
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    assert_eq!(client.stop().await.unwrap(), (1000, 1000));
}
