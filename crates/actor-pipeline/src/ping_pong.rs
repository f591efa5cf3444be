//! # Ping-Pong Coordinator
//!
//! Two peers pass a counter back and forth over rendezvous channels. Every
//! receive and every send is individually raced against a deadline with
//! [`run_with_timeout`], which makes the rally a liveness harness for the timeout
//! race: as soon as one side runs out of rounds, the other side's next hand-off
//! cannot complete and it stalls once its deadline passes. The rally holds both
//! lines open until both peers are done, so leaving never ends the other peer's
//! wait early.
//!
//! The peer that stalls first "wins". There is no real game here; the winner is
//! simply whoever noticed the silence.
//!
//! ## Peer State Machine
//!
//! ```text
//! Idle -> AwaitingReceive -> Forwarding -> Idle     (repeated `rounds` times)
//!              |                  |
//!              +------------------+--> Terminated   (deadline or peer gone)
//! ```

use crate::config::RallyConfig;
use crate::error::{Disconnected, RaceError, RallyError};
use crate::rendezvous::{self, RendezvousReceiver, RendezvousSender};
use crate::timeout::run_with_timeout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    Idle,
    AwaitingReceive,
    Forwarding,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StallCause {
    /// The deadline won the race.
    TimedOut,
    /// The other peer has left the rally.
    PeerGone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerOutcome {
    /// Played every round.
    Completed,
    /// Stopped early while in `phase`.
    Stalled { phase: PeerState, cause: StallCause },
}

/// What one peer did during the rally.
#[derive(Debug, Clone)]
pub struct PeerReport {
    pub name: String,
    /// Rounds in which both the receive and the forward succeeded.
    pub rounds_completed: u32,
    pub last_received: Option<u64>,
    pub outcome: PeerOutcome,
    pub finished_at: Instant,
}

impl PeerReport {
    pub fn stalled(&self) -> bool {
        matches!(self.outcome, PeerOutcome::Stalled { .. })
    }
}

/// One side of the rally.
pub struct Peer {
    name: String,
    inbox: Arc<Mutex<RendezvousReceiver<u64>>>,
    outbox: RendezvousSender<u64>,
    rounds: u32,
    timeout: Duration,
    state: PeerState,
    rounds_completed: u32,
    last_received: Option<u64>,
}

impl Peer {
    pub fn new(
        name: impl Into<String>,
        inbox: RendezvousReceiver<u64>,
        outbox: RendezvousSender<u64>,
        rounds: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            // Shared so a receive can run as its own raced task.
            inbox: Arc::new(Mutex::new(inbox)),
            outbox,
            rounds,
            timeout,
            state: PeerState::Idle,
            rounds_completed: 0,
            last_received: None,
        }
    }

    pub fn state(&self) -> PeerState {
        self.state
    }

    /// Shared handle to this peer's inbox. Holding it keeps the line open after
    /// the peer has left.
    pub fn inbox(&self) -> Arc<Mutex<RendezvousReceiver<u64>>> {
        self.inbox.clone()
    }

    /// Plays up to `rounds` rounds: receive a value, forward value + 1 (wrapping).
    pub async fn run(mut self) -> PeerReport {
        for _ in 0..self.rounds {
            self.transition(PeerState::AwaitingReceive);
            let inbox = self.inbox.clone();
            let received = run_with_timeout(
                async move {
                    let mut receiver = inbox.lock().await;
                    receiver.recv().await
                },
                self.timeout,
            )
            .await;
            let value = match received {
                Ok(Some(value)) => value,
                Ok(None) => return self.stall(StallCause::PeerGone),
                Err(e) => return self.stall(cause_of(&e)),
            };
            self.last_received = Some(value);

            self.transition(PeerState::Forwarding);
            let outbox = self.outbox.clone();
            let next = value.wrapping_add(1);
            let sent = run_with_timeout(async move { outbox.send(next).await }, self.timeout).await;
            match sent {
                Ok(Ok(())) => {}
                Ok(Err(Disconnected)) => return self.stall(StallCause::PeerGone),
                Err(e) => return self.stall(cause_of(&e)),
            }

            debug!(peer = %self.name, value, next, "Returned");
            self.rounds_completed += 1;
            self.transition(PeerState::Idle);
        }

        info!(peer = %self.name, rounds = self.rounds_completed, "Played every round");
        self.finish(PeerOutcome::Completed)
    }

    fn transition(&mut self, next: PeerState) {
        debug!(peer = %self.name, from = ?self.state, to = ?next, "Transition");
        self.state = next;
    }

    fn stall(mut self, cause: StallCause) -> PeerReport {
        let phase = self.state;
        info!(peer = %self.name, ?phase, ?cause, rounds = self.rounds_completed, "Stalled, wins the rally");
        self.transition(PeerState::Terminated);
        self.finish(PeerOutcome::Stalled { phase, cause })
    }

    fn finish(self, outcome: PeerOutcome) -> PeerReport {
        PeerReport {
            name: self.name,
            rounds_completed: self.rounds_completed,
            last_received: self.last_received,
            outcome,
            finished_at: Instant::now(),
        }
    }
}

fn cause_of(error: &RaceError) -> StallCause {
    match error {
        RaceError::Elapsed(_) => StallCause::TimedOut,
        RaceError::Panicked(_) | RaceError::Cancelled => StallCause::PeerGone,
    }
}

/// Result of a whole rally.
#[derive(Debug, Clone)]
pub struct RallyReport {
    pub first: PeerReport,
    pub second: PeerReport,
}

impl RallyReport {
    /// The peer that stalled first, if either did.
    pub fn winner(&self) -> Option<&PeerReport> {
        match (self.first.stalled(), self.second.stalled()) {
            (true, true) if self.second.finished_at < self.first.finished_at => Some(&self.second),
            (true, _) => Some(&self.first),
            (false, true) => Some(&self.second),
            (false, false) => None,
        }
    }
}

/// Runs a two-peer rally.
pub struct Rally;

impl Rally {
    /// Wires the two peers together, serves `config.serve` to the first one and
    /// waits for both to finish.
    pub async fn play(config: &RallyConfig) -> Result<RallyReport, RallyError> {
        config.validate()?;
        let timeout = config.timeout();

        let (to_first, first_inbox) = rendezvous::channel();
        let (to_second, second_inbox) = rendezvous::channel();

        let first = Peer::new(
            config.first.name.clone(),
            first_inbox,
            to_second.clone(),
            config.first.rounds,
            timeout,
        );
        let second = Peer::new(
            config.second.name.clone(),
            second_inbox,
            to_first.clone(),
            config.second.rounds,
            timeout,
        );

        // Both lines stay open until both peers are done.
        let lines = (to_first.clone(), first.inbox(), to_second, second.inbox());

        info!(
            first = %config.first.name,
            second = %config.second.name,
            ?timeout,
            "Rally starting"
        );
        let first_handle = tokio::spawn(first.run());
        let second_handle = tokio::spawn(second.run());

        // With rendezvous channels somebody must be receiving before the serve
        // can complete.
        let serve = config.serve;
        let served = run_with_timeout(async move { to_first.send(serve).await }, timeout).await;
        match served {
            Ok(Ok(())) => debug!(serve, "Served"),
            Ok(Err(e)) => return Err(RallyError::ServeFailed(e.to_string())),
            Err(e) => return Err(RallyError::ServeFailed(e.to_string())),
        }

        let first = first_handle.await.map_err(|e| RallyError::PeerFailed {
            name: config.first.name.clone(),
            reason: e.to_string(),
        })?;
        let second = second_handle.await.map_err(|e| RallyError::PeerFailed {
            name: config.second.name.clone(),
            reason: e.to_string(),
        })?;
        drop(lines);

        let report = RallyReport { first, second };
        match report.winner() {
            Some(winner) => info!(winner = %winner.name, "Rally over"),
            None => info!("Rally over, nobody stalled"),
        }
        Ok(report)
    }
}
