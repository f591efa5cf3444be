//! # Rendezvous Channel
//!
//! An unbuffered hand-off: `send` completes only once the receiver has taken the
//! value. Tokio channels always buffer at least one message, so the hand-off is
//! built from a capacity-one mpsc channel plus a oneshot acknowledgement, the same
//! request/`respond_to` pairing the monitor uses.

use crate::error::Disconnected;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
struct Handoff<T> {
    value: T,
    taken: oneshot::Sender<()>,
}

/// Creates a connected sender/receiver pair.
pub fn channel<T: Send>() -> (RendezvousSender<T>, RendezvousReceiver<T>) {
    let (sender, receiver) = mpsc::channel(1);
    (
        RendezvousSender { inner: sender },
        RendezvousReceiver { inner: receiver },
    )
}

/// Sending half. Cheap to clone.
#[derive(Debug)]
pub struct RendezvousSender<T> {
    inner: mpsc::Sender<Handoff<T>>,
}

impl<T> Clone for RendezvousSender<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Send> RendezvousSender<T> {
    /// Hands `value` over and waits until the receiver has taken it.
    ///
    /// Fails with [`Disconnected`] if the receiver is dropped first, including
    /// while the value is parked in the channel.
    pub async fn send(&self, value: T) -> Result<(), Disconnected> {
        let (taken, ack) = oneshot::channel();
        self.inner
            .send(Handoff { value, taken })
            .await
            .map_err(|_| Disconnected)?;
        ack.await.map_err(|_| Disconnected)
    }
}

/// Receiving half.
#[derive(Debug)]
pub struct RendezvousReceiver<T> {
    inner: mpsc::Receiver<Handoff<T>>,
}

impl<T: Send> RendezvousReceiver<T> {
    /// Takes the next value, releasing its sender. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<T> {
        let handoff = self.inner.recv().await?;
        let _ = handoff.taken.send(());
        Some(handoff.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_send_waits_for_receiver() {
        let (tx, mut rx) = channel::<u32>();
        let send = tokio::spawn(async move { tx.send(7).await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!send.is_finished(), "send completed with nobody receiving");

        assert_eq!(rx.recv().await, Some(7));
        assert_eq!(send.await.unwrap(), Ok(()));
    }

    #[tokio::test]
    async fn test_send_fails_when_receiver_dropped() {
        let (tx, rx) = channel::<u32>();
        let send = tokio::spawn(async move { tx.send(1).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(rx);
        assert_eq!(send.await.unwrap(), Err(Disconnected));
    }

    #[tokio::test]
    async fn test_recv_ends_when_senders_dropped() {
        let (tx, mut rx) = channel::<u32>();
        drop(tx);
        assert_eq!(rx.recv().await, None);
    }
}
