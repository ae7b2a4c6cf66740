use std::fmt;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::errors::HelperError;

pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_millis(250);

const INITIAL_BACKOFF: Duration = Duration::from_micros(50);
const MAX_BACKOFF: Duration = Duration::from_millis(10);

/// How a send behaves when the channel has no free capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendPolicy {
    /// Give up immediately
    DropOnFull,
    /// Wait until the consumer frees a slot.
    ///
    /// Sends go through `blocking_send`, which panics when called from a
    /// thread driving an async runtime. Render on a plain thread or inside
    /// `tokio::task::spawn_blocking` when using this policy.
    Block,
    /// Keep retrying until the deadline, then give up
    Timeout(Duration),
}

impl Default for SendPolicy {
    fn default() -> Self {
        SendPolicy::Timeout(DEFAULT_SEND_TIMEOUT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    Full,
    Closed,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::Full => f.write_str("full"),
            DropReason::Closed => f.write_str("closed"),
        }
    }
}

/// An error that could not be delivered, handed back to the sender
#[derive(Debug, Error)]
#[error("error channel {reason}: {error}")]
pub struct Undelivered {
    pub reason: DropReason,
    pub error: HelperError,
}

/// Send side of a caller-owned conduit for handled errors
///
/// The receiver stays with the caller, who is responsible for draining it
/// for as long as renders may fail. This side never reads or closes it.
#[derive(Debug, Clone)]
pub struct ErrorChannel {
    sender: mpsc::Sender<HelperError>,
    policy: SendPolicy,
}

impl ErrorChannel {
    pub fn new(sender: mpsc::Sender<HelperError>, policy: SendPolicy) -> Self {
        Self { sender, policy }
    }

    /// Create a channel with `capacity` slots and return the receiver with it
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn bounded(
        capacity: usize,
        policy: SendPolicy,
    ) -> (Self, mpsc::Receiver<HelperError>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self::new(tx, policy), rx)
    }

    pub fn policy(&self) -> SendPolicy {
        self.policy
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Deliver `error` according to the send policy
    pub fn send(&self, error: HelperError) -> Result<(), Undelivered> {
        match self.policy {
            SendPolicy::DropOnFull => self.sender.try_send(error).map_err(undelivered),
            SendPolicy::Block => self.sender.blocking_send(error).map_err(|e| Undelivered {
                reason: DropReason::Closed,
                error: e.0,
            }),
            SendPolicy::Timeout(timeout) => self.send_until(error, Instant::now() + timeout),
        }
    }

    fn send_until(&self, error: HelperError, deadline: Instant) -> Result<(), Undelivered> {
        let mut pending = error;
        let mut backoff = INITIAL_BACKOFF;

        loop {
            match self.sender.try_send(pending) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Full(error)) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(Undelivered {
                            reason: DropReason::Full,
                            error,
                        });
                    }
                    pending = error;
                    thread::sleep(backoff.min(deadline - now));
                    backoff = (backoff * 2).min(MAX_BACKOFF);
                }
                Err(closed) => return Err(undelivered(closed)),
            }
        }
    }
}

fn undelivered(err: TrySendError<HelperError>) -> Undelivered {
    match err {
        TrySendError::Full(error) => Undelivered {
            reason: DropReason::Full,
            error,
        },
        TrySendError::Closed(error) => Undelivered {
            reason: DropReason::Closed,
            error,
        },
    }
}
