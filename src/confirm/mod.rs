//! Queue of actions waiting for a sender's confirmation.
//!
//! A command that needs confirmation returns
//! [`CommandOutput::Confirmation`](crate::command::CommandOutput::Confirmation).
//! The host registers the [`PendingAction`] here; the sender later confirms
//! it (usually with a `confirm` command) or lets it expire.
//!
//! A single actor task owns every queue together with its deadlines, so
//! enqueueing a confirmation and scheduling its timeout happen as one step,
//! and so do taking it and cancelling the timeout.

#[cfg(test)]
mod tests;

use std::{
    collections::{HashMap, VecDeque},
    fmt,
    sync::Arc,
    time::Duration,
};

use tokio::{
    sync::{
        mpsc::{self, Receiver, Sender},
        oneshot,
    },
    task::JoinHandle,
    time::{Instant, sleep_until},
};
use tracing::{debug, warn};

use crate::{CmdTreeError, Result, command::CommandResult};

/// An action to run once the sender confirms it.
pub struct PendingAction {
    prompt: String,
    action: Box<dyn FnOnce() -> CommandResult + Send>,
}

impl PendingAction {
    /// Creates an action with the prompt shown to the sender.
    pub fn new(
        prompt: impl Into<String>,
        action: impl FnOnce() -> CommandResult + Send + 'static,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            action: Box::new(action),
        }
    }

    /// The message asking for confirmation.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Runs the action.
    ///
    /// # Errors
    ///
    /// Whatever the action returns.
    pub fn run(self) -> CommandResult {
        (self.action)()
    }
}

impl fmt::Debug for PendingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingAction")
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

/// Notification that a confirmation timed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationExpired {
    /// Name of the sender who did not confirm.
    pub sender: String,
    /// Prompt of the expired action.
    pub prompt: String,
}

/// Commands sent to the confirmation actor
enum ConfirmCommand {
    Register {
        sender: String,
        action: PendingAction,
    },
    Count {
        sender: String,
        reply: oneshot::Sender<usize>,
    },
    TakeNext {
        sender: String,
        reply: oneshot::Sender<Option<PendingAction>>,
    },
    Clear {
        sender: String,
        reply: oneshot::Sender<usize>,
    },
}

struct Pending {
    action: PendingAction,
    deadline: Instant,
}

/// Handle to the confirmation actor.
///
/// Cheap to clone; all clones talk to the same task. The task stops once
/// every handle is dropped.
#[derive(Clone)]
pub struct ConfirmationQueue {
    command_tx: Sender<ConfirmCommand>,
    timeout: Duration,
    _handle: Arc<JoinHandle<()>>,
}

impl fmt::Debug for ConfirmationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationQueue")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn unavailable() -> CmdTreeError {
    CmdTreeError::ServiceUnavailable {
        service: "confirm".to_string(),
        details: "Confirmation queue is not running".to_string(),
    }
}

impl ConfirmationQueue {
    /// Starts the actor. Expired confirmations are reported on the returned
    /// receiver.
    ///
    /// Must be called inside a tokio runtime.
    pub fn new(timeout: Duration) -> (Self, Receiver<ConfirmationExpired>) {
        let (command_tx, command_rx) = mpsc::channel(100);
        let (expired_tx, expired_rx) = mpsc::channel(100);

        let handle = tokio::spawn(async move {
            confirm_actor_loop(command_rx, expired_tx, timeout).await;
        });

        let queue = Self {
            command_tx,
            timeout,
            _handle: Arc::new(handle),
        };
        (queue, expired_rx)
    }

    /// How long a confirmation waits before expiring.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn send(&self, command: ConfirmCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| unavailable())
    }

    /// Queues `action` for `sender` and starts its timeout.
    ///
    /// # Errors
    /// Returns `CmdTreeError::ServiceUnavailable` if the actor stopped.
    pub async fn register(&self, sender: &str, action: PendingAction) -> Result<()> {
        self.send(ConfirmCommand::Register {
            sender: sender.to_string(),
            action,
        })
        .await
    }

    /// Number of actions waiting for `sender`.
    ///
    /// # Errors
    /// Returns `CmdTreeError::ServiceUnavailable` if the actor stopped.
    pub async fn count_pending(&self, sender: &str) -> Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.send(ConfirmCommand::Count {
            sender: sender.to_string(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| unavailable())
    }

    /// Whether anything waits for `sender`.
    ///
    /// # Errors
    /// Returns `CmdTreeError::ServiceUnavailable` if the actor stopped.
    pub async fn has_pending(&self, sender: &str) -> Result<bool> {
        Ok(self.count_pending(sender).await? > 0)
    }

    /// Removes the oldest action of `sender` and cancels its timeout.
    ///
    /// # Errors
    /// Returns `CmdTreeError::ServiceUnavailable` if the actor stopped.
    pub async fn take_next(&self, sender: &str) -> Result<Option<PendingAction>> {
        let (reply, rx) = oneshot::channel();
        self.send(ConfirmCommand::TakeNext {
            sender: sender.to_string(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| unavailable())
    }

    /// Drops every action of `sender`, returning how many there were.
    ///
    /// # Errors
    /// Returns `CmdTreeError::ServiceUnavailable` if the actor stopped.
    pub async fn clear(&self, sender: &str) -> Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.send(ConfirmCommand::Clear {
            sender: sender.to_string(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| unavailable())
    }
}

fn next_deadline(queues: &HashMap<String, VecDeque<Pending>>) -> Option<Instant> {
    queues
        .values()
        .filter_map(|queue| queue.front().map(|pending| pending.deadline))
        .min()
}

fn expire(
    queues: &mut HashMap<String, VecDeque<Pending>>,
    expired_tx: &Sender<ConfirmationExpired>,
    now: Instant,
) {
    for (sender, queue) in queues.iter_mut() {
        while queue.front().is_some_and(|pending| pending.deadline <= now) {
            let Some(pending) = queue.pop_front() else {
                break;
            };
            debug!(sender = %sender, prompt = pending.action.prompt(), "Confirmation timed out");
            let notice = ConfirmationExpired {
                sender: sender.clone(),
                prompt: pending.action.prompt,
            };
            if expired_tx.try_send(notice).is_err() {
                warn!(sender = %sender, "Dropped confirmation expiry notice");
            }
        }
    }
    queues.retain(|_, queue| !queue.is_empty());
}

/// The actor loop owning all pending confirmations.
///
/// Commands are processed one at a time; between commands the loop sleeps
/// until the earliest deadline.
async fn confirm_actor_loop(
    mut command_rx: Receiver<ConfirmCommand>,
    expired_tx: Sender<ConfirmationExpired>,
    timeout: Duration,
) {
    let mut queues: HashMap<String, VecDeque<Pending>> = HashMap::new();

    loop {
        let command = match next_deadline(&queues) {
            Some(deadline) => {
                tokio::select! {
                    command = command_rx.recv() => command,
                    () = sleep_until(deadline) => {
                        expire(&mut queues, &expired_tx, Instant::now());
                        continue;
                    }
                }
            }
            None => command_rx.recv().await,
        };

        let Some(command) = command else {
            break;
        };
        expire(&mut queues, &expired_tx, Instant::now());

        match command {
            ConfirmCommand::Register { sender, action } => {
                debug!(sender = %sender, prompt = action.prompt(), "Confirmation registered");
                queues.entry(sender).or_default().push_back(Pending {
                    action,
                    deadline: Instant::now() + timeout,
                });
            }

            ConfirmCommand::Count { sender, reply } => {
                let count = queues.get(&sender).map_or(0, VecDeque::len);
                let _ = reply.send(count);
            }

            ConfirmCommand::TakeNext { sender, reply } => {
                let next = queues.get_mut(&sender).and_then(VecDeque::pop_front);
                if queues.get(&sender).is_some_and(VecDeque::is_empty) {
                    queues.remove(&sender);
                }
                let _ = reply.send(next.map(|pending| pending.action));
            }

            ConfirmCommand::Clear { sender, reply } => {
                let removed = queues.remove(&sender).map_or(0, |queue| queue.len());
                let _ = reply.send(removed);
            }
        }
    }
}
