#![allow(clippy::unwrap_used)]

use std::time::Duration;

use crate::{
    command::{CommandError, CommandOutput},
    confirm::{ConfirmationQueue, PendingAction},
};

fn action(prompt: &str, reply: &'static str) -> PendingAction {
    PendingAction::new(prompt, move || Ok(CommandOutput::from(reply)))
}

#[tokio::test]
async fn takes_actions_in_fifo_order() {
    let (queue, _expired) = ConfirmationQueue::new(Duration::from_secs(30));

    queue.register("alice", action("first?", "one")).await.unwrap();
    queue.register("alice", action("second?", "two")).await.unwrap();

    assert_eq!(queue.count_pending("alice").await.unwrap(), 2);

    let first = queue.take_next("alice").await.unwrap().unwrap();
    assert_eq!(first.prompt(), "first?");
    assert_eq!(first.run().unwrap().text(), "one");

    let second = queue.take_next("alice").await.unwrap().unwrap();
    assert_eq!(second.prompt(), "second?");

    assert!(queue.take_next("alice").await.unwrap().is_none());
    assert!(!queue.has_pending("alice").await.unwrap());
}

#[tokio::test]
async fn queues_are_per_sender() {
    let (queue, _expired) = ConfirmationQueue::new(Duration::from_secs(30));

    queue.register("alice", action("a?", "a")).await.unwrap();

    assert!(queue.has_pending("alice").await.unwrap());
    assert!(!queue.has_pending("bob").await.unwrap());
    assert!(queue.take_next("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn clear_drops_everything_for_sender() {
    let (queue, _expired) = ConfirmationQueue::new(Duration::from_secs(30));

    queue.register("alice", action("a?", "a")).await.unwrap();
    queue.register("alice", action("b?", "b")).await.unwrap();
    queue.register("bob", action("c?", "c")).await.unwrap();

    assert_eq!(queue.clear("alice").await.unwrap(), 2);
    assert_eq!(queue.count_pending("alice").await.unwrap(), 0);
    assert_eq!(queue.count_pending("bob").await.unwrap(), 1);
}

#[tokio::test]
async fn expired_actions_are_reported_and_removed() {
    let (queue, mut expired) = ConfirmationQueue::new(Duration::from_millis(50));

    queue.register("alice", action("delete world?", "gone")).await.unwrap();

    let notice = tokio::time::timeout(Duration::from_secs(5), expired.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(notice.sender, "alice");
    assert_eq!(notice.prompt, "delete world?");

    assert_eq!(queue.count_pending("alice").await.unwrap(), 0);
    assert!(queue.take_next("alice").await.unwrap().is_none());
}

#[tokio::test]
async fn taken_action_does_not_expire() {
    let (queue, mut expired) = ConfirmationQueue::new(Duration::from_millis(50));

    queue.register("alice", action("sure?", "yes")).await.unwrap();
    let taken = queue.take_next("alice").await.unwrap();
    assert!(taken.is_some());

    let notice = tokio::time::timeout(Duration::from_millis(200), expired.recv()).await;
    assert!(notice.is_err());
}

#[tokio::test]
async fn failing_action_reports_its_error() {
    let (queue, _expired) = ConfirmationQueue::new(Duration::from_secs(30));

    queue
        .register(
            "alice",
            PendingAction::new("risky?", || Err(CommandError::Failed("nope".to_string()))),
        )
        .await
        .unwrap();

    let pending = queue.take_next("alice").await.unwrap().unwrap();
    assert_eq!(pending.run().unwrap_err(), CommandError::Failed("nope".to_string()));
}
