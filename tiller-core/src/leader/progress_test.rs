//! Progress table invariants and snapshot session bookkeeping.

use tokio::sync::oneshot;

use crate::NodeId;
use crate::PeerProgress;
use crate::ProgressTracker;

#[test]
fn test_initialize_points_peers_past_log_tail() {
    let tracker = ProgressTracker::new();

    tracker.initialize(5, [NodeId::from("node-b"), NodeId::from("node-c")]);

    for peer in ["node-b", "node-c"] {
        let progress = tracker.get(&NodeId::from(peer)).expect("initialized");
        assert_eq!(
            progress,
            PeerProgress {
                next_index: 6,
                match_index: 0
            }
        );
        // match_index <= next_index - 1 and next_index >= 1 from the start.
        assert!(progress.match_index <= progress.next_index - 1);
        assert!(progress.next_index >= 1);
    }
}

#[test]
fn test_record_success_tracks_confirmed_tail() {
    let tracker = ProgressTracker::new();
    let peer = NodeId::from("node-b");

    tracker.record_success(&peer, 9);

    assert_eq!(
        tracker.get(&peer),
        Some(PeerProgress {
            next_index: 10,
            match_index: 9
        })
    );
}

#[test]
fn test_record_rejection_walks_back_and_clamps_at_one() {
    let tracker = ProgressTracker::new();
    let peer = NodeId::from("node-b");
    tracker.initialize(1, [peer.clone()]);
    assert_eq!(tracker.next_index(&peer), Some(2));

    tracker.record_rejection(&peer);
    assert_eq!(tracker.next_index(&peer), Some(1));

    tracker.record_rejection(&peer);
    assert_eq!(tracker.next_index(&peer), Some(1), "next_index never drops below 1");
}

#[test]
fn test_rejection_for_unknown_peer_starts_at_floor() {
    let tracker = ProgressTracker::new();
    let peer = NodeId::from("node-x");

    tracker.record_rejection(&peer);

    assert_eq!(
        tracker.get(&peer),
        Some(PeerProgress {
            next_index: 1,
            match_index: 0
        })
    );
}

#[test]
fn test_peer_identity_is_case_insensitive() {
    let tracker = ProgressTracker::new();

    tracker.record_success(&NodeId::from("Node-B"), 4);

    assert_eq!(tracker.match_index(&NodeId::from("node-b")), Some(4));
}

#[test]
fn test_match_indexes_snapshot() {
    let tracker = ProgressTracker::new();
    tracker.record_success(&NodeId::from("node-b"), 4);
    tracker.record_success(&NodeId::from("node-c"), 7);

    let matches = tracker.match_indexes();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches.get(&NodeId::from("node-b")), Some(&4));
    assert_eq!(matches.get(&NodeId::from("node-c")), Some(&7));
}

/// A prepared session keeps the peer in-flight and runs only once started.
#[tokio::test]
async fn test_prepared_snapshot_runs_when_authorised() {
    let tracker = ProgressTracker::new();
    let peer = NodeId::from("node-c");
    let (done_tx, done_rx) = oneshot::channel();

    tracker.begin_snapshot(
        peer.clone(),
        Box::pin(async move {
            let _ = done_tx.send(());
        }),
    );
    assert!(tracker.snapshot_in_flight(&peer));

    assert!(tracker.start_prepared(&peer));
    done_rx.await.expect("armed transfer should run once authorised");

    // Clearing the session is the transfer's own responsibility; a raw
    // task leaves the peer in-flight.
    assert!(tracker.snapshot_in_flight(&peer));
    assert!(!tracker.start_prepared(&peer), "already streaming");
}

#[tokio::test]
async fn test_start_prepared_without_session_is_noop() {
    let tracker = ProgressTracker::new();

    assert!(!tracker.start_prepared(&NodeId::from("node-c")));
}

#[tokio::test]
async fn test_finish_snapshot_discards_prepared_transfer() {
    let tracker = ProgressTracker::new();
    let peer = NodeId::from("node-c");
    let (done_tx, done_rx) = oneshot::channel::<()>();

    tracker.begin_snapshot(
        peer.clone(),
        Box::pin(async move {
            let _ = done_tx.send(());
        }),
    );
    tracker.finish_snapshot(&peer);

    assert!(!tracker.snapshot_in_flight(&peer));
    // The armed task was dropped, never run.
    assert!(done_rx.await.is_err());
}

#[tokio::test]
async fn test_abandon_snapshots_drops_all_sessions() {
    let tracker = ProgressTracker::new();
    let (done_tx, done_rx) = oneshot::channel::<()>();
    tracker.begin_snapshot(
        NodeId::from("node-b"),
        Box::pin(async move {
            let _ = done_tx.send(());
        }),
    );
    tracker.begin_snapshot(NodeId::from("node-c"), Box::pin(async {}));

    tracker.abandon_snapshots();

    assert!(!tracker.snapshot_in_flight(&NodeId::from("node-b")));
    assert!(!tracker.snapshot_in_flight(&NodeId::from("node-c")));
    assert!(done_rx.await.is_err());
}
