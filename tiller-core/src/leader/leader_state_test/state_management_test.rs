//! Leadership lifecycle: establishment, heartbeat driving, disposal and
//! step-down.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::sync::watch;
use tokio::time::sleep;

use super::log_with_tail;
use super::membership_of;
use super::quiet_replication;
use crate::ConsensusError;
use crate::Error;
use crate::LeaderState;
use crate::MockRaftLog;
use crate::MockReplicationCore;
use crate::NodeId;
use crate::PeerProgress;
use crate::RaftNodeConfig;
use crate::ReplicationConfig;
use crate::ReplicationError;
use crate::RoleEvent;
use crate::test_utils::mock_raft_context;
use tiller_proto::common::EntryKind;
use tiller_proto::replication::AppendEntriesResponse;

/// Becoming leader appends the term's no-op and initializes every peer's
/// progress one past the previous log tail.
///
/// # Scenario
/// - log tail at 5, voters {a, b, c}
/// - no-op assigned index 6, not enqueued (no completion to resolve)
/// - peers start at next_index 6 / match_index 0; the leader itself is
///   recorded at the no-op
#[tokio::test]
async fn test_establish_appends_noop_and_inits_progress() {
    // Arrange
    let (_shutdown_tx, shutdown_rx) = watch::channel(());
    let mut ctx = mock_raft_context("node-a", shutdown_rx);

    let mut raft_log = MockRaftLog::new();
    raft_log.expect_current_term().return_const(1u64);
    raft_log.expect_last_entry().returning(|| Some(crate::test_utils::noop_entry(5, 1)));
    raft_log.expect_entry().returning(|_| Ok(None));
    raft_log.expect_entries_after().returning(|_, _| Ok(vec![]));
    raft_log.expect_last_snapshot().returning(|| None);
    raft_log
        .expect_append_command()
        .withf(|kind, payload, term| {
            *kind == EntryKind::Noop && payload.is_empty() && *term == 1
        })
        .times(1)
        .returning(|_, _, _| Ok(6));
    ctx.storage.raft_log = Arc::new(raft_log);

    ctx.membership =
        Arc::new(membership_of(&["node-a", "node-b", "node-c"], &["node-b", "node-c"]));
    ctx.replication_handler = quiet_replication();
    let ctx = Arc::new(ctx);
    let (role_tx, _role_rx) = mpsc::unbounded_channel();

    // Act
    let leader = LeaderState::establish(&ctx, 0, role_tx).await.expect("establish");

    // Assert
    assert_eq!(leader.noop_index(), 6);
    assert_eq!(
        leader.progress().get(&NodeId::from("node-b")),
        Some(PeerProgress {
            next_index: 6,
            match_index: 0
        })
    );
    assert_eq!(
        leader.progress().get(&NodeId::from("node-c")),
        Some(PeerProgress {
            next_index: 6,
            match_index: 0
        })
    );
    assert_eq!(leader.progress().match_index(&NodeId::from("node-a")), Some(6));
    assert!(leader.pending().is_empty().await, "a no-op has no completion to queue");

    leader.dispose(&ctx).await;
}

/// The driver keeps fanning out until disposal, then stops within the
/// grace period.
#[tokio::test]
async fn test_dispose_stops_heartbeat_driver() {
    let (_shutdown_tx, shutdown_rx) = watch::channel(());
    let mut ctx = mock_raft_context("node-a", shutdown_rx);
    ctx.storage.raft_log = Arc::new(log_with_tail(0, 1));
    ctx.membership = Arc::new(membership_of(&["node-a", "node-b"], &["node-b"]));
    ctx.node_config = Arc::new(RaftNodeConfig {
        replication: ReplicationConfig {
            message_timeout_ms: 60,
            max_entries_per_request: 10,
        },
    });

    let rounds = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&rounds);
    let mut handler = MockReplicationCore::new();
    handler.expect_replicate_to_peer().returning(move |_, _, _, _| {
        counted.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    ctx.replication_handler = handler;

    let ctx = Arc::new(ctx);
    let (role_tx, _role_rx) = mpsc::unbounded_channel();
    let leader = LeaderState::establish(&ctx, 0, role_tx).await.expect("establish");

    sleep(Duration::from_millis(100)).await;
    assert!(rounds.load(Ordering::SeqCst) >= 2, "driver should fan out repeatedly");

    leader.dispose(&ctx).await;
    assert!(leader.is_disposed());

    let after_dispose = rounds.load(Ordering::SeqCst);
    sleep(Duration::from_millis(60)).await;
    assert_eq!(
        rounds.load(Ordering::SeqCst),
        after_dispose,
        "no fan-out after disposal"
    );
}

/// A response carrying a higher term retires this leader.
///
/// # Scenario (leader at term 7, response at term 9)
/// - the shared term adopts 9 and the responder's leader hint survives
/// - the local token trips, so no further messages leave this instance
#[tokio::test]
async fn test_step_down_on_higher_term_response() {
    let (_shutdown_tx, shutdown_rx) = watch::channel(());
    let mut ctx = mock_raft_context("node-a", shutdown_rx);
    ctx.storage.raft_log = Arc::new(log_with_tail(3, 7));
    ctx.membership = Arc::new(membership_of(&["node-a", "node-b"], &["node-b"]));
    ctx.replication_handler = quiet_replication();
    let ctx = Arc::new(ctx);
    let (role_tx, mut role_rx) = mpsc::unbounded_channel();

    let leader = LeaderState::establish(&ctx, 0, role_tx.clone()).await.expect("establish");
    assert_eq!(leader.current_term(), 7);

    leader
        .handle_append_entries_response(
            AppendEntriesResponse::higher_term("node-b", 9, "node-d"),
            &ctx,
            &role_tx,
        )
        .await;

    assert_eq!(leader.current_term(), 9);
    assert!(leader.is_disposed());

    let mut stepped_down = false;
    while let Ok(event) = role_rx.try_recv() {
        if let RoleEvent::BecomeFollower { term, leader_hint } = event {
            assert_eq!(term, 9);
            assert_eq!(leader_hint, Some(NodeId::from("node-d")));
            stepped_down = true;
        }
    }
    assert!(stepped_down, "BecomeFollower event expected");

    leader.dispose(&ctx).await;
}

#[tokio::test]
async fn test_propose_after_disposal_is_rejected() {
    let (_shutdown_tx, shutdown_rx) = watch::channel(());
    let ctx = Arc::new(mock_raft_context("node-a", shutdown_rx));
    let (role_tx, _role_rx) = mpsc::unbounded_channel();

    let leader = LeaderState::establish(&ctx, 0, role_tx.clone()).await.expect("establish");
    leader.dispose(&ctx).await;

    let result = leader
        .propose(&ctx, EntryKind::Command, Bytes::from_static(b"set x"), None, &role_tx)
        .await;

    assert!(matches!(
        result,
        Err(Error::Consensus(ConsensusError::Replication(ReplicationError::NotLeader)))
    ));
}

/// Timeout ticks received while leader only stamp the heartbeat clock.
#[tokio::test]
async fn test_heartbeat_timeout_stamps_clock() {
    let (_shutdown_tx, shutdown_rx) = watch::channel(());
    let ctx = Arc::new(mock_raft_context("node-a", shutdown_rx));
    let (role_tx, _role_rx) = mpsc::unbounded_channel();

    let leader = LeaderState::establish(&ctx, 0, role_tx).await.expect("establish");
    leader.on_heartbeat_timeout();

    assert!(leader.last_heartbeat_age() < Duration::from_secs(5));

    leader.dispose(&ctx).await;
}
