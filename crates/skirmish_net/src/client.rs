//! Background snapshot pump and the thin-client poll surface.
//!
//! [`SnapshotFeed`] owns the connection: a spawned task decodes frames
//! and publishes each snapshot through a watch channel, so the
//! simulation side never blocks on the socket and always sees the
//! newest complete snapshot (intermediate ones may be skipped). The
//! [`ThinClient`] polls the feed once per render tick and rebuilds its
//! match state wholesale.

use std::sync::Arc;

use tokio::io::AsyncRead;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use skirmish_core::defs::DefRegistry;
use skirmish_core::math::Bounds;
use skirmish_core::sim::Match;
use skirmish_core::snapshot::Snapshot;

use crate::codec;
use crate::error::NetError;

/// A background task decoding snapshot frames off a connection.
#[derive(Debug)]
pub struct SnapshotFeed {
    rx: watch::Receiver<Option<Arc<Snapshot>>>,
    task: JoinHandle<()>,
}

impl SnapshotFeed {
    /// Spawn the pump over any byte stream (a `TcpStream` in
    /// production, a duplex pipe in tests).
    #[must_use]
    pub fn spawn<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = watch::channel(None);
        let task = tokio::spawn(async move {
            let mut reader = reader;
            loop {
                match codec::read_frame::<_, Snapshot>(&mut reader).await {
                    Ok(snapshot) => {
                        if tx.send(Some(Arc::new(snapshot))).is_err() {
                            break;
                        }
                    }
                    Err(NetError::Closed) => {
                        tracing::debug!("snapshot stream closed by peer");
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "snapshot stream failed");
                        break;
                    }
                }
            }
        });
        Self { rx, task }
    }

    /// The newest complete snapshot received so far, if any.
    #[must_use]
    pub fn latest(&mut self) -> Option<Arc<Snapshot>> {
        self.rx.borrow_and_update().clone()
    }

    /// Whether the pump task is still running.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stop the pump.
    pub fn disconnect(&self) {
        self.task.abort();
    }
}

impl Drop for SnapshotFeed {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// A non-authoritative client match driven entirely by server
/// snapshots.
#[derive(Debug)]
pub struct ThinClient {
    sim: Match,
    feed: SnapshotFeed,
    last_applied: Option<u64>,
}

impl ThinClient {
    /// Create a client around an established feed. The definition
    /// registry must match the server's; records with unknown codes
    /// are skipped during rebuild.
    #[must_use]
    pub fn new(defs: DefRegistry, terrain: Bounds, feed: SnapshotFeed) -> Self {
        Self {
            sim: Match::new(defs, terrain),
            feed,
            last_applied: None,
        }
    }

    /// Apply the newest snapshot, if one has arrived since the last
    /// poll. Returns whether the match state changed.
    pub fn poll(&mut self) -> bool {
        let Some(snapshot) = self.feed.latest() else {
            return false;
        };
        if self.last_applied == Some(snapshot.tick) {
            return false;
        }
        self.sim.apply_snapshot(&snapshot);
        self.last_applied = Some(snapshot.tick);
        true
    }

    /// The client-side match state.
    #[must_use]
    pub fn sim(&self) -> &Match {
        &self.sim
    }

    /// Mutable match state (selection changes).
    pub fn sim_mut(&mut self) -> &mut Match {
        &mut self.sim
    }

    /// Whether the feed is still delivering.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.feed.is_connected()
    }

    /// Tear down the connection and drop all snapshot-derived state.
    pub fn disconnect(&mut self) {
        self.feed.disconnect();
        self.sim.clear_snapshot_state();
        self.last_applied = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::entity::Faction;
    use skirmish_core::math::Vec2;
    use skirmish_test_utils::fixtures;
    use std::time::Duration;

    async fn wait_for<F: FnMut() -> bool>(mut ready: F) {
        for _ in 0..200 {
            if ready() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    fn server_with_one_unit() -> Match {
        let mut server = fixtures::empty_match();
        server.spawn_unit(fixtures::RIFLEMAN, Faction::Player, Vec2::new(100.0, 100.0));
        server
    }

    #[tokio::test]
    async fn test_feed_publishes_newest_snapshot() {
        let (reader, mut writer) = tokio::io::duplex(64 * 1024);
        let mut feed = SnapshotFeed::spawn(reader);

        let server = server_with_one_unit();
        for tick in 1..=3u64 {
            let mut snapshot = server.capture_snapshot();
            snapshot.tick = tick;
            codec::write_frame(&mut writer, &snapshot).await.expect("write");
        }

        wait_for(|| feed.latest().map(|s| s.tick) == Some(3)).await;
    }

    #[tokio::test]
    async fn test_thin_client_rebuilds_from_feed() {
        let (reader, mut writer) = tokio::io::duplex(64 * 1024);
        let feed = SnapshotFeed::spawn(reader);
        let mut client = ThinClient::new(
            fixtures::test_registry(),
            Bounds::new(0.0, 0.0, 2000.0, 2000.0),
            feed,
        );

        let mut snapshot = server_with_one_unit().capture_snapshot();
        snapshot.tick = 1;
        codec::write_frame(&mut writer, &snapshot).await.expect("write");

        wait_for(|| client.poll()).await;
        assert_eq!(client.sim().units().len(), 1);

        // Same tick again: no re-apply.
        assert!(!client.poll());
    }

    #[tokio::test]
    async fn test_disconnect_clears_snapshot_state() {
        let (reader, mut writer) = tokio::io::duplex(64 * 1024);
        let feed = SnapshotFeed::spawn(reader);
        let mut client = ThinClient::new(
            fixtures::test_registry(),
            Bounds::new(0.0, 0.0, 2000.0, 2000.0),
            feed,
        );

        let mut snapshot = server_with_one_unit().capture_snapshot();
        snapshot.tick = 1;
        codec::write_frame(&mut writer, &snapshot).await.expect("write");
        wait_for(|| client.poll()).await;

        client.disconnect();
        assert!(client.sim().units().is_empty());
        wait_for(|| !client.is_connected()).await;
    }

    #[tokio::test]
    async fn test_feed_stops_on_peer_close() {
        let (reader, writer) = tokio::io::duplex(1024);
        let feed = SnapshotFeed::spawn(reader);
        drop(writer);
        wait_for(|| !feed.is_connected()).await;
    }
}
