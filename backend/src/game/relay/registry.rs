use super::peer::{DeliveryError, Peer, PeerId};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// The set of connected peers.
///
/// Every membership change and every fan-out happens under one mutex, so a
/// broadcast never sees a half-updated set. Delivery only enqueues onto each
/// peer's bounded outbound queue, so the lock is never held across I/O.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: Mutex<HashMap<PeerId, Peer>>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn peers(&self) -> MutexGuard<'_, HashMap<PeerId, Peer>> {
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, peer: Peer) {
        let id = peer.id();
        let mut peers = self.peers();
        peers.insert(id, peer);
        debug!(%id, peers = peers.len(), "Registered peer");
    }

    /// Remove a peer. Returns false if it was already gone.
    pub fn remove(&self, id: PeerId) -> bool {
        let mut peers = self.peers();
        let removed = peers.remove(&id).is_some();
        if removed {
            debug!(%id, peers = peers.len(), "Deregistered peer");
        }
        removed
    }

    pub fn contains(&self, id: PeerId) -> bool {
        self.peers().contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.peers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers().is_empty()
    }

    /// Deliver `frame` to every peer except `sender`.
    ///
    /// A peer whose queue is full or closed is evicted; the others still get
    /// the frame. Returns how many peers the frame was queued for.
    pub fn broadcast_except(&self, sender: PeerId, frame: &str) -> usize {
        let mut delivered = 0;
        self.peers().retain(|id, peer| {
            if *id == sender {
                return true;
            }
            match peer.try_deliver(frame.to_string()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(err) => {
                    log_eviction(*id, &err);
                    false
                }
            }
        });
        delivered
    }

    /// Deliver `frame` to a single peer, evicting it on failure
    pub fn send_to(&self, id: PeerId, frame: String) -> bool {
        let mut peers = self.peers();
        let Some(peer) = peers.get(&id) else {
            debug!(%id, "Peer already gone, dropping frame");
            return false;
        };
        match peer.try_deliver(frame) {
            Ok(()) => true,
            Err(err) => {
                log_eviction(id, &err);
                peers.remove(&id);
                false
            }
        }
    }
}

fn log_eviction(id: PeerId, err: &DeliveryError) {
    match err {
        DeliveryError::Full => warn!(%id, %err, "Evicting slow peer"),
        DeliveryError::Closed => info!(%id, %err, "Evicting closed peer"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn register(registry: &PeerRegistry, capacity: usize) -> (PeerId, mpsc::Receiver<String>) {
        let (peer, rx) = Peer::new(capacity);
        let id = peer.id();
        registry.add(peer);
        (id, rx)
    }

    #[test]
    fn add_and_remove() {
        let registry = PeerRegistry::new();
        let (id, _rx) = register(&registry, 4);

        assert!(registry.contains(id));
        assert_eq!(registry.len(), 1);

        assert!(registry.remove(id));
        assert!(!registry.contains(id));
        assert!(registry.is_empty());
    }

    #[test]
    fn double_remove_is_noop() {
        let registry = PeerRegistry::new();
        let (id, _rx) = register(&registry, 4);

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
    }

    #[test]
    fn broadcast_reaches_everyone_but_sender() {
        let registry = PeerRegistry::new();
        let (sender, mut sender_rx) = register(&registry, 4);
        let mut others: Vec<_> = (0..3).map(|_| register(&registry, 4)).collect();

        let delivered = registry.broadcast_except(sender, "DRAW:1,2,3,4");
        assert_eq!(delivered, 3);

        for (_, rx) in others.iter_mut() {
            assert_eq!(rx.try_recv().unwrap(), "DRAW:1,2,3,4");
            assert!(rx.try_recv().is_err());
        }
        assert!(sender_rx.try_recv().is_err());
    }

    #[test]
    fn broadcast_preserves_sender_order() {
        let registry = PeerRegistry::new();
        let (sender, _sender_rx) = register(&registry, 8);
        let (_, mut rx) = register(&registry, 8);

        for i in 0..5 {
            registry.broadcast_except(sender, &format!("DRAW:{i},0,0,0"));
        }
        for i in 0..5 {
            assert_eq!(rx.try_recv().unwrap(), format!("DRAW:{i},0,0,0"));
        }
    }

    #[test]
    fn closed_peer_is_evicted_without_affecting_others() {
        let registry = PeerRegistry::new();
        let (sender, _sender_rx) = register(&registry, 4);
        let (gone, gone_rx) = register(&registry, 4);
        let (_, mut alive_rx) = register(&registry, 4);

        drop(gone_rx);

        let delivered = registry.broadcast_except(sender, "DRAW:1,1,2,2");
        assert_eq!(delivered, 1);
        assert_eq!(alive_rx.try_recv().unwrap(), "DRAW:1,1,2,2");
        assert!(!registry.contains(gone));

        // Later broadcasts exclude it, and the handler's own remove is a no-op
        assert_eq!(registry.broadcast_except(sender, "DRAW:2,2,3,3"), 1);
        assert!(!registry.remove(gone));
    }

    #[test]
    fn slow_peer_is_evicted_when_queue_fills() {
        let registry = PeerRegistry::new();
        let (sender, _sender_rx) = register(&registry, 4);
        let (slow, _slow_rx) = register(&registry, 1);
        let (_, mut fast_rx) = register(&registry, 4);

        registry.broadcast_except(sender, "DRAW:0,0,0,0");
        registry.broadcast_except(sender, "DRAW:1,1,1,1");

        assert!(!registry.contains(slow));
        assert_eq!(fast_rx.try_recv().unwrap(), "DRAW:0,0,0,0");
        assert_eq!(fast_rx.try_recv().unwrap(), "DRAW:1,1,1,1");
    }

    #[test]
    fn send_to_targets_one_peer() {
        let registry = PeerRegistry::new();
        let (a, mut a_rx) = register(&registry, 4);
        let (_, mut b_rx) = register(&registry, 4);

        assert!(registry.send_to(a, "RESULT:WRONG".to_string()));
        assert_eq!(a_rx.try_recv().unwrap(), "RESULT:WRONG");
        assert!(b_rx.try_recv().is_err());
    }

    #[test]
    fn send_to_missing_peer_is_dropped() {
        let registry = PeerRegistry::new();
        let (a, _rx) = register(&registry, 4);
        registry.remove(a);

        assert!(!registry.send_to(a, "RESULT:CORRECT".to_string()));
    }

    #[test]
    fn concurrent_membership_changes_stay_consistent() {
        use std::sync::Arc;
        use std::thread;

        let registry = Arc::new(PeerRegistry::new());
        let (sender, _sender_rx) = register(&registry, 4);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        let (peer, _rx) = Peer::new(4);
                        let id = peer.id();
                        registry.add(peer);
                        registry.broadcast_except(sender, "DRAW:1,2,3,4");
                        registry.remove(id);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 1);
        assert!(registry.contains(sender));
    }
}
