//! Network client collaborators
//!
//! The browser needs two things from the rest of the system besides the
//! catalog: a registry telling it which players are online and what media
//! they hold, and a dispatcher that asks a player to load a track.

use crate::types::{ItemId, PlayerNumber, Slot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Media summary reported by a player for one slot
///
/// Every field is optional because players fill these in lazily.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaInfo {
    pub name: Option<String>,
    pub track_count: Option<u32>,
    pub playlist_count: Option<u32>,
    pub bytes_total: Option<u64>,
    pub bytes_free: Option<u64>,
}

/// Contents of one media slot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SlotStatus {
    #[default]
    Empty,
    Loaded(MediaInfo),
}

impl SlotStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, SlotStatus::Loaded(_))
    }

    pub fn info(&self) -> Option<&MediaInfo> {
        match self {
            SlotStatus::Loaded(info) => Some(info),
            SlotStatus::Empty => None,
        }
    }
}

/// What the registry knows about an online player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub usb: SlotStatus,
    pub sd: SlotStatus,
}

impl ClientInfo {
    pub fn slot(&self, slot: Slot) -> &SlotStatus {
        match slot {
            Slot::Usb => &self.usb,
            Slot::Sd => &self.sd,
        }
    }

    pub fn slot_mut(&mut self, slot: Slot) -> &mut SlotStatus {
        match slot {
            Slot::Usb => &mut self.usb,
            Slot::Sd => &mut self.sd,
        }
    }

    /// Loaded slots in display order (USB before SD)
    pub fn loaded_slots(&self) -> impl Iterator<Item = (Slot, &MediaInfo)> {
        Slot::ALL
            .into_iter()
            .filter_map(move |slot| self.slot(slot).info().map(|info| (slot, info)))
    }
}

/// Resolves player numbers to online clients
pub trait ClientRegistry: Send + Sync {
    /// Current view of a player, or `None` when it isn't on the network
    fn client(&self, player: PlayerNumber) -> Option<ClientInfo>;
}

/// Sends load commands to playback targets
pub trait PlaybackDispatcher: Send + Sync {
    /// Ask `target` to load `track_id` from `source`'s `slot`
    fn load_track(&self, target: PlayerNumber, source: PlayerNumber, slot: Slot, track_id: ItemId);
}

/// Registry with an explicitly managed set of clients
///
/// Used by the demo binary and by tests; a network-backed registry would
/// update the same information from status packets.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    clients: RwLock<HashMap<PlayerNumber, ClientInfo>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // Every write replaces whole entries, so a poisoned map is still consistent
    fn read(&self) -> RwLockReadGuard<'_, HashMap<PlayerNumber, ClientInfo>> {
        self.clients.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PlayerNumber, ClientInfo>> {
        self.clients.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert(&self, player: PlayerNumber, info: ClientInfo) {
        self.write().insert(player, info);
    }

    /// Replace one slot of a known player; returns false if the player is unknown
    pub fn set_slot(&self, player: PlayerNumber, slot: Slot, status: SlotStatus) -> bool {
        match self.write().get_mut(&player) {
            Some(info) => {
                *info.slot_mut(slot) = status;
                true
            }
            None => false,
        }
    }

    pub fn players(&self) -> Vec<PlayerNumber> {
        let mut players: Vec<_> = self.read().keys().copied().collect();
        players.sort();
        players
    }
}

impl ClientRegistry for StaticRegistry {
    fn client(&self, player: PlayerNumber) -> Option<ClientInfo> {
        self.read().get(&player).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(name: &str) -> SlotStatus {
        SlotStatus::Loaded(MediaInfo {
            name: Some(name.to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_loaded_slots_order() {
        let info = ClientInfo {
            usb: loaded("STICK"),
            sd: loaded("CARD"),
        };
        let slots: Vec<_> = info.loaded_slots().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![Slot::Usb, Slot::Sd]);

        let sd_only = ClientInfo {
            usb: SlotStatus::Empty,
            sd: loaded("CARD"),
        };
        let slots: Vec<_> = sd_only.loaded_slots().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![Slot::Sd]);
    }

    #[test]
    fn test_static_registry_set_slot() {
        let registry = StaticRegistry::new();
        registry.insert(PlayerNumber(2), ClientInfo::default());

        assert!(registry.set_slot(PlayerNumber(2), Slot::Usb, loaded("STICK")));
        assert!(!registry.set_slot(PlayerNumber(3), Slot::Usb, loaded("STICK")));

        let info = registry.client(PlayerNumber(2)).unwrap();
        assert!(info.usb.is_loaded());
        assert!(!info.sd.is_loaded());
        assert!(registry.client(PlayerNumber(3)).is_none());
    }

    #[test]
    fn test_static_registry_survives_poisoned_lock() {
        let registry = std::sync::Arc::new(StaticRegistry::new());
        registry.insert(PlayerNumber(1), ClientInfo::default());

        let poisoner = std::sync::Arc::clone(&registry);
        let result = std::thread::spawn(move || {
            let _guard = poisoner.clients.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(registry.clients.is_poisoned());

        registry.insert(PlayerNumber(4), ClientInfo::default());
        assert!(registry.set_slot(PlayerNumber(4), Slot::Sd, loaded("CARD")));
        assert_eq!(registry.players(), vec![PlayerNumber(1), PlayerNumber(4)]);
        assert!(registry.client(PlayerNumber(4)).unwrap().sd.is_loaded());
    }
}
