//! Per-command switch state

use serde::{Serialize, Serializer};

use super::mapping::{Switch, SWITCH_COUNT};

/// One flag per switch, indexed by switch number (slot 0 is unused)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchSet {
    flags: [bool; SWITCH_COUNT as usize + 1],
}

impl SwitchSet {
    /// Create a set with every switch inactive
    pub fn new() -> Self {
        Self {
            flags: [false; SWITCH_COUNT as usize + 1],
        }
    }

    /// Mark a switch active. Returns true if it was not active before.
    pub fn insert(&mut self, switch: Switch) -> bool {
        let slot = &mut self.flags[switch.number() as usize];
        !std::mem::replace(slot, true)
    }

    /// Whether the switch has been seen
    pub fn contains(&self, switch: Switch) -> bool {
        self.flags[switch.number() as usize]
    }

    /// Whether the switch with this number has been seen; false for 0 and
    /// numbers off the panel
    pub fn is_active(&self, number: u8) -> bool {
        Switch::new(number).is_some_and(|s| self.contains(s))
    }

    /// Number of active switches
    pub fn active_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Active switches in numeric order
    pub fn active(&self) -> impl Iterator<Item = Switch> + '_ {
        Switch::all().filter(move |s| self.contains(*s))
    }

    pub fn clear(&mut self) {
        self.flags = [false; SWITCH_COUNT as usize + 1];
    }
}

impl Default for SwitchSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized as the list of active switch numbers
impl Serialize for SwitchSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.active().map(Switch::number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sw(n: u8) -> Switch {
        Switch::new(n).unwrap()
    }

    #[test]
    fn test_empty_set() {
        let set = SwitchSet::default();
        assert_eq!(set.active_count(), 0);
        assert!(Switch::all().all(|s| !set.contains(s)));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut set = SwitchSet::new();
        assert!(set.insert(sw(5)));
        assert!(!set.insert(sw(5)));
        assert!(set.contains(sw(5)));
        assert_eq!(set.active_count(), 1);
    }

    #[test]
    fn test_is_active_out_of_range() {
        let mut set = SwitchSet::new();
        set.insert(sw(41));
        assert!(set.is_active(41));
        assert!(!set.is_active(0));
        assert!(!set.is_active(42));
    }

    #[test]
    fn test_clear() {
        let mut set = SwitchSet::new();
        set.insert(sw(1));
        set.insert(sw(38));
        set.clear();
        assert_eq!(set, SwitchSet::new());
    }

    #[test]
    fn test_serializes_active_numbers() {
        let mut set = SwitchSet::new();
        set.insert(sw(37));
        set.insert(sw(1));
        set.insert(sw(28));
        assert_eq!(serde_json::to_string(&set).unwrap(), "[1,28,37]");
    }
}
