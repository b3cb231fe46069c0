//! Known users: sender id -> display name, for the lifetime of the process.

use std::collections::{HashMap, VecDeque};

/// In-memory map of senders the bot has talked to.
///
/// Last write wins. With a capacity set, the oldest-inserted sender is
/// evicted once the map is full; re-contact does not refresh the position.
#[derive(Debug, Clone, Default)]
pub struct UserMemory {
    names: HashMap<String, String>,
    order: VecDeque<String>,
    capacity: Option<usize>,
}

impl UserMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    pub fn contains(&self, sender_id: &str) -> bool {
        self.names.contains_key(sender_id)
    }

    pub fn name_of(&self, sender_id: &str) -> Option<&str> {
        self.names.get(sender_id).map(String::as_str)
    }

    pub fn remember(&mut self, sender_id: &str, name: &str) {
        if let Some(existing) = self.names.get_mut(sender_id) {
            *existing = name.to_owned();
            return;
        }

        if let Some(cap) = self.capacity {
            while self.names.len() >= cap {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.names.remove(&oldest);
            }
        }

        self.names.insert(sender_id.to_owned(), name.to_owned());
        self.order.push_back(sender_id.to_owned());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_and_lookup() {
        let mut memory = UserMemory::new();
        assert!(!memory.contains("42"));
        memory.remember("42", "Ada");
        assert!(memory.contains("42"));
        assert_eq!(memory.name_of("42"), Some("Ada"));
    }

    #[test]
    fn test_last_write_wins() {
        let mut memory = UserMemory::new();
        memory.remember("42", "Ada");
        memory.remember("42", "Grace");
        assert_eq!(memory.name_of("42"), Some("Grace"));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut memory = UserMemory::with_capacity(2);
        memory.remember("1", "a");
        memory.remember("2", "b");
        memory.remember("1", "a2");
        memory.remember("3", "c");
        assert!(!memory.contains("1"));
        assert!(memory.contains("2"));
        assert!(memory.contains("3"));
        assert_eq!(memory.len(), 2);
    }
}
