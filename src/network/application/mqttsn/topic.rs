//! Topic table: the client's view of topic name to topic id mappings.

use heapless::{String, Vec};

use super::codec::max_payload;
use super::types::{MAX_TOPICS, MsgType};

/// Longest topic name the table stores.
///
/// A REGISTER frame has the least room for a name of all the messages that
/// carry one, so every stored name can be sent back verbatim.
pub const MAX_TOPIC_NAME_LEN: usize = max_payload(MsgType::Register);

/// One name to id mapping.
///
/// An id of `0` marks a registration that has not been acknowledged yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// Topic name as registered.
    pub name: String<MAX_TOPIC_NAME_LEN>,
    /// Id assigned by the gateway, `0` while pending.
    pub id: u16,
}

impl Topic {
    /// `true` once the gateway has assigned an id.
    pub fn is_registered(&self) -> bool {
        self.id != 0
    }
}

/// Fixed-capacity topic table.
///
/// Entries are never removed. Lookups scan in insertion order and the first
/// match wins.
///
/// # Examples
///
/// ```rust
/// use libmqttsn::network::application::mqttsn::TopicTable;
///
/// let mut table: TopicTable = TopicTable::new();
/// table.upsert("sensor/temp", 0);
/// table.upsert("sensor/temp", 7);
///
/// assert_eq!(table.len(), 1);
/// assert_eq!(table.find_by_id(7).map(|t| t.name.as_str()), Some("sensor/temp"));
/// ```
#[derive(Debug, Clone)]
pub struct TopicTable<const N: usize = MAX_TOPICS> {
    topics: Vec<Topic, N>,
}

impl<const N: usize> Default for TopicTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TopicTable<N> {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self { topics: Vec::new() }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// `true` when no topic was ever added.
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// `true` when no further name can be added.
    pub fn is_full(&self) -> bool {
        self.topics.is_full()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        N
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Topic> {
        self.topics.iter()
    }

    /// Entry at `slot`.
    pub fn get(&self, slot: usize) -> Option<&Topic> {
        self.topics.get(slot)
    }

    /// First entry whose name equals `name` exactly.
    pub fn find_by_name(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name.as_str() == name)
    }

    /// First entry whose id equals `id`.
    pub fn find_by_id(&self, id: u16) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    /// Slot of the entry named `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.topics.iter().position(|t| t.name.as_str() == name)
    }

    /// Insert `name` with `id`, or update the id of an existing entry.
    ///
    /// Returns the slot used, or `None` when the name is new and the table
    /// is full (the mapping is dropped). Names longer than
    /// [`MAX_TOPIC_NAME_LEN`] are cut at a character boundary first.
    pub fn upsert(&mut self, name: &str, id: u16) -> Option<usize> {
        let name = truncate(name);
        if let Some(slot) = self.position(name) {
            self.topics[slot].id = id;
            return Some(slot);
        }

        let mut stored = String::new();
        // Cannot fail: `truncate` bounded the length.
        let _ = stored.push_str(name);
        match self.topics.push(Topic { name: stored, id }) {
            Ok(()) => Some(self.topics.len() - 1),
            Err(_) => {
                log::warn!("topic table full, dropping {}", name);
                None
            }
        }
    }

    /// Overwrite the id stored at `slot`.
    pub fn set_id(&mut self, slot: usize, id: u16) -> bool {
        match self.topics.get_mut(slot) {
            Some(topic) => {
                topic.id = id;
                true
            }
            None => false,
        }
    }
}

fn truncate(name: &str) -> &str {
    if name.len() <= MAX_TOPIC_NAME_LEN {
        return name;
    }
    let mut end = MAX_TOPIC_NAME_LEN;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}
