//! Scan history tracking
//!
//! Maintains a bounded log of past scans, newest first, serialized as a
//! unit on every mutation so the log survives process restarts.

use std::collections::VecDeque;
use taptune_core::{Result, ScanRecord};

/// Default maximum number of retained scans
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Scan history with bounded size
///
/// Newest record first. Appending at capacity evicts the oldest record.
/// Ordering is insertion order, not timestamp order; the two only differ
/// when a device clock jumps, and insertion order is what the user saw.
#[derive(Debug, Clone)]
pub struct ScanHistory {
    /// History buffer (most recent = front)
    records: VecDeque<ScanRecord>,

    /// Maximum history size
    capacity: usize,
}

impl ScanHistory {
    /// Create an empty history with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a scan record as the newest entry
    ///
    /// If the history is full, the oldest record is discarded.
    pub fn record(&mut self, record: ScanRecord) {
        self.records.push_front(record);
        while self.records.len() > self.capacity {
            self.records.pop_back(); // Remove oldest
        }
    }

    /// Get the most recent record
    pub fn latest(&self) -> Option<&ScanRecord> {
        self.records.front()
    }

    /// Get all records, newest first
    pub fn get_all(&self) -> Vec<&ScanRecord> {
        self.records.iter().collect()
    }

    /// Iterate over records, newest first
    pub fn iter(&self) -> impl Iterator<Item = &ScanRecord> {
        self.records.iter()
    }

    /// Get number of retained records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the history is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Clear all records
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Get the maximum history size
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Set the maximum history size
    ///
    /// If the new capacity is smaller than the current length, the oldest
    /// entries are discarded.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        while self.records.len() > capacity {
            self.records.pop_back();
        }
    }

    /// Serialize the full ordered list as a JSON unit
    pub fn to_json(&self) -> Result<String> {
        let records: Vec<&ScanRecord> = self.records.iter().collect();
        Ok(serde_json::to_string(&records)?)
    }

    /// Rebuild a history from its serialized form
    ///
    /// Entries beyond `capacity` are dropped from the old end. Corrupt
    /// input is an error; the caller decides whether to fall back to an
    /// empty history.
    pub fn from_json(json: &str, capacity: usize) -> Result<Self> {
        let records: Vec<ScanRecord> = serde_json::from_str(json)?;
        let mut history = Self::new(capacity);
        // Stored newest-first; refill oldest-first so ordering survives
        for record in records.into_iter().rev() {
            history.record(record);
        }
        Ok(history)
    }
}

impl Default for ScanHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taptune_core::ContentDescriptor;

    fn create_test_record(id: &str) -> ScanRecord {
        ScanRecord::new(ContentDescriptor::local(
            id,
            format!("Track {id}"),
            format!("/audio/{id}.mp3"),
        ))
    }

    fn descriptor_ids(history: &ScanHistory) -> Vec<String> {
        history.iter().map(|r| r.descriptor.id.clone()).collect()
    }

    #[test]
    fn create_history() {
        let history = ScanHistory::new(10);
        assert_eq!(history.capacity(), 10);
        assert_eq!(history.len(), 0);
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }

    #[test]
    fn record_newest_first() {
        let mut history = ScanHistory::new(10);
        history.record(create_test_record("1"));
        history.record(create_test_record("2"));
        history.record(create_test_record("3"));

        assert_eq!(history.len(), 3);
        assert_eq!(descriptor_ids(&history), ["3", "2", "1"]);
        assert_eq!(history.latest().map(|r| r.descriptor.id.as_str()), Some("3"));
    }

    #[test]
    fn eleventh_record_evicts_the_first() {
        let mut history = ScanHistory::new(10);
        for i in 1..=11 {
            history.record(create_test_record(&i.to_string()));
        }

        assert_eq!(history.len(), 10);
        let expected: Vec<String> = (2..=11).rev().map(|i| i.to_string()).collect();
        assert_eq!(descriptor_ids(&history), expected);
    }

    #[test]
    fn clear_history() {
        let mut history = ScanHistory::new(10);
        history.record(create_test_record("1"));
        history.record(create_test_record("2"));

        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
    }

    #[test]
    fn shrink_capacity_discards_oldest() {
        let mut history = ScanHistory::new(5);
        for i in 1..=5 {
            history.record(create_test_record(&i.to_string()));
        }

        history.set_capacity(3);
        assert_eq!(history.len(), 3);
        assert_eq!(descriptor_ids(&history), ["5", "4", "3"]);
    }

    #[test]
    fn grow_capacity_preserves_records() {
        let mut history = ScanHistory::new(3);
        history.record(create_test_record("1"));
        history.record(create_test_record("2"));

        history.set_capacity(10);
        assert_eq!(history.capacity(), 10);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn json_round_trip_reproduces_the_sequence() {
        let mut history = ScanHistory::new(10);
        for i in 1..=4 {
            history.record(create_test_record(&i.to_string()));
        }

        let json = history.to_json().unwrap();
        let restored = ScanHistory::from_json(&json, 10).unwrap();

        assert_eq!(descriptor_ids(&restored), descriptor_ids(&history));
        assert_eq!(restored.get_all().len(), 4);
        assert_eq!(
            restored.latest().map(|r| r.id.clone()),
            history.latest().map(|r| r.id.clone())
        );
    }

    #[test]
    fn from_json_truncates_to_capacity() {
        let mut history = ScanHistory::new(20);
        for i in 1..=15 {
            history.record(create_test_record(&i.to_string()));
        }

        let json = history.to_json().unwrap();
        let restored = ScanHistory::from_json(&json, 10).unwrap();

        assert_eq!(restored.len(), 10);
        // Newest ten survive
        let expected: Vec<String> = (6..=15).rev().map(|i| i.to_string()).collect();
        assert_eq!(descriptor_ids(&restored), expected);
    }

    #[test]
    fn corrupt_json_is_an_error() {
        assert!(ScanHistory::from_json("{definitely not json", 10).is_err());
        assert!(ScanHistory::from_json(r#"{"records": 3}"#, 10).is_err());
    }

    #[test]
    fn default_history() {
        let history = ScanHistory::default();
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }
}
