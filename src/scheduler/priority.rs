use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Dispatch tier of a task. Declaration order is rank order: `High` is
/// dispatched first, `Default` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    #[default]
    Default = 3,
}

impl Priority {
    /// Every class, highest rank first.
    pub const ALL: [Priority; 4] = [
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::Default,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
            Priority::Default => "default",
        }
    }

    /// Position in `ALL`.
    pub fn rank(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Anything outside the four known names lands in `Default`.
impl From<&str> for Priority {
    fn from(name: &str) -> Self {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(Priority::Default)
    }
}

impl From<String> for Priority {
    fn from(name: String) -> Self {
        Priority::from(name.as_str())
    }
}

impl From<&String> for Priority {
    fn from(name: &String) -> Self {
        Priority::from(name.as_str())
    }
}

impl From<u8> for Priority {
    fn from(value: u8) -> Self {
        Priority::ALL
            .get(value as usize)
            .copied()
            .unwrap_or(Priority::Default)
    }
}

impl From<Option<Priority>> for Priority {
    fn from(value: Option<Priority>) -> Self {
        value.unwrap_or_default()
    }
}

/// One FIFO bucket per priority class.
///
/// Not synchronized: the owner serializes access (the worker pool keeps it
/// behind its single state lock).
pub struct PriorityBucketQueue<T> {
    buckets: HashMap<Priority, VecDeque<T>>,
    len: usize,
}

impl<T> PriorityBucketQueue<T> {
    pub fn new() -> Self {
        Self {
            buckets: HashMap::with_capacity(Priority::ALL.len()),
            len: 0,
        }
    }

    /// Append `item` to the back of its class's bucket, creating the bucket on
    /// first use.
    pub fn add<P: Into<Priority>>(&mut self, priority: P, item: T) {
        self.buckets
            .entry(priority.into())
            .or_default()
            .push_back(item);
        self.len += 1;
    }

    /// Remove the oldest item of the highest-ranked non-empty bucket.
    pub fn next(&mut self) -> Option<T> {
        for priority in Priority::ALL {
            if let Some(item) = self.buckets.get_mut(&priority).and_then(VecDeque::pop_front) {
                self.len -= 1;
                return Some(item);
            }
        }
        None
    }

    /// Class of the item `next` would return.
    pub fn peek_priority(&self) -> Option<Priority> {
        Priority::ALL.into_iter().find(|p| self.len_of(*p) > 0)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len_of(&self, priority: Priority) -> usize {
        self.buckets.get(&priority).map_or(0, VecDeque::len)
    }

    /// Whether a bucket was ever created for `priority`. Buckets persist once
    /// created, even when drained.
    pub fn has_bucket(&self, priority: Priority) -> bool {
        self.buckets.contains_key(&priority)
    }

    /// Pending items per class, in rank order.
    pub fn depths(&self) -> [usize; 4] {
        Priority::ALL.map(|p| self.len_of(p))
    }
}

impl<T> Default for PriorityBucketQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for PriorityBucketQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityBucketQueue")
            .field("len", &self.len)
            .field("depths", &self.depths())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
        assert!(Priority::Low < Priority::Default);
        assert_eq!(Priority::default(), Priority::Default);
    }

    #[test]
    fn test_coercion() {
        assert_eq!(Priority::from("high"), Priority::High);
        assert_eq!(Priority::from("MEDIUM"), Priority::Medium);
        assert_eq!(Priority::from("Low"), Priority::Low);
        assert_eq!(Priority::from("default"), Priority::Default);
        assert_eq!(Priority::from("urgent"), Priority::Default);
        assert_eq!(Priority::from(""), Priority::Default);
        assert_eq!(Priority::from(String::from("high")), Priority::High);

        assert_eq!(Priority::from(0u8), Priority::High);
        assert_eq!(Priority::from(2u8), Priority::Low);
        assert_eq!(Priority::from(3u8), Priority::Default);
        assert_eq!(Priority::from(200u8), Priority::Default);

        assert_eq!(Priority::from(None::<Priority>), Priority::Default);
        assert_eq!(Priority::from(Some(Priority::Medium)), Priority::Medium);
    }

    #[test]
    fn test_rank_across_buckets() {
        let mut queue = PriorityBucketQueue::new();

        queue.add(Priority::High, "h");
        queue.add(Priority::Low, "l");
        queue.add(Priority::Medium, "m");

        assert_eq!(queue.peek_priority(), Some(Priority::High));
        assert_eq!(queue.next(), Some("h"));
        assert_eq!(queue.next(), Some("m"));
        assert_eq!(queue.next(), Some("l"));
        assert_eq!(queue.next(), None);
    }

    #[test]
    fn test_fifo_within_bucket() {
        let mut queue = PriorityBucketQueue::new();

        for i in 0..5 {
            queue.add(Priority::Low, i);
        }

        let drained: Vec<_> = std::iter::from_fn(|| queue.next()).collect();
        assert_eq!(drained, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_unknown_priority_shares_default_bucket() {
        let mut queue = PriorityBucketQueue::new();

        queue.add(Priority::Default, 1);
        queue.add("whenever", 2);
        queue.add(42u8, 3);
        queue.add(Priority::Low, 0);

        assert_eq!(queue.len_of(Priority::Default), 3);
        assert_eq!(queue.next(), Some(0));
        assert_eq!(queue.next(), Some(1));
        assert_eq!(queue.next(), Some(2));
        assert_eq!(queue.next(), Some(3));
    }

    #[test]
    fn test_buckets_are_lazy_and_persist() {
        let mut queue = PriorityBucketQueue::new();
        assert!(Priority::ALL.iter().all(|p| !queue.has_bucket(*p)));

        queue.add(Priority::Medium, ());
        assert!(queue.has_bucket(Priority::Medium));
        assert!(!queue.has_bucket(Priority::High));

        queue.next();
        assert!(queue.is_empty());
        assert!(queue.has_bucket(Priority::Medium));
    }

    #[test]
    fn test_len_and_depths() {
        let mut queue = PriorityBucketQueue::new();
        queue.add(Priority::High, 'a');
        queue.add(Priority::Default, 'b');
        queue.add(Priority::Default, 'c');

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.depths(), [1, 0, 0, 2]);

        queue.next();
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.depths(), [0, 0, 0, 2]);
    }
}
