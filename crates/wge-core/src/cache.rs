use std::sync::RwLock;

use crate::domain::ExtractionResult;

/// Single-slot holder of the most recent extraction.
///
/// `set` replaces the previous value wholesale; results are never merged.
/// Export handlers read concurrently while a resolution may be in flight;
/// they observe either the prior or the new result, never a torn one.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    slot: RwLock<ExtractionResult>,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> ExtractionResult {
        self.slot
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set(&self, result: ExtractionResult) {
        *self
            .slot
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GroupId, Participant};

    #[test]
    fn starts_empty() {
        let cache = ExtractionCache::new();
        let current = cache.get();
        assert!(current.group_id.is_none());
        assert!(current.group_name.is_none());
        assert!(current.participants.is_empty());
    }

    #[test]
    fn set_replaces_wholesale() {
        let cache = ExtractionCache::new();
        cache.set(ExtractionResult {
            group_id: Some(GroupId("g1@g.us".to_string())),
            group_name: Some("First".to_string()),
            participants: vec![Participant {
                name: "a".to_string(),
                phone: "1".to_string(),
            }],
        });
        cache.set(ExtractionResult {
            group_id: Some(GroupId("g2@g.us".to_string())),
            group_name: None,
            participants: vec![],
        });
        let current = cache.get();
        assert_eq!(current.group_id, Some(GroupId("g2@g.us".to_string())));
        assert!(current.group_name.is_none());
        assert!(current.participants.is_empty());
    }
}
