use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use super::LinkStore;
use crate::error::StoreError;
use crate::model::Link;

struct Row {
    link: Link,
    sequence: u64,
}

#[derive(Default)]
struct Table {
    rows: HashMap<String, Row>,
    next_sequence: u64,
}

/// Process-local store. Every operation holds the table lock for its whole
/// read-modify-write, which gives the same guarantees as a unique key and a
/// single-statement update in a database.
#[derive(Clone, Default)]
pub struct MemoryLinkStore {
    table: Arc<Mutex<Table>>,
}

impl MemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn insert(&self, code: &str, url: &str) -> Result<Link, StoreError> {
        let mut guard = self.table();
        let table = &mut *guard;
        let sequence = table.next_sequence;
        match table.rows.entry(code.to_string()) {
            Entry::Occupied(_) => Err(StoreError::Conflict),
            Entry::Vacant(slot) => {
                let link = Link::new(code, url, Utc::now());
                slot.insert(Row {
                    link: link.clone(),
                    sequence,
                });
                table.next_sequence += 1;
                Ok(link)
            }
        }
    }

    async fn resolve_and_count(&self, code: &str) -> Result<Link, StoreError> {
        let mut table = self.table();
        let row = table.rows.get_mut(code).ok_or(StoreError::NotFound)?;
        row.link.clicks += 1;
        row.link.last_clicked = Some(Utc::now());
        Ok(row.link.clone())
    }

    async fn get(&self, code: &str) -> Result<Link, StoreError> {
        self.table()
            .rows
            .get(code)
            .map(|row| row.link.clone())
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self) -> Result<Vec<Link>, StoreError> {
        let table = self.table();
        let mut rows: Vec<&Row> = table.rows.values().collect();
        rows.sort_by(|a, b| {
            b.link
                .created_at
                .cmp(&a.link.created_at)
                .then(b.sequence.cmp(&a.sequence))
        });
        Ok(rows.into_iter().map(|row| row.link.clone()).collect())
    }

    async fn delete(&self, code: &str) -> Result<bool, StoreError> {
        Ok(self.table().rows.remove(code).is_some())
    }
}
