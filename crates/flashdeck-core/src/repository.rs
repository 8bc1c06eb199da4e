// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fmt::Display;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Fallible;
use crate::error::fail;

/// A typed record that can be kept in a [`Repository`].
pub trait Record: Clone + Serialize + DeserializeOwned {
    type Id: Copy + Ord + Debug + Display;

    /// Name of the collection the records live in.
    const COLLECTION: &'static str;

    fn id(&self) -> Self::Id;
}

/// Storage for a collection of records, ordered by id.
pub trait Repository<T: Record> {
    /// All records, in ascending id order.
    fn all(&self) -> Fallible<Vec<T>>;

    fn get(&self, id: T::Id) -> Fallible<Option<T>>;

    /// Add a new record. Fails if a record with the same id exists.
    fn insert(&mut self, record: T) -> Fallible<()>;

    /// Overwrite an existing record. Fails if no record has its id.
    fn update(&mut self, record: T) -> Fallible<()>;

    /// Remove a record. Returns whether anything was removed.
    fn delete(&mut self, id: T::Id) -> Fallible<bool>;

    /// Replace the whole collection.
    fn replace_all(&mut self, records: Vec<T>) -> Fallible<()>;
}

pub struct InMemoryRepository<T: Record> {
    records: BTreeMap<T::Id, T>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    pub fn from_records(records: Vec<T>) -> Fallible<Self> {
        let mut repo = Self::new();
        for record in records {
            repo.insert(record)?;
        }
        Ok(repo)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> Repository<T> for InMemoryRepository<T> {
    fn all(&self) -> Fallible<Vec<T>> {
        Ok(self.records.values().cloned().collect())
    }

    fn get(&self, id: T::Id) -> Fallible<Option<T>> {
        Ok(self.records.get(&id).cloned())
    }

    fn insert(&mut self, record: T) -> Fallible<()> {
        let id = record.id();
        if self.records.contains_key(&id) {
            return fail(format!("{} already contains a record with id {id}.", T::COLLECTION));
        }
        self.records.insert(id, record);
        Ok(())
    }

    fn update(&mut self, record: T) -> Fallible<()> {
        let id = record.id();
        match self.records.get_mut(&id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => fail(format!("{} has no record with id {id}.", T::COLLECTION)),
        }
    }

    fn delete(&mut self, id: T::Id) -> Fallible<bool> {
        Ok(self.records.remove(&id).is_some())
    }

    fn replace_all(&mut self, records: Vec<T>) -> Fallible<()> {
        let replacement = Self::from_records(records)?;
        self.records = replacement.records;
        Ok(())
    }
}
