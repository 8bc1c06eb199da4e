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

use std::path::Path;

use flashdeck_core::error::ErrorReport;
use flashdeck_core::error::Fallible;
use flashdeck_core::error::fail;
use flashdeck_core::repository::Record;
use flashdeck_core::repository::Repository;
use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Transaction;
use rusqlite::params;

const SCHEMA: &str = "
create table if not exists records (
    collection text not null,
    id integer not null,
    body text not null,
    primary key (collection, id)
) strict;
";

fn db_error(err: rusqlite::Error) -> ErrorReport {
    ErrorReport::new(format!("database error: {err}"))
}

/// A SQLite file holding every record collection. Each record is stored as
/// its JSON serialization, keyed by collection name and id.
pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Fallible<Self> {
        let conn = Connection::open(path).map_err(db_error)?;
        Self::with_connection(conn)
    }

    #[cfg(test)]
    pub fn in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory().map_err(db_error)?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Fallible<Self> {
        conn.execute_batch(SCHEMA).map_err(db_error)?;
        Ok(Self { conn })
    }

    pub fn count<T: Record>(&self) -> Fallible<usize> {
        let count: i64 = self
            .conn
            .query_row(
                "select count(*) from records where collection = ?1",
                params![T::COLLECTION],
                |row| row.get(0),
            )
            .map_err(db_error)?;
        Ok(count as usize)
    }

    fn exists<T: Record>(&self, id: i64) -> Fallible<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "select 1 from records where collection = ?1 and id = ?2",
                params![T::COLLECTION, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;
        Ok(found.is_some())
    }
}

fn insert_row<T: Record>(tx: &Transaction, record: &T) -> Fallible<()>
where
    T::Id: Into<i64>,
{
    let key: i64 = record.id().into();
    let body = serde_json::to_string(record)?;
    tx.execute(
        "insert into records (collection, id, body) values (?1, ?2, ?3)",
        params![T::COLLECTION, key, body],
    )
    .map_err(db_error)?;
    Ok(())
}

impl<T> Repository<T> for Database
where
    T: Record,
    T::Id: Into<i64>,
{
    fn all(&self) -> Fallible<Vec<T>> {
        let mut stmt = self
            .conn
            .prepare("select body from records where collection = ?1 order by id")
            .map_err(db_error)?;
        let bodies = stmt
            .query_map(params![T::COLLECTION], |row| row.get::<_, String>(0))
            .map_err(db_error)?;
        let mut records = Vec::new();
        for body in bodies {
            let body = body.map_err(db_error)?;
            records.push(serde_json::from_str(&body)?);
        }
        Ok(records)
    }

    fn get(&self, id: T::Id) -> Fallible<Option<T>> {
        let key: i64 = id.into();
        let body: Option<String> = self
            .conn
            .query_row(
                "select body from records where collection = ?1 and id = ?2",
                params![T::COLLECTION, key],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_error)?;
        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    fn insert(&mut self, record: T) -> Fallible<()> {
        let id = record.id();
        if self.exists::<T>(id.into())? {
            return fail(format!("{} already contains a record with id {id}.", T::COLLECTION));
        }
        let tx = self.conn.transaction().map_err(db_error)?;
        insert_row(&tx, &record)?;
        tx.commit().map_err(db_error)?;
        log::debug!("Inserted {} record {id}", T::COLLECTION);
        Ok(())
    }

    fn update(&mut self, record: T) -> Fallible<()> {
        let id = record.id();
        let key: i64 = id.into();
        let body = serde_json::to_string(&record)?;
        let changed = self
            .conn
            .execute(
                "update records set body = ?3 where collection = ?1 and id = ?2",
                params![T::COLLECTION, key, body],
            )
            .map_err(db_error)?;
        if changed == 0 {
            return fail(format!("{} has no record with id {id}.", T::COLLECTION));
        }
        log::debug!("Updated {} record {id}", T::COLLECTION);
        Ok(())
    }

    fn delete(&mut self, id: T::Id) -> Fallible<bool> {
        let key: i64 = id.into();
        let changed = self
            .conn
            .execute(
                "delete from records where collection = ?1 and id = ?2",
                params![T::COLLECTION, key],
            )
            .map_err(db_error)?;
        Ok(changed > 0)
    }

    fn replace_all(&mut self, records: Vec<T>) -> Fallible<()> {
        let tx = self.conn.transaction().map_err(db_error)?;
        tx.execute(
            "delete from records where collection = ?1",
            params![T::COLLECTION],
        )
        .map_err(db_error)?;
        for record in &records {
            insert_row(&tx, record).map_err(|e| {
                ErrorReport::new(format!(
                    "cannot import {} record {}: {}",
                    T::COLLECTION,
                    record.id(),
                    e.message()
                ))
            })?;
        }
        tx.commit().map_err(db_error)?;
        log::debug!("Replaced {} with {} records", T::COLLECTION, records.len());
        Ok(())
    }
}
