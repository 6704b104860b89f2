//! LMDB implementation of ChangelogStore.

use heed::types::Bytes;
use heed::{Database, RoTxn};

use hostcache_store::{CacheError, ChangelogStore};

use crate::environment::DbiGuard;
use crate::{LmdbEnvironment, LmdbError};

impl LmdbEnvironment {
    fn existing_bucket(
        &self,
        dbi: &DbiGuard<'_>,
        rtxn: &RoTxn,
        host: &str,
    ) -> Result<Database<Bytes, Bytes>, CacheError> {
        self.host_bucket(dbi, rtxn, host)?
            .ok_or_else(|| CacheError::BucketNotFound(host.to_string()))
    }
}

impl ChangelogStore for LmdbEnvironment {
    fn put_changelog(&self, host: &str, key: &[u8], value: &[u8]) -> Result<(), CacheError> {
        let _enter = self.span.enter();
        let dbi = self.lock_dbi()?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let bucket = self.existing_bucket(&dbi, &wtxn, host)?;
        bucket
            .put(&mut wtxn, key, value)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn get_changelog(&self, host: &str, key: &[u8]) -> Result<Option<Vec<u8>>, CacheError> {
        let _enter = self.span.enter();
        let dbi = self.lock_dbi()?;
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bucket = self.existing_bucket(&dbi, &rtxn, host)?;
        let value = bucket.get(&rtxn, key).map_err(LmdbError::from)?;
        Ok(value.map(<[u8]>::to_vec))
    }

    fn changelog_entries(&self, host: &str) -> Result<Vec<(Vec<u8>, Vec<u8>)>, CacheError> {
        let _enter = self.span.enter();
        let dbi = self.lock_dbi()?;
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let bucket = self.existing_bucket(&dbi, &rtxn, host)?;
        let mut entries = Vec::new();
        for entry in bucket.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, value) = entry.map_err(LmdbError::from)?;
            entries.push((key.to_vec(), value.to_vec()));
        }
        Ok(entries)
    }
}
