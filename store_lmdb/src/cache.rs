//! LMDB implementation of HostCache.

use heed::types::Bytes;
use heed::RwTxn;
use tracing::debug;

use hostcache_store::{decode_meta, encode_meta, validate_bucket_name, CacheError, HostCache};
use hostcache_types::Meta;
use hostcache_utils::{render_bytes, truncate};

use crate::environment::DbiGuard;
use crate::{LmdbEnvironment, LmdbError};

/// Changelog values longer than this are cut in [`HostCache::pretty_print`] output.
const PRETTY_VALUE_CHARS: usize = 100;

impl HostCache for LmdbEnvironment {
    fn close(self) -> Result<(), CacheError> {
        self.close_env()
    }

    fn get_meta(&self, host: &str) -> Result<Option<Meta>, CacheError> {
        let _enter = self.span.enter();
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        match self.meta_bytes(&rtxn, host)? {
            Some(bytes) if !bytes.is_empty() => decode_meta(bytes).map(Some),
            _ => Ok(None),
        }
    }

    fn ensure_buckets(&self, meta: &Meta) -> Result<(), CacheError> {
        let _enter = self.span.enter();
        let bytes = encode_meta(meta)?;

        let dbi = self.lock_dbi()?;
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        debug!(host = %meta.name, "put to meta");
        self.meta_db
            .put(&mut wtxn, meta.name.as_bytes(), &bytes)
            .map_err(LmdbError::from)?;
        self.reset_bucket(&dbi, &mut wtxn, &meta.name)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }

    fn pretty_print(&self, meta: &Meta) -> Result<(), CacheError> {
        let _enter = self.span.enter();
        let dbi = self.lock_dbi()?;
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;

        let value = self.meta_bytes(&rtxn, &meta.name)?.unwrap_or_default();
        debug!(key = %meta.name, value = %render_bytes(value), "meta");

        let Some(bucket) = self.host_bucket(&dbi, &rtxn, &meta.name)? else {
            debug!(host = %meta.name, "no changelog bucket");
            return Ok(());
        };
        for entry in bucket.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, value) = entry.map_err(LmdbError::from)?;
            let value = render_bytes(value);
            let value = truncate(&value, PRETTY_VALUE_CHARS);
            debug!(key = %render_bytes(key), value = %value, "changelog");
        }
        Ok(())
    }
}

impl LmdbEnvironment {
    /// Leave an empty bucket named `name`, discarding any previous entries.
    fn reset_bucket(
        &self,
        _dbi: &DbiGuard<'_>,
        wtxn: &mut RwTxn,
        name: &str,
    ) -> Result<(), CacheError> {
        validate_bucket_name(name)?;
        if let Some(bucket) = self
            .env
            .open_database::<Bytes, Bytes>(wtxn, Some(name))
            .map_err(LmdbError::from)?
        {
            debug!(host = name, "delete bucket");
            bucket.clear(wtxn).map_err(LmdbError::from)?;
        }
        debug!(host = name, "create bucket");
        self.env
            .create_database::<Bytes, Bytes>(wtxn, Some(name))
            .map_err(LmdbError::from)?;
        Ok(())
    }
}
