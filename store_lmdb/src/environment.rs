//! LMDB environment setup.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use fs2::FileExt;
use heed::types::Bytes;
use heed::{Database, Env, EnvFlags, EnvOpenOptions, RoTxn};
use tracing::{info, info_span, Span};

use hostcache_store::{validate_bucket_name, CacheError, MAX_BUCKET_NAME_LEN, META_BUCKET};

use crate::{LmdbConfig, LmdbError};

/// The open cache: the LMDB environment and its metadata database.
///
/// Host buckets are looked up by name inside each transaction rather than
/// kept as handles, because an aborted transaction invalidates the handles
/// it created.
pub struct LmdbEnvironment {
    pub(crate) env: Env,
    pub(crate) meta_db: Database<Bytes, Bytes>,
    pub(crate) span: Span,
    /// Held for the whole life of any transaction that opens a named
    /// database. LMDB requires such a transaction to finish before another
    /// one may call `mdb_dbi_open`.
    dbi_lock: Mutex<()>,
    /// Exclusive advisory lock on `<path>.lock`, held until close.
    lock_file: File,
    path: PathBuf,
}

/// Proof that the caller holds the named-database lock of an environment.
///
/// Take it with [`LmdbEnvironment::lock_dbi`] *before* beginning the
/// transaction, and keep it alive until that transaction is committed or
/// dropped.
pub(crate) type DbiGuard<'a> = MutexGuard<'a, ()>;

impl LmdbEnvironment {
    /// Open or create the cache file at `path` and make sure the metadata
    /// bucket exists.
    ///
    /// The parent directory must already exist. The file is created with
    /// owner-only read/write permission; LMDB keeps its lock table in a
    /// sibling `<path>-lock` file.
    ///
    /// Only one handle may hold the cache at a time, whether in this process
    /// or another. A second open fails with [`CacheError::Open`] until the
    /// first handle is closed or dropped.
    pub fn open(path: impl AsRef<Path>, config: &LmdbConfig) -> Result<Self, CacheError> {
        let path = path.as_ref().to_path_buf();
        let span = info_span!("hostcache", path = %path.display());
        let lock_file = lock_exclusive(&path)?;
        let (env, meta_db) = {
            let _enter = span.enter();
            info!(
                map_size = config.map_size,
                max_hosts = config.max_hosts,
                "opening changelog cache"
            );

            let mut options = EnvOpenOptions::new();
            options.map_size(config.map_size).max_dbs(config.max_dbs());
            // SAFETY: the cache file is owned by this process for the lifetime
            // of the handle, and nothing else maps or truncates it while open.
            let env = unsafe {
                options.flags(EnvFlags::NO_SUB_DIR);
                options.open(&path)
            }
            .map_err(|e| {
                CacheError::Open(format!("{}: {}", path.display(), LmdbError::from(e)))
            })?;

            let meta_db = create_meta_bucket(&env)
                .map_err(|e| CacheError::Bucket(format!("{META_BUCKET}: {e}")))?;
            (env, meta_db)
        };

        Ok(Self {
            env,
            meta_db,
            span,
            dbi_lock: Mutex::new(()),
            lock_file,
            path,
        })
    }

    /// Path of the cache file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush to disk, release the environment and drop the exclusive lock.
    ///
    /// Blocks until LMDB has closed the file, so the same path can be
    /// opened again afterwards.
    pub(crate) fn close_env(self) -> Result<(), CacheError> {
        let Self {
            env,
            span,
            lock_file,
            ..
        } = self;
        let _enter = span.enter();
        env.force_sync()
            .map_err(|e| CacheError::Close(LmdbError::from(e).to_string()))?;
        info!("closing changelog cache");
        env.prepare_for_closing().wait();
        FileExt::unlock(&lock_file)
            .map_err(|e| CacheError::Close(format!("unlock: {e}")))?;
        Ok(())
    }

    /// Host names with a metadata record, in key order.
    pub fn hosts(&self) -> Result<Vec<String>, CacheError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let mut hosts = Vec::new();
        for entry in self.meta_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, _) = entry.map_err(LmdbError::from)?;
            hosts.push(String::from_utf8_lossy(key).into_owned());
        }
        Ok(hosts)
    }

    /// Raw metadata bytes stored for `host`.
    pub(crate) fn meta_bytes<'t>(
        &self,
        rtxn: &'t RoTxn,
        host: &str,
    ) -> Result<Option<&'t [u8]>, CacheError> {
        // Keys LMDB cannot hold are never stored.
        if host.is_empty() || host.len() > MAX_BUCKET_NAME_LEN {
            return Ok(None);
        }
        Ok(self
            .meta_db
            .get(rtxn, host.as_bytes())
            .map_err(LmdbError::from)?)
    }

    /// The changelog bucket for `host`, if it has been created.
    pub(crate) fn host_bucket(
        &self,
        _dbi: &DbiGuard<'_>,
        rtxn: &RoTxn,
        host: &str,
    ) -> Result<Option<Database<Bytes, Bytes>>, CacheError> {
        if validate_bucket_name(host).is_err() {
            return Ok(None);
        }
        Ok(self
            .env
            .open_database::<Bytes, Bytes>(rtxn, Some(host))
            .map_err(LmdbError::from)?)
    }

    pub(crate) fn lock_dbi(&self) -> Result<DbiGuard<'_>, CacheError> {
        self.dbi_lock
            .lock()
            .map_err(|_| CacheError::Transaction("database handle lock poisoned".to_string()))
    }
}

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// Take the non-blocking exclusive lock guarding `path`.
///
/// `flock` locks conflict between open file descriptions, so this also
/// refuses a second handle inside the same process.
fn lock_exclusive(path: &Path) -> Result<File, CacheError> {
    let lock_path = lock_path(path);
    let mut options = OpenOptions::new();
    options.read(true).write(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let file = options
        .open(&lock_path)
        .map_err(|e| CacheError::Open(format!("{}: {e}", lock_path.display())))?;
    match file.try_lock_exclusive() {
        Ok(()) => Ok(file),
        Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => Err(
            CacheError::Open(format!("{}: already held by another handle", path.display())),
        ),
        Err(e) => Err(CacheError::Open(format!("{}: {e}", lock_path.display()))),
    }
}

fn create_meta_bucket(env: &Env) -> Result<Database<Bytes, Bytes>, LmdbError> {
    let mut wtxn = env.write_txn()?;
    let db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some(META_BUCKET))?;
    wtxn.commit()?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LmdbConfig {
        LmdbConfig {
            map_size: 10 * 1024 * 1024,
            max_hosts: 8,
        }
    }

    #[test]
    fn open_creates_file_and_meta_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        let env = LmdbEnvironment::open(&path, &test_config()).unwrap();
        assert!(path.is_file());
        assert_eq!(env.path(), path.as_path());

        let rtxn = env.env.read_txn().unwrap();
        let meta = env
            .env
            .open_database::<Bytes, Bytes>(&rtxn, Some(META_BUCKET))
            .unwrap();
        assert!(meta.is_some());
        drop(rtxn);
        env.close_env().unwrap();
    }

    #[test]
    fn open_fails_when_directory_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("cache.db");
        let err = LmdbEnvironment::open(&path, &test_config()).err().unwrap();
        assert!(matches!(err, CacheError::Open(_)), "got {err:?}");
    }

    #[test]
    fn reopen_keeps_existing_meta_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        LmdbEnvironment::open(&path, &test_config())
            .unwrap()
            .close_env()
            .unwrap();
        let env = LmdbEnvironment::open(&path, &test_config()).unwrap();
        assert!(env.hosts().unwrap().is_empty());
        env.close_env().unwrap();
    }

    #[test]
    fn host_bucket_refuses_metadata_bucket_name() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path().join("cache.db"), &test_config()).unwrap();
        let dbi = env.lock_dbi().unwrap();
        let rtxn = env.env.read_txn().unwrap();
        assert!(env.host_bucket(&dbi, &rtxn, META_BUCKET).unwrap().is_none());
        assert!(env.host_bucket(&dbi, &rtxn, "").unwrap().is_none());
    }

    #[test]
    fn second_open_of_the_same_path_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        let first = LmdbEnvironment::open(&path, &test_config()).unwrap();

        let err = LmdbEnvironment::open(&path, &test_config()).err().unwrap();
        assert!(
            matches!(err, CacheError::Open(ref m) if m.contains("already held")),
            "got {err:?}"
        );

        first.close_env().unwrap();
        let again = LmdbEnvironment::open(&path, &test_config()).unwrap();
        again.close_env().unwrap();
    }

    #[test]
    fn dropping_a_handle_releases_the_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        drop(LmdbEnvironment::open(&path, &test_config()).unwrap());
        let env = LmdbEnvironment::open(&path, &test_config()).unwrap();
        assert!(lock_path(&path).is_file());
        env.close_env().unwrap();
    }

    #[test]
    fn meta_bytes_of_empty_host_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let env = LmdbEnvironment::open(dir.path().join("cache.db"), &test_config()).unwrap();
        let rtxn = env.env.read_txn().unwrap();
        assert!(env.meta_bytes(&rtxn, "").unwrap().is_none());
    }
}
