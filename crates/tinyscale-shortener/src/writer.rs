use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tinyscale_core::{Alias, Repository, StorageError, UrlCache, UrlRecord};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, trace, warn};
use typed_builder::TypedBuilder;

type Result<T> = std::result::Result<T, StorageError>;

/// When the durable write of a new mapping happens relative to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// The caller waits for the durable store to accept the mapping.
    #[default]
    Sync,
    /// The mapping is queued for a background worker and the caller returns
    /// immediately. Failed writes are dead-lettered.
    Background,
}

/// Configuration for a [`MappingWriter`].
#[derive(Debug, Clone, TypedBuilder)]
pub struct WriterConfig {
    #[builder(default)]
    pub mode: WriteMode,
    /// Number of background worker tasks. Ignored in [`WriteMode::Sync`].
    #[builder(default = 4)]
    pub workers: usize,
    /// Bound of the background job queue; producers wait when it is full.
    #[builder(default = 1024)]
    pub queue_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug)]
struct Job {
    alias: Alias,
    record: UrlRecord,
}

struct Shared<R, C> {
    repository: Arc<R>,
    cache: Arc<C>,
    /// Aliases queued for a background write, with their long URL.
    pending: DashMap<String, String>,
    dead_letters: AtomicU64,
}

struct Background {
    sender: Mutex<Option<mpsc::Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

/// Persists new mappings to the durable store and mirrors them into the cache.
///
/// The durable write is authoritative. The cache write happens only after
/// the store has accepted the mapping and its failure is logged, never
/// returned: the read path repairs missing cache entries.
pub struct MappingWriter<R, C> {
    shared: Arc<Shared<R, C>>,
    background: Option<Background>,
}

impl<R: Repository, C: UrlCache> MappingWriter<R, C> {
    /// Creates a writer.
    ///
    /// In [`WriteMode::Background`] this spawns the worker tasks, so it must
    /// be called from within a tokio runtime.
    pub fn new(repository: Arc<R>, cache: Arc<C>, config: WriterConfig) -> Self {
        let shared = Arc::new(Shared {
            repository,
            cache,
            pending: DashMap::new(),
            dead_letters: AtomicU64::new(0),
        });

        let background = match config.mode {
            WriteMode::Sync => None,
            WriteMode::Background => Some(Self::spawn_workers(&shared, &config)),
        };

        Self { shared, background }
    }

    fn spawn_workers(shared: &Arc<Shared<R, C>>, config: &WriterConfig) -> Background {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let receiver = Arc::new(tokio::sync::Mutex::new(receiver));

        let workers = (0..config.workers.max(1))
            .map(|worker| {
                let shared = Arc::clone(shared);
                let receiver = Arc::clone(&receiver);
                tokio::spawn(run_worker(worker, shared, receiver))
            })
            .collect();

        Background {
            sender: Mutex::new(Some(sender)),
            workers: Mutex::new(workers),
        }
    }

    pub fn mode(&self) -> WriteMode {
        if self.background.is_some() {
            WriteMode::Background
        } else {
            WriteMode::Sync
        }
    }

    /// Number of background writes that failed and were dropped.
    pub fn dead_letters(&self) -> u64 {
        self.shared.dead_letters.load(Ordering::Relaxed)
    }

    /// Number of queued background writes not yet confirmed by the store.
    pub fn pending(&self) -> usize {
        self.shared.pending.len()
    }

    /// Looks up the long URL an alias is bound to, including bindings
    /// still queued for a background write.
    pub async fn lookup(&self, alias: &Alias) -> Result<Option<String>> {
        if let Some(long_url) = self.shared.pending.get(alias.as_str()) {
            trace!(alias = %alias, "alias has a pending write");
            return Ok(Some(long_url.clone()));
        }

        Ok(self
            .shared
            .repository
            .get(alias)
            .await?
            .map(|record| record.long_url))
    }

    /// Writes a new mapping.
    ///
    /// Returns `Err(Conflict)` if the alias is already taken, either in the
    /// durable store or by a pending background write of a different URL.
    pub async fn write(&self, alias: &Alias, record: UrlRecord) -> Result<()> {
        let Some(background) = &self.background else {
            let long_url = record.long_url.clone();
            self.shared.repository.insert(alias, record).await?;
            debug!(alias = %alias, "stored url mapping");
            self.shared.mirror(alias, &long_url).await;
            return Ok(());
        };

        if let Some(existing) = self.shared.pending.get(alias.as_str()) {
            return claimed_by(alias, existing.value(), &record.long_url);
        }

        let sender = background.sender.lock().clone();
        let Some(sender) = sender else {
            return Err(StorageError::Unavailable(
                "mapping writer is shut down".to_string(),
            ));
        };

        // Waits while the queue is full. Nothing is claimed yet, so a caller
        // dropped here leaves no trace.
        let permit = sender.reserve().await.map_err(|_| {
            StorageError::Unavailable("mapping writer queue is closed".to_string())
        })?;

        // From here to the send there is no await: a claim is always queued.
        match self.shared.pending.entry(alias.as_str().to_owned()) {
            Entry::Occupied(existing) => {
                return claimed_by(alias, existing.get(), &record.long_url);
            }
            Entry::Vacant(slot) => {
                slot.insert(record.long_url.clone());
            }
        }
        permit.send(Job {
            alias: alias.clone(),
            record,
        });

        trace!(alias = %alias, "queued url mapping for background write");
        Ok(())
    }

    /// Stops accepting background writes and waits for queued ones to finish.
    ///
    /// A no-op in [`WriteMode::Sync`]. Safe to call more than once.
    pub async fn shutdown(&self) {
        let Some(background) = &self.background else {
            return;
        };

        drop(background.sender.lock().take());
        let workers = std::mem::take(&mut *background.workers.lock());

        for handle in workers {
            if let Err(e) = handle.await {
                error!(error = %e, "mapping writer worker panicked");
            }
        }
        debug!("mapping writer drained");
    }
}

impl<R: Repository, C: UrlCache> Shared<R, C> {
    async fn mirror(&self, alias: &Alias, long_url: &str) {
        if let Err(e) = self.cache.set_url(alias, long_url).await {
            warn!(alias = %alias, error = %e, "failed to mirror mapping into cache");
        }
    }

    async fn persist(&self, job: Job) {
        let Job { alias, record } = job;
        let long_url = record.long_url.clone();

        match self.repository.insert(&alias, record).await {
            Ok(()) => {
                debug!(alias = %alias, "stored url mapping");
                self.mirror(&alias, &long_url).await;
            }
            Err(StorageError::Conflict(_)) => match self.repository.get(&alias).await {
                Ok(Some(existing)) if existing.long_url == long_url => {
                    debug!(alias = %alias, "mapping was already stored");
                    self.mirror(&alias, &long_url).await;
                }
                Ok(_) => self.dead_letter(&alias, &long_url, "alias taken by a different url"),
                Err(e) => self.dead_letter(&alias, &long_url, &e.to_string()),
            },
            Err(e) => self.dead_letter(&alias, &long_url, &e.to_string()),
        }

        self.pending.remove(alias.as_str());
    }

    fn dead_letter(&self, alias: &Alias, long_url: &str, reason: &str) {
        self.dead_letters.fetch_add(1, Ordering::Relaxed);
        error!(
            target: "tinyscale::dead_letter",
            alias = %alias,
            long_url = %long_url,
            reason = %reason,
            "dropping url mapping after failed background write"
        );
    }
}

/// Outcome of writing `long_url` under an alias already claimed for `claimed`.
fn claimed_by(alias: &Alias, claimed: &str, long_url: &str) -> Result<()> {
    if claimed == long_url {
        Ok(())
    } else {
        Err(StorageError::Conflict(alias.to_string()))
    }
}

async fn run_worker<R: Repository, C: UrlCache>(
    worker: usize,
    shared: Arc<Shared<R, C>>,
    receiver: Arc<tokio::sync::Mutex<mpsc::Receiver<Job>>>,
) {
    trace!(worker, "mapping writer worker started");
    loop {
        let job = receiver.lock().await.recv().await;
        let Some(job) = job else {
            break;
        };
        shared.persist(job).await;
    }
    trace!(worker, "mapping writer worker stopped");
}
