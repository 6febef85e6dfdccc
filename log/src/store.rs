//! Bounded, append-only log store.
//!
//! [`BoundedLog`] owns offset assignment and retention for a single named
//! list in the storage backend. Each append pushes a framed entry carrying
//! the next offset, then trims the list to its newest `capacity` elements.

use std::sync::Arc;

use bytes::Bytes;
use common::ListStorage;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::model::{LogEntry, Offset, PageRequest};
use crate::range::{RetainedWindow, resolve};

/// In-process view of the backing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WindowState {
    /// Offset that the next append receives.
    next_offset: Offset,
    /// Number of entries currently held by the list.
    retained: u64,
    /// Set when the list may no longer match this view, e.g. after a write
    /// whose reply was lost. The next operation reloads from storage.
    in_doubt: bool,
}

impl WindowState {
    fn window(&self) -> RetainedWindow {
        RetainedWindow::from_tail(self.next_offset, self.retained)
    }
}

/// Append-only sequence with a fixed maximum retained length.
///
/// # Concurrency
///
/// Appends hold the write lock from offset assignment until the state
/// update, so concurrent appenders in this process always receive distinct
/// consecutive offsets. Reads copy the window under the read lock and fetch
/// without it. If an append shifted the list in the meantime, the read is
/// repeated while holding the lock. A log key supports a single writer
/// process.
///
/// # Unknown write outcomes
///
/// A backend error on append does not prove the entry was not stored: the
/// reply can be lost after the write committed. The state is then marked in
/// doubt and rebuilt from the stored frames before the next operation, so
/// an offset is never handed out twice.
pub(crate) struct BoundedLog {
    storage: Arc<dyn ListStorage>,
    key: String,
    capacity: u64,
    state: RwLock<WindowState>,
}

impl BoundedLog {
    /// Opens the log stored under `key`, recovering its offset counter from
    /// the entries already present.
    ///
    /// The list is trimmed to `capacity` first, so lowering the capacity
    /// between runs evicts the oldest entries immediately.
    pub(crate) async fn open(
        storage: Arc<dyn ListStorage>,
        key: impl Into<String>,
        capacity: u64,
    ) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidInput(
                "log capacity must be at least 1".to_string(),
            ));
        }
        let key = key.into();
        let state = load_state(storage.as_ref(), &key, capacity).await?;

        tracing::info!(
            key = %key,
            capacity,
            next_offset = state.next_offset,
            retained = state.retained,
            "Opened bounded log"
        );

        Ok(Self {
            storage,
            key,
            capacity,
            state: RwLock::new(state),
        })
    }

    /// Appends an encoded payload and returns its offset.
    ///
    /// Once the list holds `capacity` entries, every append evicts the
    /// oldest one. A write the backend rejects consumes no offset; a write
    /// that was applied before its error surfaced keeps its offset.
    pub(crate) async fn append(&self, payload: Bytes) -> Result<Offset> {
        let mut state = self.state.write().await;
        if state.in_doubt {
            *state = self.reload().await?;
        }

        let offset = state.next_offset;
        let entry = LogEntry { offset, payload };

        let len = match self
            .storage
            .push_trimmed(&self.key, entry.serialize(), self.capacity)
            .await
        {
            Ok(len) => len,
            Err(e) => {
                state.in_doubt = true;
                tracing::warn!(key = %self.key, offset, error = %e, "Append outcome unknown");
                return Err(e.into());
            }
        };

        if len != state.retained + 1 {
            tracing::warn!(
                key = %self.key,
                expected = state.retained + 1,
                actual = len,
                "List length diverged from local state, reloading before next operation"
            );
            state.in_doubt = true;
        }

        state.next_offset += 1;
        state.retained = len.min(self.capacity);

        tracing::debug!(key = %self.key, offset, retained = state.retained, "Appended entry");
        Ok(offset)
    }

    /// Returns retained entries with offsets in `[offset, offset + limit)`,
    /// in ascending offset order.
    ///
    /// Offsets that were evicted or not yet assigned are omitted. An entry
    /// that cannot be parsed, or breaks the offset sequence, is reported as
    /// [`Error::Corruption`].
    pub(crate) async fn range(&self, request: &PageRequest) -> Result<Vec<LogEntry>> {
        let window = self.snapshot().await?;
        if let Some(entries) = self.fetch(request, &window).await? {
            return Ok(entries);
        }

        // Appends moved the list during the read. Reload, then read again
        // with no append able to interleave.
        tracing::debug!(key = %self.key, "Retained window moved during read, retrying");
        let mut state = self.state.write().await;
        *state = self.reload().await?;
        let state = state.downgrade();
        let window = state.window();
        self.fetch(request, &window).await?.ok_or_else(|| {
            Error::Corruption(format!(
                "entries in {} do not match retained offsets {}..{}",
                self.key, window.start, window.end
            ))
        })
    }

    /// Returns the currently retained window.
    pub(crate) async fn window(&self) -> RetainedWindow {
        self.state.read().await.window()
    }

    /// Issues a minimal read to verify the backend is reachable.
    pub(crate) async fn check_storage(&self) -> Result<()> {
        self.storage.range(&self.key, 0, 1).await?;
        Ok(())
    }

    pub(crate) fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Copies the current window, reloading first if the state is in doubt.
    async fn snapshot(&self) -> Result<RetainedWindow> {
        {
            let state = self.state.read().await;
            if !state.in_doubt {
                return Ok(state.window());
            }
        }
        let mut state = self.state.write().await;
        if state.in_doubt {
            *state = self.reload().await?;
        }
        Ok(state.window())
    }

    /// Rebuilds the state from the stored frames.
    ///
    /// Callers hold the write lock.
    async fn reload(&self) -> Result<WindowState> {
        let state = load_state(self.storage.as_ref(), &self.key, self.capacity).await?;
        tracing::info!(
            key = %self.key,
            next_offset = state.next_offset,
            retained = state.retained,
            "Reloaded bounded log state from storage"
        );
        Ok(state)
    }

    /// Reads the list indices `request` resolves to within `window`.
    ///
    /// Returns `None` when the entries are intact but not where `window`
    /// places them, which happens when appends shift the list between
    /// copying the window and reading it.
    async fn fetch(
        &self,
        request: &PageRequest,
        window: &RetainedWindow,
    ) -> Result<Option<Vec<LogEntry>>> {
        let Some(indices) = resolve(request, window) else {
            return Ok(Some(Vec::new()));
        };

        let values = self
            .storage
            .range(&self.key, indices.start, indices.end)
            .await?;
        if values.len() as u64 != indices.end - indices.start {
            return Ok(None);
        }

        let mut entries: Vec<LogEntry> = Vec::with_capacity(values.len());
        for value in values {
            let entry = LogEntry::deserialize(value)
                .map_err(|e| e.into_corruption(format_args!("entry in {}", self.key)))?;
            if let Some(prev) = entries.last() {
                let expected = prev.offset + 1;
                if entry.offset != expected {
                    return Err(Error::Corruption(format!(
                        "expected offset {} in {}, found {}",
                        expected, self.key, entry.offset
                    )));
                }
            }
            entries.push(entry);
        }

        let first_offset = window.start + indices.start;
        match entries.first() {
            Some(first) if first.offset != first_offset => Ok(None),
            _ => Ok(Some(entries)),
        }
    }
}

/// Trims the list to `capacity` and rebuilds the window state from what
/// remains.
///
/// Trimming first covers a push whose trim never ran, which would otherwise
/// leave the newest entry outside the window read back.
async fn load_state(storage: &dyn ListStorage, key: &str, capacity: u64) -> Result<WindowState> {
    storage.trim(key, capacity).await?;
    let values = storage.range(key, 0, capacity).await?;
    recover_state(values)
}

/// Rebuilds the window state from the list contents, oldest first.
fn recover_state(values: Vec<Bytes>) -> Result<WindowState> {
    let (Some(first), Some(last)) = (values.first(), values.last()) else {
        return Ok(WindowState {
            next_offset: 0,
            retained: 0,
            in_doubt: false,
        });
    };

    let first = LogEntry::deserialize(first.clone())
        .map_err(|e| e.into_corruption("oldest retained entry"))?;
    let last = LogEntry::deserialize(last.clone())
        .map_err(|e| e.into_corruption("newest retained entry"))?;
    let retained = values.len() as u64;

    if last.offset < first.offset || last.offset - first.offset + 1 != retained {
        return Err(Error::Corruption(format!(
            "retained offsets {}..={} do not match {} stored entries",
            first.offset, last.offset, retained
        )));
    }

    Ok(WindowState {
        next_offset: last.offset + 1,
        retained,
        in_doubt: false,
    })
}
