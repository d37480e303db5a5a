//! Fetch manager - single-flight request dispatch and the shared response cell
//!
//! The consumer (the render loop) never blocks: it starts a fetch, then polls
//! [`FetchManager::is_loading`] and [`FetchManager::response`] every frame.
//! Each accepted fetch runs on its own detached worker thread. The worker
//! publishes its [`FetchResponse`] into a mutex-guarded cell and only then
//! clears the loading flag, so a reader that sees `is_loading() == false`
//! always finds the finished response already in place.

use std::io;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::models::{FetchOutcome, FetchRequest, FetchResponse};
use crate::network::client::Transport;

/// Why a fetch was not started. Nothing changed in either case.
#[derive(Debug, Error)]
pub enum StartError {
    #[error("a fetch is already in flight")]
    InFlight,
    #[error("could not spawn fetch worker: {0}")]
    Dispatch(#[source] io::Error),
}

/// State shared between the manager and its worker
struct Shared {
    loading: AtomicBool,
    cell: Mutex<Option<Arc<FetchResponse>>>,
}

impl Shared {
    /// Replace the whole cell. The previous value is dropped after the lock is released.
    fn publish(&self, response: FetchResponse) {
        let previous = self.cell.lock().replace(Arc::new(response));
        drop(previous);
    }

    /// Empty the payload for a new fetch, unless nothing was ever published
    fn clear_for(&self, id: u64) {
        let mut cell = self.cell.lock();
        if cell.is_some() {
            let previous = cell.replace(Arc::new(FetchResponse::pending(id)));
            drop(cell);
            drop(previous);
        }
    }
}

/// Clears the loading flag when the worker exits, including by panic
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the response cell, the loading flag and the transport.
pub struct FetchManager {
    shared: Arc<Shared>,
    transport: Arc<dyn Transport>,
    next_id: AtomicU64,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl FetchManager {
    pub fn new(transport: impl Transport) -> Self {
        FetchManager {
            shared: Arc::new(Shared {
                loading: AtomicBool::new(false),
                cell: Mutex::new(None),
            }),
            transport: Arc::new(transport),
            next_id: AtomicU64::new(1),
            worker: Mutex::new(None),
        }
    }

    /// Start a fetch on a detached worker thread and return its id.
    ///
    /// Rejected with [`StartError::InFlight`] while another fetch runs; requests
    /// are never queued and the running fetch is never disturbed. On success the
    /// previous payload is replaced by an empty pending placeholder, so callers
    /// holding a formatted copy of the old response should drop it.
    pub fn start_fetch(&self, request: FetchRequest) -> Result<u64, StartError> {
        if self
            .shared
            .loading
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(url = %request.url, "fetch rejected, another one is in flight");
            return Err(StartError::InFlight);
        }

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let shared = Arc::clone(&self.shared);
        let transport = Arc::clone(&self.transport);
        // The worker waits for this before touching the network, so clearing
        // the cell below can never overwrite a result it already published.
        let (go_tx, go_rx) = oneshot::channel::<()>();

        let spawned = thread::Builder::new()
            .name(format!("fetch-{id}"))
            .spawn(move || {
                let _guard = LoadingGuard(&shared.loading);
                if go_rx.blocking_recv().is_err() {
                    return;
                }
                run_worker(&shared, transport.as_ref(), id, request);
            });

        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                self.shared.loading.store(false, Ordering::Release);
                tracing::warn!(id, error = %e, "failed to dispatch fetch worker");
                return Err(StartError::Dispatch(e));
            }
        };

        self.shared.clear_for(id);
        // Stored before the worker is released: a later start can only win the
        // flag after this worker finishes, so it always stores after us.
        // A previous handle belongs to a finished worker; dropping it detaches.
        *self.worker.lock() = Some(handle);
        let _ = go_tx.send(());
        Ok(id)
    }

    /// Whether a fetch is in flight. Never blocks.
    pub fn is_loading(&self) -> bool {
        self.shared.loading.load(Ordering::Acquire)
    }

    /// The current response, or `None` before any fetch has completed.
    ///
    /// The lock is held only to clone the `Arc`.
    pub fn response(&self) -> Option<Arc<FetchResponse>> {
        self.shared.cell.lock().clone()
    }

    /// Wait for an outstanding worker, then release the response and the transport.
    ///
    /// Called while a fetch is in flight this blocks until the transport
    /// returns, which its timeout bounds.
    pub fn shutdown(self) {
        if self.is_loading() {
            tracing::info!("waiting for in-flight fetch before shutdown");
        }
        if let Some(handle) = self.worker.lock().take() {
            if handle.join().is_err() {
                tracing::error!("fetch worker panicked");
            }
        }
        self.shared.cell.lock().take();
        tracing::debug!("fetch manager shut down");
    }
}

fn run_worker(shared: &Shared, transport: &dyn Transport, id: u64, request: FetchRequest) {
    let start = Instant::now();
    tracing::info!(id, url = %request.url, method = request.method().as_str(), "Executing fetch");

    let result = transport.execute(&request);
    let time_ms = start.elapsed().as_millis() as u64;

    let response = match result {
        Ok(reply) => {
            tracing::info!(id, status = reply.status, bytes = reply.body.len(), time_ms, "Fetch completed");
            FetchResponse {
                id,
                outcome: FetchOutcome::Completed {
                    status: reply.status,
                    truncated: reply.truncated,
                },
                body: reply.body,
                time_ms,
            }
        }
        Err(e) => {
            tracing::warn!(id, error = %e, time_ms, "Fetch failed");
            let message = e.to_string();
            FetchResponse {
                id,
                outcome: FetchOutcome::Failed { message },
                body: e.into_partial_body(),
                time_ms,
            }
        }
    };

    shared.publish(response);
}
