//! CatalogService - background thread answering catalog queries
//!
//! Queries are queued over a crossbeam channel and answered one at a time
//! on the "catalog-service" thread. Completion callbacks run on that thread,
//! so callers must treat them as running concurrently with their own code.

use super::{CatalogError, CatalogGateway, CatalogReply, CatalogRequest, MemoryCatalog, ReplyCallback};
use crossbeam::channel::{Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Commands accepted by the service thread
pub enum CatalogCommand {
    Query {
        request: CatalogRequest,
        on_reply: ReplyCallback,
    },
    Shutdown,
}

/// Answers queued queries from a [`MemoryCatalog`]
pub struct CatalogService {
    catalog: Arc<MemoryCatalog>,
    command_rx: Receiver<CatalogCommand>,
    reply_delay: Duration,
}

impl CatalogService {
    /// Spawn the service thread
    ///
    /// `reply_delay` is slept before answering each query, simulating the
    /// round trip to a player.
    pub fn spawn(catalog: Arc<MemoryCatalog>, reply_delay: Duration) -> Result<CatalogClient, String> {
        let (command_tx, command_rx) = crossbeam::channel::unbounded();

        let service = CatalogService {
            catalog: Arc::clone(&catalog),
            command_rx,
            reply_delay,
        };

        let handle = thread::Builder::new()
            .name("catalog-service".into())
            .spawn(move || service.run())
            .map_err(|e| format!("Failed to spawn catalog service thread: {}", e))?;

        Ok(CatalogClient {
            catalog,
            command_tx,
            thread_handle: Mutex::new(Some(handle)),
        })
    }

    fn run(self) {
        log::info!("CatalogService: Started");

        while let Ok(cmd) = self.command_rx.recv() {
            match cmd {
                CatalogCommand::Shutdown => {
                    log::info!("CatalogService: Shutting down");
                    break;
                }
                CatalogCommand::Query { request, on_reply } => self.answer(request, on_reply),
            }
        }

        log::info!("CatalogService: Stopped");
    }

    fn answer(&self, request: CatalogRequest, on_reply: ReplyCallback) {
        if !self.reply_delay.is_zero() {
            thread::sleep(self.reply_delay);
        }

        match self.catalog.answer(&request) {
            Ok(payload) => {
                log::debug!(
                    "CatalogService: Answering {} for player {} {}",
                    request.query.name(),
                    request.player,
                    request.slot
                );
                on_reply(CatalogReply { request, payload });
            }
            // No reply is sent; the browser keeps its current view
            Err(e) => log::warn!(
                "CatalogService: Dropping {} query for player {}: {}",
                request.query.name(),
                request.player,
                e
            ),
        }
    }
}

/// Gateway handle to a running [`CatalogService`]
///
/// Requests for players or slots the catalog doesn't hold are refused at
/// submission. Dropping the client stops the service.
pub struct CatalogClient {
    catalog: Arc<MemoryCatalog>,
    command_tx: Sender<CatalogCommand>,
    thread_handle: Mutex<Option<JoinHandle<()>>>,
}

impl CatalogClient {
    /// Check if the service thread is still running
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Stop the service and wait for queued queries to finish
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(CatalogCommand::Shutdown);
        let handle = self.thread_handle.lock().ok().and_then(|mut guard| guard.take());
        if let Some(handle) = handle {
            if handle.join().is_err() {
                log::warn!("CatalogService: Thread panicked");
            }
        }
    }
}

impl CatalogGateway for CatalogClient {
    fn submit(&self, request: CatalogRequest, on_reply: ReplyCallback) -> Result<(), CatalogError> {
        self.catalog.check(request.player, request.slot)?;
        self.command_tx
            .send(CatalogCommand::Query { request, on_reply })
            .map_err(|_| CatalogError::ServiceUnavailable)
    }
}

impl Drop for CatalogClient {
    fn drop(&mut self) {
        let _ = self.command_tx.send(CatalogCommand::Shutdown);
    }
}
