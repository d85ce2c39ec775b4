//! Background render worker.
//!
//! Rasterizing a page can take long enough to stall the UI, so the document
//! lives on a dedicated thread. The UI sends requests over a channel and polls
//! for results; every render request is tagged with a generation so results
//! that were superseded before they arrived can be dropped.
//!
//! Consecutive render requests that queue up while the worker is busy are
//! coalesced: only the newest one is rendered.

use crate::page::{DocumentRenderer, RenderedPage};
use crate::pdf::{PdfError, PdfResult};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Request sent to the worker thread
#[derive(Debug, Clone, PartialEq)]
enum RenderRequest {
    Open(PathBuf),
    Render {
        page_index: u16,
        zoom: f32,
        generation: u64,
    },
    Shutdown,
}

/// Result delivered back from the worker thread
#[derive(Debug)]
pub enum RenderEvent {
    /// A document finished loading
    Opened { path: PathBuf, page_count: u16 },
    /// A page finished rendering
    Rendered { generation: u64, page: RenderedPage },
    /// Loading (`generation == None`) or rendering failed
    Failed {
        generation: Option<u64>,
        error: PdfError,
    },
}

/// Handle to the render thread
pub struct RenderWorker {
    requests: Sender<RenderRequest>,
    events: Receiver<RenderEvent>,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl RenderWorker {
    /// Spawn a worker that opens documents with `open`.
    ///
    /// The renderer is created on the worker thread and never leaves it.
    /// `notify` is called after every event is queued, e.g. to wake the UI.
    pub fn spawn<R, F, N>(open: F, notify: N) -> Self
    where
        R: DocumentRenderer + 'static,
        F: Fn(&Path) -> PdfResult<R> + Send + 'static,
        N: Fn() + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("render-worker".to_string())
            .spawn(move || worker_loop(request_rx, event_tx, open, notify))
            .ok();

        if handle.is_none() {
            log::warn!("Failed to spawn render worker thread");
        }

        Self {
            requests: request_tx,
            events: event_rx,
            generation: 0,
            handle,
        }
    }

    /// Ask the worker to load a document, replacing the current one.
    ///
    /// Any render still in flight for the previous document becomes stale.
    pub fn open(&mut self, path: impl Into<PathBuf>) -> PdfResult<()> {
        self.generation += 1;
        self.send(RenderRequest::Open(path.into()))
    }

    /// Ask the worker to render a page; returns the request's generation.
    pub fn request_render(&mut self, page_index: u16, zoom: f32) -> PdfResult<u64> {
        self.generation += 1;
        let generation = self.generation;
        self.send(RenderRequest::Render {
            page_index,
            zoom,
            generation,
        })?;
        Ok(generation)
    }

    /// Whether `generation` belongs to the newest request
    pub fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Next non-stale event, without blocking
    pub fn try_recv(&self) -> Option<RenderEvent> {
        loop {
            let event = self.events.try_recv().ok()?;
            if self.keep(&event) {
                return Some(event);
            }
        }
    }

    /// Next non-stale event, waiting up to `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Option<RenderEvent> {
        loop {
            let event = self.events.recv_timeout(timeout).ok()?;
            if self.keep(&event) {
                return Some(event);
            }
        }
    }

    fn keep(&self, event: &RenderEvent) -> bool {
        match event {
            RenderEvent::Rendered { generation, .. }
            | RenderEvent::Failed {
                generation: Some(generation),
                ..
            } => {
                let current = self.is_current(*generation);
                if !current {
                    log::debug!("Dropping stale render result (generation {})", generation);
                }
                current
            }
            _ => true,
        }
    }

    fn send(&self, request: RenderRequest) -> PdfResult<()> {
        self.requests
            .send(request)
            .map_err(|_| PdfError::WorkerGone)
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        let _ = self.requests.send(RenderRequest::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop<R, F, N>(
    requests: Receiver<RenderRequest>,
    events: Sender<RenderEvent>,
    open: F,
    notify: N,
) where
    R: DocumentRenderer,
    F: Fn(&Path) -> PdfResult<R>,
    N: Fn(),
{
    let mut document: Option<R> = None;
    let mut backlog: VecDeque<RenderRequest> = VecDeque::new();

    loop {
        let request = match backlog.pop_front() {
            Some(request) => request,
            None => match requests.recv() {
                Ok(request) => request,
                Err(_) => return,
            },
        };

        let event = match request {
            RenderRequest::Shutdown => return,
            RenderRequest::Open(path) => match open(&path) {
                Ok(renderer) => {
                    let page_count = renderer.page_count();
                    document = Some(renderer);
                    RenderEvent::Opened { path, page_count }
                }
                Err(error) => {
                    log::warn!("Failed to open {}: {}", path.display(), error);
                    RenderEvent::Failed {
                        generation: None,
                        error,
                    }
                }
            },
            render @ RenderRequest::Render { .. } => {
                let latest = coalesce(render, &requests, &mut backlog);
                let RenderRequest::Render {
                    page_index,
                    zoom,
                    generation,
                } = latest
                else {
                    continue;
                };
                match document.as_ref() {
                    Some(renderer) => match renderer.render_page(page_index, zoom) {
                        Ok(page) => RenderEvent::Rendered { generation, page },
                        Err(error) => {
                            log::warn!("Failed to render page {}: {}", page_index, error);
                            RenderEvent::Failed {
                                generation: Some(generation),
                                error,
                            }
                        }
                    },
                    None => RenderEvent::Failed {
                        generation: Some(generation),
                        error: PdfError::LoadError("no document loaded".to_string()),
                    },
                }
            }
        };

        if events.send(event).is_err() {
            return;
        }
        notify();
    }
}

/// Skip ahead to the newest queued render request.
///
/// Non-render requests stop the scan and are kept in order in `backlog`.
fn coalesce(
    mut latest: RenderRequest,
    requests: &Receiver<RenderRequest>,
    backlog: &mut VecDeque<RenderRequest>,
) -> RenderRequest {
    if !backlog.is_empty() {
        return latest;
    }
    loop {
        match requests.try_recv() {
            Ok(next @ RenderRequest::Render { .. }) => latest = next,
            Ok(other) => {
                backlog.push_back(other);
                return latest;
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return latest,
        }
    }
}
