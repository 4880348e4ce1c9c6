//! The session task: parses client frames and answers them in arrival order.
//!
//! Search failures and malformed frames become error frames. A session
//! stops once its inbox or its outbox is closed.

use std::sync::Arc;

use docdb_geolocation::GeolocationExtractor;
use docdb_repository::SearchService;
use docdb_shared::{render_rows, ClientRequest, Coordinates, ServerFrame};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

/// Bound of the inbound and outbound mailboxes of one session.
pub const MAILBOX_CAPACITY: usize = 32;

/// The index and document type every search of a session runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    pub index: String,
    /// Empty to search all document types.
    pub doc_type: String,
}

impl SearchTarget {
    pub fn new(index: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            doc_type: doc_type.into(),
        }
    }
}

/// The actor behind one socket connection.
pub struct Session {
    identity: String,
    id: Uuid,
    search: Arc<SearchService>,
    geolocation: GeolocationExtractor,
    target: SearchTarget,
    handled: u64,
}

impl Session {
    pub fn new(
        identity: impl Into<String>,
        search: Arc<SearchService>,
        geolocation: GeolocationExtractor,
        target: SearchTarget,
    ) -> Self {
        Self {
            identity: identity.into(),
            id: Uuid::new_v4(),
            search,
            geolocation,
            target,
            handled: 0,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Number of frames handled so far.
    pub fn handled(&self) -> u64 {
        self.handled
    }

    /// Handle one inbound text frame.
    ///
    /// # Returns
    ///
    /// * `Some(frame)` - The single reply to send back
    /// * `None` - The frame names no known request and gets no reply
    pub async fn handle_frame(&mut self, text: &str) -> Option<ServerFrame> {
        self.handled += 1;

        match ClientRequest::parse(text) {
            Ok(Some(ClientRequest::Search { pattern, .. })) => Some(self.search(&pattern).await),
            Ok(Some(ClientRequest::Geolocation { coordinates })) => {
                Some(self.locate(coordinates).await)
            }
            Ok(None) => {
                debug!("Ignoring frame without a known request");
                None
            }
            Err(e) => {
                warn!(error = %e, "Rejected frame");
                Some(ServerFrame::error(e.to_string()))
            }
        }
    }

    async fn search(&self, pattern: &str) -> ServerFrame {
        match self
            .search
            .search(pattern, &self.target.index, &self.target.doc_type)
            .await
        {
            Ok(rows) => {
                debug!(pattern = %pattern, hits = rows.len(), "Search answered");
                ServerFrame::search_result(render_rows(&rows))
            }
            Err(e) => {
                error!(pattern = %pattern, error = %e, "Search failed");
                ServerFrame::error(e.to_string())
            }
        }
    }

    async fn locate(&self, coordinates: Coordinates) -> ServerFrame {
        match self.geolocation.resolve(coordinates).await {
            Ok(place) => ServerFrame::location(place),
            Err(e) => {
                error!(coordinates = %coordinates, error = %e, "Geolocation failed");
                ServerFrame::error(e.to_string())
            }
        }
    }

    /// Process frames from `inbox` in order until it closes.
    ///
    /// Stops early when `outbox` has no receiver left. Returns the number of
    /// frames handled.
    pub async fn run(
        mut self,
        mut inbox: mpsc::Receiver<String>,
        outbox: mpsc::Sender<ServerFrame>,
    ) -> u64 {
        let span = info_span!("session", identity = %self.identity, session_id = %self.id);

        async move {
            info!("Session opened");

            while let Some(text) = inbox.recv().await {
                if let Some(frame) = self.handle_frame(&text).await {
                    if outbox.send(frame).await.is_err() {
                        debug!("Outbound mailbox closed");
                        break;
                    }
                }
            }

            info!(frames = self.handled, "Session closed");
            self.handled
        }
        .instrument(span)
        .await
    }
}

/// Run `session` on its own task.
pub fn spawn_session(
    session: Session,
    inbox: mpsc::Receiver<String>,
    outbox: mpsc::Sender<ServerFrame>,
) -> JoinHandle<u64> {
    tokio::spawn(session.run(inbox, outbox))
}
