// Background execution of the tree builder
// Caller and worker share no mutable state; the collection crosses the
// boundary by value and results come back as an async message stream

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

use crate::parser::model::RecordCollection;

use super::builder::{ProgressSink, TreeNode, build_forest};

/// One build request. The correlation id lets callers match responses when
/// more than one build is submitted to the same worker; builds themselves
/// run one at a time in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeRequest {
    pub request_id: u64,
    pub collection: RecordCollection,
}

/// Stream element for one build: any number of progress messages
/// (`finished == false`, no result) followed by exactly one terminal
/// message carrying the forest. `done` never decreases within a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeResponse {
    pub request_id: u64,
    pub finished: bool,
    pub done: u64,
    pub left: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Vec<TreeNode>>,
}

/// Transport failures of the worker boundary. These are distinct from
/// application warnings: an undefined edict is a tree leaf, a dead channel
/// is an error.
#[derive(Debug, Error)]
pub enum TreeWorkerError {
    #[error("tree worker is no longer accepting requests")]
    Closed,

    #[error("tree worker response stream ended before completion")]
    Disconnected,
}

/// Handle to a spawned tree-builder worker task.
pub struct TreeWorker {
    requests: mpsc::UnboundedSender<TreeRequest>,
    responses: mpsc::UnboundedReceiver<TreeResponse>,
    next_request_id: u64,
}

/// Forwards builder progress into the response stream.
struct ChannelSink {
    request_id: u64,
    responses: mpsc::UnboundedSender<TreeResponse>,
}

impl ProgressSink for ChannelSink {
    fn report(&mut self, done: u64, left: u64) {
        // A dropped receiver just means nobody is listening anymore
        let _ = self.responses.send(TreeResponse {
            request_id: self.request_id,
            finished: false,
            done,
            left,
            result: None,
        });
    }
}

impl TreeWorker {
    /// Spawn a worker that builds trees off the caller's control flow,
    /// reporting progress at the given wall-clock cadence. The traversal is
    /// CPU-bound, so each build runs on the blocking pool.
    pub fn spawn(cadence: Duration) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<TreeRequest>();
        let (response_tx, response_rx) = mpsc::unbounded_channel::<TreeResponse>();

        tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let response_tx = response_tx.clone();
                let build = tokio::task::spawn_blocking(move || {
                    let TreeRequest {
                        request_id,
                        collection,
                    } = request;

                    let mut sink = ChannelSink {
                        request_id,
                        responses: response_tx.clone(),
                    };
                    let (forest, done) = build_forest(&collection, cadence, &mut sink);

                    let _ = response_tx.send(TreeResponse {
                        request_id,
                        finished: true,
                        done,
                        left: 0,
                        result: Some(forest),
                    });
                });

                if build.await.is_err() {
                    // Builder panicked; stop accepting work so callers see
                    // the stream close instead of silence
                    break;
                }
            }
        });

        Self {
            requests: request_tx,
            responses: response_rx,
            next_request_id: 0,
        }
    }

    /// Submit a collection for building. Returns the correlation id its
    /// responses will carry.
    pub fn submit(&mut self, collection: RecordCollection) -> Result<u64, TreeWorkerError> {
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.requests
            .send(TreeRequest {
                request_id,
                collection,
            })
            .map_err(|_| TreeWorkerError::Closed)?;
        Ok(request_id)
    }

    /// Receive the next response, across all in-flight requests. `None`
    /// means the worker has shut down.
    pub async fn recv(&mut self) -> Option<TreeResponse> {
        self.responses.recv().await
    }

    /// Submit and wait for the terminal message, logging progress along the
    /// way. Responses for other correlation ids are skipped.
    pub async fn build(
        &mut self,
        collection: RecordCollection,
    ) -> Result<Vec<TreeNode>, TreeWorkerError> {
        let request_id = self.submit(collection)?;

        loop {
            let response = self.recv().await.ok_or(TreeWorkerError::Disconnected)?;
            if response.request_id != request_id {
                continue;
            }

            debug!(
                "tree build progress: {}/{}{}",
                response.done,
                response.done + response.left,
                if response.finished { " (complete)" } else { "" }
            );

            if response.finished {
                return response.result.ok_or(TreeWorkerError::Disconnected);
            }
        }
    }
}
