//! moderation/worker.rs
//! Long-lived classification worker.
//!
//! Requests are handled in arrival order. Before and after each classification the
//! worker drains aborts already queued, so an aborted task skips the work or has its
//! result dropped. A classifier error fails one task; a panic is fatal and ends the
//! worker.

use std::any::Any;
use std::collections::{HashSet, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use crossbeam::channel::{Receiver, Sender};
use tracing::{debug, error};

use crate::moderation::classifier::{ClassificationRule, Classifier};
use crate::moderation::image::Bitmap;
use crate::moderation::types::{ModerationRequest, ModerationResponse, TaskId};

/// Handled ids remembered so late aborts for them are not kept around.
const RECENT_LEN: usize = 16;

pub struct ModerationWorker {
    classifier: Box<dyn Classifier>,
    rule: ClassificationRule,
}

#[derive(Default)]
struct Queue {
    backlog: VecDeque<(TaskId, Bitmap)>,
    aborted: HashSet<TaskId>,
    recent: VecDeque<TaskId>,
}

impl Queue {
    fn push(&mut self, request: ModerationRequest) {
        match request {
            ModerationRequest::Abort { id } if !self.recent.contains(&id) => {
                self.aborted.insert(id);
            }
            ModerationRequest::Abort { .. } => {}
            ModerationRequest::Classify { id, bitmap } => self.backlog.push_back((id, bitmap)),
        }
    }

    fn drain(&mut self, rx: &Receiver<ModerationRequest>) {
        for request in rx.try_iter() {
            self.push(request);
        }
    }

    /// True once per aborted id.
    fn take_aborted(&mut self, id: TaskId) -> bool {
        self.aborted.remove(&id)
    }

    fn handled(&mut self, id: TaskId) {
        if self.recent.len() == RECENT_LEN {
            self.recent.pop_front();
        }
        self.recent.push_back(id);
    }
}

impl ModerationWorker {
    pub fn new(classifier: Box<dyn Classifier>, rule: ClassificationRule) -> Self {
        Self { classifier, rule }
    }

    /// Start the worker loop. It exits when `rx` closes, when `tx` has no
    /// receiver, or after reporting a fatal error.
    pub fn run(
        self,
        rx: Receiver<ModerationRequest>,
        tx: Sender<ModerationResponse>,
    ) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("moderation-worker".into())
            .spawn(move || self.serve(rx, tx))
    }

    fn serve(mut self, rx: Receiver<ModerationRequest>, tx: Sender<ModerationResponse>) {
        debug!("moderation worker started");
        let mut queue = Queue::default();

        loop {
            queue.drain(&rx);
            let (id, bitmap) = match queue.backlog.pop_front() {
                Some(next) => next,
                None => match rx.recv() {
                    Ok(request) => {
                        queue.push(request);
                        continue;
                    }
                    Err(_) => break,
                },
            };

            if queue.take_aborted(id) {
                queue.handled(id);
                debug!(id, "moderation task aborted before classification");
                continue;
            }

            let outcome = catch_unwind(AssertUnwindSafe(|| self.classifier.classify(&bitmap)));
            drop(bitmap);

            let response = match outcome {
                Ok(Ok(predictions)) => ModerationResponse::Result {
                    id,
                    safe: !self.rule.is_unsafe(&predictions),
                },
                Ok(Err(e)) => ModerationResponse::TaskError { id, error: e.to_string() },
                Err(panic) => {
                    let error = panic_message(panic.as_ref());
                    error!(id, %error, "moderation worker crashed");
                    let _ = tx.send(ModerationResponse::FatalError { error });
                    return;
                }
            };

            queue.drain(&rx);
            let aborted = queue.take_aborted(id);
            queue.handled(id);
            if aborted {
                debug!(id, "dropping result of aborted moderation task");
                continue;
            }

            if tx.send(response).is_err() {
                break;
            }
        }
        debug!("moderation worker stopped");
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Moderation worker error".to_string()
    }
}
