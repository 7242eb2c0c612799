use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use futures::{Stream, StreamExt};

use crate::editing::{AnchorError, AnchorId, AnchorTracker, Edit, EditHost};
use crate::streaming::{
    CalloutTemplate, Fragment, GenerationSource, PromptSpec, StreamError, display_message,
    format_fragment,
};

/// How a stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The source finished; `fragments` of its fragments were written
    Completed { fragments: usize },
    /// The source failed and an error message was written in place of further output
    Failed,
    /// The anchor disappeared or the host refused a write, remaining output (including any error
    /// message) was dropped
    Aborted,
}

/// Result of [`StreamInserter::generate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generation {
    pub id: AnchorId,
    pub outcome: StreamOutcome,
}

/// Writes generated responses into a document, one callout per request.
///
/// Every fragment re-resolves its anchor before it is written, so edits made between fragments
/// (by the user or by other requests) never misplace output.
pub struct StreamInserter<H: EditHost> {
    tracker: AnchorTracker,
    host: Rc<RefCell<H>>,
    template: CalloutTemplate,
}

impl<H: EditHost> StreamInserter<H> {
    pub fn new(tracker: AnchorTracker, host: Rc<RefCell<H>>, template: CalloutTemplate) -> Self {
        Self {
            tracker,
            host,
            template,
        }
    }

    pub fn tracker(&self) -> &AnchorTracker {
        &self.tracker
    }

    pub fn template(&self) -> &CalloutTemplate {
        &self.template
    }

    /// Insert the callout header at `insertion_point` and anchor `id` right after it
    pub fn start(
        &self,
        id: AnchorId,
        insertion_point: usize,
        prompt: &PromptSpec,
    ) -> Result<(), StreamError> {
        self.template.validate()?;
        if self.tracker.contains(id) {
            return Err(AnchorError::Duplicate(id).into());
        }

        let mut host = self.host.borrow_mut();
        let len = host.len();
        if insertion_point > len {
            return Err(AnchorError::OutOfBounds {
                position: insertion_point,
                len,
            }
            .into());
        }

        let header = self.template.header(prompt.label());
        let anchor_at = insertion_point + header.len();
        host.apply(Edit::insert(insertion_point, header))?;
        self.tracker.register(id, anchor_at, host.len())?;

        log::info!(
            "started generation {id} with {} at offset {insertion_point}",
            prompt.label()
        );
        Ok(())
    }

    /// Drive a fragment stream into the callout anchored at `id`.
    ///
    /// Each fragment is held back until the next one arrives so the final one can be written
    /// with the closing line break. A source error replaces the held fragment with an error
    /// message.
    pub async fn run<S, F, E>(&self, id: AnchorId, stream: S) -> StreamOutcome
    where
        S: Stream<Item = Result<F, E>>,
        F: Fragment,
        E: Display,
    {
        let mut stream = std::pin::pin!(stream);
        let mut pending: Option<String> = None;
        let mut written = 0;

        while let Some(item) = stream.next().await {
            match item {
                Ok(fragment) => {
                    let text = fragment.text().into_owned();
                    if let Some(previous) = pending.replace(text) {
                        if !self.commit(id, &previous, false) {
                            return StreamOutcome::Aborted;
                        }
                        written += 1;
                    }
                }
                Err(error) => {
                    // The held fragment is discarded, not flushed before the error
                    return self.fail(id, &error);
                }
            }
        }

        if let Some(last) = pending {
            if !self.commit(id, &last, true) {
                return StreamOutcome::Aborted;
            }
            written += 1;
        }

        log::info!("generation {id} finished after {written} fragments");
        StreamOutcome::Completed { fragments: written }
    }

    /// Ask `source` to answer `prompt` and stream the answer below the line holding `cursor`.
    ///
    /// An empty prompt does nothing and returns `None`.
    pub async fn generate<G: GenerationSource>(
        &self,
        source: &G,
        cursor: usize,
        prompt: &PromptSpec,
    ) -> Result<Option<Generation>, StreamError> {
        if prompt.is_empty() {
            return Ok(None);
        }

        let id = AnchorId::new();
        let insertion_point = self.host.borrow().line_end_at(cursor);
        self.start(id, insertion_point, prompt)?;

        let outcome = match source.generate(prompt).await {
            Ok(stream) => self.run(id, stream).await,
            Err(error) => self.fail(id, &error),
        };
        Ok(Some(Generation { id, outcome }))
    }

    /// Stop writing for `id`; any fragment still to come is dropped
    pub fn cancel(&self, id: AnchorId) -> bool {
        self.tracker.release(id).is_some()
    }

    fn fail<E: Display + ?Sized>(&self, id: AnchorId, error: &E) -> StreamOutcome {
        let message = display_message(error);
        log::warn!("generation {id} failed: {message}");
        if self.commit(id, &self.template.error_fragment(&message), true) {
            StreamOutcome::Failed
        } else {
            StreamOutcome::Aborted
        }
    }

    /// Write one fragment at the anchor's current insertion point. Returns false when writing
    /// for `id` has to stop.
    fn commit(&self, id: AnchorId, text: &str, last: bool) -> bool {
        let Some(at) = self.tracker.resolve(id) else {
            log::debug!("anchor {id} is gone, dropping remaining output");
            return false;
        };

        let formatted = format_fragment(text, &self.template.continuation_prefix, last);
        match self.host.borrow_mut().apply(Edit::insert(at, formatted)) {
            Ok(patch) => {
                log::debug!("wrote fragment for {id} at {at} (version {})", patch.version);
                true
            }
            Err(error) => {
                log::warn!("host rejected fragment for {id}: {error}");
                false
            }
        }
    }
}
