// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Scripted tile source: requests are recorded, responses delivered by hand.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use isotile_port::{Chunk, OuterBounds, RequestSeq, SourceError, SourceResponse, TileSource};

struct Shared<C> {
    requests: Vec<(RequestSeq, OuterBounds)>,
    ready: VecDeque<SourceResponse<C>>,
}

/// [`TileSource`] whose responses are pushed through a [`SourceHandle`].
pub struct ScriptedSource<C> {
    shared: Rc<RefCell<Shared<C>>>,
}

/// Test-side handle to a [`ScriptedSource`].
pub struct SourceHandle<C> {
    shared: Rc<RefCell<Shared<C>>>,
}

impl<C> ScriptedSource<C> {
    /// New source plus the handle used to drive it.
    pub fn new() -> (Self, SourceHandle<C>) {
        let shared = Rc::new(RefCell::new(Shared {
            requests: Vec::new(),
            ready: VecDeque::new(),
        }));
        (
            Self {
                shared: Rc::clone(&shared),
            },
            SourceHandle { shared },
        )
    }
}

impl<C> TileSource<C> for ScriptedSource<C> {
    fn request(&mut self, seq: RequestSeq, bounds: OuterBounds) {
        self.shared.borrow_mut().requests.push((seq, bounds));
    }

    fn drain_responses(&mut self, max: usize) -> Vec<SourceResponse<C>> {
        let mut shared = self.shared.borrow_mut();
        let n = max.min(shared.ready.len());
        shared.ready.drain(..n).collect()
    }
}

impl<C> SourceHandle<C> {
    /// Every request issued so far.
    pub fn requests(&self) -> Vec<(RequestSeq, OuterBounds)> {
        self.shared.borrow().requests.clone()
    }

    /// Number of requests issued so far.
    pub fn request_count(&self) -> usize {
        self.shared.borrow().requests.len()
    }

    /// Sequence number of the most recent request.
    pub fn last_seq(&self) -> Option<RequestSeq> {
        self.shared.borrow().requests.last().map(|(seq, _)| *seq)
    }

    /// Deliver a successful response for `seq`.
    pub fn respond(&self, seq: RequestSeq, chunk: Chunk<C>) {
        self.push(seq, Ok(chunk));
    }

    /// Deliver a failure for `seq`.
    pub fn fail(&self, seq: RequestSeq, error: SourceError) {
        self.push(seq, Err(error));
    }

    /// Answer the most recent request with `chunk`.
    ///
    /// Returns the answered sequence, or `None` when nothing was requested.
    pub fn respond_latest(&self, chunk: Chunk<C>) -> Option<RequestSeq> {
        let seq = self.last_seq()?;
        self.respond(seq, chunk);
        Some(seq)
    }

    /// Number of responses waiting to be drained.
    pub fn pending(&self) -> usize {
        self.shared.borrow().ready.len()
    }

    fn push(&self, seq: RequestSeq, result: Result<Chunk<C>, SourceError>) {
        self.shared
            .borrow_mut()
            .ready
            .push_back(SourceResponse { seq, result });
    }
}
