// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Channel-backed inbox for fetch completions.

use std::sync::mpsc::{Receiver, TryRecvError};

use isotile_port::SourceResponse;

/// Receiving half of the completion channel.
///
/// Nothing blocks: [`Self::drain`] takes whatever has already arrived.
pub struct ChannelSource<C> {
    rx: Option<Receiver<SourceResponse<C>>>,
}

impl<C> Default for ChannelSource<C> {
    fn default() -> Self {
        Self { rx: None }
    }
}

impl<C> ChannelSource<C> {
    /// Inbox with no channel installed; drains nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inbox over an existing receiver.
    pub fn from_receiver(rx: Receiver<SourceResponse<C>>) -> Self {
        Self { rx: Some(rx) }
    }

    /// Install a (new) receiver, discarding the old one.
    pub fn set_receiver(&mut self, rx: Receiver<SourceResponse<C>>) {
        self.rx = Some(rx);
    }

    /// Take up to `max` completions in arrival order.
    ///
    /// Once every sender is gone the receiver is dropped.
    pub fn drain(&mut self, max: usize) -> Vec<SourceResponse<C>> {
        let mut out = Vec::new();
        let Some(rx) = &self.rx else {
            return out;
        };
        while out.len() < max {
            match rx.try_recv() {
                Ok(response) => out.push(response),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.rx = None;
                    break;
                }
            }
        }
        out
    }

    /// True while a receiver is installed and connected.
    pub fn is_connected(&self) -> bool {
        self.rx.is_some()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use isotile_port::{Chunk, RequestSeq, SourceError};
    use std::sync::mpsc;

    #[test]
    fn drain_respects_max_and_order() {
        let (tx, rx) = mpsc::channel();
        let mut inbox: ChannelSource<String> = ChannelSource::from_receiver(rx);
        for n in 1..=3 {
            tx.send(SourceResponse {
                seq: RequestSeq(n),
                result: Ok(Chunk::empty()),
            })
            .unwrap();
        }
        let first: Vec<_> = inbox.drain(2).into_iter().map(|r| r.seq).collect();
        assert_eq!(first, [RequestSeq(1), RequestSeq(2)]);
        assert_eq!(inbox.drain(8).len(), 1);
        assert!(inbox.drain(8).is_empty());
        assert!(inbox.is_connected());
    }

    #[test]
    fn disconnect_drops_receiver() {
        let (tx, rx) = mpsc::channel();
        let mut inbox: ChannelSource<String> = ChannelSource::from_receiver(rx);
        tx.send(SourceResponse {
            seq: RequestSeq(1),
            result: Err(SourceError::Status(500)),
        })
        .unwrap();
        drop(tx);
        assert_eq!(inbox.drain(8).len(), 1);
        assert!(inbox.drain(8).is_empty());
        assert!(!inbox.is_connected());
    }

    #[test]
    fn empty_inbox_drains_nothing() {
        let mut inbox: ChannelSource<String> = ChannelSource::new();
        assert!(inbox.drain(4).is_empty());
    }
}
