// Copyright (C) 2025 Category Labs, Inc.
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Correlation of per-thread link events into cross-thread links.

use crate::profile::{LinkKey, ThreadId, ThreadLink};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

/// A start on one thread matched with an end on another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchedLink {
    pub key: LinkKey,
    pub start_thread: ThreadId,
    pub start_time: f64,
    pub end_thread: ThreadId,
    pub end_time: f64,
}

/// Head of one stream in the merge heap.
///
/// Ordered so that the max-heap pops the earliest time first, and the lowest
/// stream index among equal times.
struct Head {
    time: f64,
    stream: usize,
}

impl Ord for Head {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.stream.cmp(&self.stream))
    }
}

impl PartialOrd for Head {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Head {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Head {}

/// Merges time sorted streams into one time sorted sequence.
///
/// Equal times are taken from the lowest stream index first. Within a stream
/// the input order is kept.
pub fn merge_links(streams: &[Vec<ThreadLink>]) -> Vec<ThreadLink> {
    let total = streams.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    let mut cursors = vec![0usize; streams.len()];

    let mut heap: BinaryHeap<Head> = streams
        .iter()
        .enumerate()
        .filter_map(|(stream, links)| links.first().map(|link| Head { time: link.time, stream }))
        .collect();

    while let Some(Head { stream, .. }) = heap.pop() {
        let links = &streams[stream];
        merged.push(links[cursors[stream]]);
        cursors[stream] += 1;
        if let Some(next) = links.get(cursors[stream]) {
            heap.push(Head {
                time: next.time,
                stream,
            });
        }
    }
    merged
}

/// Pairs start and end events fed in global time order.
///
/// Open starts are kept per key in arrival order. An end consumes every open
/// start with its key; starts from the ending thread are dropped without
/// producing a link.
#[derive(Debug, Default)]
pub struct LinkMatcher {
    open: HashMap<LinkKey, Vec<ThreadLink>>,
    open_count: usize,
    same_thread: usize,
}

impl LinkMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed<F>(&mut self, link: ThreadLink, mut emit: F)
    where
        F: FnMut(MatchedLink),
    {
        if link.is_start {
            self.open.entry(link.key).or_default().push(link);
            self.open_count += 1;
            return;
        }

        let Some(started) = self.open.remove(&link.key) else {
            return;
        };
        self.open_count -= started.len();
        for start in started {
            if start.thread_id == link.thread_id {
                self.same_thread += 1;
                continue;
            }
            emit(MatchedLink {
                key: link.key,
                start_thread: start.thread_id,
                start_time: start.time,
                end_thread: link.thread_id,
                end_time: link.time,
            });
        }
    }

    /// Starts still waiting for an end.
    pub fn open_links(&self) -> usize {
        self.open_count
    }

    /// Starts consumed by an end on their own thread.
    pub fn same_thread_links(&self) -> usize {
        self.same_thread
    }
}

/// Result of correlating all link streams of a profile.
#[derive(Debug, Default)]
pub struct Correlation {
    pub matched: Vec<MatchedLink>,
    /// Starts that never saw an end. They are dropped.
    pub unmatched: usize,
    pub same_thread: usize,
}

pub fn correlate(streams: &[Vec<ThreadLink>]) -> Correlation {
    let mut matcher = LinkMatcher::new();
    let mut matched = Vec::new();
    for link in merge_links(streams) {
        matcher.feed(link, |pair| matched.push(pair));
    }
    if matcher.open_links() > 0 {
        tracing::debug!(
            unmatched = matcher.open_links(),
            "dropping links without an end event"
        );
    }
    Correlation {
        matched,
        unmatched: matcher.open_links(),
        same_thread: matcher.same_thread_links(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_sorted(links: &[ThreadLink]) -> bool {
        links.windows(2).all(|pair| pair[0].time <= pair[1].time)
    }

    #[test]
    fn merge_keeps_every_event_in_time_order() {
        let streams = vec![
            vec![
                ThreadLink::start(0, 1, 0.5),
                ThreadLink::end(0, 2, 2.0),
                ThreadLink::start(0, 3, 4.0),
            ],
            vec![],
            vec![ThreadLink::start(2, 2, 1.0), ThreadLink::end(2, 1, 3.0)],
            vec![ThreadLink::end(3, 3, 5.0)],
        ];
        let merged = merge_links(&streams);
        assert_eq!(merged.len(), 6);
        assert!(is_sorted(&merged));
        let times: Vec<f64> = merged.iter().map(|l| l.time).collect();
        assert_eq!(times, vec![0.5, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn merge_breaks_ties_by_lowest_stream() {
        let streams = vec![
            vec![ThreadLink::start(0, 10, 1.0), ThreadLink::start(0, 11, 1.0)],
            vec![ThreadLink::start(1, 20, 1.0)],
            vec![ThreadLink::start(2, 30, 0.0), ThreadLink::start(2, 31, 1.0)],
        ];
        let keys: Vec<LinkKey> = merge_links(&streams).iter().map(|l| l.key).collect();
        assert_eq!(keys, vec![30, 10, 11, 20, 31]);
    }

    #[test]
    fn merge_of_nothing_is_empty() {
        assert!(merge_links(&[]).is_empty());
        assert!(merge_links(&[vec![], vec![]]).is_empty());
    }

    #[test]
    fn end_consumes_all_starts_with_its_key() {
        let streams = vec![
            vec![ThreadLink::start(0, 5, 1.0), ThreadLink::end(0, 5, 2.0)],
            vec![ThreadLink::start(1, 5, 1.2)],
            vec![],
        ];
        let correlation = correlate(&streams);
        assert_eq!(
            correlation.matched,
            vec![MatchedLink {
                key: 5,
                start_thread: 1,
                start_time: 1.2,
                end_thread: 0,
                end_time: 2.0,
            }]
        );
        assert_eq!(correlation.same_thread, 1);
        assert_eq!(correlation.unmatched, 0);
    }

    #[test]
    fn other_keys_stay_open() {
        let mut matcher = LinkMatcher::new();
        let mut matched = Vec::new();
        for link in [
            ThreadLink::start(0, 1, 0.0),
            ThreadLink::start(1, 2, 0.1),
            ThreadLink::start(2, 1, 0.2),
            ThreadLink::end(3, 1, 0.3),
        ] {
            matcher.feed(link, |pair| matched.push(pair));
        }
        let starts: Vec<ThreadId> = matched.iter().map(|m| m.start_thread).collect();
        assert_eq!(starts, vec![0, 2]);
        assert_eq!(matcher.open_links(), 1);

        matcher.feed(ThreadLink::end(0, 2, 0.4), |pair| matched.push(pair));
        assert_eq!(matched.len(), 3);
        assert_eq!(matched[2].start_thread, 1);
        assert_eq!(matched[2].end_thread, 0);
        assert_eq!(matcher.open_links(), 0);
    }

    #[test]
    fn end_without_start_is_ignored() {
        let correlation = correlate(&[vec![ThreadLink::end(0, 7, 1.0)]]);
        assert!(correlation.matched.is_empty());
        assert_eq!(correlation.unmatched, 0);
    }

    #[test]
    fn unmatched_starts_are_dropped() {
        let streams = vec![
            vec![ThreadLink::start(0, 1, 1.0)],
            vec![ThreadLink::start(1, 2, 1.5)],
        ];
        let correlation = correlate(&streams);
        assert!(correlation.matched.is_empty());
        assert_eq!(correlation.unmatched, 2);
    }

    #[test]
    fn key_can_be_reused_after_match() {
        let streams = vec![
            vec![ThreadLink::start(0, 9, 1.0), ThreadLink::start(0, 9, 3.0)],
            vec![ThreadLink::end(1, 9, 2.0), ThreadLink::end(1, 9, 4.0)],
        ];
        let correlation = correlate(&streams);
        let pairs: Vec<(f64, f64)> = correlation
            .matched
            .iter()
            .map(|m| (m.start_time, m.end_time))
            .collect();
        assert_eq!(pairs, vec![(1.0, 2.0), (3.0, 4.0)]);
    }
}
