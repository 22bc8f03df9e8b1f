//! Scroll-triggered entrance animations.
//!
//! Elements carrying the marker class (`animate-on-scroll` by default) are
//! watched for viewport intersection. Each batch of intersection events is
//! handled as:
//!
//! 1. keep only elements that are now intersecting and still watched;
//! 2. group them by container: the nearest section-like ancestor (the
//!    element itself counts), else the direct parent, else the body;
//! 3. within a group, order by discovery order and schedule the `k`-th
//!    element to receive the visible class after `k * stagger`;
//! 4. stop watching every element that was scheduled.
//!
//! Reveal is one-way. An element that has been scheduled or revealed is never
//! watched again, even if it is re-inserted or re-enters the viewport.
//!
//! Elements inserted after mount are discovered through a subtree-wide
//! mutation watch on the body: each added node and every marked descendant
//! is subscribed. Both watches are created in [`ScrollRevealCoordinator::mount`]
//! and fully disconnected in [`ScrollRevealCoordinator::unmount`], which also
//! cancels all pending stagger timers.

use crate::clock::{Scheduler, TimerId};
use crate::config::RevealConfig;
use crate::ports::{ElementId, ElementTree, IntersectionWatch, MutationWatch, WatchOptions};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tracing::{debug, trace};

/// Everything the coordinator needs from its host.
pub trait RevealHost: Scheduler + IntersectionWatch + MutationWatch + ElementTree {}

impl<T: Scheduler + IntersectionWatch + MutationWatch + ElementTree> RevealHost for T {}

/// One entry of an intersection callback batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
}

/// One structural change record: nodes inserted into the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationRecord {
    pub added: Vec<ElementId>,
}

/// A reveal scheduled by [`ScrollRevealCoordinator::on_intersections`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledReveal {
    pub element: ElementId,
    pub container: ElementId,
    /// Offset from the moment the batch was processed.
    pub delay: Duration,
}

#[derive(Debug)]
pub struct ScrollRevealCoordinator {
    config: RevealConfig,
    mounted: bool,
    next_seq: u64,
    /// Watched elements and their discovery sequence number.
    observed: HashMap<ElementId, u64>,
    pending: HashMap<TimerId, ElementId>,
    scheduled: HashSet<ElementId>,
    revealed: HashSet<ElementId>,
}

impl Default for ScrollRevealCoordinator {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

impl ScrollRevealCoordinator {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            config,
            mounted: false,
            next_seq: 0,
            observed: HashMap::new(),
            pending: HashMap::new(),
            scheduled: HashSet::new(),
            revealed: HashSet::new(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn is_observed(&self, element: ElementId) -> bool {
        self.observed.contains_key(&element)
    }

    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.revealed.contains(&element)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn watch_options(&self) -> WatchOptions {
        WatchOptions {
            threshold: self.config.threshold,
            bottom_inset_px: self.config.bottom_inset_px,
        }
    }

    /// Connect both watches and subscribe every marked element in the document.
    pub fn mount(&mut self, host: &mut impl RevealHost) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        host.connect_intersections(&self.watch_options());

        let body = host.body();
        let marked: Vec<ElementId> = host
            .descendants(body)
            .into_iter()
            .filter(|&el| host.has_class(el, &self.config.marker))
            .collect();
        for element in marked {
            self.subscribe(element, host);
        }
        host.connect_mutations(body);
        debug!(observed = self.observed.len(), "scroll reveal mounted");
    }

    /// Disconnect both watches and cancel every pending reveal.
    pub fn unmount(&mut self, host: &mut impl RevealHost) {
        if !self.mounted {
            return;
        }
        for (id, _) in self.pending.drain() {
            host.cancel(id);
        }
        host.disconnect_intersections();
        host.disconnect_mutations();
        self.observed.clear();
        self.scheduled.clear();
        self.mounted = false;
        debug!("scroll reveal unmounted");
    }

    /// Handle one intersection callback batch.
    pub fn on_intersections(
        &mut self,
        entries: &[IntersectionEntry],
        host: &mut impl RevealHost,
    ) -> Vec<ScheduledReveal> {
        if !self.mounted {
            return Vec::new();
        }

        // Groups in order of first appearance in the batch.
        let mut groups: Vec<(ElementId, Vec<(u64, ElementId)>)> = Vec::new();
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            let Some(seq) = self.observed.remove(&entry.target) else {
                continue;
            };
            host.unobserve(entry.target);
            self.scheduled.insert(entry.target);

            let container = container_of(entry.target, host);
            match groups.iter_mut().find(|(c, _)| *c == container) {
                Some((_, members)) => members.push((seq, entry.target)),
                None => groups.push((container, vec![(seq, entry.target)])),
            }
        }

        let mut scheduled = Vec::new();
        for (container, mut members) in groups {
            members.sort_by_key(|&(seq, _)| seq);
            for (k, (_, element)) in members.into_iter().enumerate() {
                let delay = self.config.stagger_delay(k);
                let id = host.schedule(delay);
                self.pending.insert(id, element);
                scheduled.push(ScheduledReveal {
                    element,
                    container,
                    delay,
                });
            }
        }
        if !scheduled.is_empty() {
            trace!(count = scheduled.len(), "reveals scheduled");
        }
        scheduled
    }

    /// Handle one structural change callback batch.
    pub fn on_mutations(
        &mut self,
        records: &[MutationRecord],
        host: &mut impl RevealHost,
    ) {
        if !self.mounted {
            return;
        }
        for node in records.iter().flat_map(|r| r.added.iter().copied()) {
            if host.has_class(node, &self.config.marker) {
                self.subscribe(node, host);
            }
            let marked: Vec<ElementId> = host
                .descendants(node)
                .into_iter()
                .filter(|&el| host.has_class(el, &self.config.marker))
                .collect();
            for element in marked {
                self.subscribe(element, host);
            }
        }
    }

    /// Deliver a fired timer. Returns false if the id is not a pending reveal.
    pub fn on_timer(&mut self, id: TimerId, host: &mut impl RevealHost) -> bool {
        let Some(element) = self.pending.remove(&id) else {
            return false;
        };
        self.scheduled.remove(&element);
        self.revealed.insert(element);
        host.add_class(element, &self.config.visible_class);
        trace!(element = element.0, "revealed");
        true
    }

    fn subscribe(&mut self, element: ElementId, host: &mut impl RevealHost) {
        if self.observed.contains_key(&element)
            || self.scheduled.contains(&element)
            || self.revealed.contains(&element)
        {
            return;
        }
        self.next_seq += 1;
        self.observed.insert(element, self.next_seq);
        host.observe(element);
    }
}

/// Nearest section-like ancestor (inclusive), else the parent, else the body.
pub fn container_of(element: ElementId, tree: &impl ElementTree) -> ElementId {
    let mut current = Some(element);
    while let Some(node) = current {
        if tree.is_section(node) {
            return node;
        }
        current = tree.parent(node);
    }
    tree.parent(element).unwrap_or_else(|| tree.body())
}
