//! The best-first loop behind [find_path](crate::find_path). It is generic over the node type
//! and cost so it can be driven by any successor function, in the style of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html).
//!
//! Every node ever discovered gets one canonical [SearchNode] in an insertion-ordered map keyed
//! by the node itself; predecessors are indices into that map. A relaxation pushes a new frontier
//! entry instead of decreasing the key of an old one, and stale entries are discarded when
//! popped (lazy deletion).
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::debug;
use num_traits::{Bounded, Zero};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// How to order frontier entries with equal estimated total cost `f`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// Expand the entry with the larger cost so far (smaller heuristic) first, i.e. the one
    /// closest to the goal. Remaining ties go to the earliest pushed entry.
    #[default]
    PreferDeeper,
    /// Expand the entry with the smaller cost so far first, then the earliest pushed.
    PreferShallower,
}

/// Search state attached to one node during one search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchNode<C> {
    /// Cost of the best known path from the start.
    pub g: C,
    /// Heuristic estimate of the remaining cost.
    pub h: C,
    /// `g + h`.
    pub f: C,
    /// Map index of the node this one was reached from; [None] for the start.
    pub predecessor: Option<usize>,
    /// Set once the node has been popped and expanded. Never cleared.
    pub closed: bool,
}

impl<C: Bounded + Zero + Copy> SearchNode<C> {
    /// A node nothing is known about yet: infinite `g` and `f`, no predecessor.
    pub fn unvisited() -> SearchNode<C> {
        SearchNode {
            g: C::max_value(),
            h: C::zero(),
            f: C::max_value(),
            predecessor: None,
            closed: false,
        }
    }

    pub fn start(h: C) -> SearchNode<C> {
        SearchNode {
            g: C::zero(),
            h,
            f: h,
            predecessor: None,
            closed: false,
        }
    }
}

struct FrontierEntry<C> {
    f: C,
    g: C,
    seq: usize,
    index: usize,
    tie_break: TieBreak,
}

impl<C: Ord> Eq for FrontierEntry<C> {}

impl<C: Ord> PartialEq for FrontierEntry<C> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<C: Ord> PartialOrd for FrontierEntry<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for FrontierEntry<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the greatest entry is popped first.
        other
            .f
            .cmp(&self.f)
            .then_with(|| match self.tie_break {
                TieBreak::PreferDeeper => self.g.cmp(&other.g),
                TieBreak::PreferShallower => other.g.cmp(&self.g),
            })
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Counters collected during a single search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes popped and expanded. Each node is expanded at most once.
    pub expanded: usize,
    /// Entries pushed onto the frontier, including the start.
    pub pushed: usize,
    /// Popped entries discarded because a better entry for the same node was handled before.
    pub stale: usize,
}

/// Owns the frontier and the node map of a search run. Starting a new run clears both.
pub struct SearchContext<N, C> {
    frontier: BinaryHeap<FrontierEntry<C>>,
    nodes: FxIndexMap<N, SearchNode<C>>,
    tie_break: TieBreak,
    stats: SearchStats,
}

impl<N, C> SearchContext<N, C>
where
    N: Eq + Hash + Clone,
    C: Zero + Bounded + Ord + Copy,
{
    pub fn new(tie_break: TieBreak) -> SearchContext<N, C> {
        SearchContext {
            frontier: BinaryHeap::new(),
            nodes: FxIndexMap::default(),
            tie_break,
            stats: SearchStats::default(),
        }
    }

    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// The search state recorded for a node, if it was discovered.
    pub fn node(&self, n: &N) -> Option<&SearchNode<C>> {
        self.nodes.get(n)
    }

    fn push(&mut self, index: usize, f: C, g: C) {
        self.frontier.push(FrontierEntry {
            f,
            g,
            seq: self.stats.pushed,
            index,
            tie_break: self.tie_break,
        });
        self.stats.pushed += 1;
    }

    /// Runs A* from `start` until a node satisfying `success` is popped. Returns the path from
    /// start to that node together with its cost, or [None] once the frontier is exhausted.
    ///
    /// The returned path is optimal as long as `heuristic` is consistent.
    pub fn astar<FN, IN, FH, FS>(
        &mut self,
        start: &N,
        mut successors: FN,
        mut heuristic: FH,
        mut success: FS,
    ) -> Option<(Vec<N>, C)>
    where
        FN: FnMut(&N) -> IN,
        IN: IntoIterator<Item = (N, C)>,
        FH: FnMut(&N) -> C,
        FS: FnMut(&N) -> bool,
    {
        self.frontier.clear();
        self.nodes.clear();
        self.stats = SearchStats::default();
        let h = heuristic(start);
        let (start_index, _) = self
            .nodes
            .insert_full(start.clone(), SearchNode::start(h));
        self.push(start_index, h, C::zero());

        while let Some(FrontierEntry { g, index, .. }) = self.frontier.pop() {
            let (node, record) = self.nodes.get_index_mut(index)?;
            // A node may sit in the frontier several times if cheaper ways to it were found
            // later. Only the first pop of the cheapest entry counts.
            if record.closed || g > record.g {
                self.stats.stale += 1;
                continue;
            }
            if success(node) {
                let path = reconstruct_path(&self.nodes, index);
                return Some((path, g));
            }
            record.closed = true;
            self.stats.expanded += 1;
            let current = node.clone();

            for (successor, move_cost) in successors(&current) {
                let tentative_g = g + move_cost;
                let (n, h) = match self.nodes.entry(successor) {
                    Occupied(e) if e.get().closed => continue,
                    Occupied(mut e) => {
                        if tentative_g >= e.get().g {
                            continue;
                        }
                        let h = heuristic(e.key());
                        let n = e.index();
                        let record = e.get_mut();
                        record.g = tentative_g;
                        record.h = h;
                        record.f = tentative_g + h;
                        record.predecessor = Some(index);
                        (n, h)
                    }
                    Vacant(e) => {
                        let h = heuristic(e.key());
                        let n = e.index();
                        let mut record = SearchNode::unvisited();
                        if tentative_g >= record.g {
                            continue;
                        }
                        record.g = tentative_g;
                        record.h = h;
                        record.f = tentative_g + h;
                        record.predecessor = Some(index);
                        e.insert(record);
                        (n, h)
                    }
                };
                self.push(n, tentative_g + h, tentative_g);
            }
        }
        debug!("Frontier exhausted after {:?}", self.stats);
        None
    }
}

/// Runs a fresh search, see [SearchContext::astar]. Returns the statistics of the run as well.
pub fn astar<N, C, FN, IN, FH, FS>(
    start: &N,
    successors: FN,
    heuristic: FH,
    success: FS,
    tie_break: TieBreak,
) -> (Option<(Vec<N>, C)>, SearchStats)
where
    N: Eq + Hash + Clone,
    C: Zero + Bounded + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut ctx = SearchContext::new(tie_break);
    let result = ctx.astar(start, successors, heuristic, success);
    (result, ctx.stats())
}

/// Walks predecessor links from the node at `goal` back to the start and returns the nodes in
/// start to goal order.
pub fn reconstruct_path<N, C>(nodes: &FxIndexMap<N, SearchNode<C>>, goal: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
{
    let mut path: Vec<N> = std::iter::successors(nodes.get_index(goal), |(_, record)| {
        record.predecessor.and_then(|p| nodes.get_index(p))
    })
    .map(|(node, _)| node.clone())
    .collect();
    path.reverse();
    path
}
