//! The search tree.
//!
//! Nodes live in an arena (`Vec`) owned by [`Tree`] and reference each other
//! through [`NodeId`] indices. The parent back-reference used during
//! backpropagation is a plain index and never participates in ownership, so
//! the tree is a strict rooted tree with no cycles and no shared nodes.
//! Every tree belongs to exactly one worker and is discarded when the worker
//! hands its root statistics back to the coordinator.

use rand::Rng;

use crate::Player;

/// Index of a node in the arena. The root is always index 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct NodeId(usize);

/// A single node of the search tree.
#[derive(Debug)]
pub(crate) struct Node<M> {
    /// The move that produced this node. `None` only for the root.
    mv: Option<M>,
    /// Non-owning back-reference for backpropagation.
    parent: Option<NodeId>,
    /// Children in creation order. Creation order is the tie-break order for
    /// UCB1 selection.
    children: Vec<NodeId>,
    /// Legal moves not yet expanded into children. Disjoint from the moves of
    /// `children`.
    untried_moves: Vec<M>,
    /// Sum of backpropagated results, from `mover`'s perspective.
    wins: f64,
    /// Number of backpropagation passes through this node.
    visits: u64,
    /// The player who made the move leading into this node, captured at
    /// creation time so backpropagation can score this node from the
    /// perspective of whoever actually moved into it.
    mover: Player,
}

impl<M> Node<M> {
    fn new(mv: Option<M>, parent: Option<NodeId>, mover: Player, untried_moves: Vec<M>) -> Self {
        Self {
            mv,
            parent,
            children: Vec::new(),
            untried_moves,
            wins: 0.0,
            visits: 0,
            mover,
        }
    }

    pub(crate) fn has_untried_moves(&self) -> bool {
        !self.untried_moves.is_empty()
    }

    pub(crate) fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn mover(&self) -> Player {
        self.mover
    }

    pub(crate) fn wins(&self) -> f64 {
        self.wins
    }

    pub(crate) fn visits(&self) -> u64 {
        self.visits
    }
}

/// One worker's private search tree.
#[derive(Debug)]
pub(crate) struct Tree<M> {
    nodes: Vec<Node<M>>,
}

impl<M> Tree<M> {
    /// Creates a tree holding only a root node.
    ///
    /// `mover` is the player who moved into the root position (the opponent
    /// of the root's player to move) and `untried_moves` the root's legal
    /// moves.
    pub(crate) fn new(mover: Player, untried_moves: Vec<M>) -> Self {
        Self {
            nodes: vec![Node::new(None, None, mover, untried_moves)],
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<M> {
        &self.nodes[id.0]
    }

    /// The move that leads into `id`. Must not be called on the root.
    pub(crate) fn move_of(&self, id: NodeId) -> &M {
        self.nodes[id.0]
            .mv
            .as_ref()
            .expect("move_of called on the root node")
    }

    /// Removes and returns one untried move of `id`, chosen uniformly at
    /// random. Calling this on a node without untried moves is a programmer
    /// error and panics.
    pub(crate) fn pop_untried_move<R: Rng>(&mut self, id: NodeId, rng: &mut R) -> M {
        let untried = &mut self.nodes[id.0].untried_moves;
        assert!(!untried.is_empty(), "no untried moves left to expand");
        let index = rng.random_range(0..untried.len());
        untried.swap_remove(index)
    }

    /// Creates a new child of `parent` reached by `mv`, with `mover` the
    /// player who just played `mv` and `untried_moves` the legal moves of the
    /// resulting state. Returns the child's id.
    pub(crate) fn add_child(
        &mut self,
        parent: NodeId,
        mv: M,
        mover: Player,
        untried_moves: Vec<M>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Node::new(Some(mv), Some(parent), mover, untried_moves));
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Returns the child of `id` maximizing the UCB1 score
    /// `wins / visits + c * sqrt(ln(parent_visits) / visits)`.
    ///
    /// Ties are broken by creation order (the first child with the maximal
    /// score wins), which keeps single-threaded searches reproducible.
    /// Must only be called on nodes with at least one child; every child has
    /// been visited at least once because expansion always backpropagates
    /// before the next selection pass.
    pub(crate) fn select_child_uct(&self, id: NodeId, exploration_constant: f64) -> NodeId {
        let parent = &self.nodes[id.0];
        debug_assert!(parent.has_children());
        let log_parent_visits = (parent.visits as f64).ln();

        let mut best: Option<(NodeId, f64)> = None;
        for &child_id in &parent.children {
            let child = &self.nodes[child_id.0];
            debug_assert!(child.visits > 0);
            let exploit = child.wins / child.visits as f64;
            let explore = (log_parent_visits / child.visits as f64).sqrt();
            let score = exploit + exploration_constant * explore;
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((child_id, score)),
            }
        }
        best.expect("select_child_uct called on a childless node").0
    }

    /// Records one backpropagation pass: `visits += 1; wins += result`.
    pub(crate) fn update(&mut self, id: NodeId, result: f64) {
        let node = &mut self.nodes[id.0];
        node.visits += 1;
        node.wins += result;
    }
}
