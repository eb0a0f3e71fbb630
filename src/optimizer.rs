//! Graph rewriting passes run once construction is complete.

use log::debug;

use crate::alphabet::Alphabet;
use crate::automaton::Automaton;
use crate::node::{Behavior, NodeId};

/// Rewrites an automaton in place without changing the language it accepts.
pub struct Optimizer<'a, A> {
    automaton: &'a mut Automaton<A>,
}

impl<'a, A: Alphabet> Optimizer<'a, A> {
    pub fn new(automaton: &'a mut Automaton<A>) -> Self {
        Optimizer { automaton }
    }

    /// Removes epsilon nodes that carry no branching information.
    ///
    /// An epsilon node with a single predecessor is merged into it;
    /// otherwise one with a single successor is merged into that. Pinned
    /// nodes are left alone. Lookahead sub-automata are optimized too.
    ///
    /// Returns the number of removed nodes.
    pub fn remove_epsilons(&mut self) -> usize {
        let ids: Vec<NodeId> = self.automaton.nodes().map(|node| node.id()).collect();
        let mut removed = 0;

        for id in ids {
            if let Some(node) = self.automaton.node_mut(id) {
                if let Behavior::Macro(m) = &mut node.behavior {
                    removed += Optimizer::new(m.automaton_mut()).remove_epsilons();
                    continue;
                }
            }
            if self.elide(id) {
                removed += 1;
            }
        }

        debug!("removed {removed} epsilon nodes, {} left", self.automaton.len());
        removed
    }

    fn elide(&mut self, id: NodeId) -> bool {
        let Some(node) = self.automaton.node(id) else {
            return false;
        };
        if node.is_pinned() || !node.behavior().is_epsilon() || node.next().contains(&id) {
            return false;
        }

        let merged = if node.prev().len() == 1 {
            self.automaton.merge_into_prev(id)
        } else if node.next().len() == 1 {
            self.automaton.merge_into_next(id)
        } else {
            return false;
        };

        merged.is_ok() && self.automaton.remove(id).is_ok()
    }
}
