//! Execution ordering of a job's transformations
//!
//! A transformation that writes a table must run before every transformation
//! reading it. Independent transformations keep their declared order.

use crate::models::TransformGraph;
use petgraph::algo::is_cyclic_directed;
use petgraph::{Directed, Direction, Graph};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Order in which a job's transformations are generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    /// Indices into the job's transformation list
    pub order: Vec<usize>,
    /// The producer/consumer graph had a cycle; `order` is the declared order
    pub cyclic: bool,
}

/// Compute the execution plan using producer/consumer table edges
pub fn execution_order(graphs: &[TransformGraph]) -> ExecutionPlan {
    let mut dependencies = Graph::<usize, (), Directed>::new();
    let nodes: Vec<_> = (0..graphs.len()).map(|i| dependencies.add_node(i)).collect();

    for (producer, graph) in graphs.iter().enumerate() {
        for (consumer, other) in graphs.iter().enumerate() {
            if producer == consumer {
                continue;
            }
            let feeds = graph
                .targets
                .iter()
                .any(|target| other.sources.contains(target));
            if feeds {
                dependencies.add_edge(nodes[producer], nodes[consumer], ());
            }
        }
    }

    if is_cyclic_directed(&dependencies) {
        return ExecutionPlan {
            order: (0..graphs.len()).collect(),
            cyclic: true,
        };
    }

    // Kahn's algorithm, always taking the lowest declared index that is ready
    let mut pending: Vec<usize> = nodes
        .iter()
        .map(|&n| dependencies.neighbors_directed(n, Direction::Incoming).count())
        .collect();
    let mut ready: BinaryHeap<Reverse<usize>> = pending
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(i, _)| Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(graphs.len());
    while let Some(Reverse(index)) = ready.pop() {
        order.push(index);
        for next in dependencies.neighbors_directed(nodes[index], Direction::Outgoing) {
            let consumer = dependencies[next];
            pending[consumer] -= 1;
            if pending[consumer] == 0 {
                ready.push(Reverse(consumer));
            }
        }
    }

    ExecutionPlan {
        order,
        cyclic: false,
    }
}
