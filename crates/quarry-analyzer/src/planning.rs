//! Dependency-aware implementation planning for typed holes
//!
//! A relationship whose subject names hole A and whose object names hole B
//! becomes a directed edge A → B. The predicate decides the edge kind:
//!
//! | Predicate contains | Kind         | Strength |
//! |--------------------|--------------|----------|
//! | `require`          | `requires`   | 8        |
//! | `implement`        | `implements` | 7        |
//! | `extend`           | `extends`    | 7        |
//! | anything else      | `related`    | 3        |
//!
//! Only the first three are strong: they land in the hole's `dependencies`
//! and constrain the implementation order, the depths and the critical path.

use crate::holes::{enhance_holes, related_pairs_with};
use quarry_domain::{EnhancedTypedHole, Relationship, TypedHole};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Kind of a directed hole dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    /// Source needs the target to exist first
    Requires,
    /// Source implements the target's contract
    Implements,
    /// Source extends the target
    Extends,
    /// Weak association
    Related,
}

impl DependencyKind {
    /// Classify a relationship predicate
    pub fn from_predicate(predicate: &str) -> Self {
        let lower = predicate.to_lowercase();
        if lower.contains("require") {
            DependencyKind::Requires
        } else if lower.contains("implement") {
            DependencyKind::Implements
        } else if lower.contains("extend") {
            DependencyKind::Extends
        } else {
            DependencyKind::Related
        }
    }

    /// Edge weight
    pub fn strength(&self) -> u8 {
        match self {
            DependencyKind::Requires => 8,
            DependencyKind::Implements | DependencyKind::Extends => 7,
            DependencyKind::Related => 3,
        }
    }

    /// Whether the edge constrains implementation order
    pub fn is_strong(&self) -> bool {
        !matches!(self, DependencyKind::Related)
    }
}

/// A directed edge between two holes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleDependency {
    /// Dependent hole id
    pub from: String,

    /// Hole id depended upon
    pub to: String,

    /// Edge kind
    pub kind: DependencyKind,

    /// Edge weight
    pub strength: u8,
}

/// Enhanced holes with their dependency graph and a suggested build order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HolePlan {
    /// Enhanced holes in input order
    pub holes: Vec<EnhancedTypedHole>,

    /// All discovered edges, strong and weak
    pub dependencies: Vec<HoleDependency>,

    /// Cycles among strong edges, each as a path of hole ids
    pub cycles: Vec<Vec<String>>,

    /// Hole ids, dependencies first
    pub implementation_order: Vec<String>,

    /// Length of the longest strong-dependency chain below each hole;
    /// 0 for holes that depend on nothing
    pub depths: BTreeMap<String, usize>,

    /// Most complex chain of strong dependencies, from the hole everything
    /// else on it waits for down to its last dependent
    pub critical_path: Vec<String>,

    /// Sum of hole complexities
    pub total_complexity: u32,

    /// Mean hole priority (0 when there are no holes)
    pub average_priority: f64,
}

impl HolePlan {
    /// Build a plan for `holes` using `relationships`
    pub fn build(holes: &[TypedHole], relationships: &[Relationship]) -> Self {
        let mut enhanced = enhance_holes(holes, relationships);
        let mut dependencies: Vec<HoleDependency> = Vec::new();
        let mut edges: Vec<Vec<usize>> = vec![Vec::new(); enhanced.len()];

        for (a, b, rel) in related_pairs_with(holes, relationships) {
            let kind = DependencyKind::from_predicate(&rel.predicate);
            let dependency = HoleDependency {
                from: enhanced[a].id.clone(),
                to: enhanced[b].id.clone(),
                kind,
                strength: kind.strength(),
            };
            if dependencies.contains(&dependency) {
                continue;
            }

            if kind.is_strong() && !edges[a].contains(&b) {
                edges[a].push(b);
                let target = enhanced[b].id.clone();
                enhanced[a].dependencies.push(target);
            }
            dependencies.push(dependency);
        }

        let cycles = find_cycles(&edges)
            .into_iter()
            .map(|cycle| cycle.into_iter().map(|i| enhanced[i].id.clone()).collect())
            .collect();

        let order = implementation_order(&enhanced, &edges);
        let depths = depths(&edges, &order)
            .into_iter()
            .enumerate()
            .map(|(i, depth)| (enhanced[i].id.clone(), depth))
            .collect();
        let critical_path = critical_path(&enhanced, &edges, &order)
            .into_iter()
            .map(|i| enhanced[i].id.clone())
            .collect();
        let implementation_order = order.iter().map(|&i| enhanced[i].id.clone()).collect();

        let total_complexity = enhanced.iter().map(|h| u32::from(h.complexity)).sum();
        let average_priority = if enhanced.is_empty() {
            0.0
        } else {
            enhanced.iter().map(|h| f64::from(h.priority)).sum::<f64>() / enhanced.len() as f64
        };

        Self {
            holes: enhanced,
            dependencies,
            cycles,
            implementation_order,
            depths,
            critical_path,
            total_complexity,
            average_priority,
        }
    }

    /// Whether the strong dependencies contain a cycle
    pub fn has_cycles(&self) -> bool {
        !self.cycles.is_empty()
    }

    /// Look up a hole by id
    pub fn hole(&self, id: &str) -> Option<&EnhancedTypedHole> {
        self.holes.iter().find(|h| h.id == id)
    }

    /// Sum of complexities along the critical path
    pub fn critical_complexity(&self) -> u32 {
        self.critical_path
            .iter()
            .filter_map(|id| self.hole(id))
            .map(|h| u32::from(h.complexity))
            .sum()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Every back edge found by depth-first search yields one cycle
fn find_cycles(edges: &[Vec<usize>]) -> Vec<Vec<usize>> {
    fn visit(
        node: usize,
        edges: &[Vec<usize>],
        marks: &mut [Mark],
        stack: &mut Vec<usize>,
        cycles: &mut Vec<Vec<usize>>,
    ) {
        marks[node] = Mark::InProgress;
        stack.push(node);

        for &next in &edges[node] {
            match marks[next] {
                Mark::Unvisited => visit(next, edges, marks, stack, cycles),
                Mark::InProgress => {
                    if let Some(pos) = stack.iter().position(|&n| n == next) {
                        cycles.push(stack[pos..].to_vec());
                    }
                }
                Mark::Done => {}
            }
        }

        stack.pop();
        marks[node] = Mark::Done;
    }

    let mut marks = vec![Mark::Unvisited; edges.len()];
    let mut stack = Vec::new();
    let mut cycles = Vec::new();

    for node in 0..edges.len() {
        if marks[node] == Mark::Unvisited {
            visit(node, edges, &mut marks, &mut stack, &mut cycles);
        }
    }

    cycles
}

fn by_value(holes: &[EnhancedTypedHole], a: usize, b: usize) -> Ordering {
    holes[b]
        .value_score()
        .total_cmp(&holes[a].value_score())
        .then(a.cmp(&b))
}

/// Dependencies first; among ready holes the best value score goes next.
/// Holes stuck behind a cycle are appended by value score.
fn implementation_order(holes: &[EnhancedTypedHole], edges: &[Vec<usize>]) -> Vec<usize> {
    let mut placed = vec![false; holes.len()];
    let mut order = Vec::with_capacity(holes.len());

    loop {
        let next = (0..holes.len())
            .filter(|&i| !placed[i] && edges[i].iter().all(|&dep| placed[dep]))
            .min_by(|&a, &b| by_value(holes, a, b));

        match next {
            Some(i) => {
                placed[i] = true;
                order.push(i);
            }
            None => break,
        }
    }

    let mut stuck: Vec<usize> = (0..holes.len()).filter(|&i| !placed[i]).collect();
    stuck.sort_by(|&a, &b| by_value(holes, a, b));
    order.extend(stuck);

    order
}

/// Longest strong-dependency chain below each hole
///
/// Walks `order` so dependencies are seen first; an edge to a hole not yet
/// seen closes a cycle and is ignored.
fn depths(edges: &[Vec<usize>], order: &[usize]) -> Vec<usize> {
    let mut depth: Vec<Option<usize>> = vec![None; edges.len()];

    for &node in order {
        let below = edges[node].iter().filter_map(|&dep| depth[dep]).max();
        depth[node] = Some(below.map_or(0, |d| d + 1));
    }

    depth.into_iter().map(Option::unwrap_or_default).collect()
}

/// Heaviest chain by summed complexity, starting at a hole without strong
/// dependencies and following dependents
///
/// Holes stuck behind a cycle take no part. Ties go to the earlier hole.
fn critical_path(holes: &[EnhancedTypedHole], edges: &[Vec<usize>], order: &[usize]) -> Vec<usize> {
    let mut placed = vec![false; holes.len()];
    for &node in order {
        if edges[node].iter().all(|&dep| placed[dep]) {
            placed[node] = true;
        }
    }

    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); holes.len()];
    for (node, deps) in edges.iter().enumerate() {
        if placed[node] {
            for &dep in deps {
                dependents[dep].push(node);
            }
        }
    }
    for list in &mut dependents {
        list.sort_unstable();
    }

    // Heaviest chain starting at each placed hole, dependents resolved first
    let mut weight = vec![0u32; holes.len()];
    let mut next: Vec<Option<usize>> = vec![None; holes.len()];
    for &node in order.iter().rev().filter(|&&n| placed[n]) {
        let best = dependents[node]
            .iter()
            .copied()
            .fold(None, |best: Option<usize>, d| match best {
                Some(b) if weight[b] >= weight[d] => Some(b),
                _ => Some(d),
            });
        weight[node] = u32::from(holes[node].complexity) + best.map_or(0, |b| weight[b]);
        next[node] = best;
    }

    let start = (0..holes.len())
        .filter(|&i| placed[i] && edges[i].is_empty())
        .fold(None, |best: Option<usize>, i| match best {
            Some(b) if weight[b] >= weight[i] => Some(b),
            _ => Some(i),
        });

    let mut path = Vec::new();
    let mut current = start;
    while let Some(node) = current {
        path.push(node);
        current = next[node];
    }
    path
}
