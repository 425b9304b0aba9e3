//! Tree Builder - rebuilds menu hierarchy from a flat item list.
//!
//! One pass indexes every item's position under its parent ID. A
//! breadth-first walk from the roots then fixes each item's place, and
//! the nodes are assembled bottom-up in reverse walk order. Nothing
//! recurses, and nesting is capped at [`MAX_DEPTH`] levels so the
//! resulting trees serialize and drop within a bounded stack.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::domain::FormattedMenuItem;

/// Deepest nesting level kept, counting roots as level 1.
pub const MAX_DEPTH: usize = 64;

/// Result of building a menu tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuTree {
    /// Root items in display order, each with nested children.
    pub roots: Vec<FormattedMenuItem>,
    /// IDs of items whose parent is not part of the menu. They are
    /// promoted to roots.
    pub orphaned: Vec<u64>,
    /// IDs of items unreachable from any root because their parents form
    /// a cycle. Each cycle is broken at its first member in input order,
    /// which becomes a root.
    pub cyclic: Vec<u64>,
    /// IDs of items nested deeper than [`MAX_DEPTH`]. Each one starts a
    /// new root and keeps its own descendants.
    pub too_deep: Vec<u64>,
}

impl MenuTree {
    /// Whether every item hung off a real root.
    pub fn is_well_formed(&self) -> bool {
        self.orphaned.is_empty() && self.cyclic.is_empty() && self.too_deep.is_empty()
    }
}

/// Where each input position ends up.
struct Placement {
    visited: Vec<bool>,
    /// Tree parent of each position; `None` for roots.
    parent: Vec<Option<usize>>,
    /// Positions in breadth-first visit order.
    order: Vec<usize>,
    too_deep: Vec<usize>,
}

impl Placement {
    fn new(len: usize) -> Self {
        Self {
            visited: vec![false; len],
            parent: vec![None; len],
            order: Vec::with_capacity(len),
            too_deep: Vec::new(),
        }
    }

    /// Walk the subtree rooted at `start`.
    fn walk(
        &mut self,
        start: usize,
        items: &[FormattedMenuItem],
        children_of: &HashMap<u64, Vec<usize>>,
    ) {
        if self.visited[start] {
            return;
        }
        self.visited[start] = true;

        let mut queue = VecDeque::from([(start, 1usize)]);
        while let Some((pos, depth)) = queue.pop_front() {
            self.order.push(pos);

            let Some(child_positions) = children_of.get(&items[pos].id) else {
                continue;
            };
            for &child in child_positions {
                if self.visited[child] {
                    continue;
                }
                self.visited[child] = true;

                if depth >= MAX_DEPTH {
                    self.too_deep.push(child);
                    queue.push_back((child, 1));
                } else {
                    self.parent[child] = Some(pos);
                    queue.push_back((child, depth + 1));
                }
            }
        }
    }
}

/// Build a forest from items listed in display order.
///
/// Siblings keep their relative input order, and every input item appears
/// exactly once in the output.
pub fn build_tree(items: Vec<FormattedMenuItem>) -> MenuTree {
    let ids: HashSet<u64> = items.iter().map(|i| i.id).collect();

    let mut children_of: HashMap<u64, Vec<usize>> = HashMap::new();
    let mut root_positions = Vec::new();
    let mut orphaned = Vec::new();

    for (pos, item) in items.iter().enumerate() {
        if item.parent == 0 {
            root_positions.push(pos);
        } else if !ids.contains(&item.parent) {
            orphaned.push(item.id);
            root_positions.push(pos);
        } else {
            children_of.entry(item.parent).or_default().push(pos);
        }
    }

    let mut placement = Placement::new(items.len());
    for pos in root_positions {
        placement.walk(pos, &items, &children_of);
    }

    // Anything not reached yet is only reachable through a parent cycle.
    let cyclic: Vec<u64> = items
        .iter()
        .zip(&placement.visited)
        .filter(|(_, visited)| !**visited)
        .map(|(item, _)| item.id)
        .collect();
    if !cyclic.is_empty() {
        for pos in 0..items.len() {
            placement.walk(pos, &items, &children_of);
        }
    }

    let too_deep = placement.too_deep.iter().map(|&pos| items[pos].id).collect();

    // Children follow their parent in walk order, so a reverse pass sees
    // every child list complete before its parent is taken.
    let mut slots: Vec<Option<FormattedMenuItem>> = items.into_iter().map(Some).collect();
    let mut built: Vec<Vec<FormattedMenuItem>> = slots.iter().map(|_| Vec::new()).collect();
    let mut roots: Vec<(usize, FormattedMenuItem)> = Vec::new();

    for &pos in placement.order.iter().rev() {
        let Some(mut node) = slots[pos].take() else {
            continue;
        };

        let mut children = std::mem::take(&mut built[pos]);
        children.reverse();
        node.children.append(&mut children);

        match placement.parent[pos] {
            Some(parent) => built[parent].push(node),
            None => roots.push((pos, node)),
        }
    }

    roots.sort_by_key(|(pos, _)| *pos);

    MenuTree {
        roots: roots.into_iter().map(|(_, node)| node).collect(),
        orphaned,
        cyclic,
        too_deep,
    }
}
