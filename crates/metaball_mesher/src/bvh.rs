//! Binary bounding-volume hierarchy over field elements.
//!
//! Every node has exactly two slots. Each slot carries its own box and is
//! either a leaf (one element), an internal node, or empty. A density query
//! only evaluates elements whose box contains the sample point.
//!
//! ```text
//!                 root
//!          ┌───────┴───────┐
//!     [box A]           [box B]
//!      Node 1            Leaf e3
//!    ┌───┴───┐
//! [box e0] [box e1]
//!  Leaf     Leaf
//! ```
//!
//! # Build
//!
//! The parent box is split at the midpoint of its longest axis. Elements are
//! partitioned in place by the center of their own box (two-pointer swap).
//! The left side always receives at least one element, so every recursion
//! works on a strictly smaller range and the build terminates even when all
//! elements coincide.

use glam::Vec3A;

use crate::element::FieldElement;
use crate::types::Aabb;

/// Contents of one node slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BvhSlot {
  Empty,
  /// Index into [`Bvh::elements`].
  Leaf(u32),
  /// Index into the node array.
  Node(u32),
}

#[derive(Clone, Debug)]
pub struct BvhNode {
  pub bounds: [Aabb; 2],
  pub slots: [BvhSlot; 2],
}

/// Built hierarchy. Owns the (reordered) elements.
#[derive(Clone, Debug)]
pub struct Bvh {
  elements: Vec<FieldElement>,
  nodes: Vec<BvhNode>,
  bounds: Aabb,
}

impl Bvh {
  /// Build over prepared elements. Returns `None` when there are none.
  pub fn build(mut elements: Vec<FieldElement>) -> Option<Bvh> {
    if elements.is_empty() {
      return None;
    }

    let bounds = union_bounds(&elements);
    let mut nodes = Vec::with_capacity(elements.len());
    let end = elements.len();
    build_node(&mut elements, &mut nodes, 0, end, &bounds);

    Some(Bvh {
      elements,
      nodes,
      bounds,
    })
  }

  /// Elements in hierarchy order.
  #[inline]
  pub fn elements(&self) -> &[FieldElement] {
    &self.elements
  }

  /// Number of internal nodes (root included). Bounds the traversal queue.
  #[inline]
  pub fn node_count(&self) -> usize {
    self.nodes.len()
  }

  /// Union of all element boxes.
  #[inline]
  pub fn bounds(&self) -> &Aabb {
    &self.bounds
  }

  /// Summed density of every element whose box contains `point`.
  ///
  /// Breadth-first over the nodes; `queue` is scratch space reused across
  /// queries.
  pub fn density(&self, point: Vec3A, queue: &mut Vec<u32>) -> f32 {
    queue.clear();
    queue.push(0);

    let mut density = 0.0;
    let mut head = 0;
    while head < queue.len() {
      let node = &self.nodes[queue[head] as usize];
      head += 1;

      for (bounds, slot) in node.bounds.iter().zip(node.slots) {
        if !bounds.contains_point(point) {
          continue;
        }
        match slot {
          BvhSlot::Leaf(element) => density += self.elements[element as usize].density(point),
          BvhSlot::Node(child) => queue.push(child),
          BvhSlot::Empty => {}
        }
      }
    }

    density
  }
}

fn union_bounds(elements: &[FieldElement]) -> Aabb {
  elements
    .iter()
    .fold(Aabb::empty(), |acc, element| acc.union(element.bounds()))
}

/// Build the node for `elements[start..end]` and return its index.
fn build_node(
  elements: &mut [FieldElement],
  nodes: &mut Vec<BvhNode>,
  start: usize,
  end: usize,
  parent_bounds: &Aabb,
) -> u32 {
  let index = nodes.len() as u32;
  nodes.push(BvhNode {
    bounds: [Aabb::empty(); 2],
    slots: [BvhSlot::Empty; 2],
  });

  let axis = parent_bounds.longest_axis();
  let split = parent_bounds.center()[axis];
  let part = partition(elements, start, end, axis, split);

  // Left slot, never empty
  let (bounds, slot) = if part > start + 1 {
    let bounds = union_bounds(&elements[start..part]);
    let child = build_node(elements, nodes, start, part, &bounds);
    (bounds, BvhSlot::Node(child))
  } else {
    (*elements[start].bounds(), BvhSlot::Leaf(start as u32))
  };
  nodes[index as usize].bounds[0] = bounds;
  nodes[index as usize].slots[0] = slot;

  // Right slot
  if part < end {
    let (bounds, slot) = if part < end - 1 {
      let bounds = union_bounds(&elements[part..end]);
      let child = build_node(elements, nodes, part, end, &bounds);
      (bounds, BvhSlot::Node(child))
    } else {
      (*elements[part].bounds(), BvhSlot::Leaf(part as u32))
    };
    nodes[index as usize].bounds[1] = bounds;
    nodes[index as usize].slots[1] = slot;
  }

  index
}

/// Partition `elements[start..end]` around `split` on `axis` by box center.
///
/// Returns the first index of the right side, always greater than `start`.
fn partition(elements: &mut [FieldElement], start: usize, end: usize, axis: usize, split: f32) -> usize {
  // Compare doubled split against min + max to avoid the halving
  let split = split * 2.0;
  let key = |element: &FieldElement| element.bounds().min[axis] + element.bounds().max[axis];

  let mut i = start;
  let mut j = end - 1;
  loop {
    while i < j && split > key(&elements[i]) {
      i += 1;
    }
    while j > i && split < key(&elements[j]) {
      j -= 1;
    }
    if i >= j {
      break;
    }
    elements.swap(i, j);
    i += 1;
    j -= 1;
  }

  if i == start {
    i += 1;
  }
  i
}

#[cfg(test)]
#[path = "bvh_test.rs"]
mod bvh_test;
