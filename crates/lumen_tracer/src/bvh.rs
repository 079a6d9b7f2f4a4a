//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the bounded objects of a scene. Leaves hold indices into
//! the scene's object list, so the tree never owns primitives and must be
//! rebuilt whenever that list or any transform changes.

use std::fmt::Write;

use crate::Object;
use lumen_math::{Aabb, Ray};

/// BVH node - either a branch with two children or a leaf with objects.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal routing node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding at most one object index.
    Leaf { objects: Vec<usize>, bbox: Aabb },
    /// Empty tree (no bounded objects).
    Empty,
}

/// Nearest hit found by a BVH query: distance and object index.
pub type BvhHit = (f32, usize);

impl BvhNode {
    /// Build a BVH over every object that has a bounding box.
    pub fn new(objects: &[Object]) -> Self {
        let indices = objects
            .iter()
            .enumerate()
            .filter(|(_, object)| object.bounding_box().is_some())
            .map(|(index, _)| index)
            .collect();
        Self::from_indices(objects, indices)
    }

    /// Build a BVH over a chosen subset of `objects`.
    ///
    /// Indices of unbounded objects are ignored.
    pub fn from_indices(objects: &[Object], mut indices: Vec<usize>) -> Self {
        indices.retain(|&index| {
            objects
                .get(index)
                .is_some_and(|object| object.bounding_box().is_some())
        });

        if indices.is_empty() {
            return BvhNode::Empty;
        }
        Self::build(objects, indices, 0)
    }

    /// Recursive median split on an axis that cycles x, y, z with depth.
    fn build(objects: &[Object], mut indices: Vec<usize>, axis: usize) -> Self {
        let bounds = indices.iter().fold(Aabb::EMPTY, |acc, &index| {
            Aabb::surrounding(&acc, &world_bounds(objects, index))
        });

        if indices.len() <= 1 {
            return BvhNode::Leaf {
                objects: indices,
                bbox: bounds,
            };
        }

        indices.sort_by(|&a, &b| {
            let a_center = world_bounds(objects, a).center()[axis];
            let b_center = world_bounds(objects, b).center()[axis];
            a_center
                .partial_cmp(&b_center)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mid = indices.len() / 2;
        let right_indices = indices.split_off(mid);
        let next_axis = (axis + 1) % 3;

        BvhNode::Branch {
            left: Box::new(Self::build(objects, indices, next_axis)),
            right: Box::new(Self::build(objects, right_indices, next_axis)),
            bbox: bounds,
        }
    }

    /// Nearest forward hit among the indexed objects.
    ///
    /// Both children are always visited; only the node boxes prune. The
    /// object whose id equals `exclude` is skipped.
    pub fn intersect(&self, objects: &[Object], ray: &Ray, exclude: Option<usize>) -> Option<BvhHit> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { objects: leaf, bbox } => {
                if !bbox.hit(ray) {
                    return None;
                }

                leaf.iter()
                    .filter(|&&index| Some(objects[index].id()) != exclude)
                    .filter_map(|&index| {
                        objects[index]
                            .intersect_transformed(ray)
                            .map(|t| (t, index))
                    })
                    .fold(None, nearer)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray) {
                    return None;
                }

                let hit_left = left.intersect(objects, ray, exclude);
                let hit_right = right.intersect(objects, ray, exclude);
                match (hit_left, hit_right) {
                    (Some(l), Some(r)) => Some(if r.0 < l.0 { r } else { l }),
                    (l, None) => l,
                    (None, r) => r,
                }
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Number of leaf nodes.
    pub fn leaf_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Depth of the deepest leaf (a single leaf has depth 1).
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Every object index stored in the leaves, left to right.
    pub fn object_indices(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_indices(&mut out);
        out
    }

    fn collect_indices(&self, out: &mut Vec<usize>) {
        match self {
            BvhNode::Empty => {}
            BvhNode::Leaf { objects, .. } => out.extend_from_slice(objects),
            BvhNode::Branch { left, right, .. } => {
                left.collect_indices(out);
                right.collect_indices(out);
            }
        }
    }

    /// Text outline of the tree: one block per node named `root`,
    /// `root->left`, `root->left->right` and so on.
    pub fn describe(&self, objects: &[Object]) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.describe_node("root", objects, &mut out);
        out
    }

    fn describe_node(&self, name: &str, objects: &[Object], out: &mut String) -> std::fmt::Result {
        let bbox = match self {
            BvhNode::Empty => {
                writeln!(out, "{}: empty", name)?;
                return Ok(());
            }
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => bbox,
        };

        writeln!(out, "{}:", name)?;
        writeln!(out, "- min: {{{:.4} {:.4} {:.4}}}", bbox.min.x, bbox.min.y, bbox.min.z)?;
        writeln!(out, "- max: {{{:.4} {:.4} {:.4}}}", bbox.max.x, bbox.max.y, bbox.max.z)?;

        match self {
            BvhNode::Leaf { objects: leaf, .. } => {
                writeln!(out, "- leaf")?;
                for &index in leaf {
                    let object = &objects[index];
                    writeln!(out, "- object #{} ({})", object.id(), object.kind_name())?;
                }
                writeln!(out)?;
            }
            BvhNode::Branch { left, right, .. } => {
                writeln!(out, "- branch")?;
                writeln!(out)?;
                left.describe_node(&format!("{}->left", name), objects, out)?;
                right.describe_node(&format!("{}->right", name), objects, out)?;
            }
            BvhNode::Empty => {}
        }
        Ok(())
    }
}

fn world_bounds(objects: &[Object], index: usize) -> Aabb {
    objects[index].bounding_box().unwrap_or(Aabb::EMPTY)
}

/// Keep whichever candidate has the smaller `t`; ties keep `best`.
fn nearer(best: Option<BvhHit>, candidate: BvhHit) -> Option<BvhHit> {
    match best {
        Some(current) if current.0 <= candidate.0 => Some(current),
        _ => Some(candidate),
    }
}
