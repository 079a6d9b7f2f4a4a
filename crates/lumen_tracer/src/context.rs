//! Per-pixel ray tree recording for diagnostics.
//!
//! A [`PixelContext`] is threaded through a single-pixel trace as
//! `Option<&mut PixelContext>` and collects one [`Iteration`] per traced ray.
//! It is never shared across threads; full-frame renders pass `None`.

use crate::{Contributions, RayTraceResults};
use lumen_math::{Ray, Vec3};

/// Why a ray was traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationKind {
    Primary,
    Reflection,
    Refraction,
}

impl IterationKind {
    pub fn name(self) -> &'static str {
        match self {
            IterationKind::Primary => "Primary",
            IterationKind::Reflection => "Reflection",
            IterationKind::Refraction => "Refraction",
        }
    }
}

/// A shadow ray cast from a hit point toward a light.
#[derive(Debug, Clone, Copy)]
pub struct ShadowRay {
    pub ray: Ray,
    pub occluded: bool,
}

/// What a recorded ray hit.
#[derive(Debug, Clone, Copy)]
pub struct HitInfo {
    pub object_id: usize,
    pub kind_name: &'static str,
    pub normal: Vec3,
    pub t: f32,
}

/// Tags attached to an iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationTag {
    /// Snell's law had no solution; transmission went to reflection.
    TotalInternalReflection,
    /// A refracted ray entering a solid.
    IntoObject,
    /// A refracted ray leaving a solid.
    IntoAir,
}

impl IterationTag {
    pub fn name(self) -> &'static str {
        match self {
            IterationTag::TotalInternalReflection => "total-internal-reflection",
            IterationTag::IntoObject => "into-object",
            IterationTag::IntoAir => "into-air",
        }
    }
}

/// One traced ray and everything computed for it.
#[derive(Debug, Clone)]
pub struct Iteration {
    pub kind: IterationKind,
    /// Index of the iteration that spawned this one
    pub parent: Option<usize>,
    pub ray: Ray,
    pub hit: Option<HitInfo>,
    pub results: RayTraceResults,
    pub shadow_rays: Vec<ShadowRay>,
    pub contributions: Contributions,
    pub tags: Vec<IterationTag>,
}

impl Iteration {
    pub fn new(kind: IterationKind, parent: Option<usize>) -> Self {
        Self {
            kind,
            parent,
            ray: Ray::default(),
            hit: None,
            results: RayTraceResults::default(),
            shadow_rays: Vec::new(),
            contributions: Contributions::default(),
            tags: Vec::new(),
        }
    }

    /// Tags joined with spaces, or an empty string.
    pub fn extra_info(&self) -> String {
        self.tags
            .iter()
            .map(|tag| tag.name())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Flat list of iterations forming a forest via parent links.
#[derive(Debug, Clone, Default)]
pub struct PixelContext {
    iterations: Vec<Iteration>,
}

impl PixelContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new iteration and return its index.
    pub fn push(&mut self, kind: IterationKind, parent: Option<usize>) -> usize {
        self.iterations.push(Iteration::new(kind, parent));
        self.iterations.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Iteration> {
        self.iterations.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Iteration> {
        self.iterations.get_mut(index)
    }

    pub fn iterations(&self) -> &[Iteration] {
        &self.iterations
    }

    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    /// Indices of iterations without a parent, in trace order.
    pub fn roots(&self) -> Vec<usize> {
        self.children_of(None)
    }

    /// Indices of the direct children of `parent`, in trace order.
    pub fn children(&self, parent: usize) -> Vec<usize> {
        self.children_of(Some(parent))
    }

    fn children_of(&self, parent: Option<usize>) -> Vec<usize> {
        self.iterations
            .iter()
            .enumerate()
            .filter(|(_, iteration)| iteration.parent == parent)
            .map(|(index, _)| index)
            .collect()
    }

    /// Number of iterations of the given kind.
    pub fn count(&self, kind: IterationKind) -> usize {
        self.iterations
            .iter()
            .filter(|iteration| iteration.kind == kind)
            .count()
    }

    /// Number of edges on the longest root-to-leaf path.
    pub fn max_depth(&self) -> usize {
        (0..self.iterations.len())
            .map(|mut index| {
                let mut depth = 0;
                while let Some(parent) = self.iterations[index].parent {
                    index = parent;
                    depth += 1;
                }
                depth
            })
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_links() {
        let mut context = PixelContext::new();
        let root = context.push(IterationKind::Primary, None);
        let reflect = context.push(IterationKind::Reflection, Some(root));
        let refract = context.push(IterationKind::Refraction, Some(root));
        let nested = context.push(IterationKind::Reflection, Some(refract));

        assert_eq!(context.len(), 4);
        assert_eq!(context.roots(), vec![root]);
        assert_eq!(context.children(root), vec![reflect, refract]);
        assert_eq!(context.children(refract), vec![nested]);
        assert!(context.children(reflect).is_empty());
        assert_eq!(context.count(IterationKind::Reflection), 2);
        assert_eq!(context.max_depth(), 2);
    }

    #[test]
    fn test_extra_info() {
        let mut iteration = Iteration::new(IterationKind::Refraction, Some(0));
        assert_eq!(iteration.extra_info(), "");

        iteration.tags.push(IterationTag::IntoObject);
        iteration.tags.push(IterationTag::TotalInternalReflection);
        assert_eq!(iteration.extra_info(), "into-object total-internal-reflection");
    }
}
