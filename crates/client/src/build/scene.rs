//! Leaf traversal over loader scene trees.

use serde::{Deserialize, Serialize};
use shared::{Geometry, GeometryError, SubGeometry};

use super::merge_geometries;

/// Anything that can enumerate drawable sub-geometries.
pub trait SubMeshSource {
    /// Visit every leaf sub-geometry in document order.
    fn visit_leaves(&self, visit: &mut dyn FnMut(&SubGeometry));
}

/// Loader-side scene tree: groups nest arbitrarily, leaves carry geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneNode {
    Group {
        #[serde(default)]
        name: String,
        #[serde(default)]
        children: Vec<SceneNode>,
    },
    Leaf(SubGeometry),
}

impl SceneNode {
    pub fn group(name: impl Into<String>, children: Vec<SceneNode>) -> Self {
        Self::Group {
            name: name.into(),
            children,
        }
    }

    pub fn leaf(geometry: impl Into<SubGeometry>) -> Self {
        Self::Leaf(geometry.into())
    }
}

impl SubMeshSource for SceneNode {
    fn visit_leaves(&self, visit: &mut dyn FnMut(&SubGeometry)) {
        // Explicit stack; children pushed in reverse to keep depth-first order.
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                SceneNode::Group { children, .. } => stack.extend(children.iter().rev()),
                SceneNode::Leaf(geometry) => visit(geometry),
            }
        }
    }
}

impl SubMeshSource for SubGeometry {
    fn visit_leaves(&self, visit: &mut dyn FnMut(&SubGeometry)) {
        visit(self)
    }
}

impl SubMeshSource for Geometry {
    fn visit_leaves(&self, visit: &mut dyn FnMut(&SubGeometry)) {
        visit(&SubGeometry::indexed(self.vertices.clone(), self.faces.clone()))
    }
}

impl<T: SubMeshSource> SubMeshSource for [T] {
    fn visit_leaves(&self, visit: &mut dyn FnMut(&SubGeometry)) {
        for source in self {
            source.visit_leaves(visit);
        }
    }
}

impl<T: SubMeshSource> SubMeshSource for Vec<T> {
    fn visit_leaves(&self, visit: &mut dyn FnMut(&SubGeometry)) {
        self.as_slice().visit_leaves(visit)
    }
}

/// Clone out all leaves of `source` in order.
pub fn collect_leaves<S: SubMeshSource + ?Sized>(source: &S) -> Vec<SubGeometry> {
    let mut leaves = Vec::new();
    source.visit_leaves(&mut |leaf| leaves.push(leaf.clone()));
    leaves
}

/// Walk `source` and merge its leaves into one geometry.
pub fn merge_source<S: SubMeshSource + ?Sized>(
    source: &S,
) -> Result<Option<Geometry>, GeometryError> {
    merge_geometries(collect_leaves(source))
}
