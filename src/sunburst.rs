// Radial partition (sunburst) layout

use crate::hierarchy::HierarchyNode;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunburstOptions {
    pub radius: f64,
    /// Arcs whose length at mid-radius is at or below this get no label.
    pub min_label_arc: f64,
}

impl Default for SunburstOptions {
    fn default() -> Self {
        Self {
            radius: 300.0,
            min_label_arc: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcNode {
    pub name: String,
    pub value: f64,
    pub depth: usize,
    /// Start angle in radians.
    pub x0: f64,
    /// End angle in radians.
    pub x1: f64,
    /// Inner radius.
    pub y0: f64,
    /// Outer radius.
    pub y1: f64,
    /// Fraction of the parent's value; 1 for the root.
    pub share: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ArcNode>,
}

impl ArcNode {
    pub fn angle(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Arc length measured along the middle of the band.
    pub fn mid_arc_length(&self) -> f64 {
        (self.y0 + self.y1) / 2.0 * self.angle()
    }

    pub fn shows_label(&self, min_label_arc: f64) -> bool {
        self.depth > 0 && self.mid_arc_length() > min_label_arc
    }

    /// Pre-order traversal, root first.
    pub fn descendants(&self) -> Vec<&ArcNode> {
        let mut out = vec![self];
        for child in &self.children {
            out.extend(child.descendants());
        }
        out
    }

    pub fn find(&self, name: &str) -> Option<&ArcNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// Partition the full circle among `root`'s descendants.
///
/// Depth `d >= 1` occupies the ring `[(d - 1) * r / D, d * r / D]` where `D`
/// is the tree height; the root itself is the degenerate band `[0, 0]`.
pub fn layout(root: &HierarchyNode, radius: f64) -> ArcNode {
    let max_depth = root.height().max(1);
    let band = radius.max(0.0) / max_depth as f64;

    let mut arc = ArcNode {
        name: root.name.clone(),
        value: root.value,
        depth: 0,
        x0: 0.0,
        x1: TAU,
        y0: 0.0,
        y1: 0.0,
        share: 1.0,
        children: Vec::new(),
    };
    arc.children = partition_children(root, &arc, band);
    arc
}

fn partition_children(node: &HierarchyNode, parent: &ArcNode, band: f64) -> Vec<ArcNode> {
    let depth = parent.depth + 1;
    let k = if parent.value > 0.0 {
        parent.angle() / parent.value
    } else {
        0.0
    };

    let last = node.children.len().saturating_sub(1);
    let mut x = parent.x0;
    let mut arcs = Vec::with_capacity(node.children.len());

    for (i, child) in node.children.iter().enumerate() {
        let value = child.value.max(0.0);
        // Snap the final edge so the children cover the parent exactly
        let next = if i == last && parent.value > 0.0 {
            parent.x1
        } else {
            x + value * k
        };

        let mut arc = ArcNode {
            name: child.name.clone(),
            value,
            depth,
            x0: x,
            x1: next,
            y0: band * (depth - 1) as f64,
            y1: band * depth as f64,
            share: if parent.value > 0.0 { value / parent.value } else { 0.0 },
            children: Vec::new(),
        };
        arc.children = partition_children(child, &arc, band);
        arcs.push(arc);
        x = next;
    }

    arcs
}
