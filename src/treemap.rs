// Squarified treemap layout

use crate::hierarchy::{HierarchyNode, NodeSummary};
use serde::{Deserialize, Serialize};

/// Target aspect ratio for squarified rows (golden ratio).
pub const PHI: f64 = 1.618_033_988_749_895;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Shrink by `d` on every side. An axis that would invert collapses to
    /// its midpoint instead.
    pub fn inset(&self, d: f64) -> Self {
        Self::new(self.x0 + d, self.y0 + d, self.x1 - d, self.y1 - d).collapsed()
    }

    fn collapsed(mut self) -> Self {
        if self.x1 < self.x0 {
            let mid = (self.x0 + self.x1) / 2.0;
            self.x0 = mid;
            self.x1 = mid;
        }
        if self.y1 < self.y0 {
            let mid = (self.y0 + self.y1) / 2.0;
            self.y0 = mid;
            self.y1 = mid;
        }
        self
    }

    /// True when the interiors intersect; shared edges do not count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        self.x0 < other.x1 - EPS
            && other.x0 < self.x1 - EPS
            && self.y0 < other.y1 - EPS
            && other.y0 < self.y1 - EPS
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        other.x0 >= self.x0 - EPS
            && other.y0 >= self.y0 - EPS
            && other.x1 <= self.x1 + EPS
            && other.y1 <= self.y1 + EPS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreemapOptions {
    pub width: f64,
    pub height: f64,
    /// Gap between adjacent siblings.
    pub padding_inner: f64,
    /// Gap between a parent's border and its children.
    pub padding_outer: f64,
}

impl Default for TreemapOptions {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 520.0,
            padding_inner: 4.0,
            padding_outer: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreemapNode {
    pub name: String,
    pub value: f64,
    pub depth: usize,
    #[serde(flatten)]
    pub rect: Rect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<NodeSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreemapNode>,
}

impl TreemapNode {
    pub fn leaves(&self) -> Vec<&TreemapNode> {
        if self.children.is_empty() {
            return vec![self];
        }
        self.children.iter().flat_map(TreemapNode::leaves).collect()
    }

    /// Region the children were tiled into, before their own inset.
    pub fn tiling_area(&self, options: &TreemapOptions) -> Rect {
        let p = options.padding_inner / 2.0;
        let edge = options.padding_outer - p;
        Rect::new(
            self.rect.x0 + edge,
            self.rect.y0 + edge,
            self.rect.x1 - edge,
            self.rect.y1 - edge,
        )
        .collapsed()
    }
}

/// Lay `root` out over the canvas described by `options`.
///
/// The root occupies the whole canvas. Children are squarified inside their
/// parent's tiling area in the order given, so callers sort beforehand.
pub fn layout(root: &HierarchyNode, options: &TreemapOptions) -> TreemapNode {
    let canvas = Rect::new(0.0, 0.0, options.width.max(0.0), options.height.max(0.0));
    place(root, 0, canvas, 0.0, options)
}

fn place(node: &HierarchyNode, depth: usize, cell: Rect, inset: f64, options: &TreemapOptions) -> TreemapNode {
    let mut laid_out = TreemapNode {
        name: node.name.clone(),
        value: node.value,
        depth,
        rect: cell.inset(inset),
        summary: node.summary,
        children: Vec::new(),
    };

    if !node.children.is_empty() {
        let area = laid_out.tiling_area(options);
        let values: Vec<f64> = node.children.iter().map(|c| c.value.max(0.0)).collect();
        let cells = squarify(&values, area, PHI);
        let p = options.padding_inner / 2.0;

        laid_out.children = node
            .children
            .iter()
            .zip(cells)
            .map(|(child, cell)| place(child, depth + 1, cell, p, options))
            .collect();
    }

    laid_out
}

/// Split `area` into one cell per value, greedily growing each row while
/// its worst aspect ratio improves towards `ratio`.
pub fn squarify(values: &[f64], area: Rect, ratio: f64) -> Vec<Rect> {
    let n = values.len();
    let mut cells = vec![Rect::new(area.x0, area.y0, area.x0, area.y0); n];
    let ratio = ratio.max(1.0);

    let (mut x0, mut y0, x1, y1) = (area.x0, area.y0, area.x1, area.y1);
    let mut value: f64 = values.iter().sum();
    let (mut i0, mut i1) = (0usize, 0usize);

    while i0 < n {
        if value <= 0.0 {
            // Only zero weights remain
            for cell in &mut cells[i0..] {
                *cell = Rect::new(x0, y0, x0, y0);
            }
            break;
        }

        let dx = x1 - x0;
        let dy = y1 - y0;

        // Start the row at the next non-empty value
        let mut sum_value;
        loop {
            sum_value = values[i1];
            i1 += 1;
            if sum_value > 0.0 || i1 >= n {
                break;
            }
        }

        let mut min_value = sum_value;
        let mut max_value = sum_value;
        let alpha = (dy / dx).max(dx / dy) / (value * ratio);
        let mut beta = sum_value * sum_value * alpha;
        let mut min_ratio = (max_value / beta).max(beta / min_value);

        while i1 < n {
            let node_value = values[i1];
            sum_value += node_value;
            min_value = min_value.min(node_value);
            max_value = max_value.max(node_value);
            beta = sum_value * sum_value * alpha;
            let new_ratio = (max_value / beta).max(beta / min_value);
            if new_ratio > min_ratio {
                sum_value -= node_value;
                break;
            }
            min_ratio = new_ratio;
            i1 += 1;
        }

        let row = &values[i0..i1];
        if dx < dy {
            let row_y1 = if dy > 0.0 { y0 + dy * sum_value / value } else { y1 };
            dice(row, sum_value, Rect::new(x0, y0, x1, row_y1), &mut cells[i0..i1]);
            y0 = row_y1;
        } else {
            let row_x1 = if dx > 0.0 { x0 + dx * sum_value / value } else { x1 };
            slice(row, sum_value, Rect::new(x0, y0, row_x1, y1), &mut cells[i0..i1]);
            x0 = row_x1;
        }

        value -= sum_value;
        i0 = i1;
    }

    cells
}

/// Lay a row out left to right.
pub fn dice(values: &[f64], total: f64, area: Rect, out: &mut [Rect]) {
    let k = if total > 0.0 { (area.x1 - area.x0) / total } else { 0.0 };
    let mut x = area.x0;
    for (v, cell) in values.iter().zip(out.iter_mut()) {
        let next = x + v * k;
        *cell = Rect::new(x, area.y0, next, area.y1);
        x = next;
    }
}

/// Lay a row out top to bottom.
pub fn slice(values: &[f64], total: f64, area: Rect, out: &mut [Rect]) {
    let k = if total > 0.0 { (area.y1 - area.y0) / total } else { 0.0 };
    let mut y = area.y0;
    for (v, cell) in values.iter().zip(out.iter_mut()) {
        let next = y + v * k;
        *cell = Rect::new(area.x0, y, area.x1, next);
        y = next;
    }
}

/// Minimum cell size for each text line of a treemap leaf.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelRules {
    pub min_width: f64,
    pub name_min_height: f64,
    pub count_min_height: f64,
}

impl Default for LabelRules {
    fn default() -> Self {
        Self {
            min_width: 140.0,
            name_min_height: 45.0,
            count_min_height: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabelVisibility {
    pub name: bool,
    pub count: bool,
}

pub fn label_visibility(rect: &Rect, rules: &LabelRules) -> LabelVisibility {
    let wide = rect.width() >= rules.min_width;
    LabelVisibility {
        name: wide && rect.height() >= rules.name_min_height,
        count: wide && rect.height() >= rules.count_min_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-6;

    fn flat(values: &[f64]) -> HierarchyNode {
        HierarchyNode::branch(
            "root",
            values
                .iter()
                .enumerate()
                .map(|(i, v)| HierarchyNode::leaf(format!("n{}", i), *v))
                .collect(),
        )
    }

    fn unpadded(width: f64, height: f64) -> TreemapOptions {
        TreemapOptions {
            width,
            height,
            padding_inner: 0.0,
            padding_outer: 0.0,
        }
    }

    fn assert_no_sibling_overlap(node: &TreemapNode) {
        for (i, a) in node.children.iter().enumerate() {
            for b in node.children.iter().skip(i + 1) {
                assert!(!a.rect.overlaps(&b.rect), "{:?} overlaps {:?}", a.rect, b.rect);
            }
            assert_no_sibling_overlap(a);
        }
    }

    /// At every internal node, the children's cells (rects grown back by half
    /// the inner padding) tile the tiling area, and each pair of siblings is
    /// at least `padding_inner` apart on one axis.
    fn assert_padded_tiling(node: &TreemapNode, options: &TreemapOptions) {
        if node.children.is_empty() {
            return;
        }
        let p = options.padding_inner / 2.0;
        let cells: f64 = node
            .children
            .iter()
            .map(|c| Rect::new(c.rect.x0 - p, c.rect.y0 - p, c.rect.x1 + p, c.rect.y1 + p).area())
            .sum();
        let usable = node.tiling_area(options).area();
        assert!((cells - usable).abs() < TOL, "{}: cells {} vs usable {}", node.name, cells, usable);

        for (i, a) in node.children.iter().enumerate() {
            for b in node.children.iter().skip(i + 1) {
                let gap_x = (b.rect.x0 - a.rect.x1).max(a.rect.x0 - b.rect.x1);
                let gap_y = (b.rect.y0 - a.rect.y1).max(a.rect.y0 - b.rect.y1);
                assert!(
                    gap_x >= options.padding_inner - TOL || gap_y >= options.padding_inner - TOL,
                    "{} and {} are closer than the inner padding",
                    a.name,
                    b.name
                );
            }
            assert_padded_tiling(a, options);
        }
    }

    #[test]
    fn test_root_is_canvas() {
        let laid = layout(&flat(&[3.0, 2.0, 1.0]), &TreemapOptions::default());
        assert_eq!(laid.rect, Rect::new(0.0, 0.0, 900.0, 520.0));
    }

    #[test]
    fn test_areas_proportional_without_padding() {
        let values = [6.0, 6.0, 4.0, 3.0, 2.0, 2.0, 1.0];
        let laid = layout(&flat(&values), &unpadded(600.0, 400.0));
        let total: f64 = values.iter().sum();

        let child_area: f64 = laid.children.iter().map(|c| c.rect.area()).sum();
        assert!((child_area - laid.rect.area()).abs() < TOL);

        for (child, v) in laid.children.iter().zip(values) {
            let expected = 600.0 * 400.0 * v / total;
            assert!((child.rect.area() - expected).abs() < TOL);
        }
        assert_no_sibling_overlap(&laid);
    }

    #[test]
    fn test_padding_keeps_children_inside_and_apart() {
        let root = HierarchyNode::branch(
            "root",
            vec![
                HierarchyNode::branch("a", vec![HierarchyNode::leaf("a1", 5.0), HierarchyNode::leaf("a2", 3.0)]),
                HierarchyNode::leaf("b", 4.0),
                HierarchyNode::leaf("c", 1.0),
            ],
        );
        let options = TreemapOptions::default();
        let laid = layout(&root, &options);

        let inner = laid.rect.inset(options.padding_outer);
        for child in &laid.children {
            assert!(inner.contains(&child.rect));
        }
        assert_no_sibling_overlap(&laid);
        assert_padded_tiling(&laid, &options);
    }

    #[test]
    fn test_nested_padding_at_every_level() {
        let root = HierarchyNode::branch(
            "root",
            vec![
                HierarchyNode::branch(
                    "a",
                    vec![
                        HierarchyNode::branch("a1", vec![HierarchyNode::leaf("x", 9.0), HierarchyNode::leaf("y", 4.0)]),
                        HierarchyNode::leaf("a2", 6.0),
                        HierarchyNode::leaf("a3", 2.0),
                    ],
                ),
                HierarchyNode::branch("b", vec![HierarchyNode::leaf("b1", 7.0), HierarchyNode::leaf("b2", 5.0)]),
                HierarchyNode::leaf("c", 3.0),
            ],
        );
        let options = TreemapOptions::default();
        let laid = layout(&root, &options);
        assert_padded_tiling(&laid, &options);
    }

    #[test]
    fn test_zero_value_child_has_zero_area() {
        let laid = layout(&flat(&[5.0, 0.0, 2.0]), &unpadded(100.0, 100.0));
        assert_eq!(laid.children[1].rect.area(), 0.0);
        for child in &laid.children {
            assert!(child.rect.x1 >= child.rect.x0);
            assert!(child.rect.y1 >= child.rect.y0);
        }
    }

    #[test]
    fn test_all_zero_values() {
        let laid = layout(&flat(&[0.0, 0.0]), &TreemapOptions::default());
        for child in &laid.children {
            assert_eq!(child.rect.area(), 0.0);
            assert!(child.rect.x0.is_finite() && child.rect.y0.is_finite());
        }
    }

    #[test]
    fn test_tiny_canvas_never_negative() {
        let laid = layout(&flat(&[1.0, 1.0, 1.0]), &TreemapOptions { width: 8.0, height: 8.0, ..TreemapOptions::default() });
        for node in laid.leaves() {
            assert!(node.rect.x1 >= node.rect.x0);
            assert!(node.rect.y1 >= node.rect.y0);
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let tree = flat(&[9.0, 7.0, 7.0, 3.0, 1.0]);
        let options = TreemapOptions::default();
        assert_eq!(layout(&tree, &options), layout(&tree, &options));
    }

    #[test]
    fn test_label_visibility() {
        let rules = LabelRules::default();
        let big = Rect::new(0.0, 0.0, 200.0, 80.0);
        let medium = Rect::new(0.0, 0.0, 200.0, 50.0);
        let narrow = Rect::new(0.0, 0.0, 100.0, 80.0);
        assert_eq!(label_visibility(&big, &rules), LabelVisibility { name: true, count: true });
        assert_eq!(label_visibility(&medium, &rules), LabelVisibility { name: true, count: false });
        assert_eq!(label_visibility(&narrow, &rules), LabelVisibility { name: false, count: false });
    }
}
