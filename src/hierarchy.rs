// Weight-conserving trees built from aggregated groups

use crate::aggregate::{aggregate, Aggregation, Counting, KeyOrder, OccupationStat};
use crate::field::{Dimension, GroupKey};
use crate::record::{SleepDisorder, SleepRecord};
use serde::Serialize;

pub const HEALTHY: &str = "Healthy";

/// Summary fields carried from an aggregate onto a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeSummary {
    pub avg_quality: Option<f64>,
    pub avg_stress: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub name: String,
    /// Leaf weight, or the sum of the children's values.
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<NodeSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    /// Negative weights are clamped to zero.
    pub fn leaf(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: value.max(0.0),
            summary: None,
            children: Vec::new(),
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<HierarchyNode>) -> Self {
        let mut node = Self {
            name: name.into(),
            value: 0.0,
            summary: None,
            children,
        };
        node.sum();
        node
    }

    pub fn with_summary(mut self, summary: NodeSummary) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Recompute every internal value bottom-up from the leaves.
    pub fn sum(&mut self) -> f64 {
        if !self.children.is_empty() {
            self.value = self.children.iter_mut().map(HierarchyNode::sum).sum();
        }
        self.value
    }

    /// Sort children by value, largest first, at every level. Equal values
    /// keep their current order.
    pub fn sort_descending(&mut self) {
        self.children
            .sort_by(|a, b| b.value.total_cmp(&a.value));
        for child in &mut self.children {
            child.sort_descending();
        }
    }

    /// Longest path to a leaf; 0 for a leaf.
    pub fn height(&self) -> usize {
        self.children
            .iter()
            .map(|c| c.height() + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn leaves(&self) -> Vec<&HierarchyNode> {
        if self.is_leaf() {
            return vec![self];
        }
        self.children.iter().flat_map(HierarchyNode::leaves).collect()
    }

    pub fn find(&self, name: &str) -> Option<&HierarchyNode> {
        self.children.iter().find(|c| c.name == name)
    }
}

/// One leaf per occupation with at least `min_count` people, largest first.
pub fn from_occupations(stats: &[OccupationStat], min_count: usize) -> HierarchyNode {
    let children = stats
        .iter()
        .filter(|s| s.count >= min_count)
        .map(|s| {
            HierarchyNode::leaf(s.name.clone(), s.count as f64).with_summary(NodeSummary {
                avg_quality: s.avg_quality,
                avg_stress: s.avg_stress,
            })
        })
        .collect();

    let mut root = HierarchyNode::branch("Occupations", children);
    root.sort_descending();
    root
}

/// Build a depth-2 tree from a two-dimension aggregation. Level-one nodes
/// appear in first-seen order before sorting.
pub fn from_two_level(
    root_name: &str,
    aggregation: &Aggregation,
    label: impl Fn(usize, &GroupKey) -> String,
) -> HierarchyNode {
    let mut outer: Vec<(String, Vec<HierarchyNode>)> = Vec::new();

    for (key, stat) in &aggregation.entries {
        let (Some(first), Some(second)) = (key.first(), key.get(1)) else {
            continue;
        };
        let parent = label(0, first);
        let leaf = HierarchyNode::leaf(label(1, second), stat.count as f64);

        match outer.iter_mut().find(|(name, _)| *name == parent) {
            Some((_, children)) => children.push(leaf),
            None => outer.push((parent, vec![leaf])),
        }
    }

    let children = outer
        .into_iter()
        .map(|(name, leaves)| HierarchyNode::branch(name, leaves))
        .collect();

    let mut root = HierarchyNode::branch(root_name, children);
    root.sort_descending();
    root
}

/// BMI category -> sleep disorder, with "no disorder" shown as Healthy.
pub fn bmi_disorder_hierarchy(records: &[SleepRecord]) -> HierarchyNode {
    let aggregation = aggregate(
        records,
        &[Dimension::BmiCategory, Dimension::Disorder],
        &[],
        &KeyOrder::Insertion,
        Counting::Rows,
    );

    from_two_level("Total", &aggregation, |level, key| {
        let name = key.to_string();
        if level == 1 && name == SleepDisorder::None.label() {
            HEALTHY.to_string()
        } else {
            name
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::BmiCategory;

    fn person(bmi: BmiCategory, disorder: SleepDisorder) -> SleepRecord {
        SleepRecord {
            bmi,
            disorder,
            ..SleepRecord::default()
        }
    }

    fn stat(name: &str, count: usize) -> OccupationStat {
        OccupationStat {
            name: name.to_string(),
            count,
            avg_quality: Some(7.0),
            avg_stress: None,
        }
    }

    #[test]
    fn test_branch_sums_children() {
        let node = HierarchyNode::branch(
            "root",
            vec![
                HierarchyNode::branch("a", vec![HierarchyNode::leaf("x", 2.0), HierarchyNode::leaf("y", 3.0)]),
                HierarchyNode::leaf("b", 1.0),
            ],
        );
        assert_eq!(node.value, 6.0);
        assert_eq!(node.children[0].value, 5.0);
        assert_eq!(node.height(), 2);
        assert_eq!(node.leaves().len(), 3);
    }

    #[test]
    fn test_occupations_filter_and_sort() {
        let stats = vec![stat("Nurse", 3), stat("Judge", 1), stat("Doctor", 5), stat("Pilot", 3)];
        let root = from_occupations(&stats, 2);
        let names: Vec<&str> = root.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Doctor", "Nurse", "Pilot"]);
        assert_eq!(root.value, 11.0);
        assert_eq!(root.children[0].summary.unwrap().avg_quality, Some(7.0));
    }

    #[test]
    fn test_occupations_threshold_excludes_all() {
        let root = from_occupations(&[stat("Nurse", 1)], 5);
        assert!(root.children.is_empty());
        assert_eq!(root.value, 0.0);
    }

    #[test]
    fn test_bmi_disorder_hierarchy() {
        let records = vec![
            person(BmiCategory::Obese, SleepDisorder::SleepApnea),
            person(BmiCategory::Normal, SleepDisorder::None),
            person(BmiCategory::Normal, SleepDisorder::Insomnia),
            person(BmiCategory::Normal, SleepDisorder::None),
            person(BmiCategory::Obese, SleepDisorder::SleepApnea),
            person(BmiCategory::Normal, SleepDisorder::None),
        ];
        let root = bmi_disorder_hierarchy(&records);
        assert_eq!(root.value, 6.0);
        assert_eq!(root.children[0].name, "Normal");
        assert_eq!(root.children[0].value, 4.0);

        let normal = root.find("Normal").unwrap();
        assert_eq!(normal.children[0].name, HEALTHY);
        assert_eq!(normal.children[0].value, 3.0);
        assert_eq!(normal.find("Insomnia").unwrap().value, 1.0);
        assert_eq!(root.find("Obese").unwrap().value, 2.0);
    }

    #[test]
    fn test_internal_value_equals_children_sum() {
        let records = vec![
            person(BmiCategory::Overweight, SleepDisorder::Insomnia),
            person(BmiCategory::Overweight, SleepDisorder::SleepApnea),
            person(BmiCategory::Normal, SleepDisorder::None),
        ];
        let root = bmi_disorder_hierarchy(&records);
        for child in &root.children {
            let sum: f64 = child.children.iter().map(|c| c.value).sum();
            assert_eq!(child.value, sum);
        }
    }
}
