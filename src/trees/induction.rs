//! Top-down induction shared by the ID3 and J48 learners.
use super::node::{Node, NodeId, Tree};
use super::params::{Criterion, TreeParams};
use super::stats::{gain_ratio, information_gain, majority_class};
use crate::data::dataset::Dataset;
use log::debug;

struct SplitData {
    feature_index: usize,
    score: f64,
}

/// Grows a tree over `dataset`, which must hold only categorical features.
///
/// An empty dataset yields a single leaf without a class.
pub(crate) fn build_tree(dataset: &Dataset, params: &TreeParams) -> Tree {
    let mut nodes = Vec::new();
    let mut used = vec![false; dataset.num_features()];
    let root = grow(&mut nodes, dataset, params, &mut used, 0);
    Tree::from_nodes(
        nodes,
        root,
        dataset.features().to_vec(),
        dataset.class_index(),
    )
}

fn push(nodes: &mut Vec<Node>, node: Node) -> NodeId {
    nodes.push(node);
    nodes.len() - 1
}

fn grow(
    nodes: &mut Vec<Node>,
    dataset: &Dataset,
    params: &TreeParams,
    used: &mut [bool],
    depth: usize,
) -> NodeId {
    if dataset.is_empty() {
        return push(nodes, Node::Leaf { class: None });
    }

    let majority_leaf = Node::Leaf {
        class: majority_class(dataset),
    };
    if params
        .max_depth
        .is_some_and(|max_depth| depth >= usize::from(max_depth))
    {
        return push(nodes, majority_leaf);
    }

    let best_split = match get_best_split(dataset, params, used) {
        Some(split) if split.score > 0.0 => split,
        _ => return push(nodes, majority_leaf),
    };
    debug!(
        "Splitting {} records on {} (score {:.4}) at depth {}.",
        dataset.len(),
        dataset.feature(best_split.feature_index).name(),
        best_split.score,
        depth
    );

    let feature = best_split.feature_index;
    used[feature] = true;
    let children: Vec<NodeId> = dataset
        .partition(feature)
        .iter()
        .map(|partition| grow(nodes, partition, params, used, depth + 1))
        .collect();
    used[feature] = false;

    push(nodes, Node::Internal { feature, children })
}

/// Highest scoring candidate feature. Ties go to the lowest feature index.
fn get_best_split(dataset: &Dataset, params: &TreeParams, used: &[bool]) -> Option<SplitData> {
    let mut best_split: Option<SplitData> = None;

    for feature_index in 0..dataset.num_features() {
        if feature_index == dataset.class_index()
            || dataset.feature(feature_index).is_numeric()
            || (!params.reuse_features && used[feature_index])
        {
            continue;
        }

        let score = match params.criterion {
            Criterion::InformationGain => information_gain(dataset, feature_index),
            Criterion::GainRatio => gain_ratio(dataset, feature_index),
        };

        if best_split.as_ref().map_or(true, |best| score > best.score) {
            best_split = Some(SplitData {
                feature_index,
                score,
            });
        }
    }
    best_split
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::{Feature, Value};
    use crate::data::fixtures::weather_nominal;

    #[test]
    fn test_empty_dataset_gives_no_data_leaf() {
        let dataset = weather_nominal().range(0, 0).unwrap();
        let tree = build_tree(&dataset, &TreeParams::id3());
        assert_eq!(tree.node(tree.root()), &Node::Leaf { class: None });
        assert!(tree.children(tree.root()).is_empty());
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_pure_dataset_gives_single_leaf() {
        let dataset = weather_nominal();
        let yes = (0..dataset.len())
            .filter(|&i| dataset.class_value(i) == Some(0))
            .collect::<Vec<_>>();
        let rows: Vec<Vec<Value>> = yes
            .iter()
            .map(|&i| dataset.record(i).iter().copied().collect())
            .collect();
        let pure = Dataset::from_rows(dataset.features().to_vec(), 4, rows).unwrap();

        for params in [TreeParams::id3(), TreeParams::j48()] {
            let tree = build_tree(&pure, &params);
            assert_eq!(tree.node(tree.root()), &Node::Leaf { class: Some(0) });
        }
    }

    #[test]
    fn test_root_has_highest_information_gain() {
        let dataset = weather_nominal();
        let tree = build_tree(&dataset, &TreeParams::id3());
        let root_feature = tree.node(tree.root()).feature().unwrap();

        let root_gain = information_gain(&dataset, root_feature);
        for feature in (0..4).filter(|&f| f != root_feature) {
            assert!(root_gain > information_gain(&dataset, feature));
        }
        assert_eq!(dataset.feature(root_feature).name(), "outlook");
    }

    #[test]
    fn test_children_follow_domain() {
        let dataset = weather_nominal();
        let tree = build_tree(&dataset, &TreeParams::j48());
        let root = tree.root();
        let feature = tree.node(root).feature().unwrap();
        assert_eq!(
            tree.children(root).len(),
            dataset.feature(feature).domain_size()
        );
    }

    #[test]
    fn test_unseen_value_recurses_into_empty_partition() {
        let features = vec![
            Feature::categorical("colour", &["red", "green", "blue"]),
            Feature::categorical("label", &["a", "b"]),
        ];
        let dataset = Dataset::from_rows(
            features,
            1,
            vec![
                vec![Value::Category(0), Value::Category(0)],
                vec![Value::Category(1), Value::Category(1)],
            ],
        )
        .unwrap();
        let tree = build_tree(&dataset, &TreeParams::id3());
        assert_eq!(
            tree.export(),
            "colour = red: a\ncolour = green: b\ncolour = blue: null"
        );
    }

    #[test]
    fn test_max_depth() {
        let mut params = TreeParams::id3();
        params.set_max_depth(Some(1)).unwrap();
        let tree = build_tree(&weather_nominal(), &params);
        assert_eq!(tree.depth(), 1);
        assert_eq!(
            tree.export(),
            "outlook = sunny: no\noutlook = overcast: yes\noutlook = rainy: yes"
        );
    }
}
