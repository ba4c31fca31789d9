//! ID3 Decision Tree Classifier
use super::induction::build_tree;
use super::node::Tree;
use super::params::TreeParams;
use crate::data::dataset::{Dataset, Value};
use crate::error::{Result, TreeError};
use crate::metrics::confusion::ClassificationMetrics;
use log::{info, warn};
use nalgebra::DVector;
use std::fmt;

/// ID3 decision tree over categorical features.
///
/// Splits on the feature with the highest information gain and tests each feature at most
/// once along a path. Missing feature values aren't supported.
#[derive(Clone, Debug)]
pub struct Id3Classifier {
    tree: Option<Tree>,
    params: TreeParams,
}

impl Default for Id3Classifier {
    /// Creates a new instance of the ID3 classifier with default parameters.
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationMetrics for Id3Classifier {}

impl Id3Classifier {
    pub fn new() -> Self {
        Self {
            tree: None,
            params: TreeParams::id3(),
        }
    }

    /// Creates a new instance of the ID3 classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `max_depth` - The maximum depth of the tree, unbounded when `None`.
    ///
    /// # Errors
    ///
    /// This method will return an error if the maximum depth is less than 1.
    pub fn with_params(max_depth: Option<u16>) -> Result<Self> {
        let mut classifier = Self::new();
        classifier.set_max_depth(max_depth)?;
        Ok(classifier)
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<()> {
        self.params.set_max_depth(max_depth)
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.params.max_depth()
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// Builds the decision tree from a dataset.
    ///
    /// Records without a class are dropped first.
    ///
    /// # Errors
    ///
    /// This method will return an error if the schema has no feature besides the class, holds
    /// a numeric feature, if some feature value is missing, or if no record is labeled.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<&Tree> {
        if dataset.num_features() < 2 {
            return Err(TreeError::NoFeatures);
        }
        if let Some(feature) = dataset.features().iter().find(|f| f.is_numeric()) {
            return Err(TreeError::UnsupportedNumeric(feature.name().to_string()));
        }

        let (labeled, dropped) = dataset.with_labeled_records();
        if dropped > 0 {
            warn!("Dropped {} records without a class.", dropped);
        }
        if labeled.is_empty() && !dataset.is_empty() {
            return Err(TreeError::NoLabeledRecords(dataset.len()));
        }
        for record in 0..labeled.len() {
            for feature in 0..labeled.num_features() {
                if labeled.value(record, feature).is_missing() {
                    return Err(TreeError::MissingFeatureValue {
                        record,
                        feature: labeled.feature(feature).name().to_string(),
                    });
                }
            }
        }

        let tree = build_tree(&labeled, &self.params);
        info!(
            "Finished building the tree: {} nodes, depth {}, training accuracy {:.4}.",
            tree.node_count(),
            tree.depth(),
            tree.accuracy(&labeled)?
        );
        Ok(&*self.tree.insert(tree))
    }

    /// Predicts the class of a record laid out on the training schema.
    ///
    /// Returns `None` when the record reaches a leaf grown without training records.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet, or if the record holds a
    /// missing or unseen value for a tested feature.
    pub fn classify(&self, record: &DVector<Value>) -> Result<Option<usize>> {
        self.tree.as_ref().ok_or(TreeError::NotFitted)?.classify(record)
    }

    /// Classifies every record of `dataset`. A failing record doesn't affect the others.
    pub fn classify_dataset(&self, dataset: &Dataset) -> Vec<Result<Option<usize>>> {
        dataset
            .records()
            .map(|record| self.classify(&record))
            .collect()
    }

    pub fn class_label(&self, class: usize) -> Option<&str> {
        self.tree.as_ref().and_then(|tree| tree.class_label(class))
    }

    pub fn export(&self) -> Result<String> {
        Ok(self.tree.as_ref().ok_or(TreeError::NotFitted)?.export())
    }
}

impl fmt::Display for Id3Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tree {
            Some(tree) => write!(f, "Id3\n\n{}", tree),
            None => write!(f, "Id3: No model built yet."),
        }
    }
}
