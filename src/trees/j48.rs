//! J48 Decision Tree Classifier
use super::induction::build_tree;
use super::node::Tree;
use super::params::J48Params;
use crate::data::dataset::{Dataset, Feature, Value};
use crate::error::{Result, TreeError};
use crate::metrics::confusion::ClassificationMetrics;
use crate::preprocessing::binarize::Binarizer;
use crate::preprocessing::impute::Imputer;
use log::{info, warn};
use nalgebra::DVector;
use std::fmt;

/// C4.5-style decision tree.
///
/// Numeric features are binarized at the midpoint of their training range and missing values
/// are imputed before the tree is grown with the gain ratio. Subtree raising runs afterwards
/// unless disabled. Queries go through the same fitted binarizer and imputer.
#[derive(Clone, Debug)]
pub struct J48Classifier {
    tree: Option<Tree>,
    binarizer: Option<Binarizer>,
    imputer: Option<Imputer>,
    params: J48Params,
    raw_features: Vec<Feature>,
}

impl Default for J48Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassificationMetrics for J48Classifier {}

impl J48Classifier {
    pub fn new() -> Self {
        Self {
            tree: None,
            binarizer: None,
            imputer: None,
            params: J48Params::new(),
            raw_features: Vec::new(),
        }
    }

    /// Creates a new instance of the J48 classifier with custom parameters.
    ///
    /// # Arguments
    ///
    /// * `max_depth` - The maximum depth of the tree, unbounded when `None`.
    /// * `prune` - Whether subtree raising runs after growing.
    ///
    /// # Errors
    ///
    /// This method will return an error if the maximum depth is less than 1.
    pub fn with_params(max_depth: Option<u16>, prune: bool) -> Result<Self> {
        let mut classifier = Self::new();
        classifier.params.set_max_depth(max_depth)?;
        classifier.params.set_prune(prune);
        Ok(classifier)
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<()> {
        self.params.set_max_depth(max_depth)
    }

    pub fn set_prune(&mut self, prune: bool) {
        self.params.set_prune(prune);
    }

    pub fn params(&self) -> &J48Params {
        &self.params
    }

    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn binarizer(&self) -> Option<&Binarizer> {
        self.binarizer.as_ref()
    }

    pub fn imputer(&self) -> Option<&Imputer> {
        self.imputer.as_ref()
    }

    /// Builds the decision tree from a dataset.
    ///
    /// # Errors
    ///
    /// This method will return an error if the schema has no feature besides the class or if
    /// none of the records is labeled.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<&Tree> {
        if dataset.num_features() < 2 {
            return Err(TreeError::NoFeatures);
        }

        let (labeled, dropped) = dataset.with_labeled_records();
        if dropped > 0 {
            warn!("Dropped {} records without a class.", dropped);
        }
        if labeled.is_empty() && !dataset.is_empty() {
            return Err(TreeError::NoLabeledRecords(dataset.len()));
        }

        let (binarizer, binarized) = Binarizer::fit_transform(&labeled)?;
        let (imputer, prepared) = Imputer::fit_transform(&binarized)?;

        let mut tree = build_tree(&prepared, &self.params.base_params);
        if self.params.prune() {
            tree.raise_subtrees(&prepared)?;
        }
        info!(
            "Model accuracy = {:.4} with {} nodes ({} leaves).",
            tree.accuracy(&prepared)?,
            tree.node_count(),
            tree.leaf_count()
        );

        self.raw_features = dataset.features().to_vec();
        self.binarizer = Some(binarizer);
        self.imputer = Some(imputer);
        Ok(&*self.tree.insert(tree))
    }

    /// Binarizes and imputes `dataset` the way the training data was.
    ///
    /// Missing values of labeled records are filled from their own class.
    pub fn prepare(&self, dataset: &Dataset) -> Result<Dataset> {
        let (binarizer, imputer) = self.preprocessors()?;
        if dataset.features().len() != self.raw_features.len() {
            return Err(TreeError::RecordLength(
                dataset.features().len(),
                self.raw_features.len(),
            ));
        }
        Ok(imputer.transform(&binarizer.transform(dataset)?))
    }

    fn preprocessors(&self) -> Result<(&Binarizer, &Imputer)> {
        match (&self.binarizer, &self.imputer) {
            (Some(binarizer), Some(imputer)) => Ok((binarizer, imputer)),
            _ => Err(TreeError::NotFitted),
        }
    }

    /// Predicts the class of a raw record laid out on the training schema.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet, if the record doesn't
    /// match the training schema, or if it holds a value unseen in training.
    pub fn classify(&self, record: &DVector<Value>) -> Result<Option<usize>> {
        let tree = self.tree.as_ref().ok_or(TreeError::NotFitted)?;
        let (binarizer, imputer) = self.preprocessors()?;
        let binarized = binarizer.transform_record(&self.raw_features, record)?;
        tree.classify(&imputer.transform_record(&binarized))
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

impl fmt::Display for J48Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tree {
            Some(tree) => write!(f, "J48\n\n{}", tree),
            None => write!(f, "J48: No model built yet."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{weather_nominal, weather_numeric, weather_numeric_with_gaps};

    fn single(values: &[(f64, usize)]) -> Dataset {
        let features = vec![
            Feature::numeric("x"),
            Feature::categorical("label", &["a", "b"]),
        ];
        let rows: Vec<Vec<Value>> = values
            .iter()
            .map(|&(value, class)| vec![Value::Numeric(value), Value::Category(class)])
            .collect();
        Dataset::from_rows(features, 1, rows).unwrap()
    }

    fn query(value: Value) -> DVector<Value> {
        DVector::from_vec(vec![value, Value::Missing])
    }

    #[test]
    fn test_fit_numeric_weather() {
        let mut classifier = J48Classifier::new();
        let tree = classifier.fit(&weather_numeric()).unwrap();
        let root = tree.node(tree.root()).feature().unwrap();
        assert_eq!(tree.features()[root].name(), "outlook");

        let thresholds = classifier
            .binarizer()
            .unwrap()
            .thresholds()
            .iter()
            .map(|threshold| threshold.value)
            .collect::<Vec<_>>();
        assert_eq!(thresholds, vec![74, 80]);
        assert!(classifier.to_string().starts_with("J48\n\n\noutlook = sunny"));
    }

    #[test]
    fn test_pruning_keeps_training_accuracy() {
        for dataset in [weather_nominal(), weather_numeric(), weather_numeric_with_gaps()] {
            let mut unpruned = J48Classifier::with_params(None, false).unwrap();
            unpruned.fit(&dataset).unwrap();
            let mut pruned = J48Classifier::new();
            pruned.fit(&dataset).unwrap();

            let prepared = pruned.prepare(&dataset).unwrap();
            let before = unpruned.tree().unwrap().accuracy(&prepared).unwrap();
            let after = pruned.tree().unwrap().accuracy(&prepared).unwrap();
            assert!(after >= before);
            assert!(pruned.tree().unwrap().node_count() <= unpruned.tree().unwrap().node_count());
        }
    }

    #[test]
    fn test_threshold_boundary() {
        let dataset = single(&[(10.0, 0), (20.0, 0), (30.0, 1), (40.0, 1)]);
        let mut classifier = J48Classifier::new();
        classifier.fit(&dataset).unwrap();

        assert_eq!(
            classifier.export().unwrap(),
            "x = moreThan25: b\nx = lessEqualThan25: a"
        );
        assert_eq!(
            classifier.classify(&query(Value::Numeric(26.0))).unwrap(),
            Some(1)
        );
        assert_eq!(
            classifier.classify(&query(Value::Numeric(25.0))).unwrap(),
            Some(0)
        );
    }

    #[test]
    fn test_missing_query_values_are_imputed() {
        let dataset = weather_numeric_with_gaps();
        let mut classifier = J48Classifier::new();
        classifier.fit(&dataset).unwrap();

        let record = DVector::from_vec(vec![Value::Missing; 5]);
        assert!(classifier.classify(&record).unwrap().is_some());

        let prepared = classifier.prepare(&dataset).unwrap();
        assert!(prepared.x().iter().all(|value| !value.is_missing()));
        assert!(prepared.features().iter().all(|f| !f.is_numeric()));
    }

    #[test]
    fn test_bad_records_fail_alone() {
        let dataset = weather_numeric();
        let mut classifier = J48Classifier::new();
        classifier.fit(&dataset).unwrap();

        let mut unseen = dataset.record(0);
        unseen[0] = Value::Category(7);
        let mut categorical = dataset.record(1);
        categorical[1] = Value::Category(0);
        let short = DVector::from_vec(vec![Value::Category(0)]);

        let results = vec![
            classifier.classify(&dataset.record(2)),
            classifier.classify(&unseen),
            classifier.classify(&categorical),
            classifier.classify(&short),
            classifier.classify(&dataset.record(3)),
        ];
        assert!(results[0].is_ok());
        assert!(results[4].is_ok());
        for result in &results[1..4] {
            assert!(result.as_ref().unwrap_err().is_domain_error());
        }
    }

    #[test]
    fn test_classify_dataset() {
        let dataset = weather_nominal();
        let mut classifier = J48Classifier::new();
        classifier.fit(&dataset).unwrap();

        let predictions = classifier.classify_dataset(&dataset);
        assert_eq!(predictions.len(), dataset.len());
        for (index, prediction) in predictions.into_iter().enumerate() {
            assert_eq!(prediction.unwrap(), dataset.class_value(index));
        }
    }

    #[test]
    fn test_not_fitted() {
        let classifier = J48Classifier::new();
        assert_eq!(classifier.export(), Err(TreeError::NotFitted));
        assert_eq!(
            classifier.prepare(&weather_numeric()).unwrap_err(),
            TreeError::NotFitted
        );
        assert_eq!(classifier.to_string(), "J48: No model built yet.");
    }

    #[test]
    fn test_fit_unlabeled_dataset() {
        let dataset = single(&[(1.0, 0)]);
        let unlabeled = dataset.map_values(|_, feature, value| {
            if feature == 1 {
                Value::Missing
            } else {
                value
            }
        });
        let mut classifier = J48Classifier::new();
        assert_eq!(
            classifier.fit(&unlabeled).unwrap_err(),
            TreeError::NoLabeledRecords(1)
        );
    }
}
