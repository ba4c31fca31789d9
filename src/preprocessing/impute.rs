//! Class-conditioned mode imputation of categorical features.
use crate::data::dataset::{Dataset, Value};
use crate::error::{Result, TreeError};
use crate::trees::stats::majority_class;
use nalgebra::{DMatrix, DVector};

/// Most frequent value of every feature among the training records of every class.
///
/// Training records are filled from the row of their own class. Query records have no
/// known class and are filled from the row of the training majority class.
#[derive(Clone, Debug, PartialEq)]
pub struct Imputer {
    /// Rows follow the class domain, columns the schema.
    modes: DMatrix<usize>,
    default_class: usize,
    class_index: usize,
}

impl Imputer {
    /// Builds the mode table. Ties go to the lowest value index; a feature never observed
    /// within a class gets value `0`.
    ///
    /// # Errors
    ///
    /// Fails when the dataset still holds a numeric feature.
    pub fn fit(dataset: &Dataset) -> Result<Self> {
        if let Some(feature) = dataset.features().iter().find(|f| f.is_numeric()) {
            return Err(TreeError::UnsupportedNumeric(feature.name().to_string()));
        }

        let mut modes = DMatrix::<usize>::zeros(dataset.num_classes(), dataset.num_features());
        for class in 0..dataset.num_classes() {
            for feature in 0..dataset.num_features() {
                if feature == dataset.class_index() {
                    modes[(class, feature)] = class;
                    continue;
                }
                let counts = dataset.value_counts(feature, Some(class));
                let mut mode = 0;
                for (value, &count) in counts.iter().enumerate() {
                    if count > counts[mode] {
                        mode = value;
                    }
                }
                modes[(class, feature)] = mode;
            }
        }

        Ok(Self {
            modes,
            default_class: majority_class(dataset).unwrap_or(0),
            class_index: dataset.class_index(),
        })
    }

    pub fn fit_transform(dataset: &Dataset) -> Result<(Self, Dataset)> {
        let imputer = Self::fit(dataset)?;
        let transformed = imputer.transform(dataset);
        Ok((imputer, transformed))
    }

    pub fn most_frequent(&self, class: usize, feature: usize) -> usize {
        self.modes[(class, feature)]
    }

    /// Class whose row fills query records.
    pub fn default_class(&self) -> usize {
        self.default_class
    }

    fn fill(&self, class: usize, feature: usize, value: Value) -> Value {
        if value.is_missing() && feature != self.class_index && class < self.modes.nrows() {
            Value::Category(self.modes[(class, feature)])
        } else {
            value
        }
    }

    /// Fills every missing feature value with the mode for the record's own class.
    /// Unlabeled records use the default class.
    pub fn transform(&self, dataset: &Dataset) -> Dataset {
        dataset.map_values(|record, feature, value| {
            let class = dataset.class_value(record).unwrap_or(self.default_class);
            self.fill(class, feature, value)
        })
    }

    /// Fills the missing feature values of a query record from the default class row.
    pub fn transform_record(&self, record: &DVector<Value>) -> DVector<Value> {
        DVector::from_iterator(
            record.len(),
            record
                .iter()
                .enumerate()
                .map(|(feature, &value)| self.fill(self.default_class, feature, value)),
        )
    }
}
