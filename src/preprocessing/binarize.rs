//! Midpoint binarization of numeric features.
use crate::data::dataset::{Dataset, Feature, Value};
use crate::error::{Result, TreeError};
use log::warn;
use nalgebra::DVector;
use num_traits::ToPrimitive;

/// Category of values strictly greater than the threshold.
pub const ABOVE: usize = 0;
/// Category of values lower than or equal to the threshold.
pub const AT_OR_BELOW: usize = 1;

/// Threshold learned for one numeric feature.
#[derive(Clone, Debug, PartialEq)]
pub struct Threshold {
    pub feature_index: usize,
    pub value: i64,
}

/// Thresholds of every numeric feature of the training schema, in schema order.
///
/// Fitted once on training data and reapplied as is to every later dataset or record, so
/// unseen data lands in the same categories the tree was grown on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Binarizer {
    thresholds: Vec<Threshold>,
}

impl Binarizer {
    /// Computes `floor((max - min) / 2 + min)` over the observed values of every numeric
    /// feature. A feature without observed values gets threshold `0`.
    pub fn fit(dataset: &Dataset) -> Result<Self> {
        let mut thresholds = Vec::new();
        for (feature_index, feature) in dataset.features().iter().enumerate() {
            if !feature.is_numeric() {
                continue;
            }

            let observed = (0..dataset.len())
                .filter_map(|record| match dataset.value(record, feature_index) {
                    Value::Numeric(value) => Some(value),
                    _ => None,
                })
                .collect::<Vec<_>>();

            let value = if observed.is_empty() {
                warn!(
                    "Feature {} has no observed values, using threshold 0.",
                    feature.name()
                );
                0
            } else {
                let min = observed.iter().copied().fold(f64::INFINITY, f64::min);
                let max = observed.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                ((max - min) / 2.0 + min)
                    .floor()
                    .to_i64()
                    .ok_or_else(|| TreeError::InvalidThreshold(feature.name().to_string()))?
            };

            thresholds.push(Threshold {
                feature_index,
                value,
            });
        }
        Ok(Self { thresholds })
    }

    pub fn fit_transform(dataset: &Dataset) -> Result<(Self, Dataset)> {
        let binarizer = Self::fit(dataset)?;
        let transformed = binarizer.transform(dataset)?;
        Ok((binarizer, transformed))
    }

    pub fn thresholds(&self) -> &[Threshold] {
        &self.thresholds
    }

    /// Two-valued feature replacing a numeric one.
    pub fn binarized_feature(name: &str, threshold: i64) -> Feature {
        Feature::categorical(
            name,
            &[
                format!("moreThan{}", threshold),
                format!("lessEqualThan{}", threshold),
            ],
        )
    }

    pub fn category(threshold: i64, value: f64) -> usize {
        if value > threshold as f64 {
            ABOVE
        } else {
            AT_OR_BELOW
        }
    }

    fn map_value(threshold: &Threshold, value: Value, name: &str) -> Result<Value> {
        match value {
            Value::Numeric(value) => Ok(Value::Category(Self::category(threshold.value, value))),
            Value::Missing => Ok(Value::Missing),
            Value::Category(_) => Err(TreeError::UnexpectedValue(name.to_string())),
        }
    }

    fn check_slot<'a>(&self, features: &'a [Feature], threshold: &Threshold) -> Result<&'a Feature> {
        match features.get(threshold.feature_index) {
            Some(feature) if feature.is_numeric() => Ok(feature),
            Some(feature) => Err(TreeError::SchemaMismatch(feature.name().to_string())),
            None => Err(TreeError::SchemaMismatch(format!(
                "#{}",
                threshold.feature_index
            ))),
        }
    }

    /// Schema after binarization of `features`.
    pub fn schema(&self, features: &[Feature]) -> Result<Vec<Feature>> {
        let mut schema = features.to_vec();
        for threshold in &self.thresholds {
            let feature = self.check_slot(features, threshold)?;
            schema[threshold.feature_index] =
                Self::binarized_feature(feature.name(), threshold.value);
        }
        Ok(schema)
    }

    /// Replaces every numeric feature by its binarized counterpart, feature by feature in the
    /// order the thresholds were learned. Missing values stay missing.
    pub fn transform(&self, dataset: &Dataset) -> Result<Dataset> {
        let mut transformed = dataset.clone();
        for threshold in &self.thresholds {
            let feature = self.check_slot(dataset.features(), threshold)?;
            let column = (0..dataset.len())
                .map(|record| {
                    Self::map_value(
                        threshold,
                        dataset.value(record, threshold.feature_index),
                        feature.name(),
                    )
                })
                .collect::<Result<Vec<_>>>()?;
            transformed = transformed.with_column(
                threshold.feature_index,
                Self::binarized_feature(feature.name(), threshold.value),
                &DVector::from_vec(column),
            )?;
        }
        Ok(transformed)
    }

    /// Binarizes a single record laid out on the training schema.
    pub fn transform_record(
        &self,
        features: &[Feature],
        record: &DVector<Value>,
    ) -> Result<DVector<Value>> {
        if record.len() != features.len() {
            return Err(TreeError::RecordLength(record.len(), features.len()));
        }
        let mut transformed = record.clone();
        for threshold in &self.thresholds {
            let feature = self.check_slot(features, threshold)?;
            transformed[threshold.feature_index] = Self::map_value(
                threshold,
                record[threshold.feature_index],
                feature.name(),
            )?;
        }
        Ok(transformed)
    }
}
