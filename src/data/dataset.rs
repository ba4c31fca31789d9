use crate::error::{Result, TreeError};
use nalgebra::{DMatrix, DVector};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, SeedableRng};
use std::fmt::{self, Debug, Formatter};

/// A single cell of a record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// No value was observed.
    Missing,
    /// Index into the domain of a categorical feature.
    Category(usize),
    /// Raw value of a numeric feature.
    Numeric(f64),
}

impl Value {
    pub fn category(&self) -> Option<usize> {
        match self {
            Value::Category(index) => Some(*index),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FeatureKind {
    /// Ordered, fixed set of labels. Values refer to them by index.
    Categorical(Vec<String>),
    Numeric,
}

/// A named column of the dataset schema.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    name: String,
    kind: FeatureKind,
}

impl Feature {
    pub fn categorical<S: AsRef<str>>(name: &str, values: &[S]) -> Self {
        Self {
            name: name.to_string(),
            kind: FeatureKind::Categorical(
                values.iter().map(|value| value.as_ref().to_string()).collect(),
            ),
        }
    }

    pub fn numeric(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FeatureKind::Numeric,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FeatureKind {
        &self.kind
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, FeatureKind::Numeric)
    }

    /// Labels of a categorical feature, `None` for numeric ones.
    pub fn values(&self) -> Option<&[String]> {
        match &self.kind {
            FeatureKind::Categorical(values) => Some(values),
            FeatureKind::Numeric => None,
        }
    }

    /// Number of labels; numeric features have an empty domain.
    pub fn domain_size(&self) -> usize {
        self.values().map_or(0, |values| values.len())
    }

    pub fn value_name(&self, index: usize) -> Option<&str> {
        self.values()
            .and_then(|values| values.get(index))
            .map(String::as_str)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.values()
            .and_then(|values| values.iter().position(|value| value == label))
    }

    fn accepts(&self, value: &Value) -> bool {
        match (value, &self.kind) {
            (Value::Missing, _) => true,
            (Value::Category(index), FeatureKind::Categorical(values)) => *index < values.len(),
            (Value::Numeric(_), FeatureKind::Numeric) => true,
            _ => false,
        }
    }
}

/// Labeled records over a fixed schema. One of the features is the class.
///
/// Rows of `x` are records, columns follow `features`. Transformations return a new
/// dataset and leave the original untouched.
#[derive(Clone, PartialEq)]
pub struct Dataset {
    features: Vec<Feature>,
    class_index: usize,
    x: DMatrix<Value>,
}

impl Debug for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    features: [")?;
        for feature in &self.features {
            write!(f, "{}, ", feature.name())?;
        }
        writeln!(f, "],\n    class: {},", self.class_index)?;
        writeln!(f, "    x: [")?;
        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }
        write!(f, "    ]\n}}")
    }
}

impl Dataset {
    /// Creates a dataset after checking every cell against its feature.
    ///
    /// # Errors
    ///
    /// Fails when the class index is out of range, the class is numeric, a categorical
    /// feature has no values, the number of columns differs from the number of features,
    /// or a cell doesn't fit its feature.
    pub fn new(features: Vec<Feature>, class_index: usize, x: DMatrix<Value>) -> Result<Self> {
        if class_index >= features.len() {
            return Err(TreeError::ClassIndexOutOfRange(class_index, features.len()));
        }
        if features[class_index].is_numeric() {
            return Err(TreeError::NumericClass(
                features[class_index].name().to_string(),
            ));
        }
        if let Some(feature) = features
            .iter()
            .find(|f| !f.is_numeric() && f.domain_size() == 0)
        {
            return Err(TreeError::EmptyDomain(feature.name().to_string()));
        }
        if x.ncols() != features.len() {
            return Err(TreeError::ShapeMismatch {
                expected: features.len(),
                got: x.ncols(),
            });
        }
        for (record, row) in x.row_iter().enumerate() {
            for (feature, value) in features.iter().zip(row.iter()) {
                if !feature.accepts(value) {
                    return Err(TreeError::InvalidCell {
                        record,
                        feature: feature.name().to_string(),
                    });
                }
            }
        }
        Ok(Self {
            features,
            class_index,
            x,
        })
    }

    pub fn from_rows(
        features: Vec<Feature>,
        class_index: usize,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self> {
        let ncols = features.len();
        if let Some(row) = rows.iter().find(|row| row.len() != ncols) {
            return Err(TreeError::ShapeMismatch {
                expected: ncols,
                got: row.len(),
            });
        }
        let x = DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]);
        Self::new(features, class_index, x)
    }

    /// Keeps the schema of `self` but takes records from `x`. Cells are assumed valid.
    fn with_values(&self, x: DMatrix<Value>) -> Self {
        Self {
            features: self.features.clone(),
            class_index: self.class_index,
            x,
        }
    }

    fn select(&self, indices: &[usize]) -> Self {
        let x = DMatrix::from_fn(indices.len(), self.x.ncols(), |i, j| {
            self.x[(indices[i], j)]
        });
        self.with_values(x)
    }

    pub fn len(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.x.nrows() == 0
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature(&self, index: usize) -> &Feature {
        &self.features[index]
    }

    /// Number of schema slots, class included.
    pub fn num_features(&self) -> usize {
        self.features.len()
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn class_feature(&self) -> &Feature {
        &self.features[self.class_index]
    }

    pub fn num_classes(&self) -> usize {
        self.class_feature().domain_size()
    }

    pub fn x(&self) -> &DMatrix<Value> {
        &self.x
    }

    pub fn value(&self, record: usize, feature: usize) -> Value {
        self.x[(record, feature)]
    }

    /// Class of a record, `None` when it's missing.
    pub fn class_value(&self, record: usize) -> Option<usize> {
        self.x[(record, self.class_index)].category()
    }

    pub fn record(&self, index: usize) -> DVector<Value> {
        DVector::from_iterator(self.x.ncols(), self.x.row(index).iter().copied())
    }

    pub fn records(&self) -> impl Iterator<Item = DVector<Value>> + '_ {
        (0..self.len()).map(|index| self.record(index))
    }

    /// Contiguous records `start..end`.
    pub fn range(&self, start: usize, end: usize) -> Result<Self> {
        if start > end || end > self.len() {
            return Err(TreeError::InvalidParameter(
                "range".into(),
                format!("start <= end <= {}", self.len()),
                format!("{}..{}", start, end),
            ));
        }
        let indices = (start..end).collect::<Vec<_>>();
        Ok(self.select(&indices))
    }

    pub fn train_test_split(&self, train_size: f64, seed: Option<u64>) -> Result<(Self, Self)> {
        if !(0.0..=1.0).contains(&train_size) {
            return Err(TreeError::InvalidParameter(
                "train_size".into(),
                "a value between 0.0 and 1.0".into(),
                train_size.to_string(),
            ));
        }
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut indices = (0..self.len()).collect::<Vec<_>>();
        indices.shuffle(&mut rng);
        let train_size = (self.len() as f64 * train_size).floor() as usize;

        Ok((
            self.select(&indices[..train_size]),
            self.select(&indices[train_size..]),
        ))
    }

    /// Drops records with a missing class. Returns the remaining records and the number dropped.
    pub fn with_labeled_records(&self) -> (Self, usize) {
        let labeled = (0..self.len())
            .filter(|&index| self.class_value(index).is_some())
            .collect::<Vec<_>>();
        let dropped = self.len() - labeled.len();
        (self.select(&labeled), dropped)
    }

    /// Records grouped by their value of a categorical feature, one dataset per domain value.
    /// Records missing the value belong to no group.
    pub fn partition(&self, feature: usize) -> Vec<Self> {
        let mut groups = vec![Vec::new(); self.features[feature].domain_size()];
        for record in 0..self.len() {
            if let Some(value) = self.value(record, feature).category() {
                groups[value].push(record);
            }
        }
        groups.iter().map(|indices| self.select(indices)).collect()
    }

    /// Number of records per class.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.num_classes()];
        for record in 0..self.len() {
            if let Some(class) = self.class_value(record) {
                counts[class] += 1;
            }
        }
        counts
    }

    /// Counts of (feature value, class) pairs. Rows follow the feature's domain, columns the
    /// class domain. Records missing either value are skipped.
    pub fn contingency(&self, feature: usize) -> DMatrix<usize> {
        let mut table = DMatrix::<usize>::zeros(self.features[feature].domain_size(), self.num_classes());
        for record in 0..self.len() {
            if let (Some(value), Some(class)) = (
                self.value(record, feature).category(),
                self.class_value(record),
            ) {
                table[(value, class)] += 1;
            }
        }
        table
    }

    /// Number of records holding each value of `feature`, optionally only among records of
    /// one class.
    pub fn value_counts(&self, feature: usize, class: Option<usize>) -> Vec<usize> {
        let mut counts = vec![0; self.features[feature].domain_size()];
        for record in 0..self.len() {
            if class.is_some() && self.class_value(record) != class {
                continue;
            }
            if let Some(value) = self.value(record, feature).category() {
                counts[value] += 1;
            }
        }
        counts
    }

    /// New dataset where the slot `index` holds `feature` with the values of `column`.
    pub fn with_column(
        &self,
        index: usize,
        feature: Feature,
        column: &DVector<Value>,
    ) -> Result<Self> {
        if column.len() != self.len() {
            return Err(TreeError::ShapeMismatch {
                expected: self.len(),
                got: column.len(),
            });
        }
        let mut features = self.features.clone();
        features[index] = feature;
        let mut x = self.x.clone();
        for (record, value) in column.iter().enumerate() {
            x[(record, index)] = *value;
        }
        Self::new(features, self.class_index, x)
    }

    /// Same schema, every cell passed through `f(record, feature, value)`.
    pub(crate) fn map_values<F>(&self, f: F) -> Self
    where
        F: Fn(usize, usize, Value) -> Value,
    {
        let x = DMatrix::from_fn(self.len(), self.x.ncols(), |i, j| f(i, j, self.x[(i, j)]));
        self.with_values(x)
    }
}
