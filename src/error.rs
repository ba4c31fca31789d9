//! Errors
//!
//! Error type shared by datasets, preprocessing and the tree learners.
use thiserror::Error;

/// Errors raised while building datasets, training trees or classifying records.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TreeError {
    /// The schema holds nothing but the class feature.
    #[error("Dataset has no features besides the class.")]
    NoFeatures,
    /// Class index points outside of the schema.
    #[error("Class index {0} is out of range for a schema of {1} features.")]
    ClassIndexOutOfRange(usize, usize),
    /// The class feature has to be categorical.
    #[error("Class feature {0} is numeric, a categorical class is required.")]
    NumericClass(String),
    /// Matrix shape doesn't agree with the schema.
    #[error("Expected {expected} columns, got {got}.")]
    ShapeMismatch { expected: usize, got: usize },
    /// A cell holds a value its feature can't hold.
    #[error("Record {record} holds an invalid value for feature {feature}.")]
    InvalidCell { record: usize, feature: String },
    /// A categorical feature declares no values at all.
    #[error("Categorical feature {0} has an empty domain.")]
    EmptyDomain(String),
    /// Every record of a non-empty dataset is unlabeled.
    #[error("All {0} records have a missing class value.")]
    NoLabeledRecords(usize),
    /// The learner only handles categorical features.
    #[error("Feature {0} is numeric, which this learner doesn't support.")]
    UnsupportedNumeric(String),
    /// The learner doesn't accept missing feature values during training.
    #[error("Feature {feature} is missing in record {record}.")]
    MissingFeatureValue { record: usize, feature: String },
    /// The threshold table was fitted on a different schema.
    #[error("Feature {0} doesn't match the schema the thresholds were fitted on.")]
    SchemaMismatch(String),
    /// The midpoint of a numeric feature can't be stored as an integer.
    #[error("Threshold of feature {0} is not representable.")]
    InvalidThreshold(String),
    /// The query record has the wrong number of values.
    #[error("Record has {0} values but the schema has {1} features.")]
    RecordLength(usize, usize),
    /// The query record references a value the feature never had in training.
    #[error("Value {value} is outside the domain of feature {feature} ({size} values).")]
    ValueOutOfDomain {
        feature: String,
        value: usize,
        size: usize,
    },
    /// The tested feature has no value in the query record.
    #[error("Feature {0} has no value in the query record.")]
    MissingQueryValue(String),
    /// The query record holds a value of the wrong kind for the feature.
    #[error("Feature {0} holds a value of the wrong kind in the query record.")]
    UnexpectedValue(String),
    /// Model used before calling `fit`.
    #[error("Tree wasn't built yet.")]
    NotFitted,
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
}

impl TreeError {
    /// Whether the error concerns a single query record rather than the model or the schema.
    pub fn is_domain_error(&self) -> bool {
        matches!(
            self,
            TreeError::RecordLength(..)
                | TreeError::ValueOutOfDomain { .. }
                | TreeError::MissingQueryValue(_)
                | TreeError::UnexpectedValue(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TreeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_are_flagged() {
        assert!(TreeError::MissingQueryValue("outlook".into()).is_domain_error());
        assert!(TreeError::ValueOutOfDomain {
            feature: "outlook".into(),
            value: 7,
            size: 3
        }
        .is_domain_error());
        assert!(!TreeError::NoFeatures.is_domain_error());
        assert!(!TreeError::NotFitted.is_domain_error());
    }

    #[test]
    fn test_error_messages() {
        let err = TreeError::ValueOutOfDomain {
            feature: "outlook".into(),
            value: 7,
            size: 3,
        };
        assert_eq!(
            err.to_string(),
            "Value 7 is outside the domain of feature outlook (3 values)."
        );
    }
}
