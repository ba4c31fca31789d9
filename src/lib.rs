//! # Rusty-trees
//!
//! `rusty-trees` grows decision trees over categorical and numeric data using Rust.
//! It provides an ID3 learner, a J48 (C4.5-style) learner with midpoint binarization,
//! class-conditioned imputation and subtree raising, plus the entropy statistics they are
//! built on.
//!
//! ## Getting Started
//!
//! To use `rusty-trees`, add the following to your `Cargo.toml` file:
//!
//! ```toml
//! [dependencies]
//! rusty-trees = "*"
//! ```
//!
//! ## Example Usage
//!
//! As a quick example, here's how you can use `rusty-trees` to train an ID3 classifier on a
//! small dataset:
//!
//! ```rust
//!
//! use rusty_trees::data::dataset::*;
//! use rusty_trees::trees::id3::*;
//!
//! let features = vec![
//!     Feature::categorical("outlook", &["sunny", "overcast", "rainy"]),
//!     Feature::categorical("play", &["yes", "no"]),
//! ];
//! let rows = vec![
//!     vec![Value::Category(0), Value::Category(1)],
//!     vec![Value::Category(1), Value::Category(0)],
//!     vec![Value::Category(2), Value::Category(0)],
//! ];
//!
//! let dataset = Dataset::from_rows(features, 1, rows).unwrap();
//!
//! let mut model = Id3Classifier::new();
//!
//! model.fit(&dataset).unwrap();
//!
//! let class = model.classify(&dataset.record(0)).unwrap();
//!
//! assert_eq!(class.and_then(|class| model.class_label(class)), Some("no"));
//! ```

/// Dataset and data manipulation utilities
pub mod data;
/// Error type shared by every module
pub mod error;
/// Functions for evaluating model performance
pub mod metrics;
/// Binarization and imputation of raw data
pub mod preprocessing;
/// Decision trees
pub mod trees;
