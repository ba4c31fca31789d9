//! Split statistics over the class distribution of a dataset.
use crate::data::dataset::Dataset;

/// Shannon entropy, in bits, of a distribution given as counts.
///
/// Zero counts contribute nothing, so an empty or pure distribution has entropy `0.0`.
pub fn entropy_from_counts(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    counts
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / n;
            -p * p.log2()
        })
        .sum()
}

/// Entropy of the class distribution of `dataset`.
pub fn entropy(dataset: &Dataset) -> f64 {
    let counts = dataset.class_counts();
    entropy_from_counts(&counts, counts.iter().sum())
}

/// Reduction of class entropy obtained by grouping records on `feature`.
///
/// Each group is weighted by its share of all records of `dataset`. Records missing the
/// feature belong to no group and lower the weight of the groups.
pub fn information_gain(dataset: &Dataset, feature: usize) -> f64 {
    let total = dataset.len();
    if total == 0 {
        return 0.0;
    }
    let table = dataset.contingency(feature);
    let remainder: f64 = table
        .row_iter()
        .map(|row| {
            let counts = row.iter().copied().collect::<Vec<_>>();
            let n = counts.iter().sum::<usize>();
            n as f64 / total as f64 * entropy_from_counts(&counts, n)
        })
        .sum();
    entropy(dataset) - remainder
}

/// Denominator of the gain ratio: entropy of the class distribution, not of the feature's
/// value distribution.
pub fn split_info(dataset: &Dataset) -> f64 {
    entropy(dataset).abs()
}

/// Information gain divided by split info. Falls back to the plain information gain when
/// split info is zero.
pub fn gain_ratio(dataset: &Dataset, feature: usize) -> f64 {
    let gain = information_gain(dataset, feature);
    let split_info = split_info(dataset);
    if split_info == 0.0 {
        gain
    } else {
        gain / split_info
    }
}

/// Most frequent class; ties go to the lowest class index. `None` when no record is labeled.
pub fn majority_class(dataset: &Dataset) -> Option<usize> {
    let counts = dataset.class_counts();
    let mut best: Option<usize> = None;
    for (class, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        match best {
            Some(current) if counts[current] >= count => {}
            _ => best = Some(class),
        }
    }
    best
}
