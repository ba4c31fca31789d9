use nalgebra::{DMatrix, DVector};

use crate::error::{Result, TreeError};

type ConfusionMatrix = DMatrix<usize>;

pub trait ClassificationMetrics {
    /// Computes the confusion matrix based on the true labels and predicted labels.
    ///
    /// Rows follow the true class, columns the predicted class. The extra last column counts
    /// records that got the unknown prediction (`None`).
    ///
    /// # Arguments
    ///
    /// * `y_true` - The true labels.
    /// * `y_pred` - The predicted labels.
    /// * `num_classes` - Size of the class domain.
    ///
    /// # Errors
    ///
    /// Fails when the two vectors differ in length or hold a class outside the domain.
    fn confusion_matrix(
        &self,
        y_true: &DVector<usize>,
        y_pred: &DVector<Option<usize>>,
        num_classes: usize,
    ) -> Result<ConfusionMatrix> {
        if y_true.len() != y_pred.len() {
            return Err(TreeError::ShapeMismatch {
                expected: y_true.len(),
                got: y_pred.len(),
            });
        }

        let mut matrix = DMatrix::<usize>::zeros(num_classes, num_classes + 1);

        for (&y_t, y_p) in y_true.iter().zip(y_pred.iter()) {
            if let Some(value) = [Some(y_t), *y_p]
                .into_iter()
                .flatten()
                .find(|&class| class >= num_classes)
            {
                return Err(TreeError::ValueOutOfDomain {
                    feature: "class".to_string(),
                    value,
                    size: num_classes,
                });
            }
            let matrix_col = y_p.unwrap_or(num_classes);
            matrix[(y_t, matrix_col)] += 1;
        }

        Ok(matrix)
    }

    /// Fraction of records whose prediction equals their true class.
    ///
    /// Unknown predictions count as wrong. An empty set of records has accuracy `0.0`.
    fn accuracy(
        &self,
        y_true: &DVector<usize>,
        y_pred: &DVector<Option<usize>>,
        num_classes: usize,
    ) -> Result<f64> {
        let matrix = self.confusion_matrix(y_true, y_pred, num_classes)?;
        if y_true.is_empty() {
            return Ok(0.0);
        }

        let correct: usize = (0..num_classes).map(|class| matrix[(class, class)]).sum();

        Ok(correct as f64 / y_true.len() as f64)
    }
}
