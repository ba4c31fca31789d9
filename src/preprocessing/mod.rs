pub mod binarize;
pub mod impute;
