pub mod dataset;

#[cfg(test)]
pub(crate) mod fixtures;
