use crate::error::{Result, TreeError};
use std::str::FromStr;

/// Score used to rank candidate features at a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Criterion {
    InformationGain,
    GainRatio,
}

impl FromStr for Criterion {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "entropy" | "information_gain" => Ok(Criterion::InformationGain),
            "gain_ratio" => Ok(Criterion::GainRatio),
            _ => Err(TreeError::ParseString(
                s.to_string(),
                "criterion".to_string(),
                "entropy, information_gain, gain_ratio".to_string(),
            )),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TreeParams {
    pub criterion: Criterion,
    /// Whether a feature may be tested again below a node that already tests it.
    pub reuse_features: bool,
    pub max_depth: Option<u16>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self::id3()
    }

    /// Information gain, each feature tested at most once per path.
    pub fn id3() -> Self {
        Self {
            criterion: Criterion::InformationGain,
            reuse_features: false,
            max_depth: None,
        }
    }

    /// Gain ratio, features may be tested again further down.
    pub fn j48() -> Self {
        Self {
            criterion: Criterion::GainRatio,
            reuse_features: true,
            max_depth: None,
        }
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<()> {
        if max_depth.is_some_and(|depth| depth < 1) {
            return Err(TreeError::InvalidParameter(
                "max_depth".to_string(),
                "a depth greater than 0".to_string(),
                format!("{:?}", max_depth),
            ));
        }
        self.max_depth = max_depth;
        Ok(())
    }

    pub fn set_criterion(&mut self, criterion: &str) -> Result<()> {
        self.criterion = criterion.parse()?;
        Ok(())
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.max_depth
    }

    pub fn criterion(&self) -> Criterion {
        self.criterion
    }
}

#[derive(Clone, Debug)]
pub struct J48Params {
    pub base_params: TreeParams,
    /// Run subtree raising after the tree is grown.
    pub prune: bool,
}

impl Default for J48Params {
    fn default() -> Self {
        Self::new()
    }
}

impl J48Params {
    pub fn new() -> Self {
        Self {
            base_params: TreeParams::j48(),
            prune: true,
        }
    }

    pub fn set_max_depth(&mut self, max_depth: Option<u16>) -> Result<()> {
        self.base_params.set_max_depth(max_depth)
    }

    pub fn set_prune(&mut self, prune: bool) {
        self.prune = prune;
    }

    pub fn max_depth(&self) -> Option<u16> {
        self.base_params.max_depth
    }

    pub fn prune(&self) -> bool {
        self.prune
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = TreeParams::default();
        assert_eq!(params.criterion(), Criterion::InformationGain);
        assert!(!params.reuse_features);
        assert_eq!(params.max_depth(), None);

        let params = J48Params::default();
        assert_eq!(params.base_params.criterion(), Criterion::GainRatio);
        assert!(params.base_params.reuse_features);
        assert!(params.prune());
    }

    #[test]
    fn test_set_max_depth() {
        let mut params = TreeParams::new();
        assert!(params.set_max_depth(Some(0)).is_err());
        assert!(params.set_max_depth(Some(3)).is_ok());
        assert_eq!(params.max_depth(), Some(3));
        assert!(params.set_max_depth(None).is_ok());
        assert_eq!(params.max_depth(), None);
    }

    #[test]
    fn test_set_criterion() {
        let mut params = TreeParams::new();
        params.set_criterion("gain_ratio").unwrap();
        assert_eq!(params.criterion(), Criterion::GainRatio);
        params.set_criterion("entropy").unwrap();
        assert_eq!(params.criterion(), Criterion::InformationGain);
        assert!(matches!(
            params.set_criterion("gini"),
            Err(TreeError::ParseString(..))
        ));
    }
}
