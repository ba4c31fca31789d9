/// ID3 classifier
pub mod id3;
pub(crate) mod induction;
/// J48 classifier
pub mod j48;
pub mod node;
pub mod params;
mod prune;
/// Entropy and split scores
pub mod stats;
