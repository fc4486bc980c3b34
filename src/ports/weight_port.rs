//! Weight mapping source port trait.

use crate::domain::error::MtftraderError;
use crate::domain::weights::WeightMapping;

pub trait WeightPort {
    /// An absent source yields an empty mapping; only a source that exists
    /// but cannot be read or parsed is an error.
    fn load_weights(&self) -> Result<WeightMapping, MtftraderError>;
}
