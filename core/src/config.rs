//! Stemmer parameters.

use crate::error::{Result, SnsError};
use serde::{Deserialize, Serialize};

/// Minimum common prefix for a pair to be considered at all.
pub const DEFAULT_L1: usize = 3;

/// A pair whose common prefix is longer than this confirms its suffix pair.
pub const DEFAULT_L2: usize = 5;

/// Confirmations a suffix pair needs before its pairs become edges.
pub const MIN_CONFIRMATIONS: u32 = 2;

/// Weight applied to the shared-neighbour bonus during reweighting.
pub const NEIGHBOUR_BONUS_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnsParams {
    pub l1: usize,
    pub l2: usize,
}

impl Default for SnsParams {
    fn default() -> Self {
        Self { l1: DEFAULT_L1, l2: DEFAULT_L2 }
    }
}

impl SnsParams {
    pub fn new(l1: usize, l2: usize) -> Result<Self> {
        let params = Self { l1, l2 };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.l1 == 0 {
            return Err(SnsError::InvalidParams("l1 must be a positive prefix length".into()));
        }
        if self.l1 >= self.l2 {
            return Err(SnsError::InvalidParams(format!(
                "l1 ({}) must be smaller than l2 ({})",
                self.l1, self.l2
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(SnsParams::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let err = SnsParams::new(5, 5).unwrap_err();
        assert!(matches!(err, SnsError::InvalidParams(_)));
        assert!(err.to_string().contains("l1 (5) must be smaller than l2 (5)"));
        assert!(SnsParams::new(0, 2).is_err());
    }
}
