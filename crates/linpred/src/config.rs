//! Predictor configuration.
//!
//! [`PredictorConfig`] fixes the numeric precision and prediction method of a
//! predictor for its whole lifetime, plus resource knobs for the kernel. It
//! uses the `bon` crate for the builder and validates at build time, so an
//! invalid method or precision is a construction error and never surfaces
//! from `compute`.
//!
//! # Example
//!
//! ```
//! use linpred::config::{Precision, PredictionMethod, PredictorConfig};
//!
//! // All defaults: double precision, default dense method, auto threads
//! let config = PredictorConfig::builder().build().unwrap();
//! assert_eq!(config.precision, Precision::Double);
//!
//! let config = PredictorConfig::builder()
//!     .precision(Precision::Single)
//!     .method(PredictionMethod::DefaultDense)
//!     .n_threads(1)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.n_threads, 1);
//! ```

use std::fmt;
use std::str::FromStr;

use bon::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{PredictError, Result};
use crate::inference::DEFAULT_ROW_BLOCK;

// =============================================================================
// Precision
// =============================================================================

/// Numeric width used for storage and accumulation throughout a predictor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    /// 32-bit floats, accumulated in `f32`.
    Single,
    /// 64-bit floats, accumulated in `f64`.
    #[default]
    Double,
}

impl Precision {
    /// Map an external integer code (`0` = double, `1` = single).
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(Precision::Double),
            1 => Ok(Precision::Single),
            other => Err(PredictError::UnsupportedPrecision(format!("code {other}"))),
        }
    }

    /// Integer code accepted by [`from_code`](Self::from_code).
    pub fn code(self) -> i32 {
        match self {
            Precision::Double => 0,
            Precision::Single => 1,
        }
    }

    /// Size in bytes of one element.
    pub fn size_of(self) -> usize {
        match self {
            Precision::Single => std::mem::size_of::<f32>(),
            Precision::Double => std::mem::size_of::<f64>(),
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Single => f.write_str("single"),
            Precision::Double => f.write_str("double"),
        }
    }
}

impl FromStr for Precision {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "float" | "f32" => Ok(Precision::Single),
            "double" | "f64" => Ok(Precision::Double),
            _ => Err(PredictError::UnsupportedPrecision(s.to_string())),
        }
    }
}

// =============================================================================
// PredictionMethod
// =============================================================================

/// Algorithmic variant of the prediction kernel.
///
/// Only the dense default exists. The enum is non-exhaustive so further
/// variants can be added without breaking callers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum PredictionMethod {
    /// Dense blocked matrix multiply plus intercept broadcast.
    #[default]
    DefaultDense,
}

impl PredictionMethod {
    /// Map an external integer code (`0` = default dense).
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0 => Ok(PredictionMethod::DefaultDense),
            other => Err(PredictError::UnsupportedMethod(format!("code {other}"))),
        }
    }

    /// Integer code accepted by [`from_code`](Self::from_code).
    pub fn code(self) -> i32 {
        match self {
            PredictionMethod::DefaultDense => 0,
        }
    }
}

impl fmt::Display for PredictionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionMethod::DefaultDense => f.write_str("default_dense"),
        }
    }
}

impl FromStr for PredictionMethod {
    type Err = PredictError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default_dense" | "defaultDense" | "default" | "dense" => {
                Ok(PredictionMethod::DefaultDense)
            }
            _ => Err(PredictError::UnsupportedMethod(s.to_string())),
        }
    }
}

// =============================================================================
// PredictorConfig
// =============================================================================

/// Configuration of a [`BatchPredictor`](crate::predictor::BatchPredictor).
///
/// Precision and method cannot change after construction; a new predictor is
/// needed for a different combination.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(
    derive(Clone, Debug),
    finish_fn(vis = "", name = __build_internal)
)]
pub struct PredictorConfig {
    /// Numeric precision. Default: `Double`.
    #[builder(default)]
    pub precision: Precision,

    /// Prediction method. Default: `DefaultDense`.
    #[builder(default)]
    pub method: PredictionMethod,

    /// Thread count: 0 = auto (current rayon pool), 1 = sequential, n = exactly n.
    #[builder(default = 0)]
    pub n_threads: usize,

    /// Rows per kernel block. Blocks are the unit of parallel work. Default: 256.
    #[builder(default = DEFAULT_ROW_BLOCK)]
    pub row_block_size: usize,
}

impl<S: predictor_config_builder::IsComplete> PredictorConfigBuilder<S> {
    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PredictError::Configuration`] if `row_block_size == 0`.
    pub fn build(self) -> Result<PredictorConfig> {
        let config = self.__build_internal();
        config.validate()?;
        Ok(config)
    }
}

impl PredictorConfig {
    /// Configuration with the given precision and method and default resources.
    pub fn new(precision: Precision, method: PredictionMethod) -> Self {
        Self {
            precision,
            method,
            n_threads: 0,
            row_block_size: DEFAULT_ROW_BLOCK,
        }
    }

    /// Check invariants that the type system does not enforce.
    pub fn validate(&self) -> Result<()> {
        if self.row_block_size == 0 {
            return Err(PredictError::Configuration(
                "row_block_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self::new(Precision::default(), PredictionMethod::default())
    }
}
