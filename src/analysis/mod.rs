//! Beat analysis layer
//!
//! Tempo and beat detection sit behind the [`BeatEstimator`] trait so the
//! slicing and quantization stages never depend on a particular tracker.
//! stratum-dsp does the real detection; a fixed-grid estimator replays
//! known beats.

mod stratum;
mod stub;
mod traits;
pub mod waveform;

pub use stratum::StratumEstimator;
pub use stub::FixedBeatsEstimator;
pub use traits::{AnalysisSummary, BeatEstimator};
