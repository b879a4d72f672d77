pub mod analysis;
pub mod error;
pub mod fetch;
pub mod sample;
pub mod sampler;
pub mod session;
pub mod status;
pub mod target;

pub use error::{Error, Result};
pub use sample::{SampleResult, SampleSet};
pub use sampler::{Sampler, SamplerConfig, TimeoutPolicy};
pub use session::{AnalysisRecord, Session};
