//! Election data model and the deterministic result pipeline.
//!
//! Raw chain records ([`Registration`], [`Bucket`]) flow through a
//! single-shot [`ResultCalculator`] into an immutable [`ElectionResult`]
//! whose serialized form is byte-stable.

pub mod bucket;
pub mod calculator;
pub mod candidate;
pub mod registration;
pub mod result;
pub mod vote;

pub use bucket::Bucket;
pub use calculator::BucketFilterFn;
pub use calculator::CandidateFilterFn;
pub use calculator::ResultCalculator;
pub use calculator::ScoreFn;
pub use candidate::Candidate;
pub use registration::Registration;
pub use result::ElectionResult;
pub use vote::Vote;
