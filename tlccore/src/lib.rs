//! Chromatogram data model and peak integration for thin-layer chromatography.
//!
//! An [`Experiment`](data::experiment::Experiment) holds the plate, each
//! [`Sample`](data::sample::Sample) one lane with its intensity profile, and each
//! [`Peak`](data::peak::Peak) one band whose surface is computed by the
//! [integration engine](algorithm::integration).

pub mod error;

// data module
pub mod data {
    pub mod geometry;
    pub mod profile;
    pub mod peak;
    pub mod sample;
    pub mod experiment;
}

// algorithm module
pub mod algorithm {
    pub mod integration;
}

pub use error::{TlcError, TlcResult};
