#[macro_use]
extern crate log;

pub mod api;
pub use api::OuraApiClient;

mod analysis;
pub use analysis::{Analysis, AnalysisOptions, BathSource, Report};

pub mod loader;
