pub(crate) mod cold_bath;
pub use cold_bath::{ClassifierError, ColdBathClassifier, classify, flags_from_dates};

pub(crate) mod paired;
pub use paired::{PairedDay, PairedSeries};

pub(crate) mod correlation;
pub use correlation::{CorrelationError, Series, correlate};

pub(crate) mod comparison;
pub use comparison::{GroupMetric, SleepComparison};

pub mod helpers;
