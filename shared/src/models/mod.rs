//! Domain models for the Météo-Blob dashboard

mod dashboard;
mod humidity;
mod mood;
mod reading;
mod trend;

pub use dashboard::*;
pub use humidity::*;
pub use mood::*;
pub use reading::*;
pub use trend::*;
