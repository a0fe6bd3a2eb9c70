//! Background services for the Météo-Blob dashboard

pub mod export;
pub mod poller;

pub use export::ExportService;
pub use poller::{Poller, PollerHandle, PollerSettings};
