//! Shared pipeline for the Météo-Blob dashboard
//!
//! Turns raw sensor API payloads into canonical readings, chart series and
//! the character's mood. Used by the polling backend and, through WASM, by
//! the browser.

pub mod error;
pub mod models;
pub mod normalize;
pub mod resolve;
pub mod types;
pub mod views;
pub mod window;

pub use error::*;
pub use models::*;
pub use normalize::*;
pub use resolve::*;
pub use types::*;
pub use views::*;
pub use window::*;
