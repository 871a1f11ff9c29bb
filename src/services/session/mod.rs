//! Session orchestration behind the presentation intents.

mod error;
mod portal;

pub use error::SessionError;
pub use portal::{PortalView, WavePortalSession};
