//! Test helper utilities
//!
//! - `builders`: builders for test instances of models

pub mod builders {
	pub mod config;
	pub mod wave;

	pub use config::PortalConfigBuilder;
	pub use wave::WaveBuilder;
}

pub use builders::*;
