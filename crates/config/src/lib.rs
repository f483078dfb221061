// Configuration loading

pub mod relay;
pub mod settings;

pub use relay::{KeyLookup, KeySource, RelayConfig};
pub use settings::Settings;
