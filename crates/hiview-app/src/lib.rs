//! Event-driven owner of the hierarchy view: caches derived positions,
//! pleiotropy and styling for the loaded network.

pub mod controller;
pub mod settings;
pub mod state;

pub use controller::{ViewController, ViewError, ViewUpdate};
pub use settings::ViewerSettings;
pub use state::{FocusUpdate, ViewState};

/// Installs the fmt subscriber. Later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_target(false).try_init();
}
