// Library surface for the typing and game cores, shared by the binary and
// the integration tests. Nothing here touches the terminal.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod content;
pub mod error;
pub mod feedback;
pub mod game;
pub mod history;
pub mod input;
pub mod matcher;
pub mod metrics;
pub mod progression;
pub mod runtime;
pub mod session;
pub mod util;

pub use error::{KetikError, Result};
