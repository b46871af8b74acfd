//! Process-wide logging setup shared by the binaries.

pub mod logging;

pub use logging::LogFormat;

/// Install the global subscriber, reading `RUST_LOG` and `LOG_FORMAT`.
///
/// Calling it more than once is harmless; later calls are ignored.
pub fn init() {
    logging::init(LogFormat::from_env());
}
