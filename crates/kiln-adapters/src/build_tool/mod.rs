//! Build tool adapters.

mod cmake;
mod recording;
pub mod toolchain;

pub use cmake::{CMakeTool, Invocation, build_args, configure_args, install_args};
pub use recording::{RecordedCall, RecordingBuildTool};
