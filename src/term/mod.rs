//! Terminal backend: perspective projection onto Braille canvases.

mod camera;
mod geometry;
mod renderer;

pub use camera::{PerspectiveCamera, ScreenPoint};
pub use renderer::{parse_color, TerminalBackend, TerminalFrame};
