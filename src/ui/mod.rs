//! Terminal output.
//!
//! - **renderer**: buffered grid display with a dirty-position queue
//! - **terminal**: display mode setup and teardown

pub mod renderer;
pub mod terminal;

pub use renderer::{BorderStyle, RenderOptions, Renderer, RendererError};
pub use terminal::TerminalGuard;
