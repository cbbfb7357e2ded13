//! Console rendering for the turn event stream

mod renderer;

pub use renderer::ConsoleRenderer;
