//! Template renderers.

mod simple;

pub use simple::{SimpleRenderer, render_str};
