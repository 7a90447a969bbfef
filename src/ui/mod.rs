pub mod components;
pub mod workspace;

pub use workspace::render_workspace;
