pub mod render;
pub mod terminal;

pub use render::Renderer;
pub use terminal::run;
