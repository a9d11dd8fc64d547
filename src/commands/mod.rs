mod detect;
mod render;
mod serve;

pub use detect::run_detect;
pub use render::run_render;
pub use serve::run_serve;
