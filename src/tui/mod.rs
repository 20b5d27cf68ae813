pub mod app;
pub mod input;
pub mod render;
pub mod sync;
pub mod theme;

pub use app::run;
