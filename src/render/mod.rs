pub mod renderer;

pub use renderer::{CELL_COLUMNS, Renderer, play_label, reset_label};
