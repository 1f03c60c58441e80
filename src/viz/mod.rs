//! Image grid rendering for visual inspection of training progress.

mod board;
mod grid;

pub use board::{render_board, ImageBoard};
pub use grid::{make_grid, ImageGrid};
