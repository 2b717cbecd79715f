//! Board client: advisory position, grid rendering and drag-to-move.

pub mod display;
pub mod renderer;

pub use renderer::{BoardRenderer, Cell, Grid, Notice};
