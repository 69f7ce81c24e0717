pub mod cell;
pub mod locate;
pub mod render;
