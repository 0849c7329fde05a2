pub mod body;
pub mod cell;
pub mod colour;
pub mod geometry;
pub mod image;
pub mod object;
pub mod widget;
