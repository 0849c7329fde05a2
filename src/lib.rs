//! Cellgrid: a terminal game engine.
//!
//! A fixed-timestep loop drives a game, a layered compositor writes only the
//! changed cells of each frame, and a uniform grid narrows collision checks
//! to neighbouring cells.

pub mod config;
pub mod demo;
pub mod domain;
pub mod logging;
pub mod sim;
pub mod ui;
