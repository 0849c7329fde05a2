pub mod canvas;
pub mod compositor;
pub mod display;
#[cfg(feature = "gamepad")]
pub mod gamepad;
pub mod input;
pub mod layout;
