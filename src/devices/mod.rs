//! The hardware the daemon sits between: screen, touchscreen, uinput.

pub mod framebuffer;
pub mod input;
pub mod uinput;

pub use framebuffer::Framebuffer;
pub use input::TouchDevice;
pub use uinput::VirtualKeyboard;
