mod sample;
mod window;

pub use sample::*;
pub use window::*;
