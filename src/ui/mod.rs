mod focus;
mod renderer;
mod state;
mod tabs;
pub mod theme;
pub mod widgets;

pub use focus::{HitZones, ZoneId};
pub use renderer::render;
pub use state::{Action, Dashboard};
pub use tabs::TabState;
pub use theme::Theme;
