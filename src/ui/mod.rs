//! Terminal output: icons, spinners and text renderings.

pub mod icons;
pub mod render;
pub mod spinner;

pub use spinner::{spinner, with_spinner};
