//! Stylesheet printing and late-style hoisting.
//!
//! - [`StyleRegistry`] - Handles, dependencies, inline CSS and print order
//! - [`StyleHoister`] - Moves styles printed in the body into the head
//! - [`load_classic_theme_block_styles_on_demand`] - Classic theme setup

mod classic;
mod hoist;
mod registry;

pub use classic::{
    load_classic_theme_block_styles_on_demand, AssetLoading, BLOCK_STYLES_FEATURE,
    CLASSIC_THEME_OVERRIDE,
};
pub use hoist::{StyleHoister, HOIST_HOOK, PLACEHOLDER_ID};
pub use registry::{Style, StyleRegistry};
