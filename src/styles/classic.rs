//! On-demand block style loading for classic themes.

use serde::Serialize;

use crate::config::ThemeConfig;
use crate::enhancement::{BufferOverride, Enhancer};

use super::hoist::StyleHoister;

/// Name of the buffering override added for classic themes.
pub const CLASSIC_THEME_OVERRIDE: &str = "classic-theme-block-styles";

/// Theme feature that opts a classic theme into core block styles.
pub const BLOCK_STYLES_FEATURE: &str = "wp-block-styles";

/// How block assets are loaded for the current request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssetLoading {
    /// Core block styles are split per block.
    pub separate_core_block_assets: bool,
    /// Block styles are printed only for blocks that render.
    pub block_assets_on_demand: bool,
}

/// Set up on-demand block style loading for a classic theme.
///
/// Block themes are left alone. For classic themes the template is always
/// buffered (unless something blocks buffering), block assets load on
/// demand when the theme declares [`BLOCK_STYLES_FEATURE`], and the late
/// style hoister is installed so styles printed in the body end up in the
/// head.
pub fn load_classic_theme_block_styles_on_demand(
    theme: &ThemeConfig,
    enhancer: &Enhancer,
    hoister: &StyleHoister,
) -> AssetLoading {
    if theme.block_theme {
        tracing::debug!("Block theme; leaving block style loading alone");
        return AssetLoading::default();
    }

    enhancer.set_override(CLASSIC_THEME_OVERRIDE, BufferOverride::Force);
    if !enhancer.should_buffer() {
        tracing::debug!("Template buffering is blocked; late styles stay in place");
        return AssetLoading::default();
    }

    let on_demand = theme.supports(BLOCK_STYLES_FEATURE);
    hoister.install(enhancer);
    AssetLoading {
        separate_core_block_assets: on_demand,
        block_assets_on_demand: on_demand,
    }
}
