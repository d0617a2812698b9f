//! Locate command implementation.
//!
//! The `trellis locate` command resolves a request and prints the path of
//! the first candidate template that exists in the theme.

use crate::cli::args::LocateArgs;
use crate::config::{load_query_context, TrellisConfig};
use crate::error::Result;
use crate::hierarchy::{HierarchyResolver, ThemeLocator};
use crate::ui::theme::{should_use_colors, TrellisTheme};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The locate command implementation.
pub struct LocateCommand {
    config: TrellisConfig,
    args: LocateArgs,
}

impl LocateCommand {
    /// Create a new locate command.
    pub fn new(config: TrellisConfig, args: LocateArgs) -> Self {
        Self { config, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &LocateArgs {
        &self.args
    }

    fn locator(&self) -> ThemeLocator {
        let mut locator = ThemeLocator::from_theme(&self.config.theme);
        if let Some(theme) = &self.args.theme {
            locator.switch_theme(theme.clone(), self.args.parent_theme.clone());
        }
        locator
    }
}

impl Command for LocateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = load_query_context(&self.args.context)?;
        let resolver = HierarchyResolver::new(self.config.site.clone());
        let locator = self.locator();

        let selection = resolver.select_template(&ctx, &locator);

        if self.args.json {
            let json = serde_json::to_string_pretty(&selection).map_err(anyhow::Error::from)?;
            ui.output(&format!("{}\n", json));
        }

        if ui.output_mode().shows_details() {
            let theme = if should_use_colors() {
                TrellisTheme::new()
            } else {
                TrellisTheme::plain()
            };
            let found = selection.as_ref().map(|s| s.name.as_str());
            for name in resolver.resolve_templates(&ctx) {
                ui.message(&theme.format_candidate(&name, Some(name.as_str()) == found));
            }
        }

        match selection {
            Some(selection) => {
                if !self.args.json {
                    ui.output(&format!("{}\n", selection.path.display()));
                }
                Ok(CommandResult::success())
            }
            None => {
                let dirs: Vec<String> = locator
                    .search_path()
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect();
                ui.warning(&format!("No template found in {}", dirs.join(", ")));
                Ok(CommandResult::failure(1))
            }
        }
    }
}
