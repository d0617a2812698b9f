//! Hierarchy command implementation.
//!
//! The `trellis hierarchy` command prints the candidate templates for a
//! request, grouped by template kind or merged into the final search order.

use crate::cli::args::HierarchyArgs;
use crate::config::{load_query_context, TrellisConfig};
use crate::error::Result;
use crate::hierarchy::HierarchyResolver;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The hierarchy command implementation.
pub struct HierarchyCommand {
    config: TrellisConfig,
    args: HierarchyArgs,
}

impl HierarchyCommand {
    /// Create a new hierarchy command.
    pub fn new(config: TrellisConfig, args: HierarchyArgs) -> Self {
        Self { config, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &HierarchyArgs {
        &self.args
    }
}

impl Command for HierarchyCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = load_query_context(&self.args.context)?;
        let resolver = HierarchyResolver::new(self.config.site.clone());

        if self.args.merged {
            let templates = resolver.resolve_templates(&ctx);
            if self.args.json {
                let json = serde_json::to_string_pretty(&templates).map_err(anyhow::Error::from)?;
                ui.output(&format!("{}\n", json));
            } else {
                for name in &templates {
                    ui.output(&format!("{}\n", name));
                }
            }
            return Ok(CommandResult::success());
        }

        let kinds = resolver.resolve_by_kind(&ctx);
        if self.args.json {
            let json = serde_json::to_string_pretty(&kinds).map_err(anyhow::Error::from)?;
            ui.output(&format!("{}\n", json));
            return Ok(CommandResult::success());
        }

        for entry in &kinds {
            let mut block = format!("{}:\n", entry.kind);
            for name in &entry.templates {
                block.push_str(&format!("  {}\n", name));
            }
            ui.output(&block);
            if ui.output_mode().shows_details() {
                ui.message(&format!("  (checkpoint: {})", entry.checkpoint));
            }
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{MockUI, OutputMode};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn context(content: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("context.yml");
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    fn args(context: PathBuf, merged: bool, json: bool) -> HierarchyArgs {
        HierarchyArgs {
            context,
            merged,
            json,
        }
    }

    const CATEGORY: &str = "queried:\n  type: term\n  id: 7\n  slug: news\n  taxonomy: category\n";

    #[test]
    fn merged_lists_one_candidate_per_line() {
        let (_temp, path) = context(CATEGORY);
        let cmd = HierarchyCommand::new(TrellisConfig::default(), args(path, true, false));
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert_eq!(
            ui.output_text(),
            "category-news.php\ncategory-7.php\ncategory.php\narchive.php\n"
        );
    }

    #[test]
    fn grouped_output_names_each_kind() {
        let (_temp, path) = context(CATEGORY);
        let cmd = HierarchyCommand::new(TrellisConfig::default(), args(path, false, false));
        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();

        let text = ui.output_text();
        assert!(text.contains("category:\n  category-news.php\n"));
        assert!(text.contains("archive:\n  archive.php\n"));
        assert!(ui.messages().is_empty());
    }

    #[test]
    fn verbose_shows_checkpoints() {
        let (_temp, path) = context(CATEGORY);
        let cmd = HierarchyCommand::new(TrellisConfig::default(), args(path, false, false));
        let mut ui = MockUI::with_mode(OutputMode::Verbose);
        cmd.execute(&mut ui).unwrap();
        assert!(ui.has_message("category_template_hierarchy"));
    }

    #[test]
    fn json_output_parses() {
        let (_temp, path) = context(CATEGORY);
        let cmd = HierarchyCommand::new(TrellisConfig::default(), args(path, true, true));
        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();

        let parsed: Vec<String> = serde_json::from_str(&ui.output_text()).unwrap();
        assert_eq!(parsed[0], "category-news.php");
    }

    #[test]
    fn site_options_come_from_config() {
        let (_temp, path) =
            context("queried:\n  type: singular\n  id: 5\n  slug: welcome\n  post_type: page\n");
        let mut config = TrellisConfig::default();
        config.site.show_on_front = crate::hierarchy::ShowOnFront::Page;
        config.site.page_on_front = Some(5);

        let cmd = HierarchyCommand::new(config, args(path, true, false));
        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();
        assert!(ui.output_text().starts_with("front-page.php\n"));
    }

    #[test]
    fn missing_context_is_an_error() {
        let cmd = HierarchyCommand::new(
            TrellisConfig::default(),
            args(PathBuf::from("/nonexistent/context.yml"), false, false),
        );
        assert!(cmd.execute(&mut MockUI::new()).is_err());
    }
}
