//! Render command implementation.
//!
//! The `trellis render` command renders a request's template through the
//! output enhancement buffer and prints (or writes) the final document.

use std::fs;

use crate::cli::args::RenderArgs;
use crate::config::{load_query_context, TrellisConfig};
use crate::error::Result;
use crate::render::Renderer;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The render command implementation.
pub struct RenderCommand {
    config: TrellisConfig,
    args: RenderArgs,
}

impl RenderCommand {
    /// Create a new render command.
    pub fn new(config: TrellisConfig, args: RenderArgs) -> Self {
        Self { config, args }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RenderArgs {
        &self.args
    }
}

impl Command for RenderCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let ctx = load_query_context(&self.args.context)?;
        let rendered = Renderer::new(self.config.clone()).render(&ctx)?;

        if rendered.selection.is_none() {
            ui.warning("No theme template matched; rendered the fallback document");
        }

        if self.args.json {
            let json = serde_json::to_string_pretty(&rendered).map_err(anyhow::Error::from)?;
            ui.output(&format!("{}\n", json));
            return Ok(CommandResult::success());
        }

        match &self.args.output {
            Some(path) => {
                fs::write(path, &rendered.html)?;
                let template = rendered
                    .selection
                    .as_ref()
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| "fallback".to_string());
                ui.success(&format!("Rendered {} to {}", template, path.display()));
                if ui.output_mode().shows_details() {
                    let transforms = if rendered.transforms.is_empty() {
                        "none".to_string()
                    } else {
                        rendered.transforms.join(", ")
                    };
                    ui.message(&format!(
                        "  buffered: {}, transforms: {}",
                        rendered.buffered, transforms
                    ));
                }
            }
            None => ui.output(&rendered.html),
        }

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BufferMode, StyleConfig, ThemeConfig};
    use crate::ui::{MockUI, OutputMode};
    use std::path::PathBuf;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<html><head><!-- trellis:head --></head><body><p>Body</p><!-- trellis:footer --></body></html>";

    fn setup() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("index.php"), TEMPLATE).unwrap();
        let context = temp.path().join("context.yml");
        fs::write(&context, "queried:\n  type: search\n").unwrap();
        (temp, context)
    }

    fn config(temp: &TempDir) -> TrellisConfig {
        TrellisConfig {
            theme: ThemeConfig {
                stylesheet_dir: temp.path().to_path_buf(),
                ..Default::default()
            },
            styles: vec![StyleConfig {
                handle: "footer".into(),
                src: Some("/footer.css".into()),
                deps: Vec::new(),
                ver: None,
                inline: Vec::new(),
                late: true,
            }],
            ..Default::default()
        }
    }

    fn args(context: PathBuf) -> RenderArgs {
        RenderArgs {
            context,
            output: None,
            json: false,
        }
    }

    #[test]
    fn prints_hoisted_document() {
        let (temp, context) = setup();
        let mut ui = MockUI::new();
        let result = RenderCommand::new(config(&temp), args(context))
            .execute(&mut ui)
            .unwrap();

        assert!(result.success);
        let html = ui.output_text();
        let (head, body) = html.split_once("</head>").unwrap();
        assert!(head.contains("id='footer-css'"));
        assert!(!body.contains("footer-css"));
    }

    #[test]
    fn writes_to_output_file() {
        let (temp, context) = setup();
        let out = temp.path().join("out.html");
        let mut render_args = args(context);
        render_args.output = Some(out.clone());
        let mut ui = MockUI::with_mode(OutputMode::Verbose);

        RenderCommand::new(config(&temp), render_args)
            .execute(&mut ui)
            .unwrap();

        assert!(fs::read_to_string(&out).unwrap().contains("<p>Body</p>"));
        assert!(ui.has_success("Rendered index.php"));
        assert!(ui.has_message("buffered: true"));
        assert!(ui.outputs().is_empty());
    }

    #[test]
    fn json_report() {
        let (temp, context) = setup();
        let mut cfg = config(&temp);
        cfg.enhancement.buffer = BufferMode::Block;
        let mut render_args = args(context);
        render_args.json = true;
        let mut ui = MockUI::new();

        RenderCommand::new(cfg, render_args).execute(&mut ui).unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.output_text()).unwrap();
        assert_eq!(value["buffered"], false);
        assert_eq!(value["selection"]["name"], "index.php");
        assert!(value["html"].as_str().unwrap().contains("<p>Body</p>"));
    }

    #[test]
    fn warns_on_fallback() {
        let temp = TempDir::new().unwrap();
        let context = temp.path().join("context.yml");
        fs::write(&context, "queried:\n  type: not_found\n").unwrap();
        let mut ui = MockUI::new();

        RenderCommand::new(config(&temp), args(context))
            .execute(&mut ui)
            .unwrap();

        assert!(ui.has_warning("fallback"));
        assert!(ui.output_text().starts_with("<!DOCTYPE html>"));
    }
}
