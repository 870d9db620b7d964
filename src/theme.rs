use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use eframe::egui::Color32;
use serde::Deserialize;

/// Presentation-only styling, loadable from a small JSON file. Every field
/// falls back to the built-in black/white/red look.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    #[serde(default = "default_background")]
    pub background: [u8; 3],
    #[serde(default = "default_text")]
    pub text: [u8; 3],
    #[serde(default = "default_overdue_text")]
    pub overdue_text: [u8; 3],
    #[serde(default = "default_divider")]
    pub divider: [u8; 3],
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: default_background(),
            text: default_text(),
            overdue_text: default_overdue_text(),
            divider: default_divider(),
            font_scale: default_font_scale(),
        }
    }
}

fn default_background() -> [u8; 3] {
    [0, 0, 0]
}

fn default_text() -> [u8; 3] {
    [255, 255, 255]
}

fn default_overdue_text() -> [u8; 3] {
    [220, 40, 40]
}

fn default_divider() -> [u8; 3] {
    [255, 255, 255]
}

fn default_font_scale() -> f32 {
    0.4
}

pub fn load_theme(path: &Path) -> Result<Theme> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("unable to read theme file {}", path.display()))?;
    parse_theme_text(&content)
}

pub fn parse_theme_text(content: &str) -> Result<Theme> {
    let theme = serde_json::from_str::<Theme>(content).map_err(|err| {
        let line = err.line();
        let column = err.column();
        anyhow::anyhow!("invalid JSON at line {line}, column {column}: {err}")
    })?;
    if !(theme.font_scale > 0.0 && theme.font_scale <= 1.0) {
        bail!(
            "font_scale must be greater than 0 and at most 1; got {}",
            theme.font_scale
        );
    }
    Ok(theme)
}

impl Theme {
    pub fn background(&self) -> Color32 {
        rgb(self.background)
    }

    pub fn text_color(&self, overdue: bool) -> Color32 {
        if overdue {
            rgb(self.overdue_text)
        } else {
            rgb(self.text)
        }
    }

    pub fn divider_color(&self) -> Color32 {
        rgb(self.divider)
    }

    /// Font size is a fixed fraction of the smaller window dimension.
    pub fn font_px(&self, width: f32, height: f32) -> f32 {
        self.font_scale * width.min(height)
    }
}

fn rgb([r, g, b]: [u8; 3]) -> Color32 {
    Color32::from_rgb(r, g, b)
}
