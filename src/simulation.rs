//! The results panel embeds one of two external viewers, picked at startup.

use crate::config::Config;
use crate::traits::SimulationViewer;
use clap::ValueEnum;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewerKind {
    /// iframe pointed at a running simulation web server
    Iframe,
    /// Unity WebGL build loaded from static assets
    Unity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerDescriptor {
    pub kind: ViewerKind,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<UnityAssets>,
    /// Text the page fills in while the build downloads
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress_template: Option<&'static str>,
}

/// The four files a Unity WebGL build is loaded from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnityAssets {
    pub loader_url: String,
    pub data_url: String,
    pub framework_url: String,
    pub code_url: String,
}

impl UnityAssets {
    /// Standard layout of a Unity WebGL export: `<base>/Build/<name>.*`
    pub fn from_build(base_url: &str, name: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        UnityAssets {
            loader_url: format!("{}/Build/{}.loader.js", base, name),
            data_url: format!("{}/Build/{}.data", base, name),
            framework_url: format!("{}/Build/{}.framework.js", base, name),
            code_url: format!("{}/Build/{}.wasm", base, name),
        }
    }
}

/// Loader progress, shown as a percentage until the build is running.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadProgress {
    pub fraction: f32,
    pub loaded: bool,
}

impl LoadProgress {
    /// `{percent}` is replaced with the whole-number percentage.
    pub const TEMPLATE: &'static str = "Loading... {percent}%";

    pub fn percent(&self) -> u32 {
        (self.fraction.clamp(0.0, 1.0) * 100.0).round() as u32
    }

    pub fn label(&self) -> Option<String> {
        if self.loaded {
            None
        } else {
            Some(Self::TEMPLATE.replace("{percent}", &self.percent().to_string()))
        }
    }
}

pub struct IframeViewer {
    pub url: String,
    pub width: u32,
    pub height: u32,
}

impl IframeViewer {
    pub fn new(url: impl Into<String>) -> Self {
        IframeViewer {
            url: url.into(),
            width: 960,
            height: 540,
        }
    }
}

impl SimulationViewer for IframeViewer {
    fn kind(&self) -> ViewerKind {
        ViewerKind::Iframe
    }

    fn render(&self) -> String {
        format!(
            r#"<div class="simulation-display" style="width:{w}px;height:{h}px">
  <iframe src="{src}" title="Simulation results" style="width:100%;height:100%;border:none"></iframe>
</div>"#,
            w = self.width,
            h = self.height,
            src = escape_attr(&self.url),
        )
    }
}

pub struct UnityViewer {
    pub assets: UnityAssets,
    pub width: u32,
    pub height: u32,
}

impl UnityViewer {
    pub fn new(assets: UnityAssets) -> Self {
        UnityViewer {
            assets,
            width: 960,
            height: 540,
        }
    }
}

impl SimulationViewer for UnityViewer {
    fn kind(&self) -> ViewerKind {
        ViewerKind::Unity
    }

    fn render(&self) -> String {
        let label = LoadProgress::default().label().unwrap_or_default();
        format!(
            r#"<div class="simulation-display" style="width:{w}px;height:{h}px">
  <p id="unity-progress">{label}</p>
  <canvas id="unity-canvas" style="width:100%;height:100%"></canvas>
</div>"#,
            w = self.width,
            h = self.height,
            label = label,
        )
    }

    fn assets(&self) -> Option<UnityAssets> {
        Some(self.assets.clone())
    }

    fn progress_template(&self) -> Option<&'static str> {
        Some(LoadProgress::TEMPLATE)
    }
}

pub fn viewer_from_config(config: &Config) -> Arc<dyn SimulationViewer> {
    match config.viewer {
        ViewerKind::Iframe => Arc::new(IframeViewer::new(config.viewer_url.clone())),
        ViewerKind::Unity => Arc::new(UnityViewer::new(UnityAssets::from_build(
            &config.unity_build_url,
            &config.unity_build_name,
        ))),
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
