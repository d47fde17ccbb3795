use crate::simulation::{UnityAssets, ViewerDescriptor, ViewerKind};

/// Something the results panel can embed to show simulation output.
pub trait SimulationViewer: Send + Sync {
    fn kind(&self) -> ViewerKind;

    /// HTML fragment for the results panel
    fn render(&self) -> String;

    fn assets(&self) -> Option<UnityAssets> {
        None
    }

    /// Loading text with a `{percent}` slot, for viewers that download first
    fn progress_template(&self) -> Option<&'static str> {
        None
    }

    fn descriptor(&self) -> ViewerDescriptor {
        ViewerDescriptor {
            kind: self.kind(),
            html: self.render(),
            assets: self.assets(),
            progress_template: self.progress_template(),
        }
    }
}
