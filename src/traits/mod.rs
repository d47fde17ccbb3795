pub mod reader;
pub mod viewer;

pub use reader::CatchpitReader;
pub use viewer::SimulationViewer;
