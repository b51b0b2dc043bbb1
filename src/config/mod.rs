pub mod core;
pub mod rendering;

pub use self::core::{ViewerConfig, WindowConfig};
pub use self::rendering::RenderConfig;
