pub mod console;
pub mod editor;
pub mod gutter;
pub mod packages;

pub use console::ConsoleView;
pub use editor::EditorView;
pub use gutter::GutterView;
pub use packages::PackagesView;
