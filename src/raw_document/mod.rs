mod readable;
pub mod scanner;
mod view;

pub use readable::ReadableDocument;
pub use scanner::{ElementScanner, scan};
pub use view::{Items, RawDocument};
