//! Response-side types

mod content;
mod recorder;

pub use content::BodyFormat;
pub use recorder::ResponseRecorder;
