pub mod error;
pub mod frame;
pub mod pb;
pub mod record;

pub use error::{Error, Result};
pub use frame::{Frame, RecordKind};
pub use record::{Device, Record};
