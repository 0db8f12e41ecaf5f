pub mod error;
pub mod traits;
pub mod types;

pub use error::{AnalysisError, UploadRejection};
pub use traits::VisionAdapter;
pub use types::{AnalysisResult, ImageBlob, Tag};
