mod health;
mod images;
mod upload;

pub use health::{health_check, HealthResponse};
pub use images::{list_images, ImagesResponse};
pub use upload::{upload_files, UploadResponse};
