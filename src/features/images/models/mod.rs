mod image;

pub use image::{storage_key, ImageRecord, ATTR_ID};
