//! Image upload feature: store payloads in the object store and their
//! metadata in the metadata store.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/images` | List images, most recent first |
//! | POST | `/api/upload` | Upload an image (multipart field `file`) |
//! | DELETE | `/api/images/{id}` | Delete an image and its payload |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ImageService;
