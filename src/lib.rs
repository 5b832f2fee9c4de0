//! HTTP front-end for an external object-recognition service.
//!
//! A client posts a list of image URLs to `/recognize`. The gateway downloads
//! the images into a fresh job directory, asks the recognition service to
//! process that directory, and answers with the URLs of whatever the service
//! wrote into the job's output directory. The output root is served read-only
//! under `/output`.
//!
//! The recognition service is any HTTP endpoint that accepts
//! `{"input_dir": .., "output_dir": ..}` and answers `200 OK` once the
//! results are on disk.

pub mod api;
pub mod collect;
pub mod config;
pub mod error;
pub mod fetch;
pub mod gateway;
pub mod job;
pub mod recognition;

pub use api::router;
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use gateway::{Gateway, RecognizeRequest};
pub use recognition::{RecognitionClient, RecognitionError, RecognitionJob};
