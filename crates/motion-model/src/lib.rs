//! Flowsteer Motion Model
//!
//! Defines the data contracts shared by the flow, classification and video
//! layers:
//! - **Fields:** Dense per-pixel motion fields and single motion vectors
//! - **Directions:** The closed set of direction labels and classification results
//! - **Flo:** Reading and writing Middlebury `.flo` flow files
//!
//! Vectors are in pixels per frame pair. Positive `dx` points right in image
//! space and positive `dy` points down.

pub mod direction;
pub mod field;
pub mod flo;

pub use direction::*;
pub use field::*;
