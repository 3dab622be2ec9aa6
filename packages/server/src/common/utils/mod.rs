pub mod expo;
pub mod json;

pub use expo::ExpoClient;
pub use json::merge_objects;
