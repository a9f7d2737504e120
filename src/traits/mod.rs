pub mod bucket_store;

pub use bucket_store::{Backend, BucketStore};
