pub(crate) mod decode;
pub mod store;
