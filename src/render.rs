pub mod composite;
pub(crate) mod raster;
