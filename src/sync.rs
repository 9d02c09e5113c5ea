/// Client side of the relay.
pub mod client;
pub mod protocol;
/// Room table.
pub mod relay;
