/// Resize debounce.
pub mod coalesce;
pub mod layout_session;
/// Meeting roster.
pub mod roster;
/// Cast, change records and redraw policy.
pub mod state;
