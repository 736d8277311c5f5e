// marksync state managers
// Managers handle stateful operations: the local bookmark mirror, the sync
// store lifecycle, and the auth session.

pub mod collection;
pub mod session_manager;
pub mod sync_store;
