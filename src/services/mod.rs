// marksync services
// Services provide supporting functionality: the remote store contract, the
// in-memory backend, and input validation.

pub mod memory_store;
pub mod remote_store;
pub mod validation;
