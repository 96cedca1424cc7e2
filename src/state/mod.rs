//! Client session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` owns the single mutable `SessionState`; `fetch` is the only
//! asynchronous writer into it. Route guards and views read snapshots and
//! never write.

pub mod fetch;
pub mod session;
