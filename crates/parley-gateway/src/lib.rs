//! Notification transport for the message store.
//!
//! The transport is simulated: connections are in-process channels rather
//! than sockets, but the subscription bookkeeping and fan-out are real.

pub mod dispatcher;

pub use dispatcher::Dispatcher;
