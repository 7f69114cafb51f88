//! Cache infrastructure - Bounded in-memory stores

mod bounded_store;
pub mod sweeper;

pub use bounded_store::{
    byte_store, string_store, ByteStore, OrderedBoundedStore, StringStore, DEFAULT_CAPACITY,
    DEFAULT_STORE_TTL,
};
pub use sweeper::{spawn_sweeper, Sweep};
