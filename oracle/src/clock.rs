//! Clock oracle.

use vdao_types::Timestamp;

/// Supplies monotonic chain time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}
