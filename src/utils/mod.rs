//! Commonly used utilities.

mod finally;

pub use self::finally::{finally, FinallyGuard};
