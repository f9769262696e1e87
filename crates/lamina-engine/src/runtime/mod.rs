//! Loop driver.
//!
//! [`Runtime`] owns a [`crate::window::Surface`] and the attached layers
//! and drives the per-frame protocol, continuous (`run`) or one frame at a
//! time (`run_once`).

mod driver;

pub use driver::Runtime;
