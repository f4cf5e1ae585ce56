#[cfg(feature = "core")]
#[doc(inline)]
pub use provirs_core as core;

#[cfg(feature = "dist")]
#[doc(inline)]
pub use provirs_dist as dist;
