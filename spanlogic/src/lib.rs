#[cfg(feature = "core")]
#[doc(inline)]
pub use spanlogic_core as core;

#[cfg(feature = "overlaprs")]
#[doc(inline)]
pub use spanlogic_overlaprs as overlaprs;

#[cfg(feature = "compose")]
#[doc(inline)]
pub use spanlogic_compose as compose;

#[cfg(feature = "io")]
#[doc(inline)]
pub use spanlogic_io as io;
