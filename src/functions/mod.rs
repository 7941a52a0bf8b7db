pub mod traits;
pub mod primitives;
pub mod registry;

pub use registry::{
    is_generated_name, EphemeralGenerator, EphemeralInstance, PrimitiveCatalog, Terminal,
    ADF_ARG_PREFIX, ADF_PREFIX, EPHEMERAL_PREFIX, RPB_ARG_PREFIX, RPB_NAME,
};
pub use traits::{FnPrimitive, Primitive};
