//! Script bridge.
//!
//! Marshals calls between the embedded page's script environment and native
//! callbacks, through a closed tagged value type. The registry is an
//! explicitly constructed object owned by the application — there is no
//! process-wide singleton — and must be re-bound into every fresh script
//! context (page navigation creates a new one).

mod registry;
mod value;

pub use registry::{BridgeFn, BridgeRegistry, ScriptContext, BRIDGE_NAMESPACE};
pub use value::{ScriptArgs, ScriptValue};
