pub mod codes;

pub use codes::{FaultBody, FaultCode, FaultEnvelope, build_envelope};
