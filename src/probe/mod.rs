pub mod transport;
pub mod mutate;
pub mod verifier;

pub use transport::{ProbeResponse, ProbeTransport, ReqwestTransport};
pub use mutate::substitute_first_value;
pub use verifier::ActiveVerifier;
