pub mod auth;

pub use auth::{
    auth_gate_middleware, ApiKeyVerifier, AuthGate, CredentialVerifier, Principal, SessionVerifier,
};
