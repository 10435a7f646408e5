// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) uses these modules to register one candidate per run.
//
// Module responsibilities:
// - `api`: Encapsulates HTTP interactions with the LORIS instance (login,
//   candidate creation) and the wire types both calls exchange.
// - `cli`: Parses the positional arguments, resolves credentials and
//   drives the login-then-create flow.
//
// Keeping this separation makes it possible to exercise the full flow in
// tests against a mock server without going through `main`.
pub mod api;
pub mod cli;
