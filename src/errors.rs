//! Engine error taxonomy.
//!
//! Most failure classes are absorbed by fallbacks (default profile, built-in
//! catalog, templated notes); errors that do surface cross the API as a
//! structured `{ "error": ... }` payload.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Serialize)]
pub enum EngineError {
  #[error("Catalog unavailable: {0}")]
  Catalog(String),

  #[error("Coaching notes failed: {0}")]
  Notes(String),

  #[error("Invalid request: {0}")]
  InvalidRequest(String),
}
