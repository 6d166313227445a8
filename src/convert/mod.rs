// YAPI Interface Conversion Module
//
// Turns remote interface records into local endpoints:
//
// - inference: JSON sample -> parameter tree (response bodies)
// - params: remote params, headers and bodies -> local records
//
// Architecture:
//   inference.rs (leaf, pure)
//       ↑
//   params.rs (uses inference for responses)
//       ↑
//   reconciler.rs (converts every fetched interface before upsert)

pub mod inference;
pub mod params;

pub use inference::*;
pub use params::*;
