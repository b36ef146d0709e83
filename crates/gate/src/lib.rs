//! Run permission for dependent fetches.
//!
//! A fetch whose parameters come from an upstream fetch must not start until
//! the upstream has finished, the session identity is resolved, and the key it
//! needs is actually present. It must also not re-fetch an entity this session
//! has deleted. [`compute_run_permission`] folds those inputs into the single
//! boolean handed to the fetch's `enabled` flag.
//!
//! Chains (order → line items → products) pass each level's composite loading
//! state down as the next level's `serial_loading`; [`chain`] evaluates a
//! whole chain at once.

pub mod chain;
pub mod fetch_gate;
pub mod permission;
pub mod removal;

pub use chain::{ChainEvaluation, Stage, StageOutcome};
pub use fetch_gate::FetchGate;
pub use permission::{BlockReason, GateDecision, Readiness, RequiredKey, RunInputs, composite_loading, compute_run_permission};
pub use removal::RemovalLatch;
