// mod.rs - Core logic module

pub mod bootstrap;
pub mod driver;
pub mod esa;
pub mod estimator;
pub mod match_engine;
pub mod mutation;
pub mod shustring;

pub use bootstrap::{run_bootstrap, BootstrapReplicate};
pub use driver::{run_pairwise, DiagnosticFlags, PairwiseTable, Scheduling};
pub use esa::{Esa, LcpInterval};
pub use mutation::{Model, MutationMatrix};
