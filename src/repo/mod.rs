//! Generic repository layer.
//!
//! Statement synthesis, lifecycle hooks, and the type-parametrized
//! repository that ties them to the execution interface.

pub mod hooks;
pub mod repository;
pub mod statement;

pub use hooks::RepoHooks;
pub use repository::{IdFn, Repository, ScanFn, ValuesFn};
pub use statement::StatementBuilder;
