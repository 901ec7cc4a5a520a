//! Migration trait and registry.

use futures::future::BoxFuture;

use crate::db::SqlExecutor;
use crate::error::AppError;

/// One schema step.
///
/// Returns a `BoxFuture` bounded by the executor borrow so migrations can
/// run on a borrowed transaction.
pub trait Migration: Send + Sync {
    fn id(&self) -> &'static str;
    fn version(&self) -> u32;
    fn description(&self) -> &'static str;
    fn up<'a>(&'a self, ctx: &'a (dyn SqlExecutor + Sync)) -> BoxFuture<'a, Result<(), AppError>>;
}

/// Ordered set of migrations.
#[derive(Default)]
pub struct Register {
    migrations: Vec<Box<dyn Migration>>,
}

impl Register {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, migration: impl Migration + 'static) -> Self {
        self.migrations.push(Box::new(migration));
        self
    }

    /// Iterate over migrations.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Migration> {
        self.migrations.iter().map(|m| m.as_ref())
    }

    /// Migrations with a version above `current_version`, in version order.
    pub fn pending(&self, current_version: u32) -> Vec<&dyn Migration> {
        let mut pending: Vec<_> = self
            .iter()
            .filter(|m| m.version() > current_version)
            .collect();
        pending.sort_by_key(|m| m.version());
        pending
    }

    /// Highest registered version, 0 when empty.
    pub fn latest_version(&self) -> u32 {
        self.iter().map(|m| m.version()).max().unwrap_or(0)
    }
}
