//! Light-commander port — delivers adjustments to the light-control
//! collaborator.

use std::future::Future;

use lumen_domain::command::LightCommand;
use lumen_domain::error::LumenError;

/// Applies target values to lights.
///
/// The engine treats delivery as fire-and-forget: a failed apply is logged
/// and dropped, never retried. Confirmation comes back asynchronously as a
/// reading, if it comes at all.
pub trait LightCommander {
    /// Apply a command to the entity it targets.
    fn apply(&self, command: LightCommand) -> impl Future<Output = Result<(), LumenError>> + Send;
}

impl<T: LightCommander + Send + Sync> LightCommander for std::sync::Arc<T> {
    fn apply(&self, command: LightCommand) -> impl Future<Output = Result<(), LumenError>> + Send {
        (**self).apply(command)
    }
}
