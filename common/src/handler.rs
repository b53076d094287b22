//! [`Handler`] abstractions.

use std::future::Future;

/// Executable operation handler.
///
/// Commands, queries, database backends and media pipelines all speak this
/// single interface, differing only in the `Args` they accept.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
