use thiserror::Error;

use crate::deploy::DeployError;
use crate::messages::codec::CodecError;
use crate::resource::VersionError;

/// Crate-level convenience error.
///
/// Not a "god error": a thin wrapper over the canonical capability errors.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Deploy(#[from] DeployError),
}
