//! Errors raised by the connection layer.

use thiserror::Error;

/// Errors that can occur while connecting components to a store.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// Attempted to write a property owned by the connection.
    #[error("Cannot set redux property \"{name}\". Try dispatching a redux action instead.")]
    ReadOnlyProperty { name: String },

    /// The selector (or the factory that produced it) failed.
    #[error(transparent)]
    Selector(anyhow::Error),

    /// A user-supplied action creator failed.
    #[error(transparent)]
    ActionCreator(anyhow::Error),

    /// The store rejected or failed to apply a dispatched action.
    #[error(transparent)]
    Store(anyhow::Error),

    /// Selector output could not be converted into properties.
    #[error("Failed to convert selector output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Selector output serialized to something other than an object.
    #[error("Selector must produce an object of properties, got {found}")]
    NotAnObject { found: &'static str },

    /// No action property with the given name exists.
    #[error("No action property named \"{name}\"")]
    UnknownAction { name: String },

    /// The selector was invoked again while it was still computing.
    #[error("Selector re-entered while it was already computing")]
    ReentrantSelector,

    /// The connected instance has already been torn down.
    #[error("Connected instance has already been destroyed")]
    Destroyed,
}

pub type Result<T, E = ConnectError> = std::result::Result<T, E>;
