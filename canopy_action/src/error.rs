// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::error::Error;
use std::fmt;

use canopy_feature::{FeatureId, LayerId};

use crate::bindings::ActionId;
use crate::layer::LayerKind;
use crate::registry::RegistryActionId;

/// Why a click could not be dispatched at all.
///
/// These are validation failures: no query runs. The `Display` text is the
/// message shown to the user.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// No layer is selected.
    NoActiveLayer,
    /// The selected layer does not carry features.
    WrongLayerType(LayerKind),
    /// The selected layer is not shown in the view. Clicks on hidden layers
    /// are ignored without telling the user.
    LayerHidden(LayerId),
    /// Neither the layer nor the registry offers an action for it.
    NoActionsConfigured(LayerId),
}

impl DispatchError {
    /// Returns `true` if this failure should not be reported to the user.
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::LayerHidden(_))
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveLayer | Self::WrongLayerType(_) => {
                f.write_str("To run an action, you must choose an active vector layer.")
            }
            Self::LayerHidden(layer) => write!(f, "{layer} is hidden; click ignored"),
            Self::NoActionsConfigured(_) => {
                f.write_str("The active vector layer has no defined actions")
            }
        }
    }
}

impl Error for DispatchError {}

/// Failure reported by an action handler.
#[derive(Debug)]
pub struct HandlerError {
    message: String,
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl HandlerError {
    /// Creates an error with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for HandlerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

/// A handler failed for one feature. Other features of the same dispatch are
/// unaffected.
#[derive(Debug)]
pub struct HandlerFailure {
    /// The feature the handler ran for.
    pub feature: FeatureId,
    /// Name of the action that failed.
    pub action: String,
    /// What the handler reported.
    pub error: HandlerError,
}

impl fmt::Display for HandlerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "action \"{}\" failed for feature {}: {}",
            self.action, self.feature, self.error
        )
    }
}

impl Error for HandlerFailure {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.error)
    }
}

/// Invalid default-action configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BindingError {
    /// The layer has no action with this id.
    UnknownAction(ActionId),
    /// The action exists but is not available in the requested scope.
    ScopeMismatch(ActionId),
    /// The registry has no action with this id.
    UnknownRegistryAction(RegistryActionId),
    /// The registry action does not apply to the layer.
    NotTargeted(RegistryActionId, LayerId),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction(id) => write!(f, "no layer action {id}"),
            Self::ScopeMismatch(id) => write!(f, "layer action {id} is not available in this scope"),
            Self::UnknownRegistryAction(id) => write!(f, "no registry action {id}"),
            Self::NotTargeted(id, layer) => {
                write!(f, "registry action {id} does not apply to {layer}")
            }
        }
    }
}

impl Error for BindingError {}
