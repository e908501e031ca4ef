// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing the handler for a feature under the click.
//!
//! The order is fixed:
//! 1. The layer's own default action for the scope, if the layer carries
//!    bindings and has one.
//! 2. The registry's default action for the layer, whatever the scope.
//! 3. Nothing: the feature is left unhandled.

use crate::bindings::Action;
use crate::handler::ActionHandler;
use crate::layer::MapLayer;
use crate::registry::{ActionRegistry, RegistryAction};

/// A handler picked by [`resolve`], with where it came from.
#[derive(Copy, Clone, Debug)]
pub enum Resolved<'a> {
    /// The layer's default action for the scope.
    Scoped(&'a Action),
    /// The registry's default action for the layer.
    Registry(&'a RegistryAction),
}

impl<'a> Resolved<'a> {
    /// The handler to run.
    pub fn handler(&self) -> &'a dyn ActionHandler {
        match *self {
            Self::Scoped(a) => a.handler(),
            Self::Registry(a) => a.handler(),
        }
    }

    /// Name of the resolved action.
    pub fn name(&self) -> &'a str {
        match *self {
            Self::Scoped(a) => a.name(),
            Self::Registry(a) => a.name(),
        }
    }
}

/// Picks the handler for `layer` in `scope`.
pub fn resolve<'a>(
    layer: &'a dyn MapLayer,
    registry: &'a ActionRegistry,
    scope: &str,
) -> Option<Resolved<'a>> {
    if let Some(action) = layer
        .as_action_bindable()
        .and_then(|b| b.actions().default_action(scope))
    {
        log::debug!("{}: using layer default \"{}\"", layer.id(), action.name());
        return Some(Resolved::Scoped(action));
    }
    let fallback = registry.default_action_for_layer(layer);
    match fallback {
        Some(action) => {
            log::debug!("{}: using registry default \"{}\"", layer.id(), action.name());
        }
        None => log::debug!("{}: no action resolves in scope {scope:?}", layer.id()),
    }
    fallback.map(Resolved::Registry)
}

/// Returns `true` if the layer offers any action at all: one of its own in
/// `scope`, or any registry action that targets it.
///
/// This is the up-front check before a click is processed. A layer can pass
/// it without any default being set, in which case every feature ends up
/// unhandled.
pub fn has_usable_actions(layer: &dyn MapLayer, registry: &ActionRegistry, scope: &str) -> bool {
    let scoped = layer
        .as_action_bindable()
        .is_some_and(|b| b.actions().actions(scope).next().is_some());
    scoped || registry.map_layer_actions(layer).next().is_some()
}
