// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Application-wide actions shared by many layers.

use std::fmt;
use std::sync::Arc;

use canopy_feature::LayerId;
use hashbrown::HashMap;

use crate::error::BindingError;
use crate::handler::ActionHandler;
use crate::layer::{LayerKind, MapLayer};

/// Identifier of an action in an [`ActionRegistry`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct RegistryActionId(u32);

impl fmt::Display for RegistryActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which layers a registry action applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerTargets {
    /// Every layer.
    All,
    /// Layers of the listed kinds.
    Kinds(Vec<LayerKind>),
    /// Exactly the listed layers.
    Layers(Vec<LayerId>),
}

impl LayerTargets {
    /// Returns `true` if the action applies to `layer`.
    pub fn accepts(&self, layer: &dyn MapLayer) -> bool {
        match self {
            Self::All => true,
            Self::Kinds(kinds) => kinds.contains(&layer.kind()),
            Self::Layers(ids) => ids.contains(&layer.id()),
        }
    }
}

/// An action registered for use on any layer it targets.
#[derive(Clone)]
pub struct RegistryAction {
    id: RegistryActionId,
    name: String,
    targets: LayerTargets,
    handler: Arc<dyn ActionHandler>,
}

impl RegistryAction {
    /// Identifier.
    pub fn id(&self) -> RegistryActionId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layers the action applies to.
    pub fn targets(&self) -> &LayerTargets {
        &self.targets
    }

    /// The handler to run.
    pub fn handler(&self) -> &dyn ActionHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for RegistryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryAction")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("targets", &self.targets)
            .finish_non_exhaustive()
    }
}

/// Actions contributed by the application or plugins rather than by layers.
///
/// The registry is configured up front and read during dispatch; it is passed
/// to dispatchers explicitly rather than living in a global.
#[derive(Debug, Default)]
pub struct ActionRegistry {
    actions: Vec<RegistryAction>,
    defaults: HashMap<LayerId, RegistryActionId>,
    next_id: u32,
}

impl ActionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action.
    pub fn add_action(
        &mut self,
        name: impl Into<String>,
        targets: LayerTargets,
        handler: impl ActionHandler + 'static,
    ) -> RegistryActionId {
        let id = RegistryActionId(self.next_id);
        self.next_id += 1;
        self.actions.push(RegistryAction {
            id,
            name: name.into(),
            targets,
            handler: Arc::new(handler),
        });
        id
    }

    /// Unregisters an action and drops it as default of any layer.
    pub fn remove_action(&mut self, id: RegistryActionId) -> Option<RegistryAction> {
        let pos = self.actions.iter().position(|a| a.id == id)?;
        self.defaults.retain(|_, d| *d != id);
        Some(self.actions.remove(pos))
    }

    /// Looks up an action.
    pub fn action(&self, id: RegistryActionId) -> Option<&RegistryAction> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Actions that apply to `layer`, in registration order.
    pub fn map_layer_actions<'a>(
        &'a self,
        layer: &'a dyn MapLayer,
    ) -> impl Iterator<Item = &'a RegistryAction> {
        self.actions.iter().filter(move |a| a.targets.accepts(layer))
    }

    /// Makes `id` the action that runs for `layer` when the layer has no
    /// default of its own.
    pub fn set_default_action_for_layer(
        &mut self,
        layer: &dyn MapLayer,
        id: RegistryActionId,
    ) -> Result<(), BindingError> {
        let action = self
            .action(id)
            .ok_or(BindingError::UnknownRegistryAction(id))?;
        if !action.targets.accepts(layer) {
            return Err(BindingError::NotTargeted(id, layer.id()));
        }
        self.defaults.insert(layer.id(), id);
        Ok(())
    }

    /// The default action for `layer`.
    ///
    /// A default whose action was removed, or that no longer targets the
    /// layer, resolves to `None`.
    pub fn default_action_for_layer(&self, layer: &dyn MapLayer) -> Option<&RegistryAction> {
        let id = self.defaults.get(&layer.id())?;
        self.action(*id).filter(|a| a.targets.accepts(layer))
    }

    /// Removes the default for a layer.
    pub fn clear_default_action_for_layer(&mut self, layer: LayerId) {
        self.defaults.remove(&layer);
    }
}
