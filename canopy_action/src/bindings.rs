// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actions a layer carries itself, grouped by the scopes they appear in.

use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::error::BindingError;
use crate::handler::ActionHandler;

/// Identifier of an action within one [`LayerActions`] set.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionId(u32);

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A named action available in one or more scopes.
#[derive(Clone)]
pub struct Action {
    id: ActionId,
    name: String,
    scopes: Vec<String>,
    handler: Arc<dyn ActionHandler>,
}

impl Action {
    /// Identifier.
    pub fn id(&self) -> ActionId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Scopes the action is offered in.
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns `true` if the action is offered in `scope`.
    pub fn is_available_in(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }

    /// The handler to run.
    pub fn handler(&self) -> &dyn ActionHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

/// The actions bound to one layer.
///
/// Each scope has at most one default action. A scope can list actions
/// without having a default; clicking then falls through to the registry.
#[derive(Debug, Default)]
pub struct LayerActions {
    actions: Vec<Action>,
    defaults: HashMap<String, ActionId>,
    next_id: u32,
}

impl LayerActions {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an action offered in `scopes`.
    pub fn add_action(
        &mut self,
        name: impl Into<String>,
        scopes: impl IntoIterator<Item = impl Into<String>>,
        handler: impl ActionHandler + 'static,
    ) -> ActionId {
        let id = ActionId(self.next_id);
        self.next_id += 1;
        self.actions.push(Action {
            id,
            name: name.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
            handler: Arc::new(handler),
        });
        id
    }

    /// Removes an action. Any scope that used it as default loses its default.
    pub fn remove_action(&mut self, id: ActionId) -> Option<Action> {
        let pos = self.actions.iter().position(|a| a.id == id)?;
        self.defaults.retain(|_, d| *d != id);
        Some(self.actions.remove(pos))
    }

    /// Looks up an action.
    pub fn action(&self, id: ActionId) -> Option<&Action> {
        self.actions.iter().find(|a| a.id == id)
    }

    /// Actions offered in `scope`, in the order they were added.
    pub fn actions<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = &'a Action> {
        self.actions.iter().filter(move |a| a.is_available_in(scope))
    }

    /// Makes `id` the default action of `scope`.
    pub fn set_default_action(&mut self, scope: &str, id: ActionId) -> Result<(), BindingError> {
        let action = self.action(id).ok_or(BindingError::UnknownAction(id))?;
        if !action.is_available_in(scope) {
            return Err(BindingError::ScopeMismatch(id));
        }
        self.defaults.insert(scope.to_owned(), id);
        Ok(())
    }

    /// The default action of `scope`, if one is set.
    pub fn default_action(&self, scope: &str) -> Option<&Action> {
        self.defaults.get(scope).and_then(|id| self.action(*id))
    }

    /// Removes the default of `scope`.
    pub fn clear_default_action(&mut self, scope: &str) {
        self.defaults.remove(scope);
    }

    /// Number of actions in all scopes.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if there are no actions.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
