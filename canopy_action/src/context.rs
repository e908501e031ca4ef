// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layered variable scopes and text substitution for action templates.

use std::fmt::Write as _;

use canopy_feature::{Feature, Value};
use hashbrown::HashMap;
use kurbo::Point;

use crate::view::MapView;

/// Variable holding the map x coordinate of the click.
pub const CLICK_X: &str = "click_x";
/// Variable holding the map y coordinate of the click.
pub const CLICK_Y: &str = "click_y";
/// Variable holding the scope name the action was resolved for.
pub const ACTION_SCOPE: &str = "action_scope";

/// A named set of variables.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scope {
    name: String,
    variables: HashMap<String, Value>,
}

impl Scope {
    /// Creates an empty scope.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: HashMap::new(),
        }
    }

    /// Builder form of [`set_variable`](Self::set_variable).
    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_variable(name, value);
        self
    }

    /// Sets a variable, replacing any previous value.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Scope name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value of a variable defined in this scope.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Returns `true` if the scope defines `name`.
    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Names of the variables in this scope, sorted.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.variables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if the scope has no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// A stack of scopes. Later scopes shadow earlier ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EvaluationContext {
    scopes: Vec<Scope>,
}

impl EvaluationContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a scope on top of the existing ones.
    pub fn push_scope(&mut self, scope: Scope) {
        self.scopes.push(scope);
    }

    /// Builder form of [`push_scope`](Self::push_scope).
    #[must_use]
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.push_scope(scope);
        self
    }

    /// Scopes from outermost to innermost.
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    /// Value of `name` from the innermost scope that defines it.
    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|s| s.variable(name))
    }

    /// Returns `true` if any scope defines `name`.
    pub fn has_variable(&self, name: &str) -> bool {
        self.scopes.iter().any(|s| s.has_variable(name))
    }

    /// Every visible variable name once, sorted.
    pub fn variable_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .scopes
            .iter()
            .flat_map(|s| s.variables.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Replaces `[% ... %]` blocks in `template`.
    ///
    /// A block may hold:
    /// - `@name`: a context variable.
    /// - `$id`: the feature id.
    /// - `"field"` or `field`: a feature attribute.
    ///
    /// References that resolve to nothing expand to the empty string. An
    /// unterminated `[%` and everything after it is copied unchanged.
    ///
    /// ```rust
    /// use canopy_action::{EvaluationContext, Scope};
    /// use canopy_feature::{Feature, FeatureId};
    ///
    /// let ctx = EvaluationContext::new()
    ///     .with_scope(Scope::new("Action").with_variable("click_x", 5.0));
    /// let feature = Feature::new(FeatureId(3)).with_attribute("name", "oak");
    /// assert_eq!(
    ///     ctx.expand("show [% name %] #[% $id %] at [% @click_x %]", &feature),
    ///     "show oak #3 at 5"
    /// );
    /// ```
    pub fn expand(&self, template: &str, feature: &Feature) -> String {
        let mut out = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(start) = rest.find("[%") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("%]") else {
                out.push_str(&rest[start..]);
                return out;
            };
            if let Some(value) = self.lookup(after[..end].trim(), feature) {
                let _ = write!(out, "{value}");
            }
            rest = &after[end + 2..];
        }
        out.push_str(rest);
        out
    }

    fn lookup(&self, expr: &str, feature: &Feature) -> Option<Value> {
        if let Some(var) = expr.strip_prefix('@') {
            return self.variable(var).cloned();
        }
        if expr == "$id" {
            return i64::try_from(feature.id().0).ok().map(Value::Int);
        }
        let field = expr
            .strip_prefix('"')
            .and_then(|e| e.strip_suffix('"'))
            .unwrap_or(expr);
        feature.attribute(field).cloned()
    }
}

/// Supplies the outer scopes of an [`EvaluationContext`].
pub trait ScopeProvider {
    /// Application-wide variables.
    fn global_scope(&self) -> Scope;

    /// Variables of the open project.
    fn project_scope(&self) -> Scope;

    /// Variables describing the map view.
    fn view_scope(&self, view: &MapView) -> Scope {
        view.settings_scope()
    }
}

/// A [`ScopeProvider`] returning fixed global and project scopes.
#[derive(Clone, Debug)]
pub struct StaticScopes {
    global: Scope,
    project: Scope,
}

impl Default for StaticScopes {
    fn default() -> Self {
        Self::new(Scope::new("Global"), Scope::new("Project"))
    }
}

impl StaticScopes {
    /// Creates a provider from the two scopes.
    pub fn new(global: Scope, project: Scope) -> Self {
        Self { global, project }
    }
}

impl ScopeProvider for StaticScopes {
    fn global_scope(&self) -> Scope {
        self.global.clone()
    }

    fn project_scope(&self) -> Scope {
        self.project.clone()
    }
}

/// Builds the context one handler invocation sees.
///
/// Scopes are stacked global, project, view, then an action scope holding
/// exactly [`CLICK_X`], [`CLICK_Y`] and [`ACTION_SCOPE`], so click variables
/// win over any outer variable of the same name.
pub fn build_context(
    global: Scope,
    project: Scope,
    view: Scope,
    click: Point,
    scope_name: &str,
) -> EvaluationContext {
    let action = Scope::new("Action")
        .with_variable(CLICK_X, click.x)
        .with_variable(CLICK_Y, click.y)
        .with_variable(ACTION_SCOPE, scope_name);
    EvaluationContext::new()
        .with_scope(global)
        .with_scope(project)
        .with_scope(view)
        .with_scope(action)
}
