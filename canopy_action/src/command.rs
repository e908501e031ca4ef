// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;

use canopy_feature::Feature;

use crate::context::EvaluationContext;
use crate::error::HandlerError;
use crate::handler::ActionHandler;
use crate::layer::MapLayer;

type Runner = dyn Fn(&str) -> Result<(), HandlerError> + Send + Sync;

/// An action whose body is a text template.
///
/// On each run the template is expanded against the feature and context (see
/// [`EvaluationContext::expand`]) and the resulting text is handed to the
/// runner, which might open a URL, launch a program, or log it.
pub struct CommandAction {
    template: String,
    runner: Box<Runner>,
}

impl CommandAction {
    /// Creates an action from a template and a runner for the expanded text.
    pub fn new<F>(template: impl Into<String>, runner: F) -> Self
    where
        F: Fn(&str) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self {
            template: template.into(),
            runner: Box::new(runner),
        }
    }

    /// The unexpanded template.
    pub fn template(&self) -> &str {
        &self.template
    }
}

impl ActionHandler for CommandAction {
    fn run(
        &self,
        layer: &dyn MapLayer,
        feature: &Feature,
        context: &EvaluationContext,
    ) -> Result<(), HandlerError> {
        let command = context.expand(&self.template, feature);
        log::debug!("{}: running command {command:?}", layer.id());
        (self.runner)(&command)
    }
}

impl fmt::Debug for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandAction")
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}
