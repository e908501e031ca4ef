// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer front end for the dispatcher.

use kurbo::Point;

use crate::dispatcher::{DispatchEnv, DispatchReport, FeatureActionDispatcher, Outcome};

/// Status-bar text shown when a click hits nothing.
pub const NO_FEATURES_MESSAGE: &str = "No features at this position found.";

/// Severity of a user-facing message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational.
    Info,
    /// Something the user should look at.
    Warning,
}

/// Where the tool reports to the user.
pub trait StatusSink {
    /// A message for the message bar.
    fn message(&mut self, level: MessageLevel, text: &str);

    /// A transient status-bar note.
    fn status(&mut self, text: &str);
}

/// A message recorded by the [`StatusSink`] impl for `Vec<StatusMessage>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StatusMessage {
    /// From [`StatusSink::message`].
    Message(MessageLevel, String),
    /// From [`StatusSink::status`].
    Status(String),
}

impl StatusSink for Vec<StatusMessage> {
    fn message(&mut self, level: MessageLevel, text: &str) {
        self.push(StatusMessage::Message(level, text.to_owned()));
    }

    fn status(&mut self, text: &str) {
        self.push(StatusMessage::Status(text.to_owned()));
    }
}

/// Map tool that runs feature actions on pointer release.
///
/// Press and move events are ignored; a release while the tool is active runs
/// one dispatch and turns its result into user-facing messages.
#[derive(Clone, Debug)]
pub struct FeatureActionTool {
    dispatcher: FeatureActionDispatcher,
    active: bool,
}

impl FeatureActionTool {
    /// Creates an inactive tool.
    pub fn new(dispatcher: FeatureActionDispatcher) -> Self {
        Self {
            dispatcher,
            active: false,
        }
    }

    /// Starts handling pointer events.
    pub fn activate(&mut self) {
        log::trace!("feature action tool activated");
        self.active = true;
    }

    /// Stops handling pointer events.
    pub fn deactivate(&mut self) {
        log::trace!("feature action tool deactivated");
        self.active = false;
    }

    /// Returns `true` while the tool handles pointer events.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The wrapped dispatcher.
    pub fn dispatcher(&self) -> &FeatureActionDispatcher {
        &self.dispatcher
    }

    /// Pointer press. Does nothing.
    pub fn pointer_press(&mut self, _device: Point) {}

    /// Pointer move. Does nothing.
    pub fn pointer_move(&mut self, _device: Point) {}

    /// Pointer release: dispatches the click and reports to `sink`.
    ///
    /// Returns the report when a dispatch ran, and `None` if the tool is
    /// inactive or validation failed.
    pub fn pointer_release(
        &mut self,
        env: &DispatchEnv<'_>,
        device: Point,
        sink: &mut dyn StatusSink,
    ) -> Option<DispatchReport> {
        if !self.active {
            return None;
        }
        let report = match self.dispatcher.dispatch(env, device) {
            Ok(report) => report,
            Err(err) => {
                if !err.is_silent() {
                    sink.message(MessageLevel::Info, &err.to_string());
                }
                return None;
            }
        };
        for failure in &report.failures {
            sink.message(MessageLevel::Warning, &failure.to_string());
        }
        if report.outcome() == Outcome::ZeroFeaturesMatched {
            sink.status(NO_FEATURES_MESSAGE);
        }
        Some(report)
    }
}
