// Copyright 2025 the Rockhop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error type for the game layer.

use rockhop_scene::SceneError;

/// Errors produced by the game layer.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GameError {
    /// A scene graph operation failed.
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// A [`GameConfig`](crate::GameConfig) field is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}
