// Copyright 2024 Saptak Santra
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Facing direction written by the state machine on transition.

/// Which way something is facing, or that no definite facing applies yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    Left,
    Right,
    #[default]
    Unspecified,
}

/// Implemented by a collaborator's transform-like component so the state
/// machine can read and write its facing direction on transition.
pub trait HasOrientation {
    fn orientation(&self) -> Orientation;
    fn set_orientation(&mut self, orientation: Orientation);
}
