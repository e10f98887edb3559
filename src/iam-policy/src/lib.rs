// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Typed IAM policies for Google Cloud client libraries.
//!
//! **WARNING:** this crate is under active development. We expect multiple
//! breaking changes in the upcoming releases. We welcome feedback about the
//! APIs, documentation, missing features, bugs, etc.
//!
//! Many Google Cloud resources (Compute Engine images and disks, Pub/Sub
//! topics and subscriptions, Cloud Storage buckets) control access with an IAM
//! policy: a set of bindings from a role to the identities granted that role.
//! This crate provides a single [TypedPolicy] value type, generic over the
//! role key, and a [PolicyBuilder] to change it. Resource-specific libraries
//! convert to and from their service representation, for example the IAM v1
//! JSON format in the [wire] module.
//!
//! # Example
//! ```
//! # use google_cloud_iam_policy::{Identity, Policy, PolicyError, Role};
//! let policy = Policy::builder()
//!     .add_identity(Role::viewer(), [Identity::user("abc@gmail.com")])?
//!     .add_identity(Role::editor(), [Identity::group("group@gmail.com")])?
//!     .build();
//! assert_eq!(policy.bindings().len(), 2);
//! assert_eq!(policy.etag(), None);
//!
//! let policy = policy.to_builder().remove_role(&Role::editor()).build();
//! assert_eq!(policy.bindings().len(), 1);
//! # Ok::<(), PolicyError>(())
//! ```

mod error;
pub use crate::error::*;
mod identity;
pub use crate::identity::*;
mod policy;
pub use crate::policy::*;
mod role;
pub use crate::role::*;
pub mod service;
pub mod wire;
