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

use crate::identity::IdentityKind;

/// Represent failures when changing a [PolicyBuilder][crate::PolicyBuilder].
///
/// Every builder call validates its arguments before changing any state. If
/// the call fails the builder keeps the bindings, etag, and version it had
/// before the call.
///
/// # Examples
/// ```
/// # use google_cloud_iam_policy::{Identity, Policy, PolicyError, Role};
/// let mut builder = Policy::builder();
/// let err = builder
///     .add_identity(Role::from(""), [Identity::all_users()])
///     .unwrap_err();
/// assert!(matches!(err, PolicyError::EmptyRole));
///
/// let err = builder
///     .add_identity(Role::viewer(), [Identity::user("")])
///     .unwrap_err();
/// assert!(matches!(err, PolicyError::InvalidIdentity(_)));
///
/// let err = builder.add_identity(Role::viewer(), []).unwrap_err();
/// assert!(matches!(err, PolicyError::EmptyIdentitySet { .. }));
/// assert!(builder.bindings().is_empty());
/// ```
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PolicyError {
    /// The role was empty.
    #[error("the role cannot be empty")]
    EmptyRole,

    /// A role was assigned to an empty set of identities.
    #[error("role `{role}` cannot be assigned to an empty set of identities")]
    EmptyIdentitySet {
        /// The name of the role.
        role: String,
    },

    /// One of the identities is not valid.
    #[error("invalid identity: {0}")]
    InvalidIdentity(#[source] IdentityError),
}

impl PolicyError {
    pub(crate) fn empty_identity_set<R: std::fmt::Display>(role: &R) -> Self {
        Self::EmptyIdentitySet {
            role: role.to_string(),
        }
    }
}

/// Represent failures in creating or parsing [Identity][crate::Identity]
/// values.
///
/// # Examples
/// ```
/// # use google_cloud_iam_policy::{Identity, IdentityError, IdentityKind};
/// let id = Identity::try_from("robot:r2d2");
/// assert!(matches!(id, Err(IdentityError::UnknownType(_))));
///
/// let id = Identity::try_from("user:");
/// assert!(matches!(id, Err(IdentityError::MissingValue(IdentityKind::User))));
/// ```
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum IdentityError {
    /// The identity type prefix is not recognized.
    #[error("unknown identity type in `{0}`")]
    UnknownType(String),

    /// The identity type requires a value (an email or a domain), but it is
    /// empty.
    #[error("an identity of type {0} requires a value")]
    MissingValue(IdentityKind),
}

/// Represent failures decoding a policy from its wire representation.
///
/// # Examples
/// ```
/// # use google_cloud_iam_policy::{DecodeError, Policy};
/// let json = r#"{"bindings": [{"role": "roles/viewer", "members": ["robot:r2d2"]}]}"#;
/// let policy = Policy::from_json(json);
/// assert!(matches!(policy, Err(DecodeError::Member { .. })));
/// ```
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum DecodeError {
    /// The payload is not a valid policy document.
    #[error("cannot deserialize the policy: {0}")]
    Deserialize(#[source] BoxedError),

    /// One of the members of a binding is not a valid identity.
    #[error("cannot parse member `{member}` in role `{role}`: {source}")]
    Member {
        role: String,
        member: String,
        #[source]
        source: IdentityError,
    },

    /// A binding has an IAM condition.
    #[error("the binding for role `{role}` has a condition, conditional bindings are not supported")]
    ConditionalBinding { role: String },

    /// The bindings violate the policy invariants.
    #[error(transparent)]
    Policy(#[from] PolicyError),
}

/// Represent failures encoding a policy in its wire representation.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EncodeError {
    /// The etag is not the base64 encoding of the wire etag.
    #[error("the etag `{etag}` is not valid base64: {source}")]
    Etag {
        etag: String,
        #[source]
        source: BoxedError,
    },

    /// The policy cannot be serialized.
    #[error("cannot serialize the policy: {0}")]
    Serialize(#[source] BoxedError),
}

pub(crate) type BoxedError = Box<dyn std::error::Error + Send + Sync>;
