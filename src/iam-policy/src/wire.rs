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

//! Conversions to and from the IAM v1 representation of a policy.
//!
//! Compute Engine, Pub/Sub, Cloud Storage, and most other services exchange
//! policies using the `google.iam.v1.Policy` message. In JSON:
//!
//! ```norust
//! {
//!   "version": 1,
//!   "etag": "BwWKmjvelug=",
//!   "bindings": [
//!     { "role": "roles/viewer", "members": ["user:abc@gmail.com", "allUsers"] }
//!   ]
//! }
//! ```
//!
//! The message types are re-exported from the `google-cloud-iam-v1` crate.
//! Use the `TryFrom` conversions to map them to and from a [TypedPolicy].
//!
//! A typed policy holds the etag as a string, the base64 encoding of the
//! `etag` bytes, which is also its format in JSON. A `version` of `0` means
//! the version is not set.
//!
//! Typed policies cannot represent IAM conditions, decoding a policy with a
//! conditional binding fails. Audit configs are not part of a typed policy
//! and are not encoded. `setIamPolicy` only changes `bindings` and `etag`
//! unless the request includes an update mask, so the audit configs of a
//! resource survive a read-modify-write cycle.

use crate::error::{DecodeError, EncodeError};
use crate::identity::Identity;
use crate::policy::{PolicyBuilder, TypedPolicy};
use crate::role::PolicyRole;
use base64::prelude::{BASE64_STANDARD, Engine as _};

pub use iam_v1::model::{Binding, Policy};

/// Converts a [TypedPolicy] to its IAM v1 representation.
///
/// Bindings are sorted by role and members are sorted by identity.
///
/// # Example
/// ```
/// # use google_cloud_iam_policy::{wire, Identity, Policy, Role};
/// let policy = Policy::builder()
///     .add_identity(Role::viewer(), [Identity::all_users()])?
///     .set_etag("BwWKmjvelug=")
///     .build();
/// let wire = wire::Policy::try_from(&policy)?;
/// assert_eq!(&wire.etag[..], &[7, 5, 138, 154, 59, 222, 150, 232]);
/// assert_eq!(wire.bindings[0].role, "roles/viewer");
/// assert_eq!(wire.bindings[0].members, vec!["allUsers"]);
/// # Ok::<(), anyhow::Error>(())
/// ```
impl<R> TryFrom<&TypedPolicy<R>> for Policy
where
    R: PolicyRole + AsRef<str>,
{
    type Error = EncodeError;

    fn try_from(value: &TypedPolicy<R>) -> Result<Self, Self::Error> {
        let etag = value
            .etag()
            .map(decode_etag)
            .transpose()?
            .unwrap_or_default();
        let bindings = value.bindings().iter().map(|(role, identities)| {
            Binding::new()
                .set_role(role.as_ref())
                .set_members(identities.iter().map(String::from))
        });
        Ok(Policy::new()
            .set_version(value.version().unwrap_or_default())
            .set_bindings(bindings)
            .set_etag(etag))
    }
}

impl<R> TryFrom<TypedPolicy<R>> for Policy
where
    R: PolicyRole + AsRef<str>,
{
    type Error = EncodeError;

    fn try_from(value: TypedPolicy<R>) -> Result<Self, Self::Error> {
        Policy::try_from(&value)
    }
}

/// Converts the IAM v1 representation to a [TypedPolicy].
///
/// Repeated roles are merged, and roles without members are dropped.
///
/// # Example
/// ```
/// # use google_cloud_iam_policy::{wire, DecodeError, Identity, Policy, Role};
/// let wire = wire::Policy::new()
///     .set_etag(bytes::Bytes::from_static(&[7, 5, 138, 154, 59, 222, 150, 232]))
///     .set_bindings([wire::Binding::new()
///         .set_role("roles/viewer")
///         .set_members(["allUsers"])]);
/// let policy = Policy::try_from(wire)?;
/// assert_eq!(policy.etag(), Some("BwWKmjvelug="));
/// assert_eq!(policy.version(), None);
/// assert!(policy.has_identity(&Role::viewer(), &Identity::all_users()));
/// # Ok::<(), DecodeError>(())
/// ```
impl<R> TryFrom<Policy> for TypedPolicy<R>
where
    R: PolicyRole + From<String>,
{
    type Error = DecodeError;

    fn try_from(value: Policy) -> Result<Self, Self::Error> {
        let mut bindings = Vec::with_capacity(value.bindings.len());
        for binding in value.bindings {
            if binding.condition.is_some() {
                return Err(DecodeError::ConditionalBinding { role: binding.role });
            }
            let members = binding
                .members
                .iter()
                .map(|m| {
                    Identity::try_from(m).map_err(|source| DecodeError::Member {
                        role: binding.role.clone(),
                        member: m.clone(),
                        source,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            bindings.push((R::from(binding.role), members));
        }
        let etag = (!value.etag.is_empty()).then(|| BASE64_STANDARD.encode(&value.etag));
        let version = (value.version != 0).then_some(value.version);
        let policy = PolicyBuilder::from_parts(bindings, etag, version)?.build();
        tracing::debug!(
            roles = policy.bindings().len(),
            has_etag = policy.etag().is_some(),
            version = ?policy.version(),
            audit_configs = value.audit_configs.len(),
            "decoded IAM policy"
        );
        Ok(policy)
    }
}

fn decode_etag(etag: &str) -> Result<bytes::Bytes, EncodeError> {
    BASE64_STANDARD
        .decode(etag)
        .map(bytes::Bytes::from)
        .map_err(|e| EncodeError::Etag {
            etag: etag.to_string(),
            source: e.into(),
        })
}

impl<R> TypedPolicy<R>
where
    R: PolicyRole + AsRef<str> + From<String>,
{
    /// Parses a policy from its IAM v1 JSON representation.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_iam_policy::{DecodeError, Identity, TypedPolicy};
    /// let json = r#"{"version": 1, "bindings": [{"role": "viewer", "members": ["domain:google.com"]}]}"#;
    /// let policy = TypedPolicy::<String>::from_json(json)?;
    /// assert_eq!(policy.version(), Some(1));
    /// assert!(policy.has_identity("viewer", &Identity::domain("google.com")));
    /// # Ok::<(), DecodeError>(())
    /// ```
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let wire = serde_json::from_str::<Policy>(json)
            .map_err(|e| DecodeError::Deserialize(e.into()))?;
        Self::try_from(wire)
    }

    /// Formats the policy using its IAM v1 JSON representation.
    pub fn to_json(&self) -> Result<String, EncodeError> {
        let wire = Policy::try_from(self)?;
        serde_json::to_string(&wire).map_err(|e| EncodeError::Serialize(e.into()))
    }
}
