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

use crate::error::PolicyError;
use crate::identity::Identity;
use crate::role::{PolicyRole, Role};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};

/// The bindings in a policy, from each role to the identities granted it.
pub type Bindings<R> = BTreeMap<R, BTreeSet<Identity>>;

/// An IAM policy using fully qualified role names as keys.
///
/// This is the policy type used by Compute Engine, Pub/Sub, and Cloud Storage
/// resources, and the type exchanged with a
/// [PolicyService][crate::service::PolicyService].
pub type Policy = TypedPolicy<Role>;

/// An immutable access control policy.
///
/// A policy binds roles to the set of identities granted each role. It may
/// also carry an `etag`, used for optimistic concurrency control when the
/// policy is updated, and a policy schema `version`. Both are only present on
/// policies returned by a service, or if explicitly set on the builder.
///
/// # Examples
/// ```
/// # use google_cloud_iam_policy::{Identity, PolicyError, TypedPolicy};
/// let policy = TypedPolicy::<String>::builder()
///     .add_identity("viewer", [Identity::user("abc@gmail.com"), Identity::all_users()])?
///     .add_identity("editor", [Identity::domain("google.com")])?
///     .build();
/// assert_eq!(policy.bindings().len(), 2);
/// assert_eq!(policy.etag(), None);
/// assert_eq!(policy.version(), None);
///
/// // Changes to the new builder do not affect `policy`.
/// let updated = policy
///     .to_builder()
///     .remove_identity("viewer", [Identity::all_users()])
///     .set_etag("etag")
///     .build();
/// assert_ne!(updated, policy);
/// assert_eq!(policy.bindings()["viewer"].len(), 2);
/// assert_eq!(updated.bindings()["viewer"].len(), 1);
/// # Ok::<(), PolicyError>(())
/// ```
///
/// Two policies are equal if their bindings, etag, and version are equal.
/// Policies never contain an unset role, an invalid identity, or a role bound
/// to an empty set of identities.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypedPolicy<R> {
    bindings: Bindings<R>,
    etag: Option<String>,
    version: Option<i32>,
}

impl<R> Default for TypedPolicy<R> {
    fn default() -> Self {
        Self {
            bindings: BTreeMap::new(),
            etag: None,
            version: None,
        }
    }
}

impl<R: PolicyRole> TypedPolicy<R> {
    /// Returns an empty builder.
    pub fn builder() -> PolicyBuilder<R> {
        PolicyBuilder::new()
    }

    /// Returns a builder initialized with a copy of this policy.
    pub fn to_builder(&self) -> PolicyBuilder<R> {
        PolicyBuilder {
            bindings: self.bindings.clone(),
            etag: self.etag.clone(),
            version: self.version,
        }
    }

    /// The bindings, from each role to the identities granted that role.
    pub fn bindings(&self) -> &Bindings<R> {
        &self.bindings
    }

    /// The identities granted `role`, if any.
    pub fn identities<Q>(&self, role: &Q) -> Option<&BTreeSet<Identity>>
    where
        R: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bindings.get(role)
    }

    /// Returns true if `identity` is granted `role`.
    pub fn has_identity<Q>(&self, role: &Q, identity: &Identity) -> bool
    where
        R: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.identities(role).is_some_and(|s| s.contains(identity))
    }

    /// The etag, used for optimistic concurrency control.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// The policy schema version.
    pub fn version(&self) -> Option<i32> {
        self.version
    }

    /// Consumes the policy, returning its bindings, etag, and version.
    ///
    /// Resource-specific libraries use this function to encode the policy in
    /// their wire format.
    pub fn into_parts(self) -> (Bindings<R>, Option<String>, Option<i32>) {
        (self.bindings, self.etag, self.version)
    }
}

/// Accumulates changes to create a [TypedPolicy].
///
/// Each function that can fail validates all its arguments before changing
/// the builder, so a failed call leaves the builder as it was. Calling
/// [build()][PolicyBuilder::build] copies the current state, the builder
/// can be changed and reused afterwards.
///
/// # Examples
/// ```
/// # use google_cloud_iam_policy::{Identity, Policy, PolicyError, Role};
/// let mut builder = Policy::builder();
/// builder
///     .add_identity(Role::viewer(), [Identity::user("abc@gmail.com")])?
///     .add_identity(Role::viewer(), [Identity::user("abc@gmail.com")])?;
/// let first = builder.build();
/// assert_eq!(first.bindings()[&Role::viewer()].len(), 1);
///
/// builder.remove_role(&Role::viewer());
/// assert!(builder.build().bindings().is_empty());
/// assert_eq!(first.bindings().len(), 1);
/// # Ok::<(), PolicyError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PolicyBuilder<R> {
    bindings: Bindings<R>,
    etag: Option<String>,
    version: Option<i32>,
}

impl<R> Default for PolicyBuilder<R> {
    fn default() -> Self {
        Self {
            bindings: BTreeMap::new(),
            etag: None,
            version: None,
        }
    }
}

impl<R: PolicyRole> PolicyBuilder<R> {
    /// Returns an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from the bindings, etag, and version of a policy
    /// decoded from a service.
    ///
    /// The bindings are validated as in [set_bindings()][Self::set_bindings].
    pub fn from_parts<M, S>(
        bindings: M,
        etag: Option<String>,
        version: Option<i32>,
    ) -> Result<Self, PolicyError>
    where
        M: IntoIterator<Item = (R, S)>,
        S: IntoIterator<Item = Identity>,
    {
        let mut builder = Self::new();
        builder
            .set_bindings(bindings)?
            .set_or_clear_etag(etag)
            .set_or_clear_version(version);
        Ok(builder)
    }

    /// Grants `role` to each of the `identities`.
    ///
    /// Creates the binding for `role` if needed. Identities already granted
    /// the role are ignored.
    ///
    /// # Errors
    ///
    /// Fails if `role` is empty, if `identities` is empty, or if any of the
    /// identities is invalid. No identity is added on failure.
    pub fn add_identity<K, T>(&mut self, role: K, identities: T) -> Result<&mut Self, PolicyError>
    where
        K: Into<R>,
        T: IntoIterator<Item = Identity>,
    {
        let role = role.into();
        let identities = validate_binding(&role, identities)?;
        if identities.is_empty() {
            return Err(PolicyError::empty_identity_set(&role));
        }
        self.bindings.entry(role).or_default().extend(identities);
        Ok(self)
    }

    /// Revokes `role` from each of the `identities`.
    ///
    /// Removes the binding for `role` if no identities remain. Identities, or
    /// roles, not present in the builder are ignored.
    pub fn remove_identity<Q, T>(&mut self, role: &Q, identities: T) -> &mut Self
    where
        R: Borrow<Q>,
        Q: Ord + ?Sized,
        T: IntoIterator<Item = Identity>,
    {
        if let Some(current) = self.bindings.get_mut(role) {
            for id in identities {
                current.remove(&id);
            }
            if current.is_empty() {
                self.bindings.remove(role);
            }
        }
        self
    }

    /// Removes the binding for `role`, if present.
    pub fn remove_role<Q>(&mut self, role: &Q) -> &mut Self
    where
        R: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.bindings.remove(role);
        self
    }

    /// Replaces all the bindings.
    ///
    /// If `bindings` contains the same role more than once the identities are
    /// merged. Roles assigned an empty set of identities are dropped.
    ///
    /// # Errors
    ///
    /// Fails if any role is empty, or if any identity is invalid. The builder
    /// is unchanged on failure.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_iam_policy::{Identity, PolicyError, TypedPolicy};
    /// let mut builder = TypedPolicy::<String>::builder();
    /// builder.set_bindings([
    ///     ("viewer".to_string(), vec![Identity::all_users()]),
    ///     ("editor".to_string(), vec![]),
    /// ])?;
    /// assert!(builder.bindings().contains_key("viewer"));
    /// assert!(!builder.bindings().contains_key("editor"));
    ///
    /// let err = builder
    ///     .set_bindings([("".to_string(), vec![Identity::all_users()])])
    ///     .unwrap_err();
    /// assert!(matches!(err, PolicyError::EmptyRole));
    /// assert!(builder.bindings().contains_key("viewer"));
    /// # Ok::<(), PolicyError>(())
    /// ```
    pub fn set_bindings<M, S>(&mut self, bindings: M) -> Result<&mut Self, PolicyError>
    where
        M: IntoIterator<Item = (R, S)>,
        S: IntoIterator<Item = Identity>,
    {
        let mut staged = Bindings::new();
        for (role, identities) in bindings {
            let identities = validate_binding(&role, identities)?;
            staged
                .entry(role)
                .or_insert_with(BTreeSet::new)
                .extend(identities);
        }
        staged.retain(|_, identities| !identities.is_empty());
        self.bindings = staged;
        Ok(self)
    }

    /// Sets the etag.
    pub fn set_etag<T: Into<String>>(&mut self, v: T) -> &mut Self {
        self.etag = Some(v.into());
        self
    }

    /// Sets or clears the etag.
    pub fn set_or_clear_etag<T: Into<String>>(&mut self, v: Option<T>) -> &mut Self {
        self.etag = v.map(Into::into);
        self
    }

    /// Sets the policy schema version.
    pub fn set_version(&mut self, v: i32) -> &mut Self {
        self.version = Some(v);
        self
    }

    /// Sets or clears the policy schema version.
    pub fn set_or_clear_version(&mut self, v: Option<i32>) -> &mut Self {
        self.version = v;
        self
    }

    /// The bindings accumulated so far.
    pub fn bindings(&self) -> &Bindings<R> {
        &self.bindings
    }

    /// The etag, if set.
    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// The policy schema version, if set.
    pub fn version(&self) -> Option<i32> {
        self.version
    }

    /// Creates a policy with a copy of the current state.
    pub fn build(&self) -> TypedPolicy<R> {
        TypedPolicy {
            bindings: self.bindings.clone(),
            etag: self.etag.clone(),
            version: self.version,
        }
    }
}

// Returns the identities for a binding, or the first precondition they
// violate. The set may be empty.
fn validate_binding<R, T>(role: &R, identities: T) -> Result<BTreeSet<Identity>, PolicyError>
where
    R: PolicyRole,
    T: IntoIterator<Item = Identity>,
{
    if role.is_empty() {
        return Err(PolicyError::EmptyRole);
    }
    identities
        .into_iter()
        .map(|id| id.validate().map(|_| id))
        .collect::<Result<BTreeSet<_>, _>>()
        .map_err(PolicyError::InvalidIdentity)
}
