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

//! Read-modify-write helpers for resources with IAM policies.
//!
//! Resource libraries implement [PolicyService] by forwarding to their
//! `getIamPolicy` and `setIamPolicy` RPCs. Applications use
//! [update_policy] to change a policy: the function fetches the current
//! policy, applies the changes to a builder seeded with it, and sends the
//! result. The service rejects the update if the policy changed since it was
//! fetched, because the new policy carries the etag of the old one.
//!
//! # Example
//! ```
//! # use google_cloud_iam_policy::{Identity, Policy, Role};
//! # use google_cloud_iam_policy::service::{PolicyService, ServiceError, update_policy};
//! fn grant_viewer(service: &dyn PolicyService, topic: &str) -> Result<Policy, ServiceError> {
//!     update_policy(service, topic, |builder| {
//!         builder.add_identity(Role::viewer(), [Identity::all_users()])?;
//!         Ok(true)
//!     })
//! }
//! ```

use crate::error::{BoxedError, PolicyError};
use crate::policy::{Policy, PolicyBuilder};
use crate::role::Role;

/// The IAM operations of a resource.
///
/// Each call is a single request to the service. Implementations do not
/// retry, and do not cache policies.
pub trait PolicyService {
    /// Gets the current policy for `resource`, including its etag.
    fn get_iam_policy(&self, resource: &str) -> Result<Policy, ServiceError>;

    /// Replaces the policy for `resource`.
    ///
    /// If `policy` has an etag the service rejects the update when the
    /// current policy has a different etag.
    fn set_iam_policy(&self, resource: &str, policy: Policy) -> Result<Policy, ServiceError>;
}

/// Represent failures reading or updating policies.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ServiceError {
    /// The requested changes are not valid.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// The updater cancelled the operation.
    #[error("the policy update was cancelled")]
    Cancelled,

    /// The service returned an error.
    #[error("the service returned an error: {0}")]
    Service(#[source] BoxedError),
}

impl ServiceError {
    /// Wraps an error returned by the service.
    pub fn service<T: Into<BoxedError>>(source: T) -> Self {
        Self::Service(source.into())
    }
}

/// Changes the IAM policy of `resource`.
///
/// Calls `updater` with a builder initialized from the current policy. The
/// updater returns `Ok(true)` to send the changes, or `Ok(false)` to cancel
/// the update without contacting the service again. On cancellation this
/// function returns [ServiceError::Cancelled].
///
/// The new policy keeps the etag of the current policy, unless the updater
/// changes it.
pub fn update_policy<S, F>(service: &S, resource: &str, updater: F) -> Result<Policy, ServiceError>
where
    S: PolicyService + ?Sized,
    F: FnOnce(&mut PolicyBuilder<Role>) -> Result<bool, PolicyError>,
{
    let current = service.get_iam_policy(resource)?;
    tracing::debug!(
        resource,
        has_etag = current.etag().is_some(),
        roles = current.bindings().len(),
        "fetched IAM policy"
    );
    let mut builder = current.to_builder();
    if !updater(&mut builder)? {
        tracing::debug!(resource, "IAM policy update cancelled by updater");
        return Err(ServiceError::Cancelled);
    }
    service.set_iam_policy(resource, builder.build())
}
