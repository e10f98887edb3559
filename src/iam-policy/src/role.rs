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

/// The key type for the bindings in a [TypedPolicy][crate::TypedPolicy].
///
/// Most services name roles with a string, such as `roles/viewer`. Some
/// services use a closed set of roles, and may prefer an enum as the key.
///
/// The [Display][std::fmt::Display] implementation names the role in error
/// messages.
pub trait PolicyRole: Clone + Ord + std::hash::Hash + std::fmt::Debug + std::fmt::Display {
    /// Returns true if the role is unset.
    ///
    /// Policies never store a binding for an unset role.
    fn is_empty(&self) -> bool;
}

impl PolicyRole for String {
    fn is_empty(&self) -> bool {
        self.trim().is_empty()
    }
}

/// A fully qualified IAM role name.
///
/// # Examples
/// ```
/// # use google_cloud_iam_policy::Role;
/// assert_eq!(Role::viewer().as_str(), "roles/viewer");
/// assert_eq!(Role::of("pubsub.publisher").as_str(), "roles/pubsub.publisher");
/// assert_eq!(Role::of("projects/p/roles/custom").as_str(), "projects/p/roles/custom");
/// ```
///
/// Predefined roles use the `roles/` prefix, custom roles are prefixed by the
/// project or organization that defines them.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    const PREDEFINED: &'static str = "roles/";
    const PREFIXES: [&'static str; 3] = [Self::PREDEFINED, "projects/", "organizations/"];

    /// Creates a role from its name, adding the `roles/` prefix if the name
    /// is not already qualified.
    pub fn of<T: Into<String>>(name: T) -> Self {
        let name = name.into();
        if Self::PREFIXES.iter().any(|p| name.starts_with(p)) {
            return Self(name);
        }
        Self(format!("{}{name}", Self::PREDEFINED))
    }

    /// Full control of all the resources.
    pub fn owner() -> Self {
        Self::of("owner")
    }

    /// Permissions to read and modify state.
    pub fn editor() -> Self {
        Self::of("editor")
    }

    /// Read-only access.
    pub fn viewer() -> Self {
        Self::of("viewer")
    }

    /// The fully qualified name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PolicyRole for Role {
    fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Wraps a role name as-is, without adding any prefix.
impl From<String> for Role {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Wraps a role name as-is, without adding any prefix.
impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("viewer", "roles/viewer")]
    #[test_case("roles/viewer", "roles/viewer")]
    #[test_case("storage.objectAdmin", "roles/storage.objectAdmin")]
    #[test_case("projects/my-project/roles/custom", "projects/my-project/roles/custom")]
    #[test_case("organizations/123/roles/custom", "organizations/123/roles/custom")]
    fn of(input: &str, want: &str) {
        assert_eq!(Role::of(input).as_str(), want);
        assert_eq!(Role::of(input.to_string()).to_string(), want);
    }

    #[test]
    fn predefined() {
        assert_eq!(Role::owner(), Role::from("roles/owner"));
        assert_eq!(Role::editor(), Role::from("roles/editor"));
        assert_eq!(Role::viewer(), Role::from("roles/viewer"));
    }

    #[test_case("", true; "empty")]
    #[test_case("  ", true; "blank")]
    #[test_case("viewer", false; "named")]
    fn is_empty(input: &str, want: bool) {
        assert_eq!(PolicyRole::is_empty(&Role::from(input)), want);
        assert_eq!(PolicyRole::is_empty(&input.to_string()), want);
    }

    #[test]
    fn serialize_transparent() -> anyhow::Result<()> {
        let got = serde_json::to_value(Role::viewer())?;
        assert_eq!(got, serde_json::json!("roles/viewer"));
        let got = serde_json::from_value::<Role>(got)?;
        assert_eq!(got, Role::viewer());
        Ok(())
    }
}
