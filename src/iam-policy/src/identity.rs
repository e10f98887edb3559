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

use crate::error::IdentityError;

/// A principal that can be granted a role in an IAM policy.
///
/// # Examples
/// ```
/// # use google_cloud_iam_policy::{Identity, IdentityError, IdentityKind};
/// let id = Identity::user("abc@gmail.com");
/// assert_eq!(id.kind(), IdentityKind::User);
/// assert_eq!(id.value(), Some("abc@gmail.com"));
/// assert_eq!(id.to_string(), "user:abc@gmail.com");
///
/// let id = Identity::try_from("allUsers")?;
/// assert_eq!(id, Identity::all_users());
/// assert_eq!(id.value(), None);
/// # Ok::<(), IdentityError>(())
/// ```
///
/// # JSON Mapping
///
/// In JSON (and in the `members` field of an IAM v1 `Binding`) identities are
/// encoded as a string. The two wildcards use their name (`allUsers`,
/// `allAuthenticatedUsers`), all other identities use a `type:value` format,
/// for example `serviceAccount:robot@my-project.iam.gserviceaccount.com` or
/// `domain:example.com`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Identity {
    /// Anyone on the internet, with or without a Google account.
    AllUsers,
    /// Anyone authenticated with a Google account or a service account.
    AllAuthenticatedUsers,
    /// A Google account, identified by its email.
    User(String),
    /// A service account, identified by its email.
    ServiceAccount(String),
    /// A Google group, identified by its email.
    Group(String),
    /// A G Suite or Cloud Identity domain, identified by its name.
    Domain(String),
}

/// The discriminant of an [Identity].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum IdentityKind {
    /// See [Identity::AllUsers].
    AllUsers,
    /// See [Identity::AllAuthenticatedUsers].
    AllAuthenticatedUsers,
    /// See [Identity::User].
    User,
    /// See [Identity::ServiceAccount].
    ServiceAccount,
    /// See [Identity::Group].
    Group,
    /// See [Identity::Domain].
    Domain,
}

impl IdentityKind {
    /// The name used for this kind in the wire representation.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AllUsers => "allUsers",
            Self::AllAuthenticatedUsers => "allAuthenticatedUsers",
            Self::User => "user",
            Self::ServiceAccount => "serviceAccount",
            Self::Group => "group",
            Self::Domain => "domain",
        }
    }
}

impl std::fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Identity {
    /// Returns the identity representing anyone on the internet.
    pub fn all_users() -> Self {
        Self::AllUsers
    }

    /// Returns the identity representing anyone with a Google account.
    pub fn all_authenticated_users() -> Self {
        Self::AllAuthenticatedUsers
    }

    /// Returns the identity for a Google account.
    ///
    /// # Parameters
    /// * `email` - the email address of the account, for example
    ///   `alice@gmail.com`.
    pub fn user<T: Into<String>>(email: T) -> Self {
        Self::User(email.into())
    }

    /// Returns the identity for a service account.
    ///
    /// # Parameters
    /// * `email` - the email address of the service account, for example
    ///   `my-robot@my-project.iam.gserviceaccount.com`.
    pub fn service_account<T: Into<String>>(email: T) -> Self {
        Self::ServiceAccount(email.into())
    }

    /// Returns the identity for a Google group.
    pub fn group<T: Into<String>>(email: T) -> Self {
        Self::Group(email.into())
    }

    /// Returns the identity for all the users in a domain.
    pub fn domain<T: Into<String>>(name: T) -> Self {
        Self::Domain(name.into())
    }

    /// The kind of identity.
    pub fn kind(&self) -> IdentityKind {
        match self {
            Self::AllUsers => IdentityKind::AllUsers,
            Self::AllAuthenticatedUsers => IdentityKind::AllAuthenticatedUsers,
            Self::User(_) => IdentityKind::User,
            Self::ServiceAccount(_) => IdentityKind::ServiceAccount,
            Self::Group(_) => IdentityKind::Group,
            Self::Domain(_) => IdentityKind::Domain,
        }
    }

    /// The email or domain name, `None` for [AllUsers][Identity::AllUsers]
    /// and [AllAuthenticatedUsers][Identity::AllAuthenticatedUsers].
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::AllUsers | Self::AllAuthenticatedUsers => None,
            Self::User(v) | Self::ServiceAccount(v) | Self::Group(v) | Self::Domain(v) => {
                Some(v.as_str())
            }
        }
    }

    /// Verifies the identity can be stored in a policy.
    ///
    /// Identities with an email or domain must have a value that is not blank.
    ///
    /// # Example
    /// ```
    /// # use google_cloud_iam_policy::{Identity, IdentityError, IdentityKind};
    /// assert!(Identity::group("group@gmail.com").validate().is_ok());
    /// let err = Identity::group("").validate();
    /// assert!(matches!(err, Err(IdentityError::MissingValue(IdentityKind::Group))));
    /// ```
    pub fn validate(&self) -> Result<(), IdentityError> {
        match self.value() {
            Some(v) if v.trim().is_empty() => Err(IdentityError::MissingValue(self.kind())),
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value() {
            None => f.write_str(self.kind().name()),
            Some(v) => write!(f, "{}:{v}", self.kind().name()),
        }
    }
}

/// Parses the wire representation of an [Identity].
///
/// # Example
/// ```
/// # use google_cloud_iam_policy::{Identity, IdentityError};
/// let id = Identity::try_from("domain:google.com")?;
/// assert_eq!(id, Identity::domain("google.com"));
/// # Ok::<(), IdentityError>(())
/// ```
impl TryFrom<&str> for Identity {
    type Error = IdentityError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "allUsers" => return Ok(Self::AllUsers),
            "allAuthenticatedUsers" => return Ok(Self::AllAuthenticatedUsers),
            _ => {}
        };
        let (kind, v) = value
            .split_once(':')
            .ok_or_else(|| IdentityError::UnknownType(value.to_string()))?;
        let id = match kind {
            "user" => Self::user(v),
            "serviceAccount" => Self::service_account(v),
            "group" => Self::group(v),
            "domain" => Self::domain(v),
            _ => return Err(IdentityError::UnknownType(value.to_string())),
        };
        id.validate()?;
        Ok(id)
    }
}

impl TryFrom<&String> for Identity {
    type Error = IdentityError;
    fn try_from(value: &String) -> Result<Self, Self::Error> {
        Identity::try_from(value.as_str())
    }
}

impl std::str::FromStr for Identity {
    type Err = IdentityError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Identity::try_from(s)
    }
}

impl From<&Identity> for String {
    fn from(value: &Identity) -> String {
        value.to_string()
    }
}

impl serde::ser::Serialize for Identity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

struct IdentityVisitor;

impl serde::de::Visitor<'_> for IdentityVisitor {
    type Value = Identity;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("a string with an IAM identity, e.g. `user:alice@example.com`")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Identity::try_from(value).map_err(E::custom)
    }
}

impl<'de> serde::de::Deserialize<'de> for Identity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(IdentityVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    type Result = anyhow::Result<()>;

    #[test_case(Identity::all_users(), "allUsers")]
    #[test_case(Identity::all_authenticated_users(), "allAuthenticatedUsers")]
    #[test_case(Identity::user("abc@gmail.com"), "user:abc@gmail.com")]
    #[test_case(Identity::service_account("service-account@gmail.com"), "serviceAccount:service-account@gmail.com")]
    #[test_case(Identity::group("group@gmail.com"), "group:group@gmail.com")]
    #[test_case(Identity::domain("google.com"), "domain:google.com")]
    fn wire_format(id: Identity, want: &str) -> Result {
        assert_eq!(id.to_string(), want);
        assert_eq!(Identity::try_from(want)?, id);
        assert_eq!(want.parse::<Identity>()?, id);
        Ok(())
    }

    #[test_case("allUsers", IdentityKind::AllUsers, None)]
    #[test_case("user:abc@gmail.com", IdentityKind::User, Some("abc@gmail.com"))]
    #[test_case("domain:google.com", IdentityKind::Domain, Some("google.com"))]
    fn accessors(input: &str, kind: IdentityKind, value: Option<&str>) -> Result {
        let id = Identity::try_from(input)?;
        assert_eq!(id.kind(), kind);
        assert_eq!(id.value(), value);
        Ok(())
    }

    #[test_case(""; "empty")]
    #[test_case("nobody"; "no separator")]
    #[test_case("robot:r2d2"; "unknown prefix")]
    #[test_case("User:abc@gmail.com"; "prefix is case sensitive")]
    fn unknown_type(input: &str) {
        let got = Identity::try_from(input);
        assert!(
            matches!(got, Err(IdentityError::UnknownType(ref s)) if s == input),
            "{got:?}"
        );
    }

    #[test_case("user:", IdentityKind::User)]
    #[test_case("serviceAccount:", IdentityKind::ServiceAccount)]
    #[test_case("group:", IdentityKind::Group)]
    #[test_case("domain:", IdentityKind::Domain)]
    #[test_case("user: ", IdentityKind::User; "blank user")]
    #[test_case("group:\t", IdentityKind::Group; "blank group")]
    fn missing_value(input: &str, kind: IdentityKind) {
        let got = Identity::try_from(input);
        assert_eq!(got, Err(IdentityError::MissingValue(kind)));
    }

    #[test]
    fn value_with_colon() -> Result {
        let id = Identity::try_from("user:odd:name@example.com")?;
        assert_eq!(id, Identity::user("odd:name@example.com"));
        Ok(())
    }

    #[test]
    fn validate() {
        assert!(Identity::all_users().validate().is_ok());
        assert!(Identity::domain("google.com").validate().is_ok());
        assert_eq!(
            Identity::service_account("").validate(),
            Err(IdentityError::MissingValue(IdentityKind::ServiceAccount))
        );
    }

    #[test_case(Identity::user(" "), IdentityKind::User; "user")]
    #[test_case(Identity::service_account("  "), IdentityKind::ServiceAccount; "service account")]
    #[test_case(Identity::group("\n"), IdentityKind::Group; "group")]
    #[test_case(Identity::domain(" \t "), IdentityKind::Domain; "domain")]
    fn validate_blank(id: Identity, kind: IdentityKind) {
        assert_eq!(id.validate(), Err(IdentityError::MissingValue(kind)));
    }

    #[test]
    fn equality_by_kind_and_value() {
        assert_eq!(Identity::user("a@b.com"), Identity::user("a@b.com"));
        assert_ne!(Identity::user("a@b.com"), Identity::group("a@b.com"));
        assert_ne!(Identity::user("a@b.com"), Identity::user("c@d.com"));
    }

    #[test]
    fn serialize() -> Result {
        let got = serde_json::to_value([Identity::all_users(), Identity::group("g@gmail.com")])?;
        assert_eq!(got, json!(["allUsers", "group:g@gmail.com"]));
        Ok(())
    }

    #[test]
    fn deserialize() -> Result {
        let got = serde_json::from_value::<Vec<Identity>>(json!(["domain:google.com"]))?;
        assert_eq!(got, vec![Identity::domain("google.com")]);
        Ok(())
    }

    #[test]
    fn deserialize_unexpected_input_type() {
        let got = serde_json::from_value::<Identity>(json!({"user": "abc@gmail.com"}));
        let msg = format!("{got:?}");
        assert!(msg.contains("IAM identity"), "message={msg}");
    }

    #[test]
    fn deserialize_invalid() {
        let got = serde_json::from_value::<Identity>(json!("robot:r2d2"));
        let msg = format!("{got:?}");
        assert!(msg.contains("unknown identity type"), "message={msg}");
    }
}
