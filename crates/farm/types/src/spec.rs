//! Domain specifications
//!
//! A [`DomainSpec`] is the validated, immutable snapshot of one domain's
//! desired configuration. It is only obtainable through [`DomainSpecBuilder`],
//! which applies derived defaults and rejects malformed fields once, at
//! construction.

use crate::error::{Result, ValidationError};
use crate::ids::{DomainUid, ServerName};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Image used when a domain does not name one
pub const DEFAULT_IMAGE: &str = "store/oracle/weblogic:12.2.1.3";

/// Image pull policy for the server image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImagePullPolicy {
    Always,
    Never,
    IfNotPresent,
}

impl ImagePullPolicy {
    /// Policy used when none is set: `Always` for `:latest` images,
    /// `IfNotPresent` otherwise
    pub fn derive_for(image: &str) -> Self {
        if image.ends_with(":latest") {
            ImagePullPolicy::Always
        } else {
            ImagePullPolicy::IfNotPresent
        }
    }
}

impl fmt::Display for ImagePullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImagePullPolicy::Always => write!(f, "Always"),
            ImagePullPolicy::Never => write!(f, "Never"),
            ImagePullPolicy::IfNotPresent => write!(f, "IfNotPresent"),
        }
    }
}

impl FromStr for ImagePullPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Always" => Ok(ImagePullPolicy::Always),
            "Never" => Ok(ImagePullPolicy::Never),
            "IfNotPresent" => Ok(ImagePullPolicy::IfNotPresent),
            other => Err(ValidationError::InvalidPullPolicy {
                value: other.to_string(),
            }),
        }
    }
}

/// Which servers of the domain should be running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StartupControl {
    /// No server runs, including the administration server
    None,
    /// Only the administration server runs
    Admin,
    /// The administration server and every managed server run
    All,
    /// The administration server, explicitly listed servers and the
    /// overridden clusters up to their replica counts run
    Specified,
    /// As `Specified`, plus clusters without an override run up to the
    /// domain default replica count
    #[default]
    Auto,
}

impl StartupControl {
    /// All legal enumerants, in declaration order
    pub const ALL: [StartupControl; 5] = [
        StartupControl::None,
        StartupControl::Admin,
        StartupControl::All,
        StartupControl::Specified,
        StartupControl::Auto,
    ];

    /// Does this policy start the administration server?
    pub fn starts_admin_server(&self) -> bool {
        !matches!(self, StartupControl::None)
    }

    /// Does this policy honour cluster overrides and the explicit server list?
    pub fn uses_overrides(&self) -> bool {
        matches!(self, StartupControl::Specified | StartupControl::Auto)
    }
}

impl fmt::Display for StartupControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupControl::None => write!(f, "NONE"),
            StartupControl::Admin => write!(f, "ADMIN"),
            StartupControl::All => write!(f, "ALL"),
            StartupControl::Specified => write!(f, "SPECIFIED"),
            StartupControl::Auto => write!(f, "AUTO"),
        }
    }
}

impl FromStr for StartupControl {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NONE" => Ok(StartupControl::None),
            "ADMIN" => Ok(StartupControl::Admin),
            "ALL" => Ok(StartupControl::All),
            "SPECIFIED" => Ok(StartupControl::Specified),
            "AUTO" => Ok(StartupControl::Auto),
            other => Err(ValidationError::InvalidStartupControl {
                value: other.to_string(),
            }),
        }
    }
}

/// Coordinates of the secret holding the administrator credentials
///
/// The secret is expected to carry `username` and `password` keys. It is
/// never resolved here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SecretReference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl SecretReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

/// Platform defaults applied to fields a domain leaves unset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecDefaults {
    pub image: String,
    pub startup_control: StartupControl,
}

impl Default for SpecDefaults {
    fn default() -> Self {
        Self {
            image: DEFAULT_IMAGE.to_string(),
            startup_control: StartupControl::Auto,
        }
    }
}

/// Validated, immutable specification of one domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainSpec {
    #[serde(rename = "domainUID")]
    domain_uid: DomainUid,
    domain_name: String,
    image: String,
    image_pull_policy: ImagePullPolicy,
    /// Whether the pull policy was set rather than derived from the image
    #[serde(skip)]
    pull_policy_explicit: bool,
    admin_secret: SecretReference,
    #[serde(rename = "asName")]
    admin_server_name: ServerName,
    #[serde(rename = "asPort")]
    admin_server_port: u16,
    #[serde(rename = "exportT3Channels")]
    exported_channels: Vec<String>,
    startup_control: StartupControl,
}

impl DomainSpec {
    /// Start building a spec for the given domain
    pub fn builder(domain_uid: impl Into<String>, domain_name: impl Into<String>) -> DomainSpecBuilder {
        DomainSpecBuilder::new(domain_uid, domain_name)
    }

    pub fn domain_uid(&self) -> &DomainUid {
        &self.domain_uid
    }

    pub fn domain_name(&self) -> &str {
        &self.domain_name
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn image_pull_policy(&self) -> ImagePullPolicy {
        self.image_pull_policy
    }

    pub fn admin_secret(&self) -> &SecretReference {
        &self.admin_secret
    }

    pub fn admin_server_name(&self) -> &ServerName {
        &self.admin_server_name
    }

    pub fn admin_server_port(&self) -> u16 {
        self.admin_server_port
    }

    /// Channels exported from the administration server, in declared order
    pub fn exported_channels(&self) -> &[String] {
        &self.exported_channels
    }

    pub fn startup_control(&self) -> StartupControl {
        self.startup_control
    }

    /// A builder seeded with every field of this spec
    ///
    /// The pull policy is carried over only when it was set explicitly; a
    /// derived one is derived again from whatever image the builder ends with.
    pub fn to_builder(&self) -> DomainSpecBuilder {
        let pull_policy = self.pull_policy_explicit.then_some(self.image_pull_policy);

        DomainSpecBuilder {
            domain_uid: self.domain_uid.to_string(),
            domain_name: self.domain_name.clone(),
            image: Some(self.image.clone()),
            image_pull_policy: pull_policy,
            admin_secret: Some(self.admin_secret.clone()),
            admin_server_name: Some(self.admin_server_name.to_string()),
            admin_server_port: Some(i64::from(self.admin_server_port)),
            exported_channels: self.exported_channels.clone(),
            startup_control: Some(self.startup_control),
            defaults: SpecDefaults::default(),
        }
    }
}

/// Validating builder for [`DomainSpec`]
#[derive(Debug, Clone)]
pub struct DomainSpecBuilder {
    domain_uid: String,
    domain_name: String,
    image: Option<String>,
    image_pull_policy: Option<ImagePullPolicy>,
    admin_secret: Option<SecretReference>,
    admin_server_name: Option<String>,
    admin_server_port: Option<i64>,
    exported_channels: Vec<String>,
    startup_control: Option<StartupControl>,
    defaults: SpecDefaults,
}

impl DomainSpecBuilder {
    pub fn new(domain_uid: impl Into<String>, domain_name: impl Into<String>) -> Self {
        Self {
            domain_uid: domain_uid.into(),
            domain_name: domain_name.into(),
            image: None,
            image_pull_policy: None,
            admin_secret: None,
            admin_server_name: None,
            admin_server_port: None,
            exported_channels: Vec::new(),
            startup_control: None,
            defaults: SpecDefaults::default(),
        }
    }

    /// Use platform defaults other than the built-in ones
    pub fn with_defaults(mut self, defaults: SpecDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_image_pull_policy(mut self, policy: ImagePullPolicy) -> Self {
        self.image_pull_policy = Some(policy);
        self
    }

    pub fn with_admin_secret(mut self, secret: SecretReference) -> Self {
        self.admin_secret = Some(secret);
        self
    }

    /// Set the administration server name and port
    pub fn with_admin_server(mut self, name: impl Into<String>, port: i64) -> Self {
        self.admin_server_name = Some(name.into());
        self.admin_server_port = Some(port);
        self
    }

    pub fn export_channel(mut self, channel: impl Into<String>) -> Self {
        self.exported_channels.push(channel.into());
        self
    }

    pub fn with_exported_channels<I, S>(mut self, channels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exported_channels = channels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_startup_control(mut self, control: StartupControl) -> Self {
        self.startup_control = Some(control);
        self
    }

    /// Validate every field and produce the immutable spec
    pub fn build(self) -> Result<DomainSpec> {
        if self.domain_uid.is_empty() {
            return Err(ValidationError::MissingField { field: "domainUID" });
        }

        if self.domain_name.is_empty() {
            return Err(ValidationError::MissingField { field: "domainName" });
        }

        let admin_secret = self
            .admin_secret
            .filter(|s| !s.name.is_empty())
            .ok_or(ValidationError::MissingField { field: "adminSecret" })?;

        let admin_server_name = self
            .admin_server_name
            .filter(|n| !n.is_empty())
            .ok_or(ValidationError::MissingField { field: "asName" })?;

        let port = self
            .admin_server_port
            .ok_or(ValidationError::MissingField { field: "asPort" })?;
        let admin_server_port = u16::try_from(port)
            .ok()
            .filter(|p| *p > 0)
            .ok_or(ValidationError::InvalidPort { port })?;

        let mut seen = HashSet::new();
        for channel in &self.exported_channels {
            if channel.is_empty() {
                return Err(ValidationError::EmptyChannel);
            }
            if !seen.insert(channel.as_str()) {
                return Err(ValidationError::DuplicateChannel {
                    name: channel.clone(),
                });
            }
        }

        let image = self
            .image
            .filter(|i| !i.is_empty())
            .unwrap_or(self.defaults.image);
        let pull_policy_explicit = self.image_pull_policy.is_some();
        let image_pull_policy = self
            .image_pull_policy
            .unwrap_or_else(|| ImagePullPolicy::derive_for(&image));

        Ok(DomainSpec {
            domain_uid: DomainUid::new(self.domain_uid),
            domain_name: self.domain_name,
            image,
            image_pull_policy,
            pull_policy_explicit,
            admin_secret,
            admin_server_name: ServerName::new(admin_server_name),
            admin_server_port,
            exported_channels: self.exported_channels,
            startup_control: self.startup_control.unwrap_or(self.defaults.startup_control),
        })
    }
}
