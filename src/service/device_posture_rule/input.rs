//! Posture check inputs, one payload per rule type
//!
//! The API carries every input attribute in one flat object. Here the
//! input is a sum type keyed by the rule type so each check only ever sees
//! the attributes that belong to it.

use crate::cloudflare::device_posture::DevicePostureRuleInput;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostureRuleType {
    SerialNumber,
    UniqueClientId,
    OsVersion,
    DomainJoined,
    Firewall,
    DiskEncryption,
    File,
    Application,
    ClientCertificate,
    Warp,
    Gateway,
}

impl PostureRuleType {
    pub const ALL: [PostureRuleType; 11] = [
        Self::SerialNumber,
        Self::UniqueClientId,
        Self::OsVersion,
        Self::DomainJoined,
        Self::Firewall,
        Self::DiskEncryption,
        Self::File,
        Self::Application,
        Self::ClientCertificate,
        Self::Warp,
        Self::Gateway,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SerialNumber => "serial_number",
            Self::UniqueClientId => "unique_client_id",
            Self::OsVersion => "os_version",
            Self::DomainJoined => "domain_joined",
            Self::Firewall => "firewall",
            Self::DiskEncryption => "disk_encryption",
            Self::File => "file",
            Self::Application => "application",
            Self::ClientCertificate => "client_certificate",
            Self::Warp => "warp",
            Self::Gateway => "gateway",
        }
    }
}

impl fmt::Display for PostureRuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported device posture rule type {0:?}")]
pub struct UnsupportedRuleType(pub String);

impl FromStr for PostureRuleType {
    type Err = UnsupportedRuleType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnsupportedRuleType(s.to_string()))
    }
}

/// `serial_number`, `unique_client_id`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceIdCheck {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsVersionCheck {
    pub version: Option<String>,
    pub operator: Option<String>,
    pub os_distro_name: Option<String>,
    pub os_distro_revision: Option<String>,
    pub os_version_extra: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainJoinedCheck {
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirewallCheck {
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiskEncryptionCheck {
    pub require_all: Option<bool>,
    pub check_disks: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCheck {
    pub path: Option<String>,
    pub exists: Option<bool>,
    pub sha256: Option<String>,
    pub thumbprint: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationCheck {
    pub path: Option<String>,
    pub sha256: Option<String>,
    pub thumbprint: Option<String>,
    pub running: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientCertificateCheck {
    pub certificate_id: Option<String>,
    pub cn: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostureInput {
    SerialNumber(DeviceIdCheck),
    UniqueClientId(DeviceIdCheck),
    OsVersion(OsVersionCheck),
    DomainJoined(DomainJoinedCheck),
    Firewall(FirewallCheck),
    DiskEncryption(DiskEncryptionCheck),
    File(FileCheck),
    Application(ApplicationCheck),
    ClientCertificate(ClientCertificateCheck),
    Warp,
    Gateway,
}

impl PostureInput {
    /// Pick out the attributes of `raw` that belong to `rule_type`
    pub fn from_wire(rule_type: PostureRuleType, raw: &DevicePostureRuleInput) -> Self {
        match rule_type {
            PostureRuleType::SerialNumber => Self::SerialNumber(DeviceIdCheck { id: raw.id.clone() }),
            PostureRuleType::UniqueClientId => {
                Self::UniqueClientId(DeviceIdCheck { id: raw.id.clone() })
            }
            PostureRuleType::OsVersion => Self::OsVersion(OsVersionCheck {
                version: raw.version.clone(),
                operator: raw.operator.clone(),
                os_distro_name: raw.os_distro_name.clone(),
                os_distro_revision: raw.os_distro_revision.clone(),
                os_version_extra: raw.os_version_extra.clone(),
            }),
            PostureRuleType::DomainJoined => Self::DomainJoined(DomainJoinedCheck {
                domain: raw.domain.clone(),
            }),
            PostureRuleType::Firewall => Self::Firewall(FirewallCheck {
                enabled: raw.enabled,
            }),
            PostureRuleType::DiskEncryption => Self::DiskEncryption(DiskEncryptionCheck {
                require_all: raw.require_all,
                check_disks: raw.check_disks.clone(),
            }),
            PostureRuleType::File => Self::File(FileCheck {
                path: raw.path.clone(),
                exists: raw.exists,
                sha256: raw.sha256.clone(),
                thumbprint: raw.thumbprint.clone(),
            }),
            PostureRuleType::Application => Self::Application(ApplicationCheck {
                path: raw.path.clone(),
                sha256: raw.sha256.clone(),
                thumbprint: raw.thumbprint.clone(),
                running: raw.running,
            }),
            PostureRuleType::ClientCertificate => {
                Self::ClientCertificate(ClientCertificateCheck {
                    certificate_id: raw.certificate_id.clone(),
                    cn: raw.cn.clone(),
                })
            }
            PostureRuleType::Warp => Self::Warp,
            PostureRuleType::Gateway => Self::Gateway,
        }
    }

    pub fn rule_type(&self) -> PostureRuleType {
        match self {
            Self::SerialNumber(_) => PostureRuleType::SerialNumber,
            Self::UniqueClientId(_) => PostureRuleType::UniqueClientId,
            Self::OsVersion(_) => PostureRuleType::OsVersion,
            Self::DomainJoined(_) => PostureRuleType::DomainJoined,
            Self::Firewall(_) => PostureRuleType::Firewall,
            Self::DiskEncryption(_) => PostureRuleType::DiskEncryption,
            Self::File(_) => PostureRuleType::File,
            Self::Application(_) => PostureRuleType::Application,
            Self::ClientCertificate(_) => PostureRuleType::ClientCertificate,
            Self::Warp => PostureRuleType::Warp,
            Self::Gateway => PostureRuleType::Gateway,
        }
    }

    pub fn to_wire(&self) -> DevicePostureRuleInput {
        let mut raw = DevicePostureRuleInput::default();

        match self {
            Self::SerialNumber(check) | Self::UniqueClientId(check) => {
                raw.id = check.id.clone();
            }
            Self::OsVersion(check) => {
                raw.version = check.version.clone();
                raw.operator = check.operator.clone();
                raw.os_distro_name = check.os_distro_name.clone();
                raw.os_distro_revision = check.os_distro_revision.clone();
                raw.os_version_extra = check.os_version_extra.clone();
            }
            Self::DomainJoined(check) => raw.domain = check.domain.clone(),
            Self::Firewall(check) => raw.enabled = check.enabled,
            Self::DiskEncryption(check) => {
                raw.require_all = check.require_all;
                raw.check_disks = check.check_disks.clone();
            }
            Self::File(check) => {
                raw.path = check.path.clone();
                raw.exists = check.exists;
                raw.sha256 = check.sha256.clone();
                raw.thumbprint = check.thumbprint.clone();
            }
            Self::Application(check) => {
                raw.path = check.path.clone();
                raw.sha256 = check.sha256.clone();
                raw.thumbprint = check.thumbprint.clone();
                raw.running = check.running;
            }
            Self::ClientCertificate(check) => {
                raw.certificate_id = check.certificate_id.clone();
                raw.cn = check.cn.clone();
            }
            Self::Warp | Self::Gateway => {}
        }

        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_type_parse_round_trip() {
        for rule_type in PostureRuleType::ALL {
            assert_eq!(rule_type.as_str().parse::<PostureRuleType>(), Ok(rule_type));
        }
        assert!("carbonblack".parse::<PostureRuleType>().is_err());
    }

    #[test]
    fn test_from_wire_keeps_type() {
        let raw = DevicePostureRuleInput::default();
        for rule_type in PostureRuleType::ALL {
            assert_eq!(PostureInput::from_wire(rule_type, &raw).rule_type(), rule_type);
        }
    }

    #[test]
    fn test_firewall_drops_unrelated_fields() {
        let raw = DevicePostureRuleInput {
            enabled: Some(true),
            id: Some("asdf".to_string()),
            version: Some("1.0.0".to_string()),
            ..Default::default()
        };
        let input = PostureInput::from_wire(PostureRuleType::Firewall, &raw);
        assert_eq!(
            input.to_wire(),
            DevicePostureRuleInput {
                enabled: Some(true),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_linux_distro_fields_belong_to_os_version() {
        let raw = DevicePostureRuleInput {
            version: Some("1.0.0".to_string()),
            operator: Some("<".to_string()),
            os_distro_name: Some("ubuntu".to_string()),
            os_distro_revision: Some("1.0.0".to_string()),
            ..Default::default()
        };
        let input = PostureInput::from_wire(PostureRuleType::OsVersion, &raw);
        assert_eq!(input.to_wire(), raw);
    }

    #[test]
    fn test_warp_has_no_input() {
        let raw = DevicePostureRuleInput {
            id: Some("x".to_string()),
            ..Default::default()
        };
        assert!(PostureInput::from_wire(PostureRuleType::Warp, &raw)
            .to_wire()
            .is_empty());
    }
}
