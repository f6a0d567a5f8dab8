//! Template definitions.
//!
//! A definition is exactly one of three schema versions. The blocks shared by
//! all versions live here once; version-specific private key settings have
//! their own types so a V2 definition cannot carry V3/V4-only members.

use serde::{Deserialize, Serialize};

use super::error::{ApiError, ApiResult};
use super::{Collapse, collapse, non_empty};

/// One of the three template schema versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplateDefinition {
    TemplateV2(TemplateV2),
    TemplateV3(TemplateV3),
    TemplateV4(TemplateV4),
}

impl TemplateDefinition {
    pub fn version(&self) -> &'static str {
        match self {
            TemplateDefinition::TemplateV2(_) => "TemplateV2",
            TemplateDefinition::TemplateV3(_) => "TemplateV3",
            TemplateDefinition::TemplateV4(_) => "TemplateV4",
        }
    }

    /// Pick the single populated variant.
    ///
    /// Supplying members of more than one version is rejected before dispatch.
    pub fn from_variants(
        v2: Option<TemplateV2>,
        v3: Option<TemplateV3>,
        v4: Option<TemplateV4>,
    ) -> ApiResult<Option<TemplateDefinition>> {
        let mut found: Vec<TemplateDefinition> = Vec::new();
        found.extend(v2.map(TemplateDefinition::TemplateV2));
        found.extend(v3.map(TemplateDefinition::TemplateV3));
        found.extend(v4.map(TemplateDefinition::TemplateV4));

        if found.len() > 1 {
            let versions = found
                .iter()
                .map(TemplateDefinition::version)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(ApiError::InvalidParameter {
                name: "Definition",
                reason: format!("members of more than one template version supplied ({versions})"),
            });
        }
        Ok(found.pop())
    }
}

/* ---- Enums ---- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidityPeriodType {
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeySpec {
    KeyExchange,
    Signature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HashAlgorithm {
    Sha256,
    Sha384,
    Sha512,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrivateKeyAlgorithm {
    Rsa,
    EcdhP256,
    EcdhP384,
    EcdhP521,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KeyUsagePropertyType {
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientCompatibilityV2 {
    #[serde(rename = "WINDOWS_SERVER_2003")]
    WindowsServer2003,
    #[serde(rename = "WINDOWS_SERVER_2008")]
    WindowsServer2008,
    #[serde(rename = "WINDOWS_SERVER_2008_R2")]
    WindowsServer2008R2,
    #[serde(rename = "WINDOWS_SERVER_2012")]
    WindowsServer2012,
    #[serde(rename = "WINDOWS_SERVER_2012_R2")]
    WindowsServer2012R2,
    #[serde(rename = "WINDOWS_SERVER_2016")]
    WindowsServer2016,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientCompatibilityV3 {
    #[serde(rename = "WINDOWS_SERVER_2008")]
    WindowsServer2008,
    #[serde(rename = "WINDOWS_SERVER_2008_R2")]
    WindowsServer2008R2,
    #[serde(rename = "WINDOWS_SERVER_2012")]
    WindowsServer2012,
    #[serde(rename = "WINDOWS_SERVER_2012_R2")]
    WindowsServer2012R2,
    #[serde(rename = "WINDOWS_SERVER_2016")]
    WindowsServer2016,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientCompatibilityV4 {
    #[serde(rename = "WINDOWS_SERVER_2012")]
    WindowsServer2012,
    #[serde(rename = "WINDOWS_SERVER_2012_R2")]
    WindowsServer2012R2,
    #[serde(rename = "WINDOWS_SERVER_2016")]
    WindowsServer2016,
}

/* ---- Shared Blocks ---- */

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ValidityPeriod {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_type: Option<ValidityPeriodType>,
}

impl_collapse!(ValidityPeriod {
    period,
    period_type
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CertificateValidity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renewal_period: Option<ValidityPeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_period: Option<ValidityPeriod>,
}

impl_collapse!(CertificateValidity {
    renewal_period,
    validity_period
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnrollmentFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_key_reuse_on_nt_token_keyset_storage_full: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_symmetric_algorithms: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_security_extension: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_invalid_certificate_from_personal_store: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_interaction_required: Option<bool>,
}

impl_collapse!(EnrollmentFlags {
    enable_key_reuse_on_nt_token_keyset_storage_full,
    include_symmetric_algorithms,
    no_security_extension,
    remove_invalid_certificate_from_personal_store,
    user_interaction_required,
});

/// Either a well-known policy type name or a custom object identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationPolicy {
    PolicyObjectIdentifier(String),
    PolicyType(String),
}

impl ApplicationPolicy {
    /// Dotted numeric values are object identifiers, anything else a policy type.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err("application policy cannot be empty".into());
        }
        let is_oid = raw.contains('.')
            && raw
                .split('.')
                .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));
        if is_oid {
            Ok(ApplicationPolicy::PolicyObjectIdentifier(raw.to_string()))
        } else {
            Ok(ApplicationPolicy::PolicyType(
                raw.to_ascii_uppercase().replace('-', "_"),
            ))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ApplicationPolicies {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policies: Option<Vec<ApplicationPolicy>>,
}

impl_collapse!(ApplicationPolicies { critical, policies });

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyUsageFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_encipherment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digital_signature: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_agreement: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_encipherment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_repudiation: Option<bool>,
}

impl_collapse!(KeyUsageFlags {
    data_encipherment,
    digital_signature,
    key_agreement,
    key_encipherment,
    non_repudiation,
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_flags: Option<KeyUsageFlags>,
}

impl_collapse!(KeyUsage {
    critical,
    usage_flags
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Extensions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_policies: Option<ApplicationPolicies>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_usage: Option<KeyUsage>,
}

impl_collapse!(Extensions {
    application_policies,
    key_usage
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GeneralFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_enrollment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_type: Option<bool>,
}

impl_collapse!(GeneralFlags {
    auto_enrollment,
    machine_type
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SubjectNameFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_common_name: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_directory_path: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_dns_as_cn: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub san_require_directory_guid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub san_require_dns: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub san_require_domain_dns: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub san_require_email: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub san_require_spn: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub san_require_upn: Option<bool>,
}

impl_collapse!(SubjectNameFlags {
    require_common_name,
    require_directory_path,
    require_dns_as_cn,
    require_email,
    san_require_directory_guid,
    san_require_dns,
    san_require_domain_dns,
    san_require_email,
    san_require_spn,
    san_require_upn,
});

/* ---- Private Key Settings ---- */

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyUsagePropertyFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decrypt: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_agreement: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sign: Option<bool>,
}

impl_collapse!(KeyUsagePropertyFlags {
    decrypt,
    key_agreement,
    sign
});

/// Either the `ALL` shorthand or an explicit set of property flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyUsageProperty {
    PropertyFlags(KeyUsagePropertyFlags),
    PropertyType(KeyUsagePropertyType),
}

impl KeyUsageProperty {
    /// Combine the two flat alternatives; both at once is an error.
    pub fn from_parts(
        property_type: Option<KeyUsagePropertyType>,
        flags: Option<KeyUsagePropertyFlags>,
    ) -> ApiResult<Option<Self>> {
        match (property_type, flags) {
            (Some(_), Some(_)) => Err(ApiError::InvalidParameter {
                name: "KeyUsageProperty",
                reason: "PropertyType and PropertyFlags are mutually exclusive".into(),
            }),
            (Some(t), None) => Ok(Some(KeyUsageProperty::PropertyType(t))),
            (None, Some(f)) => Ok(Some(KeyUsageProperty::PropertyFlags(f))),
            (None, None) => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrivateKeyAttributesV2 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_providers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_spec: Option<KeySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimal_key_length: Option<i32>,
}

impl_collapse!(PrivateKeyAttributesV2 {
    crypto_providers,
    key_spec,
    minimal_key_length
});

/// Private key attributes for V3 and V4 templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrivateKeyAttributesV3 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<PrivateKeyAlgorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crypto_providers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_spec: Option<KeySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_usage_property: Option<KeyUsageProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimal_key_length: Option<i32>,
}

impl_collapse!(PrivateKeyAttributesV3 {
    algorithm,
    crypto_providers,
    key_spec,
    key_usage_property,
    minimal_key_length,
});

pub type PrivateKeyAttributesV4 = PrivateKeyAttributesV3;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrivateKeyFlagsV2 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version: Option<ClientCompatibilityV2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exportable_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong_key_protection_required: Option<bool>,
}

impl_collapse!(PrivateKeyFlagsV2 {
    client_version,
    exportable_key,
    strong_key_protection_required
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrivateKeyFlagsV3 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version: Option<ClientCompatibilityV3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exportable_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_alternate_signature_algorithm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong_key_protection_required: Option<bool>,
}

impl_collapse!(PrivateKeyFlagsV3 {
    client_version,
    exportable_key,
    require_alternate_signature_algorithm,
    strong_key_protection_required,
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PrivateKeyFlagsV4 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version: Option<ClientCompatibilityV4>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exportable_key: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_alternate_signature_algorithm: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_same_key_renewal: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strong_key_protection_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_legacy_provider: Option<bool>,
}

impl_collapse!(PrivateKeyFlagsV4 {
    client_version,
    exportable_key,
    require_alternate_signature_algorithm,
    require_same_key_renewal,
    strong_key_protection_required,
    use_legacy_provider,
});

/* ---- Versions ---- */

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateV2 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_validity: Option<CertificateValidity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_flags: Option<EnrollmentFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_flags: Option<GeneralFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_attributes: Option<PrivateKeyAttributesV2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_flags: Option<PrivateKeyFlagsV2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name_flags: Option<SubjectNameFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_templates: Option<Vec<String>>,
}

impl_collapse!(TemplateV2 {
    certificate_validity,
    enrollment_flags,
    extensions,
    general_flags,
    private_key_attributes,
    private_key_flags,
    subject_name_flags,
    superseded_templates,
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateV3 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_validity: Option<CertificateValidity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_flags: Option<EnrollmentFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_flags: Option<GeneralFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_algorithm: Option<HashAlgorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_attributes: Option<PrivateKeyAttributesV3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_flags: Option<PrivateKeyFlagsV3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name_flags: Option<SubjectNameFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_templates: Option<Vec<String>>,
}

impl_collapse!(TemplateV3 {
    certificate_validity,
    enrollment_flags,
    extensions,
    general_flags,
    hash_algorithm,
    private_key_attributes,
    private_key_flags,
    subject_name_flags,
    superseded_templates,
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemplateV4 {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_validity: Option<CertificateValidity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_flags: Option<EnrollmentFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Extensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_flags: Option<GeneralFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash_algorithm: Option<HashAlgorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_attributes: Option<PrivateKeyAttributesV4>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_flags: Option<PrivateKeyFlagsV4>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name_flags: Option<SubjectNameFlags>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub superseded_templates: Option<Vec<String>>,
}

impl_collapse!(TemplateV4 {
    certificate_validity,
    enrollment_flags,
    extensions,
    general_flags,
    hash_algorithm,
    private_key_attributes,
    private_key_flags,
    subject_name_flags,
    superseded_templates,
});

/* ---- Collapsing Documents ---- */

// A definition read from a document may carry `{}` blocks and `[]` lists;
// these re-run the same collapsing the flag builders apply.

fn nested<T: Collapse>(value: Option<T>) -> Option<T> {
    value.and_then(collapse)
}

fn list<T>(values: Option<Vec<T>>) -> Option<Vec<T>> {
    values.and_then(non_empty)
}

fn certificate_validity(value: Option<CertificateValidity>) -> Option<CertificateValidity> {
    value.and_then(|v| {
        collapse(CertificateValidity {
            renewal_period: nested(v.renewal_period),
            validity_period: nested(v.validity_period),
        })
    })
}

fn extensions(value: Option<Extensions>) -> Option<Extensions> {
    value.and_then(|v| {
        collapse(Extensions {
            application_policies: v.application_policies.and_then(|p| {
                collapse(ApplicationPolicies {
                    critical: p.critical,
                    policies: list(p.policies),
                })
            }),
            key_usage: v.key_usage.and_then(|k| {
                collapse(KeyUsage {
                    critical: k.critical,
                    usage_flags: nested(k.usage_flags),
                })
            }),
        })
    })
}

fn key_usage_property(value: Option<KeyUsageProperty>) -> Option<KeyUsageProperty> {
    match value? {
        KeyUsageProperty::PropertyFlags(flags) => {
            collapse(flags).map(KeyUsageProperty::PropertyFlags)
        }
        other => Some(other),
    }
}

fn attributes_v2(value: Option<PrivateKeyAttributesV2>) -> Option<PrivateKeyAttributesV2> {
    value.and_then(|a| {
        collapse(PrivateKeyAttributesV2 {
            crypto_providers: list(a.crypto_providers),
            ..a
        })
    })
}

fn attributes_v3(value: Option<PrivateKeyAttributesV3>) -> Option<PrivateKeyAttributesV3> {
    value.and_then(|a| {
        collapse(PrivateKeyAttributesV3 {
            crypto_providers: list(a.crypto_providers),
            key_usage_property: key_usage_property(a.key_usage_property),
            ..a
        })
    })
}

impl TemplateV2 {
    fn collapsed(self) -> Option<Self> {
        collapse(TemplateV2 {
            certificate_validity: certificate_validity(self.certificate_validity),
            enrollment_flags: nested(self.enrollment_flags),
            extensions: extensions(self.extensions),
            general_flags: nested(self.general_flags),
            private_key_attributes: attributes_v2(self.private_key_attributes),
            private_key_flags: nested(self.private_key_flags),
            subject_name_flags: nested(self.subject_name_flags),
            superseded_templates: list(self.superseded_templates),
        })
    }
}

impl TemplateV3 {
    fn collapsed(self) -> Option<Self> {
        collapse(TemplateV3 {
            certificate_validity: certificate_validity(self.certificate_validity),
            enrollment_flags: nested(self.enrollment_flags),
            extensions: extensions(self.extensions),
            general_flags: nested(self.general_flags),
            hash_algorithm: self.hash_algorithm,
            private_key_attributes: attributes_v3(self.private_key_attributes),
            private_key_flags: nested(self.private_key_flags),
            subject_name_flags: nested(self.subject_name_flags),
            superseded_templates: list(self.superseded_templates),
        })
    }
}

impl TemplateV4 {
    fn collapsed(self) -> Option<Self> {
        collapse(TemplateV4 {
            certificate_validity: certificate_validity(self.certificate_validity),
            enrollment_flags: nested(self.enrollment_flags),
            extensions: extensions(self.extensions),
            general_flags: nested(self.general_flags),
            hash_algorithm: self.hash_algorithm,
            private_key_attributes: attributes_v3(self.private_key_attributes),
            private_key_flags: nested(self.private_key_flags),
            subject_name_flags: nested(self.subject_name_flags),
            superseded_templates: list(self.superseded_templates),
        })
    }
}

impl TemplateDefinition {
    /// Drop empty blocks and lists at every depth. A variant left with no
    /// members at all is rejected.
    pub fn collapsed(self) -> ApiResult<Self> {
        let version = self.version();
        let collapsed = match self {
            TemplateDefinition::TemplateV2(t) => t.collapsed().map(TemplateDefinition::TemplateV2),
            TemplateDefinition::TemplateV3(t) => t.collapsed().map(TemplateDefinition::TemplateV3),
            TemplateDefinition::TemplateV4(t) => t.collapsed().map(TemplateDefinition::TemplateV4),
        };
        collapsed.ok_or_else(|| ApiError::InvalidParameter {
            name: "Definition",
            reason: format!("{version} has no members"),
        })
    }
}
