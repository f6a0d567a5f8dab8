//! Template definition flags.
//!
//! A definition can come from a JSON/YAML file (`--definition-file`) or from
//! flat per-version flags (`--v2-*`, `--v3-*`, `--v4-*`). Flags of one version
//! are folded into that version's nested blocks; blocks left empty are dropped.
//! Flags from more than one version, or a file plus flags, are rejected.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::shared::load_document;
use crate::api::definition::*;
use crate::api::model::parse_wire;
use crate::api::{ApiError, ApiResult, collapse, non_empty};

#[derive(Args, Debug, Clone, Default)]
pub struct DefinitionArgs {
    /// Read the whole definition from a JSON or YAML file, e.g. {"TemplateV4": {...}}
    #[arg(long, value_name = "PATH")]
    pub definition_file: Option<PathBuf>,

    #[command(flatten)]
    pub v2: V2Args,

    #[command(flatten)]
    pub v3: V3Args,

    #[command(flatten)]
    pub v4: V4Args,
}

impl DefinitionArgs {
    /// The supplied definition, if any.
    pub fn build(&self) -> Result<Option<TemplateDefinition>> {
        let from_flags =
            TemplateDefinition::from_variants(self.v2.build()?, self.v3.build()?, self.v4.build()?)?;

        match (&self.definition_file, from_flags) {
            (Some(_), Some(def)) => Err(ApiError::InvalidParameter {
                name: "Definition",
                reason: format!(
                    "--definition-file cannot be combined with {} flags",
                    def.version()
                ),
            }
            .into()),
            (Some(path), None) => {
                let loaded: TemplateDefinition = load_document(path)?;
                Ok(Some(loaded.collapsed()?))
            }
            (None, from_flags) => Ok(from_flags),
        }
    }
}

/* ---- Shared Blocks ---- */

/// The members every version shares, without their version prefix.
struct Common<'a> {
    validity_period: Option<i64>,
    validity_period_type: Option<ValidityPeriodType>,
    renewal_period: Option<i64>,
    renewal_period_type: Option<ValidityPeriodType>,
    enrollment: EnrollmentFlags,
    application_policies_critical: Option<bool>,
    application_policy: &'a [ApplicationPolicy],
    key_usage_critical: Option<bool>,
    usage: KeyUsageFlags,
    general: GeneralFlags,
    subject_name: SubjectNameFlags,
    superseded_template: &'a [String],
}

impl Common<'_> {
    fn certificate_validity(&self) -> Option<CertificateValidity> {
        collapse(CertificateValidity {
            renewal_period: collapse(ValidityPeriod {
                period: self.renewal_period,
                period_type: self.renewal_period_type,
            }),
            validity_period: collapse(ValidityPeriod {
                period: self.validity_period,
                period_type: self.validity_period_type,
            }),
        })
    }

    fn extensions(&self) -> Option<Extensions> {
        collapse(Extensions {
            application_policies: collapse(ApplicationPolicies {
                critical: self.application_policies_critical,
                policies: non_empty(self.application_policy.to_vec()),
            }),
            key_usage: collapse(KeyUsage {
                critical: self.key_usage_critical,
                usage_flags: collapse(self.usage.clone()),
            }),
        })
    }

    fn superseded_templates(&self) -> Option<Vec<String>> {
        non_empty(self.superseded_template.to_vec())
    }
}

/// Flat `--v2-*` flags for a version 2 definition.
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Template V2 definition")]
pub struct V2Args {
    /// Validity period length
    #[arg(long, value_name = "N")]
    pub v2_validity_period: Option<i64>,

    /// Validity period unit (hours, days, weeks, months, years)
    #[arg(long, value_name = "UNIT", value_parser = parse_wire::<ValidityPeriodType>)]
    pub v2_validity_period_type: Option<ValidityPeriodType>,

    /// Renewal period length
    #[arg(long, value_name = "N")]
    pub v2_renewal_period: Option<i64>,

    /// Renewal period unit
    #[arg(long, value_name = "UNIT", value_parser = parse_wire::<ValidityPeriodType>)]
    pub v2_renewal_period_type: Option<ValidityPeriodType>,

    /// Enrollment flag: reuse the key when the token keyset storage is full
    #[arg(long, value_name = "BOOL")]
    pub v2_enable_key_reuse_on_nt_token_keyset_storage_full: Option<bool>,

    /// Enrollment flag: include symmetric algorithms
    #[arg(long, value_name = "BOOL")]
    pub v2_include_symmetric_algorithms: Option<bool>,

    /// Enrollment flag: omit the security extension
    #[arg(long, value_name = "BOOL")]
    pub v2_no_security_extension: Option<bool>,

    /// Enrollment flag: remove invalid certificates from the personal store
    #[arg(long, value_name = "BOOL")]
    pub v2_remove_invalid_certificate_from_personal_store: Option<bool>,

    /// Enrollment flag: require user interaction
    #[arg(long, value_name = "BOOL")]
    pub v2_user_interaction_required: Option<bool>,

    /// Mark the application policies extension critical
    #[arg(long, value_name = "BOOL")]
    pub v2_application_policies_critical: Option<bool>,

    /// Application policy type or OID (repeatable)
    #[arg(long, value_name = "POLICY", value_parser = ApplicationPolicy::parse)]
    pub v2_application_policy: Vec<ApplicationPolicy>,

    /// Mark the key usage extension critical
    #[arg(long, value_name = "BOOL")]
    pub v2_key_usage_critical: Option<bool>,

    /// Key usage: data encipherment
    #[arg(long, value_name = "BOOL")]
    pub v2_data_encipherment: Option<bool>,

    /// Key usage: digital signature
    #[arg(long, value_name = "BOOL")]
    pub v2_digital_signature: Option<bool>,

    /// Key usage: key agreement
    #[arg(long, value_name = "BOOL")]
    pub v2_key_agreement: Option<bool>,

    /// Key usage: key encipherment
    #[arg(long, value_name = "BOOL")]
    pub v2_key_encipherment: Option<bool>,

    /// Key usage: non-repudiation
    #[arg(long, value_name = "BOOL")]
    pub v2_non_repudiation: Option<bool>,

    /// Allow autoenrollment
    #[arg(long, value_name = "BOOL")]
    pub v2_auto_enrollment: Option<bool>,

    /// Template is for machines (computers) rather than users
    #[arg(long, value_name = "BOOL")]
    pub v2_machine_type: Option<bool>,

    /// Cryptographic provider (repeatable)
    #[arg(long, value_name = "NAME")]
    pub v2_crypto_provider: Vec<String>,

    /// Key spec (key-exchange, signature)
    #[arg(long, value_name = "SPEC", value_parser = parse_wire::<KeySpec>)]
    pub v2_key_spec: Option<KeySpec>,

    /// Minimal key length
    #[arg(long, value_name = "BITS")]
    pub v2_minimal_key_length: Option<i32>,

    /// Minimum client compatibility, e.g. windows-server-2012-r2
    #[arg(long, value_name = "VERSION", value_parser = parse_wire::<ClientCompatibilityV2>)]
    pub v2_client_version: Option<ClientCompatibilityV2>,

    /// Allow the private key to be exported
    #[arg(long, value_name = "BOOL")]
    pub v2_exportable_key: Option<bool>,

    /// Require strong key protection
    #[arg(long, value_name = "BOOL")]
    pub v2_strong_key_protection_required: Option<bool>,

    /// Subject name: require common name
    #[arg(long, value_name = "BOOL")]
    pub v2_require_common_name: Option<bool>,

    /// Subject name: require directory path
    #[arg(long, value_name = "BOOL")]
    pub v2_require_directory_path: Option<bool>,

    /// Subject name: DNS name as common name
    #[arg(long, value_name = "BOOL")]
    pub v2_require_dns_as_cn: Option<bool>,

    /// Subject name: require email
    #[arg(long, value_name = "BOOL")]
    pub v2_require_email: Option<bool>,

    /// SAN: directory GUID
    #[arg(long, value_name = "BOOL")]
    pub v2_san_require_directory_guid: Option<bool>,

    /// SAN: DNS name
    #[arg(long, value_name = "BOOL")]
    pub v2_san_require_dns: Option<bool>,

    /// SAN: domain DNS
    #[arg(long, value_name = "BOOL")]
    pub v2_san_require_domain_dns: Option<bool>,

    /// SAN: email
    #[arg(long, value_name = "BOOL")]
    pub v2_san_require_email: Option<bool>,

    /// SAN: service principal name
    #[arg(long, value_name = "BOOL")]
    pub v2_san_require_spn: Option<bool>,

    /// SAN: user principal name
    #[arg(long, value_name = "BOOL")]
    pub v2_san_require_upn: Option<bool>,

    /// Name of a template this one supersedes (repeatable)
    #[arg(long, value_name = "NAME")]
    pub v2_superseded_template: Vec<String>,
}

/// Flat `--v3-*` flags for a version 3 definition.
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Template V3 definition")]
pub struct V3Args {
    /// Validity period length
    #[arg(long, value_name = "N")]
    pub v3_validity_period: Option<i64>,

    /// Validity period unit (hours, days, weeks, months, years)
    #[arg(long, value_name = "UNIT", value_parser = parse_wire::<ValidityPeriodType>)]
    pub v3_validity_period_type: Option<ValidityPeriodType>,

    /// Renewal period length
    #[arg(long, value_name = "N")]
    pub v3_renewal_period: Option<i64>,

    /// Renewal period unit
    #[arg(long, value_name = "UNIT", value_parser = parse_wire::<ValidityPeriodType>)]
    pub v3_renewal_period_type: Option<ValidityPeriodType>,

    /// Enrollment flag: reuse the key when the token keyset storage is full
    #[arg(long, value_name = "BOOL")]
    pub v3_enable_key_reuse_on_nt_token_keyset_storage_full: Option<bool>,

    /// Enrollment flag: include symmetric algorithms
    #[arg(long, value_name = "BOOL")]
    pub v3_include_symmetric_algorithms: Option<bool>,

    /// Enrollment flag: omit the security extension
    #[arg(long, value_name = "BOOL")]
    pub v3_no_security_extension: Option<bool>,

    /// Enrollment flag: remove invalid certificates from the personal store
    #[arg(long, value_name = "BOOL")]
    pub v3_remove_invalid_certificate_from_personal_store: Option<bool>,

    /// Enrollment flag: require user interaction
    #[arg(long, value_name = "BOOL")]
    pub v3_user_interaction_required: Option<bool>,

    /// Mark the application policies extension critical
    #[arg(long, value_name = "BOOL")]
    pub v3_application_policies_critical: Option<bool>,

    /// Application policy type or OID (repeatable)
    #[arg(long, value_name = "POLICY", value_parser = ApplicationPolicy::parse)]
    pub v3_application_policy: Vec<ApplicationPolicy>,

    /// Mark the key usage extension critical
    #[arg(long, value_name = "BOOL")]
    pub v3_key_usage_critical: Option<bool>,

    /// Key usage: data encipherment
    #[arg(long, value_name = "BOOL")]
    pub v3_data_encipherment: Option<bool>,

    /// Key usage: digital signature
    #[arg(long, value_name = "BOOL")]
    pub v3_digital_signature: Option<bool>,

    /// Key usage: key agreement
    #[arg(long, value_name = "BOOL")]
    pub v3_key_agreement: Option<bool>,

    /// Key usage: key encipherment
    #[arg(long, value_name = "BOOL")]
    pub v3_key_encipherment: Option<bool>,

    /// Key usage: non-repudiation
    #[arg(long, value_name = "BOOL")]
    pub v3_non_repudiation: Option<bool>,

    /// Allow autoenrollment
    #[arg(long, value_name = "BOOL")]
    pub v3_auto_enrollment: Option<bool>,

    /// Template is for machines (computers) rather than users
    #[arg(long, value_name = "BOOL")]
    pub v3_machine_type: Option<bool>,

    /// Hash algorithm (sha256, sha384, sha512)
    #[arg(long, value_name = "ALG", value_parser = parse_wire::<HashAlgorithm>)]
    pub v3_hash_algorithm: Option<HashAlgorithm>,

    /// Private key algorithm (rsa, ecdh-p256, ecdh-p384, ecdh-p521)
    #[arg(long, value_name = "ALG", value_parser = parse_wire::<PrivateKeyAlgorithm>)]
    pub v3_algorithm: Option<PrivateKeyAlgorithm>,

    /// Cryptographic provider (repeatable)
    #[arg(long, value_name = "NAME")]
    pub v3_crypto_provider: Vec<String>,

    /// Key spec (key-exchange, signature)
    #[arg(long, value_name = "SPEC", value_parser = parse_wire::<KeySpec>)]
    pub v3_key_spec: Option<KeySpec>,

    /// Minimal key length
    #[arg(long, value_name = "BITS")]
    pub v3_minimal_key_length: Option<i32>,

    /// Key usage property shorthand (all); excludes the property flags
    #[arg(long, value_name = "TYPE", value_parser = parse_wire::<KeyUsagePropertyType>)]
    pub v3_key_usage_property_type: Option<KeyUsagePropertyType>,

    /// Key usage property: decrypt
    #[arg(long, value_name = "BOOL")]
    pub v3_property_decrypt: Option<bool>,

    /// Key usage property: key agreement
    #[arg(long, value_name = "BOOL")]
    pub v3_property_key_agreement: Option<bool>,

    /// Key usage property: sign
    #[arg(long, value_name = "BOOL")]
    pub v3_property_sign: Option<bool>,

    /// Minimum client compatibility, e.g. windows-server-2012-r2
    #[arg(long, value_name = "VERSION", value_parser = parse_wire::<ClientCompatibilityV3>)]
    pub v3_client_version: Option<ClientCompatibilityV3>,

    /// Allow the private key to be exported
    #[arg(long, value_name = "BOOL")]
    pub v3_exportable_key: Option<bool>,

    /// Require an alternate signature algorithm
    #[arg(long, value_name = "BOOL")]
    pub v3_require_alternate_signature_algorithm: Option<bool>,

    /// Require strong key protection
    #[arg(long, value_name = "BOOL")]
    pub v3_strong_key_protection_required: Option<bool>,

    /// Subject name: require common name
    #[arg(long, value_name = "BOOL")]
    pub v3_require_common_name: Option<bool>,

    /// Subject name: require directory path
    #[arg(long, value_name = "BOOL")]
    pub v3_require_directory_path: Option<bool>,

    /// Subject name: DNS name as common name
    #[arg(long, value_name = "BOOL")]
    pub v3_require_dns_as_cn: Option<bool>,

    /// Subject name: require email
    #[arg(long, value_name = "BOOL")]
    pub v3_require_email: Option<bool>,

    /// SAN: directory GUID
    #[arg(long, value_name = "BOOL")]
    pub v3_san_require_directory_guid: Option<bool>,

    /// SAN: DNS name
    #[arg(long, value_name = "BOOL")]
    pub v3_san_require_dns: Option<bool>,

    /// SAN: domain DNS
    #[arg(long, value_name = "BOOL")]
    pub v3_san_require_domain_dns: Option<bool>,

    /// SAN: email
    #[arg(long, value_name = "BOOL")]
    pub v3_san_require_email: Option<bool>,

    /// SAN: service principal name
    #[arg(long, value_name = "BOOL")]
    pub v3_san_require_spn: Option<bool>,

    /// SAN: user principal name
    #[arg(long, value_name = "BOOL")]
    pub v3_san_require_upn: Option<bool>,

    /// Name of a template this one supersedes (repeatable)
    #[arg(long, value_name = "NAME")]
    pub v3_superseded_template: Vec<String>,
}

/// Flat `--v4-*` flags for a version 4 definition.
#[derive(Args, Debug, Clone, Default)]
#[command(next_help_heading = "Template V4 definition")]
pub struct V4Args {
    /// Validity period length
    #[arg(long, value_name = "N")]
    pub v4_validity_period: Option<i64>,

    /// Validity period unit (hours, days, weeks, months, years)
    #[arg(long, value_name = "UNIT", value_parser = parse_wire::<ValidityPeriodType>)]
    pub v4_validity_period_type: Option<ValidityPeriodType>,

    /// Renewal period length
    #[arg(long, value_name = "N")]
    pub v4_renewal_period: Option<i64>,

    /// Renewal period unit
    #[arg(long, value_name = "UNIT", value_parser = parse_wire::<ValidityPeriodType>)]
    pub v4_renewal_period_type: Option<ValidityPeriodType>,

    /// Enrollment flag: reuse the key when the token keyset storage is full
    #[arg(long, value_name = "BOOL")]
    pub v4_enable_key_reuse_on_nt_token_keyset_storage_full: Option<bool>,

    /// Enrollment flag: include symmetric algorithms
    #[arg(long, value_name = "BOOL")]
    pub v4_include_symmetric_algorithms: Option<bool>,

    /// Enrollment flag: omit the security extension
    #[arg(long, value_name = "BOOL")]
    pub v4_no_security_extension: Option<bool>,

    /// Enrollment flag: remove invalid certificates from the personal store
    #[arg(long, value_name = "BOOL")]
    pub v4_remove_invalid_certificate_from_personal_store: Option<bool>,

    /// Enrollment flag: require user interaction
    #[arg(long, value_name = "BOOL")]
    pub v4_user_interaction_required: Option<bool>,

    /// Mark the application policies extension critical
    #[arg(long, value_name = "BOOL")]
    pub v4_application_policies_critical: Option<bool>,

    /// Application policy type or OID (repeatable)
    #[arg(long, value_name = "POLICY", value_parser = ApplicationPolicy::parse)]
    pub v4_application_policy: Vec<ApplicationPolicy>,

    /// Mark the key usage extension critical
    #[arg(long, value_name = "BOOL")]
    pub v4_key_usage_critical: Option<bool>,

    /// Key usage: data encipherment
    #[arg(long, value_name = "BOOL")]
    pub v4_data_encipherment: Option<bool>,

    /// Key usage: digital signature
    #[arg(long, value_name = "BOOL")]
    pub v4_digital_signature: Option<bool>,

    /// Key usage: key agreement
    #[arg(long, value_name = "BOOL")]
    pub v4_key_agreement: Option<bool>,

    /// Key usage: key encipherment
    #[arg(long, value_name = "BOOL")]
    pub v4_key_encipherment: Option<bool>,

    /// Key usage: non-repudiation
    #[arg(long, value_name = "BOOL")]
    pub v4_non_repudiation: Option<bool>,

    /// Allow autoenrollment
    #[arg(long, value_name = "BOOL")]
    pub v4_auto_enrollment: Option<bool>,

    /// Template is for machines (computers) rather than users
    #[arg(long, value_name = "BOOL")]
    pub v4_machine_type: Option<bool>,

    /// Hash algorithm (sha256, sha384, sha512)
    #[arg(long, value_name = "ALG", value_parser = parse_wire::<HashAlgorithm>)]
    pub v4_hash_algorithm: Option<HashAlgorithm>,

    /// Private key algorithm (rsa, ecdh-p256, ecdh-p384, ecdh-p521)
    #[arg(long, value_name = "ALG", value_parser = parse_wire::<PrivateKeyAlgorithm>)]
    pub v4_algorithm: Option<PrivateKeyAlgorithm>,

    /// Cryptographic provider (repeatable)
    #[arg(long, value_name = "NAME")]
    pub v4_crypto_provider: Vec<String>,

    /// Key spec (key-exchange, signature)
    #[arg(long, value_name = "SPEC", value_parser = parse_wire::<KeySpec>)]
    pub v4_key_spec: Option<KeySpec>,

    /// Minimal key length
    #[arg(long, value_name = "BITS")]
    pub v4_minimal_key_length: Option<i32>,

    /// Key usage property shorthand (all); excludes the property flags
    #[arg(long, value_name = "TYPE", value_parser = parse_wire::<KeyUsagePropertyType>)]
    pub v4_key_usage_property_type: Option<KeyUsagePropertyType>,

    /// Key usage property: decrypt
    #[arg(long, value_name = "BOOL")]
    pub v4_property_decrypt: Option<bool>,

    /// Key usage property: key agreement
    #[arg(long, value_name = "BOOL")]
    pub v4_property_key_agreement: Option<bool>,

    /// Key usage property: sign
    #[arg(long, value_name = "BOOL")]
    pub v4_property_sign: Option<bool>,

    /// Minimum client compatibility, e.g. windows-server-2012-r2
    #[arg(long, value_name = "VERSION", value_parser = parse_wire::<ClientCompatibilityV4>)]
    pub v4_client_version: Option<ClientCompatibilityV4>,

    /// Allow the private key to be exported
    #[arg(long, value_name = "BOOL")]
    pub v4_exportable_key: Option<bool>,

    /// Require an alternate signature algorithm
    #[arg(long, value_name = "BOOL")]
    pub v4_require_alternate_signature_algorithm: Option<bool>,

    /// Renew with the same key
    #[arg(long, value_name = "BOOL")]
    pub v4_require_same_key_renewal: Option<bool>,

    /// Require strong key protection
    #[arg(long, value_name = "BOOL")]
    pub v4_strong_key_protection_required: Option<bool>,

    /// Use a legacy cryptographic provider
    #[arg(long, value_name = "BOOL")]
    pub v4_use_legacy_provider: Option<bool>,

    /// Subject name: require common name
    #[arg(long, value_name = "BOOL")]
    pub v4_require_common_name: Option<bool>,

    /// Subject name: require directory path
    #[arg(long, value_name = "BOOL")]
    pub v4_require_directory_path: Option<bool>,

    /// Subject name: DNS name as common name
    #[arg(long, value_name = "BOOL")]
    pub v4_require_dns_as_cn: Option<bool>,

    /// Subject name: require email
    #[arg(long, value_name = "BOOL")]
    pub v4_require_email: Option<bool>,

    /// SAN: directory GUID
    #[arg(long, value_name = "BOOL")]
    pub v4_san_require_directory_guid: Option<bool>,

    /// SAN: DNS name
    #[arg(long, value_name = "BOOL")]
    pub v4_san_require_dns: Option<bool>,

    /// SAN: domain DNS
    #[arg(long, value_name = "BOOL")]
    pub v4_san_require_domain_dns: Option<bool>,

    /// SAN: email
    #[arg(long, value_name = "BOOL")]
    pub v4_san_require_email: Option<bool>,

    /// SAN: service principal name
    #[arg(long, value_name = "BOOL")]
    pub v4_san_require_spn: Option<bool>,

    /// SAN: user principal name
    #[arg(long, value_name = "BOOL")]
    pub v4_san_require_upn: Option<bool>,

    /// Name of a template this one supersedes (repeatable)
    #[arg(long, value_name = "NAME")]
    pub v4_superseded_template: Vec<String>,
}

impl V2Args {
    fn common(&self) -> Common<'_> {
        Common {
            validity_period: self.v2_validity_period,
            validity_period_type: self.v2_validity_period_type,
            renewal_period: self.v2_renewal_period,
            renewal_period_type: self.v2_renewal_period_type,
            enrollment: EnrollmentFlags {
                enable_key_reuse_on_nt_token_keyset_storage_full: self.v2_enable_key_reuse_on_nt_token_keyset_storage_full,
                include_symmetric_algorithms: self.v2_include_symmetric_algorithms,
                no_security_extension: self.v2_no_security_extension,
                remove_invalid_certificate_from_personal_store: self.v2_remove_invalid_certificate_from_personal_store,
                user_interaction_required: self.v2_user_interaction_required,
            },
            application_policies_critical: self.v2_application_policies_critical,
            application_policy: &self.v2_application_policy,
            key_usage_critical: self.v2_key_usage_critical,
            usage: KeyUsageFlags {
                data_encipherment: self.v2_data_encipherment,
                digital_signature: self.v2_digital_signature,
                key_agreement: self.v2_key_agreement,
                key_encipherment: self.v2_key_encipherment,
                non_repudiation: self.v2_non_repudiation,
            },
            general: GeneralFlags {
                auto_enrollment: self.v2_auto_enrollment,
                machine_type: self.v2_machine_type,
            },
            subject_name: SubjectNameFlags {
                require_common_name: self.v2_require_common_name,
                require_directory_path: self.v2_require_directory_path,
                require_dns_as_cn: self.v2_require_dns_as_cn,
                require_email: self.v2_require_email,
                san_require_directory_guid: self.v2_san_require_directory_guid,
                san_require_dns: self.v2_san_require_dns,
                san_require_domain_dns: self.v2_san_require_domain_dns,
                san_require_email: self.v2_san_require_email,
                san_require_spn: self.v2_san_require_spn,
                san_require_upn: self.v2_san_require_upn,
            },
            superseded_template: &self.v2_superseded_template,
        }
    }

    pub fn build(&self) -> ApiResult<Option<TemplateV2>> {
        let common = self.common();
        Ok(collapse(TemplateV2 {
            certificate_validity: common.certificate_validity(),
            enrollment_flags: collapse(common.enrollment.clone()),
            extensions: common.extensions(),
            general_flags: collapse(common.general.clone()),
            private_key_attributes: collapse(PrivateKeyAttributesV2 {
                crypto_providers: non_empty(self.v2_crypto_provider.clone()),
                key_spec: self.v2_key_spec,
                minimal_key_length: self.v2_minimal_key_length,
            }),
            private_key_flags: collapse(PrivateKeyFlagsV2 {
                client_version: self.v2_client_version,
                exportable_key: self.v2_exportable_key,
                strong_key_protection_required: self.v2_strong_key_protection_required,
            }),
            subject_name_flags: collapse(common.subject_name.clone()),
            superseded_templates: common.superseded_templates(),
        }))
    }
}

impl V3Args {
    fn common(&self) -> Common<'_> {
        Common {
            validity_period: self.v3_validity_period,
            validity_period_type: self.v3_validity_period_type,
            renewal_period: self.v3_renewal_period,
            renewal_period_type: self.v3_renewal_period_type,
            enrollment: EnrollmentFlags {
                enable_key_reuse_on_nt_token_keyset_storage_full: self.v3_enable_key_reuse_on_nt_token_keyset_storage_full,
                include_symmetric_algorithms: self.v3_include_symmetric_algorithms,
                no_security_extension: self.v3_no_security_extension,
                remove_invalid_certificate_from_personal_store: self.v3_remove_invalid_certificate_from_personal_store,
                user_interaction_required: self.v3_user_interaction_required,
            },
            application_policies_critical: self.v3_application_policies_critical,
            application_policy: &self.v3_application_policy,
            key_usage_critical: self.v3_key_usage_critical,
            usage: KeyUsageFlags {
                data_encipherment: self.v3_data_encipherment,
                digital_signature: self.v3_digital_signature,
                key_agreement: self.v3_key_agreement,
                key_encipherment: self.v3_key_encipherment,
                non_repudiation: self.v3_non_repudiation,
            },
            general: GeneralFlags {
                auto_enrollment: self.v3_auto_enrollment,
                machine_type: self.v3_machine_type,
            },
            subject_name: SubjectNameFlags {
                require_common_name: self.v3_require_common_name,
                require_directory_path: self.v3_require_directory_path,
                require_dns_as_cn: self.v3_require_dns_as_cn,
                require_email: self.v3_require_email,
                san_require_directory_guid: self.v3_san_require_directory_guid,
                san_require_dns: self.v3_san_require_dns,
                san_require_domain_dns: self.v3_san_require_domain_dns,
                san_require_email: self.v3_san_require_email,
                san_require_spn: self.v3_san_require_spn,
                san_require_upn: self.v3_san_require_upn,
            },
            superseded_template: &self.v3_superseded_template,
        }
    }

    fn key_usage_property(&self) -> ApiResult<Option<KeyUsageProperty>> {
        KeyUsageProperty::from_parts(
            self.v3_key_usage_property_type,
            collapse(KeyUsagePropertyFlags {
                decrypt: self.v3_property_decrypt,
                key_agreement: self.v3_property_key_agreement,
                sign: self.v3_property_sign,
            }),
        )
    }

    pub fn build(&self) -> ApiResult<Option<TemplateV3>> {
        let common = self.common();
        Ok(collapse(TemplateV3 {
            certificate_validity: common.certificate_validity(),
            enrollment_flags: collapse(common.enrollment.clone()),
            extensions: common.extensions(),
            general_flags: collapse(common.general.clone()),
            hash_algorithm: self.v3_hash_algorithm,
            private_key_attributes: collapse(PrivateKeyAttributesV3 {
                algorithm: self.v3_algorithm,
                crypto_providers: non_empty(self.v3_crypto_provider.clone()),
                key_spec: self.v3_key_spec,
                key_usage_property: self.key_usage_property()?,
                minimal_key_length: self.v3_minimal_key_length,
            }),
            private_key_flags: collapse(PrivateKeyFlagsV3 {
                client_version: self.v3_client_version,
                exportable_key: self.v3_exportable_key,
                require_alternate_signature_algorithm: self.v3_require_alternate_signature_algorithm,
                strong_key_protection_required: self.v3_strong_key_protection_required,
            }),
            subject_name_flags: collapse(common.subject_name.clone()),
            superseded_templates: common.superseded_templates(),
        }))
    }
}

impl V4Args {
    fn common(&self) -> Common<'_> {
        Common {
            validity_period: self.v4_validity_period,
            validity_period_type: self.v4_validity_period_type,
            renewal_period: self.v4_renewal_period,
            renewal_period_type: self.v4_renewal_period_type,
            enrollment: EnrollmentFlags {
                enable_key_reuse_on_nt_token_keyset_storage_full: self.v4_enable_key_reuse_on_nt_token_keyset_storage_full,
                include_symmetric_algorithms: self.v4_include_symmetric_algorithms,
                no_security_extension: self.v4_no_security_extension,
                remove_invalid_certificate_from_personal_store: self.v4_remove_invalid_certificate_from_personal_store,
                user_interaction_required: self.v4_user_interaction_required,
            },
            application_policies_critical: self.v4_application_policies_critical,
            application_policy: &self.v4_application_policy,
            key_usage_critical: self.v4_key_usage_critical,
            usage: KeyUsageFlags {
                data_encipherment: self.v4_data_encipherment,
                digital_signature: self.v4_digital_signature,
                key_agreement: self.v4_key_agreement,
                key_encipherment: self.v4_key_encipherment,
                non_repudiation: self.v4_non_repudiation,
            },
            general: GeneralFlags {
                auto_enrollment: self.v4_auto_enrollment,
                machine_type: self.v4_machine_type,
            },
            subject_name: SubjectNameFlags {
                require_common_name: self.v4_require_common_name,
                require_directory_path: self.v4_require_directory_path,
                require_dns_as_cn: self.v4_require_dns_as_cn,
                require_email: self.v4_require_email,
                san_require_directory_guid: self.v4_san_require_directory_guid,
                san_require_dns: self.v4_san_require_dns,
                san_require_domain_dns: self.v4_san_require_domain_dns,
                san_require_email: self.v4_san_require_email,
                san_require_spn: self.v4_san_require_spn,
                san_require_upn: self.v4_san_require_upn,
            },
            superseded_template: &self.v4_superseded_template,
        }
    }

    fn key_usage_property(&self) -> ApiResult<Option<KeyUsageProperty>> {
        KeyUsageProperty::from_parts(
            self.v4_key_usage_property_type,
            collapse(KeyUsagePropertyFlags {
                decrypt: self.v4_property_decrypt,
                key_agreement: self.v4_property_key_agreement,
                sign: self.v4_property_sign,
            }),
        )
    }

    pub fn build(&self) -> ApiResult<Option<TemplateV4>> {
        let common = self.common();
        Ok(collapse(TemplateV4 {
            certificate_validity: common.certificate_validity(),
            enrollment_flags: collapse(common.enrollment.clone()),
            extensions: common.extensions(),
            general_flags: collapse(common.general.clone()),
            hash_algorithm: self.v4_hash_algorithm,
            private_key_attributes: collapse(PrivateKeyAttributesV4 {
                algorithm: self.v4_algorithm,
                crypto_providers: non_empty(self.v4_crypto_provider.clone()),
                key_spec: self.v4_key_spec,
                key_usage_property: self.key_usage_property()?,
                minimal_key_length: self.v4_minimal_key_length,
            }),
            private_key_flags: collapse(PrivateKeyFlagsV4 {
                client_version: self.v4_client_version,
                exportable_key: self.v4_exportable_key,
                require_alternate_signature_algorithm: self.v4_require_alternate_signature_algorithm,
                require_same_key_renewal: self.v4_require_same_key_renewal,
                strong_key_protection_required: self.v4_strong_key_protection_required,
                use_legacy_provider: self.v4_use_legacy_provider,
            }),
            subject_name_flags: collapse(common.subject_name.clone()),
            superseded_templates: common.superseded_templates(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;
    use std::io::Write;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        definition: DefinitionArgs,
    }

    fn parse(args: &[&str]) -> DefinitionArgs {
        let argv = std::iter::once("pcaad").chain(args.iter().copied());
        Harness::try_parse_from(argv).unwrap().definition
    }

    #[test]
    fn no_flags_no_definition() {
        assert!(parse(&[]).build().unwrap().is_none());
    }

    #[test]
    fn v3_flags_fold_into_nested_blocks() {
        let def = parse(&[
            "--v3-hash-algorithm",
            "sha256",
            "--v3-validity-period",
            "1",
            "--v3-validity-period-type",
            "years",
            "--v3-application-policy",
            "client-authentication",
            "--v3-application-policy",
            "1.2.3.4",
            "--v3-property-sign",
            "true",
            "--v3-client-version",
            "windows-server-2012",
            "--v3-san-require-upn",
            "true",
        ])
        .build()
        .unwrap()
        .unwrap();

        assert_eq!(
            serde_json::to_value(def).unwrap(),
            json!({
                "TemplateV3": {
                    "CertificateValidity": {
                        "ValidityPeriod": { "Period": 1, "PeriodType": "YEARS" }
                    },
                    "Extensions": {
                        "ApplicationPolicies": {
                            "Policies": [
                                { "PolicyType": "CLIENT_AUTHENTICATION" },
                                { "PolicyObjectIdentifier": "1.2.3.4" }
                            ]
                        }
                    },
                    "HashAlgorithm": "SHA256",
                    "PrivateKeyAttributes": {
                        "KeyUsageProperty": { "PropertyFlags": { "Sign": true } }
                    },
                    "PrivateKeyFlags": { "ClientVersion": "WINDOWS_SERVER_2012" },
                    "SubjectNameFlags": { "SanRequireUpn": true }
                }
            })
        );
    }

    #[test]
    fn v4_only_members() {
        let def = parse(&["--v4-use-legacy-provider", "false"]).build().unwrap().unwrap();
        assert_eq!(
            serde_json::to_value(def).unwrap(),
            json!({ "TemplateV4": { "PrivateKeyFlags": { "UseLegacyProvider": false } } })
        );
    }

    #[test]
    fn v2_rejects_later_version_values() {
        let argv = ["pcaad", "--v2-client-version", "windows-server-2003"];
        assert!(Harness::try_parse_from(argv).is_ok());
        let argv = ["pcaad", "--v4-client-version", "windows-server-2003"];
        assert!(Harness::try_parse_from(argv).is_err());
    }

    #[test]
    fn two_versions_are_rejected() {
        let err = parse(&["--v2-machine-type", "true", "--v3-machine-type", "true"])
            .build()
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::InvalidParameter { name: "Definition", .. })
        ));
    }

    #[test]
    fn property_type_and_flags_conflict() {
        let err = parse(&[
            "--v4-key-usage-property-type",
            "all",
            "--v4-property-decrypt",
            "true",
        ])
        .build()
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::InvalidParameter { name: "KeyUsageProperty", .. })
        ));
    }

    fn definition_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn file_and_flags_conflict() {
        let file = definition_file(r#"{"TemplateV2":{"SupersededTemplates":["Old"]}}"#);
        let path = file.path().to_str().unwrap();

        let from_file = parse(&["--definition-file", path]).build().unwrap().unwrap();
        assert_eq!(from_file.version(), "TemplateV2");

        let err = parse(&["--definition-file", path, "--v2-exportable-key", "true"])
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn file_definition_drops_empty_blocks() {
        let file = definition_file(
            r#"{"TemplateV3":{"CertificateValidity":{},"PrivateKeyFlags":{},"HashAlgorithm":"SHA256"}}"#,
        );
        let path = file.path().to_str().unwrap();
        let op = crate::api::template::UpdateTemplate {
            template_arn: Some("arn:t".into()),
            definition: parse(&["--definition-file", path]).build().unwrap(),
            reenroll_all_certificate_holders: None,
        };
        let body = crate::api::Operation::to_request(&op).unwrap().body.unwrap();
        assert_eq!(
            body,
            json!({ "Definition": { "TemplateV3": { "HashAlgorithm": "SHA256" } } })
        );
    }

    #[test]
    fn file_with_only_empty_blocks_is_rejected() {
        let file = definition_file(r#"{"TemplateV3":{"CertificateValidity":{},"PrivateKeyFlags":{}}}"#);
        let path = file.path().to_str().unwrap();
        let err = parse(&["--definition-file", path]).build().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::InvalidParameter { name: "Definition", .. })
        ));
    }
}
