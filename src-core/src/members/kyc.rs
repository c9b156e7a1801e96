//! Schema-driven checks for the details captured on the registration/KYC form.
//!
//! The form is described by a JSON schema of sections and fields. Each field may
//! be required and may carry a pattern and length bounds. The bundled schema
//! (`kyc_schema.json`) covers the fields of [`KycDetails`]; deployments can load
//! their own with [`KycSchema::from_json`].

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::errors::{Result, ValidationError};

lazy_static! {
    static ref STANDARD_SCHEMA: KycSchema =
        KycSchema::from_json(include_str!("kyc_schema.json")).unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycFieldValidation {
    pub pattern: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycFieldRule {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub validation: Option<KycFieldValidation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycSection {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub fields: Vec<KycFieldRule>,
}

#[derive(Debug, Deserialize)]
struct KycSchemaDocument {
    #[serde(default)]
    version: String,
    sections: Vec<KycSection>,
}

/// Why a single field failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KycFieldError {
    Missing(String),
    Invalid(String),
}

impl KycFieldError {
    pub fn message(&self) -> &str {
        match self {
            KycFieldError::Missing(message) | KycFieldError::Invalid(message) => message,
        }
    }
}

/// A loaded form schema with its patterns compiled
#[derive(Debug, Clone)]
pub struct KycSchema {
    version: String,
    sections: Vec<KycSection>,
    patterns: HashMap<String, Regex>,
}

impl KycSchema {
    pub fn from_json(body: &str) -> Result<Self> {
        let document: KycSchemaDocument = serde_json::from_str(body)?;

        let mut patterns = HashMap::new();
        for field in document.sections.iter().flat_map(|s| s.fields.iter()) {
            let pattern = field.validation.as_ref().and_then(|v| v.pattern.as_deref());
            if let Some(pattern) = pattern {
                let regex = Regex::new(pattern).map_err(|e| {
                    ValidationError::InvalidInput(format!(
                        "pattern for '{}' does not compile: {}",
                        field.id, e
                    ))
                })?;
                patterns.insert(field.id.clone(), regex);
            }
        }

        Ok(Self {
            version: document.version,
            sections: document.sections,
            patterns,
        })
    }

    /// The bundled schema
    pub fn standard() -> &'static KycSchema {
        &STANDARD_SCHEMA
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn sections(&self) -> &[KycSection] {
        &self.sections
    }

    /// Checks one value. Blank values only fail when the field is required;
    /// otherwise pattern, then minimum length, then maximum length.
    pub fn check_field(&self, field: &KycFieldRule, value: Option<&str>) -> Option<KycFieldError> {
        let value = value.map(str::trim).unwrap_or_default();
        if value.is_empty() {
            return field
                .required
                .then(|| KycFieldError::Missing(format!("{} is required", field.label)));
        }

        let Some(rules) = &field.validation else {
            return None;
        };
        if let Some(regex) = self.patterns.get(&field.id) {
            if !regex.is_match(value) {
                return Some(KycFieldError::Invalid(format!("{} format is invalid", field.label)));
            }
        }
        let length = value.chars().count();
        if let Some(min) = rules.min_length.filter(|min| length < *min) {
            return Some(KycFieldError::Invalid(format!(
                "{} must be at least {} characters",
                field.label, min
            )));
        }
        if let Some(max) = rules.max_length.filter(|max| length > *max) {
            return Some(KycFieldError::Invalid(format!(
                "{} must be no more than {} characters",
                field.label, max
            )));
        }
        None
    }

    /// Error message per failing field of one section, keyed by field id
    pub fn validate_section(
        &self,
        section: &KycSection,
        form: &HashMap<String, String>,
    ) -> BTreeMap<String, String> {
        section
            .fields
            .iter()
            .filter_map(|field| {
                self.check_field(field, form.get(&field.id).map(String::as_str))
                    .map(|err| (field.id.clone(), err.message().to_string()))
            })
            .collect()
    }

    /// Walks every section in order and reports the first failing field
    pub fn validate(&self, form: &HashMap<String, String>) -> Result<()> {
        for field in self.sections.iter().flat_map(|s| s.fields.iter()) {
            match self.check_field(field, form.get(&field.id).map(String::as_str)) {
                None => {}
                Some(KycFieldError::Missing(_)) => {
                    return Err(ValidationError::MissingField(field.id.clone()).into())
                }
                Some(KycFieldError::Invalid(message)) => {
                    return Err(ValidationError::InvalidInput(message).into())
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycDetails {
    pub name: String,
    pub mobile: String,
    pub pin_code: String,
    pub ifsc_code: String,
    pub account_number: String,
}

impl KycDetails {
    /// Form values keyed by field id. Spaces inside the mobile number are
    /// dropped and the IFSC code is upper-cased.
    pub fn to_form(&self) -> HashMap<String, String> {
        let mobile: String = self.mobile.chars().filter(|c| !c.is_whitespace()).collect();
        HashMap::from([
            ("name".to_string(), self.name.clone()),
            ("mobile".to_string(), mobile),
            ("pinCode".to_string(), self.pin_code.clone()),
            ("ifscCode".to_string(), self.ifsc_code.trim().to_uppercase()),
            ("accountNumber".to_string(), self.account_number.clone()),
        ])
    }

    /// Checks every field against the bundled schema and reports the first one that fails
    pub fn validate(&self) -> Result<()> {
        self.validate_with(KycSchema::standard())
    }

    pub fn validate_with(&self, schema: &KycSchema) -> Result<()> {
        schema.validate(&self.to_form())
    }
}
