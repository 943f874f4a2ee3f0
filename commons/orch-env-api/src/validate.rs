use std::fmt;

use crate::{v1, v2};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub path: &'static str,
    pub reason: &'static str,
}

/// Admission-time rejection; never coerced into a valid value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub resource: Option<String>,
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn has_path(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }

    pub fn with_resource(mut self, name: Option<String>) -> Self {
        self.resource = name;
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource {
            Some(name) => write!(f, "Environment {name:?} is invalid: ")?,
            None => write!(f, "Environment is invalid: ")?,
        }
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", v.path, v.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

const REQUIRED: &str = "Required value";

pub const PATH_APPLICATION_NAME: &str = "spec.forProvider.applicationName";
pub const PATH_ENVIRONMENT_TYPE: &str = "spec.forProvider.environmentType";
pub const PATH_OWNER: &str = "spec.forProvider.owner";

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn finish(violations: Vec<FieldViolation>) -> Result<(), ValidationError> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError {
            resource: None,
            violations,
        })
    }
}

fn common_required(environment_type: &str, owner: &str) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    if blank(environment_type) {
        out.push(FieldViolation {
            path: PATH_ENVIRONMENT_TYPE,
            reason: REQUIRED,
        });
    }
    if blank(owner) {
        out.push(FieldViolation {
            path: PATH_OWNER,
            reason: REQUIRED,
        });
    }
    out
}

/// Fields required by every schema generation.
pub fn validate_common(environment_type: &str, owner: &str) -> Result<(), ValidationError> {
    finish(common_required(environment_type, owner))
}

pub fn validate_v1(params: &v1::EnvironmentParameters) -> Result<(), ValidationError> {
    finish(common_required(&params.environment_type, &params.owner))
}

pub fn validate_v2(params: &v2::EnvironmentParameters) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    if blank(&params.application_name) {
        violations.push(FieldViolation {
            path: PATH_APPLICATION_NAME,
            reason: REQUIRED,
        });
    }
    violations.extend(common_required(&params.environment_type, &params.owner));
    finish(violations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn v1_collects_all_violations() {
        let err = validate_v1(&v1::EnvironmentParameters::default()).unwrap_err();
        assert!(err.has_path(PATH_ENVIRONMENT_TYPE));
        assert!(err.has_path(PATH_OWNER));
        assert!(!err.has_path(PATH_APPLICATION_NAME));
    }

    #[test]
    fn v2_requires_application_name() {
        let p = v2::EnvironmentParameters {
            application_name: "  ".into(),
            environment_type: "dev".into(),
            owner: "alice".into(),
            expiration_time: None,
        };
        let err = validate_v2(&p).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(
            err.with_resource(Some("demo".into())).to_string(),
            "Environment \"demo\" is invalid: spec.forProvider.applicationName: Required value"
        );
    }
}
