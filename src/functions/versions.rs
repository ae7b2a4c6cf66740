use semver::{Version, VersionReq};
use serde::Serialize;
use std::sync::Arc;

use super::args::{arity, str_arg};
use super::typed;
use crate::errors::HelperError;
use crate::handler::FunctionHandler;
use crate::registry::FuncMap;

/// A parsed semantic version as templates see it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: String,
    pub metadata: String,
    pub original: String,
}

pub(crate) fn register(funcs: &mut FuncMap, handler: &Arc<FunctionHandler>) {
    funcs.insert(
        "semver",
        typed(handler, "semver", |args| {
            arity("semver", args, 1)?;
            semantic_version(str_arg("semver", args, 0)?)
        }),
    );
    funcs.insert(
        "semverCompare",
        typed(handler, "semverCompare", |args| {
            arity("semverCompare", args, 2)?;
            semver_compare(
                str_arg("semverCompare", args, 0)?,
                str_arg("semverCompare", args, 1)?,
            )
        }),
    );
}

pub fn semantic_version(input: &str) -> Result<SemanticVersion, HelperError> {
    let version = parse_version(input)?;
    Ok(SemanticVersion {
        major: version.major,
        minor: version.minor,
        patch: version.patch,
        prerelease: version.pre.to_string(),
        metadata: version.build.to_string(),
        original: input.to_string(),
    })
}

/// Whether `version` satisfies `constraint`
///
/// A bare version as the constraint means an exact match, so `1.2.3` does
/// not accept `1.2.4`. Anything else is a requirement such as `^1.2`,
/// `>= 1.0, < 2.0` or `~1.4`.
pub fn semver_compare(constraint: &str, version: &str) -> Result<bool, HelperError> {
    let version = parse_version(version)?;

    if let Ok(exact) = parse_version(constraint) {
        return Ok(exact == version);
    }

    let requirement = VersionReq::parse(constraint.trim()).map_err(|e| {
        HelperError::Parse(format!("invalid version constraint {constraint:?}: {e}"))
    })?;
    Ok(requirement.matches(&version))
}

fn parse_version(input: &str) -> Result<Version, HelperError> {
    let trimmed = input.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(trimmed)
        .map_err(|e| HelperError::Parse(format!("invalid semantic version {input:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{ErrorStrategy, HandlerOption};
    use serde_json::json;

    #[test]
    fn test_semver_fields() {
        let parsed = semantic_version("1.2.3-beta.1+c0ff33").unwrap();
        assert_eq!((parsed.major, parsed.minor, parsed.patch), (1, 2, 3));
        assert_eq!(parsed.prerelease, "beta.1");
        assert_eq!(parsed.metadata, "c0ff33");

        assert_eq!(
            serde_json::to_value(&parsed).unwrap(),
            json!({
                "Major": 1,
                "Minor": 2,
                "Patch": 3,
                "Prerelease": "beta.1",
                "Metadata": "c0ff33",
                "Original": "1.2.3-beta.1+c0ff33",
            })
        );
        assert_eq!(semantic_version("v2.0.0").unwrap().major, 2);
    }

    #[test]
    fn test_semver_compare() {
        assert!(semver_compare("1.2.3", "1.2.3").unwrap());
        assert!(!semver_compare("1.2.3", "1.2.4").unwrap());
        assert!(semver_compare("^1.2.0", "1.2.3").unwrap());
        assert!(!semver_compare("^1.2.0", "2.2.3").unwrap());
        assert!(semver_compare(">= 1.0, < 2.0", "1.9.9").unwrap());
    }

    #[test]
    fn test_semver_rejects_garbage() {
        assert!(matches!(semantic_version("one.two"), Err(HelperError::Parse(_))));
        assert!(semver_compare("^^1", "1.0.0").is_err());
        assert!(semver_compare("^1.0.0", "latest").is_err());
    }

    #[test]
    fn test_version_failures_masked() {
        let handler = Arc::new(FunctionHandler::new([HandlerOption::Strategy(
            ErrorStrategy::ReturnDefaultValue,
        )]));
        let mut funcs = FuncMap::new();
        register(&mut funcs, &handler);

        assert_eq!(
            funcs.call("semverCompare", &[json!("^1.0"), json!("latest")]).unwrap(),
            json!(false)
        );
        assert_eq!(funcs.call("semver", &[json!("x")]).unwrap()["Major"], json!(0));
        assert_eq!(handler.stats().snapshot().masked, 2);
    }
}
