//! Status reference rule.

use crate::error::{Error, Result};
use crate::schema::{ModuleId, Status};

/// Check that a definition may reference another.
///
/// Within one module the referent's status must not exceed the referrer's
/// (`current < deprecated < obsolete`): a current definition must not
/// reference a deprecated or obsolete one, and a deprecated definition must
/// not reference an obsolete one. Cross-module references are unconstrained.
///
/// # Errors
///
/// [`Error::Denied`] naming both definitions.
pub fn check_status(
    referrer_status: Status,
    referrer_module: ModuleId,
    referrer_name: &str,
    referent_status: Status,
    referent_module: ModuleId,
    referent_name: &str,
) -> Result<()> {
    if referrer_module == referent_module && referrer_status < referent_status {
        return Err(Error::Denied(format!(
            "a {} definition \"{referrer_name}\" is not allowed to reference {} definition \"{referent_name}\"",
            referrer_status.as_str(),
            referent_status.as_str(),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mid(raw: u32) -> ModuleId {
        ModuleId::from_raw(raw).unwrap()
    }

    #[test]
    fn test_current_referencing_obsolete_same_module() {
        let err = check_status(
            Status::Current,
            mid(1),
            "x",
            Status::Obsolete,
            mid(1),
            "T",
        )
        .unwrap_err();
        assert!(matches!(err, Error::Denied(_)));
        assert!(err.to_string().contains("\"x\""));
        assert!(err.to_string().contains("\"T\""));
    }

    #[test]
    fn test_current_referencing_deprecated_same_module() {
        assert!(check_status(
            Status::Current,
            mid(1),
            "x",
            Status::Deprecated,
            mid(1),
            "T"
        )
        .is_err());
    }

    #[test]
    fn test_deprecated_referencing_obsolete_same_module() {
        assert!(check_status(
            Status::Deprecated,
            mid(1),
            "x",
            Status::Obsolete,
            mid(1),
            "T"
        )
        .is_err());
    }

    #[test]
    fn test_equal_or_lower_status_allowed() {
        assert!(check_status(Status::Current, mid(1), "x", Status::Current, mid(1), "T").is_ok());
        assert!(
            check_status(Status::Deprecated, mid(1), "x", Status::Deprecated, mid(1), "T").is_ok()
        );
        assert!(
            check_status(Status::Obsolete, mid(1), "x", Status::Deprecated, mid(1), "T").is_ok()
        );
        assert!(check_status(Status::Obsolete, mid(1), "x", Status::Current, mid(1), "T").is_ok());
    }

    #[test]
    fn test_cross_module_references_unconstrained() {
        assert!(check_status(
            Status::Current,
            mid(1),
            "x",
            Status::Obsolete,
            mid(2),
            "T"
        )
        .is_ok());
    }
}
