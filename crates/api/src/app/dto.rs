use serde::{Deserialize, Serialize};

use dancu_core::{DomainError, DomainResult, HouseholdId, UserId};

use crate::context::PrincipalContext;

/// `GET /api/nhan-khau?household_id=`
#[derive(Debug, Default, Deserialize)]
pub struct CitizenFilter {
    pub household_id: Option<String>,
}

impl CitizenFilter {
    pub fn household_id(&self) -> DomainResult<Option<HouseholdId>> {
        match self.household_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_: DomainError| DomainError::validation(format!("invalid household_id filter '{raw}'"))),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub user_id: UserId,
    pub username: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
}

impl From<&PrincipalContext> for WhoAmI {
    fn from(ctx: &PrincipalContext) -> Self {
        let principal = ctx.principal();
        Self {
            user_id: ctx.user_id(),
            username: ctx.username().to_string(),
            roles: ctx.roles().iter().map(|r| r.as_str().to_string()).collect(),
            permissions: principal.permissions.iter().map(|p| p.as_str().to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(v: Option<&str>) -> CitizenFilter {
        CitizenFilter {
            household_id: v.map(str::to_string),
        }
    }

    #[test]
    fn empty_filter_means_all_households() {
        assert_eq!(filter(None).household_id().unwrap(), None);
        assert_eq!(filter(Some(" ")).household_id().unwrap(), None);
    }

    #[test]
    fn numeric_filter_parses_and_garbage_is_rejected() {
        assert_eq!(filter(Some("7")).household_id().unwrap(), Some(HouseholdId::new(7)));
        assert!(matches!(
            filter(Some("seven")).household_id(),
            Err(DomainError::Validation(_))
        ));
    }
}
