use serde::{Deserialize, Serialize};

/// Optional limits a caller places on an allocation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllocationConstraints {
    #[serde(default)]
    pub prioritize_traffic: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_projects: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_condition_score: Option<i64>,
}

impl AllocationConstraints {
    pub(crate) fn limits(&self) -> Result<Limits, ConstraintViolation> {
        let maximum_projects = match self.maximum_projects {
            Some(cap) if cap <= 0 => return Err(ConstraintViolation::MaximumProjects(cap)),
            Some(cap) => Some(usize::try_from(cap).unwrap_or(usize::MAX)),
            None => None,
        };

        let target_condition = match self.target_condition_score {
            Some(target) if !(0..=100).contains(&target) => {
                return Err(ConstraintViolation::TargetConditionScore(target))
            }
            Some(target) => Some(target as u8),
            None => None,
        };

        Ok(Limits {
            maximum_projects,
            target_condition,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Limits {
    pub(crate) maximum_projects: Option<usize>,
    pub(crate) target_condition: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintViolation {
    #[error("maximumProjects must be a positive integer, got {0}")]
    MaximumProjects(i64),
    #[error("targetConditionScore must be within 0-100, got {0}")]
    TargetConditionScore(i64),
}
