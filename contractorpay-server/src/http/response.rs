//! Mutation response shape
//!
//! Successful mutations tell the caller which views to re-fetch; the
//! server never pushes updates itself.

use serde::Serialize;

/// Body of every successful mutating action
#[derive(Debug, Serialize)]
pub struct ActionOutcome {
    pub success: bool,
    /// View paths whose data this mutation touched
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub refresh: Vec<String>,
}

impl ActionOutcome {
    /// Success with the affected view paths.
    pub fn ok<I, S>(refresh: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            success: true,
            refresh: refresh.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_success_and_refresh() {
        let outcome = ActionOutcome::ok(["/dashboard", "/dashboard/workers"]);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["refresh"][1], "/dashboard/workers");
    }

    #[test]
    fn empty_refresh_is_omitted() {
        let outcome = ActionOutcome::ok(Vec::<String>::new());
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("refresh"));
    }
}
