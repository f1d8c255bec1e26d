//! Mount decision: effective prefix, admin flag, and documentation tag for one
//! route module. Deterministic in its inputs; recomputation yields the same result.

use crate::error::RegistryError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MountDecision {
    /// Prefix relative to the global prefix (always starts with `/`).
    pub effective_prefix: String,
    /// Global prefix + effective prefix; what the module is nested under.
    pub mount_prefix: String,
    pub tag: String,
    /// The effective prefix contains `admin` (literal substring, case-insensitive),
    /// so the superuser guard is injected.
    pub admin: bool,
    /// The prefix was derived from the folder segments rather than declared.
    pub derived_default: bool,
}

/// Compute the mount decision for a route module.
///
/// The declared prefix (trimmed) wins when present. Otherwise the default is derived
/// from the logical segments after `routes`: a trailing `_routes`/`_route` suffix is
/// stripped from the file segment, and a file segment equal to its parent folder is
/// collapsed (so `widget/widget_route` mounts at `/widget`, not `/widget/widget`).
pub fn decide(
    logical_name: &str,
    declared_prefix: &str,
    global_prefix: &str,
) -> Result<MountDecision, RegistryError> {
    let parts: Vec<&str> = logical_name.split('.').collect();
    let idx = parts
        .iter()
        .position(|p| *p == "routes")
        .ok_or_else(|| RegistryError::NoRouteRoot(logical_name.to_string()))?;
    let route_parts = &parts[idx + 1..];
    if route_parts.is_empty() {
        return Err(RegistryError::NoRouteRoot(logical_name.to_string()));
    }

    let declared = declared_prefix.trim();
    let (effective_prefix, derived_default) = if !declared.is_empty() {
        let prefix = if declared.starts_with('/') {
            declared.to_string()
        } else {
            format!("/{}", declared)
        };
        (prefix, false)
    } else {
        let subfolders = &route_parts[..route_parts.len() - 1];
        let file = route_parts[route_parts.len() - 1];
        let file = file
            .strip_suffix("_routes")
            .or_else(|| file.strip_suffix("_route"))
            .unwrap_or(file);
        let segments: Vec<&str> = if subfolders
            .last()
            .is_some_and(|last| last.eq_ignore_ascii_case(file))
        {
            subfolders.to_vec()
        } else {
            subfolders.iter().copied().chain([file]).collect()
        };
        let prefix = format!("/{}", segments.join("/"));
        tracing::info!(module = %logical_name, prefix = %prefix, "no prefix set; using default");
        (prefix, true)
    };

    let admin = effective_prefix.to_ascii_lowercase().contains("admin");
    let mount_prefix = format!("{}{}", global_prefix.trim_end_matches('/'), effective_prefix);

    let origin = if logical_name == "core" || logical_name.starts_with("core.") {
        "Core API"
    } else {
        "User API"
    };
    let tag_parts: Vec<String> = effective_prefix
        .split('/')
        .filter(|s| !s.is_empty())
        .map(capitalize)
        .collect();
    let tag = if tag_parts.is_empty() {
        origin.to_string()
    } else {
        format!("{} - {}", origin, tag_parts.join(" - "))
    };

    Ok(MountDecision {
        effective_prefix,
        mount_prefix,
        tag,
        admin,
        derived_default,
    })
}

/// Strip a redundant leading prefix from a declared route path, so nesting does not
/// double it. Only a whole duplicated segment counts: `/widgets` stays untouched
/// when the prefix is `/widget`.
pub fn normalize_route_path(effective_prefix: &str, path: &str) -> String {
    let prefix = effective_prefix.trim_end_matches('/');
    if !prefix.is_empty() {
        if let Some(rest) = path.strip_prefix(prefix) {
            if rest.is_empty() {
                return "/".to_string();
            }
            if rest.starts_with('/') {
                return rest.to_string();
            }
            // Shared text but not a segment boundary; fall through unchanged.
        }
    }
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_prefix_strips_route_suffix() {
        let d = decide("app.routes.v1.widget_route", "", "/api").unwrap();
        assert_eq!(d.effective_prefix, "/v1/widget");
        assert_eq!(d.mount_prefix, "/api/v1/widget");
        assert!(d.derived_default);
        assert!(!d.admin);
    }

    #[test]
    fn declared_prefix_wins_unchanged() {
        let d = decide("app.routes.v1.widget_route", "/custom", "/api").unwrap();
        assert_eq!(d.effective_prefix, "/custom");
        assert!(!d.derived_default);
    }

    #[test]
    fn folder_duplicate_collapses() {
        let d = decide("app.routes.widget.widget_route", "", "/api").unwrap();
        assert_eq!(d.effective_prefix, "/widget");
    }

    #[test]
    fn plural_routes_suffix_stripped() {
        let d = decide("app.routes.widget_routes", "", "/api").unwrap();
        assert_eq!(d.effective_prefix, "/widget");
    }

    #[test]
    fn admin_substring_injects_guard() {
        assert!(decide("core.routes.admin.user_route", "", "/api").unwrap().admin);
        assert!(decide("app.routes.thing_route", "/Admin/users", "/api").unwrap().admin);
        // Literal-substring policy: "administration" also matches. Deliberate; the
        // guard over-applies rather than under-applies.
        assert!(decide("app.routes.administration_route", "", "/api").unwrap().admin);
        assert!(!decide("app.routes.widget_route", "", "/api").unwrap().admin);
    }

    #[test]
    fn tags_distinguish_core_and_user_modules() {
        let core = decide("core.routes.access.auth_route", "/auth", "/api").unwrap();
        assert_eq!(core.tag, "Core API - Auth");

        let user = decide("app.routes.v1.widget_route", "", "/api").unwrap();
        assert_eq!(user.tag, "User API - V1 - Widget");
    }

    #[test]
    fn missing_routes_segment_is_an_error() {
        assert!(decide("app.models.widget", "", "/api").is_err());
        assert!(decide("app.routes", "", "/api").is_err());
    }

    #[test]
    fn decision_is_deterministic() {
        let a = decide("core.routes.language_route", "", "/api").unwrap();
        let b = decide("core.routes.language_route", "", "/api").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn duplicate_segment_stripping() {
        assert_eq!(normalize_route_path("/widget", "/widget/:id"), "/:id");
        assert_eq!(normalize_route_path("/widget", "/widget"), "/");
        assert_eq!(normalize_route_path("/widget", "/:id"), "/:id");
        // Segment boundary required: /widgets is not a duplicate of /widget.
        assert_eq!(normalize_route_path("/widget", "/widgets"), "/widgets");
        assert_eq!(normalize_route_path("/v1/widget", "/v1/widget/bulk"), "/bulk");
        // Only the full effective prefix counts; a bare file-segment repeat stays.
        assert_eq!(normalize_route_path("/v1/widget", "/widget/:id"), "/widget/:id");
        assert_eq!(normalize_route_path("/widget", ""), "/");
    }
}
