//! Naming conventions: snake_case/PascalCase conversion, version extraction, and
//! resource location resolution for the core/app module layout.

/// Root namespace a resource belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PackageRoot {
    /// Framework-owned modules (`core.*`).
    Core,
    /// Application-owned modules (`app.*`).
    App,
}

impl PackageRoot {
    pub fn logical_prefix(&self) -> &'static str {
        match self {
            PackageRoot::Core => "core",
            PackageRoot::App => "app",
        }
    }
}

/// Resolved location for a raw resource name such as `v1/product` or `core/user`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceLocation {
    pub root: PackageRoot,
    /// Dot-joined module path for the root (e.g. `app`, `core`).
    pub module_path: String,
    pub version: Option<String>,
    /// Normalized snake_case base name.
    pub base: String,
}

/// Convert a CamelCase or mixed identifier to snake_case.
/// e.g. "UserProfile" -> "user_profile", "languageTranslation" -> "language_translation"
pub fn to_snake_case(s: &str) -> String {
    let normalized = s.trim().replace(['-', ' '], "_");
    let mut out = String::with_capacity(normalized.len() + 4);
    let mut prev_lower_or_digit = false;
    for c in normalized.chars() {
        if c.is_uppercase() {
            if prev_lower_or_digit {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower_or_digit = false;
        } else {
            out.push(c);
            prev_lower_or_digit = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Convert a snake_case identifier to PascalCase.
/// e.g. "user_profile" -> "UserProfile"
pub fn to_pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split('_') {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            for c in chars {
                out.extend(c.to_lowercase());
            }
        }
    }
    out
}

/// True when the segment names an API version (`v1`, `v2`, ...).
pub fn is_version_segment(s: &str) -> bool {
    s.len() > 1 && s.starts_with('v') && s[1..].chars().all(|c| c.is_ascii_digit())
}

/// Split an API version off a resource path.
/// "v1/product" -> (Some("v1"), "product"); "product" -> (None, "product").
pub fn extract_version(name: &str) -> (Option<String>, String) {
    if let Some((head, rest)) = name.split_once('/') {
        if is_version_segment(head) {
            return (Some(head.to_string()), rest.to_string());
        }
    }
    (None, name.to_string())
}

/// Resolve the package root, version, and base name for a raw resource name.
/// "v1/product" -> App + v1; "core/user" -> Core; "product" -> App.
pub fn resolve_resource(name: &str) -> ResourceLocation {
    let trimmed = name.trim();
    if let Some(rest) = trimmed.strip_prefix("core/") {
        let (version, base) = extract_version(rest);
        return ResourceLocation {
            root: PackageRoot::Core,
            module_path: "core".to_string(),
            version,
            base: to_snake_case(&base),
        };
    }
    let (version, base) = extract_version(trimmed);
    ResourceLocation {
        root: PackageRoot::App,
        module_path: "app".to_string(),
        version,
        base: to_snake_case(&base),
    }
}

/// Standardized names for one resource component.
/// ("languageTranslation", "repository") ->
///   ("language_translation", "language_translation_repository", "LanguageTranslationRepository")
/// The "model" suffix is dropped from file names: ("user", "model") -> ("user", "user", "User").
pub fn normalize_resource_names(raw_name: &str, component_suffix: &str) -> (String, String, String) {
    let last = raw_name.rsplit('/').next().unwrap_or(raw_name);
    let base = to_snake_case(last);
    if component_suffix.eq_ignore_ascii_case("model") {
        let type_name = to_pascal_case(&base);
        (base.clone(), base, type_name)
    } else {
        let suffix = to_snake_case(component_suffix);
        let file_name = format!("{}_{}", base, suffix);
        let type_name = format!("{}{}", to_pascal_case(&base), to_pascal_case(&suffix));
        (base, file_name, type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_handles_camel_and_separators() {
        assert_eq!(to_snake_case("UserProfile"), "user_profile");
        assert_eq!(to_snake_case("languageTranslation"), "language_translation");
        assert_eq!(to_snake_case("user-profile item"), "user_profile_item");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
    }

    #[test]
    fn pascal_case_round_trips() {
        assert_eq!(to_pascal_case("user_profile"), "UserProfile");
        assert_eq!(to_pascal_case("widget"), "Widget");
        assert_eq!(to_snake_case(&to_pascal_case("auth_token")), "auth_token");
    }

    #[test]
    fn version_extraction() {
        assert_eq!(extract_version("v1/product"), (Some("v1".into()), "product".into()));
        assert_eq!(extract_version("v12/thing"), (Some("v12".into()), "thing".into()));
        assert_eq!(extract_version("product"), (None, "product".into()));
        assert_eq!(extract_version("version/product"), (None, "version/product".into()));
    }

    #[test]
    fn resource_resolution() {
        let loc = resolve_resource("v1/product");
        assert_eq!(loc.root, PackageRoot::App);
        assert_eq!(loc.version.as_deref(), Some("v1"));
        assert_eq!(loc.base, "product");

        let loc = resolve_resource("core/user");
        assert_eq!(loc.root, PackageRoot::Core);
        assert_eq!(loc.version, None);
        assert_eq!(loc.base, "user");

        let loc = resolve_resource("product");
        assert_eq!(loc.root, PackageRoot::App);
        assert_eq!(loc.module_path, "app");
    }

    #[test]
    fn resource_name_normalization() {
        assert_eq!(
            normalize_resource_names("languageTranslation", "repository"),
            (
                "language_translation".into(),
                "language_translation_repository".into(),
                "LanguageTranslationRepository".into()
            )
        );
        assert_eq!(
            normalize_resource_names("user", "model"),
            ("user".into(), "user".into(), "User".into())
        );
        assert_eq!(
            normalize_resource_names("v1/widget", "service"),
            ("widget".into(), "widget_service".into(), "WidgetService".into())
        );
    }
}
