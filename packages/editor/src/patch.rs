//! # Patches
//!
//! A patch is one validated edit intent against a Blueprint stylesheet.
//!
//! ## Semantics
//!
//! ### token-set
//! - Replaces the value of a custom property in `:root` or `.dark`
//!
//! ### component-edit-property
//! - Replaces the value of an existing declaration in a component block
//!
//! ### component-add-property
//! - Appends a declaration to a component block
//! - No-op if the block already declares the property
//!
//! Patches hold no source spans. They are resolved against whatever text
//! they are applied to, so a patch stays meaningful after earlier patches
//! have shifted offsets.

use blueprint_parser::{component_selector, is_custom_property, ComponentKey, ComponentScope, TokenScope};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Edit intent. Only constructible through validating constructors (or
/// deserialization, which runs the same checks).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PatchRepr", into = "PatchRepr")]
pub enum Patch {
    TokenSet(TokenSet),
    ComponentEditProperty(PropertyEdit),
    ComponentAddProperty(PropertyEdit),
}

/// Payload of a `token-set` patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    token_name: String,
    scope: TokenScope,
    new_value: String,
}

impl TokenSet {
    pub fn token_name(&self) -> &str {
        &self.token_name
    }

    pub fn scope(&self) -> TokenScope {
        self.scope
    }

    pub fn new_value(&self) -> &str {
        &self.new_value
    }
}

/// Payload of the two component patches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEdit {
    selector_name: String,
    scope: ComponentScope,
    property: String,
    new_value: String,
}

impl PropertyEdit {
    pub fn selector_name(&self) -> &str {
        &self.selector_name
    }

    pub fn scope(&self) -> ComponentScope {
        self.scope
    }

    pub fn key(&self) -> ComponentKey {
        ComponentKey::new(self.selector_name.clone(), self.scope)
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn new_value(&self) -> &str {
        &self.new_value
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("Empty value for '{0}'")]
    EmptyValue(String),

    #[error("Value for '{target}' contains '{found}'")]
    ForbiddenCharacter { target: String, found: char },

    #[error("Invalid token name: '{0}'")]
    InvalidTokenName(String),

    #[error("Invalid property name: '{0}'")]
    InvalidProperty(String),

    #[error("Not a component selector: '{0}'")]
    InvalidSelector(String),

    #[error("Selector '{selector}' does not belong to the {scope} scope")]
    ScopeMismatch {
        selector: String,
        scope: ComponentScope,
    },
}

impl Patch {
    /// Set the value of `token_name` in `scope`
    pub fn token_set(
        token_name: impl Into<String>,
        scope: TokenScope,
        new_value: impl Into<String>,
    ) -> Result<Self, PatchError> {
        let token_name = token_name.into().trim().to_string();
        if !is_custom_property(&token_name) {
            return Err(PatchError::InvalidTokenName(token_name));
        }
        let new_value = validate_value(&token_name, new_value.into())?;

        Ok(Patch::TokenSet(TokenSet {
            token_name,
            scope,
            new_value,
        }))
    }

    /// Set the value of an existing declaration on a component
    pub fn edit_property(
        selector_name: impl Into<String>,
        scope: ComponentScope,
        property: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Result<Self, PatchError> {
        property_edit(selector_name.into(), scope, property.into(), new_value.into())
            .map(Patch::ComponentEditProperty)
    }

    /// Append a declaration to a component unless it is already there
    pub fn add_property(
        selector_name: impl Into<String>,
        scope: ComponentScope,
        property: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Result<Self, PatchError> {
        property_edit(selector_name.into(), scope, property.into(), new_value.into())
            .map(Patch::ComponentAddProperty)
    }

    /// Wire name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Patch::TokenSet(_) => "token-set",
            Patch::ComponentEditProperty(_) => "component-edit-property",
            Patch::ComponentAddProperty(_) => "component-add-property",
        }
    }

    pub fn new_value(&self) -> &str {
        match self {
            Patch::TokenSet(p) => p.new_value(),
            Patch::ComponentEditProperty(p) | Patch::ComponentAddProperty(p) => p.new_value(),
        }
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Patch::TokenSet(p) => {
                write!(f, "token-set {} ({}) = {}", p.token_name, p.scope, p.new_value)
            }
            Patch::ComponentEditProperty(p) | Patch::ComponentAddProperty(p) => write!(
                f,
                "{} {} ({}) {}: {}",
                self.kind(),
                p.selector_name,
                p.scope,
                p.property,
                p.new_value
            ),
        }
    }
}

fn property_edit(
    selector_name: String,
    scope: ComponentScope,
    property: String,
    new_value: String,
) -> Result<PropertyEdit, PatchError> {
    let selector_name = match component_selector(&selector_name) {
        Some((canonical, actual)) if actual == scope => canonical,
        Some((canonical, _)) => {
            return Err(PatchError::ScopeMismatch {
                selector: canonical,
                scope,
            })
        }
        None => return Err(PatchError::InvalidSelector(selector_name)),
    };

    let property = property.trim().to_string();
    if !is_declaration_name(&property) {
        return Err(PatchError::InvalidProperty(property));
    }
    let new_value = validate_value(&property, new_value)?;

    Ok(PropertyEdit {
        selector_name,
        scope,
        property,
        new_value,
    })
}

/// Non-empty, no `:`, `;`, braces or whitespace
fn is_declaration_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, ':' | ';' | '{' | '}'))
}

fn validate_value(target: &str, value: String) -> Result<String, PatchError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PatchError::EmptyValue(target.to_string()));
    }
    if let Some(found) = value.chars().find(|c| matches!(c, ';' | '{' | '}')) {
        return Err(PatchError::ForbiddenCharacter {
            target: target.to_string(),
            found,
        });
    }
    Ok(value.to_string())
}

/// Wire format: `{"type": "token-set", "tokenName": ..., "scope": ..., "newValue": ...}`
#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum PatchRepr {
    #[serde(rename_all = "camelCase")]
    TokenSet {
        token_name: String,
        scope: TokenScope,
        new_value: String,
    },

    #[serde(rename_all = "camelCase")]
    ComponentEditProperty {
        selector_name: String,
        scope: ComponentScope,
        property: String,
        new_value: String,
    },

    #[serde(rename_all = "camelCase")]
    ComponentAddProperty {
        selector_name: String,
        scope: ComponentScope,
        property: String,
        new_value: String,
    },
}

impl TryFrom<PatchRepr> for Patch {
    type Error = PatchError;

    fn try_from(repr: PatchRepr) -> Result<Self, Self::Error> {
        match repr {
            PatchRepr::TokenSet {
                token_name,
                scope,
                new_value,
            } => Patch::token_set(token_name, scope, new_value),
            PatchRepr::ComponentEditProperty {
                selector_name,
                scope,
                property,
                new_value,
            } => Patch::edit_property(selector_name, scope, property, new_value),
            PatchRepr::ComponentAddProperty {
                selector_name,
                scope,
                property,
                new_value,
            } => Patch::add_property(selector_name, scope, property, new_value),
        }
    }
}

impl From<Patch> for PatchRepr {
    fn from(patch: Patch) -> Self {
        match patch {
            Patch::TokenSet(p) => PatchRepr::TokenSet {
                token_name: p.token_name,
                scope: p.scope,
                new_value: p.new_value,
            },
            Patch::ComponentEditProperty(p) => PatchRepr::ComponentEditProperty {
                selector_name: p.selector_name,
                scope: p.scope,
                property: p.property,
                new_value: p.new_value,
            },
            Patch::ComponentAddProperty(p) => PatchRepr::ComponentAddProperty {
                selector_name: p.selector_name,
                scope: p.scope,
                property: p.property,
                new_value: p.new_value,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_json_shape() {
        let patch = Patch::token_set("--gap", TokenScope::Root, "8px").unwrap();
        let json = serde_json::to_value(&patch).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "type": "token-set",
                "tokenName": "--gap",
                "scope": "root",
                "newValue": "8px"
            })
        );
    }

    #[test]
    fn test_patch_deserialization_validates() {
        let json = r#"{"type":"component-edit-property","selectorName":".bp-btn","scope":"light","property":"color","newValue":"  "}"#;
        let result: Result<Patch, _> = serde_json::from_str(json);
        assert!(result.is_err());

        let json = r#"{"type":"component-add-property","selectorName":".dark  .bp-btn","scope":"dark","property":"gap","newValue":"4px"}"#;
        let patch: Patch = serde_json::from_str(json).unwrap();
        match patch {
            Patch::ComponentAddProperty(p) => assert_eq!(p.selector_name(), ".dark .bp-btn"),
            other => panic!("unexpected patch: {:?}", other),
        }
    }

    #[test]
    fn test_empty_values_rejected() {
        assert_eq!(
            Patch::token_set("--gap", TokenScope::Root, "   "),
            Err(PatchError::EmptyValue("--gap".to_string()))
        );
        assert!(Patch::edit_property(".bp-btn", ComponentScope::Light, "color", "").is_err());
        assert!(Patch::add_property(".bp-btn", ComponentScope::Light, "gap", "").is_err());
    }

    #[test]
    fn test_values_are_trimmed() {
        let patch = Patch::token_set("--gap", TokenScope::Root, "  8px ").unwrap();
        assert_eq!(patch.new_value(), "8px");
    }

    #[test]
    fn test_forbidden_characters_rejected() {
        assert_eq!(
            Patch::token_set("--gap", TokenScope::Root, "8px; color: red"),
            Err(PatchError::ForbiddenCharacter {
                target: "--gap".to_string(),
                found: ';'
            })
        );
        assert!(Patch::edit_property(".bp-btn", ComponentScope::Light, "color", "red }").is_err());
    }

    #[test]
    fn test_invalid_names_rejected() {
        assert!(matches!(
            Patch::token_set("gap", TokenScope::Root, "8px"),
            Err(PatchError::InvalidTokenName(_))
        ));
        for bad in ["", "co lor", "color:", "a;b"] {
            assert!(matches!(
                Patch::edit_property(".bp-btn", ComponentScope::Light, bad, "red"),
                Err(PatchError::InvalidProperty(_))
            ));
        }
    }

    #[test]
    fn test_selector_validation() {
        assert!(matches!(
            Patch::edit_property("h1", ComponentScope::Light, "color", "red"),
            Err(PatchError::InvalidSelector(_))
        ));
        assert!(matches!(
            Patch::edit_property(".dark .bp-btn", ComponentScope::Light, "color", "red"),
            Err(PatchError::ScopeMismatch { .. })
        ));
        assert!(matches!(
            Patch::edit_property(".bp-btn", ComponentScope::Dark, "color", "red"),
            Err(PatchError::ScopeMismatch { .. })
        ));
    }

    #[test]
    fn test_display() {
        let patch = Patch::add_property(".bp-btn", ComponentScope::Light, "gap", "4px").unwrap();
        assert_eq!(patch.to_string(), "component-add-property .bp-btn (light) gap: 4px");
    }
}
