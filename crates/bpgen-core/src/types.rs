//! Type model — language-agnostic value shapes
//!
//! A `TypeSpec` describes the shape of a parameter or return value. Emitters
//! turn it into target-language syntax; the parser builds it from type
//! expressions such as `array of integer` or `list of pairs of integer and string`.
//!
//! Composite kinds own their element specs, so every tree is fully resolved
//! by construction.

use serde::{Deserialize, Serialize};

/// Shape of a declared parameter or return value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeSpec {
    Integer,
    Float,
    Boolean,
    String,
    Array(Box<TypeSpec>),
    /// Two or more components; a two-component tuple is a pair
    Tuple(Vec<TypeSpec>),
    /// A named type outside the built-in table
    Custom(String),
}

impl TypeSpec {
    pub fn array(element: TypeSpec) -> Self {
        TypeSpec::Array(Box::new(element))
    }

    pub fn pair(first: TypeSpec, second: TypeSpec) -> Self {
        TypeSpec::Tuple(vec![first, second])
    }

    /// True for Integer, Float, Boolean and String
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeSpec::Integer | TypeSpec::Float | TypeSpec::Boolean | TypeSpec::String
        )
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeSpec::Array(_))
    }

    /// Element type of an array, if this is one
    pub fn element(&self) -> Option<&TypeSpec> {
        match self {
            TypeSpec::Array(inner) => Some(inner),
            _ => None,
        }
    }

    /// First `Custom` name found in depth-first order
    pub fn find_custom(&self) -> Option<&str> {
        match self {
            TypeSpec::Custom(name) => Some(name),
            TypeSpec::Array(inner) => inner.find_custom(),
            TypeSpec::Tuple(items) => items.iter().find_map(TypeSpec::find_custom),
            _ => None,
        }
    }

    /// Visit this spec and every nested spec, parents first
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TypeSpec)) {
        visit(self);
        match self {
            TypeSpec::Array(inner) => inner.walk(visit),
            TypeSpec::Tuple(items) => {
                for item in items {
                    item.walk(visit);
                }
            }
            _ => {}
        }
    }
}

impl std::fmt::Display for TypeSpec {
    /// Canonical surface syntax; parsing it yields the same spec
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TypeSpec::Integer => write!(f, "integer"),
            TypeSpec::Float => write!(f, "float"),
            TypeSpec::Boolean => write!(f, "boolean"),
            TypeSpec::String => write!(f, "string"),
            TypeSpec::Array(inner) => write!(f, "array of {}", inner),
            TypeSpec::Tuple(items) if items.len() == 2 => {
                write!(f, "pair of {} and {}", items[0], items[1])
            }
            TypeSpec::Tuple(items) => {
                write!(f, "tuple of ")?;
                for (i, item) in items.iter().enumerate() {
                    if i == items.len() - 1 {
                        write!(f, " and ")?;
                    } else if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            TypeSpec::Custom(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kinds() {
        assert!(TypeSpec::Integer.is_scalar());
        assert!(TypeSpec::String.is_scalar());
        assert!(!TypeSpec::array(TypeSpec::Integer).is_scalar());
        assert!(!TypeSpec::Custom("node".into()).is_scalar());
    }

    #[test]
    fn test_display_nested() {
        let ty = TypeSpec::array(TypeSpec::pair(TypeSpec::Integer, TypeSpec::String));
        assert_eq!(ty.to_string(), "array of pair of integer and string");

        let triple = TypeSpec::Tuple(vec![TypeSpec::Integer, TypeSpec::Float, TypeSpec::Boolean]);
        assert_eq!(triple.to_string(), "tuple of integer, float and boolean");
    }

    #[test]
    fn test_find_custom_in_nested_tuple() {
        let ty = TypeSpec::array(TypeSpec::pair(
            TypeSpec::Integer,
            TypeSpec::Custom("quaternion".into()),
        ));
        assert_eq!(ty.find_custom(), Some("quaternion"));
        assert_eq!(TypeSpec::array(TypeSpec::Integer).find_custom(), None);
    }

    #[test]
    fn test_walk_visits_parents_first() {
        let ty = TypeSpec::array(TypeSpec::pair(TypeSpec::Integer, TypeSpec::String));
        let mut seen = Vec::new();
        ty.walk(&mut |t| seen.push(t.clone()));
        assert_eq!(seen.len(), 4);
        assert!(seen[0].is_array());
        assert_eq!(seen[2], TypeSpec::Integer);
        assert_eq!(seen[3], TypeSpec::String);
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(TypeSpec::array(TypeSpec::Integer)).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "array", "of": {"kind": "integer"}}));
    }
}
