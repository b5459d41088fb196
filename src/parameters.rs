use alloc::{
    borrow::ToOwned as _,
    collections::BTreeMap,
    string::{String, ToString as _},
    vec::Vec,
};
use tracing::debug;

use crate::errors::ParametersErrorKind;

/// A parameter value tree.
///
/// Values are owned and structural so placeholder resolution can recurse
/// into lists and maps and replace whole-string references type-preserving.
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<ParameterValue>),
    Map(BTreeMap<String, ParameterValue>),
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Vec<ParameterValue>> for ParameterValue {
    fn from(value: Vec<ParameterValue>) -> Self {
        Self::List(value)
    }
}

impl From<BTreeMap<String, ParameterValue>> for ParameterValue {
    fn from(value: BTreeMap<String, ParameterValue>) -> Self {
        Self::Map(value)
    }
}

/// Case-insensitive key/value store with a one-way freeze transition.
///
/// Keys are normalized to lower case. String values may reference other
/// parameters with `%name%` placeholders; [`ParameterStore::resolve`]
/// substitutes them in place, after which the store is typically frozen.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    values: BTreeMap<String, ParameterValue>,
    frozen: bool,
}

impl ParameterStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a parameter by name.
    ///
    /// # Errors
    /// Returns [`ParametersErrorKind::NotFound`] if the name isn't set.
    pub fn get(&self, name: &str) -> Result<ParameterValue, ParametersErrorKind> {
        let name = name.to_lowercase();
        match self.values.get(&name) {
            Some(value) => Ok(value.clone()),
            None => Err(ParametersErrorKind::NotFound { name }),
        }
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.values.contains_key(&name.to_lowercase())
    }

    /// Sets a parameter.
    ///
    /// # Errors
    /// Returns [`ParametersErrorKind::Frozen`] once the store is frozen.
    pub fn set(&mut self, name: &str, value: impl Into<ParameterValue>) -> Result<(), ParametersErrorKind> {
        if self.frozen {
            return Err(ParametersErrorKind::Frozen);
        }
        self.values.insert(name.to_lowercase(), value.into());
        Ok(())
    }

    /// Snapshot of all parameters.
    #[must_use]
    pub fn all(&self) -> BTreeMap<String, ParameterValue> {
        self.values.clone()
    }

    /// Substitutes `%name%` placeholders in all stored values.
    ///
    /// A string that is exactly one placeholder is replaced by the referenced
    /// value with its type preserved; placeholders embedded in longer strings
    /// substitute the scalar rendering of the referenced value; `%%` is an
    /// escaped literal `%`. A frozen store has already been resolved, so the
    /// call is a no-op then.
    ///
    /// # Errors
    /// - [`ParametersErrorKind::NotFound`] for a reference to a missing name
    /// - [`ParametersErrorKind::CircularReference`] when substitution re-enters
    ///   a name currently being resolved
    /// - [`ParametersErrorKind::NonScalarInline`] when a list or map value is
    ///   interpolated into the middle of a string
    pub fn resolve(&mut self) -> Result<(), ParametersErrorKind> {
        if self.frozen {
            return Ok(());
        }
        let mut resolved = BTreeMap::new();
        for (name, value) in &self.values {
            let mut resolving = alloc::vec![name.clone()];
            resolved.insert(name.clone(), self.resolve_value(value, &mut resolving)?);
        }
        self.values = resolved;
        debug!("Parameters resolved");
        Ok(())
    }

    /// Makes the store permanently read-only.
    pub fn freeze(&mut self) {
        self.frozen = true;
        debug!("Parameters frozen");
    }

    #[inline]
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn resolve_value(&self, value: &ParameterValue, resolving: &mut Vec<String>) -> Result<ParameterValue, ParametersErrorKind> {
        match value {
            ParameterValue::String(val) => self.resolve_string(val, resolving),
            ParameterValue::List(items) => items
                .iter()
                .map(|item| self.resolve_value(item, resolving))
                .collect::<Result<Vec<_>, _>>()
                .map(ParameterValue::List),
            ParameterValue::Map(map) => map
                .iter()
                .map(|(key, item)| Ok((key.clone(), self.resolve_value(item, resolving)?)))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .map(ParameterValue::Map),
            other => Ok(other.clone()),
        }
    }

    fn resolve_string(&self, value: &str, resolving: &mut Vec<String>) -> Result<ParameterValue, ParametersErrorKind> {
        if let Some(name) = sole_placeholder(value) {
            return self.resolve_reference(name, resolving);
        }

        let mut out = String::with_capacity(value.len());
        let mut chars = value.chars();
        while let Some(ch) = chars.next() {
            if ch != '%' {
                out.push(ch);
                continue;
            }
            let mut name = String::new();
            let mut terminated = false;
            for next in chars.by_ref() {
                if next == '%' {
                    terminated = true;
                    break;
                }
                name.push(next);
            }
            if !terminated {
                // unterminated placeholder, keep the rest literal
                out.push('%');
                out.push_str(&name);
                break;
            }
            if name.is_empty() {
                // "%%" escape
                out.push('%');
                continue;
            }
            if name.chars().any(char::is_whitespace) {
                // not a placeholder name, keep literal
                out.push('%');
                out.push_str(&name);
                out.push('%');
                continue;
            }
            let resolved = self.resolve_reference(&name, resolving)?;
            out.push_str(&render_scalar(&name, &resolved)?);
        }
        Ok(ParameterValue::String(out))
    }

    fn resolve_reference(&self, name: &str, resolving: &mut Vec<String>) -> Result<ParameterValue, ParametersErrorKind> {
        let name = name.to_lowercase();
        let Some(value) = self.values.get(&name) else {
            return Err(ParametersErrorKind::NotFound { name });
        };
        if resolving.contains(&name) {
            return Err(ParametersErrorKind::CircularReference {
                name,
                chain: resolving.clone(),
            });
        }
        resolving.push(name);
        let resolved = self.resolve_value(value, resolving)?;
        resolving.pop();
        Ok(resolved)
    }
}

impl<Name: Into<String>, Value: Into<ParameterValue>> FromIterator<(Name, Value)> for ParameterStore {
    fn from_iter<Iter: IntoIterator<Item = (Name, Value)>>(iter: Iter) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into().to_lowercase(), value.into()))
                .collect(),
            frozen: false,
        }
    }
}

fn sole_placeholder(value: &str) -> Option<&str> {
    let inner = value.strip_prefix('%')?.strip_suffix('%')?;
    (!inner.is_empty() && !inner.contains('%') && !inner.chars().any(char::is_whitespace)).then_some(inner)
}

fn render_scalar(name: &str, value: &ParameterValue) -> Result<String, ParametersErrorKind> {
    match value {
        ParameterValue::Null => Ok(String::new()),
        ParameterValue::Bool(val) => Ok(if *val { "true" } else { "false" }.to_owned()),
        ParameterValue::Int(val) => Ok(val.to_string()),
        ParameterValue::Float(val) => Ok(val.to_string()),
        ParameterValue::String(val) => Ok(val.clone()),
        ParameterValue::List(_) | ParameterValue::Map(_) => Err(ParametersErrorKind::NonScalarInline { name: name.to_owned() }),
    }
}
