//! Service-id naming conventions.
//!
//! Configuration layers historically address factories through method names
//! derived from service ids: `mysql_session_storage` maps to
//! `getMysqlSessionStorageService`, and `acme.mysql_session_storage` to
//! `getAcme_MysqlSessionStorageService`. Resolution inside this crate is
//! table-driven, so these transforms exist for interop with such layers and
//! for tooling that still speaks the method-name convention. `camelize` and
//! `underscore` are exact inverses over well-formed ids.

use alloc::string::String;

/// Camelizes a service id: capitalizes after each underscore or dot,
/// dropping underscores and turning dots into an `_`-prefixed boundary.
#[must_use]
pub fn camelize(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    let mut boundary = true;
    let mut dotted = false;
    for ch in id.chars() {
        if ch == '_' || ch == '.' {
            boundary = true;
            dotted = ch == '.';
            continue;
        }
        if boundary {
            if dotted {
                out.push('_');
            }
            out.extend(ch.to_uppercase());
            boundary = false;
            dotted = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Inverse of [`camelize`]: underscores are first turned into dots, then an
/// underscore is inserted at each case boundary and the result lower-cased.
#[must_use]
pub fn underscore(id: &str) -> String {
    let chars: alloc::vec::Vec<char> = id.chars().map(|ch| if ch == '_' { '.' } else { ch }).collect();
    let mut out = String::with_capacity(chars.len());
    for (index, &ch) in chars.iter().enumerate() {
        if ch.is_ascii_uppercase() && index > 0 {
            let prev = chars[index - 1];
            let next_is_lower = chars.get(index + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase() || prev.is_ascii_digit() || (prev.is_ascii_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.push(ch.to_ascii_lowercase());
    }
    out
}

/// Conventional factory method name for a service id, `get<Camelized>Service`.
#[must_use]
pub fn factory_method_name(id: &str) -> String {
    let mut out = String::from("get");
    out.push_str(&camelize(id));
    out.push_str("Service");
    out
}

/// Recovers a service id from a conventional factory method name.
///
/// Returns `None` if the name doesn't match `get<Camelized>Service` with a
/// non-empty middle part.
#[must_use]
pub fn id_from_factory_method(method: &str) -> Option<String> {
    let middle = method.strip_prefix("get")?.strip_suffix("Service")?;
    if middle.is_empty() {
        return None;
    }
    Some(underscore(middle))
}

/// Service ids are case-insensitive; the canonical form is lower-case.
#[inline]
#[must_use]
pub(crate) fn normalize_id(id: &str) -> String {
    id.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::{camelize, factory_method_name, id_from_factory_method, underscore};

    #[test]
    fn test_camelize() {
        assert_eq!(camelize("mysql_session_storage"), "MysqlSessionStorage");
        assert_eq!(camelize("acme.mysql_session_storage"), "Acme_MysqlSessionStorage");
        assert_eq!(camelize("foo"), "Foo");
        assert_eq!(camelize("foo.bar"), "Foo_Bar");
        assert_eq!(camelize("foo_bar.baz_qux"), "FooBar_BazQux");
    }

    #[test]
    fn test_underscore() {
        assert_eq!(underscore("MysqlSessionStorage"), "mysql_session_storage");
        assert_eq!(underscore("Acme_MysqlSessionStorage"), "acme.mysql_session_storage");
        assert_eq!(underscore("Foo"), "foo");
        assert_eq!(underscore("Foo_Bar"), "foo.bar");
        assert_eq!(underscore("HTMLParser"), "html_parser");
    }

    #[test]
    fn test_round_trip() {
        for id in ["mysql_session_storage", "acme.mysql_session_storage", "foo.bar", "request"] {
            assert_eq!(underscore(&camelize(id)), id);
        }
    }

    #[test]
    fn test_factory_method_name() {
        assert_eq!(factory_method_name("mysql_session_storage"), "getMysqlSessionStorageService");
        assert_eq!(
            factory_method_name("acme.mysql_session_storage"),
            "getAcme_MysqlSessionStorageService"
        );
    }

    #[test]
    fn test_id_from_factory_method() {
        assert_eq!(
            id_from_factory_method("getMysqlSessionStorageService").as_deref(),
            Some("mysql_session_storage")
        );
        assert_eq!(id_from_factory_method("getService"), None);
        assert_eq!(id_from_factory_method("resolveMailerService"), None);
        assert_eq!(id_from_factory_method("getMailer"), None);
    }
}
