//! Naming transformer
//!
//! Pure case conversions shared by every artifact, so that a field called
//! `published_at` is `PublishedAt` in Go structs, `publishedAt` in JSON tags
//! and scratch variables, and `published-at` in route segments, whichever
//! template asks for it. The same functions back the `ucc`, `lcc`, `kcc` and
//! `upp` template helpers.

use inflector::Inflector;

/// Convert to `UpperCamelCase`
///
/// # Examples
///
/// ```
/// # use pkgforge::naming::upper_camel;
/// assert_eq!(upper_camel("published_at"), "PublishedAt");
/// assert_eq!(upper_camel("title"), "Title");
/// ```
#[must_use]
pub fn upper_camel(input: &str) -> String {
    input.to_pascal_case()
}

/// Convert to `lowerCamelCase`
///
/// # Examples
///
/// ```
/// # use pkgforge::naming::lower_camel;
/// assert_eq!(lower_camel("published_at"), "publishedAt");
/// ```
#[must_use]
pub fn lower_camel(input: &str) -> String {
    input.to_camel_case()
}

/// Convert to kebab-case
///
/// # Examples
///
/// ```
/// # use pkgforge::naming::kebab;
/// assert_eq!(kebab("book_authors"), "book-authors");
/// ```
#[must_use]
pub fn kebab(input: &str) -> String {
    input.to_kebab_case()
}

/// Convert to UPPERCASE, leaving separators alone
#[must_use]
pub fn upper(input: &str) -> String {
    input.to_uppercase()
}

/// Add one; used for 1-based placeholder numbering
#[must_use]
pub const fn increment(value: i64) -> i64 {
    value.saturating_add(1)
}

/// Subtract one
#[must_use]
pub const fn decrement(value: i64) -> i64 {
    value.saturating_sub(1)
}

/// Plural form, used to suggest a table name
#[must_use]
pub fn pluralize(input: &str) -> String {
    input.to_plural()
}

/// Package identifier an import path is referred to by
///
/// # Examples
///
/// ```
/// # use pkgforge::naming::package_ident;
/// assert_eq!(package_ident("github.com/acme/shop/psql"), "psql");
/// assert_eq!(package_ident("github.com/acme/go-logger"), "go_logger");
/// ```
#[must_use]
pub fn package_ident(import_path: &str) -> String {
    import_path
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(import_path)
        .replace(['-', '.'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_upper_camel() {
        assert_eq!(upper_camel("title"), "Title");
        assert_eq!(upper_camel("published_at"), "PublishedAt");
        assert_eq!(upper_camel("book_author"), "BookAuthor");
    }

    #[test]
    fn test_lower_camel() {
        assert_eq!(lower_camel("title"), "title");
        assert_eq!(lower_camel("published_at"), "publishedAt");
    }

    #[test]
    fn test_kebab() {
        assert_eq!(kebab("books"), "books");
        assert_eq!(kebab("book_authors"), "book-authors");
    }

    #[test]
    fn test_upper() {
        assert_eq!(upper("book_author"), "BOOK_AUTHOR");
    }

    #[test]
    fn test_increment_decrement() {
        assert_eq!(increment(0), 1);
        assert_eq!(increment(4), 5);
        assert_eq!(decrement(1), 0);
        assert_eq!(decrement(i64::MIN), i64::MIN);
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("book"), "books");
        assert_eq!(pluralize("category"), "categories");
    }

    #[test]
    fn test_package_ident() {
        assert_eq!(package_ident("github.com/acme/shop/psql"), "psql");
        assert_eq!(package_ident("github.com/acme/shop/psql/"), "psql");
        assert_eq!(package_ident("logger"), "logger");
        assert_eq!(package_ident("gopkg.in/yaml.v2"), "yaml_v2");
    }

    proptest! {
        #[test]
        fn prop_case_conversions_are_idempotent(name in "[a-z]{2,8}(_[a-z]{2,8}){0,3}") {
            let ucc = upper_camel(&name);
            prop_assert_eq!(upper_camel(&ucc), ucc.clone());

            let lcc = lower_camel(&name);
            prop_assert_eq!(lower_camel(&lcc), lcc.clone());

            let kcc = kebab(&name);
            prop_assert_eq!(kebab(&kcc), kcc.clone());

            prop_assert_eq!(upper(&upper(&name)), upper(&name));
        }

        #[test]
        fn prop_case_conversions_are_pure(name in "[a-z]{2,8}(_[a-z]{2,8}){0,3}") {
            prop_assert_eq!(upper_camel(&name), upper_camel(&name));
            prop_assert_eq!(lower_camel(&name), lower_camel(&name));
            prop_assert_eq!(kebab(&name), kebab(&name));
        }
    }
}
