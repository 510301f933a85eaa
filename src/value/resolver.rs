//! Path resolution against value trees
//!
//! Both operations are pure. `set` and `update` rebuild the spine from the
//! root to the target and return a fresh tree; the input is left untouched.

use super::form_value::FormValue;
use super::path::{FieldPath, PathSegment};
use crate::error::{EngineError, Result};

/// Look up the value at `path`
pub fn get<'a>(tree: &'a FormValue, path: &FieldPath) -> Result<&'a FormValue> {
    if path.is_empty() {
        return Err(EngineError::invalid_path(path, "path must not be empty"));
    }
    descend(tree, path, path.segments())
}

/// Like [`get`], but missing fields are `Ok(None)`; shape errors still fail
pub fn lookup<'a>(tree: &'a FormValue, path: &FieldPath) -> Result<Option<&'a FormValue>> {
    match get(tree, path) {
        Ok(value) => Ok(Some(value)),
        Err(EngineError::MissingField { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

/// Return a copy of `tree` with the value at `path` replaced
pub fn set(tree: &FormValue, path: &FieldPath, value: FormValue) -> Result<FormValue> {
    update(tree, path, |_| Ok(value))
}

/// Return a copy of `tree` with the value at `path` replaced by `f(current)`
pub fn update<F>(tree: &FormValue, path: &FieldPath, f: F) -> Result<FormValue>
where
    F: FnOnce(&FormValue) -> Result<FormValue>,
{
    if path.is_empty() {
        return Err(EngineError::invalid_path(path, "path must not be empty"));
    }
    rebuild(tree, path, path.segments(), f)
}

fn descend<'a>(
    node: &'a FormValue,
    full: &FieldPath,
    rest: &[PathSegment],
) -> Result<&'a FormValue> {
    let Some((head, tail)) = rest.split_first() else {
        return Ok(node);
    };
    let child = step(node, full, head)?;
    descend(child, full, tail)
}

fn step<'a>(node: &'a FormValue, full: &FieldPath, segment: &PathSegment) -> Result<&'a FormValue> {
    match (node, segment) {
        (FormValue::Record(fields), PathSegment::Name(name)) => {
            fields.get(name).ok_or_else(|| EngineError::MissingField { path: full.clone() })
        }
        (FormValue::List(items), PathSegment::Index(index)) => {
            items.get(*index).ok_or_else(|| EngineError::MissingField { path: full.clone() })
        }
        (other, PathSegment::Name(name)) => Err(EngineError::invalid_path(
            full,
            format!("cannot read field `{name}` of a {}", other.kind()),
        )),
        (other, PathSegment::Index(index)) => Err(EngineError::invalid_path(
            full,
            format!("cannot index [{index}] into a {}", other.kind()),
        )),
    }
}

fn rebuild<F>(node: &FormValue, full: &FieldPath, rest: &[PathSegment], f: F) -> Result<FormValue>
where
    F: FnOnce(&FormValue) -> Result<FormValue>,
{
    let Some((head, tail)) = rest.split_first() else {
        return f(node);
    };
    let child = step(node, full, head)?;
    let replaced = rebuild(child, full, tail, f)?;

    let mut copy = node.clone();
    match (&mut copy, head) {
        (FormValue::Record(fields), PathSegment::Name(name)) => {
            fields.insert(name.clone(), replaced);
        }
        (FormValue::List(items), PathSegment::Index(index)) => {
            items[*index] = replaced;
        }
        // `step` already rejected every other combination
        _ => {}
    }
    Ok(copy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    fn tree() -> FormValue {
        FormValue::record([
            ("name", FormValue::text("Ann")),
            (
                "socials",
                FormValue::record([
                    ("facebook", FormValue::text("fb")),
                    ("twitter", FormValue::text("tw")),
                ]),
            ),
            (
                "phonenumbers",
                FormValue::list([FormValue::text("111"), FormValue::text("222")]),
            ),
        ])
    }

    mod get {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_get_top_level() {
            assert_eq!(get(&tree(), &path("name")).unwrap(), &FormValue::text("Ann"));
        }

        #[test]
        fn test_get_nested_and_indexed() {
            let t = tree();
            assert_eq!(get(&t, &path("socials.twitter")).unwrap().as_text(), Some("tw"));
            assert_eq!(get(&t, &path("phonenumbers[1]")).unwrap().as_text(), Some("222"));
        }

        #[test]
        fn test_missing_field() {
            let t = tree();
            assert!(matches!(
                get(&t, &path("socials.myspace")),
                Err(EngineError::MissingField { .. })
            ));
            assert!(matches!(
                get(&t, &path("phonenumbers[5]")),
                Err(EngineError::MissingField { .. })
            ));
        }

        #[test]
        fn test_segment_type_mismatch_is_invalid_path() {
            let t = tree();
            assert!(matches!(
                get(&t, &path("socials[0]")),
                Err(EngineError::InvalidPath { .. })
            ));
            assert!(matches!(
                get(&t, &path("phonenumbers.first")),
                Err(EngineError::InvalidPath { .. })
            ));
            assert!(matches!(
                get(&t, &path("name.first")),
                Err(EngineError::InvalidPath { .. })
            ));
        }

        #[test]
        fn test_root_path_rejected() {
            assert!(matches!(
                get(&tree(), &FieldPath::root()),
                Err(EngineError::InvalidPath { .. })
            ));
        }

        #[test]
        fn test_lookup_maps_missing_to_none() {
            let t = tree();
            assert!(lookup(&t, &path("nickname")).unwrap().is_none());
            assert!(lookup(&t, &path("name")).unwrap().is_some());
            assert!(lookup(&t, &path("name[0]")).is_err());
        }
    }

    mod set {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_then_get_round_trip() {
            let t = tree();
            for p in ["name", "socials.facebook", "phonenumbers[0]"] {
                let updated = set(&t, &path(p), FormValue::text("new")).unwrap();
                assert_eq!(get(&updated, &path(p)).unwrap(), &FormValue::text("new"));
            }
        }

        #[test]
        fn test_set_leaves_input_untouched() {
            let original = tree();
            let updated = set(&original, &path("socials.facebook"), FormValue::text("x")).unwrap();
            assert_eq!(original, tree());
            assert_ne!(original, updated);
            assert_eq!(
                get(&updated, &path("socials.twitter")).unwrap(),
                get(&original, &path("socials.twitter")).unwrap()
            );
        }

        #[test]
        fn test_set_missing_field_fails() {
            assert!(matches!(
                set(&tree(), &path("nickname"), FormValue::text("x")),
                Err(EngineError::MissingField { .. })
            ));
            assert!(matches!(
                set(&tree(), &path("phonenumbers[2]"), FormValue::text("x")),
                Err(EngineError::MissingField { .. })
            ));
        }

        #[test]
        fn test_update_sees_current_value() {
            let updated = update(&tree(), &path("name"), |current| {
                Ok(FormValue::text(format!("{}!", current.as_text().unwrap_or_default())))
            })
            .unwrap();
            assert_eq!(get(&updated, &path("name")).unwrap().as_text(), Some("Ann!"));
        }
    }
}
