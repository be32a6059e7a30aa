use locsync_core::TranslationTask;
use serde_json::{Map, Value};

use crate::Catalog;

/// Target catalog after placeholder insertion, plus the tasks that fill it.
#[derive(Debug, Clone)]
pub struct CatalogDiff {
    pub target: Catalog,
    pub tasks: Vec<TranslationTask>,
}

/// A target leaf needs filling unless it already holds a non-empty string.
pub fn is_missing(target: Option<&Value>) -> bool {
    match target {
        Some(Value::String(s)) => s.is_empty(),
        _ => true,
    }
}

/// Walk `source` and `target` together, inserting an empty string into
/// `target` for every missing leaf. Returns one task per inserted leaf, in
/// pre-order source key order.
///
/// Only objects and strings in `source` are considered. Numbers, booleans,
/// null and arrays are skipped and the target is left alone at those keys.
/// A non-object target value where the source has an object is replaced by
/// an empty object before descending.
pub fn diff(source: &Catalog, target: &mut Catalog) -> Vec<TranslationTask> {
    let mut tasks = Vec::new();
    let mut path = Vec::new();
    walk(source, target, &mut path, &mut tasks);
    tasks
}

/// Owned variant of [`diff`] operating on whole catalogs.
pub fn diff_catalog(source: &Catalog, mut target: Catalog) -> CatalogDiff {
    let tasks = diff(source, &mut target);
    CatalogDiff { target, tasks }
}

fn walk(
    source: &Catalog,
    target: &mut Catalog,
    path: &mut Vec<String>,
    tasks: &mut Vec<TranslationTask>,
) {
    for (key, value) in source {
        match value {
            Value::Object(child_source) => {
                let slot = target
                    .entry(key.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                let child_target = ensure_object(slot);
                path.push(key.clone());
                walk(child_source, child_target, path, tasks);
                path.pop();
            }
            Value::String(text) => {
                if is_missing(target.get(key)) {
                    target.insert(key.clone(), Value::String(String::new()));
                    let mut leaf_path = path.clone();
                    leaf_path.push(key.clone());
                    tasks.push(TranslationTask {
                        path: leaf_path,
                        source_text: text.clone(),
                    });
                }
            }
            _ => {}
        }
    }
}

fn ensure_object(slot: &mut Value) -> &mut Catalog {
    if !slot.is_object() {
        *slot = Value::Object(Map::new());
    }
    let Value::Object(map) = slot else {
        unreachable!("slot coerced to an object above")
    };
    map
}

/// Write `value` at `path`, creating (or coercing) intermediate objects.
/// An empty path writes nothing and returns `false`.
pub fn set_at_path(root: &mut Catalog, path: &[String], value: Value) -> bool {
    let Some((leaf, parents)) = path.split_last() else {
        return false;
    };
    let mut node = root;
    for key in parents {
        let slot = node
            .entry(key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        node = ensure_object(slot);
    }
    node.insert(leaf.clone(), value);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Catalog {
        match v {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    fn get_at_path<'a>(root: &'a Catalog, path: &[String]) -> Option<&'a Value> {
        let (leaf, parents) = path.split_last()?;
        let mut node = root;
        for key in parents {
            node = node.get(key)?.as_object()?;
        }
        node.get(leaf)
    }

    fn paths(tasks: &[TranslationTask]) -> Vec<String> {
        tasks.iter().map(TranslationTask::dotted).collect()
    }

    #[test]
    fn fills_empty_target_and_ignores_numbers() {
        let source = obj(json!({"a": {"b": "Hello"}, "c": "World", "d": 5}));
        let out = diff_catalog(&source, Catalog::new());

        assert_eq!(Value::Object(out.target), json!({"a": {"b": ""}, "c": ""}));
        assert_eq!(
            out.tasks,
            vec![
                TranslationTask::new(["a", "b"], "Hello"),
                TranslationTask::new(["c"], "World"),
            ]
        );
    }

    #[test]
    fn keeps_existing_translations() {
        let source = obj(json!({"a": {"b": "Hello"}, "c": "World", "d": 5}));
        let target = obj(json!({"a": {"b": "Bonjour"}}));
        let out = diff_catalog(&source, target);

        assert_eq!(
            Value::Object(out.target),
            json!({"a": {"b": "Bonjour"}, "c": ""})
        );
        assert_eq!(out.tasks, vec![TranslationTask::new(["c"], "World")]);
    }

    #[test]
    fn empty_and_non_string_targets_count_as_missing() {
        let source = obj(json!({"x": "X", "y": "Y", "z": "Z"}));
        let target = obj(json!({"x": "", "y": 3, "z": ["z"]}));
        let out = diff_catalog(&source, target);

        assert_eq!(paths(&out.tasks), vec!["x", "y", "z"]);
        assert_eq!(Value::Object(out.target), json!({"x": "", "y": "", "z": ""}));
    }

    #[test]
    fn non_string_sources_leave_target_untouched() {
        let source = obj(json!({"n": 1, "b": true, "z": null, "arr": ["one", "two"]}));
        let target = obj(json!({"n": "keep", "arr": [1]}));
        let out = diff_catalog(&source, target.clone());

        assert!(out.tasks.is_empty());
        assert_eq!(out.target, target);
    }

    #[test]
    fn coerces_scalar_target_into_object() {
        let source = obj(json!({"menu": {"open": "Open", "close": "Close"}}));
        let target = obj(json!({"menu": "legacy"}));
        let out = diff_catalog(&source, target);

        assert_eq!(
            Value::Object(out.target),
            json!({"menu": {"open": "", "close": ""}})
        );
        assert_eq!(paths(&out.tasks), vec!["menu.open", "menu.close"]);
    }

    #[test]
    fn compatible_nested_target_is_preserved() {
        let source = obj(json!({"menu": {"open": "Open"}}));
        let target = obj(json!({"menu": {"open": "Ouvrir", "extra": "Extra"}, "old": "x"}));
        let out = diff_catalog(&source, target.clone());

        assert!(out.tasks.is_empty());
        assert_eq!(out.target, target);
    }

    #[test]
    fn empty_source_object_creates_empty_target_object() {
        let source = obj(json!({"group": {}}));
        let out = diff_catalog(&source, Catalog::new());
        assert!(out.tasks.is_empty());
        assert_eq!(Value::Object(out.target), json!({"group": {}}));
    }

    #[test]
    fn empty_source_text_still_yields_task() {
        let source = obj(json!({"blank": ""}));
        let out = diff_catalog(&source, Catalog::new());
        assert_eq!(out.tasks, vec![TranslationTask::new(["blank"], "")]);
    }

    #[test]
    fn tasks_follow_preorder_insertion_order() {
        let source = obj(json!({
            "z": "1",
            "a": {"y": "2", "b": {"x": "3"}, "c": "4"},
            "m": "5"
        }));
        let out = diff_catalog(&source, Catalog::new());
        assert_eq!(paths(&out.tasks), vec!["z", "a.y", "a.b.x", "a.c", "m"]);
    }

    #[test]
    fn second_pass_finds_nothing() {
        let source = obj(json!({"a": {"b": "Hello"}, "c": "World"}));
        let mut first = diff_catalog(&source, Catalog::new());
        for task in &first.tasks {
            set_at_path(
                &mut first.target,
                &task.path,
                Value::String(task.source_text.clone()),
            );
        }
        let second = diff_catalog(&source, first.target.clone());
        assert!(second.tasks.is_empty());
        assert_eq!(second.target, first.target);
    }

    #[test]
    fn source_is_not_mutated() {
        let source = obj(json!({"a": {"b": "Hello"}}));
        let before = source.clone();
        let _ = diff_catalog(&source, obj(json!({"a": 1})));
        assert_eq!(source, before);
    }

    #[test]
    fn set_at_path_creates_and_coerces_parents() {
        let mut root = obj(json!({"a": "scalar"}));
        let path: Vec<String> = vec!["a".into(), "b".into(), "c".into()];
        assert!(set_at_path(&mut root, &path, json!("deep")));
        assert_eq!(Value::Object(root.clone()), json!({"a": {"b": {"c": "deep"}}}));
        assert_eq!(get_at_path(&root, &path), Some(&json!("deep")));
        assert!(!set_at_path(&mut root, &[], json!("nothing")));
    }

    #[test]
    fn get_at_path_stops_at_non_objects() {
        let root = obj(json!({"a": "leaf"}));
        let path: Vec<String> = vec!["a".into(), "b".into()];
        assert_eq!(get_at_path(&root, &path), None);
        assert_eq!(get_at_path(&root, &[]), None);
    }
}
