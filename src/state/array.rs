//! List operations on a form store
//!
//! Errors are recomputed from scratch after every list edit, so the error
//! map always uses current indices. Touched and changed entries under the
//! list are shifted or cleared according to [`IndexRekey`].

use super::field::IndexRekey;
use super::form_state::FormStore;
use crate::error::{EngineError, Result};
use crate::value::{self, FieldPath, FormValue, PathSegment};
use std::collections::{BTreeMap, BTreeSet};

/// Element shape of every list in the initial snapshot
///
/// Keyed by the list's path with all indices set to zero, so lists nested
/// inside list elements share one template. A list that starts out empty
/// has no template and accepts no elements.
#[derive(Debug, Clone, Default)]
pub(super) struct ListTemplates {
    lists: BTreeMap<FieldPath, Option<FormValue>>,
}

impl ListTemplates {
    pub(super) fn capture(initial: &FormValue) -> Result<Self> {
        let mut templates = Self::default();
        templates.collect(&FieldPath::root(), initial);
        templates.check(&FieldPath::root(), initial)?;
        Ok(templates)
    }

    /// Check every list inside `value`, which sits at `path`
    pub(super) fn check(&self, path: &FieldPath, value: &FormValue) -> Result<()> {
        match value {
            FormValue::Scalar(_) => Ok(()),
            FormValue::Record(fields) => fields
                .iter()
                .try_for_each(|(name, child)| self.check(&path.field(name), child)),
            FormValue::List(items) => items
                .iter()
                .enumerate()
                .try_for_each(|(index, item)| self.check_element(path, index, item)),
        }
    }

    /// Check `item` as element `index` of the list at `list`
    pub(super) fn check_element(
        &self,
        list: &FieldPath,
        index: usize,
        item: &FormValue,
    ) -> Result<()> {
        let at = list.index(index);
        match self.lists.get(&template_key(list)) {
            Some(Some(template)) if template.same_shape(item) => self.check(&at, item),
            Some(Some(template)) => Err(EngineError::ShapeMismatch {
                path: at,
                expected: template.kind(),
                found: item.kind(),
            }),
            _ => Err(EngineError::ShapeMismatch {
                path: at,
                expected: "no elements",
                found: item.kind(),
            }),
        }
    }

    fn collect(&mut self, path: &FieldPath, value: &FormValue) {
        match value {
            FormValue::Scalar(_) => {}
            FormValue::Record(fields) => {
                for (name, child) in fields {
                    self.collect(&path.field(name), child);
                }
            }
            FormValue::List(items) => {
                let slot = self.lists.entry(template_key(path)).or_default();
                if slot.is_none() {
                    *slot = items.first().cloned();
                }
                for (index, item) in items.iter().enumerate() {
                    self.collect(&path.index(index), item);
                }
            }
        }
    }
}

fn template_key(path: &FieldPath) -> FieldPath {
    path.segments()
        .iter()
        .fold(FieldPath::root(), |key, segment| match segment {
            PathSegment::Name(name) => key.field(name),
            PathSegment::Index(_) => key.index(0),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListEdit {
    Insert,
    Remove,
}

impl FormStore {
    /// Insert `item` at `index`, shifting later elements up
    pub fn insert(&mut self, list_path: &FieldPath, index: usize, item: FormValue) -> Result<()> {
        let items = self.list_at(list_path)?;
        if index > items.len() {
            return Err(EngineError::MissingField {
                path: list_path.index(index),
            });
        }
        self.templates.check_element(list_path, index, &item)?;

        self.values = value::update(&self.values, list_path, |current| {
            let mut items = current.as_list().unwrap_or_default().to_vec();
            items.insert(index, item);
            Ok(FormValue::List(items))
        })?;
        self.shift_marks(list_path, index, ListEdit::Insert);
        tracing::debug!(form_id = %self.id(), list = %list_path, index, "list item inserted");
        self.after_edit();
        Ok(())
    }

    /// Append `item` to the list
    pub fn push(&mut self, list_path: &FieldPath, item: FormValue) -> Result<()> {
        let len = self.list_at(list_path)?.len();
        self.insert(list_path, len, item)
    }

    /// Remove and return the element at `index`, shifting later elements down
    pub fn remove(&mut self, list_path: &FieldPath, index: usize) -> Result<FormValue> {
        let items = self.list_at(list_path)?;
        let Some(removed) = items.get(index).cloned() else {
            return Err(EngineError::MissingField {
                path: list_path.index(index),
            });
        };

        self.values = value::update(&self.values, list_path, |current| {
            let mut items = current.as_list().unwrap_or_default().to_vec();
            items.remove(index);
            Ok(FormValue::List(items))
        })?;
        self.shift_marks(list_path, index, ListEdit::Remove);
        tracing::debug!(form_id = %self.id(), list = %list_path, index, "list item removed");
        self.after_edit();
        Ok(removed)
    }

    /// Remove only if the list keeps at least `floor` elements afterwards
    ///
    /// Returns `false` and leaves the list alone otherwise.
    pub fn remove_above_floor(
        &mut self,
        list_path: &FieldPath,
        index: usize,
        floor: usize,
    ) -> Result<bool> {
        if self.list_at(list_path)?.len() <= floor {
            tracing::debug!(list = %list_path, floor, "removal would go below floor");
            return Ok(false);
        }
        self.remove(list_path, index)?;
        Ok(true)
    }

    fn list_at(&self, list_path: &FieldPath) -> Result<&[FormValue]> {
        let current = self.get(list_path)?;
        current.as_list().ok_or_else(|| EngineError::ShapeMismatch {
            path: list_path.clone(),
            expected: "list",
            found: current.kind(),
        })
    }

    fn shift_marks(&mut self, list: &FieldPath, index: usize, edit: ListEdit) {
        let policy = self.options.index_rekey;
        self.touched = shift_paths(std::mem::take(&mut self.touched), list, index, edit, policy);
        self.changed = shift_paths(std::mem::take(&mut self.changed), list, index, edit, policy);
    }
}

fn shift_paths(
    paths: BTreeSet<FieldPath>,
    list: &FieldPath,
    index: usize,
    edit: ListEdit,
    policy: IndexRekey,
) -> BTreeSet<FieldPath> {
    paths
        .into_iter()
        .filter_map(|path| {
            let Some(i) = path.index_under(list) else {
                return Some(path);
            };
            match (edit, policy) {
                _ if i < index => Some(path),
                (ListEdit::Remove, _) if i == index => None,
                (_, IndexRekey::Clear) => None,
                (ListEdit::Insert, IndexRekey::Rekey) => Some(path.with_index_under(list, i + 1)),
                (ListEdit::Remove, IndexRekey::Rekey) => Some(path.with_index_under(list, i - 1)),
            }
        })
        .collect()
}
