use std::collections::BTreeMap;

use serde::Serialize;

use super::document::JobRequirementsDocument;
use super::schema::{validate_value, RequirementKey, SchemaViolation};
use super::value::RequirementValue;

/// Edit-session state of the requirements form: one slot per schema key.
///
/// Disabling a requirement keeps its value, so enabling it again restores what
/// was typed. Only enabled slots reach the [`JobRequirementsDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequirementBuilder {
    slots: BTreeMap<RequirementKey, RequirementSlot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementSlot {
    pub enabled: bool,
    pub value: RequirementValue,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("requirement {0} is not enabled")]
    NotEnabled(RequirementKey),
    #[error("requirement {0} does not hold a list")]
    NotAList(RequirementKey),
    #[error("requirement {key} has no item at index {index} (length {len})")]
    IndexOutOfRange {
        key: RequirementKey,
        index: usize,
        len: usize,
    },
    #[error(transparent)]
    Rejected(#[from] SchemaViolation),
}

impl Default for RequirementBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementBuilder {
    /// Every requirement disabled and holding its schema default.
    pub fn new() -> Self {
        let slots = RequirementKey::ordered()
            .into_iter()
            .map(|key| {
                (
                    key,
                    RequirementSlot {
                        enabled: false,
                        value: key.default_value(),
                    },
                )
            })
            .collect();
        Self { slots }
    }

    /// Open an edit session on a stored document: its keys start enabled with
    /// the stored values, everything else keeps the defaults.
    pub fn from_document(document: &JobRequirementsDocument) -> Self {
        let mut builder = Self::new();
        for (key, value) in document.iter() {
            let slot = builder.slot_mut(key);
            slot.enabled = true;
            slot.value = value.clone();
        }
        builder
    }

    pub fn toggle(&mut self, key: RequirementKey, enabled: bool) {
        self.slot_mut(key).enabled = enabled;
    }

    pub fn is_enabled(&self, key: RequirementKey) -> bool {
        self.slot(key).enabled
    }

    /// Current value for `key`, whether or not it is enabled.
    pub fn config(&self, key: RequirementKey) -> &RequirementValue {
        &self.slot(key).value
    }

    /// Replace the value of an enabled requirement. The schema rejects
    /// malformed input here so an undecodable document is never produced.
    pub fn update_config(
        &mut self,
        key: RequirementKey,
        value: RequirementValue,
    ) -> Result<(), BuilderError> {
        self.ensure_enabled(key)?;
        validate_value(key, &value)?;
        self.slot_mut(key).value = value;
        Ok(())
    }

    /// Append a blank item to a list-shaped requirement and return its index.
    pub fn add_item(&mut self, key: RequirementKey) -> Result<usize, BuilderError> {
        self.ensure_enabled(key)?;
        self.slot_mut(key)
            .value
            .push_blank_item()
            .ok_or(BuilderError::NotAList(key))
    }

    /// Remove the item at `index`; later items shift down by one.
    pub fn remove_item(&mut self, key: RequirementKey, index: usize) -> Result<(), BuilderError> {
        self.ensure_enabled(key)?;
        let value = &mut self.slot_mut(key).value;
        let len = value.list_len().ok_or(BuilderError::NotAList(key))?;
        value
            .remove_item(index)
            .ok_or(BuilderError::IndexOutOfRange { key, index, len })
    }

    pub fn enabled_keys(&self) -> impl Iterator<Item = RequirementKey> + '_ {
        self.slots
            .iter()
            .filter(|(_, slot)| slot.enabled)
            .map(|(key, _)| *key)
    }

    /// Project the enabled requirements into a document.
    pub fn document(&self) -> JobRequirementsDocument {
        let mut document = JobRequirementsDocument::new();
        for (key, slot) in self.slots.iter().filter(|(_, slot)| slot.enabled) {
            // Slot values only ever hold their key's shape.
            if let Err(err) = document.insert(*key, slot.value.clone()) {
                tracing::error!(%key, error = %err, "builder slot holds a value of the wrong shape");
            }
        }
        document
    }

    fn ensure_enabled(&self, key: RequirementKey) -> Result<(), BuilderError> {
        if self.is_enabled(key) {
            Ok(())
        } else {
            Err(BuilderError::NotEnabled(key))
        }
    }

    fn slot(&self, key: RequirementKey) -> &RequirementSlot {
        &self.slots[&key]
    }

    fn slot_mut(&mut self, key: RequirementKey) -> &mut RequirementSlot {
        self.slots
            .entry(key)
            .or_insert_with(|| RequirementSlot {
                enabled: false,
                value: key.default_value(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::requirements::value::{RangeValue, TechnologyRequirement};

    fn text(items: &[&str]) -> RequirementValue {
        RequirementValue::TextList(items.iter().map(|item| item.to_string()).collect())
    }

    #[test]
    fn new_builder_produces_an_empty_document() {
        let builder = RequirementBuilder::new();
        assert!(builder.document().is_empty());
        assert_eq!(builder.enabled_keys().count(), 0);
    }

    #[test]
    fn disabling_keeps_the_value_for_reenabling() {
        let mut builder = RequirementBuilder::new();
        builder.toggle(RequirementKey::Cnh, true);
        builder
            .update_config(RequirementKey::Cnh, text(&["B", "D"]))
            .expect("valid categories");

        builder.toggle(RequirementKey::Cnh, false);
        assert_eq!(builder.config(RequirementKey::Cnh), &text(&["B", "D"]));
        assert!(!builder.document().contains(RequirementKey::Cnh));

        builder.toggle(RequirementKey::Cnh, true);
        assert_eq!(
            builder.document().get(RequirementKey::Cnh),
            Some(&text(&["B", "D"]))
        );
    }

    #[test]
    fn update_config_requires_the_key_to_be_enabled() {
        let mut builder = RequirementBuilder::new();
        let error = builder
            .update_config(RequirementKey::SoftSkills, text(&["Empatia"]))
            .expect_err("disabled");
        assert_eq!(error, BuilderError::NotEnabled(RequirementKey::SoftSkills));
        assert_eq!(builder.config(RequirementKey::SoftSkills), &text(&[]));
    }

    #[test]
    fn update_config_rejects_non_numeric_bounds() {
        let mut builder = RequirementBuilder::new();
        builder.toggle(RequirementKey::Idade, true);
        builder
            .update_config(
                RequirementKey::Idade,
                RequirementValue::Range(RangeValue::new("18", "")),
            )
            .expect("blank max is allowed while editing");

        let error = builder
            .update_config(
                RequirementKey::Idade,
                RequirementValue::Range(RangeValue::new("18", "sessenta")),
            )
            .expect_err("non numeric");
        assert!(matches!(error, BuilderError::Rejected(_)));
        assert_eq!(
            builder.config(RequirementKey::Idade),
            &RequirementValue::Range(RangeValue::new("18", ""))
        );
    }

    #[test]
    fn add_item_appends_blank_records() {
        let mut builder = RequirementBuilder::new();
        builder.toggle(RequirementKey::TecnologiasSoftwares, true);

        assert_eq!(builder.add_item(RequirementKey::TecnologiasSoftwares), Ok(0));
        assert_eq!(builder.add_item(RequirementKey::TecnologiasSoftwares), Ok(1));
        assert_eq!(
            builder.config(RequirementKey::TecnologiasSoftwares),
            &RequirementValue::Technologies(vec![
                TechnologyRequirement::default(),
                TechnologyRequirement::default()
            ])
        );
    }

    #[test]
    fn list_operations_reject_non_list_requirements() {
        let mut builder = RequirementBuilder::new();
        builder.toggle(RequirementKey::Distancia, true);
        assert_eq!(
            builder.add_item(RequirementKey::Distancia),
            Err(BuilderError::NotAList(RequirementKey::Distancia))
        );
        assert_eq!(
            builder.remove_item(RequirementKey::Distancia, 0),
            Err(BuilderError::NotAList(RequirementKey::Distancia))
        );
    }

    #[test]
    fn remove_item_shifts_later_items_down() {
        let mut builder = RequirementBuilder::new();
        builder.toggle(RequirementKey::CursosComplementares, true);
        builder
            .update_config(
                RequirementKey::CursosComplementares,
                text(&["NR-10", "NR-35", "Excel", "Primeiros socorros"]),
            )
            .expect("free text");

        builder
            .remove_item(RequirementKey::CursosComplementares, 1)
            .expect("index exists");
        assert_eq!(
            builder.config(RequirementKey::CursosComplementares),
            &text(&["NR-10", "Excel", "Primeiros socorros"])
        );

        let error = builder
            .remove_item(RequirementKey::CursosComplementares, 3)
            .expect_err("out of range");
        assert_eq!(
            error,
            BuilderError::IndexOutOfRange {
                key: RequirementKey::CursosComplementares,
                index: 3,
                len: 3
            }
        );
    }

    #[test]
    fn removing_the_last_item_leaves_an_empty_list() {
        let mut builder = RequirementBuilder::new();
        builder.toggle(RequirementKey::SoftSkills, true);
        builder.add_item(RequirementKey::SoftSkills).expect("list");
        builder
            .remove_item(RequirementKey::SoftSkills, 0)
            .expect("index exists");

        assert_eq!(builder.config(RequirementKey::SoftSkills), &text(&[]));
        assert_eq!(
            builder.document().to_json_string().expect("serializes"),
            r#"{"soft_skills":[]}"#
        );
    }

    #[test]
    fn from_document_enables_stored_keys() {
        let mut original = RequirementBuilder::new();
        original.toggle(RequirementKey::AreaFormacao, true);
        original
            .update_config(RequirementKey::AreaFormacao, text(&["Administração"]))
            .expect("free text");

        let reopened = RequirementBuilder::from_document(&original.document());
        assert!(reopened.is_enabled(RequirementKey::AreaFormacao));
        assert!(!reopened.is_enabled(RequirementKey::Idade));
        assert_eq!(reopened.document(), original.document());
    }
}
