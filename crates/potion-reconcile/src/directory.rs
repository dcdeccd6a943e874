use std::collections::BTreeMap;

use potion_schemas::Cauldron;

/// `cauldron_id -> display name` lookup built from the reference list.
///
/// Built per invocation by the plain entry points. Callers that want to
/// reuse one across requests hold it themselves and pass it to the
/// `*_with_directory` functions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CauldronDirectory {
    /// Reference-list order, first occurrence of each id.
    order: Vec<String>,
    names: BTreeMap<String, String>,
}

impl CauldronDirectory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_cauldrons(cauldrons: &[Cauldron]) -> Self {
        let mut dir = Self::empty();
        for c in cauldrons {
            if c.id.is_empty() || dir.names.contains_key(&c.id) {
                continue;
            }
            dir.order.push(c.id.clone());
            dir.names.insert(c.id.clone(), c.name.clone());
        }
        dir
    }

    /// Known ids in reference-list order.
    pub fn known_ids(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Name for `cauldron_id`, or the id itself when unknown or unnamed.
    pub fn display_name<'a>(&'a self, cauldron_id: &'a str) -> &'a str {
        match self.names.get(cauldron_id) {
            Some(name) if !name.trim().is_empty() => name.as_str(),
            _ => cauldron_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_and_unnamed_fall_back_to_id() {
        let dir = CauldronDirectory::from_cauldrons(&[
            Cauldron::named("c1", "Alpha"),
            Cauldron::named("c2", ""),
        ]);
        assert_eq!(dir.display_name("c1"), "Alpha");
        assert_eq!(dir.display_name("c2"), "c2");
        assert_eq!(dir.display_name("c9"), "c9");
    }

    #[test]
    fn duplicate_ids_keep_first_entry() {
        let dir = CauldronDirectory::from_cauldrons(&[
            Cauldron::named("c1", "Alpha"),
            Cauldron::named("c2", "Beta"),
            Cauldron::named("c1", "Shadow"),
        ]);
        assert_eq!(dir.known_ids().to_vec(), vec!["c1".to_string(), "c2".to_string()]);
        assert_eq!(dir.display_name("c1"), "Alpha");
    }
}
