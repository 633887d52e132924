use std::collections::HashMap;

use apollo_parser::ast;

use crate::spec::Selection;

/// A named fragment definition.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub type_condition: String,
    pub selection_set: Vec<Selection>,
}

/// The named-fragment definitions of a request document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragments {
    map: HashMap<String, Fragment>,
}

impl Fragments {
    pub(crate) fn from_ast(document: &ast::Document) -> Option<Self> {
        let map = document
            .definitions()
            .filter_map(|definition| match definition {
                // Spec: https://spec.graphql.org/draft/#FragmentDefinition
                ast::Definition::FragmentDefinition(fragment_definition) => {
                    Some(Fragment::from_ast(fragment_definition))
                }
                _ => None,
            })
            .collect::<Option<HashMap<_, _>>>()?;

        Some(Fragments { map })
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&Fragment> {
        self.map.get(key.as_ref())
    }
}

impl Fragment {
    fn from_ast(fragment_definition: ast::FragmentDefinition) -> Option<(String, Self)> {
        let name = fragment_definition
            .fragment_name()?
            .name()?
            .text()
            .to_string();
        let type_condition = fragment_definition
            .type_condition()?
            .named_type()?
            .name()?
            .text()
            .to_string();
        let selection_set = fragment_definition
            .selection_set()?
            .selections()
            .map(Selection::from_ast)
            .collect::<Option<Vec<_>>>()?;

        Some((
            name,
            Fragment {
                type_condition,
                selection_set,
            },
        ))
    }
}
