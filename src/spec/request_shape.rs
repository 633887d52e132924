use apollo_parser::ast;

use crate::spec::Fragments;
use crate::spec::Selection;
use crate::spec::SpecError;

/// A parsed request document: the operations' selection trees plus the
/// named fragments they may spread.
///
/// No schema validation happens here; the shape is used solely to inspect
/// what the caller asked for before the underlying query runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestShape {
    string: String,
    operations: Vec<Operation>,
    fragments: Fragments,
}

/// One operation of a request document.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    name: Option<String>,
    selection_set: Vec<Selection>,
}

impl RequestShape {
    #[tracing::instrument(skip_all, level = "trace")]
    pub fn parse(request: impl Into<String>) -> Result<Self, SpecError> {
        let string = request.into();

        let parser = apollo_parser::Parser::new(string.as_str());
        let tree = parser.parse();
        let errors = tree
            .errors()
            .map(|err| format!("{:?}", err))
            .collect::<Vec<_>>();
        if !errors.is_empty() {
            return Err(SpecError::ParsingError(errors.join(", ")));
        }

        let document = tree.document();
        let fragments = Fragments::from_ast(&document)
            .ok_or_else(|| SpecError::ParsingError("malformed fragment definition".to_string()))?;

        let operations = document
            .definitions()
            .filter_map(|definition| {
                if let ast::Definition::OperationDefinition(operation) = definition {
                    Operation::from_ast(operation)
                } else {
                    None
                }
            })
            .collect();

        Ok(RequestShape {
            string,
            operations,
            fragments,
        })
    }

    /// Returns a reference to the underlying request string.
    pub fn as_str(&self) -> &str {
        self.string.as_str()
    }

    pub fn fragments(&self) -> &Fragments {
        &self.fragments
    }

    /// The operation to execute: the named one, or the first in document
    /// order when no name is given.
    pub fn operation(&self, name: Option<&str>) -> Option<&Operation> {
        match name {
            Some(name) => self
                .operations
                .iter()
                .find(|operation| operation.name.as_deref() == Some(name)),
            None => self.operations.first(),
        }
    }
}

impl Operation {
    fn from_ast(operation: ast::OperationDefinition) -> Option<Self> {
        let name = operation.name().map(|name| name.text().to_string());
        let selection_set = operation
            .selection_set()?
            .selections()
            .map(Selection::from_ast)
            .collect::<Option<Vec<_>>>()?;

        Some(Operation {
            name,
            selection_set,
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn selection_set(&self) -> &[Selection] {
        self.selection_set.as_slice()
    }

    /// The declared selection responding under `name`, for handing a
    /// field's own selection context to the resolvers.
    pub fn field(&self, name: &str) -> Option<&Selection> {
        self.selection_set
            .iter()
            .find(|selection| selection.response_name() == Some(name))
    }
}
