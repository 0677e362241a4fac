/// One service operation as declared by the port type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub name: String,
    pub documentation: String,
    pub request_type: String,
    /// `None` for one-way operations.
    pub response_type: Option<String>,
}

/// Everything the generator needs to know about a Workday service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: String,
    pub version: String,
    pub documentation: String,
    pub operations: Vec<Operation>,
}

impl Endpoint {
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|operation| operation.name == name)
    }
}
