use std::fmt;

/// Location of an attribute inside a resource's object value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: Vec<String>,
}

impl Path {
    /// A top-level attribute, e.g. `Path::root("account_id")`
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            steps: vec![name.into()],
        }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.steps.join("."))
    }
}
