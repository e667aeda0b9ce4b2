use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Parent/child edges loop back onto a person already on the path.
    /// `path` starts and ends with the repeated person.
    #[error("parent/child cycle: {}", path.join(" -> "))]
    Cycle { path: Vec<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_lists_path() {
        let err = LayoutError::Cycle {
            path: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "parent/child cycle: a -> b -> a");
    }
}
