use error_stack::Report;

use crate::KernelError;

pub(in crate::entity) fn bounded(
    field: &'static str,
    value: String,
    max: usize,
) -> error_stack::Result<String, KernelError> {
    let length = value.chars().count();
    if length > max {
        return Err(Report::new(KernelError::Validation).attach_printable(format!(
            "{field} must be at most {max} characters (got {length})"
        )));
    }
    Ok(value)
}

pub(in crate::entity) fn required(
    field: &'static str,
    value: String,
    max: usize,
) -> error_stack::Result<String, KernelError> {
    if value.trim().is_empty() {
        return Err(Report::new(KernelError::Validation)
            .attach_printable(format!("{field} must not be empty")));
    }
    bounded(field, value, max)
}

#[cfg(test)]
mod test {
    use super::{bounded, required};
    use crate::KernelError;

    #[test]
    fn required_rejects_blank() {
        let report = required("title", "  \t".to_string(), 10).unwrap_err();
        assert_eq!(report.current_context(), &KernelError::Validation);
    }

    #[test]
    fn bounded_counts_characters_not_bytes() {
        assert!(bounded("genre", "ñññ".to_string(), 3).is_ok());
        assert!(bounded("genre", "ñññn".to_string(), 3).is_err());
    }
}
