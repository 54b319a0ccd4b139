//! Mapping of metadata type tags to validity patterns.

use datahub_model::{DataType, FieldPattern, ModelError};

/// Build the pattern for a (data type, length, mandatory values) triplet.
///
/// An absent or blank tag yields `Ok(None)`. Unknown tags, bad lengths and
/// malformed option lists are errors so callers can report them before
/// falling back to a field's default pattern.
pub fn regex_for(
    data_type: Option<&str>,
    length: Option<&str>,
    mandatory_values: Option<&str>,
) -> Result<Option<FieldPattern>, ModelError> {
    let Some(tag) = data_type else {
        return Ok(None);
    };
    DataType::parse(tag, length, mandatory_values)?
        .map(FieldPattern::for_type)
        .transpose()
}
