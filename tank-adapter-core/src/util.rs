/// Longest statement prefix kept in log lines.
pub const TRUNCATE_AT: usize = 497;

/// Cut `value` to at most `len` bytes without splitting a character.
pub fn truncate_str(value: &str, len: usize) -> &str {
    if value.len() <= len {
        return value;
    }
    let mut end = len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::truncate_str(&$query, $crate::TRUNCATE_AT).trim_end(),
            if $query.len() > $crate::TRUNCATE_AT {
                "..."
            } else {
                ""
            },
        )
    };
}

